//! Hit points for anything projectiles can hurt.

use bevy::prelude::Component;

/// Capability exposed by anything a projectile can damage.
pub trait DamageTarget {
    fn take_damage(&mut self, amount: f32) -> DamageOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// HP dropped but the target is still alive.
    Damaged,
    /// This hit brought HP to zero or below.
    Died,
    /// The target was already dead; nothing changed.
    Ignored,
}

/// HP pool shared by the player and training dummies.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub hp: f32,
    pub max_hp: f32,
}

impl Health {
    pub fn new(max_hp: f32) -> Self {
        let max_hp = max_hp.max(0.0);
        Self { hp: max_hp, max_hp }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Fill fraction for the health bar.
    pub fn fraction(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }

    pub fn heal(&mut self, amount: f32) {
        if self.is_dead() {
            return;
        }
        self.hp = (self.hp + amount.max(0.0)).min(self.max_hp);
    }

    /// Change the maximum; current HP is clamped to it.
    pub fn set_max_hp(&mut self, max_hp: f32) {
        self.max_hp = max_hp.max(0.0);
        self.hp = self.hp.min(self.max_hp);
    }

    pub fn restore(&mut self) {
        self.hp = self.max_hp;
    }
}

impl DamageTarget for Health {
    fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_dead() {
            return DamageOutcome::Ignored;
        }
        self.hp -= amount.max(0.0);
        if self.is_dead() {
            DamageOutcome::Died
        } else {
            DamageOutcome::Damaged
        }
    }
}
