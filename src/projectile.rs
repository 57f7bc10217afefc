//! Projectile kinematics: spawn compensation, ballistic flight and hit rules.

use crate::health::{DamageOutcome, DamageTarget};
use crate::weapon::ProjectileKind;
use bevy::ecs::entity::Entity;
use bevy::math::Vec2;
use bevy::prelude::Component;

/// Everything needed to put a projectile into the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileLaunch {
    pub kind: ProjectileKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub damage: f32,
    pub gravity: f32,
    pub length: f32,
    pub shooter: Entity,
}

/// Receives launches from the combat controller.
pub trait ProjectileSink {
    fn spawn(&mut self, launch: ProjectileLaunch);
}

impl ProjectileSink for Vec<ProjectileLaunch> {
    fn spawn(&mut self, launch: ProjectileLaunch) {
        self.push(launch);
    }
}

/// `Math.sign`-style sign: zero is its own sign.
fn sign(v: f32) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Add the shooter's velocity on every axis where it points the same way as
/// the desired velocity.  Never subtracts against the shooter's motion.
pub fn compensate_for_shooter(desired: Vec2, shooter_velocity: Vec2) -> Vec2 {
    let x = if sign(desired.x) == sign(shooter_velocity.x) {
        desired.x + shooter_velocity.x
    } else {
        desired.x
    };
    let y = if sign(desired.y) == sign(shooter_velocity.y) {
        desired.y + shooter_velocity.y
    } else {
        desired.y
    };
    Vec2::new(x, y)
}

/// Facing for a projectile moving at `velocity`; `None` when at rest.
pub fn ballistic_rotation(velocity: Vec2) -> Option<f32> {
    if velocity == Vec2::ZERO {
        return None;
    }
    Some(velocity.y.atan2(velocity.x))
}

/// In-flight projectile state.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub velocity: Vec2,
    pub rotation: f32,
    pub damage: f32,
    pub gravity: f32,
    pub length: f32,
    /// Used only to exclude friendly fire; never keeps the shooter alive.
    pub shooter: Entity,
    /// Seconds since launch.
    pub age: f32,
}

impl From<ProjectileLaunch> for Projectile {
    fn from(launch: ProjectileLaunch) -> Self {
        Self {
            kind: launch.kind,
            velocity: launch.velocity,
            rotation: launch.rotation,
            damage: launch.damage,
            gravity: launch.gravity,
            length: launch.length,
            shooter: launch.shooter,
            age: 0.0,
        }
    }
}

/// Result of a projectile touching something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Shooter, or something that cannot take damage.
    Ignored,
    /// Damage applied; the projectile must be destroyed.
    Hit(DamageOutcome),
}

impl Projectile {
    /// Apply gravity over `dt` seconds, re-derive the facing and return the
    /// displacement for this step.
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        self.velocity.y -= self.gravity * dt;
        if let Some(rotation) = ballistic_rotation(self.velocity) {
            self.rotation = rotation;
        }
        self.age += dt;
        self.velocity * dt
    }

    /// Resolve contact with `target_entity`.  `target` is `None` when the
    /// entity has no damage capability.
    pub fn resolve_hit<T: DamageTarget + ?Sized>(
        &self,
        target_entity: Entity,
        target: Option<&mut T>,
    ) -> HitOutcome {
        if target_entity == self.shooter {
            return HitOutcome::Ignored;
        }
        match target {
            Some(target) => HitOutcome::Hit(target.take_damage(self.damage)),
            None => HitOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Health;
    use bevy::ecs::world::World;

    #[test]
    fn compensation_adds_same_direction_only() {
        let shooter = Vec2::new(200.0, 0.0);
        assert_eq!(
            compensate_for_shooter(Vec2::new(500.0, 0.0), shooter).x,
            700.0
        );
        assert_eq!(
            compensate_for_shooter(Vec2::new(-500.0, 0.0), shooter).x,
            -500.0
        );
    }

    #[test]
    fn compensation_is_per_axis() {
        let v = compensate_for_shooter(Vec2::new(300.0, 300.0), Vec2::new(100.0, -50.0));
        assert_eq!(v, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn zero_desired_axis_ignores_moving_shooter() {
        let v = compensate_for_shooter(Vec2::new(0.0, 100.0), Vec2::new(250.0, 0.0));
        assert_eq!(v.x, 0.0);
    }

    #[test]
    fn rotation_tracks_falling_arc() {
        let mut world = World::new();
        let shooter = world.spawn_empty().id();
        let mut p = Projectile {
            kind: ProjectileKind::Arrow,
            velocity: Vec2::new(100.0, 0.0),
            rotation: 0.0,
            damage: 10.0,
            gravity: 100.0,
            length: 37.0,
            shooter,
            age: 0.0,
        };
        p.advance(1.0);
        assert_eq!(p.velocity, Vec2::new(100.0, -100.0));
        assert!((p.rotation + std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn resting_projectile_keeps_rotation() {
        assert_eq!(ballistic_rotation(Vec2::ZERO), None);
    }

    #[test]
    fn hits_damage_others_but_not_shooter() {
        let mut world = World::new();
        let shooter = world.spawn_empty().id();
        let target = world.spawn_empty().id();
        let p = Projectile {
            kind: ProjectileKind::Spear,
            velocity: Vec2::X,
            rotation: 0.0,
            damage: 30.0,
            gravity: 0.0,
            length: 121.0,
            shooter,
            age: 0.0,
        };

        let mut shooter_hp = Health::new(100.0);
        assert_eq!(p.resolve_hit(shooter, Some(&mut shooter_hp)), HitOutcome::Ignored);
        assert_eq!(shooter_hp.hp, 100.0);

        let mut target_hp = Health::new(50.0);
        assert_eq!(
            p.resolve_hit(target, Some(&mut target_hp)),
            HitOutcome::Hit(DamageOutcome::Damaged)
        );
        assert_eq!(target_hp.hp, 20.0);

        assert_eq!(p.resolve_hit::<Health>(target, None), HitOutcome::Ignored);
    }
}
