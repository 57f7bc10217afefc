//! Weapon state and attack dispatch.
//!
//! ## Spawn geometry by projectile kind
//!
//! | Kind    | Aim origin          | Spawn point                                  |
//! |---------|---------------------|----------------------------------------------|
//! | Arrow   | weapon anchor       | origin + dir × length/2 (rear edge on bow)   |
//! | Spear   | body top            | origin                                       |
//!
//! Launch velocity is `speed` toward the cursor from the aim origin, plus the
//! shooter's velocity on each axis where the two point the same way.

use crate::aim::{AimAnchor, AimEllipse, AimVector};
use crate::body::Body;
use crate::cooldown::CooldownTimer;
use crate::projectile::{ballistic_rotation, compensate_for_shooter, ProjectileLaunch, ProjectileSink};
use crate::weapon::{Arsenal, ProjectileKind, Weapon, WeaponId};
use bevy::ecs::entity::Entity;
use bevy::log::debug;
use bevy::math::Vec2;

#[derive(Debug, Clone)]
pub struct CombatController {
    arsenal: Arsenal,
    slots: Vec<WeaponId>,
    equipped: Option<Weapon>,
    cooldown: CooldownTimer,
    ellipse: AimEllipse,
}

impl CombatController {
    pub fn new(arsenal: Arsenal, slots: Vec<WeaponId>, ellipse: AimEllipse) -> Self {
        Self {
            arsenal,
            slots,
            equipped: None,
            cooldown: CooldownTimer::new(),
            ellipse,
        }
    }

    /// Equip `id`.  Re-equipping the current weapon changes nothing; a swap
    /// leaves the new weapon ready to fire.  Returns `true` on a swap.
    pub fn equip(&mut self, id: WeaponId) -> bool {
        if self.equipped.is_some_and(|w| w.id == id) {
            return false;
        }
        let Some(weapon) = self.arsenal.get(id).copied() else {
            return false;
        };
        self.cooldown.reset_ready(weapon.attack_interval_ms, true);
        self.equipped = Some(weapon);
        debug!("equipped {:?}", id);
        true
    }

    pub fn unequip(&mut self) {
        self.equipped = None;
    }

    /// Equip the weapon bound to weapon-select slot `slot` (zero-based).
    /// Unbound slots do nothing.
    pub fn select_slot(&mut self, slot: usize) -> bool {
        match self.slots.get(slot).copied() {
            Some(id) => self.equip(id),
            None => false,
        }
    }

    pub fn tick(&mut self, delta_ms: f32) {
        self.cooldown.tick(delta_ms);
    }

    pub fn equipped(&self) -> Option<&Weapon> {
        self.equipped.as_ref()
    }

    pub fn cooldown(&self) -> &CooldownTimer {
        &self.cooldown
    }

    pub fn slots(&self) -> &[WeaponId] {
        &self.slots
    }

    /// Aim for the equipped weapon (body center when unarmed), with the reticle
    /// leashed to the aim ellipse.
    pub fn aim<B: Body + ?Sized>(&self, body: &B, cursor: Vec2) -> AimVector {
        let anchor = self.equipped.map(|w| w.anchor).unwrap_or_default();
        let origin = anchor.point(body.position(), body.half_extents().y);
        AimVector::from_cursor(cursor, origin).constrained(self.ellipse)
    }

    /// Fire the equipped weapon toward `cursor`.  Returns `false` when unarmed
    /// or still cooling down.
    pub fn attack<B, S>(&mut self, shooter: Entity, body: &B, cursor: Vec2, sink: &mut S) -> bool
    where
        B: Body + ?Sized,
        S: ProjectileSink + ?Sized,
    {
        let Some(weapon) = self.equipped else {
            return false;
        };
        if !self.cooldown.is_ready() {
            return false;
        }
        self.cooldown.start_with_mode(weapon.attack_interval_ms, false);

        let launch = match weapon.projectile.kind {
            ProjectileKind::Arrow => shoot_arrow(&weapon, shooter, body, cursor),
            ProjectileKind::Spear => throw_spear(&weapon, shooter, body, cursor),
        };
        debug!(
            "{:?} launched at ({:.0}, {:.0}) v=({:.0}, {:.0})",
            launch.kind, launch.position.x, launch.position.y, launch.velocity.x, launch.velocity.y
        );
        sink.spawn(launch);
        true
    }
}

fn launch_from<B: Body + ?Sized>(
    weapon: &Weapon,
    shooter: Entity,
    body: &B,
    aim: &AimVector,
    position: Vec2,
) -> ProjectileLaunch {
    let spec = weapon.projectile;
    let mut velocity = aim.velocity_toward(spec.speed);
    if spec.compensate_shooter {
        velocity = compensate_for_shooter(velocity, body.velocity());
    }
    ProjectileLaunch {
        kind: spec.kind,
        position,
        velocity,
        rotation: ballistic_rotation(velocity).unwrap_or_else(|| aim.angle()),
        damage: spec.damage,
        gravity: spec.gravity,
        length: spec.length,
        shooter,
    }
}

fn shoot_arrow<B: Body + ?Sized>(
    weapon: &Weapon,
    shooter: Entity,
    body: &B,
    cursor: Vec2,
) -> ProjectileLaunch {
    let origin = weapon.anchor.point(body.position(), body.half_extents().y);
    let aim = AimVector::from_cursor(cursor, origin);
    let position = origin + aim.direction() * (weapon.projectile.length * 0.5);
    launch_from(weapon, shooter, body, &aim, position)
}

fn throw_spear<B: Body + ?Sized>(
    weapon: &Weapon,
    shooter: Entity,
    body: &B,
    cursor: Vec2,
) -> ProjectileLaunch {
    let origin = AimAnchor::Top.point(body.position(), body.half_extents().y);
    let aim = AimVector::from_cursor(cursor, origin);
    launch_from(weapon, shooter, body, &aim, origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::ArcadeBody;
    use crate::config::ControllerConfig;
    use bevy::ecs::world::World;

    fn controller() -> CombatController {
        let cfg = ControllerConfig::default();
        CombatController::new(cfg.arsenal(), cfg.weapon_slots.clone(), cfg.aim_ellipse())
    }

    fn body() -> ArcadeBody {
        ArcadeBody::new(Vec2::new(0.0, 0.0), Vec2::new(24.0, 44.0))
    }

    fn shooter() -> Entity {
        World::new().spawn_empty().id()
    }

    #[test]
    fn unarmed_attack_is_noop() {
        let mut combat = controller();
        let mut sink = Vec::new();
        assert!(!combat.attack(shooter(), &body(), Vec2::new(100.0, 0.0), &mut sink));
        assert!(sink.is_empty());
    }

    #[test]
    fn attack_during_cooldown_is_ignored() {
        let mut combat = controller();
        combat.equip(WeaponId::Bow);
        let mut sink = Vec::new();
        let target = Vec2::new(100.0, 0.0);
        let e = shooter();
        assert!(combat.attack(e, &body(), target, &mut sink));
        assert!(!combat.attack(e, &body(), target, &mut sink));
        assert_eq!(sink.len(), 1);

        let interval = combat.cooldown().duration_ms();
        combat.tick(interval);
        assert!(combat.attack(e, &body(), target, &mut sink));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn attack_cooldown_bar_drains() {
        let mut combat = controller();
        combat.equip(WeaponId::Bow);
        assert!(combat.cooldown().is_inverse());

        let mut sink = Vec::new();
        combat.attack(shooter(), &body(), Vec2::X * 100.0, &mut sink);
        assert!(!combat.cooldown().is_inverse());
        assert_eq!(combat.cooldown().display_fill(), 1.0);

        let interval = combat.cooldown().duration_ms();
        combat.tick(interval * 0.5);
        assert!((combat.cooldown().display_fill() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn reequip_is_noop_and_swap_is_ready() {
        let mut combat = controller();
        assert!(combat.equip(WeaponId::Bow));
        let mut sink = Vec::new();
        combat.attack(shooter(), &body(), Vec2::X, &mut sink);
        assert!(!combat.cooldown().is_ready());

        assert!(!combat.equip(WeaponId::Bow));
        assert!(!combat.cooldown().is_ready(), "re-equip keeps the cooldown");

        assert!(combat.equip(WeaponId::Spear));
        assert!(combat.cooldown().is_ready());
        assert!(combat.cooldown().is_inverse());
        assert_eq!(combat.cooldown().display_fill(), 1.0);
    }

    #[test]
    fn empty_slot_selects_nothing() {
        let mut combat = controller();
        assert!(combat.select_slot(1));
        assert_eq!(combat.equipped().map(|w| w.id), Some(WeaponId::Spear));
        assert!(!combat.select_slot(2));
        assert_eq!(combat.equipped().map(|w| w.id), Some(WeaponId::Spear));
    }

    #[test]
    fn unequip_disarms() {
        let mut combat = controller();
        combat.equip(WeaponId::Bow);
        combat.unequip();
        assert!(combat.equipped().is_none());
    }

    #[test]
    fn arrow_rear_edge_sits_on_bow() {
        let mut combat = controller();
        combat.equip(WeaponId::Bow);
        let mut sink = Vec::new();
        combat.attack(shooter(), &body(), Vec2::new(500.0, 0.0), &mut sink);
        let arrow = sink[0];
        assert_eq!(arrow.kind, ProjectileKind::Arrow);
        let rear = arrow.position - Vec2::X * arrow.length * 0.5;
        assert!(rear.length() < 1e-4);
        assert!(arrow.rotation.abs() < 1e-6);
    }

    #[test]
    fn spear_leaves_from_top_anchor() {
        let mut combat = controller();
        combat.equip(WeaponId::Spear);
        let mut sink = Vec::new();
        combat.attack(shooter(), &body(), Vec2::new(300.0, 44.0), &mut sink);
        let spear = sink[0];
        assert_eq!(spear.kind, ProjectileKind::Spear);
        assert_eq!(spear.position, Vec2::new(0.0, 44.0));
        assert!((spear.velocity - Vec2::new(spear.velocity.length(), 0.0)).length() < 1e-3);
    }

    #[test]
    fn running_shooter_adds_velocity_along_shot() {
        let mut combat = controller();
        combat.equip(WeaponId::Bow);
        let mut shooter_body = body();
        shooter_body.velocity = Vec2::new(200.0, 0.0);
        let speed = combat.equipped().map(|w| w.projectile.speed).unwrap();
        let e = shooter();

        let mut sink = Vec::new();
        combat.attack(e, &shooter_body, Vec2::new(500.0, 0.0), &mut sink);
        assert!((sink[0].velocity.x - (speed + 200.0)).abs() < 1e-3);

        combat.tick(1e6);
        combat.attack(e, &shooter_body, Vec2::new(-500.0, 0.0), &mut sink);
        assert!((sink[1].velocity.x + speed).abs() < 1e-3);
    }

    #[test]
    fn aim_reticle_is_leashed() {
        let mut combat = controller();
        combat.equip(WeaponId::Bow);
        let aim = combat.aim(&body(), Vec2::new(120.0, 0.0));
        assert!((aim.reticle() - Vec2::new(60.0, 0.0)).length() < 1e-4);
        assert_eq!(aim.angle(), 0.0);
    }
}
