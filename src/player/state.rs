//! Player components.
//!
//! All ECS components that describe player state live here.  Systems that
//! mutate this state are in the sibling modules:
//! - [`super::control`]: input, body sync and the fixed controller tick
//! - [`super::projectiles`]: projectile flight, culling and hits
//! - [`super::rendering`]: gizmo drawing + camera

use super::combat::CombatController;
use super::motion::{MotionController, MotionReport, TickContext};
use crate::aim::ReticleFollower;
use crate::body::Body;
use crate::config::ControllerConfig;
use crate::input::{Action, ControlInput};
use crate::projectile::ProjectileSink;
use bevy::prelude::*;

// ── Components ─────────────────────────────────────────────────────────────────

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Marker for stationary damage targets.
#[derive(Component)]
pub struct TrainingDummy;

/// Smoothed reticle drawn at the aim point.
#[derive(Component, Debug, Clone, Copy)]
pub struct AimReticle(pub ReticleFollower);

/// What a single controller tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlReport {
    pub motion: MotionReport,
    pub swapped_weapon: bool,
    pub attacked: bool,
}

/// Movement and combat state of one player.
#[derive(Component, Debug, Clone)]
pub struct PlayerController {
    pub motion: MotionController,
    pub combat: CombatController,
}

impl PlayerController {
    /// Build both controllers from config and equip the starting weapon.
    pub fn from_config(config: &ControllerConfig) -> Self {
        let mut combat = CombatController::new(
            config.arsenal(),
            config.weapon_slots.clone(),
            config.aim_ellipse(),
        );
        if let Some(weapon) = config.starting_weapon {
            combat.equip(weapon);
        }
        Self {
            motion: MotionController::new(config.motion_config()),
            combat,
        }
    }

    /// One fixed tick: weapon select, movement, then attack.
    pub fn tick<B, I, S>(
        &mut self,
        shooter: Entity,
        body: &mut B,
        input: &I,
        ctx: TickContext,
        sink: &mut S,
    ) -> ControlReport
    where
        B: Body + ?Sized,
        I: ControlInput + ?Sized,
        S: ProjectileSink + ?Sized,
    {
        let mut report = ControlReport::default();

        for (slot, action) in Action::WEAPON_SLOTS.into_iter().enumerate() {
            if input.just_pressed(action) {
                report.swapped_weapon |= self.combat.select_slot(slot);
            }
        }

        let aim = input.cursor().map(|cursor| self.combat.aim(&*body, cursor));
        report.motion = self.motion.tick(&mut *body, input, aim.as_ref(), ctx);

        self.combat.tick(ctx.delta_ms);
        if input.just_pressed(Action::Attack) {
            if let Some(cursor) = input.cursor() {
                report.attacked = self.combat.attack(shooter, &*body, cursor, sink);
            }
        }

        report
    }
}
