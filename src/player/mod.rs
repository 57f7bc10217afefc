//! Player module: controllers, input handling, projectiles, and rendering.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`motion`] | Engine-independent movement state machine (jump, multi-jump, strafe-cancel, drop-through, dash) |
//! | [`combat`] | Engine-independent weapon state, attack cooldown and projectile spawn geometry |
//! | [`state`] | ECS components (`Player`, `PlayerController`, `AimReticle`, `TrainingDummy`) |
//! | [`control`] | Input mapping, body sync, one-way platforms, the fixed controller tick |
//! | [`projectiles`] | Projectile spawn, flight, culling and hit resolution |
//! | [`rendering`] | Gizmo drawing and camera follow |
//!
//! All public items are re-exported at this level so that the rest of the crate
//! can use flat `crate::player::*` imports without knowing the sub-module
//! layout.

pub mod combat;
pub mod control;
pub mod motion;
pub mod projectiles;
pub mod rendering;
pub mod state;

// ── Flat re-exports ───────────────────────────────────────────────────────────

pub use combat::CombatController;
pub use control::{
    body_integrate_system, body_sync_system, clear_input_edges_system, keyboard_to_input_system,
    one_way_platform_system, player_control_system, reticle_follow_system,
};
pub use motion::{
    DashTilt, Facing, MotionConfig, MotionController, MotionPhase, MotionReport, TickContext,
};
pub use projectiles::{
    projectile_advance_system, projectile_cull_system, projectile_hit_system, spawn_projectile,
};
pub use rendering::{
    camera_follow_system, player_gizmo_system, projectile_gizmo_system, world_gizmo_system,
};
pub use state::{AimReticle, ControlReport, Player, PlayerController, TrainingDummy};

use crate::aim::ReticleFollower;
use crate::body::ArcadeBody;
use crate::config::{load_controller_config, ControllerConfig};
use crate::constants::PHYSICS_TICK_HZ;
use crate::graphics;
use crate::health::Health;
use crate::input::InputSnapshot;
use crate::world::{self, WorldBounds, PLAYER_GROUP, PROJECTILE_GROUP, TERRAIN_GROUP};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Player spawn ──────────────────────────────────────────────────────────────

/// Spawn the player at the configured spawn point.
///
/// The player is a kinematic box moved through Rapier's character controller;
/// velocity, gravity and drag live in [`ArcadeBody`].
///
/// Collision groups:
/// - `GROUP_2`: player belongs to this group
/// - the collider overlaps terrain (`GROUP_1`) and projectiles (`GROUP_3`)
/// - the character controller only sweeps against terrain
pub fn spawn_player(mut commands: Commands, config: Res<ControllerConfig>) {
    let spawn = config.player_spawn();
    let half = Vec2::new(config.player_half_width, config.player_half_height);
    let body = ArcadeBody::new(spawn, half)
        .with_gravity(config.player_gravity)
        .with_drag(Vec2::new(config.player_drag_x, config.player_drag_y))
        .with_max_speed(config.max_velocity);

    commands.spawn((
        Player,
        PlayerController::from_config(&config),
        body,
        Health::new(config.player_max_hp),
        AimReticle(ReticleFollower::new(spawn, config.reticle_follow_speed)),
        // Physics
        RigidBody::KinematicPositionBased,
        Collider::cuboid(half.x, half.y),
        CollisionGroups::new(PLAYER_GROUP, TERRAIN_GROUP | PROJECTILE_GROUP),
        KinematicCharacterController {
            filter_groups: Some(CollisionGroups::new(PLAYER_GROUP, TERRAIN_GROUP)),
            autostep: None,
            snap_to_ground: None,
            ..Default::default()
        },
        Transform::from_translation(spawn.extend(0.0)),
    ));

    info!("Player spawned at ({:.0}, {:.0})", spawn.x, spawn.y);
}

/// Copy the loaded world size into [`WorldBounds`].
pub fn sync_world_bounds(config: Res<ControllerConfig>, mut bounds: ResMut<WorldBounds>) {
    *bounds = WorldBounds::from_config(&config);
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Wires the controllers into a Bevy app.  Expects `RapierPhysicsPlugin` to be
/// added in the fixed schedule.
pub struct PilotPlugin;

impl Plugin for PilotPlugin {
    fn build(&self, app: &mut App) {
        app
            // Compiled defaults; load_controller_config overwrites them from
            // assets/pilot.toml (if present) in the Startup schedule.
            .insert_resource(ControllerConfig::default())
            .init_resource::<InputSnapshot>()
            .init_resource::<WorldBounds>()
            .insert_resource(Time::<Fixed>::from_hz(PHYSICS_TICK_HZ))
            .add_systems(
                Startup,
                (
                    // Load config first so every other startup system sees the final values.
                    load_controller_config,
                    sync_world_bounds,
                    graphics::setup_camera,
                    world::spawn_level,
                    world::spawn_dummies,
                    spawn_player,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    keyboard_to_input_system,
                    reticle_follow_system,
                    camera_follow_system,
                    (
                        player_gizmo_system,
                        projectile_gizmo_system,
                        world_gizmo_system,
                    ),
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    body_sync_system,
                    one_way_platform_system,
                    player_control_system,
                    body_integrate_system,
                    projectile_advance_system,
                    projectile_cull_system,
                    projectile_hit_system,
                    clear_input_edges_system,
                )
                    .chain(),
            );
    }
}
