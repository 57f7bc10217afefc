//! Player input, body sync and the fixed-rate controller tick.
//!
//! ## Pipeline
//!
//! `Update` (every frame):
//! 1. [`keyboard_to_input_system`]: keyboard / mouse / cursor → [`InputSnapshot`].
//! 2. [`reticle_follow_system`]: ease the reticle toward the aim point.
//!
//! `FixedUpdate` (120 Hz, before Rapier's step):
//! 1. [`body_sync_system`]: Rapier character output → `ArcadeBody` position and contacts.
//! 2. [`one_way_platform_system`]: toggle one-way box solidity for this tick.
//! 3. [`player_control_system`]: weapon select, motion, attack.
//! 4. [`body_integrate_system`]: `ArcadeBody` velocity → character translation request.
//! 5. projectile systems (see [`super::projectiles`]).
//! 6. [`clear_input_edges_system`]: forget presses the tick has consumed.
//!
//! The **input abstraction layer** (`InputSnapshot`) keeps the controllers
//! testable: tests populate the resource directly and run only the fixed
//! systems.

use super::projectiles::spawn_projectile;
use super::state::{AimReticle, Player, PlayerController};
use super::TickContext;
use crate::body::ArcadeBody;
use crate::config::ControllerConfig;
use crate::constants::ONE_WAY_TOLERANCE;
use crate::input::{Action, InputSnapshot};
use crate::projectile::ProjectileLaunch;
use crate::world::{passable_platform_groups, solid_platform_groups, Platform, WorldBounds};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier2d::prelude::*;

/// Translation slack below which Rapier's output counts as unobstructed.
const BLOCK_EPSILON: f32 = 1e-3;

// ── Input ─────────────────────────────────────────────────────────────────────

fn key_bindings(action: Action) -> &'static [KeyCode] {
    match action {
        Action::Left => &[KeyCode::KeyA, KeyCode::ArrowLeft],
        Action::Right => &[KeyCode::KeyD, KeyCode::ArrowRight],
        Action::Down => &[KeyCode::KeyS, KeyCode::ArrowDown],
        Action::Jump => &[KeyCode::KeyW, KeyCode::ArrowUp, KeyCode::Space],
        Action::Dash => &[KeyCode::ShiftLeft, KeyCode::ShiftRight],
        Action::Attack => &[],
        Action::Weapon1 => &[KeyCode::Digit1],
        Action::Weapon2 => &[KeyCode::Digit2],
        Action::Weapon3 => &[KeyCode::Digit3],
    }
}

/// Translate keyboard, left mouse button and cursor into [`InputSnapshot`].
///
/// Presses accumulate until a fixed tick consumes them, so a tap shorter than
/// one tick is still seen exactly once.  The cursor keeps its last world
/// position while it is outside the window.
pub fn keyboard_to_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut input: ResMut<InputSnapshot>,
) {
    for action in Action::ALL {
        let bound = key_bindings(action);
        let mut held = keys.any_pressed(bound.iter().copied());
        let mut pressed = keys.any_just_pressed(bound.iter().copied());
        if action == Action::Attack {
            held |= mouse.pressed(MouseButton::Left);
            pressed |= mouse.just_pressed(MouseButton::Left);
        }
        if pressed {
            input.press(action);
        } else {
            input.set_held(action, held);
        }
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    if let Some(world) = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world_2d(camera_transform, cursor).ok())
    {
        input.cursor_world = Some(world);
    }
}

/// Ease the reticle toward the leashed aim point.
pub fn reticle_follow_system(
    input: Res<InputSnapshot>,
    mut q: Query<(&ArcadeBody, &PlayerController, &mut AimReticle), With<Player>>,
) {
    let Some(cursor) = input.cursor_world else {
        return;
    };
    for (body, controller, mut reticle) in q.iter_mut() {
        let aim = controller.combat.aim(body, cursor);
        reticle.0.follow(aim.reticle());
    }
}

// ── Fixed tick ────────────────────────────────────────────────────────────────

/// Pull the post-step position and contacts back into the `ArcadeBody`.
///
/// Velocity into an obstacle is zeroed: landing clears downward velocity, a
/// wall clears horizontal velocity, a ceiling clears upward velocity.
pub fn body_sync_system(
    mut q: Query<(
        &Transform,
        &mut ArcadeBody,
        Option<&KinematicCharacterControllerOutput>,
    )>,
) {
    for (transform, mut body, output) in q.iter_mut() {
        body.position = transform.translation.truncate();

        let Some(output) = output else {
            continue;
        };
        let desired = output.desired_translation;
        let effective = output.effective_translation;

        // The world floor never reaches Rapier; integration clamps against it.
        let on_world_floor = body.feet_y() <= BLOCK_EPSILON && body.velocity.y <= 0.0;

        body.contacts.touching_down = output.grounded;
        body.contacts.blocked_down = on_world_floor
            || (desired.y < 0.0 && effective.y > desired.y + BLOCK_EPSILON);

        if body.contacts.on_ground() && body.velocity.y < 0.0 {
            body.velocity.y = 0.0;
        }
        if desired.y > 0.0 && effective.y < desired.y - BLOCK_EPSILON {
            body.velocity.y = 0.0;
        }
        if (desired.x - effective.x).abs() > BLOCK_EPSILON {
            body.velocity.x = 0.0;
        }
    }
}

/// Make one-way boxes solid only for a player falling onto them from above
/// with downward collision enabled, and report whether the player stands on
/// one.
pub fn one_way_platform_system(
    mut q_player: Query<(&ArcadeBody, &mut PlayerController), With<Player>>,
    mut q_platforms: Query<(&Platform, &Transform, &mut CollisionGroups)>,
) {
    let Ok((body, mut controller)) = q_player.single_mut() else {
        return;
    };
    let feet = body.feet_y();
    let falling = body.velocity.y <= 0.0;
    let mut standing = false;

    for (platform, transform, mut groups) in q_platforms.iter_mut() {
        if !platform.one_way {
            continue;
        }
        let center = transform.translation.truncate();
        let top = platform.top(center);
        let solid = body.collision.down && falling && feet >= top - ONE_WAY_TOLERANCE;

        let wanted = if solid {
            solid_platform_groups()
        } else {
            passable_platform_groups()
        };
        if groups.memberships != wanted.memberships || groups.filters != wanted.filters {
            *groups = wanted;
        }

        if solid
            && (feet - top).abs() <= ONE_WAY_TOLERANCE
            && platform.overlaps_x(center, body.position, body.half_extents.x)
        {
            standing = true;
        }
    }

    controller.motion.set_standing_on_one_way(standing);
}

/// Run the player controller for one fixed tick and spawn whatever it fired.
pub fn player_control_system(
    mut commands: Commands,
    time: Res<Time>,
    input: Res<InputSnapshot>,
    config: Res<ControllerConfig>,
    mut q: Query<(Entity, &mut ArcadeBody, &mut PlayerController), With<Player>>,
) {
    let Ok((entity, mut body, mut controller)) = q.single_mut() else {
        return;
    };
    let ctx = TickContext::new(time.delta_secs() * 1000.0, time.elapsed_secs_f64() * 1000.0);

    let mut launches: Vec<ProjectileLaunch> = Vec::new();
    let report = controller.tick(entity, &mut *body, &*input, ctx, &mut launches);
    if report.motion.landed {
        debug!("landed at ({:.0}, {:.0})", body.position.x, body.position.y);
    }

    for launch in launches {
        spawn_projectile(&mut commands, launch, config.projectile_collider_radius);
    }
}

/// Integrate every `ArcadeBody` and hand the displacement to Rapier's
/// character controller, clamped to the world bounds.
///
/// The world edges act as walls: velocity into an edge the clamp held the
/// body back from is zeroed, and the floor counts as blocking downward motion.
pub fn body_integrate_system(
    time: Res<Time>,
    bounds: Res<WorldBounds>,
    mut q: Query<(&Transform, &mut ArcadeBody, &mut KinematicCharacterController)>,
) {
    let dt = time.delta_secs();
    for (transform, mut body, mut character) in q.iter_mut() {
        let displacement = body.integrate(dt);
        let wanted = body.position + displacement;
        let target = bounds.clamp_box(wanted, body.half_extents);
        let held_back = wanted - target;

        if held_back.x.abs() > BLOCK_EPSILON && held_back.x * body.velocity.x > 0.0 {
            body.velocity.x = 0.0;
        }
        if held_back.y.abs() > BLOCK_EPSILON && held_back.y * body.velocity.y > 0.0 {
            body.velocity.y = 0.0;
        }
        if held_back.y < -BLOCK_EPSILON {
            body.contacts.blocked_down = true;
        }

        character.translation = Some(target - transform.translation.truncate());
    }
}

pub fn clear_input_edges_system(mut input: ResMut<InputSnapshot>) {
    input.clear_edges();
}
