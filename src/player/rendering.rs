//! Gizmo rendering for the player, projectiles and level, plus the camera
//! follow system.
//!
//! ## Layers
//!
//! | Layer                  | Drawn by                   |
//! |------------------------|----------------------------|
//! | Player box (dash tilt) | [`player_gizmo_system`]    |
//! | Aim reticle            | [`player_gizmo_system`]    |
//! | Health / cooldown bars | [`player_gizmo_system`]    |
//! | Dash charge dots       | [`player_gizmo_system`]    |
//! | Projectiles            | [`projectile_gizmo_system`]|
//! | Platforms, dummies     | [`world_gizmo_system`]     |

use super::state::{AimReticle, Player, PlayerController, TrainingDummy};
use crate::body::ArcadeBody;
use crate::health::Health;
use crate::projectile::Projectile;
use crate::weapon::ProjectileKind;
use crate::world::{Platform, WorldBounds};
use bevy::prelude::*;

const BAR_HALF_WIDTH: f32 = 30.0;
const BAR_GAP: f32 = 14.0;
const DOT_SPACING: f32 = 12.0;

/// Outline of a `half`-sized box centered at `center`, rotated by `angle`.
fn draw_box(gizmos: &mut Gizmos, center: Vec2, half: Vec2, angle: f32, color: Color) {
    let rot = Vec2::from_angle(angle);
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|c| center + rot.rotate(c));
    for i in 0..corners.len() {
        gizmos.line_2d(corners[i], corners[(i + 1) % corners.len()], color);
    }
}

/// Horizontal bar: dark track plus a fill of `fraction` of the width.
fn draw_bar(gizmos: &mut Gizmos, left: Vec2, fraction: f32, track: Color, fill: Color) {
    let end_full = left + Vec2::new(BAR_HALF_WIDTH * 2.0, 0.0);
    gizmos.line_2d(left, end_full, track);
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction > 0.0 {
        gizmos.line_2d(left, left + Vec2::new(BAR_HALF_WIDTH * 2.0 * fraction, 0.0), fill);
    }
}

fn health_color(fraction: f32) -> Color {
    Color::srgb(1.0 - fraction, fraction, 0.0)
}

pub fn player_gizmo_system(
    mut gizmos: Gizmos,
    q_player: Query<(&ArcadeBody, &PlayerController, &Health, Option<&AimReticle>), With<Player>>,
) {
    let Ok((body, controller, health, reticle)) = q_player.single() else {
        return;
    };
    let pos = body.position;
    let half = body.half_extents;

    // ── Body ──────────────────────────────────────────────────────────────────
    let body_color = if body.collision.down {
        Color::srgb(0.3, 0.8, 1.0)
    } else {
        // Dropping through a one-way box.
        Color::srgb(0.3, 0.5, 0.7)
    };
    draw_box(
        &mut gizmos,
        pos,
        half,
        controller.motion.tilt().angle(),
        body_color,
    );

    // ── Reticle ───────────────────────────────────────────────────────────────
    if let Some(reticle) = reticle {
        let p = reticle.0.position;
        let color = Color::srgb(1.0, 0.5, 0.0);
        gizmos.circle_2d(p, 6.0, color);
        let toward_origin = Vec2::from_angle(reticle.0.rotation_toward(pos) - std::f32::consts::FRAC_PI_2);
        gizmos.line_2d(p, p + toward_origin * 10.0, color);
    }

    // ── Bars ──────────────────────────────────────────────────────────────────
    let bar_left = pos + Vec2::new(-BAR_HALF_WIDTH, half.y + BAR_GAP * 2.0);
    let fraction = health.fraction();
    draw_bar(
        &mut gizmos,
        bar_left,
        fraction,
        Color::srgba(0.4, 0.0, 0.0, 0.8),
        health_color(fraction),
    );

    if controller.combat.equipped().is_some() {
        let cooldown = controller.combat.cooldown();
        let fill = if cooldown.is_ready() {
            Color::srgb(0.9, 0.9, 0.9)
        } else {
            Color::srgb(0.6, 0.6, 0.2)
        };
        draw_bar(
            &mut gizmos,
            bar_left - Vec2::new(0.0, BAR_GAP * 0.5),
            cooldown.display_fill(),
            Color::srgba(0.2, 0.2, 0.2, 0.8),
            fill,
        );
    }

    // ── Dash charges ──────────────────────────────────────────────────────────
    let dashes = controller.motion.dashes();
    if let (Some(capacity), Some(available)) = (dashes.capacity(), dashes.available()) {
        let row = pos + Vec2::new(-(capacity as f32 - 1.0) * DOT_SPACING * 0.5, half.y + BAR_GAP * 3.0);
        for i in 0..capacity {
            let p = row + Vec2::new(i as f32 * DOT_SPACING, 0.0);
            if i < available {
                gizmos.circle_2d(p, 3.5, Color::srgb(0.4, 0.9, 1.0));
            } else {
                gizmos.circle_2d(p, 3.5, Color::srgba(0.4, 0.4, 0.4, 0.8));
                if i == available {
                    // Regeneration progress of the next charge.
                    let r = 3.5 * dashes.recharge_progress();
                    if r > 0.0 {
                        gizmos.circle_2d(p, r, Color::srgb(0.4, 0.9, 1.0));
                    }
                }
            }
        }
    }
}

pub fn projectile_gizmo_system(mut gizmos: Gizmos, q: Query<(&Projectile, &Transform)>) {
    for (projectile, transform) in q.iter() {
        let center = transform.translation.truncate();
        let half = Vec2::from_angle(projectile.rotation) * projectile.length * 0.5;
        let color = match projectile.kind {
            ProjectileKind::Arrow => Color::srgb(1.0, 0.9, 0.2),
            ProjectileKind::Spear => Color::srgb(0.9, 0.9, 0.9),
        };
        gizmos.line_2d(center - half, center + half, color);
        gizmos.circle_2d(center + half, 2.0, color);
    }
}

pub fn world_gizmo_system(
    mut gizmos: Gizmos,
    q_platforms: Query<(&Platform, &Transform)>,
    q_dummies: Query<(&Transform, &Health), With<TrainingDummy>>,
) {
    for (platform, transform) in q_platforms.iter() {
        let color = if platform.one_way {
            Color::srgb(0.7, 0.5, 0.3)
        } else {
            Color::srgb(0.3, 0.6, 0.3)
        };
        draw_box(
            &mut gizmos,
            transform.translation.truncate(),
            platform.half_extents,
            0.0,
            color,
        );
    }

    for (transform, health) in q_dummies.iter() {
        let pos = transform.translation.truncate();
        let half = Vec2::new(crate::constants::DUMMY_HALF_WIDTH, crate::constants::DUMMY_HALF_HEIGHT);
        draw_box(&mut gizmos, pos, half, 0.0, Color::srgb(0.9, 0.3, 0.3));
        let fraction = health.fraction();
        draw_bar(
            &mut gizmos,
            pos + Vec2::new(-BAR_HALF_WIDTH, half.y + BAR_GAP),
            fraction,
            Color::srgba(0.4, 0.0, 0.0, 0.8),
            health_color(fraction),
        );
    }
}

// ── Camera ─────────────────────────────────────────────────────────────────────

/// Keep the camera centred on the player, clamped so the view never shows
/// anything outside the world bounds.
///
/// Camera Z is preserved (used internally by Bevy for rendering order).
pub fn camera_follow_system(
    bounds: Res<WorldBounds>,
    q_player: Query<&Transform, With<Player>>,
    mut q_camera: Query<(&Camera, &mut Transform), Without<Player>>,
) {
    let Ok(player_transform) = q_player.single() else {
        return;
    };
    let Ok((camera, mut cam)) = q_camera.single_mut() else {
        return;
    };

    let half_view = camera
        .logical_viewport_size()
        .map(|size| size * 0.5)
        .unwrap_or(Vec2::ZERO);
    let target = player_transform.translation.truncate();
    cam.translation.x = clamp_axis(target.x, half_view.x, bounds.width);
    cam.translation.y = clamp_axis(target.y, half_view.y, bounds.height);
}

/// Clamp a view center so `[center - half, center + half]` stays inside
/// `[0, extent]`; a view wider than the world is centered.
fn clamp_axis(center: f32, half: f32, extent: f32) -> f32 {
    if half * 2.0 >= extent {
        extent * 0.5
    } else {
        center.clamp(half, extent - half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_axis_clamps_to_world() {
        assert_eq!(clamp_axis(100.0, 600.0, 10000.0), 600.0);
        assert_eq!(clamp_axis(9900.0, 600.0, 10000.0), 9400.0);
        assert_eq!(clamp_axis(5000.0, 600.0, 10000.0), 5000.0);
        assert_eq!(clamp_axis(5000.0, 600.0, 800.0), 400.0);
    }
}
