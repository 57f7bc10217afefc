//! Level geometry, world bounds and training dummies.
//!
//! ## Collision groups
//!
//! | Group     | Members                | Collides with             |
//! |-----------|------------------------|---------------------------|
//! | `GROUP_1` | ground, one-way boxes  | player (boxes: when solid)|
//! | `GROUP_2` | player                 | terrain, projectiles      |
//! | `GROUP_3` | projectiles (sensors)  | player, dummies           |
//! | `GROUP_4` | training dummies       | projectiles               |

use crate::config::ControllerConfig;
use crate::constants::{
    DUMMY_HALF_HEIGHT, DUMMY_HALF_WIDTH, LEVEL_SECTIONS, LEVEL_SECTION_WIDTH, SECTION_BOXES,
    SECTION_DUMMY_X,
};
use crate::health::Health;
use crate::player::TrainingDummy;
use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::prelude::*;

pub const TERRAIN_GROUP: Group = Group::GROUP_1;
pub const PLAYER_GROUP: Group = Group::GROUP_2;
pub const PROJECTILE_GROUP: Group = Group::GROUP_3;
pub const DUMMY_GROUP: Group = Group::GROUP_4;

/// Collision groups for a platform that currently holds the player up.
pub fn solid_platform_groups() -> CollisionGroups {
    CollisionGroups::new(TERRAIN_GROUP, PLAYER_GROUP)
}

/// Collision groups for a one-way platform the player may pass through.
pub fn passable_platform_groups() -> CollisionGroups {
    CollisionGroups::new(TERRAIN_GROUP, Group::NONE)
}

/// Static level geometry.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub half_extents: Vec2,
    /// Solid only from above, and only while the player's downward collision
    /// is enabled.
    pub one_way: bool,
}

impl Platform {
    pub fn top(&self, center: Vec2) -> f32 {
        center.y + self.half_extents.y
    }

    /// Whether the body's feet span this platform horizontally.
    pub fn overlaps_x(&self, center: Vec2, body_center: Vec2, body_half_width: f32) -> bool {
        (body_center.x - center.x).abs() < self.half_extents.x + body_half_width
    }
}

/// Playable rectangle, `(0, 0)` at the bottom-left corner.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            width: config.world_width,
            height: config.world_height,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }

    /// Clamp a box centered at `center` so it stays fully inside the bounds.
    pub fn clamp_box(&self, center: Vec2, half_extents: Vec2) -> Vec2 {
        Vec2::new(
            center.x.clamp(half_extents.x, (self.width - half_extents.x).max(half_extents.x)),
            center.y.clamp(half_extents.y, (self.height - half_extents.y).max(half_extents.y)),
        )
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}

/// Box layout: `(center, half_extents)` of every one-way box standing on the
/// ground.
pub fn level_boxes(ground_height: f32) -> Vec<(Vec2, Vec2)> {
    (0..LEVEL_SECTIONS)
        .flat_map(|section| {
            let offset = section as f32 * LEVEL_SECTION_WIDTH;
            SECTION_BOXES.iter().map(move |&(x, size)| {
                let half = Vec2::splat(size * 0.5);
                (Vec2::new(offset + x, ground_height + half.y), half)
            })
        })
        .collect()
}

/// Startup system: spawn the ground strip and the one-way boxes.
pub fn spawn_level(mut commands: Commands, config: Res<ControllerConfig>) {
    let ground_half = Vec2::new(config.world_width * 0.5, config.ground_height * 0.5);
    commands.spawn((
        Platform {
            half_extents: ground_half,
            one_way: false,
        },
        RigidBody::Fixed,
        Collider::cuboid(ground_half.x, ground_half.y),
        solid_platform_groups(),
        Transform::from_translation(ground_half.extend(0.0)),
    ));

    let boxes = level_boxes(config.ground_height);
    for &(center, half) in &boxes {
        commands.spawn((
            Platform {
                half_extents: half,
                one_way: true,
            },
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y),
            passable_platform_groups(),
            Transform::from_translation(center.extend(0.0)),
        ));
    }

    info!("Level spawned: ground + {} one-way boxes", boxes.len());
}

/// Startup system: one training dummy per level section.
pub fn spawn_dummies(mut commands: Commands, config: Res<ControllerConfig>) {
    for section in 0..LEVEL_SECTIONS {
        let x = section as f32 * LEVEL_SECTION_WIDTH + SECTION_DUMMY_X;
        spawn_dummy(
            &mut commands,
            Vec2::new(x, config.ground_height + DUMMY_HALF_HEIGHT),
            config.dummy_max_hp,
        );
    }
}

pub fn spawn_dummy(commands: &mut Commands, position: Vec2, max_hp: f32) -> Entity {
    commands
        .spawn((
            TrainingDummy,
            Health::new(max_hp),
            RigidBody::Fixed,
            Collider::cuboid(DUMMY_HALF_WIDTH, DUMMY_HALF_HEIGHT),
            CollisionGroups::new(DUMMY_GROUP, PROJECTILE_GROUP),
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}
