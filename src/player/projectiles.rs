//! Projectile entities: spawning, ballistic flight, culling and hits.
//!
//! Projectiles are kinematic Rapier sensors moved by [`projectile_advance_system`];
//! Rapier only reports overlaps.  Damage, friendly-fire exclusion and death
//! handling happen in [`projectile_hit_system`].

use super::state::{Player, TrainingDummy};
use crate::body::ArcadeBody;
use crate::config::ControllerConfig;
use crate::health::{DamageOutcome, Health};
use crate::projectile::{HitOutcome, Projectile, ProjectileLaunch};
use crate::world::{WorldBounds, DUMMY_GROUP, PLAYER_GROUP, PROJECTILE_GROUP};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use std::collections::HashSet;

/// Spawn a projectile entity for `launch`.
///
/// Collision groups:
/// - `GROUP_3`: projectiles belong to this group
/// - overlap the player (`GROUP_2`) and dummies (`GROUP_4`); terrain is ignored
pub fn spawn_projectile(commands: &mut Commands, launch: ProjectileLaunch, radius: f32) -> Entity {
    commands
        .spawn((
            Projectile::from(launch),
            RigidBody::KinematicPositionBased,
            Collider::ball(radius),
            Sensor,
            CollisionGroups::new(PROJECTILE_GROUP, PLAYER_GROUP | DUMMY_GROUP),
            ActiveEvents::COLLISION_EVENTS,
            ActiveCollisionTypes::default()
                | ActiveCollisionTypes::KINEMATIC_KINEMATIC
                | ActiveCollisionTypes::KINEMATIC_STATIC,
            Transform::from_translation(launch.position.extend(1.0))
                .with_rotation(Quat::from_rotation_z(launch.rotation)),
        ))
        .id()
}

/// Apply projectile gravity, move, and face along the flight path.
pub fn projectile_advance_system(
    time: Res<Time>,
    mut q: Query<(&mut Projectile, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (mut projectile, mut transform) in q.iter_mut() {
        let displacement = projectile.advance(dt);
        transform.translation += displacement.extend(0.0);
        transform.rotation = Quat::from_rotation_z(projectile.rotation);
    }
}

/// Despawn projectiles that left the world or outlived their lifetime.
pub fn projectile_cull_system(
    mut commands: Commands,
    bounds: Res<WorldBounds>,
    config: Res<ControllerConfig>,
    q: Query<(Entity, &Projectile, &Transform)>,
) {
    for (entity, projectile, transform) in q.iter() {
        if !bounds.contains(transform.translation.truncate())
            || projectile.age >= config.projectile_lifetime_secs
        {
            commands.entity(entity).despawn();
        }
    }
}

/// Resolve projectile overlaps reported by Rapier.
///
/// A hit on anything other than the shooter that has living [`Health`] applies
/// damage and destroys the projectile.  Dead dummies are removed; a dead player is
/// restored to full health at the spawn point.
#[allow(clippy::type_complexity)]
pub fn projectile_hit_system(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionEvent>,
    config: Res<ControllerConfig>,
    q_projectiles: Query<&Projectile>,
    mut q_targets: Query<(&mut Health, Has<Player>, Has<TrainingDummy>)>,
    mut q_player_body: Query<(&mut Transform, &mut ArcadeBody), With<Player>>,
) {
    let mut spent: HashSet<Entity> = HashSet::new();

    for event in collision_events.read() {
        let (e1, e2) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
            CollisionEvent::Stopped(..) => continue,
        };

        let (proj_entity, target) = if q_projectiles.get(e1).is_ok() {
            (e1, e2)
        } else if q_projectiles.get(e2).is_ok() {
            (e2, e1)
        } else {
            continue;
        };
        if spent.contains(&proj_entity) {
            continue;
        }
        let Ok(projectile) = q_projectiles.get(proj_entity) else {
            continue;
        };

        let (outcome, is_player, is_dummy) = match q_targets.get_mut(target) {
            Ok((mut health, is_player, is_dummy)) => (
                projectile.resolve_hit(target, Some(&mut *health)),
                is_player,
                is_dummy,
            ),
            Err(_) => (projectile.resolve_hit::<Health>(target, None), false, false),
        };

        // A target already dead this tick (awaiting despawn) doesn't stop the projectile.
        let HitOutcome::Hit(result) = outcome else {
            continue;
        };
        if result == DamageOutcome::Ignored {
            continue;
        }
        spent.insert(proj_entity);
        commands.entity(proj_entity).despawn();
        debug!("{:?} hit {:?}: {:?}", projectile.kind, target, result);

        if result != DamageOutcome::Died {
            continue;
        }
        if is_dummy {
            info!("Training dummy {:?} destroyed", target);
            commands.entity(target).despawn();
        } else if is_player {
            respawn_player(target, &config, &mut q_targets, &mut q_player_body);
        }
    }
}

fn respawn_player(
    player: Entity,
    config: &ControllerConfig,
    q_targets: &mut Query<(&mut Health, Has<Player>, Has<TrainingDummy>)>,
    q_player_body: &mut Query<(&mut Transform, &mut ArcadeBody), With<Player>>,
) {
    if let Ok((mut health, ..)) = q_targets.get_mut(player) {
        health.restore();
    }
    let spawn = config.player_spawn();
    if let Ok((mut transform, mut body)) = q_player_body.get_mut(player) {
        transform.translation.x = spawn.x;
        transform.translation.y = spawn.y;
        body.position = spawn;
        body.velocity = Vec2::ZERO;
    }
    info!("Player died; respawned at ({:.0}, {:.0})", spawn.x, spawn.y);
}
