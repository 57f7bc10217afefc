//! Headless tests for the fixed-tick player systems.
//!
//! Each test builds a bare [`World`] with no window, renderer or Rapier
//! pipeline, inserts the resources a system reads, and runs the system once
//! with [`RunSystemOnce`].  Rapier's character output and collision messages
//! are written by hand.
//!
//! Covered scenarios:
//! 1. Keyboard presses become input edges; clearing forgets them.
//! 2. Body sync pulls contacts from the character output.
//! 3. Integration requests a translation clamped to the world bounds; the
//!    world edges stop velocity and the floor counts as ground.
//! 4. One-way boxes are solid only from above with downward collision on.
//! 5. An attack press with a cursor spawns a projectile.
//! 6. Projectile hits: shooter immunity, dummy damage and death, player respawn.
//!    A target that already died this tick lets later projectiles through.
//! 7. Projectiles are culled outside the world and after their lifetime.

use bevy::ecs::message::Messages;
use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;
use pilot::body::ArcadeBody;
use pilot::config::ControllerConfig;
use pilot::health::Health;
use pilot::input::{Action, ControlInput, InputSnapshot};
use pilot::player::{
    body_integrate_system, body_sync_system, clear_input_edges_system, keyboard_to_input_system,
    one_way_platform_system, player_control_system, projectile_cull_system,
    projectile_hit_system, spawn_projectile, Player, PlayerController, TrainingDummy,
};
use pilot::projectile::{Projectile, ProjectileLaunch};
use pilot::weapon::ProjectileKind;
use pilot::world::{passable_platform_groups, solid_platform_groups, Platform, WorldBounds};
use std::time::Duration;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn tick_time(ms: u64) -> Time {
    let mut time = Time::<()>::default();
    time.advance_by(Duration::from_millis(ms));
    time
}

/// World with config, bounds, input and an 8 ms clock.
fn base_world() -> World {
    let mut world = World::new();
    world.insert_resource(ControllerConfig::default());
    world.insert_resource(WorldBounds::default());
    world.insert_resource(InputSnapshot::default());
    world.insert_resource(tick_time(8));
    world.init_resource::<Messages<CollisionEvent>>();
    world
}

fn spawn_test_player(world: &mut World, position: Vec2) -> Entity {
    let config = ControllerConfig::default();
    let half = Vec2::new(config.player_half_width, config.player_half_height);
    world
        .spawn((
            Player,
            PlayerController::from_config(&config),
            ArcadeBody::new(position, half).with_max_speed(config.max_velocity),
            Health::new(config.player_max_hp),
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}

fn launch(shooter: Entity, position: Vec2) -> ProjectileLaunch {
    ProjectileLaunch {
        kind: ProjectileKind::Arrow,
        position,
        velocity: Vec2::new(500.0, 0.0),
        rotation: 0.0,
        damage: 25.0,
        gravity: 0.0,
        length: 37.0,
        shooter,
    }
}

fn spawn_test_projectile(world: &mut World, launch: ProjectileLaunch) -> Entity {
    world
        .run_system_once(move |mut commands: Commands| spawn_projectile(&mut commands, launch, 4.0))
        .expect("spawn system runs")
}

fn hit(world: &mut World, projectile: Entity, target: Entity) {
    world
        .resource_mut::<Messages<CollisionEvent>>()
        .write(CollisionEvent::Started(projectile, target, CollisionEventFlags::SENSOR));
    world
        .run_system_once(projectile_hit_system)
        .expect("hit system runs");
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[test]
fn key_press_becomes_edge_until_cleared() {
    let mut world = base_world();
    let mut keys = ButtonInput::<KeyCode>::default();
    keys.press(KeyCode::Space);
    keys.press(KeyCode::KeyA);
    world.insert_resource(keys);
    world.insert_resource(ButtonInput::<MouseButton>::default());

    world.run_system_once(keyboard_to_input_system).unwrap();
    let input = *world.resource::<InputSnapshot>();
    assert!(input.just_pressed(Action::Jump));
    assert!(input.held(Action::Left));
    assert!(!input.held(Action::Right));

    world.run_system_once(clear_input_edges_system).unwrap();
    let input = *world.resource::<InputSnapshot>();
    assert!(!input.just_pressed(Action::Jump));
    assert!(input.held(Action::Jump), "clearing edges keeps held state");
}

// ── Body sync / integration ───────────────────────────────────────────────────

#[test]
fn sync_reads_ground_contact_and_stops_fall() {
    let mut world = base_world();
    let mut body = ArcadeBody::new(Vec2::ZERO, Vec2::new(24.0, 44.0));
    body.velocity = Vec2::new(50.0, -300.0);
    let entity = world
        .spawn((
            body,
            Transform::from_xyz(120.0, 340.0, 0.0),
            KinematicCharacterControllerOutput {
                grounded: true,
                desired_translation: Vec2::new(0.5, -2.5),
                effective_translation: Vec2::new(0.5, 0.0),
                ..Default::default()
            },
        ))
        .id();

    world.run_system_once(body_sync_system).unwrap();
    let body = world.get::<ArcadeBody>(entity).unwrap();
    assert_eq!(body.position, Vec2::new(120.0, 340.0));
    assert!(body.contacts.touching_down);
    assert!(body.contacts.blocked_down);
    assert_eq!(body.velocity, Vec2::new(50.0, 0.0));
}

#[test]
fn sync_clears_velocity_into_wall() {
    let mut world = base_world();
    let mut body = ArcadeBody::new(Vec2::ZERO, Vec2::new(24.0, 44.0));
    body.velocity = Vec2::new(400.0, 0.0);
    let entity = world
        .spawn((
            body,
            Transform::from_xyz(300.0, 300.0, 0.0),
            KinematicCharacterControllerOutput {
                grounded: false,
                desired_translation: Vec2::new(3.0, 0.0),
                effective_translation: Vec2::new(1.0, 0.0),
                ..Default::default()
            },
        ))
        .id();

    world.run_system_once(body_sync_system).unwrap();
    let body = world.get::<ArcadeBody>(entity).unwrap();
    assert_eq!(body.velocity.x, 0.0);
    assert!(!body.contacts.on_ground());
}

#[test]
fn integrate_requests_translation_within_bounds() {
    let mut world = base_world();
    world.insert_resource(tick_time(100));
    world.insert_resource(WorldBounds {
        width: 1000.0,
        height: 1000.0,
    });

    let mut free = ArcadeBody::new(Vec2::new(500.0, 500.0), Vec2::new(20.0, 40.0));
    free.velocity = Vec2::new(100.0, 0.0);
    let free = world
        .spawn((
            free,
            Transform::from_xyz(500.0, 500.0, 0.0),
            KinematicCharacterController::default(),
        ))
        .id();

    let mut edge = ArcadeBody::new(Vec2::new(25.0, 500.0), Vec2::new(20.0, 40.0));
    edge.velocity = Vec2::new(-100.0, 0.0);
    let edge = world
        .spawn((
            edge,
            Transform::from_xyz(25.0, 500.0, 0.0),
            KinematicCharacterController::default(),
        ))
        .id();

    world.run_system_once(body_integrate_system).unwrap();

    let t = world
        .get::<KinematicCharacterController>(free)
        .unwrap()
        .translation
        .unwrap();
    assert!((t - Vec2::new(10.0, 0.0)).length() < 1e-4);

    let t = world
        .get::<KinematicCharacterController>(edge)
        .unwrap()
        .translation
        .unwrap();
    assert!((t - Vec2::new(-5.0, 0.0)).length() < 1e-4, "clamped at x = 20");
    assert_eq!(world.get::<ArcadeBody>(edge).unwrap().velocity.x, 0.0);
    assert_eq!(world.get::<ArcadeBody>(free).unwrap().velocity.x, 100.0);
}

#[test]
fn world_floor_and_ceiling_stop_the_body() {
    let mut world = base_world();
    world.insert_resource(tick_time(100));
    world.insert_resource(WorldBounds {
        width: 1000.0,
        height: 1000.0,
    });

    let mut falling = ArcadeBody::new(Vec2::new(500.0, 42.0), Vec2::new(20.0, 40.0));
    falling.velocity = Vec2::new(0.0, -300.0);
    let falling = world
        .spawn((
            falling,
            Transform::from_xyz(500.0, 42.0, 0.0),
            KinematicCharacterController::default(),
            KinematicCharacterControllerOutput::default(),
        ))
        .id();

    let mut rising = ArcadeBody::new(Vec2::new(500.0, 950.0), Vec2::new(20.0, 40.0));
    rising.velocity = Vec2::new(0.0, 900.0);
    let rising = world
        .spawn((
            rising,
            Transform::from_xyz(500.0, 950.0, 0.0),
            KinematicCharacterController::default(),
        ))
        .id();

    world.run_system_once(body_integrate_system).unwrap();

    let body = world.get::<ArcadeBody>(falling).unwrap();
    assert_eq!(body.velocity.y, 0.0);
    assert!(body.contacts.blocked_down, "world floor blocks the fall");
    let body = world.get::<ArcadeBody>(rising).unwrap();
    assert_eq!(body.velocity.y, 0.0);
    assert!(!body.contacts.blocked_down);

    // The clamped move lands the body on the floor; the next sync keeps the
    // contact even though Rapier saw no obstruction.
    world
        .get_mut::<Transform>(falling)
        .unwrap()
        .translation
        .y = 40.0;
    world.run_system_once(body_sync_system).unwrap();
    let body = world.get::<ArcadeBody>(falling).unwrap();
    assert!(body.contacts.on_ground());
}

// ── One-way platforms ─────────────────────────────────────────────────────────

fn spawn_box(world: &mut World, center: Vec2, half: Vec2) -> Entity {
    world
        .spawn((
            Platform {
                half_extents: half,
                one_way: true,
            },
            Transform::from_translation(center.extend(0.0)),
            passable_platform_groups(),
        ))
        .id()
}

fn has_groups(world: &World, entity: Entity, expected: CollisionGroups) -> bool {
    let groups = world.get::<CollisionGroups>(entity).unwrap();
    groups.memberships == expected.memberships && groups.filters == expected.filters
}

#[test]
fn one_way_box_holds_player_landing_from_above() {
    let mut world = base_world();
    let platform = spawn_box(&mut world, Vec2::new(500.0, 300.0), Vec2::new(100.0, 50.0));
    // Feet exactly on the box top (350).
    let player = spawn_test_player(&mut world, Vec2::new(500.0, 394.0));

    world.run_system_once(one_way_platform_system).unwrap();
    assert!(has_groups(&world, platform, solid_platform_groups()));
    assert!(world
        .get::<PlayerController>(player)
        .unwrap()
        .motion
        .standing_on_one_way());
}

#[test]
fn one_way_box_is_passable_from_below_and_while_dropping() {
    let mut world = base_world();
    let platform = spawn_box(&mut world, Vec2::new(500.0, 300.0), Vec2::new(100.0, 50.0));
    let player = spawn_test_player(&mut world, Vec2::new(500.0, 330.0));

    world.run_system_once(one_way_platform_system).unwrap();
    assert!(has_groups(&world, platform, passable_platform_groups()));

    // On top, but downward collision disabled.
    {
        let mut body = world.get_mut::<ArcadeBody>(player).unwrap();
        body.position.y = 394.0;
        body.collision.down = false;
    }
    world.run_system_once(one_way_platform_system).unwrap();
    assert!(has_groups(&world, platform, passable_platform_groups()));
    assert!(!world
        .get::<PlayerController>(player)
        .unwrap()
        .motion
        .standing_on_one_way());
}

#[test]
fn rising_player_passes_through_box() {
    let mut world = base_world();
    let platform = spawn_box(&mut world, Vec2::new(500.0, 300.0), Vec2::new(100.0, 50.0));
    let player = spawn_test_player(&mut world, Vec2::new(500.0, 396.0));
    world.get_mut::<ArcadeBody>(player).unwrap().velocity.y = 200.0;

    world.run_system_once(one_way_platform_system).unwrap();
    assert!(has_groups(&world, platform, passable_platform_groups()));
}

// ── Control tick ──────────────────────────────────────────────────────────────

#[test]
fn attack_press_spawns_projectile_from_player() {
    let mut world = base_world();
    let player = spawn_test_player(&mut world, Vec2::new(700.0, 400.0));
    {
        let mut input = world.resource_mut::<InputSnapshot>();
        input.press(Action::Attack);
        input.cursor_world = Some(Vec2::new(1200.0, 400.0));
    }

    world.run_system_once(player_control_system).unwrap();

    let mut q = world.query::<&Projectile>();
    let projectiles: Vec<&Projectile> = q.iter(&world).collect();
    assert_eq!(projectiles.len(), 1);
    assert_eq!(projectiles[0].shooter, player);
    assert_eq!(projectiles[0].kind, ProjectileKind::Arrow);
    assert!(projectiles[0].velocity.x > 0.0);
}

#[test]
fn jump_press_launches_grounded_player() {
    let mut world = base_world();
    let player = spawn_test_player(&mut world, Vec2::new(700.0, 400.0));
    world
        .get_mut::<ArcadeBody>(player)
        .unwrap()
        .contacts
        .touching_down = true;
    world.resource_mut::<InputSnapshot>().press(Action::Jump);

    world.run_system_once(player_control_system).unwrap();
    let config = ControllerConfig::default();
    assert_eq!(
        world.get::<ArcadeBody>(player).unwrap().velocity.y,
        config.jump_velocity
    );
}

// ── Projectile hits ───────────────────────────────────────────────────────────

#[test]
fn shooter_is_immune_to_own_projectile() {
    let mut world = base_world();
    let player = spawn_test_player(&mut world, Vec2::new(700.0, 400.0));
    let projectile = spawn_test_projectile(&mut world, launch(player, Vec2::new(700.0, 400.0)));

    hit(&mut world, projectile, player);
    assert!(world.get_entity(projectile).is_ok(), "projectile survives");
    assert_eq!(world.get::<Health>(player).unwrap().hp, 100.0);
}

#[test]
fn dummy_takes_damage_then_dies() {
    let mut world = base_world();
    let shooter = spawn_test_player(&mut world, Vec2::new(100.0, 400.0));
    let dummy = world
        .spawn((
            TrainingDummy,
            Health::new(40.0),
            Transform::from_xyz(800.0, 300.0, 0.0),
        ))
        .id();

    let first = spawn_test_projectile(&mut world, launch(shooter, Vec2::new(780.0, 300.0)));
    hit(&mut world, first, dummy);
    assert!(world.get_entity(first).is_err(), "projectile destroyed on hit");
    assert_eq!(world.get::<Health>(dummy).unwrap().hp, 15.0);

    let second = spawn_test_projectile(&mut world, launch(shooter, Vec2::new(780.0, 300.0)));
    hit(&mut world, second, dummy);
    assert!(world.get_entity(dummy).is_err(), "dead dummy is removed");
}

#[test]
fn second_projectile_flies_past_dummy_killed_same_tick() {
    let mut world = base_world();
    let shooter = spawn_test_player(&mut world, Vec2::new(100.0, 400.0));
    let dummy = world
        .spawn((
            TrainingDummy,
            Health::new(25.0),
            Transform::from_xyz(800.0, 300.0, 0.0),
        ))
        .id();
    let first = spawn_test_projectile(&mut world, launch(shooter, Vec2::new(780.0, 300.0)));
    let second = spawn_test_projectile(&mut world, launch(shooter, Vec2::new(770.0, 300.0)));

    {
        let mut messages = world.resource_mut::<Messages<CollisionEvent>>();
        messages.write(CollisionEvent::Started(first, dummy, CollisionEventFlags::SENSOR));
        messages.write(CollisionEvent::Started(second, dummy, CollisionEventFlags::SENSOR));
    }
    world
        .run_system_once(projectile_hit_system)
        .expect("hit system runs");

    assert!(world.get_entity(first).is_err());
    assert!(world.get_entity(dummy).is_err(), "dead dummy is removed");
    assert!(world.get_entity(second).is_ok(), "no damage dealt, projectile keeps flying");
}

#[test]
fn projectile_ignores_targets_without_health() {
    let mut world = base_world();
    let shooter = spawn_test_player(&mut world, Vec2::new(100.0, 400.0));
    let wall = world.spawn(Transform::default()).id();
    let projectile = spawn_test_projectile(&mut world, launch(shooter, Vec2::new(300.0, 400.0)));

    hit(&mut world, projectile, wall);
    assert!(world.get_entity(projectile).is_ok());
}

#[test]
fn killed_player_respawns_at_full_health() {
    let mut world = base_world();
    let enemy = world.spawn_empty().id();
    let player = spawn_test_player(&mut world, Vec2::new(3000.0, 900.0));
    world.get_mut::<Health>(player).unwrap().hp = 10.0;
    world.get_mut::<ArcadeBody>(player).unwrap().velocity = Vec2::new(300.0, -200.0);

    let projectile = spawn_test_projectile(&mut world, launch(enemy, Vec2::new(3000.0, 900.0)));
    hit(&mut world, projectile, player);

    let spawn = ControllerConfig::default().player_spawn();
    let health = world.get::<Health>(player).unwrap();
    assert_eq!(health.hp, health.max_hp);
    let body = world.get::<ArcadeBody>(player).unwrap();
    assert_eq!(body.position, spawn);
    assert_eq!(body.velocity, Vec2::ZERO);
    assert_eq!(
        world.get::<Transform>(player).unwrap().translation.truncate(),
        spawn
    );
}

// ── Culling ───────────────────────────────────────────────────────────────────

#[test]
fn projectiles_culled_outside_world_or_when_old() {
    let mut world = base_world();
    let shooter = world.spawn_empty().id();
    let inside = spawn_test_projectile(&mut world, launch(shooter, Vec2::new(500.0, 500.0)));
    let outside = spawn_test_projectile(&mut world, launch(shooter, Vec2::new(-10.0, 500.0)));
    let old = spawn_test_projectile(&mut world, launch(shooter, Vec2::new(600.0, 500.0)));
    world.get_mut::<Projectile>(old).unwrap().age = 100.0;

    world.run_system_once(projectile_cull_system).unwrap();
    assert!(world.get_entity(inside).is_ok());
    assert!(world.get_entity(outside).is_err());
    assert!(world.get_entity(old).is_err());
}
