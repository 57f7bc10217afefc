//! Centralised movement, combat and world constants.
//!
//! All tuneable values live here so they can be found and modified in one
//! place.  [`crate::config::ControllerConfig::default`] mirrors every value, and
//! `assets/pilot.toml` can override any subset at startup.
//!
//! Units: distances in world units (pixels at zoom 1), velocities in units per
//! second, durations in milliseconds unless the name says otherwise.

// ── Timing ────────────────────────────────────────────────────────────────────

/// Fixed simulation rate.  Overcap decay is expressed per tick, so changing
/// this changes how quickly a dash bleeds off.
pub const PHYSICS_TICK_HZ: f64 = 120.0;

// ── Player: Body ──────────────────────────────────────────────────────────────

/// Player collision box half-width.
pub const PLAYER_HALF_WIDTH: f32 = 24.0;

/// Player collision box half-height.
pub const PLAYER_HALF_HEIGHT: f32 = 44.0;

/// Spawn point of the player, relative to the world's bottom-left corner.
pub const PLAYER_SPAWN_X: f32 = 700.0;
pub const PLAYER_SPAWN_Y: f32 = 600.0;

/// Downward acceleration applied to the player body.
pub const PLAYER_GRAVITY: f32 = 700.0;

/// Horizontal drag; only applied while no horizontal acceleration is active.
pub const PLAYER_DRAG_X: f32 = 1000.0;

/// Vertical drag.  Zero keeps falls purely ballistic.
pub const PLAYER_DRAG_Y: f32 = 0.0;

/// Starting and maximum hit points.
pub const PLAYER_MAX_HP: f32 = 100.0;

// ── Player: Movement ──────────────────────────────────────────────────────────

/// Baseline per-axis speed cap.
pub const MAX_VELOCITY: f32 = 700.0;

/// Horizontal acceleration while a direction key is held.
pub const ACCELERATION: f32 = 800.0;

/// Velocity applied on jump and while the jump boost lingers.
pub const JUMP_VELOCITY: f32 = 400.0;

/// How long a held jump keeps re-applying [`JUMP_VELOCITY`].
pub const JUMP_BOOST_DURATION_MS: f32 = 200.0;

/// Extra jumps available in the air before landing.
pub const MULTI_JUMP_CHARGES: u32 = 2;

/// When reversing direction faster than this, horizontal speed snaps down to it.
pub const STRAFE_CANCEL_SNAP_VELOCITY: f32 = 100.0;

/// Downward velocity applied when dropping through a one-way platform.
pub const DROP_THROUGH_VELOCITY: f32 = 120.0;

/// Delay before downward collision is re-enabled after releasing "down".
pub const DROP_THROUGH_RECOLLIDE_MS: f32 = 100.0;

// ── Player: Dash ──────────────────────────────────────────────────────────────

/// Dash speed; exceeds [`MAX_VELOCITY`] through the overcap controller.
pub const DASH_VELOCITY: f32 = 1600.0;

/// Dashes available before landing.
pub const DASH_CHARGES: u32 = 2;

/// Time for one spent dash charge to regenerate.  Charges regenerate one at a
/// time; landing restores all of them at once.
pub const DASH_DELAY_MS: f32 = 500.0;

/// Per-tick decrease of an overcapped speed cap.
pub const OVERCAP_DECAY_PER_TICK: f32 = 10.0;

/// How long the player stays tilted toward the dash before easing upright.
pub const DASH_TILT_HOLD_MS: f32 = 60.0;

// ── Aim ───────────────────────────────────────────────────────────────────────

/// Horizontal radius of the aim reticle leash.
pub const AIM_ELLIPSE_RX: f32 = 60.0;

/// Vertical radius of the aim reticle leash.
pub const AIM_ELLIPSE_RY: f32 = 90.0;

/// Fraction of the remaining distance the reticle covers per update.
pub const RETICLE_FOLLOW_SPEED: f32 = 0.8;

// ── Weapons ───────────────────────────────────────────────────────────────────

pub const BOW_ATTACK_INTERVAL_MS: f32 = 450.0;
pub const ARROW_DAMAGE: f32 = 10.0;
pub const ARROW_SPEED: f32 = 1100.0;
/// Arrow sprite length; the arrow spawns with its rear edge at the bow.
pub const ARROW_LENGTH: f32 = 37.0;

pub const SPEAR_ATTACK_INTERVAL_MS: f32 = 900.0;
pub const SPEAR_DAMAGE: f32 = 30.0;
pub const SPEAR_SPEED: f32 = 750.0;
pub const SPEAR_LENGTH: f32 = 121.0;

/// Gravity applied to projectiles in flight.
pub const PROJECTILE_GRAVITY: f32 = 700.0;

/// Seconds before an airborne projectile is culled.
pub const PROJECTILE_LIFETIME_SECS: f32 = 6.0;

/// Collider radius used for projectile hit detection.
pub const PROJECTILE_COLLIDER_RADIUS: f32 = 4.0;

// ── World ─────────────────────────────────────────────────────────────────────

pub const WORLD_WIDTH: f32 = 10000.0;
pub const WORLD_HEIGHT: f32 = 2500.0;

/// Thickness of the solid ground strip.
pub const GROUND_HEIGHT: f32 = 250.0;

/// Feet must be within this distance above a one-way platform top to land on it.
pub const ONE_WAY_TOLERANCE: f32 = 4.0;

pub const DUMMY_MAX_HP: f32 = 60.0;
pub const DUMMY_HALF_WIDTH: f32 = 22.0;
pub const DUMMY_HALF_HEIGHT: f32 = 40.0;

// ── Level layout ──────────────────────────────────────────────────────────────

/// Width of one repeated block of boxes.
pub const LEVEL_SECTION_WIDTH: f32 = 1800.0;
pub const LEVEL_SECTIONS: u32 = 6;
pub const BOX_SMALL_SIZE: f32 = 110.0;
pub const BOX_LARGE_SIZE: f32 = 220.0;

/// Box centers within a section: (x offset, edge length).
pub const SECTION_BOXES: [(f32, f32); 4] = [
    (400.0, BOX_SMALL_SIZE),
    (600.0, BOX_LARGE_SIZE),
    (1200.0, BOX_LARGE_SIZE),
    (1550.0, BOX_SMALL_SIZE),
];

/// Dummy x offset within a section.
pub const SECTION_DUMMY_X: f32 = 900.0;
