//! Runtime controller configuration loaded from `assets/pilot.toml`.
//!
//! [`ControllerConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_controller_config`] reads
//! `assets/pilot.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about:
//!
//! ```toml
//! dash_charges = 3
//! dash_delay_ms = 350.0
//! weapon_slots = ["spear", "bow"]
//! ```
//!
//! A file that fails to parse or validate is reported with `warn!` and the
//! defaults stay in place.

use crate::aim::{AimAnchor, AimEllipse};
use crate::constants::*;
use crate::error::{
    validate_non_negative, validate_positive, validate_unit_interval, ConfigError, ConfigResult,
};
use crate::player::motion::MotionConfig;
use crate::weapon::{Arsenal, ProjectileKind, ProjectileSpec, Weapon, WeaponId};
use bevy::prelude::*;
use serde::Deserialize;

/// Default location of the override file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/pilot.toml";

/// Runtime-tunable movement, combat and world configuration.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // ── World ─────────────────────────────────────────────────────────────────
    pub world_width: f32,
    pub world_height: f32,
    pub ground_height: f32,

    // ── Player: Body ──────────────────────────────────────────────────────────
    pub player_half_width: f32,
    pub player_half_height: f32,
    pub player_spawn_x: f32,
    pub player_spawn_y: f32,
    pub player_gravity: f32,
    pub player_drag_x: f32,
    pub player_drag_y: f32,
    pub player_max_hp: f32,

    // ── Player: Movement ──────────────────────────────────────────────────────
    pub max_velocity: f32,
    pub acceleration: f32,
    pub jump_velocity: f32,
    pub jump_boost_duration_ms: f32,
    pub multi_jump_charges: u32,
    pub unlimited_multi_jumps: bool,
    pub strafe_cancel_snap_velocity: f32,
    pub drop_through_velocity: f32,
    pub drop_through_recollide_ms: f32,

    // ── Player: Dash ──────────────────────────────────────────────────────────
    pub dash_velocity: f32,
    pub dash_charges: u32,
    pub unlimited_dashes: bool,
    pub dash_delay_ms: f32,
    /// Refuse to dash until the previous dash's overcap has fully decayed.
    pub lock_dash_while_overcapped: bool,
    pub overcap_decay_per_tick: f32,
    pub dash_tilt_hold_ms: f32,

    // ── Aim ───────────────────────────────────────────────────────────────────
    pub aim_ellipse_rx: f32,
    pub aim_ellipse_ry: f32,
    pub reticle_follow_speed: f32,

    // ── Weapons ───────────────────────────────────────────────────────────────
    pub bow_attack_interval_ms: f32,
    pub arrow_damage: f32,
    pub arrow_speed: f32,
    pub arrow_length: f32,
    pub spear_attack_interval_ms: f32,
    pub spear_damage: f32,
    pub spear_speed: f32,
    pub spear_length: f32,
    pub projectile_gravity: f32,
    pub projectile_lifetime_secs: f32,
    pub projectile_collider_radius: f32,
    /// Weapon bound to each weapon-select key, in key order.  Keys beyond the
    /// end of the list select nothing.
    pub weapon_slots: Vec<WeaponId>,
    pub starting_weapon: Option<WeaponId>,

    // ── Training dummies ──────────────────────────────────────────────────────
    pub dummy_max_hp: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // World
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            ground_height: GROUND_HEIGHT,
            // Player: Body
            player_half_width: PLAYER_HALF_WIDTH,
            player_half_height: PLAYER_HALF_HEIGHT,
            player_spawn_x: PLAYER_SPAWN_X,
            player_spawn_y: PLAYER_SPAWN_Y,
            player_gravity: PLAYER_GRAVITY,
            player_drag_x: PLAYER_DRAG_X,
            player_drag_y: PLAYER_DRAG_Y,
            player_max_hp: PLAYER_MAX_HP,
            // Player: Movement
            max_velocity: MAX_VELOCITY,
            acceleration: ACCELERATION,
            jump_velocity: JUMP_VELOCITY,
            jump_boost_duration_ms: JUMP_BOOST_DURATION_MS,
            multi_jump_charges: MULTI_JUMP_CHARGES,
            unlimited_multi_jumps: false,
            strafe_cancel_snap_velocity: STRAFE_CANCEL_SNAP_VELOCITY,
            drop_through_velocity: DROP_THROUGH_VELOCITY,
            drop_through_recollide_ms: DROP_THROUGH_RECOLLIDE_MS,
            // Player: Dash
            dash_velocity: DASH_VELOCITY,
            dash_charges: DASH_CHARGES,
            unlimited_dashes: false,
            dash_delay_ms: DASH_DELAY_MS,
            lock_dash_while_overcapped: false,
            overcap_decay_per_tick: OVERCAP_DECAY_PER_TICK,
            dash_tilt_hold_ms: DASH_TILT_HOLD_MS,
            // Aim
            aim_ellipse_rx: AIM_ELLIPSE_RX,
            aim_ellipse_ry: AIM_ELLIPSE_RY,
            reticle_follow_speed: RETICLE_FOLLOW_SPEED,
            // Weapons
            bow_attack_interval_ms: BOW_ATTACK_INTERVAL_MS,
            arrow_damage: ARROW_DAMAGE,
            arrow_speed: ARROW_SPEED,
            arrow_length: ARROW_LENGTH,
            spear_attack_interval_ms: SPEAR_ATTACK_INTERVAL_MS,
            spear_damage: SPEAR_DAMAGE,
            spear_speed: SPEAR_SPEED,
            spear_length: SPEAR_LENGTH,
            projectile_gravity: PROJECTILE_GRAVITY,
            projectile_lifetime_secs: PROJECTILE_LIFETIME_SECS,
            projectile_collider_radius: PROJECTILE_COLLIDER_RADIUS,
            weapon_slots: vec![WeaponId::Bow, WeaponId::Spear],
            starting_weapon: Some(WeaponId::Bow),
            // Training dummies
            dummy_max_hp: DUMMY_MAX_HP,
        }
    }
}

impl ControllerConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(path: &str, contents: &str) -> ConfigResult<Self> {
        let config: ControllerConfig = toml::from_str(contents).map_err(|source| {
            ConfigError::Parse {
                path: path.to_string(),
                source,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controllers cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_positive("world_width", self.world_width)?;
        validate_positive("world_height", self.world_height)?;
        validate_non_negative("ground_height", self.ground_height)?;
        validate_positive("player_half_width", self.player_half_width)?;
        validate_positive("player_half_height", self.player_half_height)?;
        validate_non_negative("player_gravity", self.player_gravity)?;
        validate_non_negative("player_drag_x", self.player_drag_x)?;
        validate_non_negative("player_drag_y", self.player_drag_y)?;
        validate_positive("player_max_hp", self.player_max_hp)?;
        validate_non_negative("max_velocity", self.max_velocity)?;
        validate_non_negative("acceleration", self.acceleration)?;
        validate_non_negative("jump_velocity", self.jump_velocity)?;
        validate_non_negative("jump_boost_duration_ms", self.jump_boost_duration_ms)?;
        validate_non_negative(
            "strafe_cancel_snap_velocity",
            self.strafe_cancel_snap_velocity,
        )?;
        validate_non_negative("drop_through_velocity", self.drop_through_velocity)?;
        validate_non_negative("drop_through_recollide_ms", self.drop_through_recollide_ms)?;
        validate_non_negative("dash_velocity", self.dash_velocity)?;
        validate_non_negative("dash_delay_ms", self.dash_delay_ms)?;
        validate_non_negative("overcap_decay_per_tick", self.overcap_decay_per_tick)?;
        validate_non_negative("dash_tilt_hold_ms", self.dash_tilt_hold_ms)?;
        validate_positive("aim_ellipse_rx", self.aim_ellipse_rx)?;
        validate_positive("aim_ellipse_ry", self.aim_ellipse_ry)?;
        validate_unit_interval("reticle_follow_speed", self.reticle_follow_speed)?;
        validate_non_negative("bow_attack_interval_ms", self.bow_attack_interval_ms)?;
        validate_non_negative("spear_attack_interval_ms", self.spear_attack_interval_ms)?;
        validate_non_negative("arrow_damage", self.arrow_damage)?;
        validate_non_negative("spear_damage", self.spear_damage)?;
        validate_positive("projectile_lifetime_secs", self.projectile_lifetime_secs)?;
        validate_positive("projectile_collider_radius", self.projectile_collider_radius)?;
        validate_positive("dummy_max_hp", self.dummy_max_hp)?;
        if let Some(weapon) = self.starting_weapon {
            if !self.weapon_slots.contains(&weapon) {
                return Err(ConfigError::UnknownWeapon {
                    weapon: format!("{weapon:?}").to_lowercase(),
                });
            }
        }
        Ok(())
    }

    pub fn motion_config(&self) -> MotionConfig {
        MotionConfig {
            acceleration: self.acceleration,
            max_velocity: self.max_velocity,
            jump_velocity: self.jump_velocity,
            jump_boost_duration_ms: self.jump_boost_duration_ms,
            multi_jump_charges: (!self.unlimited_multi_jumps).then_some(self.multi_jump_charges),
            strafe_cancel_snap_velocity: self.strafe_cancel_snap_velocity,
            drop_through_velocity: self.drop_through_velocity,
            drop_through_recollide_ms: self.drop_through_recollide_ms,
            dash_velocity: self.dash_velocity,
            dash_charges: (!self.unlimited_dashes).then_some(self.dash_charges),
            dash_delay_ms: self.dash_delay_ms,
            lock_dash_while_overcapped: self.lock_dash_while_overcapped,
            overcap_decay_per_tick: self.overcap_decay_per_tick,
            dash_tilt_hold_ms: self.dash_tilt_hold_ms,
            tick_ms: (1000.0 / PHYSICS_TICK_HZ) as f32,
        }
    }

    pub fn aim_ellipse(&self) -> AimEllipse {
        AimEllipse::new(self.aim_ellipse_rx, self.aim_ellipse_ry)
    }

    pub fn arsenal(&self) -> Arsenal {
        Arsenal::new(vec![
            Weapon {
                id: WeaponId::Bow,
                attack_interval_ms: self.bow_attack_interval_ms,
                anchor: AimAnchor::Center,
                projectile: ProjectileSpec {
                    kind: ProjectileKind::Arrow,
                    damage: self.arrow_damage,
                    speed: self.arrow_speed,
                    length: self.arrow_length,
                    gravity: self.projectile_gravity,
                    compensate_shooter: true,
                },
            },
            Weapon {
                id: WeaponId::Spear,
                attack_interval_ms: self.spear_attack_interval_ms,
                anchor: AimAnchor::Top,
                projectile: ProjectileSpec {
                    kind: ProjectileKind::Spear,
                    damage: self.spear_damage,
                    speed: self.spear_speed,
                    length: self.spear_length,
                    gravity: self.projectile_gravity,
                    compensate_shooter: true,
                },
            },
        ])
    }

    /// Weapon bound to weapon-select key `slot` (zero-based).
    pub fn weapon_for_slot(&self, slot: usize) -> Option<WeaponId> {
        self.weapon_slots.get(slot).copied()
    }

    /// World-space center of the player spawn point.
    pub fn player_spawn(&self) -> Vec2 {
        Vec2::new(self.player_spawn_x, self.ground_height + self.player_spawn_y)
    }
}

/// Startup system: attempt to load `assets/pilot.toml` and overwrite the
/// `ControllerConfig` resource with its values.
///
/// Missing keys retain their compiled defaults.  Parse and validation errors
/// are logged but do not abort the game.  A missing file is not an error.
pub fn load_controller_config(mut config: ResMut<ControllerConfig>) {
    match read_config_file(CONFIG_PATH) {
        Ok(Some(loaded)) => {
            *config = loaded;
            info!("Loaded controller config from {CONFIG_PATH}");
        }
        Ok(None) => info!("No {CONFIG_PATH} found; using compiled defaults"),
        Err(e) => warn!("{e}; using defaults"),
    }
}

/// Read and validate a config file.  `Ok(None)` when the file does not exist.
pub fn read_config_file(path: &str) -> ConfigResult<Option<ControllerConfig>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_string(),
                source,
            })
        }
    };
    ControllerConfig::from_toml_str(path, &contents).map(Some)
}
