//! Configuration error types.
//!
//! Gameplay never fails loudly: attacking on cooldown, dashing without
//! charges or hitting the shooter are all silent no-ops.  Errors only exist at
//! the configuration boundary, where a bad `assets/pilot.toml` is reported and
//! the compiled defaults are kept.

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::config::ControllerConfig`].
    Parse {
        path: String,
        source: toml::de::Error,
    },

    /// A tuning value is outside the range the controllers can handle.
    UnsafeConstant {
        /// Name of the config key.
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// The starting weapon is not bound to any weapon-select slot.
    UnknownWeapon { weapon: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "failed to read {}: {}", path, source),
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path, source)
            }
            ConfigError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "config key '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            ConfigError::UnknownWeapon { weapon } => write!(
                f,
                "starting weapon '{}' is not bound to any weapon slot",
                weapon
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::UnsafeConstant { .. } | ConfigError::UnknownWeapon { .. } => None,
        }
    }
}

/// Convenience alias: a `Result` using `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Rejects negative values.
pub fn validate_non_negative(name: &'static str, value: f32) -> ConfigResult<()> {
    if value < 0.0 || value.is_nan() {
        Err(ConfigError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Rejects zero, negative and non-finite values.
pub fn validate_positive(name: &'static str, value: f32) -> ConfigResult<()> {
    if value <= 0.0 || !value.is_finite() {
        Err(ConfigError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Rejects values outside `[0.0, 1.0]`.
pub fn validate_unit_interval(name: &'static str, value: f32) -> ConfigResult<()> {
    if !(0.0..=1.0).contains(&value) {
        Err(ConfigError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, 1.0]",
        })
    } else {
        Ok(())
    }
}
