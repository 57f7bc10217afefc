//! Pilot: player movement and combat controller for a 2D side-scrolling
//! platformer.
//!
//! The movement and combat state machines ([`player::motion`],
//! [`player::combat`]) only see the [`body::Body`], [`input::ControlInput`]
//! and [`projectile::ProjectileSink`] traits, so they run without an engine in
//! unit tests.  [`player::PilotPlugin`] wires them into Bevy and Rapier.

pub mod aim;
pub mod body;
pub mod charges;
pub mod config;
pub mod constants;
pub mod cooldown;
pub mod error;
pub mod graphics;
pub mod health;
pub mod input;
pub mod overcap;
pub mod player;
pub mod projectile;
pub mod scheduler;
pub mod weapon;
pub mod world;
