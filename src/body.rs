//! Arcade rigid-body capability consumed by the controllers.
//!
//! The movement and combat controllers only talk to the [`Body`] trait, so
//! they can drive any 2D physics substrate.  [`ArcadeBody`] is the in-crate
//! implementation: it integrates acceleration, gravity, drag and a per-axis
//! max-speed clamp, and leaves collision resolution to Rapier's kinematic
//! character controller (see `player::control`).
//!
//! World space is y-up: a positive vertical velocity moves the body upward and
//! gravity is applied downward.

use bevy::math::Vec2;
use bevy::prelude::Component;

/// Which sides of the body take part in collision resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for CollisionFlags {
    fn default() -> Self {
        Self {
            up: true,
            down: true,
            left: true,
            right: true,
        }
    }
}

/// Contacts reported by the physics substrate for the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactFlags {
    /// Resting on something this step.
    pub touching_down: bool,
    /// Downward motion was blocked (ground or world floor).
    pub blocked_down: bool,
}

impl ContactFlags {
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.touching_down || self.blocked_down
    }
}

pub trait Body {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);

    fn set_velocity_x(&mut self, vx: f32) {
        let v = self.velocity();
        self.set_velocity(Vec2::new(vx, v.y));
    }

    fn set_velocity_y(&mut self, vy: f32) {
        let v = self.velocity();
        self.set_velocity(Vec2::new(v.x, vy));
    }

    fn set_acceleration_x(&mut self, ax: f32);
    fn max_speed(&self) -> f32;
    fn set_max_speed(&mut self, max_speed: f32);
    fn collision_flags(&self) -> CollisionFlags;
    fn set_collision_flags(&mut self, flags: CollisionFlags);
    fn contact_flags(&self) -> ContactFlags;
    /// Half width / half height of the collision box.
    fn half_extents(&self) -> Vec2;
}

/// Kinematic body integrated by the crate's own arcade rules.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ArcadeBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Linear deceleration per axis, applied only while that axis has no
    /// acceleration.
    pub drag: Vec2,
    /// Downward acceleration magnitude.
    pub gravity: f32,
    pub max_speed: f32,
    pub half_extents: Vec2,
    pub collision: CollisionFlags,
    pub contacts: ContactFlags,
}

impl ArcadeBody {
    pub fn new(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            drag: Vec2::ZERO,
            gravity: 0.0,
            max_speed: f32::INFINITY,
            half_extents,
            collision: CollisionFlags::default(),
            contacts: ContactFlags::default(),
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_drag(mut self, drag: Vec2) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed.max(0.0);
        self
    }

    /// Integrate velocity over `dt` seconds and return the displacement the
    /// body wants to travel.  Position is not moved; the caller (Rapier, or
    /// [`ArcadeBody::step`] in tests) decides where the body ends up.
    pub fn integrate(&mut self, dt: f32) -> Vec2 {
        let mut v = self.velocity + (self.acceleration + Vec2::new(0.0, -self.gravity)) * dt;

        if self.acceleration.x == 0.0 {
            v.x = apply_drag(v.x, self.drag.x * dt);
        }
        if self.acceleration.y == 0.0 {
            v.y = apply_drag(v.y, self.drag.y * dt);
        }

        let cap = self.max_speed;
        v = v.clamp(Vec2::splat(-cap), Vec2::splat(cap));
        self.velocity = v;
        v * dt
    }

    /// Integrate and move freely, with no collision.
    pub fn step(&mut self, dt: f32) {
        let delta = self.integrate(dt);
        self.position += delta;
    }

    /// Bottom edge of the collision box.
    pub fn feet_y(&self) -> f32 {
        self.position.y - self.half_extents.y
    }
}

fn apply_drag(v: f32, amount: f32) -> f32 {
    if v.abs() <= amount {
        0.0
    } else {
        v - amount * v.signum()
    }
}

impl Body for ArcadeBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn set_acceleration_x(&mut self, ax: f32) {
        self.acceleration.x = ax;
    }

    fn max_speed(&self) -> f32 {
        self.max_speed
    }

    fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed.max(0.0);
    }

    fn collision_flags(&self) -> CollisionFlags {
        self.collision
    }

    fn set_collision_flags(&mut self, flags: CollisionFlags) {
        self.collision = flags;
    }

    fn contact_flags(&self) -> ContactFlags {
        self.contacts
    }

    fn half_extents(&self) -> Vec2 {
        self.half_extents
    }
}
