//! Cursor aim: direction sampling, the elliptical reticle leash, and the
//! smoothed reticle follower.
//!
//! The ellipse constraint is purely visual/directional.  It never blocks
//! gameplay: the aim angle is always the raw cursor angle, and only the
//! reticle offset is projected onto the leash when the cursor is outside it.

use bevy::math::Vec2;
use serde::Deserialize;

/// Vertical point on a body that aim is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AimAnchor {
    Top,
    #[default]
    Center,
    Bottom,
}

impl AimAnchor {
    /// Resolve the anchor for a body centered at `center` (y-up world).
    pub fn point(self, center: Vec2, half_height: f32) -> Vec2 {
        match self {
            AimAnchor::Top => center + Vec2::new(0.0, half_height),
            AimAnchor::Center => center,
            AimAnchor::Bottom => center - Vec2::new(0.0, half_height),
        }
    }
}

/// Radii of the reticle leash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimEllipse {
    pub rx: f32,
    pub ry: f32,
}

impl AimEllipse {
    pub fn new(rx: f32, ry: f32) -> Self {
        Self { rx, ry }
    }

    /// Project `offset` onto the ellipse boundary when it lies outside.
    ///
    /// Points inside (or on) the ellipse pass through unchanged.  A degenerate
    /// ellipse collapses every offset to zero.
    pub fn constrain(&self, offset: Vec2) -> Vec2 {
        if self.rx <= 0.0 || self.ry <= 0.0 {
            return Vec2::ZERO;
        }
        let value = (offset.x * offset.x) / (self.rx * self.rx)
            + (offset.y * offset.y) / (self.ry * self.ry);
        if value > 1.0 {
            offset * (1.0 / value).sqrt()
        } else {
            offset
        }
    }
}

/// Aim from an origin toward the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimVector {
    origin: Vec2,
    cursor: Vec2,
    offset: Vec2,
}

impl AimVector {
    pub fn from_cursor(cursor: Vec2, origin: Vec2) -> Self {
        Self {
            origin,
            cursor,
            offset: cursor - origin,
        }
    }

    /// Clamp the reticle offset to `ellipse`.  The aim angle is unaffected.
    pub fn constrained(mut self, ellipse: AimEllipse) -> Self {
        self.offset = ellipse.constrain(self.cursor - self.origin);
        self
    }

    /// `atan2(cursor.y - origin.y, cursor.x - origin.x)`.
    pub fn angle(&self) -> f32 {
        let d = self.cursor - self.origin;
        d.y.atan2(d.x)
    }

    /// Unit direction of [`angle`](Self::angle).
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.angle())
    }

    pub fn velocity_toward(&self, speed: f32) -> Vec2 {
        self.direction() * speed
    }

    /// Velocity toward the cursor measured from a different origin.
    pub fn velocity_toward_from(&self, speed: f32, origin: Vec2) -> Vec2 {
        AimVector::from_cursor(self.cursor, origin).velocity_toward(speed)
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Possibly-constrained offset from the origin.
    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// World position of the reticle.
    pub fn reticle(&self) -> Vec2 {
        self.origin + self.offset
    }
}

/// Reticle that chases its target by a fixed fraction per update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReticleFollower {
    pub position: Vec2,
    pub follow_speed: f32,
}

impl ReticleFollower {
    pub fn new(position: Vec2, follow_speed: f32) -> Self {
        Self {
            position,
            follow_speed: follow_speed.clamp(0.0, 1.0),
        }
    }

    /// Move toward `target` and return the new position.
    pub fn follow(&mut self, target: Vec2) -> Vec2 {
        self.position += (target - self.position) * self.follow_speed;
        self.position
    }

    /// Rotation that points the reticle's "down" back at `origin`.
    pub fn rotation_toward(&self, origin: Vec2) -> f32 {
        let d = origin - self.position;
        d.y.atan2(d.x) + std::f32::consts::FRAC_PI_2
    }
}
