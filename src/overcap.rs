//! Temporary speed-cap overcap with linear per-tick decay.
//!
//! A dash raises the body's max-speed clamp to the dash speed instantly; the
//! cap then bleeds back to the baseline by a fixed amount every physics tick.
//! Decay is per tick, not per second, so it is tied to the fixed simulation
//! rate ([`crate::constants::PHYSICS_TICK_HZ`]).

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityOvercap {
    base_max_speed: f32,
    current_max_speed: f32,
    decay_per_tick: f32,
}

impl VelocityOvercap {
    pub fn new(base_max_speed: f32, decay_per_tick: f32) -> Self {
        let base_max_speed = base_max_speed.max(0.0);
        Self {
            base_max_speed,
            current_max_speed: base_max_speed,
            decay_per_tick: decay_per_tick.max(0.0),
        }
    }

    /// Raise the cap to `new_max`.
    ///
    /// The new value replaces the current cap outright: every dash resets the
    /// cap to the dash constant.  The cap never drops below the baseline.
    pub fn overcap(&mut self, new_max: f32) {
        self.current_max_speed = new_max.max(self.base_max_speed);
    }

    /// Decay one tick and return the cap to apply to the body.
    pub fn tick(&mut self) -> f32 {
        if self.current_max_speed > self.base_max_speed {
            self.current_max_speed =
                (self.current_max_speed - self.decay_per_tick).max(self.base_max_speed);
        } else {
            self.current_max_speed = self.base_max_speed;
        }
        self.current_max_speed
    }

    #[inline]
    pub fn is_overcapped(&self) -> bool {
        self.current_max_speed != self.base_max_speed
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current_max_speed
    }

    #[inline]
    pub fn base(&self) -> f32 {
        self.base_max_speed
    }

    /// Ticks until the cap is back at the baseline.  `None` when overcapped
    /// with zero decay (the cap would never settle).
    pub fn ticks_to_settle(&self) -> Option<u32> {
        let excess = self.current_max_speed - self.base_max_speed;
        if excess <= 0.0 {
            return Some(0);
        }
        if self.decay_per_tick <= 0.0 {
            return None;
        }
        Some((excess / self.decay_per_tick).ceil() as u32)
    }
}
