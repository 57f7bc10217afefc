//! Millisecond countdown used for attack pacing and the cooldown bar.

/// A countdown that is "ready" once its remaining time reaches zero.
///
/// The `inverse` flag only affects how the cooldown bar is drawn: an inverse
/// bar fills up as the timer runs out, a normal bar drains.  Readiness is
/// always `remaining == 0` regardless of the display mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CooldownTimer {
    duration_ms: f32,
    remaining_ms: f32,
    inverse: bool,
}

impl CooldownTimer {
    /// A timer that is ready immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down `duration_ms`, keeping the current display mode.
    ///
    /// Non-positive durations leave the timer ready.
    pub fn start(&mut self, duration_ms: f32) {
        let duration_ms = duration_ms.max(0.0);
        self.duration_ms = duration_ms;
        self.remaining_ms = duration_ms;
    }

    /// Start counting down with an explicit display mode.
    pub fn start_with_mode(&mut self, duration_ms: f32, inverse: bool) {
        self.inverse = inverse;
        self.start(duration_ms);
    }

    /// Adopt a new duration and display mode without imposing a wait.
    pub fn reset_ready(&mut self, duration_ms: f32, inverse: bool) {
        self.duration_ms = duration_ms.max(0.0);
        self.remaining_ms = 0.0;
        self.inverse = inverse;
    }

    /// Advance by `delta_ms`.  Remaining time never drops below zero.
    pub fn tick(&mut self, delta_ms: f32) {
        self.remaining_ms = (self.remaining_ms - delta_ms.max(0.0)).max(0.0);
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.remaining_ms <= 0.0
    }

    #[inline]
    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms
    }

    #[inline]
    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    #[inline]
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// `0.0` right after [`start`](Self::start), `1.0` once ready.
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Fraction of the cooldown bar to fill.
    ///
    /// A draining bar shows the remaining fraction and is full when ready; an
    /// inverse bar shows [`progress`](Self::progress) and is also full when ready.
    pub fn display_fill(&self) -> f32 {
        if self.is_ready() {
            return 1.0;
        }
        if self.inverse {
            self.progress()
        } else {
            (self.remaining_ms / self.duration_ms.max(1.0)).clamp(0.0, 1.0)
        }
    }
}
