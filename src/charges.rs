//! Countable action resources (dashes, multi-jumps).
//!
//! A [`ChargePool`] is consumed one charge per action and replenished either by
//! an owner-defined trigger ([`ChargePool::reset`], e.g. landing) or by queued
//! regeneration: spent charges come back one at a time, each after the
//! configured recharge delay.

/// N-charge resource.  `capacity == None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChargePool {
    capacity: Option<u32>,
    used: u32,
    /// Delay for one spent charge to regenerate; `None` disables regeneration.
    recharge_ms: Option<f32>,
    /// Time accumulated toward the charge at the head of the queue.
    recharge_elapsed_ms: f32,
}

impl ChargePool {
    pub fn new(capacity: Option<u32>) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    /// Enable queued regeneration.  Non-positive delays disable it.
    pub fn with_recharge(mut self, recharge_ms: f32) -> Self {
        self.recharge_ms = (recharge_ms > 0.0).then_some(recharge_ms);
        self
    }

    /// Spend one charge.  Returns `false` (and changes nothing) when exhausted.
    pub fn try_consume(&mut self) -> bool {
        match self.capacity {
            None => true,
            Some(cap) if self.used < cap => {
                self.used += 1;
                true
            }
            Some(_) => false,
        }
    }

    /// Restore every charge and drop any in-progress regeneration.
    pub fn reset(&mut self) {
        self.used = 0;
        self.recharge_elapsed_ms = 0.0;
    }

    /// Advance queued regeneration.
    pub fn tick(&mut self, delta_ms: f32) {
        let Some(recharge_ms) = self.recharge_ms else {
            return;
        };
        if self.used == 0 {
            self.recharge_elapsed_ms = 0.0;
            return;
        }
        self.recharge_elapsed_ms += delta_ms.max(0.0);
        while self.used > 0 && self.recharge_elapsed_ms >= recharge_ms {
            self.recharge_elapsed_ms -= recharge_ms;
            self.used -= 1;
        }
        if self.used == 0 {
            self.recharge_elapsed_ms = 0.0;
        }
    }

    #[inline]
    pub fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    #[inline]
    pub fn used(&self) -> u32 {
        self.used
    }

    /// Charges left; `None` when unlimited.
    pub fn available(&self) -> Option<u32> {
        self.capacity.map(|cap| cap.saturating_sub(self.used))
    }

    pub fn has_charge(&self) -> bool {
        self.available().is_none_or(|n| n > 0)
    }

    /// Fraction of the charge currently regenerating, `0.0` when idle.
    pub fn recharge_progress(&self) -> f32 {
        match self.recharge_ms {
            Some(ms) if self.used > 0 => (self.recharge_elapsed_ms / ms).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}
