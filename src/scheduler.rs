//! Deferred, cancellable events keyed by elapsed time.
//!
//! Timed re-enables (drop-through re-collision) and cosmetic resets (dash
//! tilt) are queued here instead of living in closures.  Due events fire in
//! timer order; events due at the same instant fire in scheduling order.

/// Handle returned by [`DeferredQueue::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<E> {
    id: TimerId,
    due_ms: f64,
    event: E,
}

#[derive(Debug, Clone)]
pub struct DeferredQueue<E> {
    now_ms: f64,
    next_id: u64,
    entries: Vec<Entry<E>>,
}

impl<E> Default for DeferredQueue<E> {
    fn default() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<E> DeferredQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` to fire `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: f32, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due_ms = self.now_ms + f64::from(delay_ms.max(0.0));
        // Keep entries sorted by due time; ties keep insertion order.
        let index = self.entries.partition_point(|e| e.due_ms <= due_ms);
        self.entries.insert(index, Entry { id, due_ms, event });
        id
    }

    /// Remove a pending event.  Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Remove every pending event matching `pred`.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&E) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| !pred(&e.event));
        before - self.entries.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn any_pending(&self, mut pred: impl FnMut(&E) -> bool) -> bool {
        self.entries.iter().any(|e| pred(&e.event))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Advance the clock and drain every event that is now due.
    pub fn advance(&mut self, delta_ms: f32) -> Vec<E> {
        self.now_ms += f64::from(delta_ms.max(0.0));
        let due = self.entries.partition_point(|e| e.due_ms <= self.now_ms);
        self.entries.drain(..due).map(|e| e.event).collect()
    }
}
