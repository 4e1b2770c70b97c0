//! One-shot delayed payloads driven by elapsed frame time
//!
//! Hosts advance a [`Timers`] queue with each frame's delta and receive the
//! payloads that came due, e.g. to remove a HUD notice after its lifetime.

/// Milliseconds since the timers were created
pub type Millis = u64;

/// Handle for cancelling a scheduled payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    /// Get the raw ID value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Queue of payloads waiting for their due time
#[derive(Debug, Clone)]
pub struct Timers<T> {
    now: Millis,
    next_id: u64,
    /// Sorted by due time, then by scheduling order
    pending: Vec<(Millis, TimerId, T)>,
}

impl<T> Timers<T> {
    /// Create an empty queue at time zero
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current time
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Number of payloads not yet due
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is scheduled
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Deliver `payload` once `delay` milliseconds have passed
    pub fn schedule(&mut self, delay: Millis, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now.saturating_add(delay);

        let at = self.pending.partition_point(|(d, _, _)| *d <= due);
        self.pending.insert(at, (due, id, payload));
        id
    }

    /// Drop a scheduled payload, returning it if it was still pending
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let at = self.pending.iter().position(|(_, tid, _)| *tid == id)?;
        Some(self.pending.remove(at).2)
    }

    /// Move time forward and collect every payload that came due
    pub fn advance(&mut self, delta: Millis) -> Vec<T> {
        self.now = self.now.saturating_add(delta);
        let now = self.now;
        let due = self.pending.partition_point(|(d, _, _)| *d <= now);
        self.pending.drain(..due).map(|(_, _, payload)| payload).collect()
    }
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self::new()
    }
}
