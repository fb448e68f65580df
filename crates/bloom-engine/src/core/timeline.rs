// core/timeline.rs
//
// One-shot cancellable timers on a manually advanced clock.
// Games schedule a payload after a delay, keep the TimerId if they may need to
// cancel it, and drain due payloads while advancing the clock.
//
// Usage:
//   let mut timeline = Timeline::new();
//   let id = timeline.schedule(500.0, Step::Sneeze);
//   let until = timeline.now_ms() + dt_ms;
//   while let Some((_, step)) = timeline.pop_due(until) { /* handle */ }
//   timeline.advance_to(until);

/// Handle to a scheduled timer. Never reused within one Timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Scheduled<T> {
    id: TimerId,
    due_ms: f64,
    payload: T,
}

/// Pending timers plus the clock they are measured against.
#[derive(Debug)]
pub struct Timeline<T> {
    now_ms: f64,
    pending: Vec<Scheduled<T>>,
    next_id: u64,
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Current clock value in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Schedule `payload` to fire `delay_ms` from now. Negative delays fire
    /// on the next drain.
    pub fn schedule(&mut self, delay_ms: f64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due_ms: self.now_ms + delay_ms.max(0.0),
            payload,
        });
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.pending.iter().position(|s| s.id == id) {
            Some(idx) => {
                self.pending.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Remove the earliest timer due at or before `until_ms` and move the
    /// clock to its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<(TimerId, T)> {
        let idx = self.earliest()?;
        if self.pending[idx].due_ms > until_ms {
            return None;
        }
        let fired = self.pending.swap_remove(idx);
        self.now_ms = self.now_ms.max(fired.due_ms);
        Some((fired.id, fired.payload))
    }

    /// Move the clock forward. The clock never runs backwards.
    pub fn advance_to(&mut self, until_ms: f64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(idx, _)| idx)
    }
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}
