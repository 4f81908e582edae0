use std::time::Duration;

/// Handle to a timer armed on a [`Scheduler`].
///
/// Ids are never reused within one scheduler, so a handle kept past its timer's
/// cancellation can never alias a newer timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct TimerId(pub(crate) u64);

/// A timer that has been removed from the queue and is ready to be applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Fired<E> {
    /// Id the timer was armed under.
    pub id: TimerId,
    /// Deadline it was armed for (not the time it was observed).
    pub due: Duration,
    /// Payload supplied to [`Scheduler::arm`].
    pub event: E,
}

#[derive(Clone, Debug)]
struct Pending<E> {
    id: TimerId,
    due: Duration,
    event: E,
}

/// Virtual-time timer queue owned by exactly one effect instance.
///
/// The host never sees individual timers: it only tells the owning effect what time it is,
/// and the effect drains [`Scheduler::pop_due`] one firing at a time, committing each state
/// transition before arming the next timer. `stop` cancels everything at once and is safe
/// to call repeatedly.
#[derive(Clone, Debug)]
pub struct Scheduler<E> {
    label: &'static str,
    next_id: u64,
    pending: Vec<Pending<E>>,
    stopped: bool,
}

impl<E> Scheduler<E> {
    /// Empty, running scheduler. `label` only shows up in logs.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            next_id: 0,
            pending: Vec::new(),
            stopped: false,
        }
    }

    /// Arm a timer that becomes due at `due`.
    ///
    /// Returns `None` without queueing anything while the scheduler is stopped.
    pub fn arm(&mut self, due: Duration, event: E) -> Option<TimerId> {
        if self.stopped {
            tracing::debug!(scheduler = self.label, "arm refused: scheduler stopped");
            return None;
        }
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { id, due, event });
        Some(id)
    }

    /// Cancel one timer. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        before != self.pending.len()
    }

    /// Whether `id` is armed and has not fired or been cancelled.
    pub fn is_live(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Number of armed timers.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Ids of armed timers, earliest deadline first.
    pub fn pending_ids(&self) -> Vec<TimerId> {
        let mut v: Vec<_> = self.pending.iter().map(|p| (p.due, p.id)).collect();
        v.sort();
        v.into_iter().map(|(_, id)| id).collect()
    }

    /// Earliest deadline among armed timers.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Remove and return the earliest timer whose deadline is `<= now`.
    ///
    /// Ties are broken by arm order.
    pub fn pop_due(&mut self, now: Duration) -> Option<Fired<E>> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= now)
            .min_by_key(|(_, p)| (p.due, p.id))
            .map(|(i, _)| i)?;
        let p = self.pending.remove(idx);
        Some(Fired {
            id: p.id,
            due: p.due,
            event: p.event,
        })
    }

    /// Remove and return one specific timer regardless of its deadline.
    ///
    /// This is how a host forces a callback; a cancelled id yields `None`.
    pub fn take(&mut self, id: TimerId) -> Option<Fired<E>> {
        let idx = self.pending.iter().position(|p| p.id == id)?;
        let p = self.pending.remove(idx);
        Some(Fired {
            id: p.id,
            due: p.due,
            event: p.event,
        })
    }

    /// Cancel every pending timer and refuse new ones until [`Scheduler::resume`].
    pub fn stop(&mut self) {
        if !self.stopped || !self.pending.is_empty() {
            tracing::debug!(
                scheduler = self.label,
                cancelled = self.pending.len(),
                "scheduler stopped"
            );
        }
        self.pending.clear();
        self.stopped = true;
    }

    /// Accept timers again after a [`Scheduler::stop`].
    pub fn resume(&mut self) {
        self.stopped = false;
    }

    /// Whether the scheduler currently refuses new timers.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/timers.rs"]
mod tests;
