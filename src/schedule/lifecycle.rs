use std::{
    ops::{Deref, DerefMut},
    time::Duration,
};

/// Lifecycle shared by every effect instance.
///
/// All timers and frame requests an effect creates are owned by the effect itself, so
/// `stop` can cancel every one of them in one call.
pub trait Effect {
    /// Begin (or restart) the effect at host time `now`.
    fn start(&mut self, now: Duration);

    /// Cancel every pending timer and frame request. Must be idempotent.
    fn stop(&mut self);

    /// Whether the effect has live timers or frame requests.
    fn is_running(&self) -> bool;

    /// Final teardown when the owning view goes away. Any callback forced afterwards is a
    /// no-op.
    fn teardown(&mut self) {
        self.stop();
    }
}

/// Scoped mount of an [`Effect`]: started on construction, torn down when dropped.
///
/// Teardown runs on every exit path of the owning scope, including early `?` returns and
/// unwinding.
#[derive(Debug)]
pub struct Mount<E: Effect> {
    effect: Option<E>,
}

impl<E: Effect> Mount<E> {
    /// Start `effect` at `now` and hold it until the guard is dropped.
    pub fn new(mut effect: E, now: Duration) -> Self {
        effect.start(now);
        Self {
            effect: Some(effect),
        }
    }

    /// Tear the effect down now and hand it back.
    pub fn into_inner(mut self) -> E {
        let mut effect = self
            .effect
            .take()
            .unwrap_or_else(|| unreachable!("mount holds its effect until dropped"));
        effect.teardown();
        effect
    }
}

impl<E: Effect> Deref for Mount<E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.effect
            .as_ref()
            .unwrap_or_else(|| unreachable!("mount holds its effect until dropped"))
    }
}

impl<E: Effect> DerefMut for Mount<E> {
    fn deref_mut(&mut self) -> &mut E {
        self.effect
            .as_mut()
            .unwrap_or_else(|| unreachable!("mount holds its effect until dropped"))
    }
}

impl<E: Effect> Drop for Mount<E> {
    fn drop(&mut self) {
        if let Some(effect) = self.effect.as_mut() {
            effect.teardown();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/lifecycle.rs"]
mod tests;
