//! Lazy one-time initialisation that does not cache failure.
//!
//! `std::sync::OnceLock` has no stable fallible initialiser, and a failed
//! attempt must reach every thread waiting on it while leaving the cell free
//! for a later retry. The state machine:
//!
//! ```text
//! Uninitialized ──get──▶ Initializing ──ok──▶ Ready (terminal)
//!        ▲                    │
//!        └──── err / panic ───┘   (waiters of that attempt get the error)
//! ```

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

enum State<T> {
    Uninitialized,
    Initializing,
    Ready(Arc<T>),
}

struct Inner<T, E> {
    state: State<T>,
    /// Incremented each time an initialiser starts.
    attempt: u64,
    /// Error of the most recent failed attempt.
    last_failure: Option<(u64, Arc<E>)>,
}

/// A cell initialised at most once by a fallible function, shared by
/// reference across threads.
pub struct RetryableLazy<T, E> {
    inner: Mutex<Inner<T, E>>,
    ready: Condvar,
}

impl<T, E> RetryableLazy<T, E> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: State::Uninitialized,
                attempt: 0,
                last_failure: None,
            }),
            ready: Condvar::new(),
        }
    }

    /// The value, if initialisation has already succeeded.
    pub fn get(&self) -> Option<Arc<T>> {
        match &self.lock().state {
            State::Ready(value) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    /// Return the value, running `init` if no attempt has succeeded yet.
    ///
    /// Only one thread runs `init` at a time; the others block until it
    /// finishes. If it fails, that error is returned to the initialising
    /// thread and to every thread that was waiting on the same attempt, and
    /// the next call starts a fresh attempt.
    pub fn get_or_try_init<F>(&self, init: F) -> Result<Arc<T>, Arc<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut inner = self.lock();
        loop {
            let waiting_on = match &inner.state {
                State::Ready(value) => return Ok(Arc::clone(value)),
                State::Uninitialized => break,
                State::Initializing => inner.attempt,
            };
            inner = self
                .ready
                .wait_while(inner, |i| {
                    matches!(i.state, State::Initializing) && i.attempt == waiting_on
                })
                .unwrap_or_else(PoisonError::into_inner);
            if let Some((attempt, error)) = &inner.last_failure
                && *attempt == waiting_on
            {
                return Err(Arc::clone(error));
            }
        }

        inner.state = State::Initializing;
        inner.attempt += 1;
        let attempt = inner.attempt;
        drop(inner);

        tracing::debug!(attempt, "initializing shared value");
        let mut guard = ResetOnUnwind {
            lazy: self,
            armed: true,
        };
        let result = init();
        guard.armed = false;

        let mut inner = self.lock();
        let outcome = match result {
            Ok(value) => {
                let value = Arc::new(value);
                inner.state = State::Ready(Arc::clone(&value));
                inner.last_failure = None;
                Ok(value)
            }
            Err(error) => {
                tracing::debug!(attempt, "shared value initialization failed");
                let error = Arc::new(error);
                inner.state = State::Uninitialized;
                inner.last_failure = Some((attempt, Arc::clone(&error)));
                Err(error)
            }
        };
        drop(inner);
        self.ready.notify_all();
        outcome
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T, E>> {
        // The state is only mutated under the lock in single assignments,
        // so it stays consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, E> Default for RetryableLazy<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the cell to `Uninitialized` if the initialiser panics, so
/// waiters wake up and retry instead of blocking forever.
struct ResetOnUnwind<'a, T, E> {
    lazy: &'a RetryableLazy<T, E>,
    armed: bool,
}

impl<T, E> Drop for ResetOnUnwind<'_, T, E> {
    fn drop(&mut self) {
        if self.armed {
            self.lazy.lock().state = State::Uninitialized;
            self.lazy.ready.notify_all();
        }
    }
}
