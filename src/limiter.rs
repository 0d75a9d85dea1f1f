use log::debug;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Default spacing between requests to the public API.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 250;

/// Gate that keeps successive calls at least `min_interval` apart.
///
/// The gate measures from the completion of the last call that returned normally to the start
/// of the next one. A call that fails (returns `Err` or panics) leaves the timestamp untouched,
/// so it does not count toward the spacing of the call after it.
///
/// The state lock is held for the whole wait-and-call sequence: concurrent callers are
/// serialized and still observe the spacing. A callable passed to [`RateLimiter::call`] must
/// not call back into the same limiter, it would deadlock.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Completion instant of the last successful call, `None` before the first one.
    pub fn last_call(&self) -> Option<Instant> {
        *self.state()
    }

    /// How long a call issued right now would block before running.
    pub fn remaining_wait(&self) -> Duration {
        remaining(self.min_interval, *self.state(), Instant::now())
    }

    /// Run a fallible callable behind the gate. The result is returned unchanged.
    pub fn call<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let mut last = self.state();
        let wait = remaining(self.min_interval, *last, Instant::now());
        if !wait.is_zero() {
            debug!("rate limiter sleeping {:?}", wait);
            std::thread::sleep(wait);
        }
        let out = f()?;
        *last = Some(Instant::now());
        Ok(out)
    }

    /// Run an infallible callable behind the gate; always counts toward spacing.
    pub fn run<T, F>(&self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self.call(|| Ok::<T, std::convert::Infallible>(f())) {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }

    // A panic inside a wrapped call poisons the lock without touching the timestamp,
    // so the inner value is still valid.
    fn state(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        self.last_call.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_millis(DEFAULT_MIN_INTERVAL_MS)
    }
}

fn remaining(min_interval: Duration, last: Option<Instant>, now: Instant) -> Duration {
    match last {
        Some(at) => min_interval.saturating_sub(now.saturating_duration_since(at)),
        None => Duration::ZERO,
    }
}
