use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Cooperative cancellation flag shared between a job and its controller.
///
/// Clones share the same flag. Waiting threads are woken as soon as
/// [`cancel`](Self::cancel) is called.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        *lock_flag(lock) = true;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *lock_flag(&self.inner.0)
    }

    /// Clear the flag so the token can drive another run.
    pub fn reset(&self) {
        *lock_flag(&self.inner.0) = false;
    }

    /// Block for up to `timeout`. Returns `true` if cancelled before or during the wait.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut cancelled = lock_flag(lock);
        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            cancelled = match cvar.wait_timeout(cancelled, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        true
    }
}

// A panicking holder cannot leave the bool half-written.
fn lock_flag(lock: &Mutex<bool>) -> MutexGuard<'_, bool> {
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
