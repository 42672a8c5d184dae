//! Cooperative cancellation for long attribution runs.
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared stop flag with an optional deadline.
///
/// Clones share the same flag, so any holder can cancel the run. The
/// attribution engine polls the signal between chunks and inside workers.
///
/// # Examples
/// ```
/// use safestreets_scorer::CancelSignal;
///
/// let signal = CancelSignal::new();
/// let handle = signal.clone();
/// assert!(!signal.is_cancelled());
/// handle.cancel();
/// assert!(signal.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelSignal {
    /// A signal that only fires when [`cancel`](Self::cancel) is called.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A signal that also fires once `deadline` has passed.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Some(deadline),
        }
    }

    /// A signal that fires `budget` from now.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Instant::now()
            .checked_add(budget)
            .map_or_else(Self::new, Self::with_deadline)
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested or the deadline has passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn past_deadline_is_cancelled() {
        let signal = CancelSignal::with_deadline(Instant::now());
        assert!(signal.is_cancelled());
    }

    #[rstest]
    fn distant_deadline_is_not_cancelled() {
        let signal = CancelSignal::after(Duration::from_secs(3600));
        assert!(!signal.is_cancelled());
    }
}
