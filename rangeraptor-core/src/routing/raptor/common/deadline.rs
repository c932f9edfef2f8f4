use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Wall-clock deadline plus a shared cancellation flag.
///
/// Checked at round boundaries, only every `check_every` call does the
/// actual check. Once expired it stays expired.
#[derive(Debug, Clone)]
pub struct SearchDeadline {
    deadline: Option<Instant>,
    cancel: Arc<AtomicBool>,
    check_every: usize,
    calls: usize,
    expired: bool,
}

impl SearchDeadline {
    pub fn new(
        timeout: Option<Duration>,
        cancel: Option<Arc<AtomicBool>>,
        check_every: usize,
    ) -> Self {
        Self {
            deadline: timeout.map(|t| Instant::now() + t),
            cancel: cancel.unwrap_or_default(),
            check_every: check_every.max(1),
            calls: 0,
            expired: false,
        }
    }

    pub fn none() -> Self {
        Self::new(None, None, 1)
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn is_expired(&mut self) -> bool {
        if self.expired {
            return true;
        }
        let check = self.calls % self.check_every == 0;
        self.calls += 1;
        if check {
            self.expired = self.cancel.load(Ordering::Relaxed)
                || self.deadline.is_some_and(|d| Instant::now() >= d);
        }
        self.expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_expires_on_first_check() {
        let mut deadline = SearchDeadline::new(Some(Duration::ZERO), None, 10);
        assert!(deadline.is_expired());
        assert!(deadline.is_expired());
    }

    #[test]
    fn cancellation_is_seen_at_the_next_checkpoint() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut deadline = SearchDeadline::new(None, Some(Arc::clone(&flag)), 2);
        assert!(!deadline.is_expired());
        flag.store(true, Ordering::Relaxed);
        assert!(!deadline.is_expired());
        assert!(deadline.is_expired());
        assert!(!SearchDeadline::none().is_expired());
    }
}
