use std::time::{Duration, Instant};

/// A single-slot debounce timer.
///
/// Arming replaces whatever was pending, so at most one payload waits at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Cancels any pending payload and schedules `payload` for `now + delay`.
    pub fn arm(&mut self, now: Instant, payload: T) {
        self.pending = Some((now + self.delay, payload));
    }

    /// Drops the pending payload, returning it if there was one.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn payload(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, payload)| payload)
    }

    /// Takes the payload if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        if self.deadline().is_some_and(|deadline| deadline <= now) {
            self.cancel()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_after_delay() {
        let start = Instant::now();
        let mut timer = Debounce::new(Duration::from_millis(300));
        timer.arm(start, "a");
        assert_eq!(timer.take_due(start + Duration::from_millis(299)), None);
        assert_eq!(timer.take_due(start + Duration::from_millis(300)), Some("a"));
        assert!(!timer.is_armed());
    }

    #[test]
    fn rearming_replaces_and_restarts() {
        let start = Instant::now();
        let mut timer = Debounce::new(Duration::from_millis(300));
        timer.arm(start, "a");
        timer.arm(start + Duration::from_millis(200), "b");
        assert_eq!(timer.take_due(start + Duration::from_millis(400)), None);
        assert_eq!(timer.take_due(start + Duration::from_millis(500)), Some("b"));
    }

    #[test]
    fn cancel_clears_payload() {
        let start = Instant::now();
        let mut timer = Debounce::new(Duration::from_millis(10));
        timer.arm(start, 7);
        assert_eq!(timer.cancel(), Some(7));
        assert_eq!(timer.take_due(start + Duration::from_secs(1)), None);
    }
}
