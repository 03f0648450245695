//! Quiescence debouncer for live search.
//!
//! Typing bursts must collapse into a single request. Each trigger stores the
//! latest payload and restarts the clock; the payload is released exactly once
//! after the interval elapses with no further triggers. The TUI tick loop
//! polls this - nothing here blocks or spawns timers.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer {
    interval: Duration,
    pending: Option<String>,
    last_trigger: Option<Instant>,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
            last_trigger: None,
        }
    }

    /// Schedule `payload`, replacing any previously pending payload and
    /// restarting the quiescence clock. At most one invocation is ever
    /// pending.
    pub fn trigger(&mut self, payload: String) {
        self.pending = Some(payload);
        self.last_trigger = Some(Instant::now());
    }

    /// Drop the pending payload without firing.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_trigger = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending payload if the interval has elapsed since the last
    /// trigger. Consumes it, so a released payload fires exactly once.
    pub fn poll(&mut self) -> Option<String> {
        let last = self.last_trigger?;
        if last.elapsed() < self.interval {
            return None;
        }
        self.last_trigger = None;
        self.pending.take()
    }

    /// Time left until the pending payload is released, for tick scheduling.
    pub fn time_until_ready(&self) -> Option<Duration> {
        let last = self.last_trigger?;
        Some(self.interval.saturating_sub(last.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn releases_once_after_quiescence() {
        let mut d = Debouncer::new(Duration::from_millis(10));
        d.trigger("rust".into());
        assert!(d.is_pending());
        assert_eq!(d.poll(), None);

        thread::sleep(Duration::from_millis(20));
        assert_eq!(d.poll(), Some("rust".into()));
        // Consumed: a second poll is silent.
        assert_eq!(d.poll(), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn retrigger_restarts_the_clock_and_replaces_payload() {
        let mut d = Debouncer::new(Duration::from_millis(30));
        d.trigger("r".into());
        thread::sleep(Duration::from_millis(10));
        d.trigger("ru".into());
        thread::sleep(Duration::from_millis(10));
        d.trigger("rust".into());

        // 20ms after the first trigger, but only 0ms after the last.
        assert_eq!(d.poll(), None);
        thread::sleep(Duration::from_millis(40));
        assert_eq!(d.poll(), Some("rust".into()));
    }

    #[test]
    fn cancel_drops_pending() {
        let mut d = Debouncer::new(Duration::from_millis(5));
        d.trigger("rust".into());
        d.cancel();
        thread::sleep(Duration::from_millis(10));
        assert_eq!(d.poll(), None);
    }

    #[test]
    fn time_until_ready_counts_down() {
        let mut d = Debouncer::new(Duration::from_millis(50));
        assert_eq!(d.time_until_ready(), None);
        d.trigger("q".into());
        let remaining = d.time_until_ready().unwrap();
        assert!(remaining <= Duration::from_millis(50));
        thread::sleep(Duration::from_millis(60));
        assert_eq!(d.time_until_ready(), Some(Duration::ZERO));
    }
}
