//! Leading-edge debouncing, keyed per file.
//!
//! The first call in a burst fires immediately. Every later call that
//! arrives within `window` of the previous call for the same key is
//! dropped, not queued, and pushes the end of the burst out. A burst of N
//! calls therefore fires exactly once.
//!
//! Time is passed in explicitly by the `*_at` methods so callers and tests
//! control the clock.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Entries older than this many windows are pruned on the next call.
const PRUNE_AFTER_WINDOWS: u32 = 16;

#[derive(Debug, Clone)]
pub struct Debouncer<K> {
    window: Duration,
    last_call: HashMap<K, Instant>,
}

impl<K: Eq + Hash + Clone> Debouncer<K> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_call: HashMap::new(),
        }
    }

    /// Register a call for `key` at `now`; returns whether it fires.
    pub fn call_at(&mut self, key: &K, now: Instant) -> bool {
        self.prune(now);
        let fires = match self.last_call.get(key) {
            Some(previous) => now.saturating_duration_since(*previous) >= self.window,
            None => true,
        };
        self.last_call.insert(key.clone(), now);
        fires
    }

    /// Carry a burst in progress over from `from` to `to`, for a file that
    /// was renamed mid-burst.
    pub fn rename_key(&mut self, from: &K, to: K) {
        if let Some(at) = self.last_call.remove(from) {
            self.last_call.insert(to, at);
        }
    }

    fn prune(&mut self, now: Instant) {
        let horizon = self.window * PRUNE_AFTER_WINDOWS;
        self.last_call
            .retain(|_, at| now.saturating_duration_since(*at) < horizon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    #[test]
    fn first_call_fires_immediately() {
        let mut gate = Debouncer::new(WINDOW);
        assert!(gate.call_at(&"a.md", Instant::now()));
    }

    #[test]
    fn burst_within_window_fires_once() {
        let mut gate = Debouncer::new(WINDOW);
        let start = Instant::now();
        let fired = (0..20)
            .filter(|i| gate.call_at(&"a.md", start + Duration::from_millis(i * 10)))
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn dropped_calls_extend_the_burst() {
        let mut gate = Debouncer::new(WINDOW);
        let t0 = Instant::now();
        assert!(gate.call_at(&"a.md", t0));
        assert!(!gate.call_at(&"a.md", t0 + Duration::from_millis(90)));
        // 150ms after the first call but only 60ms after the previous one.
        assert!(!gate.call_at(&"a.md", t0 + Duration::from_millis(150)));
        assert!(gate.call_at(&"a.md", t0 + Duration::from_millis(260)));
    }

    #[test]
    fn keys_are_independent() {
        let mut gate = Debouncer::new(WINDOW);
        let now = Instant::now();
        assert!(gate.call_at(&"a.md", now));
        assert!(gate.call_at(&"b.md", now));
        assert!(!gate.call_at(&"a.md", now));
    }

    #[test]
    fn renamed_key_keeps_its_burst() {
        let mut gate = Debouncer::new(WINDOW);
        let t0 = Instant::now();
        assert!(gate.call_at(&"Draft.md", t0));
        gate.rename_key(&"Draft.md", "Final.md");
        assert!(!gate.call_at(&"Final.md", t0 + Duration::from_millis(10)));
        assert!(gate.call_at(&"Draft.md", t0 + Duration::from_millis(20)));
    }

    #[test]
    fn renaming_an_idle_key_is_a_no_op() {
        let mut gate = Debouncer::new(WINDOW);
        gate.rename_key(&"a.md", "b.md");
        assert!(gate.call_at(&"b.md", Instant::now()));
    }

    #[test]
    fn old_entries_are_pruned() {
        let mut gate = Debouncer::new(WINDOW);
        let t0 = Instant::now();
        gate.call_at(&"a.md", t0);
        gate.call_at(&"b.md", t0 + WINDOW * 20);
        assert_eq!(gate.last_call.len(), 1);
    }
}
