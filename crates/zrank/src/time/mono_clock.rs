use crate::TimeSource;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A wall-clock time source that never runs backwards.
///
/// The clock reads `SystemTime::now()` once, at construction, and from then
/// on reports that anchor plus the monotonic time elapsed since. NTP steps or
/// manual clock changes after construction therefore cannot reorder the
/// tie-break of two updates made by the same process.
///
/// Clones share the same anchor.
///
/// # Example
///
/// ```
/// use zrank::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::default();
/// let a = clock.current_secs();
/// let b = clock.current_secs();
/// assert!(b >= a);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
    anchor_secs: i64,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors a new clock at the current wall-clock time.
    ///
    /// A system clock set before 1970 anchors at the epoch itself.
    pub fn new() -> Self {
        let start = Instant::now();
        let anchor_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |since| since.as_secs() as i64);
        Self { start, anchor_secs }
    }

    /// Anchors a new clock at an explicit Unix timestamp (seconds).
    ///
    /// Useful for replaying a window or for deterministic tests that still
    /// want time to advance.
    pub fn with_anchor(anchor_secs: i64) -> Self {
        Self {
            start: Instant::now(),
            anchor_secs,
        }
    }
}

impl TimeSource for MonotonicClock {
    /// Returns the anchor plus whole seconds elapsed since construction.
    fn current_secs(&self) -> i64 {
        self.anchor_secs + self.start.elapsed().as_secs() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_clock_starts_at_anchor() {
        let clock = MonotonicClock::with_anchor(1_667_232_000);
        let now = clock.current_secs();
        assert!((1_667_232_000..1_667_232_002).contains(&now));
    }

    #[test]
    fn default_clock_tracks_system_time() {
        let system = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let now = MonotonicClock::default().current_secs();
        assert!((now - system).abs() <= 1);
    }
}
