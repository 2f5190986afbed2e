/// A trait for time sources that report wall-clock seconds.
///
/// The tie-break fraction of every composite score is derived from this
/// value, so the unit is **whole seconds since the Unix epoch**, the same unit
/// as a leaderboard's window bounds.
///
/// Plug in [`MonotonicClock`] for production, or a fixed or stepping clock in
/// tests.
///
/// # Example
///
/// ```
/// use zrank::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_secs(&self) -> i64 {
///         1_667_232_000
///     }
/// }
///
/// assert_eq!(FixedTime.current_secs(), 1_667_232_000);
/// ```
///
/// [`MonotonicClock`]: crate::MonotonicClock
pub trait TimeSource {
    /// Returns the current time in seconds since the Unix epoch.
    fn current_secs(&self) -> i64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_secs(&self) -> i64 {
        (**self).current_secs()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn current_secs(&self) -> i64 {
        (**self).current_secs()
    }
}
