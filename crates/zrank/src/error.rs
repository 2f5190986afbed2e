/// A result type defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors a [`Leaderboard`] can report.
///
/// Construction problems ([`Error::InvalidWindow`]) are not retryable. Codec
/// problems ([`Error::EncodingOverflow`], [`Error::MalformedScore`],
/// [`Error::MalformedMember`]) mean the request or the stored data is outside
/// what the encoding can represent. Everything the backing store reports is
/// carried unchanged in [`Error::Store`].
///
/// [`Leaderboard`]: crate::Leaderboard
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The window is empty, inverted, or so long that its tie-break digits
    /// leave no room for a ranking value.
    #[error("invalid window: [{start}, {end})")]
    InvalidWindow { start: i64, end: i64 },

    /// The value together with the tie-break digits needs more significant
    /// digits than an `f64` carries exactly.
    #[error("value {value} does not fit next to {width} tie-break digits")]
    EncodingOverflow { value: u64, width: u32 },

    /// A stored score that no encode could have produced.
    #[error("malformed score: {score}")]
    MalformedScore { score: f64 },

    /// A stored member that is not an entity id.
    #[error("malformed member: {member:?}")]
    MalformedMember { member: String },

    /// The ordered store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors surfaced by an [`OrderedStore`].
///
/// [`OrderedStore`]: crate::OrderedStore
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The store could not be reached or refused the request.
    #[error("store unavailable: {context}")]
    Unavailable { context: String },

    /// The operation did not complete within its deadline.
    #[error("store operation timed out")]
    Timeout,

    /// The transport gave up on the call before a reply arrived, for
    /// example because the connection closed mid-request. Like a timeout,
    /// the write may or may not have landed.
    #[error("store operation cancelled")]
    Cancelled,

    /// The store refused a score that is not a finite float.
    #[error("score is not a valid float")]
    InvalidScore,

    /// A thread panicked while holding the store lock.
    ///
    /// Only reachable with std mutexes; the `parking-lot` feature swaps in
    /// locks that do not poison.
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Whether retrying the whole call may succeed.
    ///
    /// Retrying an update re-applies its delta. Callers that retry must make
    /// sure the increment was not already applied.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::Timeout | Self::Cancelled
        )
    }
}

#[cfg(not(feature = "parking-lot"))]
impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}
