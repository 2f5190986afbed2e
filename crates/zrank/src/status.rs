/// Outcome of [`OrderedStore::accumulate`].
///
/// - [`AccumulateStatus::Applied`] means the member now holds `score`.
/// - [`AccumulateStatus::Overflow`] means the accumulated value would have
///   crossed the caller's ceiling, and the store left the member untouched.
///
/// [`OrderedStore::accumulate`]: crate::OrderedStore::accumulate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AccumulateStatus {
    /// The transaction wrote a new composite score.
    Applied {
        /// The score now stored for the member.
        score: f64,
    },
    /// The transaction was refused.
    Overflow {
        /// The score still stored for the member (0 when absent).
        current: f64,
    },
}

/// A member's position on a leaderboard.
///
/// # Example
///
/// ```
/// use zrank::UserRank;
///
/// assert_eq!(UserRank::Ranked { rank: 2 }.to_raw(), 2);
/// assert_eq!(UserRank::Absent.to_raw(), -1);
/// assert_eq!(UserRank::Absent.rank(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRank {
    /// The member is on the board at this 0-based position.
    Ranked {
        /// 0-based position in the requested order.
        rank: u64,
    },
    /// The member has never been updated (or the board expired).
    Absent,
}

impl UserRank {
    /// The 0-based rank, if present.
    pub fn rank(self) -> Option<u64> {
        match self {
            Self::Ranked { rank } => Some(rank),
            Self::Absent => None,
        }
    }

    /// The rank as a signed integer, with `-1` standing for absent.
    pub fn to_raw(self) -> i64 {
        match self {
            Self::Ranked { rank } => rank as i64,
            Self::Absent => -1,
        }
    }
}

impl From<Option<u64>> for UserRank {
    fn from(rank: Option<u64>) -> Self {
        rank.map_or(Self::Absent, |rank| Self::Ranked { rank })
    }
}
