//! The ordered store a leaderboard is kept in.
//!
//! [`OrderedStore`] is the sorted-set surface a leaderboard needs: per-member
//! scores under a key, rank queries in both directions, cardinality, a TTL on
//! the key, and one atomic read-modify-write ([`OrderedStore::accumulate`]).
//! Anything offering Redis sorted-set semantics can implement it;
//! [`MemoryStore`] is the in-process implementation.

mod memory;
mod mutex;
#[cfg(feature = "async-tokio")]
mod timeout;

pub use memory::*;
#[cfg_attr(docsrs, doc(cfg(feature = "async-tokio")))]
#[cfg(feature = "async-tokio")]
pub use timeout::*;

use crate::{AccumulateStatus, StoreError};
use core::{future::Future, time::Duration};
use std::sync::Arc;

/// Direction of a rank query.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Order {
    /// Highest score first.
    #[default]
    Desc,
    /// Lowest score first.
    Asc,
}

/// A member and its raw stored score, as returned by a range query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMember {
    pub member: String,
    pub score: f64,
}

/// A sorted-set store.
///
/// Members of one key are ordered by `(score, member)` ascending; descending
/// order is the exact reverse. Ranks are 0-based. A key that does not exist
/// (or has expired) behaves as an empty set.
///
/// Every future is `Send` so leaderboards can be driven from multi-threaded
/// runtimes.
pub trait OrderedStore {
    /// Returns the score of `member`, if present.
    fn score(
        &self,
        key: &str,
        member: &str,
    ) -> impl Future<Output = Result<Option<f64>, StoreError>> + Send;

    /// Inserts `member` or overwrites its score.
    ///
    /// A non-finite `score` is refused with [`StoreError::InvalidScore`].
    fn set_score(
        &self,
        key: &str,
        member: &str,
        score: f64,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Atomically folds `incoming` into the score of `member`.
    ///
    /// As one indivisible step with respect to every other call on `key`:
    ///
    /// 1. read the current score, 0 when absent;
    /// 2. drop its fraction: `base = floor(current)`;
    /// 3. if `base + floor(incoming)` exceeds [`crate::max_value`] for
    ///    `width`, stop and return [`AccumulateStatus::Overflow`] without
    ///    writing;
    /// 4. otherwise store `base + incoming`, snapped to the `width`-digit
    ///    grid by [`crate::canonical`], and return it as
    ///    [`AccumulateStatus::Applied`]. Its integer part is always
    ///    `base + floor(incoming)`.
    ///
    /// A non-finite `incoming` is refused with [`StoreError::InvalidScore`].
    ///
    /// Implementations must not split this into separate reads and writes
    /// that a concurrent caller could interleave with; that loses increments.
    fn accumulate(
        &self,
        key: &str,
        member: &str,
        incoming: f64,
        width: u32,
    ) -> impl Future<Output = Result<AccumulateStatus, StoreError>> + Send;

    /// Returns members at ranks `start..=stop` in `order`.
    ///
    /// Bounds past the end are clamped; an empty vector comes back when
    /// `start` is past the end or after `stop`.
    fn range_by_rank(
        &self,
        key: &str,
        start: u64,
        stop: u64,
        order: Order,
    ) -> impl Future<Output = Result<Vec<ScoredMember>, StoreError>> + Send;

    /// Returns the 0-based rank of `member` in `order`, if present.
    fn rank_of(
        &self,
        key: &str,
        member: &str,
        order: Order,
    ) -> impl Future<Output = Result<Option<u64>, StoreError>> + Send;

    /// Returns the number of members under `key`.
    fn cardinality(&self, key: &str) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Discards `key` once `ttl` has elapsed. A zero TTL discards it now.
    /// Does nothing when the key does not exist.
    fn expire_after(
        &self,
        key: &str,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Discards `key` and every member under it.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<S: OrderedStore> OrderedStore for Arc<S> {
    fn score(
        &self,
        key: &str,
        member: &str,
    ) -> impl Future<Output = Result<Option<f64>, StoreError>> + Send {
        (**self).score(key, member)
    }

    fn set_score(
        &self,
        key: &str,
        member: &str,
        score: f64,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).set_score(key, member, score)
    }

    fn accumulate(
        &self,
        key: &str,
        member: &str,
        incoming: f64,
        width: u32,
    ) -> impl Future<Output = Result<AccumulateStatus, StoreError>> + Send {
        (**self).accumulate(key, member, incoming, width)
    }

    fn range_by_rank(
        &self,
        key: &str,
        start: u64,
        stop: u64,
        order: Order,
    ) -> impl Future<Output = Result<Vec<ScoredMember>, StoreError>> + Send {
        (**self).range_by_rank(key, start, stop, order)
    }

    fn rank_of(
        &self,
        key: &str,
        member: &str,
        order: Order,
    ) -> impl Future<Output = Result<Option<u64>, StoreError>> + Send {
        (**self).rank_of(key, member, order)
    }

    fn cardinality(&self, key: &str) -> impl Future<Output = Result<u64, StoreError>> + Send {
        (**self).cardinality(key)
    }

    fn expire_after(
        &self,
        key: &str,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).expire_after(key, ttl)
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).delete(key)
    }
}
