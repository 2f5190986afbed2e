use crate::{
    AccumulateStatus, Error, MonotonicClock, Order, OrderedStore, Result, TimeSource, UserRank,
    Window,
};
use core::time::Duration;
#[cfg(feature = "tracing")]
use tracing::instrument;


/// One row of a ranking: an entity and its accumulated value.
///
/// Entries are rebuilt from stored composite scores on every query and never
/// stored in this form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankEntry {
    pub id: i64,
    pub value: u64,
}

/// A leaderboard for one scoring window, kept in an [`OrderedStore`].
///
/// Each member's score is a composite: the accumulated value in the integer
/// part and, in the fraction, how long before the window end the member was
/// last updated (see [`crate::encode`]). Members with equal values are
/// therefore ranked by who reached that value first.
///
/// The leaderboard holds no mutable state. Its window, key and retention are
/// fixed at construction; all shared state lives in the store, and the one
/// read-modify-write is delegated to [`OrderedStore::accumulate`] so
/// concurrent updates from any number of tasks or processes never lose an
/// increment.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use zrank::{Leaderboard, MemoryStore, Order, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_secs(&self) -> i64 {
///         1_667_300_000
///     }
/// }
///
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// let board = Leaderboard::with_clock(
///     MemoryStore::new(),
///     "zrank:november",
///     1_667_232_000,
///     1_669_823_999,
///     Duration::from_secs(60 * 24 * 3600),
///     FixedTime,
/// )
/// .unwrap();
///
/// board.update(1, 100).await.unwrap();
/// board.update(2, 200).await.unwrap();
///
/// let top = board.ranking_list(1, Order::Desc).await.unwrap();
/// assert_eq!(top[0].id, 2);
/// assert_eq!(board.user_value(1).await.unwrap(), 100);
/// # });
/// ```
#[derive(Debug)]
pub struct Leaderboard<S, T = MonotonicClock> {
    store: S,
    key: String,
    window: Window,
    retention: Duration,
    clock: T,
}

impl<S: OrderedStore> Leaderboard<S> {
    /// Creates a leaderboard for `[start, end)` stored under `key`, timed by a
    /// [`MonotonicClock`].
    ///
    /// `retention` is the TTL refreshed on the key after every update.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidWindow`] when `end <= start` or the window is too
    /// long to leave room for values.
    pub fn new(
        store: S,
        key: impl Into<String>,
        start: i64,
        end: i64,
        retention: Duration,
    ) -> Result<Self> {
        Self::with_clock(store, key, start, end, retention, MonotonicClock::default())
    }
}

impl<S, T> Leaderboard<S, T>
where
    S: OrderedStore,
    T: TimeSource,
{
    /// Like [`Leaderboard::new`], with an explicit [`TimeSource`].
    pub fn with_clock(
        store: S,
        key: impl Into<String>,
        start: i64,
        end: i64,
        retention: Duration,
        clock: T,
    ) -> Result<Self> {
        Ok(Self {
            store,
            key: key.into(),
            window: Window::new(start, end)?,
            retention,
            clock,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Recovers the ranking value from a composite score returned by
    /// [`Self::update`].
    pub fn decode(&self, score: f64) -> Result<u64> {
        self.window.decode(score)
    }

    /// Adds `delta` to the value of entity `id` and stamps it with the
    /// current time as its tie-break.
    ///
    /// The increment is applied as one atomic store transaction. Afterwards
    /// the key's TTL is refreshed to the leaderboard's retention; a failure
    /// to refresh it is logged and otherwise ignored, since it only affects
    /// how long the data lives.
    ///
    /// Returns the new composite score; [`Self::decode`] turns it into the
    /// new accumulated value.
    ///
    /// # Errors
    ///
    /// - [`Error::EncodingOverflow`] when `delta` alone, or the accumulated
    ///   value, exceeds [`Window::max_value`]. Nothing is written.
    /// - [`Error::Store`] when the transaction fails. Retrying re-applies
    ///   `delta`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self), fields(key = %self.key))
    )]
    pub async fn update(&self, id: i64, delta: u64) -> Result<f64> {
        let incoming = self.window.encode(delta, self.clock.current_secs())?;
        let member = id.to_string();

        let status = self
            .store
            .accumulate(&self.key, &member, incoming, self.window.width())
            .await?;
        let score = match status {
            AccumulateStatus::Applied { score } => score,
            AccumulateStatus::Overflow { current } => {
                let value = self.window.decode(current)?.saturating_add(delta);
                return Err(Error::EncodingOverflow {
                    value,
                    width: self.window.width(),
                });
            }
        };

        if let Err(_err) = self.store.expire_after(&self.key, self.retention).await {
            #[cfg(feature = "tracing")]
            tracing::warn!(key = %self.key, error = %_err, "failed to refresh leaderboard ttl");
        }

        Ok(score)
    }

    /// Returns the top `top_n` entries in `order`; `0` returns every entry.
    ///
    /// The range is clamped to the current membership, so asking for more
    /// than there are returns them all. The result is a snapshot.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedScore`] / [`Error::MalformedMember`] when stored
    ///   data was not written by a leaderboard of this window.
    /// - [`Error::Store`] when the store fails.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self), fields(key = %self.key))
    )]
    pub async fn ranking_list(&self, top_n: usize, order: Order) -> Result<Vec<RankEntry>> {
        let total = self.store.cardinality(&self.key).await?;
        if total == 0 {
            return Ok(Vec::new());
        }

        let stop = match top_n as u64 {
            0 => total - 1,
            n => n.min(total) - 1,
        };
        let members = self
            .store
            .range_by_rank(&self.key, 0, stop, order)
            .await?;

        members
            .into_iter()
            .map(|scored| -> Result<RankEntry> {
                let id = scored
                    .member
                    .parse::<i64>()
                    .map_err(|_| Error::MalformedMember {
                        member: scored.member.clone(),
                    })?;
                let value = self.window.decode(scored.score)?;
                Ok(RankEntry { id, value })
            })
            .collect()
    }

    /// Returns the 0-based position of entity `id` in `order`, or
    /// [`UserRank::Absent`] if it has never been updated.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self), fields(key = %self.key))
    )]
    pub async fn user_rank(&self, id: i64, order: Order) -> Result<UserRank> {
        let rank = self
            .store
            .rank_of(&self.key, &id.to_string(), order)
            .await?;
        Ok(rank.into())
    }

    /// Returns the accumulated value of entity `id`.
    ///
    /// An entity that has never been updated reads as `0`, the same as one
    /// whose updates add up to zero. Use [`Self::user_rank`] to tell them
    /// apart.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self), fields(key = %self.key))
    )]
    pub async fn user_value(&self, id: i64) -> Result<u64> {
        match self.store.score(&self.key, &id.to_string()).await? {
            Some(score) => self.window.decode(score),
            None => Ok(0),
        }
    }

    /// Returns the number of entities on the leaderboard.
    pub async fn total_count(&self) -> Result<u64> {
        Ok(self.store.cardinality(&self.key).await?)
    }

    /// Removes every entry now, without waiting for the retention to lapse.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self), fields(key = %self.key))
    )]
    pub async fn clear(&self) -> Result<()> {
        Ok(self.store.delete(&self.key).await?)
    }
}
