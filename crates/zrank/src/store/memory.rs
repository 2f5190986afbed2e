use super::{Order, OrderedStore, ScoredMember, mutex::StoreLock};
use crate::{AccumulateStatus, StoreError, canonical, max_value};
use core::{cmp::Ordering, time::Duration};
use std::{
    collections::{BTreeSet, HashMap},
    time::Instant,
};

/// An in-process [`OrderedStore`] with Redis sorted-set semantics.
///
/// All keys live behind one mutex, which is what makes
/// [`OrderedStore::accumulate`] atomic: the read, the floor, the add and the
/// write all happen under a single lock acquisition. Every call is
/// synchronous under the hood and never holds the lock across an `.await`.
///
/// Expiry is lazy. A key whose TTL has elapsed is dropped the next time any
/// call touches it, and behaves as empty from that point on.
///
/// ## Recommended When
/// - Tests and benchmarks
/// - A single process owns the leaderboard
///
/// Rank and range lookups walk the ordered set, so they cost O(n) in the
/// size of the key rather than the O(log n) of a Redis sorted set. Keep
/// boards small or put a real sorted-set backend behind [`OrderedStore`].
///
/// Share it between tasks with an [`Arc`](std::sync::Arc); every
/// [`OrderedStore`] is also implemented for `Arc<S>`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sets: StoreLock<HashMap<String, SortedSet>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Scores ordered with `f64::total_cmp`, so the set has a total order.
#[derive(Debug, Clone, Copy)]
struct Score(f64);

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Default)]
struct SortedSet {
    scores: HashMap<String, f64>,
    ordered: BTreeSet<(Score, String)>,
    expires_at: Option<Instant>,
}

impl SortedSet {
    fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|deadline| deadline <= Instant::now())
    }

    fn insert(&mut self, member: &str, score: f64) {
        if let Some(old) = self.scores.insert(member.to_owned(), score) {
            self.ordered.remove(&(Score(old), member.to_owned()));
        }
        self.ordered.insert((Score(score), member.to_owned()));
    }

    fn len(&self) -> u64 {
        self.ordered.len() as u64
    }

    fn rank(&self, member: &str, order: Order) -> Option<u64> {
        let score = *self.scores.get(member)?;
        let below = self
            .ordered
            .range(..(Score(score), member.to_owned()))
            .count() as u64;

        Some(match order {
            Order::Asc => below,
            Order::Desc => self.len() - 1 - below,
        })
    }

    fn range(&self, start: u64, stop: u64, order: Order) -> Vec<ScoredMember> {
        let len = self.len();
        if start >= len || start > stop {
            return Vec::new();
        }
        let skip = start as usize;
        let take = (stop.min(len - 1) - start + 1) as usize;

        let to_member = |(score, member): &(Score, String)| ScoredMember {
            member: member.clone(),
            score: score.0,
        };
        match order {
            Order::Asc => self.ordered.iter().skip(skip).take(take).map(to_member).collect(),
            Order::Desc => self
                .ordered
                .iter()
                .rev()
                .skip(skip)
                .take(take)
                .map(to_member)
                .collect(),
        }
    }
}

/// Looks up `key`, dropping it first if its TTL has elapsed.
fn live<'a>(sets: &'a mut HashMap<String, SortedSet>, key: &str) -> Option<&'a mut SortedSet> {
    if sets.get(key).is_some_and(SortedSet::is_expired) {
        sets.remove(key);
    }
    sets.get_mut(key)
}

fn live_or_default<'a>(sets: &'a mut HashMap<String, SortedSet>, key: &str) -> &'a mut SortedSet {
    if sets.get(key).is_some_and(SortedSet::is_expired) {
        sets.remove(key);
    }
    sets.entry(key.to_owned()).or_default()
}

impl OrderedStore for MemoryStore {
    async fn score(&self, key: &str, member: &str) -> Result<Option<f64>, StoreError> {
        let mut sets = self.sets.lock()?;
        Ok(live(&mut sets, key).and_then(|set| set.scores.get(member).copied()))
    }

    async fn set_score(&self, key: &str, member: &str, score: f64) -> Result<(), StoreError> {
        if !score.is_finite() {
            return Err(StoreError::InvalidScore);
        }
        let mut sets = self.sets.lock()?;
        live_or_default(&mut sets, key).insert(member, score);
        Ok(())
    }

    async fn accumulate(
        &self,
        key: &str,
        member: &str,
        incoming: f64,
        width: u32,
    ) -> Result<AccumulateStatus, StoreError> {
        if !incoming.is_finite() {
            return Err(StoreError::InvalidScore);
        }
        let mut sets = self.sets.lock()?;
        let set = live_or_default(&mut sets, key);

        let current = set.scores.get(member).copied().unwrap_or(0.0);
        let base = current.floor();
        let total = base + incoming.floor();
        if total > max_value(width) as f64 {
            return Ok(AccumulateStatus::Overflow { current });
        }

        let score = canonical(base + incoming, width);
        debug_assert_eq!(score.floor(), total);
        set.insert(member, score);
        Ok(AccumulateStatus::Applied { score })
    }

    async fn range_by_rank(
        &self,
        key: &str,
        start: u64,
        stop: u64,
        order: Order,
    ) -> Result<Vec<ScoredMember>, StoreError> {
        let mut sets = self.sets.lock()?;
        Ok(live(&mut sets, key).map_or_else(Vec::new, |set| set.range(start, stop, order)))
    }

    async fn rank_of(
        &self,
        key: &str,
        member: &str,
        order: Order,
    ) -> Result<Option<u64>, StoreError> {
        let mut sets = self.sets.lock()?;
        Ok(live(&mut sets, key).and_then(|set| set.rank(member, order)))
    }

    async fn cardinality(&self, key: &str) -> Result<u64, StoreError> {
        let mut sets = self.sets.lock()?;
        Ok(live(&mut sets, key).map_or(0, |set| set.len()))
    }

    async fn expire_after(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut sets = self.sets.lock()?;
        if ttl.is_zero() {
            sets.remove(key);
        } else if let Some(set) = live(&mut sets, key) {
            // A TTL too large for `Instant` never fires.
            set.expires_at = Instant::now().checked_add(ttl);
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.sets.lock()?.remove(key);
        Ok(())
    }
}
