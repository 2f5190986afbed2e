use super::{Order, OrderedStore, ScoredMember};
use crate::{AccumulateStatus, StoreError};
use core::{future::Future, time::Duration};

/// An [`OrderedStore`] adapter that bounds every call with Tokio's timer.
///
/// A call that does not finish within the deadline resolves to
/// [`StoreError::Timeout`]. The inner future is dropped at that point, so a
/// remote store may or may not have applied the write; the caller decides
/// whether a retry is safe.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use zrank::{MemoryStore, TimeoutStore};
///
/// let store = TimeoutStore::new(MemoryStore::new(), Duration::from_millis(250));
/// assert_eq!(store.timeout(), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct TimeoutStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S> TimeoutStore<S> {
    /// Wraps `inner`, bounding each of its calls by `timeout`.
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

async fn bounded<T>(
    timeout: Duration,
    call: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| StoreError::Timeout)?
}

impl<S: OrderedStore> OrderedStore for TimeoutStore<S> {
    fn score(
        &self,
        key: &str,
        member: &str,
    ) -> impl Future<Output = Result<Option<f64>, StoreError>> + Send {
        bounded(self.timeout, self.inner.score(key, member))
    }

    fn set_score(
        &self,
        key: &str,
        member: &str,
        score: f64,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        bounded(self.timeout, self.inner.set_score(key, member, score))
    }

    fn accumulate(
        &self,
        key: &str,
        member: &str,
        incoming: f64,
        width: u32,
    ) -> impl Future<Output = Result<AccumulateStatus, StoreError>> + Send {
        bounded(
            self.timeout,
            self.inner.accumulate(key, member, incoming, width),
        )
    }

    fn range_by_rank(
        &self,
        key: &str,
        start: u64,
        stop: u64,
        order: Order,
    ) -> impl Future<Output = Result<Vec<ScoredMember>, StoreError>> + Send {
        bounded(
            self.timeout,
            self.inner.range_by_rank(key, start, stop, order),
        )
    }

    fn rank_of(
        &self,
        key: &str,
        member: &str,
        order: Order,
    ) -> impl Future<Output = Result<Option<u64>, StoreError>> + Send {
        bounded(self.timeout, self.inner.rank_of(key, member, order))
    }

    fn cardinality(&self, key: &str) -> impl Future<Output = Result<u64, StoreError>> + Send {
        bounded(self.timeout, self.inner.cardinality(key))
    }

    fn expire_after(
        &self,
        key: &str,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        bounded(self.timeout, self.inner.expire_after(key, ttl))
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        bounded(self.timeout, self.inner.delete(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use futures::future;

    /// A store whose reads never complete.
    struct StalledStore;

    impl OrderedStore for StalledStore {
        async fn score(&self, _: &str, _: &str) -> Result<Option<f64>, StoreError> {
            future::pending().await
        }

        async fn set_score(&self, _: &str, _: &str, _: f64) -> Result<(), StoreError> {
            Ok(())
        }

        async fn accumulate(
            &self,
            _: &str,
            _: &str,
            _: f64,
            _: u32,
        ) -> Result<AccumulateStatus, StoreError> {
            future::pending().await
        }

        async fn range_by_rank(
            &self,
            _: &str,
            _: u64,
            _: u64,
            _: Order,
        ) -> Result<Vec<ScoredMember>, StoreError> {
            future::pending().await
        }

        async fn rank_of(&self, _: &str, _: &str, _: Order) -> Result<Option<u64>, StoreError> {
            future::pending().await
        }

        async fn cardinality(&self, _: &str) -> Result<u64, StoreError> {
            future::pending().await
        }

        async fn expire_after(&self, _: &str, _: Duration) -> Result<(), StoreError> {
            Ok(())
        }

        async fn delete(&self, _: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_calls_time_out() {
        let store = TimeoutStore::new(StalledStore, Duration::from_secs(1));
        assert_eq!(store.cardinality("k").await, Err(StoreError::Timeout));
        assert_eq!(store.score("k", "m").await, Err(StoreError::Timeout));
        assert_eq!(
            store.accumulate("k", "m", 1.5, 3).await,
            Err(StoreError::Timeout)
        );
        assert_eq!(store.set_score("k", "m", 1.5).await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn fast_calls_pass_through() {
        let store = TimeoutStore::new(MemoryStore::new(), Duration::from_millis(10));
        store.set_score("k", "m", 2.5).await.unwrap();
        assert_eq!(store.score("k", "m").await.unwrap(), Some(2.5));
        assert_eq!(store.cardinality("k").await.unwrap(), 1);
    }
}
