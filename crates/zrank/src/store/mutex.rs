use crate::StoreError;
#[cfg(feature = "parking-lot")]
use parking_lot::{Mutex, MutexGuard};
#[cfg(not(feature = "parking-lot"))]
use std::sync::{Mutex, MutexGuard};

/// The mutex guarding in-process store state.
///
/// Backed by `parking_lot` when the `parking-lot` feature is enabled (no
/// poisoning), by `std::sync::Mutex` otherwise, in which case a poisoned lock
/// surfaces as [`StoreError::LockPoisoned`].
#[derive(Debug, Default)]
pub(crate) struct StoreLock<T>(Mutex<T>);

impl<T> StoreLock<T> {
    #[cfg(feature = "parking-lot")]
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, T>, StoreError> {
        Ok(self.0.lock())
    }

    #[cfg(not(feature = "parking-lot"))]
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, T>, StoreError> {
        Ok(self.0.lock()?)
    }
}
