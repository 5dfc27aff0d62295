//! Non-blocking interaction lock
//!
//! At most one logical operation (initial fill, or one swap and its cascade)
//! owns the board at a time. Acquisition never waits: it either succeeds or
//! fails immediately, and the caller drops its request on failure.

use crate::error::BoardError;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::error;

#[derive(Debug, Clone, Default)]
pub struct InteractionLock {
    locked: Arc<AtomicBool>,
}

impl InteractionLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    /// Take the lock if it is free
    pub fn try_acquire(&self) -> Option<InteractionGuard> {
        self.locked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InteractionGuard {
                locked: Arc::clone(&self.locked),
                released: false,
            })
    }

    /// Run `task` while holding the lock. Returns `None` without running
    /// anything if the lock is taken. A failed release replaces the task's
    /// result; an early return or panic still releases through the guard.
    pub async fn with_lock<F, Fut, T>(&self, task: F) -> Option<Result<T, BoardError>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, BoardError>>,
    {
        let guard = self.try_acquire()?;
        let result = task().await;
        Some(guard.release().and(result))
    }
}

/// Ownership of the interaction lock, released when dropped
#[derive(Debug)]
pub struct InteractionGuard {
    locked: Arc<AtomicBool>,
    released: bool,
}

impl InteractionGuard {
    /// Release explicitly, reporting a lock that was not actually held
    pub fn release(mut self) -> Result<(), BoardError> {
        self.released = true;
        Self::unlock(&self.locked)
    }

    fn unlock(locked: &AtomicBool) -> Result<(), BoardError> {
        if locked.swap(false, Ordering::AcqRel) {
            Ok(())
        } else {
            Err(BoardError::LockNotHeld)
        }
    }
}

impl Drop for InteractionGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = Self::unlock(&self.locked) {
            error!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let lock = InteractionLock::new();
        let guard = lock.try_acquire().unwrap();
        assert!(lock.is_locked());
        assert!(lock.try_acquire().is_none());
        drop(guard);
        assert!(!lock.is_locked());
        assert!(lock.try_acquire().is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let lock = InteractionLock::new();
        let other = lock.clone();
        let _guard = lock.try_acquire().unwrap();
        assert!(other.is_locked());
        assert!(other.try_acquire().is_none());
    }

    #[test]
    fn test_release_of_unheld_lock_is_reported() {
        let lock = InteractionLock::new();
        let guard = lock.try_acquire().unwrap();
        // Simulate something else clearing the flag behind the guard's back
        lock.locked.store(false, Ordering::Release);
        assert!(matches!(guard.release(), Err(BoardError::LockNotHeld)));
    }

    #[test]
    fn test_guard_releases_on_early_return() {
        fn bail(lock: &InteractionLock) -> Result<(), BoardError> {
            let _guard = lock.try_acquire().ok_or(BoardError::LockHeldAtStart)?;
            Err(BoardError::LockNotHeld)
        }
        let lock = InteractionLock::new();
        assert!(bail(&lock).is_err());
        assert!(!lock.is_locked());
    }

    #[tokio::test]
    async fn test_with_lock() {
        let lock = InteractionLock::new();
        let inner = lock.clone();
        let result = lock
            .with_lock(|| async move { Ok(inner.try_acquire().is_none()) })
            .await;
        assert!(matches!(result, Some(Ok(true))));
        assert!(!lock.is_locked());

        let _guard = lock.try_acquire().unwrap();
        assert!(lock.with_lock(|| async { Ok(1) }).await.is_none());
    }

    #[tokio::test]
    async fn test_with_lock_releases_after_error() {
        let lock = InteractionLock::new();
        let result: Option<Result<(), _>> = lock
            .with_lock(|| async { Err(BoardError::LockHeldAtStart) })
            .await;
        assert!(matches!(result, Some(Err(BoardError::LockHeldAtStart))));
        assert!(!lock.is_locked());
    }

    #[tokio::test]
    async fn test_with_lock_reports_lost_lock() {
        let lock = InteractionLock::new();
        let inner = lock.clone();
        let result = lock
            .with_lock(|| async move {
                inner.locked.store(false, Ordering::Release);
                Ok(())
            })
            .await;
        assert!(matches!(result, Some(Err(BoardError::LockNotHeld))));
    }
}
