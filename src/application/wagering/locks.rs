//! Per-user exclusive access for the check-then-debit sequence.
//!
//! Each user gets one fair async mutex, created on first use and evicted
//! when the last lease for that user is dropped. Leases release on drop, so
//! early returns, errors and cancelled futures all give access back.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::id::UserId;

/// Table of per-user mutexes.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

/// Exclusive access to one user's balance until dropped.
#[derive(Debug)]
pub struct UserLease<'a> {
    table: &'a UserLocks,
    user: UserId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl UserLease<'_> {
    /// The user this lease covers.
    #[must_use]
    pub const fn user(&self) -> UserId {
        self.user
    }
}

impl Drop for UserLease<'_> {
    fn drop(&mut self) {
        // Release first so the guard's handle no longer counts.
        drop(self.guard.take());
        self.table
            .locks
            .remove_if(&self.user, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

impl UserLocks {
    /// Create an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user`.
    ///
    /// Waiters are served in the order they arrived.
    pub async fn acquire(&self, user: UserId) -> UserLease<'_> {
        let mutex = self.locks.entry(user).or_default().clone();
        let mut lease = UserLease {
            table: self,
            user,
            guard: None,
        };
        lease.guard = Some(mutex.lock_owned().await);
        lease
    }

    /// Like [`acquire`](Self::acquire) but gives up after `timeout`.
    pub async fn acquire_timeout(&self, user: UserId, timeout: Duration) -> Option<UserLease<'_>> {
        tokio::time::timeout(timeout, self.acquire(user)).await.ok()
    }

    /// Number of users with a live mutex.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// True when no user holds or waits for a lease.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
