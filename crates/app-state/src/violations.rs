//! Persisted handle-violation state
//!
//! The moderation engine is stateless. This module keeps what it needs from
//! one attempt to the next: how many violations an account has, its current
//! handle, and whether a forced rename currently locks that handle.
//!
//! Every write checks the lock in the same atomic step as the update.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{HandleStateError, Result};

/// Handle lock issued with a forced rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleLock {
    /// Handle that was assigned to the account
    pub handle: String,
    /// Handle changes are rejected until this time
    pub locked_until: DateTime<Utc>,
}

impl HandleLock {
    /// Check if the lock still applies at `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.locked_until > now
    }
}

impl From<HandleLock> for HandleStateError {
    fn from(lock: HandleLock) -> Self {
        HandleStateError::Locked {
            handle: lock.handle,
            until: lock.locked_until,
        }
    }
}

/// Storage for per-account violation counts, handles and locks
///
/// Writes taking `now` fail with [`HandleStateError::Locked`] while a lock
/// is active, and must check and write atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ViolationStore: Send + Sync {
    /// Number of violations recorded for the account
    async fn warning_count(&self, account: &str) -> Result<u32>;

    /// Handle last applied to the account
    async fn current_handle(&self, account: &str) -> Result<Option<String>>;

    /// Lock that is still in force at `now`, if any
    async fn active_lock(&self, account: &str, now: DateTime<Utc>) -> Result<Option<HandleLock>>;

    /// Set the account's handle unless a lock is active
    async fn apply_handle(&self, account: &str, handle: &str, now: DateTime<Utc>) -> Result<()>;

    /// Increment the violation count unless a lock is active, returning the
    /// new count
    async fn record_violation(&self, account: &str, now: DateTime<Utc>) -> Result<u32>;

    /// Apply a forced handle and its lock unless a lock is already active
    async fn force_handle(&self, account: &str, lock: HandleLock, now: DateTime<Utc>)
        -> Result<()>;

    /// Forget all violations, handles and locks for the account
    async fn reset(&self, account: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
struct AccountRecord {
    violations: u32,
    handle: Option<String>,
    lock: Option<HandleLock>,
}

impl AccountRecord {
    fn ensure_unlocked(&self, now: DateTime<Utc>) -> Result<()> {
        match &self.lock {
            Some(lock) if lock.is_active(now) => Err(lock.clone().into()),
            _ => Ok(()),
        }
    }
}

/// In-process [`ViolationStore`]
///
/// All reads and writes happen under a single mutex, so lock checks and
/// updates are atomic across tasks and threads.
#[derive(Debug, Default)]
pub struct InMemoryViolationStore {
    records: Mutex<HashMap<String, AccountRecord>>,
}

impl InMemoryViolationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts with recorded state
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Check if no account has recorded state
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl ViolationStore for InMemoryViolationStore {
    async fn warning_count(&self, account: &str) -> Result<u32> {
        Ok(self
            .records
            .lock()
            .get(account)
            .map(|record| record.violations)
            .unwrap_or(0))
    }

    async fn current_handle(&self, account: &str) -> Result<Option<String>> {
        Ok(self
            .records
            .lock()
            .get(account)
            .and_then(|record| record.handle.clone()))
    }

    async fn active_lock(&self, account: &str, now: DateTime<Utc>) -> Result<Option<HandleLock>> {
        Ok(self
            .records
            .lock()
            .get(account)
            .and_then(|record| record.lock.as_ref())
            .filter(|lock| lock.is_active(now))
            .cloned())
    }

    async fn apply_handle(&self, account: &str, handle: &str, now: DateTime<Utc>) -> Result<()> {
        let mut records = self.records.lock();
        let record = records.entry(account.to_string()).or_default();
        record.ensure_unlocked(now)?;
        record.handle = Some(handle.to_string());
        Ok(())
    }

    async fn record_violation(&self, account: &str, now: DateTime<Utc>) -> Result<u32> {
        let mut records = self.records.lock();
        let record = records.entry(account.to_string()).or_default();
        record.ensure_unlocked(now)?;
        record.violations = record.violations.saturating_add(1);
        Ok(record.violations)
    }

    async fn force_handle(
        &self,
        account: &str,
        lock: HandleLock,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut records = self.records.lock();
        let record = records.entry(account.to_string()).or_default();
        record.ensure_unlocked(now)?;
        record.handle = Some(lock.handle.clone());
        record.lock = Some(lock);
        Ok(())
    }

    async fn reset(&self, account: &str) -> Result<()> {
        self.records.lock().remove(account);
        Ok(())
    }
}
