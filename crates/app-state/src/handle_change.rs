//! Handle change mutation
//!
//! Wires the stateless moderation engine to a [`ViolationStore`]. Each store
//! write rejects the change while a forced-rename lock is active, so the
//! lock check and the update happen together.

use chrono::{DateTime, Utc};
use moderation::{HandleCheckResult, HandleModerator};
use std::sync::Arc;

use crate::violations::{HandleLock, ViolationStore};
use crate::{HandleStateError, Result};

/// Result of a handle change attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleChangeOutcome {
    /// Engine decision, to surface to the user
    pub decision: HandleCheckResult,
    /// Handle the account now has: the requested one if allowed, the forced
    /// one if forced, nothing after a warning
    pub applied_handle: Option<String>,
}

impl HandleChangeOutcome {
    /// Check if the account's handle changed
    pub fn changed(&self) -> bool {
        self.applied_handle.is_some()
    }
}

/// Mutation for changing an account's handle
pub struct HandleChangeMutation {
    moderator: Arc<HandleModerator>,
    store: Arc<dyn ViolationStore>,
}

impl HandleChangeMutation {
    /// Create a new handle change mutation
    pub fn new(moderator: Arc<HandleModerator>, store: Arc<dyn ViolationStore>) -> Self {
        Self { moderator, store }
    }

    /// Execute the mutation at the current time
    ///
    /// # Arguments
    ///
    /// * `account` - The DID of the account changing its handle
    /// * `requested_handle` - The handle the user asked for
    /// * `display_name` - Used to derive a forced handle
    pub async fn execute(
        &self,
        account: &str,
        requested_handle: &str,
        display_name: &str,
    ) -> Result<HandleChangeOutcome> {
        self.execute_at(account, requested_handle, display_name, Utc::now())
            .await
    }

    /// Execute the mutation as of `now`
    ///
    /// Fails with [`HandleStateError::Locked`] while a forced-rename lock is
    /// active, including a lock set by a concurrent attempt.
    pub async fn execute_at(
        &self,
        account: &str,
        requested_handle: &str,
        display_name: &str,
        now: DateTime<Utc>,
    ) -> Result<HandleChangeOutcome> {
        let verdict = self.moderator.check_handle(requested_handle);
        if verdict.is_clean {
            self.store
                .apply_handle(account, requested_handle, now)
                .await
                .inspect_err(|e| log_locked(account, e))?;
            return Ok(HandleChangeOutcome {
                decision: HandleCheckResult::allowed(),
                applied_handle: Some(requested_handle.to_string()),
            });
        }

        let new_count = self
            .store
            .record_violation(account, now)
            .await
            .inspect_err(|e| log_locked(account, e))?;
        tracing::warn!(
            account,
            violations = new_count,
            matched = verdict.matched_word.as_deref().unwrap_or_default(),
            "handle violation recorded"
        );

        let previous = i64::from(new_count.saturating_sub(1));
        let decision = self.moderator.decide(&verdict, display_name, previous, now);

        let applied_handle = match (&decision.forced_handle, decision.locked_until) {
            (Some(handle), Some(locked_until)) => {
                let lock = HandleLock {
                    handle: handle.clone(),
                    locked_until,
                };
                self.store
                    .force_handle(account, lock, now)
                    .await
                    .inspect_err(|e| log_locked(account, e))?;
                tracing::info!(account, handle = handle.as_str(), %locked_until, "handle forced");
                Some(handle.clone())
            }
            _ => None,
        };

        Ok(HandleChangeOutcome {
            decision,
            applied_handle,
        })
    }
}

fn log_locked(account: &str, error: &HandleStateError) {
    if let HandleStateError::Locked { until, .. } = error {
        tracing::warn!(account, until = %until, "handle change rejected while locked");
    }
}
