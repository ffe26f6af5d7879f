//! Escalating enforcement for handle violations
//!
//! This module turns a blocklist verdict and the caller's prior violation
//! count into a decision:
//!
//! - clean handle → allowed, whatever the count
//! - violation 1..=`max_warnings` → warning, handle rejected
//! - any later violation → a generated handle is forced on the account and
//!   handle changes are locked for `lock_hours`
//!
//! The count lives with the caller. It should be read and incremented
//! atomically (for example an increment-and-return on the user record),
//! otherwise two concurrent violations can both be judged against the same
//! stale count.
//!
//! # Example
//!
//! ```
//! use moderation::HandleModerator;
//!
//! let moderator = HandleModerator::default();
//!
//! assert!(moderator.evaluate_handle_attempt("@sunny_day", "Jane Doe", 5).allowed);
//!
//! let first = moderator.evaluate_handle_attempt("@sh1t", "Jane Doe", 0);
//! assert!(first.warning);
//! assert_eq!(first.warning_number, 1);
//!
//! let third = moderator.evaluate_handle_attempt("@sh1t", "Jane Doe", 2);
//! assert!(third.forced);
//! assert_eq!(third.forced_handle.as_deref(), Some("@jdoe123"));
//! ```

use crate::blocklist::ModerationVerdict;
use crate::policy::ModerationPolicy;
use crate::safe_handle::generate_safe_handle;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Message for an accepted handle
pub const MESSAGE_ACCEPTABLE: &str = "Handle is acceptable";

/// Decision for one handle attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleCheckResult {
    /// Whether the requested handle may be used
    pub allowed: bool,
    /// Whether this attempt produced a warning
    pub warning: bool,
    /// 0 when clean, the warning number, or `max_warnings + 1` when forced
    pub warning_number: u32,
    /// Whether a generated handle was forced on the account
    pub forced: bool,
    /// Handle assigned when forced
    pub forced_handle: Option<String>,
    /// When handle changes unlock again, set only when forced
    pub locked_until: Option<DateTime<Utc>>,
    /// User-facing explanation, shown as-is
    pub message: String,
}

impl HandleCheckResult {
    /// Decision for a clean handle
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            warning: false,
            warning_number: 0,
            forced: false,
            forced_handle: None,
            locked_until: None,
            message: MESSAGE_ACCEPTABLE.to_string(),
        }
    }

    /// `locked_until` as an ISO-8601 string with millisecond precision
    pub fn locked_until_iso(&self) -> Option<String> {
        self.locked_until
            .map(|until| until.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
    }
}

/// Handle moderation engine
///
/// Holds an immutable [`ModerationPolicy`]. Safe to share between threads;
/// no state is kept between calls.
#[derive(Debug, Clone, Default)]
pub struct HandleModerator {
    policy: ModerationPolicy,
}

impl HandleModerator {
    /// Create a moderator for the given policy
    pub fn new(policy: ModerationPolicy) -> Self {
        Self { policy }
    }

    /// Get the policy in use
    pub fn policy(&self) -> &ModerationPolicy {
        &self.policy
    }

    /// Check a handle against the blocklist
    pub fn check_handle(&self, handle: &str) -> ModerationVerdict {
        self.policy.blocklist.check(handle, &self.policy.leet)
    }

    /// Generate the fallback handle for a display name
    pub fn generate_safe_handle(&self, name: &str) -> String {
        generate_safe_handle(name)
    }

    /// Evaluate a handle attempt at the current time
    pub fn evaluate_handle_attempt(
        &self,
        handle: &str,
        name: &str,
        current_warnings: i64,
    ) -> HandleCheckResult {
        self.evaluate_handle_attempt_at(handle, name, current_warnings, Utc::now())
    }

    /// Evaluate a handle attempt as of `now`
    pub fn evaluate_handle_attempt_at(
        &self,
        handle: &str,
        name: &str,
        current_warnings: i64,
        now: DateTime<Utc>,
    ) -> HandleCheckResult {
        let verdict = self.check_handle(handle);
        self.decide(&verdict, name, current_warnings, now)
    }

    /// Apply the escalation rules to an existing verdict
    ///
    /// Negative counts are treated as zero.
    pub fn decide(
        &self,
        verdict: &ModerationVerdict,
        name: &str,
        current_warnings: i64,
        now: DateTime<Utc>,
    ) -> HandleCheckResult {
        if verdict.is_clean {
            tracing::debug!(current_warnings, "handle allowed");
            return HandleCheckResult::allowed();
        }

        let config = &self.policy.enforcement;
        let new_count = current_warnings.max(0).saturating_add(1);

        if new_count <= i64::from(config.max_warnings) {
            // bounded by max_warnings above
            let warning_number = new_count as u32;
            tracing::debug!(warning_number, "handle rejected with warning");
            return HandleCheckResult {
                allowed: false,
                warning: true,
                warning_number,
                forced: false,
                forced_handle: None,
                locked_until: None,
                message: warning_message(warning_number, config.max_warnings),
            };
        }

        let forced_handle = generate_safe_handle(name);
        let locked_until = Duration::try_hours(config.lock_hours)
            .and_then(|lock| now.checked_add_signed(lock))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        tracing::debug!(
            forced_handle = forced_handle.as_str(),
            %locked_until,
            "handle forced after repeated violations"
        );

        HandleCheckResult {
            allowed: false,
            warning: false,
            warning_number: config.forced_warning_number(),
            forced: true,
            message: forced_message(&forced_handle, locked_until),
            forced_handle: Some(forced_handle),
            locked_until: Some(locked_until),
        }
    }
}

fn warning_message(warning_number: u32, max_warnings: u32) -> String {
    if warning_number >= max_warnings {
        "This handle contains inappropriate language. This is your final warning: \
         one more violation and a handle will be assigned to you."
            .to_string()
    } else {
        format!(
            "This handle contains inappropriate language. Please choose a different \
             handle. This is warning {} of {}.",
            warning_number, max_warnings
        )
    }
}

fn forced_message(forced_handle: &str, locked_until: DateTime<Utc>) -> String {
    format!(
        "Due to repeated violations your handle has been changed to {}. \
         You can choose a new handle after {}.",
        forced_handle,
        locked_until.format("%B %-d, %Y at %-I:%M %p UTC")
    )
}
