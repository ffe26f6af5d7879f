//! Moderation policy configuration
//!
//! A [`ModerationPolicy`] bundles everything the engine treats as data rather
//! than algorithm: the leet table, the blocklist and the escalation limits.
//! Policies are plain serde documents so callers can load them from wherever
//! they keep configuration and swap them per region without code changes.

use crate::blocklist::Blocklist;
use crate::leet::LeetTable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while building a policy
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Policy document is not valid JSON or has the wrong shape
    #[error("Invalid policy document: {0}")]
    Json(#[from] serde_json::Error),

    /// A blocklist term is empty
    #[error("Empty term in {list} list")]
    EmptyTerm {
        /// List containing the term
        list: &'static str,
    },

    /// A blocklist term contains uppercase characters
    #[error("Term must be lowercase: {0}")]
    NotLowercase(String),

    /// A term appears in both the exact and substring lists
    #[error("Term appears in both exact and substring lists: {0}")]
    OverlappingTerm(String),

    /// Escalation limits are out of range
    #[error("Invalid enforcement settings: {0}")]
    InvalidEnforcement(String),
}

/// Result type for policy operations
pub type Result<T> = std::result::Result<T, PolicyError>;

/// Default number of warnings before a handle is forced
pub const DEFAULT_MAX_WARNINGS: u32 = 2;

/// Default handle-change lock after a forced rename
pub const DEFAULT_LOCK_HOURS: i64 = 72;

/// Escalation limits for repeated violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnforcementConfig {
    /// Violations answered with a warning before forcing a handle
    #[serde(default = "default_max_warnings")]
    pub max_warnings: u32,
    /// How long handle changes stay locked after forcing
    #[serde(default = "default_lock_hours")]
    pub lock_hours: i64,
}

fn default_max_warnings() -> u32 {
    DEFAULT_MAX_WARNINGS
}

fn default_lock_hours() -> i64 {
    DEFAULT_LOCK_HOURS
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            max_warnings: DEFAULT_MAX_WARNINGS,
            lock_hours: DEFAULT_LOCK_HOURS,
        }
    }
}

impl EnforcementConfig {
    /// Warning number reported with a forced decision
    pub fn forced_warning_number(&self) -> u32 {
        self.max_warnings.saturating_add(1)
    }

    fn validate(&self) -> Result<()> {
        if self.max_warnings == 0 {
            return Err(PolicyError::InvalidEnforcement(
                "maxWarnings must be at least 1".to_string(),
            ));
        }
        if self.lock_hours <= 0 {
            return Err(PolicyError::InvalidEnforcement(format!(
                "lockHours must be positive, got {}",
                self.lock_hours
            )));
        }
        Ok(())
    }
}

/// Complete moderation policy
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationPolicy {
    /// Leet-speak substitutions
    #[serde(default)]
    pub leet: LeetTable,
    /// Blocked terms
    #[serde(default)]
    pub blocklist: Blocklist,
    /// Escalation limits
    #[serde(default)]
    pub enforcement: EnforcementConfig,
}

impl ModerationPolicy {
    /// Create a policy from its parts
    pub fn new(leet: LeetTable, blocklist: Blocklist, enforcement: EnforcementConfig) -> Self {
        Self {
            leet,
            blocklist,
            enforcement,
        }
    }

    /// Parse and validate a JSON policy document
    ///
    /// Missing sections fall back to the built-in defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: ModerationPolicy = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Serialize the policy as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the blocklist and limits are usable
    pub fn validate(&self) -> Result<()> {
        validate_terms("exact", &self.blocklist.exact)?;
        validate_terms("substring", &self.blocklist.substring)?;

        let exact: HashSet<&str> = self.blocklist.exact.iter().map(String::as_str).collect();
        if let Some(term) = self
            .blocklist
            .substring
            .iter()
            .find(|term| exact.contains(term.as_str()))
        {
            return Err(PolicyError::OverlappingTerm(term.clone()));
        }

        self.enforcement.validate()
    }
}

fn validate_terms(list: &'static str, terms: &[String]) -> Result<()> {
    for term in terms {
        if term.trim().is_empty() {
            return Err(PolicyError::EmptyTerm { list });
        }
        if term.to_lowercase() != *term {
            return Err(PolicyError::NotLowercase(term.clone()));
        }
    }
    Ok(())
}
