//! Application state for handle moderation
//!
//! This crate holds the caller side of the moderation engine: persisted
//! violation counts, handle locks, policy loading and the handle change
//! mutation that ties them together.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod handle_change;
pub mod policy_loader;
pub mod violations;

use chrono::{DateTime, Utc};
use moderation::PolicyError;

pub use handle_change::{HandleChangeMutation, HandleChangeOutcome};
pub use policy_loader::load_policy;
pub use violations::{HandleLock, InMemoryViolationStore, ViolationStore};

/// Handle state errors
#[derive(Debug, thiserror::Error)]
pub enum HandleStateError {
    /// Handle changes are locked after a forced rename
    #[error("Handle is locked as {handle} until {until}")]
    Locked {
        /// Handle assigned by the forced rename
        handle: String,
        /// When the lock expires
        until: DateTime<Utc>,
    },

    /// Violation store failure
    #[error("Violation store error: {0}")]
    Store(String),

    /// Invalid moderation policy
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// Policy file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for handle state operations
pub type Result<T> = std::result::Result<T, HandleStateError>;
