//! Handle moderation for Aurora Compass
//!
//! This crate decides whether a user-chosen handle hides profanity behind
//! leet-speak, separators or repeated letters, and turns that verdict plus
//! the caller's violation count into an allow/warn/force decision.
//!
//! Every function here is pure. Warning counts, lock expiry and the
//! blocklist contents belong to the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod blocklist;
pub mod enforcement;
pub mod leet;
pub mod normalize;
pub mod policy;
pub mod safe_handle;

pub use blocklist::{Blocklist, ModerationVerdict};
pub use enforcement::{HandleCheckResult, HandleModerator};
pub use leet::LeetTable;
pub use normalize::VariantSet;
pub use policy::{EnforcementConfig, ModerationPolicy, PolicyError};
pub use safe_handle::generate_safe_handle;
