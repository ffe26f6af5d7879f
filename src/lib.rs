//! Handle moderation for Aurora Compass
//!
//! Re-exports the moderation engine and its application-state layer.

pub use app_state;
pub use moderation;
