//! Join, aggregation and classification of the archive relations.

pub mod classify;
pub mod join;

pub use classify::{SkipReason, TriageAction, classify};
pub use join::{ConversationView, latest_per_conversation};
