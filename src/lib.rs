//! chat-triage — pick out the latest message of every conversation in a
//! local message archive and decide which ones need a human reply.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod pipeline;
pub mod prompt;
pub mod render;
pub mod source;
pub mod triage;
