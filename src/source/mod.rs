//! Message source adapter — read-only access to the archive relations.

pub mod chat_db;

pub use chat_db::ChatDb;

use chrono::{DateTime, Utc};

use crate::error::SourceError;

/// Seconds between the Unix epoch and the archive reference epoch
/// (2001-01-01 00:00:00 UTC). Archive timestamps are nanoseconds past
/// that reference.
pub const ARCHIVE_EPOCH_OFFSET_SECS: i64 = 978_307_200;

/// One row of the `message` relation, as stored.
#[derive(Debug, Clone)]
pub struct MessageRow {
    /// Archive rowid — unique and stable.
    pub message_id: i64,
    /// Raw message text. The archive allows NULL here.
    pub text: Option<String>,
    /// Nanoseconds since the archive reference epoch.
    pub date: i64,
    /// Reference into the `handle` relation, absent for some rows.
    pub handle_id: Option<i64>,
    /// Outgoing (sent by the archive owner) vs incoming.
    pub outgoing: bool,
}

impl MessageRow {
    /// Civil timestamp of the message.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = ARCHIVE_EPOCH_OFFSET_SECS + self.date.div_euclid(1_000_000_000);
        let nanos = self.date.rem_euclid(1_000_000_000) as u32;
        DateTime::from_timestamp(secs, nanos).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// One row of the `handle` relation: an external addressable identity.
#[derive(Debug, Clone)]
pub struct HandleRow {
    pub handle_id: i64,
    /// External address (phone number or account string), unique per handle.
    pub address: String,
}

/// One row of the conversation-membership relation.
#[derive(Debug, Clone)]
pub struct ChatLinkRow {
    pub chat_id: i64,
    pub message_id: i64,
}

/// Read-only view over the three archive relations.
///
/// The archive is an external collaborator: the pipeline only ever reads
/// through this trait and never writes back.
pub trait MessageSource {
    fn messages(&self) -> Result<Vec<MessageRow>, SourceError>;
    fn handles(&self) -> Result<Vec<HandleRow>, SourceError>;
    fn chat_links(&self) -> Result<Vec<ChatLinkRow>, SourceError>;
}
