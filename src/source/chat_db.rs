//! SQLite-backed message source reading a chat.db archive.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::info;

use super::{ChatLinkRow, HandleRow, MessageRow, MessageSource};
use crate::error::SourceError;

/// Read-only handle on the SQLite message archive.
#[derive(Debug)]
pub struct ChatDb {
    conn: Connection,
}

impl ChatDb {
    /// Open the archive read-only.
    ///
    /// A missing or unreadable archive is the one fatal condition of a run,
    /// so failures here carry the path they failed on.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| SourceError::Unavailable {
            path: path.display().to_string(),
            source: e,
        })?;
        info!(path = %path.display(), "Message archive opened");
        Ok(Self { conn })
    }
}

impl MessageSource for ChatDb {
    fn messages(&self) -> Result<Vec<MessageRow>, SourceError> {
        // ROWID order keeps the input row order stable across runs; the
        // join engine relies on it for deterministic tie-breaking.
        let mut stmt = self.conn.prepare(
            "SELECT ROWID, text, date, handle_id, is_sent FROM message ORDER BY ROWID",
        )?;
        let rows = stmt.query_map([], row_to_message)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn handles(&self) -> Result<Vec<HandleRow>, SourceError> {
        let mut stmt = self
            .conn
            .prepare("SELECT ROWID, id FROM handle ORDER BY ROWID")?;
        let rows = stmt.query_map([], row_to_handle)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn chat_links(&self) -> Result<Vec<ChatLinkRow>, SourceError> {
        let mut stmt = self
            .conn
            .prepare("SELECT chat_id, message_id FROM chat_message_join")?;
        let rows = stmt.query_map([], row_to_link)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

// ── Row mappers ─────────────────────────────────────────────────────

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        message_id: row.get(0)?,
        text: row.get(1)?,
        date: row.get(2)?,
        handle_id: row.get(3)?,
        outgoing: row.get::<_, i64>(4)? == 1,
    })
}

fn row_to_handle(row: &rusqlite::Row<'_>) -> rusqlite::Result<HandleRow> {
    Ok(HandleRow {
        handle_id: row.get(0)?,
        address: row.get(1)?,
    })
}

fn row_to_link(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatLinkRow> {
    Ok(ChatLinkRow {
        chat_id: row.get(0)?,
        message_id: row.get(1)?,
    })
}
