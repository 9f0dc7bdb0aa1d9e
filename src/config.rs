//! Configuration types.

use std::path::PathBuf;

/// Triage run configuration.
///
/// Every path and knob the pipeline needs is injected through this struct;
/// nothing reads ambient globals.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Path to the message archive (SQLite, chat.db layout).
    pub archive_path: PathBuf,
    /// Path to the append-only contact log.
    pub contacts_path: PathBuf,
    /// Width of rendered notice boxes, in columns.
    pub notice_width: usize,
    /// Voice for spoken announcements. `None` disables announcements.
    pub announce_voice: Option<String>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self {
            archive_path: PathBuf::from(home).join("Library/Messages/chat.db"),
            contacts_path: PathBuf::from("contacts"),
            notice_width: 90,
            announce_voice: None,
        }
    }
}
