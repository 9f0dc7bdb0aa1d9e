//! Outward-facing collaborators: reply transport, archive reveal, announcer.
//!
//! The pipeline only ever talks to these traits. Each concrete
//! implementation shells out to one macOS tool and nothing else, so the
//! core stays free of transport details.

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use crate::error::DispatchError;

// ── Reply transport ─────────────────────────────────────────────────

/// Outgoing reply transport: send `text` to `address`.
///
/// Dispatch failures are reported per conversation and never abort the
/// run. Delivery confirmation is whatever the transport reports — nothing
/// stronger is assumed.
pub trait ReplyDispatcher {
    fn send(&mut self, address: &str, text: &str) -> Result<(), DispatchError>;
}

/// Outcome of validating a reply before it reaches any transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutgoingCheck {
    /// Safe to hand to the transport.
    Send,
    /// Empty reply — the user declined. Not an error.
    Declined,
}

/// Validate a reply before dispatch.
///
/// Empty text means the user declined to reply. Text carrying characters
/// the AppleScript invocation cannot quote is rejected outright.
pub fn check_outgoing(text: &str) -> Result<OutgoingCheck, DispatchError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(OutgoingCheck::Declined);
    }
    if trimmed.contains(['[', ']', '"']) {
        return Err(DispatchError::InvalidOutgoing {
            reason: "reply contains characters the transport cannot quote".to_string(),
        });
    }
    Ok(OutgoingCheck::Send)
}

/// Sends replies through the Messages app via `osascript`.
pub struct OsaScriptDispatcher {
    script_path: PathBuf,
}

impl OsaScriptDispatcher {
    pub fn new(script_path: impl Into<PathBuf>) -> Self {
        Self {
            script_path: script_path.into(),
        }
    }
}

impl ReplyDispatcher for OsaScriptDispatcher {
    fn send(&mut self, address: &str, text: &str) -> Result<(), DispatchError> {
        debug!(address, script = %self.script_path.display(), "Invoking osascript transport");
        let output = Command::new("osascript")
            .arg(&self.script_path)
            .arg(address)
            .arg(text)
            .output()?;
        if !output.status.success() {
            return Err(DispatchError::TransportFailed {
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        info!(address, "Reply dispatched");
        Ok(())
    }
}

// ── Archive reveal ──────────────────────────────────────────────────

/// Makes the hidden archive file visible to the operating system.
///
/// Failure here is never fatal — opening the archive decides that.
pub trait StoreRevealer {
    fn reveal(&self) -> Result<(), DispatchError>;
}

/// Flips the Finder hidden-files preference so the archive under
/// `~/Library` is reachable.
pub struct FinderRevealer;

impl StoreRevealer for FinderRevealer {
    fn reveal(&self) -> Result<(), DispatchError> {
        let output = Command::new("defaults")
            .args(["write", "com.apple.finder", "AppleShowAllFiles", "YES"])
            .output()?;
        if !output.status.success() {
            return Err(DispatchError::TransportFailed {
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

// ── Announcer ───────────────────────────────────────────────────────

/// Speaks a short announcement about new messages.
pub trait Announcer {
    fn announce(&self, line: &str) -> Result<(), DispatchError>;
}

/// Voice output through the macOS `say` command.
pub struct SayAnnouncer {
    voice: String,
}

impl SayAnnouncer {
    pub fn new(voice: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
        }
    }
}

impl Announcer for SayAnnouncer {
    fn announce(&self, line: &str) -> Result<(), DispatchError> {
        let output = Command::new("say").args(["-v", &self.voice, line]).output()?;
        if !output.status.success() {
            return Err(DispatchError::TransportFailed {
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}
