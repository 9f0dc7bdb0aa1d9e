//! Contact book — the persistent address→name identity store.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::IdentityError;
use crate::prompt::Prompt;

/// Append-only contact store: one `address,name` record per line.
///
/// Neither field is escaped, so a comma inside an address or a name
/// corrupts that record (kept for parity with the legacy format).
/// Duplicate addresses are tolerated; the last record in read order wins
/// when the book is loaded.
pub struct ContactBook {
    path: PathBuf,
    names: HashMap<String, String>,
}

impl ContactBook {
    /// Load the book from disk, creating the backing file if absent.
    ///
    /// Malformed lines are skipped with a warning; a bad record never
    /// aborts loading of the rest.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IdentityError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;

        let mut names = HashMap::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match parse_record(&line) {
                Ok((address, name)) => {
                    names.insert(address, name);
                }
                Err(e) => {
                    warn!(line = idx + 1, error = %e, "Skipping malformed contact record");
                }
            }
        }
        debug!(contacts = names.len(), path = %path.display(), "Contact book loaded");
        Ok(Self { path, names })
    }

    /// Name for an address, if already known.
    pub fn lookup(&self, address: &str) -> Option<&str> {
        self.names.get(address).map(String::as_str)
    }

    /// Resolve an address to a display name.
    ///
    /// Known addresses resolve from memory without prompting. Unknown
    /// addresses ask the human collaborator, append the new record to disk
    /// and cache it for the rest of the run. The append is flushed before
    /// the name is returned, so a crash right after resolution never loses
    /// the mapping.
    pub fn resolve(
        &mut self,
        address: &str,
        last_message: &str,
        prompt: &mut dyn Prompt,
    ) -> Result<String, IdentityError> {
        if let Some(name) = self.names.get(address) {
            return Ok(name.clone());
        }
        let question = format!("Who is [{address}]? Last message=[{last_message}] ");
        let name = prompt.ask(&question)?;
        let name = name.trim().to_string();
        self.record(address, &name)?;
        Ok(name)
    }

    /// Append one record to the store.
    ///
    /// Does not deduplicate or rewrite earlier records; load-time policy
    /// for duplicates is last-one-wins.
    pub fn record(&mut self, address: &str, name: &str) -> Result<(), IdentityError> {
        let name = name.trim();
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        writeln!(file, "{address},{name}")?;
        file.sync_all()?;
        self.names.insert(address.to_string(), name.to_string());
        debug!(address, name, "Contact recorded");
        Ok(())
    }
}

/// Split one `address,name` record on the first comma.
fn parse_record(line: &str) -> Result<(String, String), IdentityError> {
    match line.split_once(',') {
        Some((address, name)) => Ok((address.to_string(), name.trim().to_string())),
        None => Err(IdentityError::MalformedRecord {
            line: line.to_string(),
        }),
    }
}
