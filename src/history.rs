use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

#[cfg(test)]
use mockall::automock;

use crate::error::Result;

/// Record of identifiers already notified. Once recorded, an identifier
/// stays recorded until an explicit clear.
#[cfg_attr(test, automock)]
pub trait NotificationHistory: Send {
    fn has_been_notified(&self, identifier: &str) -> bool;
    fn add_history(&mut self, identifier: &str) -> Result<()>;
    fn clear_history(&mut self) -> Result<()>;
}

/// History backed by a line-delimited append-only text file, mirrored by an
/// in-memory set. Both sides are updated on every append, so membership
/// checks within the same run see fresh entries.
pub struct FileHistory {
    path: PathBuf,
    seen: HashSet<String>,
}

impl FileHistory {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut seen = HashSet::new();

        if path.is_file() {
            for line in fs::read_to_string(&path)?.lines() {
                let line = line.trim();
                if !line.is_empty() {
                    seen.insert(line.to_string());
                }
            }
            info!("Loaded {} notification(s) from history", seen.len());
        } else {
            info!("No history file at {}, starting empty", path.display());
        }

        Ok(Self { path, seen })
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl NotificationHistory for FileHistory {
    fn has_been_notified(&self, identifier: &str) -> bool {
        self.seen.contains(identifier)
    }

    fn add_history(&mut self, identifier: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", identifier)?;
        self.seen.insert(identifier.to_string());
        debug!("Added history entry for {}", identifier);
        Ok(())
    }

    fn clear_history(&mut self) -> Result<()> {
        fs::File::create(&self.path)?;
        self.seen.clear();
        info!("Cleared notification history at {}", self.path.display());
        Ok(())
    }
}
