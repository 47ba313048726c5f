//! Post records and the append-only post log.
//!
//! The post log is newline-delimited JSON, one record per line. It is the
//! only hand-off between the build and publish phases.

use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};

/// One generated page/post pair.
///
/// Every field defaults to empty on read so that hand-edited or partial
/// lines still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub slug: String,

    /// Canonical page URL.
    #[serde(default)]
    pub url: String,

    /// Text delivered to the channel.
    #[serde(default, rename = "tg_post")]
    pub post_text: String,

    /// Meta description of the page.
    #[serde(default)]
    pub description: String,
}

/// Read access to a post log file.
#[derive(Debug, Clone)]
pub struct PostLog {
    path: PathBuf,
}

impl PostLog {
    /// Create a handle for the post log at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in file order.
    ///
    /// Blank lines are skipped and a missing file reads as an empty log.
    pub fn read_all(&self) -> Result<Vec<PostRecord>> {
        match File::open(&self.path) {
            Ok(file) => self.read_from(file),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "post log not found, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read every record in file order, failing if the file does not exist.
    pub fn read_existing(&self) -> Result<Vec<PostRecord>> {
        match File::open(&self.path) {
            Ok(file) => self.read_from(file),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CoreError::missing_post_log(&self.path))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn read_from(&self, file: File) -> Result<Vec<PostRecord>> {
        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: PostRecord = serde_json::from_str(line)
                .map_err(|e| CoreError::post_log(&self.path, index + 1, e.to_string()))?;
            records.push(record);
        }

        debug!(path = %self.path.display(), count = records.len(), "read post log");
        Ok(records)
    }

    /// Open the log for appending, creating it if needed.
    pub fn writer(&self) -> Result<PostLogWriter> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        Ok(PostLogWriter { file })
    }
}

/// Append handle for a post log.
#[derive(Debug)]
pub struct PostLogWriter {
    file: File,
}

impl PostLogWriter {
    /// Append one record as a single line and flush it to disk.
    pub fn append(&mut self, record: &PostRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}
