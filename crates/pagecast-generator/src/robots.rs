//! Robots.txt generation.

use std::{fs::File, io::Write, path::Path};

use thiserror::Error;
use tracing::info;

/// Robots generation errors.
#[derive(Debug, Error)]
pub enum RobotsError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for robots generation.
pub type Result<T> = std::result::Result<T, RobotsError>;

/// Robots.txt generator.
#[derive(Debug)]
pub struct RobotsGenerator {
    base_url: String,
}

impl RobotsGenerator {
    /// Create a new robots generator for the site at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Write `robots.txt` allowing everything and pointing at the sitemap.
    pub fn generate(&self, output_dir: &Path) -> Result<()> {
        info!("generating robots.txt");

        let path = output_dir.join("robots.txt");
        let mut file = File::create(path)?;

        writeln!(file, "User-agent: *")?;
        writeln!(file, "Allow: /")?;
        writeln!(
            file,
            "Sitemap: {}/sitemap.xml",
            self.base_url.trim_end_matches('/')
        )?;

        Ok(())
    }
}
