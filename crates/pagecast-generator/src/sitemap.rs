//! Sitemap generation.
//!
//! Generates an XML sitemap for the pages built in one run.

use std::{fs, io::Write, path::Path};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Sitemap generator.
#[derive(Debug, Clone, Copy)]
pub struct SitemapGenerator {
    lastmod: NaiveDate,
}

impl SitemapGenerator {
    /// Create a generator stamping every entry with `lastmod`.
    #[must_use]
    pub fn new(lastmod: NaiveDate) -> Self {
        Self { lastmod }
    }

    /// Create a generator stamped with today's local date.
    #[must_use]
    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    /// Generate sitemap XML for the given URLs, in order.
    #[must_use]
    pub fn generate(&self, urls: &[String]) -> String {
        debug!(count = urls.len(), "generating sitemap");

        let lastmod = self.lastmod.format("%Y-%m-%d").to_string();
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for url in urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(url)));
            xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write sitemap to a writer.
    pub fn write_to<W: Write>(&self, urls: &[String], writer: &mut W) -> Result<()> {
        writer.write_all(self.generate(urls).as_bytes())?;
        Ok(())
    }

    /// Write `sitemap.xml` into the output directory, replacing any previous one.
    pub fn write(&self, urls: &[String], output_dir: &Path) -> Result<()> {
        let path = output_dir.join("sitemap.xml");
        let mut file = fs::File::create(&path)?;
        self.write_to(urls, &mut file)?;
        info!(path = %path.display(), count = urls.len(), "generated sitemap");
        Ok(())
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
