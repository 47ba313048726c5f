//! Build orchestration.
//!
//! Turns queries into landing pages and post log records, then rewrites the
//! site manifest files.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::NaiveDate;
use pagecast_core::{BuildSettings, CoreError, PostLog, PostRecord, SlugRegistry, slugify, title_case};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    content::ContentSource,
    html::{HtmlError, HtmlGenerator},
    queries::{QueryError, load_queries},
    robots::{RobotsError, RobotsGenerator},
    sitemap::{SitemapError, SitemapGenerator},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Query input error.
    #[error("input error: {0}")]
    Query(#[from] QueryError),

    /// Post log error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// HTML generation error.
    #[error("HTML error: {0}")]
    Html(#[from] HtmlError),

    /// Sitemap generation error.
    #[error("sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Robots generation error.
    #[error("robots error: {0}")]
    Robots(#[from] RobotsError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Outcome of one build run.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Records appended to the post log by this run, in order.
    pub built: Vec<PostRecord>,

    /// Queries skipped because their slug was already recorded.
    pub skipped: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

impl BuildReport {
    /// URLs written to the sitemap by this run.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.built.iter().map(|r| r.url.clone()).collect()
    }
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    settings: BuildSettings,
    site_dir: PathBuf,
    post_log: PostLog,
    limit: Option<usize>,
    html: HtmlGenerator,
    sitemap: SitemapGenerator,
}

impl Builder {
    /// Create a new builder writing pages under `site_dir` and records to
    /// the post log at `posts_path`.
    #[must_use]
    pub fn new(
        settings: BuildSettings,
        site_dir: impl Into<PathBuf>,
        posts_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            html: HtmlGenerator::new(settings.clone()),
            settings,
            site_dir: site_dir.into(),
            post_log: PostLog::new(posts_path),
            limit: None,
            sitemap: SitemapGenerator::today(),
        }
    }

    /// Process at most `limit` queries.
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Stamp sitemap entries with a fixed date instead of today.
    #[must_use]
    pub fn with_sitemap_date(mut self, date: NaiveDate) -> Self {
        self.sitemap = SitemapGenerator::new(date);
        self
    }

    /// Load queries from the CSV file at `queries_path` and build them.
    pub async fn build(
        &self,
        queries_path: &Path,
        source: &dyn ContentSource,
    ) -> Result<BuildReport> {
        let queries = load_queries(queries_path)?;
        self.build_queries(queries, source).await
    }

    /// Build pages for the given queries, in order.
    pub async fn build_queries(
        &self,
        mut queries: Vec<String>,
        source: &dyn ContentSource,
    ) -> Result<BuildReport> {
        let start = Instant::now();
        let mut report = BuildReport::default();

        if let Some(limit) = self.limit {
            queries.truncate(limit);
        }

        info!(
            queries = queries.len(),
            site = %self.site_dir.display(),
            posts = %self.post_log.path().display(),
            source = source.name(),
            "starting build"
        );

        fs::create_dir_all(&self.site_dir)?;

        let mut records = self.post_log.read_all()?;
        let mut registry = SlugRegistry::seeded(records.iter().map(|r| r.slug.trim().to_string()));
        debug!(recorded = registry.recorded_len(), "seeded slug registry from post log");
        let mut writer = self.post_log.writer()?;

        for query in queries {
            let title = title_case(&query);
            let slug = registry.ensure_unique(&slugify(&title));

            if registry.is_recorded(&slug) {
                debug!(slug = %slug, "already recorded, skipping");
                report.skipped += 1;
                continue;
            }

            let url = self.html.page_url(&slug);
            let content = source.generate(&query, &title, &url).await;

            let record = PostRecord {
                query,
                title,
                slug,
                url,
                post_text: content.post_text,
                description: content.description,
            };

            self.write_page(&record, &content.page_body)?;
            writer.append(&record)?;

            info!(slug = %record.slug, "built page");
            records.push(record.clone());
            report.built.push(record);
        }

        self.write_manifest(&report.urls(), &records)?;

        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            built = report.built.len(),
            skipped = report.skipped,
            duration_ms = report.duration_ms,
            "build complete"
        );

        Ok(report)
    }

    /// Write the landing page for one record.
    fn write_page(&self, record: &PostRecord, body: &str) -> Result<()> {
        let html = self.html.generate_page(record, body)?;
        let output_path = self.html.output_path(&record.slug, &self.site_dir);

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, html)?;

        debug!(path = %output_path.display(), "wrote page");
        Ok(())
    }

    /// Rewrite robots.txt, the sitemap of this run and the site index.
    fn write_manifest(&self, urls: &[String], records: &[PostRecord]) -> Result<()> {
        RobotsGenerator::new(&self.settings.site_base_url).generate(&self.site_dir)?;
        self.sitemap.write(urls, &self.site_dir)?;

        let index = self.html.generate_index(records)?;
        fs::write(self.site_dir.join("index.html"), index)?;

        Ok(())
    }
}
