//! Landing page and site index rendering.

use std::path::{Path, PathBuf};

use pagecast_core::{BuildSettings, PostRecord};
use thiserror::Error;
use tracing::debug;

use crate::template::{SHARED_STYLE, TemplateContext, TemplateError, TemplateRegistry, escape_html};

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum HtmlError {
    /// Template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, HtmlError>;

/// HTML page generator.
#[derive(Debug)]
pub struct HtmlGenerator {
    templates: TemplateRegistry,
    settings: BuildSettings,
}

impl HtmlGenerator {
    /// Create a new HTML generator with the built-in templates.
    #[must_use]
    pub fn new(settings: BuildSettings) -> Self {
        Self {
            templates: TemplateRegistry::new(),
            settings,
        }
    }

    /// Canonical URL of the page for `slug`, with a trailing slash.
    #[must_use]
    pub fn page_url(&self, slug: &str) -> String {
        format!("{}/{slug}/", self.settings.site_base_url)
    }

    /// Where the page for `slug` is written.
    #[must_use]
    pub fn output_path(&self, slug: &str, output_dir: &Path) -> PathBuf {
        output_dir.join(slug).join("index.html")
    }

    /// Render the landing page for a record with the generated body fragment.
    pub fn generate_page(&self, record: &PostRecord, body: &str) -> Result<String> {
        debug!(slug = %record.slug, "generating HTML for page");

        let ctx = TemplateContext::new()
            .with_text("title", &record.title)
            .with_text("description", &record.description)
            .with_text("canonical_url", &record.url)
            .with_text("group_url", &self.settings.tg_group_url)
            .with_raw("style", SHARED_STYLE)
            .with_raw("body", body);

        Ok(self.templates.render("page", &ctx)?)
    }

    /// Render the site root listing every known page.
    pub fn generate_index(&self, records: &[PostRecord]) -> Result<String> {
        let pages = if records.is_empty() {
            String::new()
        } else {
            let items: String = records.iter().map(list_item_html).collect();
            format!("<ul class=\"pages\">\n{items}    </ul>")
        };

        let ctx = TemplateContext::new()
            .with_text("site_title", &self.settings.site_title)
            .with_text("base_url", &self.settings.site_base_url)
            .with_raw("style", SHARED_STYLE)
            .with_raw("pages", pages);

        Ok(self.templates.render("index", &ctx)?)
    }
}

/// One `<li>` entry of the index listing.
fn list_item_html(record: &PostRecord) -> String {
    format!(
        "      <li><a href=\"{}\">{}</a></li>\n",
        escape_html(&record.url),
        escape_html(&record.title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> BuildSettings {
        BuildSettings {
            site_base_url: "https://example.com".to_string(),
            tg_group_url: "https://t.me/group".to_string(),
            site_title: "Статьи".to_string(),
        }
    }

    fn record() -> PostRecord {
        PostRecord {
            query: "куда сходить".to_string(),
            title: "Куда <Сходить>".to_string(),
            slug: "kuda-skhodit".to_string(),
            url: "https://example.com/kuda-skhodit/".to_string(),
            post_text: "post".to_string(),
            description: "Разбор \"темы\"".to_string(),
        }
    }

    #[test]
    fn test_generate_page() {
        let generator = HtmlGenerator::new(settings());
        let html = generator
            .generate_page(&record(), "<h2>Пошагово</h2>")
            .unwrap();

        assert!(html.contains("<title>Куда &lt;Сходить&gt;</title>"));
        assert!(html.contains(r#"<meta name="description" content="Разбор &quot;темы&quot;"/>"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/kuda-skhodit/"/>"#));
        assert!(html.contains(r#"<meta property="og:title" content="Куда &lt;Сходить&gt;"/>"#));
        assert!(html.contains(r#"<meta property="og:description""#));
        assert!(html.contains("<h2>Пошагово</h2>"));
        assert!(html.contains(r#"href="https://t.me/group""#));
    }

    #[test]
    fn test_page_url_and_output_path() {
        let generator = HtmlGenerator::new(settings());
        assert_eq!(generator.page_url("abc"), "https://example.com/abc/");
        assert_eq!(
            generator.output_path("abc", Path::new("site")),
            PathBuf::from("site/abc/index.html")
        );
    }

    #[test]
    fn test_generate_index_lists_pages() {
        let generator = HtmlGenerator::new(settings());
        let html = generator.generate_index(&[record()]).unwrap();

        assert!(html.contains("<title>Статьи</title>"));
        assert!(html.contains(r#"<a href="https://example.com/kuda-skhodit/">Куда &lt;Сходить&gt;</a>"#));
        assert!(html.contains("https://example.com/sitemap.xml"));
        assert!(html.contains("https://example.com/robots.txt"));
    }

    #[test]
    fn test_generate_empty_index() {
        let generator = HtmlGenerator::new(settings());
        let html = generator.generate_index(&[]).unwrap();
        assert!(!html.contains("class=\"pages\""));
        assert!(html.contains("sitemap.xml"));
    }
}
