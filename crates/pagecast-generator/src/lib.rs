//! Pagecast Generator Library
//!
//! Build phase of pagecast: turns search queries into landing pages, a
//! sitemap, a robots file and new post log records.
//!
//! # Modules
//!
//! - [`queries`] - CSV query loading
//! - [`content`] - Post text and page body sources (template or OpenAI)
//! - [`template`] - HTML template system with variable interpolation
//! - [`html`] - Landing page and site index rendering
//! - [`sitemap`] - XML sitemap generation
//! - [`robots`] - robots.txt generation
//! - [`build`] - Build orchestration

pub mod build;
pub mod content;
pub mod html;
pub mod queries;
pub mod robots;
pub mod sitemap;
pub mod template;

pub use build::{BuildError, BuildReport, Builder};
pub use content::{
    ContentSource, GeneratedContent, OpenAiSource, TemplateSource, content_source_from_settings,
};
pub use html::HtmlGenerator;
pub use queries::load_queries;
pub use robots::RobotsGenerator;
pub use sitemap::SitemapGenerator;
pub use template::{Template, TemplateContext, TemplateRegistry};
