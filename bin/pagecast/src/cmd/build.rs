//! Build command - generates pages and appends to the post log

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use pagecast_core::{BuildSettings, Settings};
use pagecast_generator::{BuildReport, Builder, content_source_from_settings};

/// Run the build command.
///
/// Fails before touching the filesystem when a required setting is missing.
pub async fn run(
    config_path: &Path,
    csv: &Path,
    site_dir: &Path,
    posts: &Path,
    limit: Option<usize>,
) -> Result<()> {
    let settings = super::load_settings(config_path)?;
    run_with_settings(&settings, csv, site_dir, posts, limit).await?;
    Ok(())
}

/// Validate `settings`, then build.
pub async fn run_with_settings(
    settings: &Settings,
    csv: &Path,
    site_dir: &Path,
    posts: &Path,
    limit: Option<usize>,
) -> Result<BuildReport> {
    let build_settings = settings.build()?;
    execute(settings, build_settings, csv, site_dir, posts, limit).await
}

pub(crate) async fn execute(
    settings: &Settings,
    build_settings: BuildSettings,
    csv: &Path,
    site_dir: &Path,
    posts: &Path,
    limit: Option<usize>,
) -> Result<BuildReport> {
    tracing::info!(?csv, ?site_dir, ?posts, ?limit, "Starting build");

    let source = content_source_from_settings(&settings.content());
    let builder = Builder::new(build_settings, site_dir, posts).with_limit(limit);

    let report = builder
        .build(csv, source.as_ref())
        .await
        .wrap_err("Build failed")?;

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Built:      {}", report.built.len());
    println!("  Skipped:    {}", report.skipped);
    println!("  Content:    {}", source.name());
    println!();
    println!("  Duration:   {:.2}s", report.duration_ms as f64 / 1000.0);
    println!("  Site:       {}", site_dir.display());
    println!("  Post log:   {}", posts.display());
    println!();

    tracing::info!(
        built = report.built.len(),
        skipped = report.skipped,
        duration_ms = report.duration_ms,
        "Build completed successfully"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, fs};

    use tempfile::TempDir;

    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::load_with_env(None, Some(env)).unwrap()
    }

    #[tokio::test]
    async fn test_missing_setting_aborts_before_io() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("site");
        let posts = dir.path().join("posts.jsonl");

        let err = run_with_settings(
            &settings(&[("TG_GROUP_URL", "https://t.me/group")]),
            &dir.path().join("topics.csv"),
            &site,
            &posts,
            None,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("SITE_BASE_URL"));
        assert!(!site.exists());
        assert!(!posts.exists());
    }

    #[tokio::test]
    async fn test_build_with_template_content() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("topics.csv");
        fs::write(&csv, "query\nкуда сходить вечером\n").unwrap();
        let site = dir.path().join("site");
        let posts = dir.path().join("posts.jsonl");

        let report = run_with_settings(
            &settings(&[
                ("SITE_BASE_URL", "https://example.com"),
                ("TG_GROUP_URL", "https://t.me/group"),
            ]),
            &csv,
            &site,
            &posts,
            None,
        )
        .await
        .unwrap();

        assert_eq!(report.built.len(), 1);
        assert_eq!(report.built[0].slug, "kuda-skhodit-vecherom");
        assert!(site.join("kuda-skhodit-vecherom/index.html").exists());
        assert!(posts.exists());
    }
}
