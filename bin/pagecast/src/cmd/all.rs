//! All command - build, then publish

use std::path::Path;

use color_eyre::eyre::Result;
use pagecast_core::Settings;

use super::publish::PublishOptions;

/// Run the build and publish phases back to back.
pub async fn run(
    config_path: &Path,
    csv: &Path,
    site_dir: &Path,
    posts: &Path,
    options: PublishOptions,
) -> Result<()> {
    let settings = super::load_settings(config_path)?;
    run_with_settings(&settings, csv, site_dir, posts, options).await
}

/// Validate both phases' settings and the publish rate up front, then run
/// them.
///
/// The build limit and the publish limit are the same value.
pub async fn run_with_settings(
    settings: &Settings,
    csv: &Path,
    site_dir: &Path,
    posts: &Path,
    options: PublishOptions,
) -> Result<()> {
    let build_settings = settings.build()?;
    let publish_settings = settings.publish()?;
    super::publish::resolve_rate(settings, &options)?;

    super::build::execute(settings, build_settings, csv, site_dir, posts, options.limit).await?;
    super::publish::execute(settings, &publish_settings, posts, options).await?;

    Ok(())
}
