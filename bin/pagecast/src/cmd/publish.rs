//! Publish command - sends the post log to the channel

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use pagecast_core::{PublishSettings, Settings};
use pagecast_publisher::{
    PublishStats, Publisher, TelegramClient, period_for_rate, publish_post_log,
};

/// Publish knobs shared by the `publish` and `all` commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    /// Messages per minute; falls back to the configured default.
    pub rate: Option<f64>,
    pub limit: Option<usize>,
    pub max_retries: Option<u32>,
}

/// Run the publish command.
pub async fn run(config_path: &Path, posts: &Path, options: PublishOptions) -> Result<()> {
    let settings = super::load_settings(config_path)?;
    let publish_settings = settings.publish()?;
    execute(&settings, &publish_settings, posts, options).await?;
    Ok(())
}

/// The publish rate to use, checked before any work starts.
pub fn resolve_rate(settings: &Settings, options: &PublishOptions) -> Result<f64> {
    let rate = options.rate.unwrap_or_else(|| settings.default_rate());
    period_for_rate(rate)?;
    Ok(rate)
}

pub(crate) async fn execute(
    settings: &Settings,
    publish_settings: &PublishSettings,
    posts: &Path,
    options: PublishOptions,
) -> Result<PublishStats> {
    let rate = resolve_rate(settings, &options)?;
    tracing::info!(?posts, rate, limit = ?options.limit, "Starting publish");

    let client = TelegramClient::from_settings(publish_settings)?;
    let publisher = Publisher::new(client, &publish_settings.channel, rate)?
        .with_max_rate_limit_retries(options.max_retries);

    println!();
    let stats = publish_post_log(&publisher, posts, options.limit, |progress| {
        println!(
            "  Posted {}/{}: {}",
            progress.index, progress.total, progress.slug
        );
    })
    .await
    .wrap_err("Publish failed")?;

    println!();
    println!("  Publish completed successfully!");
    println!();
    println!("  Posts:        {}", stats.records_sent);
    println!("  Messages:     {}", stats.chunks_sent);
    println!("  Skipped:      {}", stats.skipped);
    println!("  Rate limited: {}", stats.rate_limited);
    println!();

    tracing::info!(?stats, "Publish completed successfully");

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn publish_settings() -> PublishSettings {
        PublishSettings {
            bot_token: "token".to_string(),
            channel: "@channel".to_string(),
            api_url: "http://127.0.0.1:9".to_string(),
        }
    }

    #[tokio::test]
    async fn test_invalid_rate_fails_before_sending() {
        let dir = TempDir::new().unwrap();
        let options = PublishOptions {
            rate: Some(0.0),
            ..PublishOptions::default()
        };

        let err = execute(
            &Settings::default(),
            &publish_settings(),
            &dir.path().join("posts.jsonl"),
            options,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("invalid publish rate"));
    }

    #[tokio::test]
    async fn test_missing_post_log_is_an_error() {
        let dir = TempDir::new().unwrap();

        let err = execute(
            &Settings::default(),
            &publish_settings(),
            &dir.path().join("typo.jsonl"),
            PublishOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(
            err.chain().any(|cause| cause.to_string().contains("typo.jsonl")),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn test_empty_post_log_publishes_nothing() {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("posts.jsonl");
        std::fs::write(&posts, "").unwrap();

        let stats = execute(
            &Settings::default(),
            &publish_settings(),
            &posts,
            PublishOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(stats, PublishStats::default());
    }

    #[test]
    fn test_resolve_rate() {
        let settings = Settings::default();
        assert_eq!(
            resolve_rate(&settings, &PublishOptions::default()).unwrap(),
            settings.default_rate()
        );

        let options = PublishOptions {
            rate: Some(f64::NAN),
            ..PublishOptions::default()
        };
        assert!(resolve_rate(&settings, &options).is_err());
    }
}
