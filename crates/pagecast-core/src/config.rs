//! Settings management.
//!
//! Settings are layered from an optional TOML file and the process
//! environment. Keys mirror the environment names, lowercased
//! (`SITE_BASE_URL` in the environment, `site_base_url` in the file).

use std::{collections::HashMap, path::Path};

use serde::Deserialize;

use crate::error::{CoreError, Result};

/// Raw settings as read from the file and environment.
///
/// Blank values are treated as absent by the accessors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Public base URL of the generated site.
    #[serde(default)]
    pub site_base_url: Option<String>,

    /// Telegram group link used as the call-to-action target.
    #[serde(default)]
    pub tg_group_url: Option<String>,

    /// Site index title.
    #[serde(default)]
    pub site_title: Option<String>,

    /// Bot API token.
    #[serde(default)]
    pub telegram_bot_token: Option<String>,

    /// Destination channel (`@name` or numeric id).
    #[serde(default)]
    pub telegram_channel: Option<String>,

    /// Bot API root.
    #[serde(default)]
    pub telegram_api_url: Option<String>,

    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default)]
    pub openai_model: Option<String>,

    #[serde(default)]
    pub openai_base_url: Option<String>,

    /// Fallback publish rate when none is given on the command line.
    #[serde(default)]
    pub default_rate_per_min: Option<f64>,
}

/// Settings required by the build phase.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub site_base_url: String,
    pub tg_group_url: String,
    pub site_title: String,
}

/// Settings required by the publish phase.
#[derive(Debug, Clone)]
pub struct PublishSettings {
    pub bot_token: String,
    pub channel: String,
    pub api_url: String,
}

/// Settings for the generative content source.
#[derive(Debug, Clone)]
pub struct ContentSettings {
    /// `None` selects the fixed template.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

pub const DEFAULT_SITE_TITLE: &str = "Статьи";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5-nano";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_RATE_PER_MIN: f64 = 26.0;

impl Settings {
    /// Load settings from an optional file plus the process environment.
    ///
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Load settings, reading environment values from `env` instead of the
    /// process environment when it is given.
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let mut environment = config::Environment::default();
        if env.is_some() {
            environment = environment.source(env);
        }

        let settings: Settings = builder
            .add_source(environment)
            .build()?
            .try_deserialize()
            .map_err(|e| CoreError::config_with_source("Failed to read settings", e))?;

        Ok(settings)
    }

    /// Validate and extract the build phase settings.
    pub fn build(&self) -> Result<BuildSettings> {
        let site_base_url = require(&self.site_base_url, "SITE_BASE_URL")?;
        let tg_group_url = require(&self.tg_group_url, "TG_GROUP_URL")?;

        if site_base_url.ends_with('/') {
            tracing::debug!("trailing slash trimmed from SITE_BASE_URL");
        }

        Ok(BuildSettings {
            site_base_url: site_base_url.trim_end_matches('/').to_string(),
            tg_group_url,
            site_title: non_blank(&self.site_title)
                .unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string()),
        })
    }

    /// Validate and extract the publish phase settings.
    pub fn publish(&self) -> Result<PublishSettings> {
        Ok(PublishSettings {
            bot_token: require(&self.telegram_bot_token, "TELEGRAM_BOT_TOKEN")?,
            channel: require(&self.telegram_channel, "TELEGRAM_CHANNEL")?,
            api_url: non_blank(&self.telegram_api_url)
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
        })
    }

    /// Extract the content source settings. Never fails.
    pub fn content(&self) -> ContentSettings {
        ContentSettings {
            api_key: non_blank(&self.openai_api_key),
            model: non_blank(&self.openai_model)
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            base_url: non_blank(&self.openai_base_url)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
        }
    }

    /// Publish rate used when the command line does not give one.
    pub fn default_rate(&self) -> f64 {
        self.default_rate_per_min.unwrap_or(DEFAULT_RATE_PER_MIN)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn require(value: &Option<String>, key: &'static str) -> Result<String> {
    non_blank(value).ok_or_else(|| CoreError::missing(key))
}
