//! Telegram Bot API sink.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use pagecast_core::PublishSettings;
use serde::Deserialize;
use tracing::trace;

use crate::{
    error::{PublishError, Result},
    sink::{MessageSink, SendOutcome},
};

/// Bot API error code for "Too Many Requests".
const TOO_MANY_REQUESTS: i64 = 429;

/// Delay used when a 429 reply carries no usable `retry_after`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Sends messages through `sendMessage`.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TelegramClient {
    /// Create a client for the Bot API rooted at `api_url`.
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            token: token.into(),
        })
    }

    /// Create a client from validated publish settings.
    pub fn from_settings(settings: &PublishSettings) -> Result<Self> {
        Self::new(&settings.api_url, &settings.bot_token)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.token
        )
    }
}

#[async_trait]
impl MessageSink for TelegramClient {
    async fn send(&self, chat_id: &str, text: &str) -> Result<SendOutcome> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": false,
        });

        // The token is part of the URL, so it must not reach error messages.
        let resp = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| PublishError::Http(e.without_url()))?;
        let status = resp.status();
        let raw = resp
            .text()
            .await
            .map_err(|e| PublishError::Http(e.without_url()))?;
        trace!(%status, len = raw.len(), "sendMessage response");

        let reply: BotApiResponse = serde_json::from_str(&raw).map_err(|_| {
            let snippet: String = raw.chars().take(200).collect();
            PublishError::Decode(format!("HTTP {status}: {snippet}"))
        })?;

        interpret(reply)
    }
}

/// Envelope of every Bot API reply.
#[derive(Debug, Deserialize)]
struct BotApiResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

fn interpret(reply: BotApiResponse) -> Result<SendOutcome> {
    if reply.ok {
        return Ok(SendOutcome::Delivered);
    }

    match reply.error_code {
        Some(TOO_MANY_REQUESTS) => {
            let secs = reply
                .parameters
                .and_then(|p| p.retry_after)
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            Ok(SendOutcome::RetryAfter(Duration::from_secs(secs)))
        }
        code => Err(PublishError::Delivery {
            code: code.unwrap_or_default(),
            description: reply
                .description
                .unwrap_or_else(|| "no description".to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(json: &str) -> BotApiResponse {
        serde_json::from_str(json).expect("valid reply")
    }

    #[test]
    fn test_ok_reply() {
        let outcome = interpret(reply(r#"{"ok":true,"result":{"message_id":1}}"#)).unwrap();
        assert_eq!(outcome, SendOutcome::Delivered);
    }

    #[test]
    fn test_rate_limited_reply() {
        let outcome = interpret(reply(
            r#"{"ok":false,"error_code":429,"description":"Too Many Requests: retry after 5","parameters":{"retry_after":5}}"#,
        ))
        .unwrap();
        assert_eq!(outcome, SendOutcome::RetryAfter(Duration::from_secs(5)));
    }

    #[test]
    fn test_rate_limited_without_hint() {
        let outcome = interpret(reply(r#"{"ok":false,"error_code":429}"#)).unwrap();
        assert_eq!(outcome, SendOutcome::RetryAfter(Duration::from_secs(1)));

        let outcome = interpret(reply(
            r#"{"ok":false,"error_code":429,"parameters":{"retry_after":0}}"#,
        ))
        .unwrap();
        assert_eq!(outcome, SendOutcome::RetryAfter(Duration::from_secs(1)));
    }

    #[test]
    fn test_other_errors_are_fatal() {
        let err = interpret(reply(
            r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
        ))
        .unwrap_err();
        match err {
            PublishError::Delivery { code, description } => {
                assert_eq!(code, 400);
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_endpoint_and_debug_hide_nothing_but_token() {
        let client = TelegramClient::new("https://api.telegram.org/", "123:ABC").unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.telegram.org/bot123:ABC/sendMessage"
        );
        let debug = format!("{client:?}");
        assert!(!debug.contains("123:ABC"));
        assert!(debug.contains("api.telegram.org"));
    }

    #[tokio::test]
    async fn test_transport_failure_hides_token() {
        let client = TelegramClient::new("http://127.0.0.1:9", "123456:SECRET-TOKEN").unwrap();
        let err = client.send("@channel", "hello").await.unwrap_err();
        assert!(matches!(err, PublishError::Http(_)));

        let message = err.to_string();
        assert!(!message.contains("SECRET-TOKEN"), "{message}");
        assert!(!format!("{err:?}").contains("SECRET-TOKEN"));
    }
}
