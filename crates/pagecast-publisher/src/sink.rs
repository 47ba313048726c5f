//! The message delivery seam.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// What the endpoint said about one send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The message was accepted.
    Delivered,
    /// The endpoint is congested; the same message may be retried after the
    /// given delay.
    RetryAfter(Duration),
}

/// Delivers one message to a channel.
///
/// Implementations report congestion as [`SendOutcome::RetryAfter`] and
/// every other failure as an error.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, chat_id: &str, text: &str) -> Result<SendOutcome>;
}
