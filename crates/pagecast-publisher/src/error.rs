//! Publish errors.

use pagecast_core::CoreError;
use thiserror::Error;

/// Result type for publish operations.
pub type Result<T> = std::result::Result<T, PublishError>;

/// Publish errors. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Rate is zero, negative or not finite.
    #[error("invalid publish rate {0}: must be a positive number of messages per minute")]
    InvalidRate(f64),

    /// The endpoint rejected a message.
    #[error("Telegram API error: {code} {description}")]
    Delivery { code: i64, description: String },

    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with something that is not a Bot API reply.
    #[error("unexpected Telegram response: {0}")]
    Decode(String),

    /// The optional retry ceiling was reached while rate-limited.
    #[error("still rate-limited after {attempts} retries")]
    RetriesExhausted { attempts: u32 },

    /// Reading the post log failed.
    #[error(transparent)]
    PostLog(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_error_message() {
        let err = PublishError::Delivery {
            code: 400,
            description: "Bad Request: chat not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Telegram API error: 400 Bad Request: chat not found"
        );
    }

    #[test]
    fn test_invalid_rate_message() {
        assert!(PublishError::InvalidRate(0.0).to_string().contains("invalid publish rate 0"));
    }
}
