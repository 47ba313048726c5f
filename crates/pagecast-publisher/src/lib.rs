//! Pagecast Publisher Library
//!
//! Publish phase of pagecast: drains the post log into a Telegram channel
//! at a bounded rate.
//!
//! # Modules
//!
//! - [`chunk`] - Line-preserving message splitting
//! - [`sink`] - The message delivery seam
//! - [`telegram`] - Bot API implementation of the sink
//! - [`publisher`] - Pacing, backoff and progress reporting

pub mod chunk;
pub mod error;
pub mod publisher;
pub mod sink;
pub mod telegram;

pub use chunk::{MESSAGE_LIMIT, split_message};
pub use error::{PublishError, Result};
pub use publisher::{Progress, PublishStats, Publisher, period_for_rate, publish_post_log};
pub use sink::{MessageSink, SendOutcome};
pub use telegram::TelegramClient;
