//! Pagecast CLI Library
//!
//! Command implementations for the `pagecast` binary, exposed as a library
//! so they can be driven from tests and other tools.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, publish, all)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use pagecast::cmd;
//!
//! # async fn example() -> color_eyre::eyre::Result<()> {
//! cmd::build::run(
//!     Path::new("pagecast.toml"),
//!     Path::new("topics.csv"),
//!     Path::new("site"),
//!     Path::new("posts.jsonl"),
//!     None,
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod cmd;

// Re-export core types for convenience
pub use pagecast_core::{PostRecord, Settings};
pub use pagecast_generator::{BuildReport, Builder};
pub use pagecast_publisher::{PublishStats, Publisher};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
