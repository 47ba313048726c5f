//! Pagecast Core Library
//!
//! Core types, configuration, and error handling shared by the build and
//! publish phases of pagecast.

pub mod config;
pub mod error;
pub mod record;
pub mod slug;

pub use config::{BuildSettings, ContentSettings, PublishSettings, Settings};
pub use error::{CoreError, Result};
pub use record::{PostLog, PostLogWriter, PostRecord};
pub use slug::{SlugRegistry, slugify, title_case};
