//! Pagecast CLI
//!
//! Builds landing pages from search queries and publishes the resulting
//! posts to a Telegram channel.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Pagecast.
#[derive(Parser)]
#[command(
    name = "pagecast",
    version,
    about = "Landing page builder and rate-limited Telegram publisher"
)]
struct Cli {
    /// Path to an optional settings file
    #[arg(short, long, default_value = "pagecast.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Generate pages and append new records to the post log
    Build {
        /// CSV file with a `query` column
        #[arg(long, default_value = "topics.csv")]
        csv: PathBuf,
        /// Output directory for the site
        #[arg(long, default_value = "site")]
        site_dir: PathBuf,
        /// Post log to append to
        #[arg(long, default_value = "posts.jsonl")]
        posts: PathBuf,
        /// Process at most this many queries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Send the post log to the Telegram channel
    Publish {
        /// Post log to read
        #[arg(long, default_value = "posts.jsonl")]
        posts: PathBuf,
        /// Messages per minute (defaults to DEFAULT_RATE_PER_MIN)
        #[arg(long)]
        rate: Option<f64>,
        /// Publish at most this many records
        #[arg(long)]
        limit: Option<usize>,
        /// Give up after this many rate-limit retries of one message
        #[arg(long)]
        max_retries: Option<u32>,
    },
    /// Build, then publish the whole post log
    All {
        /// CSV file with a `query` column
        #[arg(long, default_value = "topics.csv")]
        csv: PathBuf,
        /// Output directory for the site
        #[arg(long, default_value = "site")]
        site_dir: PathBuf,
        /// Post log to append to and publish from
        #[arg(long, default_value = "posts.jsonl")]
        posts: PathBuf,
        /// Cap applied to both phases
        #[arg(long)]
        limit: Option<usize>,
        /// Messages per minute (defaults to DEFAULT_RATE_PER_MIN)
        #[arg(long)]
        rate: Option<f64>,
        /// Give up after this many rate-limit retries of one message
        #[arg(long)]
        max_retries: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    pagecast::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            csv,
            site_dir,
            posts,
            limit,
        } => {
            pagecast::cmd::build::run(&cli.config, &csv, &site_dir, &posts, limit).await?;
        }
        Commands::Publish {
            posts,
            rate,
            limit,
            max_retries,
        } => {
            let options = pagecast::cmd::publish::PublishOptions {
                rate,
                limit,
                max_retries,
            };
            pagecast::cmd::publish::run(&cli.config, &posts, options).await?;
        }
        Commands::All {
            csv,
            site_dir,
            posts,
            limit,
            rate,
            max_retries,
        } => {
            let options = pagecast::cmd::publish::PublishOptions {
                rate,
                limit,
                max_retries,
            };
            pagecast::cmd::all::run(&cli.config, &csv, &site_dir, &posts, options).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_defaults() {
        let cli = Cli::parse_from(["pagecast", "build"]);

        assert_eq!(cli.config, PathBuf::from("pagecast.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build {
                csv,
                site_dir,
                posts,
                limit,
            } => {
                assert_eq!(csv, PathBuf::from("topics.csv"));
                assert_eq!(site_dir, PathBuf::from("site"));
                assert_eq!(posts, PathBuf::from("posts.jsonl"));
                assert!(limit.is_none());
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_command_parsing() {
        let args = [
            "pagecast",
            "build",
            "--csv",
            "queries.csv",
            "--site-dir",
            "public",
            "--posts",
            "out.jsonl",
            "--limit",
            "5",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build {
                csv,
                site_dir,
                posts,
                limit,
            } => {
                assert_eq!(csv, PathBuf::from("queries.csv"));
                assert_eq!(site_dir, PathBuf::from("public"));
                assert_eq!(posts, PathBuf::from("out.jsonl"));
                assert_eq!(limit, Some(5));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_publish_command_parsing() {
        let args = [
            "pagecast",
            "publish",
            "--rate",
            "12.5",
            "--limit",
            "3",
            "--max-retries",
            "4",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Publish {
                posts,
                rate,
                limit,
                max_retries,
            } => {
                assert_eq!(posts, PathBuf::from("posts.jsonl"));
                assert_eq!(rate, Some(12.5));
                assert_eq!(limit, Some(3));
                assert_eq!(max_retries, Some(4));
            }
            _ => panic!("Expected Publish command"),
        }
    }

    #[test]
    fn test_cli_publish_defaults() {
        let cli = Cli::parse_from(["pagecast", "publish"]);

        match cli.command {
            Commands::Publish {
                rate, max_retries, ..
            } => {
                assert!(rate.is_none());
                assert!(max_retries.is_none());
            }
            _ => panic!("Expected Publish command"),
        }
    }

    #[test]
    fn test_cli_all_command_parsing() {
        let args = ["pagecast", "all", "--csv", "q.csv", "--rate", "30", "--limit", "2"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::All {
                csv, rate, limit, ..
            } => {
                assert_eq!(csv, PathBuf::from("q.csv"));
                assert_eq!(rate, Some(30.0));
                assert_eq!(limit, Some(2));
            }
            _ => panic!("Expected All command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let cli = Cli::parse_from(["pagecast", "-vvv", "build"]);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let cli = Cli::parse_from(["pagecast", "--config", "prod.toml", "publish"]);
        assert_eq!(cli.config, PathBuf::from("prod.toml"));
    }

    #[test]
    fn test_cli_rejects_non_numeric_rate() {
        assert!(Cli::try_parse_from(["pagecast", "publish", "--rate", "fast"]).is_err());
    }
}
