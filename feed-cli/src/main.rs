//! # feed-cli
//!
//! CLI tool for browsing and moderating a Torospace feed.
//!
//! ## Commands
//!
//! - `feed`: Show a page of posts
//! - `show`: Show one post
//! - `post`: Create a post (hashtags become topics)
//! - `like`: Like or unlike a post
//! - `hide` / `unhide` / `delete`: Moderate a post
//! - `topics`: List topics
//!
//! ## Example
//!
//! ```bash
//! # First page, filtered
//! feed-cli feed --search careers
//!
//! # Older posts than #40
//! feed-cli feed --before 40
//!
//! # Post with two topics
//! feed-cli post "Info session friday #cs #careers"
//!
//! # Try it without a server
//! feed-cli --mock feed
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod demo;

use commands::{feed, like, moderate, post, show, topics, FeedArgs};
use config::{CliConfig, CONFIG_FILE};
use feed_client::{FeedApi, HttpTransport, Transport};
use feed_types::{PostId, Viewer};

/// CLI tool for browsing and moderating a Torospace feed.
#[derive(Parser, Debug)]
#[command(name = "feed-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (default: config.toml in the data directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use canned demo data instead of a real server
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show a page of posts
    Feed {
        /// Only posts matching this text
        #[arg(long, short)]
        search: Option<String>,

        /// Posts older than this post id
        #[arg(long, conflicts_with = "after")]
        before: Option<u64>,

        /// Posts newer than this post id
        #[arg(long, conflicts_with = "before")]
        after: Option<u64>,

        /// Only posts by this organization
        #[arg(long)]
        organization: Option<u64>,
    },

    /// Show one post
    Show {
        /// Post id
        id: u64,
    },

    /// Create a post
    Post {
        /// Post text; #hashtags become topics
        text: String,
    },

    /// Like a post, or unlike it if already liked
    Like {
        /// Post id
        id: u64,
    },

    /// Hide a post (admins, or the authoring organization)
    Hide {
        /// Post id
        id: u64,
    },

    /// Unhide a post
    Unhide {
        /// Post id
        id: u64,
    },

    /// Delete a post
    Delete {
        /// Post id
        id: u64,
    },

    /// List topics
    Topics {
        /// Only topics matching this text
        #[arg(long, short, default_value = "")]
        search: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CliConfig::load(path).await?,
        None => CliConfig::load_or_default(&default_data_dir()?).await?,
    };
    let client_config = config.client_config()?;
    let viewer = config.viewer();

    if cli.mock {
        let api = Arc::new(FeedApi::new(demo::transport(), client_config));
        run(cli.command, api, viewer).await
    } else {
        let transport =
            HttpTransport::new(&client_config).context("Failed to create HTTP client")?;
        let api = Arc::new(FeedApi::new(transport, client_config));
        run(cli.command, api, viewer).await
    }
}

async fn run<T: Transport + 'static>(
    command: Commands,
    api: Arc<FeedApi<T>>,
    viewer: Viewer,
) -> Result<()> {
    match command {
        Commands::Feed {
            search,
            before,
            after,
            organization,
        } => {
            let args = FeedArgs {
                search,
                before: before.map(PostId::new),
                after: after.map(PostId::new),
                organization,
            };
            feed::run(api, &viewer, args).await?;
        }
        Commands::Show { id } => {
            show::run(api, &viewer, PostId::new(id)).await?;
        }
        Commands::Post { text } => {
            post::run(api, viewer, &text).await?;
        }
        Commands::Like { id } => {
            like::run(api, &viewer, PostId::new(id)).await?;
        }
        Commands::Hide { id } => {
            moderate::run(api, &viewer, PostId::new(id), moderate::Op::Hide).await?;
        }
        Commands::Unhide { id } => {
            moderate::run(api, &viewer, PostId::new(id), moderate::Op::Unhide).await?;
        }
        Commands::Delete { id } => {
            moderate::run(api, &viewer, PostId::new(id), moderate::Op::Delete).await?;
        }
        Commands::Topics { search } => {
            topics::run(api, &search).await?;
        }
    }

    Ok(())
}

/// Get the default data directory for feed-cli.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("org", "torospace", "feed-cli")
        .context("Could not determine home directory")?;
    let dir = dirs.data_dir().to_path_buf();
    tracing::debug!(config = %dir.join(CONFIG_FILE).display(), "Using default config location");
    Ok(dir)
}
