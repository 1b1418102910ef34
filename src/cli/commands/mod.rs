//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `search`: artist and release search
//! - `artist`: discography listing and synchronization
//! - `release`: MusicBrainz release and release-group details

mod artist;
mod release;
mod search;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::catalog::CatalogService;
use crate::config::{self, Config};
use crate::db;

pub use artist::{cmd_artist, cmd_sync_artist};
pub use release::{cmd_release, cmd_release_group};
pub use search::{cmd_find_artist, cmd_find_release};

/// Catalog Sync CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite database path (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Discogs personal access token
    #[arg(long, global = true, env = "DISCOGS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Only sync accepted releases, even with --include-extras
    #[arg(long, global = true, env = "OFFICIAL_RELEASES_ONLY")]
    pub official_only: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Search artists by name
    FindArtist {
        name: String,
        /// Maximum number of results
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Search releases ("Artist:Release" shorthand accepted)
    FindRelease {
        name: String,
        /// Maximum number of results
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
        /// Restrict to an artist
        #[arg(long)]
        artist: Option<String>,
    },
    /// Show an artist's release groups
    Artist {
        /// Discogs artist id
        id: String,
    },
    /// Reconcile an artist's discography and sync every release group
    SyncArtist {
        /// Discogs artist id
        id: String,
        /// Also sync releases that aren't accepted
        #[arg(long)]
        include_extras: bool,
        /// Rewrite releases that are already stored
        #[arg(long)]
        force_full: bool,
    },
    /// Show MusicBrainz release details
    Release {
        /// MusicBrainz release id
        id: String,
        /// Include artist name and id
        #[arg(long)]
        artist_info: bool,
    },
    /// Show a MusicBrainz release group with its releases
    ReleaseGroup {
        /// MusicBrainz release group id
        id: String,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = effective_config(cli);

    match &cli.command {
        Commands::FindArtist { name, limit } => cmd_find_artist(&rt, &config, name, *limit),
        Commands::FindRelease {
            name,
            limit,
            artist,
        } => cmd_find_release(&rt, &config, name, *limit, artist.as_deref()),
        Commands::Artist { id } => cmd_artist(&rt, &config, id),
        Commands::SyncArtist {
            id,
            include_extras,
            force_full,
        } => cmd_sync_artist(&rt, &config, id, *include_extras, *force_full),
        Commands::Release { id, artist_info } => cmd_release(&rt, &config, id, *artist_info),
        Commands::ReleaseGroup { id } => cmd_release_group(&rt, &config, id),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Config file with command-line and environment overrides applied
fn effective_config(cli: &Cli) -> Config {
    let mut config = config::load();
    if let Some(ref token) = cli.token {
        config.credentials.discogs_token = Some(token.clone());
    }
    if cli.official_only {
        config.catalog.official_releases_only = true;
    }
    if let Some(ref path) = cli.db {
        config.library.database = Some(path.clone());
    }
    config
}

pub(crate) fn open_service(config: &Config) -> anyhow::Result<CatalogService> {
    Ok(CatalogService::from_config(config)?)
}

pub(crate) async fn open_db(config: &Config) -> anyhow::Result<sqlx::SqlitePool> {
    let url = db::db_url(config.library.database.as_deref());
    Ok(db::init_db(&url).await?)
}
