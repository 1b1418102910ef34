//! Discography listing and synchronization commands.

use tokio::runtime::Runtime;
use tracing::{info, warn};

use crate::catalog::{Lookup, SyncOutcome};
use crate::config::Config;

use super::{open_db, open_service};

/// Show an artist's release groups
pub fn cmd_artist(rt: &Runtime, config: &Config, artist_id: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let service = open_service(config)?;

        let discography = match service.get_artist(artist_id).await {
            Lookup::Found(discography) => discography,
            Lookup::NotFound => {
                println!("Artist {} not found", artist_id);
                return Ok(());
            }
            Lookup::TransportError(detail) => anyhow::bail!("Artist lookup failed: {}", detail),
        };

        println!("{}", discography.artist_name);
        println!();
        for group in &discography.release_groups {
            println!(
                "  {:<12} {:<10} {} ({} versions)",
                group.release_type().as_str(),
                group.id(),
                group.title(),
                group.versions.len()
            );
        }
        Ok(())
    })
}

/// Reconcile an artist's discography and sync every release group
pub fn cmd_sync_artist(
    rt: &Runtime,
    config: &Config,
    artist_id: &str,
    include_extras: bool,
    force_full: bool,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let service = open_service(config)?;
        let pool = open_db(config).await?;

        let discography = match service.get_artist(artist_id).await {
            Lookup::Found(discography) => discography,
            Lookup::NotFound => {
                println!("Artist {} not found", artist_id);
                return Ok(());
            }
            Lookup::TransportError(detail) => anyhow::bail!("Artist lookup failed: {}", detail),
        };

        info!(
            target: "cli::sync",
            artist = %discography.artist_name,
            groups = discography.release_groups.len(),
            "Syncing discography"
        );

        let mut written = 0;
        let mut repackage = Vec::new();
        for group in &discography.release_groups {
            let outcome = service
                .sync_release_group(&pool, group, include_extras, force_full)
                .await?;
            match outcome {
                SyncOutcome::RepackageRequired { .. } => repackage.push(group.id().to_string()),
                SyncOutcome::MissingArtistCredit { ref release_id } => {
                    warn!(
                        target: "cli::sync",
                        group = group.id(),
                        release_id = %release_id,
                        "Skipped group with uncredited release"
                    );
                }
                _ => {}
            }
            written += outcome.written();
        }

        println!(
            "{}: {} release groups, {} releases written",
            discography.artist_name,
            discography.release_groups.len(),
            written
        );
        if !repackage.is_empty() {
            println!("Repackage required for: {}", repackage.join(", "));
        }
        Ok(())
    })
}
