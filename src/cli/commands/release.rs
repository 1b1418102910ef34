//! MusicBrainz release details.

use tokio::runtime::Runtime;

use crate::catalog::Lookup;
use crate::config::Config;

use super::open_service;

/// Show a MusicBrainz release with its tracks
pub fn cmd_release(
    rt: &Runtime,
    config: &Config,
    release_id: &str,
    artist_info: bool,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let service = open_service(config)?;

        let release = match service.get_release(release_id, artist_info).await {
            Lookup::Found(release) => release,
            Lookup::NotFound => {
                println!("Release {} not found", release_id);
                return Ok(());
            }
            Lookup::TransportError(detail) => anyhow::bail!("Release lookup failed: {}", detail),
        };

        println!("{}", release.title);
        if let Some(ref artist) = release.artist_name {
            println!("  Artist:  {}", artist);
        }
        println!(
            "  Group:   {} ({}, {})",
            release.release_group_title, release.release_group_type, release.release_group_id
        );
        if let Some(ref date) = release.date {
            println!("  Date:    {}", date);
        }
        println!("  Country: {}", release.country);
        println!("  Format:  {}", release.format);
        if let Some(ref asin) = release.asin {
            println!("  ASIN:    {}", asin);
        }
        println!();
        for track in &release.tracks {
            let duration = track
                .duration
                .map(|secs| format!("{}:{:02}", secs / 60, secs % 60))
                .unwrap_or_default();
            println!("  {:>2}. {} {}", track.number, track.title, duration);
        }
        Ok(())
    })
}

/// Show a MusicBrainz release group: its artist and releases
pub fn cmd_release_group(rt: &Runtime, config: &Config, rgid: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let service = open_service(config)?;

        let releases = match service.get_release_group(rgid).await {
            Lookup::Found(releases) => releases,
            Lookup::NotFound => {
                println!("Release group {} not found", rgid);
                return Ok(());
            }
            Lookup::TransportError(detail) => {
                anyhow::bail!("Release group lookup failed: {}", detail)
            }
        };

        match service.get_artist_for_release_group(rgid).await {
            Lookup::Found(artist) => println!("{} ({} releases)", artist, releases.len()),
            _ => println!("{} ({} releases)", rgid, releases.len()),
        }
        for release in &releases {
            println!(
                "  {:<38} {:<10} {:<10} {} {}",
                release.id,
                release.status.as_deref().unwrap_or("-"),
                release.date.as_deref().unwrap_or("-"),
                release.country.as_deref().unwrap_or("-"),
                release.title
            );
        }
        Ok(())
    })
}
