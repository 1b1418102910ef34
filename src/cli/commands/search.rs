//! Artist and release search commands.

use tokio::runtime::Runtime;

use crate::catalog::{ArtistMatch, Lookup};
use crate::config::Config;

use super::{open_db, open_service};

/// Search artists by name
pub fn cmd_find_artist(
    rt: &Runtime,
    config: &Config,
    name: &str,
    limit: usize,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let service = open_service(config)?;
        let pool = open_db(config).await?;

        match service.find_artist(&pool, name, limit).await? {
            Lookup::Found(matches) => {
                for artist in matches {
                    match artist {
                        ArtistMatch::Record(record) => {
                            println!("{:>3}%  {:<10} {}", record.score, record.id, record.name);
                            println!("      {}", record.url);
                        }
                        ArtistMatch::IdOnly(id) => {
                            println!("Best guess for {:?}: artist {}", name, id);
                        }
                    }
                }
            }
            Lookup::NotFound => println!("No artists found for {:?}", name),
            Lookup::TransportError(detail) => anyhow::bail!("Artist search failed: {}", detail),
        }
        Ok(())
    })
}

/// Search releases, one line per release group
pub fn cmd_find_release(
    rt: &Runtime,
    config: &Config,
    name: &str,
    limit: usize,
    artist: Option<&str>,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let service = open_service(config)?;

        match service.find_release(name, limit, artist).await {
            Lookup::Found(releases) => {
                for release in releases {
                    println!(
                        "{:>3}%  {:<10} {} - {} [{}] {} {}",
                        release.score,
                        release.release_id,
                        release.uniquename,
                        release.title,
                        release.release_group_type,
                        release.date,
                        release.formats
                    );
                }
            }
            Lookup::NotFound => println!("No releases found for {:?}", name),
            Lookup::TransportError(detail) => anyhow::bail!("Release search failed: {}", detail),
        }
        Ok(())
    })
}
