//! Secondary MusicBrainz lookups, rate limited through the shared gateway.

use tracing::debug;

use crate::catalog::domain::{
    GroupRelease, Lookup, MetadataRelease, ReleaseSummary, SeriesDetail, SeriesRecord,
};
use crate::catalog::service::CatalogService;
use crate::catalog::traits::CatalogApi;

impl<A: CatalogApi> CatalogService<A> {
    /// Release group id for an album, optionally by a given artist.
    pub async fn find_album_id(&self, artist: Option<&str>, album: &str) -> Lookup<String> {
        debug!(target: "catalog::metadata", artist = ?artist, album, "Searching release group");
        self.gateway
            .call(
                "release group search",
                self.musicbrainz.find_release_group_id(artist, album),
            )
            .await
    }

    /// Releases of a release group.
    pub async fn get_release_group(&self, rgid: &str) -> Lookup<Vec<GroupRelease>> {
        self.gateway
            .call("release group", self.musicbrainz.release_group(rgid))
            .await
            .map(|group| group.releases)
    }

    /// Name of the artist credited on a release group.
    pub async fn get_artist_for_release_group(&self, rgid: &str) -> Lookup<String> {
        self.gateway
            .call("release group artist", self.musicbrainz.release_group(rgid))
            .await
            .and_then(|group| match group.artist_name {
                Some(name) => Lookup::Found(name),
                None => Lookup::NotFound,
            })
    }

    /// Release details with tracks.
    pub async fn get_release(
        &self,
        release_id: &str,
        include_artist_info: bool,
    ) -> Lookup<MetadataRelease> {
        self.gateway
            .call(
                "release lookup",
                self.musicbrainz.release(release_id, include_artist_info),
            )
            .await
    }

    /// Release search projected into summaries, best backend match first.
    pub async fn search_release_summaries(
        &self,
        release: &str,
        artist: Option<&str>,
        limit: u32,
    ) -> Lookup<Vec<ReleaseSummary>> {
        self.gateway
            .call(
                "release summary search",
                self.musicbrainz.search_releases(release, artist, limit),
            )
            .await
            .non_empty()
    }

    /// Series matching a name.
    pub async fn find_series(&self, name: &str, limit: u32) -> Lookup<Vec<SeriesRecord>> {
        self.gateway
            .call("series search", self.musicbrainz.search_series(name, limit))
            .await
            .non_empty()
    }

    /// Series with its release groups.
    pub async fn get_series(&self, series_id: &str) -> Lookup<SeriesDetail> {
        self.gateway
            .call("series", self.musicbrainz.series(series_id))
            .await
    }
}
