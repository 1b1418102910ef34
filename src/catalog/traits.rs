//! Trait definitions for the remote catalog.
//!
//! The reconciler, synchronizer and search layer are generic over
//! [`CatalogApi`] so tests can substitute an in-memory catalog.

use async_trait::async_trait;

use super::discogs::DiscogsClient;
use super::domain::{
    ArtistProfile, CatalogEntry, CatalogError, CatalogRelease, Page, ReleaseDetail, SearchHit,
    SearchQuery,
};

/// Paginated catalog of artists, masters and releases.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// One page of search results.
    async fn search(&self, query: &SearchQuery, page: u32)
    -> Result<Page<SearchHit>, CatalogError>;

    /// Artist profile.
    async fn artist(&self, artist_id: &str) -> Result<ArtistProfile, CatalogError>;

    /// One page of an artist's discography.
    async fn artist_releases(
        &self,
        artist_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<CatalogEntry>, CatalogError>;

    /// One page of a master's versions.
    async fn master_versions(
        &self,
        master_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<CatalogRelease>, CatalogError>;

    /// Full release details.
    async fn release(&self, release_id: &str) -> Result<ReleaseDetail, CatalogError>;
}

#[async_trait]
impl CatalogApi for DiscogsClient {
    async fn search(
        &self,
        query: &SearchQuery,
        page: u32,
    ) -> Result<Page<SearchHit>, CatalogError> {
        self.search(query, page).await
    }

    async fn artist(&self, artist_id: &str) -> Result<ArtistProfile, CatalogError> {
        self.artist(artist_id).await
    }

    async fn artist_releases(
        &self,
        artist_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<CatalogEntry>, CatalogError> {
        self.artist_releases(artist_id, page, per_page).await
    }

    async fn master_versions(
        &self,
        master_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<CatalogRelease>, CatalogError> {
        self.master_versions(master_id, page, per_page).await
    }

    async fn release(&self, release_id: &str) -> Result<ReleaseDetail, CatalogError> {
        self.release(release_id).await
    }
}
