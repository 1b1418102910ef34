//! Discogs API Data Transfer Objects
//!
//! These types match what the Discogs REST API returns.
//! DO NOT use these types outside the discogs module - convert to domain types.
//!
//! API Reference: https://www.discogs.com/developers

use serde::{Deserialize, Serialize};

/// Pagination block shared by all list endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub items: u64,
}

/// `/database/search` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    pub pagination: Pagination,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// One search result (artist, release or master)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResult {
    pub id: u64,
    #[serde(rename = "type")]
    pub result_type: String,
    /// "Artist - Title" for releases, the name for artists
    pub title: String,
    /// Relative page path, e.g. "/artist/45-Aphex-Twin"
    pub uri: Option<String>,
    pub resource_url: Option<String>,
    pub thumb: Option<String>,
    pub cover_image: Option<String>,
    pub master_id: Option<u64>,
    pub country: Option<String>,
    pub year: Option<String>,
    #[serde(default)]
    pub format: Vec<String>,
    pub status: Option<String>,
}

/// `/artists/{id}` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub id: u64,
    pub name: String,
    pub uri: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Image {
    #[serde(rename = "type")]
    pub image_type: Option<String>,
    pub uri: String,
}

/// `/artists/{id}/releases` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistReleasesResponse {
    pub pagination: Pagination,
    #[serde(default)]
    pub releases: Vec<ArtistRelease>,
}

/// Discography entry: either a master or a plain release
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArtistRelease {
    Master(ArtistMaster),
    Release(ArtistReleaseItem),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistMaster {
    pub id: u64,
    pub title: String,
    pub main_release: u64,
    pub year: Option<i32>,
    pub resource_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistReleaseItem {
    pub id: u64,
    pub title: String,
    pub status: Option<String>,
    pub format: Option<String>,
    pub year: Option<i32>,
    pub resource_url: Option<String>,
}

/// `/masters/{id}/versions` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VersionsResponse {
    pub pagination: Pagination,
    #[serde(default)]
    pub versions: Vec<Version>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Version {
    pub id: u64,
    pub title: String,
    pub status: Option<String>,
    #[serde(default)]
    pub format: String,
    pub country: Option<String>,
    pub released: Option<String>,
    pub resource_url: Option<String>,
}

/// `/releases/{id}` response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Release {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub released: Option<String>,
    pub country: Option<String>,
    pub status: Option<String>,
    pub uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<ReleaseArtist>,
    #[serde(default)]
    pub formats: Vec<Format>,
    #[serde(default)]
    pub tracklist: Vec<TracklistEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseArtist {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Format {
    pub name: String,
    #[serde(default)]
    pub qty: Option<String>,
    #[serde(default)]
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TracklistEntry {
    #[serde(default)]
    pub position: String,
    pub title: String,
    /// "M:SS", often an empty string when unknown
    pub duration: Option<String>,
    /// "track", "heading" or "index"
    #[serde(rename = "type_", default)]
    pub entry_type: Option<String>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub message: String,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// ============================================================================
