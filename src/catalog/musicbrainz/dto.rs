//! MusicBrainz API Data Transfer Objects
//!
//! These types match what the MusicBrainz JSON web service returns.
//! Don't use them outside the musicbrainz module; the adapter converts them
//! to domain types.
//!
//! API Reference: https://musicbrainz.org/doc/MusicBrainz_API

use serde::{Deserialize, Serialize};

/// Release search response (`/release?query=`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseSearchResponse {
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// Release-group search response (`/release-group?query=`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReleaseGroupSearchResponse {
    #[serde(default, rename = "release-groups")]
    pub release_groups: Vec<ReleaseGroup>,
}

/// Series search response (`/series?query=`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeriesSearchResponse {
    #[serde(default)]
    pub series: Vec<Series>,
}

/// Release, either a search hit or a full lookup
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Release {
    pub id: String,
    pub title: String,
    /// Distinguishes releases sharing a title, often empty
    pub disambiguation: Option<String>,
    /// Search relevance, only present on search hits
    pub score: Option<u8>,
    /// Official, Promotion, Bootleg, ...
    pub status: Option<String>,
    /// YYYY, YYYY-MM or YYYY-MM-DD
    pub date: Option<String>,
    pub country: Option<String>,
    pub asin: Option<String>,
    #[serde(default)]
    pub artist_credit: Vec<ArtistCredit>,
    pub release_group: Option<ReleaseGroup>,
    #[serde(default)]
    pub media: Vec<Medium>,
    /// Total tracks over all media (search hits)
    pub track_count: Option<u32>,
}

/// Release group, with its releases on lookups
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseGroup {
    pub id: String,
    pub title: Option<String>,
    /// Album, Single, EP, ...
    pub primary_type: Option<String>,
    /// Compilation, Live, Soundtrack, ...
    #[serde(default)]
    pub secondary_types: Vec<String>,
    pub first_release_date: Option<String>,
    #[serde(default)]
    pub artist_credit: Vec<ArtistCredit>,
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// Artist credit (one per credited artist)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistCredit {
    pub artist: Artist,
    /// Credited name, may differ from the official name
    pub name: Option<String>,
    pub joinphrase: Option<String>,
}

/// Artist info
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub sort_name: Option<String>,
}

/// Medium (disc) within a release
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Medium {
    pub position: Option<u32>,
    /// CD, Vinyl, Digital Media, ...
    pub format: Option<String>,
    pub track_count: Option<u32>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Track on a medium
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    pub position: Option<u32>,
    pub number: Option<String>,
    pub title: String,
    /// Length in milliseconds
    pub length: Option<u64>,
}

/// Series, a search hit or a lookup with relations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Series {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub series_type: Option<String>,
    pub disambiguation: Option<String>,
    pub score: Option<u8>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

/// Relation of a series to another entity
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Relation {
    pub target_type: String,
    /// Ordering key within the series, e.g. "3"
    pub ordering_key: Option<u32>,
    pub release_group: Option<ReleaseGroup>,
}

/// Error response from MusicBrainz API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: String,
    pub help: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// ============================================================================
