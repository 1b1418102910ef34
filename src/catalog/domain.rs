//! Internal domain models for catalog lookups and release-group reconciliation.
//!
//! These types are OUR types - they don't change when the Discogs or
//! MusicBrainz APIs change. All external responses get converted into these
//! types via the adapters.

use std::collections::BTreeMap;
use std::fmt;

use super::normalize;

/// Status string the catalog uses for moderated, visible releases.
pub const ACCEPTED_STATUS: &str = "Accepted";

/// Outcome of a rate-limited remote lookup.
///
/// Remote failures never escape as errors: they are logged by the gateway,
/// which snoozes, and surface here as [`Lookup::TransportError`].
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The remote call succeeded and produced a value
    Found(T),
    /// The remote call succeeded but there was nothing to return
    NotFound,
    /// The remote call failed (network, HTTP status, parse)
    TransportError(String),
}

impl<T> Lookup<T> {
    /// Map the found value, keeping the other variants.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::TransportError(detail) => Lookup::TransportError(detail),
        }
    }

    /// Chain another lookup onto a found value.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Lookup<U>) -> Lookup<U> {
        match self {
            Lookup::Found(value) => f(value),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::TransportError(detail) => Lookup::TransportError(detail),
        }
    }

    /// The found value, discarding why there is none.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

impl<T> Lookup<Vec<T>> {
    /// Treat an empty result list as [`Lookup::NotFound`].
    pub fn non_empty(self) -> Self {
        match self {
            Lookup::Found(items) if items.is_empty() => Lookup::NotFound,
            other => other,
        }
    }
}

/// One page of a paginated catalog listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u32,
    /// Total number of pages (0 when the listing is empty)
    pub pages: u32,
}

/// Fixed release-type taxonomy derived from catalog format strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseType {
    Album,
    Ep,
    Single,
    Compilation,
    Other,
}

impl ReleaseType {
    /// Taxonomy terms in matching priority order (`Other` is the fallback).
    pub const MATCH_ORDER: [ReleaseType; 4] = [
        ReleaseType::Album,
        ReleaseType::Ep,
        ReleaseType::Single,
        ReleaseType::Compilation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Album => "Album",
            ReleaseType::Ep => "EP",
            ReleaseType::Single => "Single",
            ReleaseType::Compilation => "Compilation",
            ReleaseType::Other => "Other",
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artist search hit, built per search call and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRecord {
    pub id: String,
    pub name: String,
    pub uniquename: String,
    pub url: String,
    pub image_url: String,
    /// Similarity to the query (0-100)
    pub score: u8,
}

/// Result of an artist search.
///
/// A single-result search whose top hit doesn't match the query by name only
/// resolves to an id (possibly after album-based disambiguation).
#[derive(Debug, Clone, PartialEq)]
pub enum ArtistMatch {
    IdOnly(String),
    Record(ArtistRecord),
}

impl ArtistMatch {
    pub fn id(&self) -> &str {
        match self {
            ArtistMatch::IdOnly(id) => id,
            ArtistMatch::Record(record) => &record.id,
        }
    }
}

/// Search-result projection of a release.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseSummary {
    /// Artist name as displayed ("uniquename")
    pub uniquename: String,
    pub title: String,
    /// Artist id, when the backend reports it
    pub artist_id: Option<String>,
    /// Release id ("albumid")
    pub release_id: String,
    /// Artist page URL
    pub url: Option<String>,
    /// Release page URL ("albumurl")
    pub release_url: Option<String>,
    pub image_url: Option<String>,
    /// Similarity or backend relevance (0-100)
    pub score: u8,
    pub date: String,
    pub country: String,
    /// Joined format description, e.g. "2xCD + Vinyl"
    pub formats: String,
    /// Track counts per medium, e.g. "10 + 12"
    pub tracks: String,
    /// Release group id ("rgid")
    pub release_group_id: String,
    /// Release group type ("rgtype")
    pub release_group_type: String,
}

/// A plain catalog release: a single edition, possibly a master's version.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogRelease {
    pub id: String,
    pub title: String,
    /// Moderation status ("Accepted", "Draft", ...)
    pub status: Option<String>,
    /// Comma-separated format string, e.g. "Vinyl, LP, Album"
    pub format: String,
    pub country: Option<String>,
    /// Release date or year as reported
    pub released: Option<String>,
    pub url: Option<String>,
}

impl CatalogRelease {
    pub fn is_accepted(&self) -> bool {
        self.status.as_deref() == Some(ACCEPTED_STATUS)
    }
}

/// A master release: the aggregate over all its versions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MasterRelease {
    pub id: String,
    pub title: String,
    pub main_release_id: String,
    pub url: Option<String>,
    pub released: Option<String>,
}

/// An entry of an artist discography listing.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEntry {
    Master(MasterRelease),
    Release(CatalogRelease),
}

impl CatalogEntry {
    pub fn id(&self) -> &str {
        match self {
            CatalogEntry::Master(master) => &master.id,
            CatalogEntry::Release(release) => &release.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CatalogEntry::Master(master) => &master.title,
            CatalogEntry::Release(release) => &release.title,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            CatalogEntry::Master(master) => master.url.as_deref(),
            CatalogEntry::Release(release) => release.url.as_deref(),
        }
    }

    /// Whether this entry aggregates a list of versions.
    pub fn has_versions(&self) -> bool {
        matches!(self, CatalogEntry::Master(_))
    }
}

/// In-memory reconciliation unit: a master (or singleton release) and the
/// versions it owns, keyed by release id.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseGroup {
    pub master: CatalogEntry,
    pub main_release_id: String,
    pub versions: BTreeMap<String, CatalogRelease>,
}

impl ReleaseGroup {
    /// Group for a release without a master: its own master and only version.
    pub fn singleton(release: CatalogRelease) -> Self {
        let id = release.id.clone();
        let mut versions = BTreeMap::new();
        versions.insert(id.clone(), release.clone());
        Self {
            master: CatalogEntry::Release(release),
            main_release_id: id,
            versions,
        }
    }

    /// Release group id (the master's id).
    pub fn id(&self) -> &str {
        self.master.id()
    }

    pub fn title(&self) -> &str {
        self.master.title()
    }

    /// Type classified from the format strings of all versions.
    pub fn release_type(&self) -> ReleaseType {
        let formats: Vec<&str> = self.versions.values().map(|v| v.format.as_str()).collect();
        normalize::classify_formats(&formats)
    }
}

/// An artist's name and reconciled discography.
#[derive(Debug, Clone)]
pub struct ArtistDiscography {
    pub artist_name: String,
    pub release_groups: Vec<ReleaseGroup>,
}

/// Artist profile from the catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArtistProfile {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
}

/// Kinds of catalog search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Artist,
    Release,
    Master,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Artist => "artist",
            SearchKind::Release => "release",
            SearchKind::Master => "master",
        }
    }
}

/// A catalog search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub query: String,
    pub kind: SearchKind,
    /// Results per page
    pub per_page: u32,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchHit {
    pub id: String,
    /// For releases: "Artist - Title"; for artists: the name
    pub title: String,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub master_id: Option<String>,
    pub country: Option<String>,
    pub year: Option<String>,
    pub formats: Vec<String>,
    pub status: Option<String>,
}

/// Credited artist on a release.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistCredit {
    pub id: String,
    pub name: String,
}

/// A physical/digital format of a release with its descriptions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseFormat {
    pub name: String,
    pub descriptions: Vec<String>,
}

/// A track of a release.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// 1-based, sequential within the release
    pub number: u32,
    pub title: String,
    /// Stable id derived from (release id, title)
    pub id: String,
    /// Duration in seconds, absent when the source has none
    pub duration: Option<u32>,
}

/// Full release details, fetched when a release is written to the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseDetail {
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
    pub released: Option<String>,
    pub country: Option<String>,
    pub artists: Vec<ArtistCredit>,
    pub formats: Vec<ReleaseFormat>,
    pub tracks: Vec<Track>,
}

impl ReleaseDetail {
    /// Full release date when known, else the release year.
    pub fn release_date(&self) -> Option<String> {
        self.released
            .clone()
            .filter(|d| !d.trim().is_empty())
            .or_else(|| self.year.map(|y| y.to_string()))
    }
}

// ============================================================================
// MusicBrainz
// ============================================================================

/// A release listed under a MusicBrainz release group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupRelease {
    pub id: String,
    pub title: String,
    pub status: Option<String>,
    pub date: Option<String>,
    pub country: Option<String>,
}

/// A MusicBrainz release group with its releases.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupReleases {
    pub id: String,
    pub title: String,
    pub artist_name: Option<String>,
    pub releases: Vec<GroupRelease>,
}

/// Release details from MusicBrainz.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetadataRelease {
    pub id: String,
    pub title: String,
    pub asin: Option<String>,
    pub date: Option<String>,
    /// Format of the first medium, "Unknown" when absent
    pub format: String,
    /// "Unknown" when absent
    pub country: String,
    pub release_group_id: String,
    pub release_group_title: String,
    /// Primary type, or the first secondary type of an Album
    pub release_group_type: String,
    /// Only filled when artist info was requested
    pub artist_name: Option<String>,
    pub artist_id: Option<String>,
    pub tracks: Vec<Track>,
}

/// A series search hit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesRecord {
    pub id: String,
    pub name: String,
    pub series_type: Option<String>,
    pub disambiguation: Option<String>,
    pub score: u8,
    pub url: String,
}

/// A release group belonging to a series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesEntry {
    pub id: String,
    pub title: String,
    pub release_type: Option<String>,
    pub first_release_date: Option<String>,
}

/// A series with its release groups in series order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesDetail {
    pub id: String,
    pub name: String,
    pub series_type: Option<String>,
    pub release_groups: Vec<SeriesEntry>,
}

/// Errors from the remote catalog services
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    Http(u16),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Not found")]
    NotFound,

    #[error("Rate limited - try again later")]
    RateLimited,
}
