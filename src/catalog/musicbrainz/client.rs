//! MusicBrainz HTTP client
//!
//! Handles communication with the MusicBrainz web service.
//! See: https://musicbrainz.org/doc/MusicBrainz_API
//!
//! IMPORTANT: MusicBrainz requires a User-Agent header and rate limits to 1 req/sec.

use serde::de::DeserializeOwned;

use super::{adapter, dto};
use crate::catalog::domain::{
    CatalogError, GroupReleases, MetadataRelease, ReleaseSummary, SeriesDetail, SeriesRecord,
};

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
}

/// User agent string - MusicBrainz requires this
const USER_AGENT: &str = concat!(
    "CatalogSync/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/catalog-sync)"
);

/// Default MusicBrainz web service root
pub const DEFAULT_BASE_URL: &str = "https://musicbrainz.org/ws/2";

impl MusicBrainzClient {
    /// Create a new client
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (mirrors, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Search releases by title, optionally restricted to an artist
    pub async fn search_releases(
        &self,
        release: &str,
        artist: Option<&str>,
        limit: u32,
    ) -> Result<Vec<ReleaseSummary>, CatalogError> {
        let mut query = format!("release:{}", phrase(release));
        if let Some(artist) = artist {
            query.push_str(&format!(" AND artist:{}", phrase(artist)));
        }
        let url = format!(
            "{}/release/?query={}&limit={}&fmt=json",
            self.base_url,
            urlencoding::encode(&query),
            limit
        );
        let response: dto::ReleaseSearchResponse = self.get_json(&url).await?;
        Ok(adapter::to_release_summaries(response))
    }

    /// Id of the best matching release group, optionally by a given artist
    pub async fn find_release_group_id(
        &self,
        artist: Option<&str>,
        album: &str,
    ) -> Result<String, CatalogError> {
        let query = release_group_query(artist, album);
        let url = format!(
            "{}/release-group/?query={}&limit=1&fmt=json",
            self.base_url,
            urlencoding::encode(&query)
        );
        let response: dto::ReleaseGroupSearchResponse = self.get_json(&url).await?;
        adapter::first_release_group_id(response).ok_or(CatalogError::NotFound)
    }

    /// Release group with its releases and credited artist
    pub async fn release_group(&self, rgid: &str) -> Result<GroupReleases, CatalogError> {
        let url = format!(
            "{}/release-group/{}?inc=artists+releases&fmt=json",
            self.base_url, rgid
        );
        let response: dto::ReleaseGroup = self.get_json(&url).await?;
        Ok(adapter::to_group_releases(response))
    }

    /// Release with media, tracks and release group
    pub async fn release(
        &self,
        release_id: &str,
        include_artist_info: bool,
    ) -> Result<MetadataRelease, CatalogError> {
        let inc = if include_artist_info {
            "recordings+release-groups+artists"
        } else {
            "recordings+release-groups"
        };
        let url = format!(
            "{}/release/{}?inc={}&fmt=json",
            self.base_url, release_id, inc
        );
        let response: dto::Release = self.get_json(&url).await?;
        Ok(adapter::to_metadata_release(response, include_artist_info))
    }

    /// Search series by name
    pub async fn search_series(
        &self,
        name: &str,
        limit: u32,
    ) -> Result<Vec<SeriesRecord>, CatalogError> {
        let url = format!(
            "{}/series/?query={}&limit={}&fmt=json",
            self.base_url,
            urlencoding::encode(&format!("series:{}", phrase(name))),
            limit
        );
        let response: dto::SeriesSearchResponse = self.get_json(&url).await?;
        Ok(adapter::to_series_records(response))
    }

    /// Series with its release-group relations
    pub async fn series(&self, series_id: &str) -> Result<SeriesDetail, CatalogError> {
        let url = format!(
            "{}/series/{}?inc=release-group-rels&fmt=json",
            self.base_url, series_id
        );
        let response: dto::Series = self.get_json(&url).await?;
        Ok(adapter::to_series_detail(response))
    }

    /// Send a GET request and parse the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::SERVICE_UNAVAILABLE
        {
            return Err(CatalogError::RateLimited);
        }

        if !status.is_success() {
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(CatalogError::ApiError(error.error));
            }
            return Err(CatalogError::Http(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

fn release_group_query(artist: Option<&str>, album: &str) -> String {
    let mut query = format!("releasegroup:{}", phrase(&album.to_lowercase()));
    if let Some(artist) = artist {
        query.push_str(&format!(" AND artist:{}", phrase(&artist.to_lowercase())));
    }
    query
}

/// Quote a search term as a Lucene phrase.
fn phrase(term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}
