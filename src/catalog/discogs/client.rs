//! Discogs HTTP client
//!
//! Handles communication with the Discogs REST API. Each method fetches
//! exactly one page; pagination and rate limiting are the caller's job
//! (see [`crate::catalog::gateway`]).
//!
//! IMPORTANT: Discogs requires a User-Agent header. Authenticated requests
//! (personal access token) get 60 req/min, anonymous ones 25 req/min.

use serde::de::DeserializeOwned;

use super::{adapter, dto};
use crate::catalog::domain::{
    ArtistProfile, CatalogEntry, CatalogError, CatalogRelease, Page, ReleaseDetail, SearchHit,
    SearchQuery,
};

/// Discogs API client
pub struct DiscogsClient {
    http_client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// User agent string - Discogs rejects requests without one
const USER_AGENT: &str = concat!(
    "CatalogSync/",
    env!("CARGO_PKG_VERSION"),
    " +https://github.com/catalog-sync"
);

/// Default Discogs API root
pub const DEFAULT_BASE_URL: &str = "https://api.discogs.com";

impl DiscogsClient {
    /// Create a new client, optionally authenticated with a personal token
    pub fn new(token: Option<String>) -> Result<Self, CatalogError> {
        Self::with_base_url(DEFAULT_BASE_URL, token)
    }

    /// Create a client against a custom base URL (mirrors, tests)
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Search the catalog database (one page)
    pub async fn search(
        &self,
        query: &SearchQuery,
        page: u32,
    ) -> Result<Page<SearchHit>, CatalogError> {
        let url = format!(
            "{}/database/search?q={}&type={}&per_page={}&page={}",
            self.base_url,
            urlencoding::encode(&query.query),
            query.kind.as_str(),
            query.per_page,
            page
        );
        let response: dto::SearchResponse = self.get_json(&url).await?;
        Ok(adapter::to_search_page(response))
    }

    /// Fetch an artist profile
    pub async fn artist(&self, artist_id: &str) -> Result<ArtistProfile, CatalogError> {
        let url = format!("{}/artists/{}", self.base_url, artist_id);
        let response: dto::Artist = self.get_json(&url).await?;
        Ok(adapter::to_artist_profile(response))
    }

    /// Fetch one page of an artist's discography
    pub async fn artist_releases(
        &self,
        artist_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<CatalogEntry>, CatalogError> {
        let url = format!(
            "{}/artists/{}/releases?per_page={}&page={}",
            self.base_url, artist_id, per_page, page
        );
        let response: dto::ArtistReleasesResponse = self.get_json(&url).await?;
        Ok(adapter::to_discography_page(response))
    }

    /// Fetch one page of a master's versions
    pub async fn master_versions(
        &self,
        master_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<CatalogRelease>, CatalogError> {
        let url = format!(
            "{}/masters/{}/versions?per_page={}&page={}",
            self.base_url, master_id, per_page, page
        );
        let response: dto::VersionsResponse = self.get_json(&url).await?;
        Ok(adapter::to_versions_page(response))
    }

    /// Fetch a release with artists, formats and tracklist
    pub async fn release(&self, release_id: &str) -> Result<ReleaseDetail, CatalogError> {
        let url = format!("{}/releases/{}", self.base_url, release_id);
        let response: dto::Release = self.get_json(&url).await?;
        Ok(adapter::to_release_detail(response))
    }

    /// Send a GET request and parse the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let mut request = self.http_client.get(url);
        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Discogs token={}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimited);
        }

        if !status.is_success() {
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(CatalogError::ApiError(error.message));
            }
            return Err(CatalogError::Http(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = DiscogsClient::new(None).unwrap();
        assert_eq!(client.base_url, "https://api.discogs.com");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_client_with_custom_url() {
        let client =
            DiscogsClient::with_base_url("http://localhost:8080/", Some("tok".into())).unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_empty_token_is_anonymous() {
        let client = DiscogsClient::new(Some(String::new())).unwrap();
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_user_agent_format() {
        assert!(USER_AGENT.starts_with("CatalogSync/"));
    }
}
