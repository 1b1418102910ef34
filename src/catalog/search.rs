//! Artist and release search with similarity scoring.
//!
//! A single-result artist search whose top hit doesn't carry the queried
//! name is ambiguous; it is resolved through an album the local library
//! already owns for that artist name.

use std::collections::HashSet;

use sqlx::sqlite::SqlitePool;
use tracing::{debug, info};

use crate::catalog::domain::{
    ACCEPTED_STATUS, ArtistMatch, ArtistRecord, Lookup, ReleaseSummary, SearchHit, SearchKind,
    SearchQuery,
};
use crate::catalog::normalize::{self, DEFAULT_ARTIST_IMAGE, UNKNOWN};
use crate::catalog::service::CatalogService;
use crate::catalog::traits::CatalogApi;
use crate::db;
use crate::error::Result;

const ARTIST_URL: &str = "https://www.discogs.com/artist";

impl<A: CatalogApi> CatalogService<A> {
    /// Search artists by name.
    ///
    /// With `limit == 1` and a top hit whose name differs from `name`, the
    /// result is only an id: the artist of a locally owned album when that
    /// disambiguation works, the top hit otherwise.
    pub async fn find_artist(
        &self,
        pool: &SqlitePool,
        name: &str,
        limit: usize,
    ) -> Result<Lookup<Vec<ArtistMatch>>> {
        let query = SearchQuery {
            query: name.to_string(),
            kind: SearchKind::Artist,
            per_page: self.page_size_for(limit),
        };

        let hits = match self.search_all("artist search", &query, limit).await {
            Lookup::Found(hits) => hits,
            Lookup::NotFound => return Ok(Lookup::NotFound),
            Lookup::TransportError(detail) => return Ok(Lookup::TransportError(detail)),
        };

        if limit == 1
            && let Some(top) = hits.first()
            && top.title.to_lowercase() != name.to_lowercase()
        {
            info!(
                target: "catalog::search",
                query = name,
                top = %top.title,
                "Artist match is ambiguous, trying album lookup"
            );
            let id = match self.find_artist_by_album(pool, name).await? {
                Some(id) => id,
                None => top.id.clone(),
            };
            return Ok(Lookup::Found(vec![ArtistMatch::IdOnly(id)]));
        }

        let records = hits
            .into_iter()
            .map(|hit| ArtistMatch::Record(artist_record(name, hit)))
            .collect();
        Ok(Lookup::Found(records))
    }

    /// Resolve an artist id through one of their locally owned albums.
    ///
    /// Picks a random album title for `name` from the library, searches
    /// releases for "album artist" and returns the first credited artist of
    /// the top result.
    pub async fn find_artist_by_album(
        &self,
        pool: &SqlitePool,
        name: &str,
    ) -> Result<Option<String>> {
        let album = {
            let mut conn = pool.acquire().await?;
            db::random_album_title(&mut conn, name).await?
        };
        let Some(album) = album else {
            debug!(target: "catalog::search", artist = name, "No local album to disambiguate with");
            return Ok(None);
        };

        let query = SearchQuery {
            query: format!("{} {}", album, name),
            kind: SearchKind::Release,
            per_page: 1,
        };
        let release_id = match self
            .gateway
            .call("album search", self.api.search(&query, 1))
            .await
        {
            Lookup::Found(page) => match page.items.into_iter().next() {
                Some(hit) => hit.id,
                None => return Ok(None),
            },
            _ => return Ok(None),
        };

        let artist_id = self
            .gateway
            .call("album release", self.api.release(&release_id))
            .await
            .found()
            .and_then(|detail| detail.artists.into_iter().next())
            .map(|artist| artist.id);

        debug!(
            target: "catalog::search",
            artist = name,
            album = %album,
            resolved = ?artist_id,
            "Album-based disambiguation"
        );
        Ok(artist_id)
    }

    /// Search releases, one result per release group, best match first.
    ///
    /// `name` may use the `"Artist:Release"` shorthand when no `artist` is
    /// given. Only accepted releases are kept (hits without a status count
    /// as accepted). Equal scores keep their search order.
    pub async fn find_release(
        &self,
        name: &str,
        limit: usize,
        artist: Option<&str>,
    ) -> Lookup<Vec<ReleaseSummary>> {
        let (artist, release) = match artist {
            Some(artist) => (Some(artist), name),
            None => match name.rsplit_once(':') {
                Some((artist, release)) => (Some(artist.trim()), release.trim()),
                None => (None, name),
            },
        };

        let per_page = self.settings().per_page;
        let query = SearchQuery {
            query: match artist {
                Some(artist) => format!("{} {}", artist, release),
                None => release.to_string(),
            },
            kind: SearchKind::Release,
            per_page,
        };

        let hits = match self
            .search_all("release search", &query, per_page as usize)
            .await
        {
            Lookup::Found(hits) => hits,
            Lookup::NotFound => return Lookup::NotFound,
            Lookup::TransportError(detail) => return Lookup::TransportError(detail),
        };

        let mut seen_groups = HashSet::new();
        let mut summaries: Vec<ReleaseSummary> = hits
            .into_iter()
            .filter(|hit| hit.status.as_deref().is_none_or(|s| s == ACCEPTED_STATUS))
            .filter(|hit| seen_groups.insert(group_key(hit).to_string()))
            .map(|hit| release_summary(release, hit))
            .collect();

        summaries.sort_by(|a, b| b.score.cmp(&a.score));
        summaries.truncate(limit);

        Lookup::Found(summaries).non_empty()
    }

    /// Collect up to `max_items` search hits over as many pages as needed.
    async fn search_all(
        &self,
        label: &str,
        query: &SearchQuery,
        max_items: usize,
    ) -> Lookup<Vec<SearchHit>> {
        self.gateway
            .paginate(label, Some(max_items.max(1)), |page| {
                self.api.search(query, page)
            })
            .await
            .non_empty()
    }

    fn page_size_for(&self, limit: usize) -> u32 {
        (limit.max(1) as u32).min(self.settings().per_page)
    }
}

/// A release hit's group: its master, or itself when masterless.
fn group_key(hit: &SearchHit) -> &str {
    hit.master_id.as_deref().unwrap_or(&hit.id)
}

fn artist_record(query: &str, hit: SearchHit) -> ArtistRecord {
    ArtistRecord {
        score: normalize::similarity(query, &hit.title),
        url: hit
            .url
            .unwrap_or_else(|| format!("{}/{}", ARTIST_URL, hit.id)),
        image_url: hit
            .image_url
            .unwrap_or_else(|| DEFAULT_ARTIST_IMAGE.to_string()),
        uniquename: hit.title.clone(),
        name: hit.title,
        id: hit.id,
    }
}

fn release_summary(query: &str, hit: SearchHit) -> ReleaseSummary {
    let (artist, title) = normalize::split_search_title(&hit.title);
    let group_id = group_key(&hit).to_string();

    ReleaseSummary {
        uniquename: artist.unwrap_or_default().to_string(),
        title: title.to_string(),
        artist_id: None,
        release_id: group_id.clone(),
        url: None,
        release_url: hit.url.clone(),
        image_url: hit.image_url.clone(),
        score: normalize::similarity(query, title),
        date: hit.year.clone().unwrap_or_default(),
        country: normalize::country_or_unknown(hit.country.as_deref()),
        formats: if hit.formats.is_empty() {
            UNKNOWN.to_string()
        } else {
            normalize::format_summary(&hit.formats)
        },
        tracks: String::new(),
        release_group_id: group_id,
        release_group_type: normalize::classify_formats(&hit.formats).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::service::test_support::mock_service;
    use crate::catalog::traits::mocks::{MockCatalog, release_detail};
    use crate::catalog::domain::CatalogError;
    use crate::test_utils::{mock_have_file, temp_db};

    fn hit(id: &str, title: &str) -> SearchHit {
        SearchHit {
            id: id.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn release_hit(id: &str, title: &str, master: Option<&str>, status: &str) -> SearchHit {
        SearchHit {
            master_id: master.map(String::from),
            status: Some(status.to_string()),
            formats: vec!["Vinyl".to_string(), "LP".to_string(), "Album".to_string()],
            year: Some("1969".to_string()),
            ..hit(id, title)
        }
    }

    #[tokio::test]
    async fn test_find_artist_builds_scored_records() {
        let (pool, _dir) = temp_db().await;
        let mut mock = MockCatalog::new();
        mock.search_hits = vec![hit("1", "The Beatles"), hit("2", "Beatles Revival")];
        let service = mock_service(mock);

        let matches = service
            .find_artist(&pool, "The Beatles", 5)
            .await
            .unwrap()
            .found()
            .unwrap();

        assert_eq!(matches.len(), 2);
        let ArtistMatch::Record(ref first) = matches[0] else {
            panic!("expected a full record");
        };
        assert_eq!(first.score, 100);
        assert_eq!(first.image_url, DEFAULT_ARTIST_IMAGE);
        assert_eq!(first.url, "https://www.discogs.com/artist/1");
        assert_eq!(matches[1].id(), "2");
    }

    #[tokio::test]
    async fn test_single_exact_match_is_a_record() {
        let (pool, _dir) = temp_db().await;
        let mut mock = MockCatalog::new();
        mock.search_hits = vec![hit("1", "the beatles")];
        let service = mock_service(mock);

        let matches = service
            .find_artist(&pool, "The Beatles", 1)
            .await
            .unwrap()
            .found()
            .unwrap();
        assert!(matches!(matches[0], ArtistMatch::Record(_)));
    }

    #[tokio::test]
    async fn test_single_match_folds_non_ascii_case() {
        let (pool, _dir) = temp_db().await;
        let mut mock = MockCatalog::new();
        mock.search_hits = vec![hit("1", "Björk")];
        let service = mock_service(mock);

        let matches = service
            .find_artist(&pool, "BJÖRK", 1)
            .await
            .unwrap()
            .found()
            .unwrap();

        let ArtistMatch::Record(ref record) = matches[0] else {
            panic!("expected a full record");
        };
        assert_eq!(record.id, "1");
        assert_eq!(record.name, "Björk");
    }

    #[tokio::test]
    async fn test_scores_are_case_sensitive() {
        let mut mock = MockCatalog::new();
        mock.search_hits = vec![
            release_hit("1", "The Beatles - abbey road", None, "Accepted"),
            release_hit("2", "The Beatles - Abbey Road", None, "Accepted"),
        ];
        let service = mock_service(mock);

        let results = service
            .find_release("Abbey Road", 5, None)
            .await
            .found()
            .unwrap();
        assert_eq!(results[0].release_id, "2");
        assert_eq!(results[0].score, 100);
        assert_eq!(results[1].score, 80);
    }

    #[tokio::test]
    async fn test_ambiguous_match_resolved_by_album() {
        let (pool, _dir) = temp_db().await;
        {
            let mut conn = pool.acquire().await.unwrap();
            db::insert_have(&mut conn, &mock_have_file("/m/a.flac", "Band", "Album", "One"))
                .await
                .unwrap();
        }

        let mut mock = MockCatalog::new();
        mock.search_hits = vec![hit("r1", "Band (2)")];
        mock.releases
            .insert("r1".to_string(), release_detail("r1", "Album", "Band", &["One"]));
        let service = mock_service(mock);

        let matches = service
            .find_artist(&pool, "Band", 1)
            .await
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(matches, vec![ArtistMatch::IdOnly("artist-band".to_string())]);
    }

    #[tokio::test]
    async fn test_ambiguous_match_falls_back_to_top_hit() {
        let (pool, _dir) = temp_db().await;
        let mut mock = MockCatalog::new();
        mock.search_hits = vec![hit("7", "Band (2)")];
        let service = mock_service(mock);

        let matches = service
            .find_artist(&pool, "Band", 1)
            .await
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(matches, vec![ArtistMatch::IdOnly("7".to_string())]);
    }

    #[tokio::test]
    async fn test_find_artist_no_results() {
        let (pool, _dir) = temp_db().await;
        let service = mock_service(MockCatalog::new());
        let result = service.find_artist(&pool, "Nobody", 5).await.unwrap();
        assert!(matches!(result, Lookup::NotFound));
    }

    #[tokio::test]
    async fn test_find_artist_transport_error() {
        let (pool, _dir) = temp_db().await;
        let service = mock_service(MockCatalog::with_error(CatalogError::Http(502)));
        let result = service.find_artist(&pool, "Band", 5).await.unwrap();
        assert!(matches!(result, Lookup::TransportError(_)));
    }

    #[tokio::test]
    async fn test_find_release_ranks_and_truncates() {
        let mut mock = MockCatalog::new();
        mock.search_hits = vec![
            release_hit("1", "The Beatles - Abbey Road Sessions", Some("m1"), "Accepted"),
            release_hit("2", "The Beatles - Abbey Road", Some("m2"), "Accepted"),
            release_hit("3", "The Beatles - Abbey Road", Some("m2"), "Accepted"),
            release_hit("4", "Various - Abbey Road", None, "Draft"),
            release_hit("5", "Tribute - Abbey Rd", None, "Accepted"),
        ];
        let service = mock_service(mock);

        let results = service
            .find_release("Abbey Road", 2, None)
            .await
            .found()
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].score >= results[1].score);
        assert_eq!(results[0].release_id, "m2");
        assert_eq!(results[0].score, 100);
        assert_eq!(results[0].uniquename, "The Beatles");
        assert_eq!(results[0].release_group_type, "Album");
        assert_eq!(results[0].formats, "Vinyl + LP + Album");
    }

    #[tokio::test]
    async fn test_find_release_equal_scores_keep_order() {
        let mut mock = MockCatalog::new();
        mock.search_hits = vec![
            release_hit("1", "A - Help", None, "Accepted"),
            release_hit("2", "B - Help", None, "Accepted"),
            release_hit("3", "C - Help", None, "Accepted"),
        ];
        let service = mock_service(mock);

        let ids: Vec<String> = service
            .find_release("Help", 10, None)
            .await
            .found()
            .unwrap()
            .into_iter()
            .map(|r| r.release_id)
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_find_release_shorthand_scores_release_part() {
        let mut mock = MockCatalog::new();
        mock.search_hits = vec![release_hit("1", "Beatles - Help", None, "Accepted")];
        let service = mock_service(mock);

        let results = service
            .find_release("Beatles:Help", 5, None)
            .await
            .found()
            .unwrap();
        assert_eq!(results[0].score, 100);
    }

    #[tokio::test]
    async fn test_find_release_nothing_accepted() {
        let mut mock = MockCatalog::new();
        mock.search_hits = vec![release_hit("1", "X - Y", None, "Rejected")];
        let service = mock_service(mock);
        assert!(matches!(
            service.find_release("Y", 5, None).await,
            Lookup::NotFound
        ));
    }

    #[test]
    fn test_group_key() {
        assert_eq!(group_key(&release_hit("1", "t", Some("m"), "Accepted")), "m");
        assert_eq!(group_key(&release_hit("1", "t", None, "Accepted")), "1");
    }
}
