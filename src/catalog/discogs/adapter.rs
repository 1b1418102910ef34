//! Adapter layer: Convert Discogs DTOs to domain models
//!
//! This is the ONLY place where Discogs DTO types are converted to domain
//! types.

use super::dto;
use crate::catalog::domain::{
    ArtistCredit, ArtistProfile, CatalogEntry, CatalogRelease, MasterRelease, Page,
    ReleaseDetail, ReleaseFormat, SearchHit,
};
use crate::catalog::normalize;

/// Public site root; search results carry relative paths.
const SITE_ROOT: &str = "https://www.discogs.com";

fn page<T>(pagination: &dto::Pagination, items: Vec<T>) -> Page<T> {
    Page {
        items,
        page: pagination.page,
        pages: pagination.pages,
    }
}

fn site_url(uri: Option<&str>) -> Option<String> {
    let uri = uri?.trim();
    if uri.is_empty() {
        None
    } else if uri.starts_with("http") {
        Some(uri.to_string())
    } else {
        Some(format!("{}{}", SITE_ROOT, uri))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn to_search_page(response: dto::SearchResponse) -> Page<SearchHit> {
    let hits = response
        .results
        .into_iter()
        .map(|r| SearchHit {
            id: r.id.to_string(),
            title: r.title,
            url: site_url(r.uri.as_deref()),
            image_url: non_empty(r.cover_image).or_else(|| non_empty(r.thumb)),
            // Discogs reports 0 for releases without a master
            master_id: r.master_id.filter(|id| *id != 0).map(|id| id.to_string()),
            country: non_empty(r.country),
            year: non_empty(r.year),
            formats: r.format,
            status: r.status,
        })
        .collect();
    page(&response.pagination, hits)
}

pub fn to_artist_profile(artist: dto::Artist) -> ArtistProfile {
    // Prefer the primary image when the artist has several
    let image_url = artist
        .images
        .iter()
        .find(|i| i.image_type.as_deref() == Some("primary"))
        .or_else(|| artist.images.first())
        .map(|i| i.uri.clone());

    ArtistProfile {
        id: artist.id.to_string(),
        name: artist.name,
        url: site_url(artist.uri.as_deref()),
        image_url,
    }
}

pub fn to_discography_page(response: dto::ArtistReleasesResponse) -> Page<CatalogEntry> {
    let entries = response
        .releases
        .into_iter()
        .map(|entry| match entry {
            dto::ArtistRelease::Master(m) => CatalogEntry::Master(MasterRelease {
                id: m.id.to_string(),
                title: m.title,
                main_release_id: m.main_release.to_string(),
                url: m.resource_url,
                released: m.year.map(|y| y.to_string()),
            }),
            dto::ArtistRelease::Release(r) => CatalogEntry::Release(CatalogRelease {
                id: r.id.to_string(),
                title: r.title,
                status: r.status,
                format: r.format.unwrap_or_default(),
                country: None,
                released: r.year.map(|y| y.to_string()),
                url: r.resource_url,
            }),
        })
        .collect();
    page(&response.pagination, entries)
}

pub fn to_versions_page(response: dto::VersionsResponse) -> Page<CatalogRelease> {
    let versions = response
        .versions
        .into_iter()
        .map(|v| CatalogRelease {
            id: v.id.to_string(),
            title: v.title,
            status: v.status,
            format: v.format,
            country: non_empty(v.country),
            released: non_empty(v.released),
            url: v.resource_url,
        })
        .collect();
    page(&response.pagination, versions)
}

pub fn to_release_detail(release: dto::Release) -> ReleaseDetail {
    let id = release.id.to_string();

    // Headings and index entries aren't tracks
    let tracks = normalize::build_tracks(
        &id,
        release
            .tracklist
            .iter()
            .filter(|t| matches!(t.entry_type.as_deref(), None | Some("track")))
            .map(|t| (t.title.as_str(), t.duration.as_deref())),
    );

    ReleaseDetail {
        title: release.title,
        year: release.year.filter(|y| *y > 0),
        released: non_empty(release.released),
        country: non_empty(release.country),
        artists: release
            .artists
            .into_iter()
            .map(|a| ArtistCredit {
                id: a.id.to_string(),
                name: a.name,
            })
            .collect(),
        formats: release
            .formats
            .into_iter()
            .map(|f| ReleaseFormat {
                name: f.name,
                descriptions: f.descriptions,
            })
            .collect(),
        tracks,
        id,
    }
}
