//! Adapter layer: Convert MusicBrainz DTOs to domain models
//!
//! This is the ONLY place where MusicBrainz DTO types are converted to
//! domain types.

use super::dto;
use crate::catalog::domain::{
    GroupRelease, GroupReleases, MetadataRelease, ReleaseSummary, SeriesDetail, SeriesEntry,
    SeriesRecord, Track,
};
use crate::catalog::normalize::{self, UNKNOWN};

const SITE_URL: &str = "https://musicbrainz.org";

/// Project release search hits into summaries.
pub fn to_release_summaries(response: dto::ReleaseSearchResponse) -> Vec<ReleaseSummary> {
    response
        .releases
        .into_iter()
        .map(to_release_summary)
        .collect()
}

fn to_release_summary(release: dto::Release) -> ReleaseSummary {
    let artist = release.artist_credit.first().map(|c| &c.artist);

    // Media without a format or a track count are left out of the summary
    let formats: Vec<&str> = release
        .media
        .iter()
        .filter_map(|m| m.format.as_deref())
        .collect();
    let tracks = release
        .media
        .iter()
        .filter_map(|m| m.track_count)
        .map(|count| count.to_string())
        .collect::<Vec<_>>()
        .join(" + ");

    let title = match release.disambiguation.as_deref() {
        Some(d) if !d.is_empty() => format!("{} ({})", release.title, d),
        _ => release.title.clone(),
    };

    let (release_group_id, release_group_type) = match release.release_group {
        Some(ref rg) => (rg.id.clone(), group_type(rg)),
        None => (String::new(), UNKNOWN.to_string()),
    };

    ReleaseSummary {
        uniquename: artist.map(|a| a.name.clone()).unwrap_or_default(),
        title,
        artist_id: artist.map(|a| a.id.clone()),
        url: artist.map(|a| format!("{}/artist/{}", SITE_URL, a.id)),
        release_url: Some(format!("{}/release/{}", SITE_URL, release.id)),
        release_id: release.id,
        image_url: None,
        score: release.score.unwrap_or(0),
        date: release.date.unwrap_or_default(),
        country: normalize::country_or_unknown(release.country.as_deref()),
        formats: normalize::format_summary(&formats),
        tracks,
        release_group_id,
        release_group_type,
    }
}

/// First release group id of a search, if any.
pub fn first_release_group_id(response: dto::ReleaseGroupSearchResponse) -> Option<String> {
    response.release_groups.into_iter().next().map(|rg| rg.id)
}

/// Release group lookup with its releases.
pub fn to_group_releases(group: dto::ReleaseGroup) -> GroupReleases {
    GroupReleases {
        artist_name: credited_artist(&group.artist_credit),
        title: group.title.unwrap_or_default(),
        id: group.id,
        releases: group
            .releases
            .into_iter()
            .map(|r| GroupRelease {
                id: r.id,
                title: r.title,
                status: r.status,
                date: r.date,
                country: r.country,
            })
            .collect(),
    }
}

/// Full release lookup. Artist fields are only kept when requested.
pub fn to_metadata_release(release: dto::Release, include_artist_info: bool) -> MetadataRelease {
    let format = release
        .media
        .first()
        .and_then(|m| m.format.clone())
        .unwrap_or_else(|| UNKNOWN.to_string());

    let (release_group_id, release_group_title, release_group_type) = match release.release_group
    {
        Some(ref rg) => (
            rg.id.clone(),
            rg.title.clone().unwrap_or_else(|| release.title.clone()),
            group_type(rg),
        ),
        None => (String::new(), release.title.clone(), UNKNOWN.to_string()),
    };

    let (artist_name, artist_id) = if include_artist_info {
        (
            credited_artist(&release.artist_credit),
            release.artist_credit.first().map(|c| c.artist.id.clone()),
        )
    } else {
        (None, None)
    };

    let tracks = media_tracks(&release.id, &release.media);

    MetadataRelease {
        id: release.id,
        title: release.title,
        asin: release.asin,
        date: release.date,
        format,
        country: normalize::country_or_unknown(release.country.as_deref()),
        release_group_id,
        release_group_title,
        release_group_type,
        artist_name,
        artist_id,
        tracks,
    }
}

/// Series search hits.
pub fn to_series_records(response: dto::SeriesSearchResponse) -> Vec<SeriesRecord> {
    response
        .series
        .into_iter()
        .map(|s| SeriesRecord {
            url: format!("{}/series/{}", SITE_URL, s.id),
            id: s.id,
            name: s.name,
            series_type: s.series_type,
            disambiguation: s.disambiguation.filter(|d| !d.is_empty()),
            score: s.score.unwrap_or(0),
        })
        .collect()
}

/// Series lookup: release-group relations in ordering-key order.
pub fn to_series_detail(series: dto::Series) -> SeriesDetail {
    let mut relations: Vec<dto::Relation> = series
        .relations
        .into_iter()
        .filter(|r| r.target_type == "release_group")
        .collect();
    relations.sort_by_key(|r| r.ordering_key.unwrap_or(u32::MAX));

    SeriesDetail {
        id: series.id,
        name: series.name,
        series_type: series.series_type,
        release_groups: relations
            .into_iter()
            .filter_map(|r| r.release_group)
            .map(|rg| SeriesEntry {
                title: rg.title.clone().unwrap_or_default(),
                release_type: rg.primary_type.clone(),
                first_release_date: rg.first_release_date.clone(),
                id: rg.id,
            })
            .collect(),
    }
}

/// Primary type, promoted to the first secondary type for albums
/// ("Album" + "Live" is a live release).
fn group_type(rg: &dto::ReleaseGroup) -> String {
    match rg.primary_type.as_deref() {
        Some("Album") => rg
            .secondary_types
            .first()
            .cloned()
            .unwrap_or_else(|| "Album".to_string()),
        Some(other) => other.to_string(),
        None => UNKNOWN.to_string(),
    }
}

/// Name of the first credited artist.
fn credited_artist(credits: &[dto::ArtistCredit]) -> Option<String> {
    credits.first().map(|c| c.artist.name.clone())
}

/// Tracks of all media numbered 1..N across the whole release.
fn media_tracks(release_id: &str, media: &[dto::Medium]) -> Vec<Track> {
    media
        .iter()
        .flat_map(|m| m.tracks.iter())
        .enumerate()
        .map(|(index, track)| Track {
            number: index as u32 + 1,
            title: track.title.clone(),
            id: normalize::track_id(&track.title, release_id),
            duration: track.length.map(|ms| (ms / 1000) as u32),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medium(format: Option<&str>, count: u32, titles: &[&str]) -> dto::Medium {
        dto::Medium {
            position: None,
            format: format.map(String::from),
            track_count: Some(count),
            tracks: titles
                .iter()
                .map(|t| dto::Track {
                    position: None,
                    number: None,
                    title: t.to_string(),
                    length: Some(125_400),
                })
                .collect(),
        }
    }

    fn group(primary: Option<&str>, secondary: &[&str]) -> dto::ReleaseGroup {
        dto::ReleaseGroup {
            id: "rg-1".to_string(),
            title: Some("Group".to_string()),
            primary_type: primary.map(String::from),
            secondary_types: secondary.iter().map(|s| s.to_string()).collect(),
            first_release_date: None,
            artist_credit: vec![],
            releases: vec![],
        }
    }

    fn release(media: Vec<dto::Medium>, rg: Option<dto::ReleaseGroup>) -> dto::Release {
        dto::Release {
            id: "rel-1".to_string(),
            title: "Title".to_string(),
            disambiguation: None,
            score: Some(87),
            status: Some("Official".to_string()),
            date: Some("1969".to_string()),
            country: None,
            asin: None,
            artist_credit: vec![dto::ArtistCredit {
                artist: dto::Artist {
                    id: "art-1".to_string(),
                    name: "Artist".to_string(),
                    sort_name: None,
                },
                name: None,
                joinphrase: None,
            }],
            release_group: rg,
            media,
            track_count: None,
        }
    }

    #[test]
    fn test_summary_counts_formats_in_order() {
        let hit = release(
            vec![
                medium(Some("CD"), 10, &[]),
                medium(Some("CD"), 12, &[]),
                medium(Some("Vinyl"), 8, &[]),
            ],
            Some(group(Some("Album"), &[])),
        );

        let summary = to_release_summary(hit);

        assert_eq!(summary.formats, "2xCD + Vinyl");
        assert_eq!(summary.tracks, "10 + 12 + 8");
        assert_eq!(summary.score, 87);
        assert_eq!(summary.country, "Unknown");
        assert_eq!(summary.release_group_type, "Album");
        assert_eq!(summary.uniquename, "Artist");
        assert_eq!(
            summary.release_url.as_deref(),
            Some("https://musicbrainz.org/release/rel-1")
        );
    }

    #[test]
    fn test_summary_without_media() {
        let summary = to_release_summary(release(vec![], None));
        assert_eq!(summary.formats, "");
        assert_eq!(summary.tracks, "");
        assert_eq!(summary.title, "Title");
        assert_eq!(summary.release_group_type, "Unknown");
    }

    #[test]
    fn test_summary_skips_media_without_format_or_count() {
        let mut uncounted = medium(Some("Vinyl"), 0, &[]);
        uncounted.track_count = None;
        let hit = release(
            vec![medium(None, 10, &[]), uncounted, medium(Some("CD"), 12, &[])],
            None,
        );

        let summary = to_release_summary(hit);
        assert_eq!(summary.formats, "Vinyl + CD");
        assert_eq!(summary.tracks, "10 + 12");
    }

    #[test]
    fn test_summary_title_carries_disambiguation() {
        let mut hit = release(vec![], None);
        hit.disambiguation = Some("2019 mix".to_string());
        assert_eq!(to_release_summary(hit).title, "Title (2019 mix)");

        let mut hit = release(vec![], None);
        hit.disambiguation = Some(String::new());
        assert_eq!(to_release_summary(hit).title, "Title");
    }

    #[test]
    fn test_album_promoted_to_secondary_type() {
        assert_eq!(group_type(&group(Some("Album"), &["Live"])), "Live");
        assert_eq!(group_type(&group(Some("Album"), &[])), "Album");
        assert_eq!(group_type(&group(Some("Single"), &["Remix"])), "Single");
        assert_eq!(group_type(&group(None, &[])), "Unknown");
    }

    #[test]
    fn test_metadata_release_defaults_and_tracks() {
        let lookup = release(
            vec![
                medium(None, 2, &["One", "Two"]),
                medium(Some("CD"), 1, &["Three"]),
            ],
            Some(group(Some("Album"), &["Compilation"])),
        );

        let detail = to_metadata_release(lookup, true);

        assert_eq!(detail.format, "Unknown");
        assert_eq!(detail.country, "Unknown");
        assert_eq!(detail.release_group_type, "Compilation");
        assert_eq!(detail.artist_name.as_deref(), Some("Artist"));
        assert_eq!(detail.tracks.len(), 3);
        assert_eq!(detail.tracks[2].number, 3);
        assert_eq!(detail.tracks[2].duration, Some(125));
        assert_eq!(detail.tracks[0].id, normalize::track_id("One", "rel-1"));
    }

    #[test]
    fn test_metadata_release_without_artist_info() {
        let detail = to_metadata_release(release(vec![], None), false);
        assert!(detail.artist_name.is_none());
        assert!(detail.artist_id.is_none());
        assert_eq!(detail.release_group_title, "Title");
    }

    #[test]
    fn test_series_detail_orders_release_groups() {
        let relation = |key: u32, id: &str| dto::Relation {
            target_type: "release_group".to_string(),
            ordering_key: Some(key),
            release_group: Some(dto::ReleaseGroup {
                id: id.to_string(),
                ..group(Some("Album"), &[])
            }),
        };
        let series = dto::Series {
            id: "ser-1".to_string(),
            name: "Series".to_string(),
            series_type: None,
            disambiguation: None,
            score: None,
            relations: vec![
                relation(2, "second"),
                dto::Relation {
                    target_type: "url".to_string(),
                    ordering_key: None,
                    release_group: None,
                },
                relation(1, "first"),
            ],
        };

        let detail = to_series_detail(series);
        let ids: Vec<&str> = detail.release_groups.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_series_records_drop_empty_disambiguation() {
        let response = dto::SeriesSearchResponse {
            series: vec![dto::Series {
                id: "s".to_string(),
                name: "Name".to_string(),
                series_type: Some("Catalogue".to_string()),
                disambiguation: Some(String::new()),
                score: Some(90),
                relations: vec![],
            }],
        };

        let records = to_series_records(response);
        assert_eq!(records[0].score, 90);
        assert!(records[0].disambiguation.is_none());
        assert_eq!(records[0].url, "https://musicbrainz.org/series/s");
    }
}
