//! Persistence synchronizer.
//!
//! Diffs a reconciled release group against the local store: stale release
//! rows are removed from every release table, new (or forced) releases are
//! written to `allalbums`/`alltracks`, and their tracks are linked to local
//! files in `have`.
//!
//! Remote release details are fetched before the store is touched. The
//! writes then run in a single transaction, so a group either lands
//! completely or not at all.

use std::collections::HashSet;

use sqlx::SqliteConnection;
use sqlx::sqlite::SqlitePool;
use tracing::{debug, info, warn};

use crate::catalog::domain::{CatalogRelease, Lookup, ReleaseDetail, ReleaseGroup, ReleaseType};
use crate::catalog::normalize;
use crate::catalog::service::CatalogService;
use crate::catalog::traits::CatalogApi;
use crate::db::{self, ReleaseRow, TrackRow};
use crate::error::{Result, ResultExt};
use crate::naming;

/// Result of synchronizing one release group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No version passed the status filter; nothing was touched
    NoAcceptedReleases,
    /// A release had no credited artist; nothing was written
    MissingArtistCredit { release_id: String },
    /// Number of releases written or rewritten
    Written(usize),
    /// Stale releases were removed; the group must be repackaged downstream
    RepackageRequired { written: usize },
}

impl SyncOutcome {
    /// Integer status understood by older callers: `None` for a no-op or an
    /// aborted call, `-1` when repackaging is required, else the write count.
    pub fn as_legacy_code(&self) -> Option<i64> {
        match self {
            SyncOutcome::NoAcceptedReleases | SyncOutcome::MissingArtistCredit { .. } => None,
            SyncOutcome::RepackageRequired { .. } => Some(-1),
            SyncOutcome::Written(n) => Some(*n as i64),
        }
    }

    /// Releases written by the call.
    pub fn written(&self) -> usize {
        match self {
            SyncOutcome::Written(n) | SyncOutcome::RepackageRequired { written: n } => *n,
            _ => 0,
        }
    }
}

/// A release about to be written.
struct PendingRelease {
    detail: ReleaseDetail,
    is_new: bool,
}

impl<A: CatalogApi> CatalogService<A> {
    /// Synchronize one release group into the local store.
    ///
    /// Only accepted versions are kept unless `include_extras` is set and the
    /// official-releases-only setting is off. Releases already stored are
    /// skipped unless `force_full`.
    pub async fn sync_release_group(
        &self,
        pool: &SqlitePool,
        group: &ReleaseGroup,
        include_extras: bool,
        force_full: bool,
    ) -> Result<SyncOutcome> {
        let album_id = group.id();
        let accepted_only = !include_extras || self.settings().official_releases_only;

        let releases: Vec<&CatalogRelease> = group
            .versions
            .values()
            .filter(|release| !accepted_only || release.is_accepted())
            .collect();

        if releases.is_empty() {
            debug!(
                target: "catalog::sync",
                album_id,
                "No releases with accepted status, nothing to sync"
            );
            return Ok(SyncOutcome::NoAcceptedReleases);
        }

        let pending = self.fetch_pending(pool, &releases, force_full).await?;

        if let Some(missing) = pending.iter().find(|p| p.detail.artists.is_empty()) {
            warn!(
                target: "catalog::sync",
                album_id,
                release_id = %missing.detail.id,
                "Release has no artist credit, aborting sync"
            );
            return Ok(SyncOutcome::MissingArtistCredit {
                release_id: missing.detail.id.clone(),
            });
        }

        let current: HashSet<&str> = releases.iter().map(|r| r.id.as_str()).collect();
        let release_type = group.release_type();

        let mut tx = pool
            .begin()
            .await
            .with_context(format!("starting sync of {}", album_id))?;

        let repackage = remove_stale_releases(&mut tx, album_id, &current).await?;

        for release in &pending {
            write_release(&mut tx, album_id, release_type, release).await?;
        }

        tx.commit()
            .await
            .with_context(format!("committing sync of {}", album_id))?;

        let written = pending.len();
        info!(
            target: "catalog::sync",
            album_id,
            written,
            repackage,
            "Release group synchronized"
        );

        Ok(if repackage {
            SyncOutcome::RepackageRequired { written }
        } else {
            SyncOutcome::Written(written)
        })
    }

    /// Fetch details of every release that needs writing.
    ///
    /// A release whose details can't be fetched is skipped.
    async fn fetch_pending(
        &self,
        pool: &SqlitePool,
        releases: &[&CatalogRelease],
        force_full: bool,
    ) -> Result<Vec<PendingRelease>> {
        let mut wanted = Vec::new();
        {
            let mut conn = pool.acquire().await?;
            for release in releases {
                let exists = db::release_exists(&mut conn, &release.id).await?;
                if force_full || !exists {
                    wanted.push((release.id.as_str(), !exists));
                }
            }
        }

        let mut pending = Vec::with_capacity(wanted.len());
        for (release_id, is_new) in wanted {
            match self
                .gateway
                .call("release", self.api.release(release_id))
                .await
            {
                Lookup::Found(detail) => pending.push(PendingRelease { detail, is_new }),
                Lookup::NotFound => {
                    warn!(target: "catalog::sync", release_id, "Release not found, skipping");
                }
                Lookup::TransportError(detail) => {
                    warn!(
                        target: "catalog::sync",
                        release_id,
                        error = %detail,
                        "Couldn't fetch release, skipping"
                    );
                }
            }
        }
        Ok(pending)
    }
}

/// Delete releases stored under the group that are no longer current.
///
/// Returns whether anything was removed.
async fn remove_stale_releases(
    conn: &mut SqliteConnection,
    album_id: &str,
    current: &HashSet<&str>,
) -> Result<bool> {
    let mut removed = false;
    for release_id in db::release_ids_for_album(conn, album_id).await? {
        if release_id == album_id || current.contains(release_id.as_str()) {
            continue;
        }
        info!(
            target: "catalog::sync",
            album_id,
            release_id = %release_id,
            "Removing stale release"
        );
        db::delete_release_everywhere(conn, &release_id).await?;
        removed = true;
    }
    Ok(removed)
}

/// Rewrite one release and its tracks, linking tracks to local files.
async fn write_release(
    conn: &mut SqliteConnection,
    album_id: &str,
    release_type: ReleaseType,
    release: &PendingRelease,
) -> Result<()> {
    let detail = &release.detail;
    let Some(artist) = detail.artists.first() else {
        return Ok(());
    };

    if release.is_new {
        info!(
            target: "catalog::sync",
            release_id = %detail.id,
            title = %detail.title,
            "Adding new release"
        );
    } else {
        info!(
            target: "catalog::sync",
            release_id = %detail.id,
            title = %detail.title,
            "Updating release"
        );
    }

    db::delete_release_rows(conn, &detail.id).await?;
    db::upsert_release(
        conn,
        &ReleaseRow {
            release_id: detail.id.clone(),
            artist_id: artist.id.clone(),
            artist_name: artist.name.clone(),
            album_title: detail.title.clone(),
            album_id: album_id.to_string(),
            album_asin: None,
            release_date: detail.release_date(),
            release_type: release_type.as_str().to_string(),
            release_country: normalize::country_or_unknown(detail.country.as_deref()),
            release_format: normalize::describe_formats(&detail.formats),
        },
    )
    .await?;

    let mut linked = 0;
    for track in &detail.tracks {
        let clean_name = naming::track_clean_name(&artist.name, &detail.title, &track.title);
        let have =
            db::find_have_match(conn, &clean_name, &artist.name, &detail.title, &track.title)
                .await?;

        if let Some(ref file) = have {
            db::mark_have_matched(conn, &file.location, album_id).await?;
            linked += 1;
        }

        db::upsert_release_track(
            conn,
            &TrackRow {
                track_id: track.id.clone(),
                release_id: detail.id.clone(),
                artist_id: artist.id.clone(),
                artist_name: artist.name.clone(),
                album_title: detail.title.clone(),
                album_id: album_id.to_string(),
                track_title: track.title.clone(),
                track_duration: track.duration.map(i64::from),
                track_number: i64::from(track.number),
                clean_name,
                location: have.as_ref().map(|f| f.location.clone()),
                bit_rate: have.as_ref().and_then(|f| f.bit_rate),
                format: have.and_then(|f| f.format),
            },
        )
        .await?;
    }

    debug!(
        target: "catalog::sync",
        release_id = %detail.id,
        tracks = detail.tracks.len(),
        linked,
        "Release tracks written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::{CatalogEntry, MasterRelease};
    use crate::catalog::service::test_support::mock_service;
    use crate::catalog::traits::mocks::{MockCatalog, accepted, release_detail, version};
    use crate::test_utils::{mock_have_file, mock_release_row, temp_db};

    fn group(id: &str, versions: Vec<CatalogRelease>) -> ReleaseGroup {
        ReleaseGroup {
            master: CatalogEntry::Master(MasterRelease {
                id: id.to_string(),
                title: "Album".to_string(),
                main_release_id: versions.first().map(|v| v.id.clone()).unwrap_or_default(),
                url: None,
                released: None,
            }),
            main_release_id: versions.first().map(|v| v.id.clone()).unwrap_or_default(),
            versions: versions.into_iter().map(|v| (v.id.clone(), v)).collect(),
        }
    }

    fn mock_with_releases(ids: &[&str]) -> MockCatalog {
        let mut mock = MockCatalog::new();
        for id in ids {
            mock.releases.insert(
                id.to_string(),
                release_detail(id, "Album", "Band", &["One", "Two"]),
            );
        }
        mock
    }

    #[test]
    fn test_legacy_codes() {
        assert_eq!(SyncOutcome::NoAcceptedReleases.as_legacy_code(), None);
        assert_eq!(
            SyncOutcome::MissingArtistCredit {
                release_id: "1".into()
            }
            .as_legacy_code(),
            None
        );
        assert_eq!(SyncOutcome::Written(3).as_legacy_code(), Some(3));
        assert_eq!(
            SyncOutcome::RepackageRequired { written: 3 }.as_legacy_code(),
            Some(-1)
        );
        assert_eq!(SyncOutcome::RepackageRequired { written: 3 }.written(), 3);
    }

    #[tokio::test]
    async fn test_master_with_rejected_version() {
        let (pool, _dir) = temp_db().await;
        let service = mock_service(mock_with_releases(&["V1", "V2"]));
        let group = group(
            "M",
            vec![accepted("V1"), version("V2", "Rejected", "CD, Album")],
        );

        let outcome = service
            .sync_release_group(&pool, &group, false, false)
            .await
            .unwrap();

        assert_eq!(outcome.as_legacy_code(), Some(1));
        let mut conn = pool.acquire().await.unwrap();
        let row = db::get_release(&mut conn, "V1").await.unwrap().unwrap();
        assert_eq!(row.album_id, "M");
        assert_eq!(row.artist_name, "Band");
        assert_eq!(row.release_type, "Album");
        assert_eq!(row.release_country, "UK");
        assert_eq!(row.release_format, "(LP, Album)");
        assert_eq!(row.release_date.as_deref(), Some("1969-09-26"));
        assert!(row.album_asin.is_none());
        assert!(!db::release_exists(&mut conn, "V2").await.unwrap());

        let tracks = db::get_release_tracks(&mut conn, "V1").await.unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].track_number, 1);
        assert_eq!(tracks[0].track_duration, Some(180));
        assert_eq!(tracks[0].clean_name, "band album one");
        assert_eq!(tracks[0].track_id, normalize::track_id("One", "V1"));
    }

    #[tokio::test]
    async fn test_second_sync_writes_nothing() {
        let (pool, _dir) = temp_db().await;
        let service = mock_service(mock_with_releases(&["V1"]));
        let group = group("M", vec![accepted("V1")]);

        let first = service
            .sync_release_group(&pool, &group, false, false)
            .await
            .unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let row_before = db::get_release(&mut conn, "V1").await.unwrap();
        let tracks_before = db::get_release_tracks(&mut conn, "V1").await.unwrap();
        drop(conn);

        let second = service
            .sync_release_group(&pool, &group, false, false)
            .await
            .unwrap();

        assert_eq!(first, SyncOutcome::Written(1));
        assert_eq!(second, SyncOutcome::Written(0));
        assert_eq!(service.api.release_calls(), 1);

        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(db::get_release(&mut conn, "V1").await.unwrap(), row_before);
        assert_eq!(
            db::get_release_tracks(&mut conn, "V1").await.unwrap(),
            tracks_before
        );
    }

    #[tokio::test]
    async fn test_force_full_rewrites() {
        let (pool, _dir) = temp_db().await;
        let service = mock_service(mock_with_releases(&["V1"]));
        let group = group("M", vec![accepted("V1")]);

        service
            .sync_release_group(&pool, &group, false, false)
            .await
            .unwrap();
        let outcome = service
            .sync_release_group(&pool, &group, false, true)
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Written(1));
        assert_eq!(service.api.release_calls(), 2);
    }

    #[tokio::test]
    async fn test_stale_release_removed_everywhere() {
        let (pool, _dir) = temp_db().await;
        {
            let mut conn = pool.acquire().await.unwrap();
            db::upsert_release(&mut conn, &mock_release_row("OLD", "M"))
                .await
                .unwrap();
            sqlx::query("INSERT INTO albums (AlbumID, ReleaseID) VALUES ('M', 'OLD')")
                .execute(&mut *conn)
                .await
                .unwrap();
            sqlx::query("INSERT INTO tracks (TrackID, ReleaseID) VALUES ('t', 'OLD')")
                .execute(&mut *conn)
                .await
                .unwrap();
            sqlx::query("INSERT INTO alltracks (TrackID, ReleaseID) VALUES ('t', 'OLD')")
                .execute(&mut *conn)
                .await
                .unwrap();
        }

        let service = mock_service(mock_with_releases(&["V1"]));
        let outcome = service
            .sync_release_group(&pool, &group("M", vec![accepted("V1")]), false, false)
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::RepackageRequired { written: 1 });
        assert_eq!(outcome.as_legacy_code(), Some(-1));

        let mut conn = pool.acquire().await.unwrap();
        for table in ["albums", "tracks", "allalbums", "alltracks"] {
            assert_eq!(
                db::count_release_rows(&mut conn, table, "OLD").await.unwrap(),
                0,
                "{} still references OLD",
                table
            );
        }
        assert!(db::release_exists(&mut conn, "V1").await.unwrap());
    }

    #[tokio::test]
    async fn test_row_keyed_by_group_id_is_kept() {
        let (pool, _dir) = temp_db().await;
        {
            let mut conn = pool.acquire().await.unwrap();
            db::upsert_release(&mut conn, &mock_release_row("M", "M"))
                .await
                .unwrap();
        }

        let service = mock_service(mock_with_releases(&["V1"]));
        let outcome = service
            .sync_release_group(&pool, &group("M", vec![accepted("V1")]), false, false)
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Written(1));
        let mut conn = pool.acquire().await.unwrap();
        assert!(db::release_exists(&mut conn, "M").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_artist_credit_writes_nothing() {
        let (pool, _dir) = temp_db().await;
        {
            let mut conn = pool.acquire().await.unwrap();
            db::upsert_release(&mut conn, &mock_release_row("OLD", "M"))
                .await
                .unwrap();
        }

        let mut mock = mock_with_releases(&["V1"]);
        let mut uncredited = release_detail("V2", "Album", "Band", &["One"]);
        uncredited.artists.clear();
        mock.releases.insert("V2".to_string(), uncredited);

        let service = mock_service(mock);
        let outcome = service
            .sync_release_group(
                &pool,
                &group("M", vec![accepted("V1"), accepted("V2")]),
                false,
                false,
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::MissingArtistCredit {
                release_id: "V2".to_string()
            }
        );
        let mut conn = pool.acquire().await.unwrap();
        assert!(!db::release_exists(&mut conn, "V1").await.unwrap());
        assert!(db::release_exists(&mut conn, "OLD").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_group_is_noop() {
        let (pool, _dir) = temp_db().await;
        let service = mock_service(MockCatalog::new());

        let outcome = service
            .sync_release_group(&pool, &group("M", vec![]), true, false)
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::NoAcceptedReleases);
        assert_eq!(service.api.release_calls(), 0);
    }

    #[tokio::test]
    async fn test_extras_respect_official_only() {
        let (pool, _dir) = temp_db().await;
        let group = group(
            "M",
            vec![accepted("V1"), version("V2", "Draft", "CD, Single")],
        );

        let service = mock_service(mock_with_releases(&["V1", "V2"]));
        let settings = service.config_handle();
        settings.write().official_releases_only = true;
        let outcome = service
            .sync_release_group(&pool, &group, true, false)
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::Written(1));

        settings.write().official_releases_only = false;
        let outcome = service
            .sync_release_group(&pool, &group, true, false)
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::Written(1));

        let mut conn = pool.acquire().await.unwrap();
        assert!(db::release_exists(&mut conn, "V2").await.unwrap());
    }

    #[tokio::test]
    async fn test_unfetchable_release_is_skipped() {
        let (pool, _dir) = temp_db().await;
        let service = mock_service(mock_with_releases(&["V1"]));

        let outcome = service
            .sync_release_group(
                &pool,
                &group("M", vec![accepted("V1"), accepted("GONE")]),
                false,
                false,
            )
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Written(1));
        let mut conn = pool.acquire().await.unwrap();
        assert!(!db::release_exists(&mut conn, "GONE").await.unwrap());
    }

    #[tokio::test]
    async fn test_tracks_linked_to_local_files() {
        let (pool, _dir) = temp_db().await;
        {
            let mut conn = pool.acquire().await.unwrap();
            // Exact clean-name match
            db::insert_have(&mut conn, &mock_have_file("/m/one.flac", "Band", "Album", "One"))
                .await
                .unwrap();
            // Only the raw fields match, ignoring case
            let loose = db::HaveFile {
                clean_name: "unrelated".to_string(),
                ..mock_have_file("/m/two.mp3", "BAND", "album", "TWO")
            };
            db::insert_have(&mut conn, &loose).await.unwrap();
        }

        let service = mock_service(mock_with_releases(&["V1"]));
        service
            .sync_release_group(&pool, &group("M", vec![accepted("V1")]), false, false)
            .await
            .unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let tracks = db::get_release_tracks(&mut conn, "V1").await.unwrap();
        assert_eq!(tracks[0].location.as_deref(), Some("/m/one.flac"));
        assert_eq!(tracks[0].bit_rate, Some(320));
        assert_eq!(tracks[0].format.as_deref(), Some("FLAC"));
        assert_eq!(tracks[1].location.as_deref(), Some("/m/two.mp3"));

        assert_eq!(
            db::have_matched(&mut conn, "/m/one.flac").await.unwrap(),
            Some("M".to_string())
        );
        assert_eq!(
            db::have_matched(&mut conn, "/m/two.mp3").await.unwrap(),
            Some("M".to_string())
        );
    }

    #[tokio::test]
    async fn test_singleton_group_syncs_its_release() {
        let (pool, _dir) = temp_db().await;
        let service = mock_service(mock_with_releases(&["42"]));
        let group = ReleaseGroup::singleton(accepted("42"));

        let outcome = service
            .sync_release_group(&pool, &group, false, false)
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::Written(1));
        let mut conn = pool.acquire().await.unwrap();
        let row = db::get_release(&mut conn, "42").await.unwrap().unwrap();
        assert_eq!(row.album_id, "42");
    }
}
