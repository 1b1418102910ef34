//! Release-group reconciliation.
//!
//! An artist discography mixes masters (aggregates with a version list) and
//! plain releases. Masters become release groups owning their versions;
//! accepted releases that no master claimed become singleton groups. Every
//! release id ends up in exactly one group.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info};

use crate::catalog::domain::{
    ArtistDiscography, CatalogEntry, CatalogRelease, Lookup, ReleaseGroup, Track,
};
use crate::catalog::service::CatalogService;
use crate::catalog::traits::CatalogApi;

/// Release date and tracks of a group's main release.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridRelease {
    pub release_date: Option<String>,
    pub tracks: Vec<Track>,
}

impl<A: CatalogApi> CatalogService<A> {
    /// Fetch an artist and reconcile their whole discography.
    pub async fn get_artist(&self, artist_id: &str) -> Lookup<ArtistDiscography> {
        info!(target: "catalog::reconcile", artist_id, "Retrieving artist info");

        let profile = match self.gateway.call("artist", self.api.artist(artist_id)).await {
            Lookup::Found(profile) => profile,
            Lookup::NotFound => {
                info!(target: "catalog::reconcile", artist_id, "Couldn't find artist");
                return Lookup::NotFound;
            }
            Lookup::TransportError(detail) => return Lookup::TransportError(detail),
        };

        let per_page = self.settings().per_page;
        let entries = self
            .gateway
            .paginate("artist releases", None, |page| {
                self.api.artist_releases(artist_id, page, per_page)
            })
            .await;

        let entries = match entries {
            Lookup::Found(entries) => entries,
            Lookup::NotFound => Vec::new(),
            Lookup::TransportError(detail) => return Lookup::TransportError(detail),
        };

        self.reconcile(entries).await.map(|release_groups| {
            debug!(
                target: "catalog::reconcile",
                artist = %profile.name,
                groups = release_groups.len(),
                "Discography reconciled"
            );
            ArtistDiscography {
                artist_name: profile.name,
                release_groups,
            }
        })
    }

    /// Fetch every master's versions and assemble the release groups.
    pub async fn reconcile(&self, entries: Vec<CatalogEntry>) -> Lookup<Vec<ReleaseGroup>> {
        let per_page = self.settings().per_page;
        let mut versions_by_master = HashMap::new();

        for entry in &entries {
            let CatalogEntry::Master(master) = entry else {
                continue;
            };
            if versions_by_master.contains_key(&master.id) {
                continue;
            }

            let versions = self
                .gateway
                .paginate("master versions", None, |page| {
                    self.api.master_versions(&master.id, page, per_page)
                })
                .await;

            let versions = match versions {
                Lookup::Found(versions) => versions,
                Lookup::NotFound => Vec::new(),
                Lookup::TransportError(detail) => return Lookup::TransportError(detail),
            };
            versions_by_master.insert(master.id.clone(), versions);
        }

        Lookup::Found(assemble_release_groups(entries, versions_by_master))
    }

    /// Release date and tracks of the group's main release.
    pub async fn build_hybrid_release(&self, group: &ReleaseGroup) -> Lookup<HybridRelease> {
        let main_release_id = group.main_release_id.as_str();
        self.gateway
            .call("main release", self.api.release(main_release_id))
            .await
            .map(|detail| HybridRelease {
                release_date: detail.release_date(),
                tracks: detail.tracks,
            })
    }
}

/// Group a discography listing given each master's versions.
///
/// Masters come first, in listing order. A version already owned by an
/// earlier group isn't added again. Accepted plain releases that no master
/// owns follow as singleton groups.
pub fn assemble_release_groups(
    entries: Vec<CatalogEntry>,
    mut versions_by_master: HashMap<String, Vec<CatalogRelease>>,
) -> Vec<ReleaseGroup> {
    let mut groups = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut seen_masters: HashSet<String> = HashSet::new();
    let mut plain = Vec::new();

    for entry in entries {
        match entry {
            CatalogEntry::Master(master) => {
                if !seen_masters.insert(master.id.clone()) {
                    continue;
                }

                let mut versions = BTreeMap::new();
                for version in versions_by_master.remove(&master.id).unwrap_or_default() {
                    if seen.insert(version.id.clone()) {
                        versions.insert(version.id.clone(), version);
                    }
                }

                groups.push(ReleaseGroup {
                    main_release_id: master.main_release_id.clone(),
                    master: CatalogEntry::Master(master),
                    versions,
                });
            }
            CatalogEntry::Release(release) => plain.push(release),
        }
    }

    for release in plain {
        if release.is_accepted() && seen.insert(release.id.clone()) {
            groups.push(ReleaseGroup::singleton(release));
        }
    }

    groups
}
