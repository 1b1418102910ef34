//! Catalog service - owns the remote clients and the shared rate gateway
//!
//! This is the high-level entry point. Its operations are spread over the
//! sibling modules:
//! - `search`: artist/release search and disambiguation
//! - `reconcile`: artist discographies grouped into release groups
//! - `sync`: persisting release groups to the local store
//! - `metadata`: secondary MusicBrainz lookups

use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalog::{
    discogs::DiscogsClient,
    domain::CatalogError,
    gateway::RateGateway,
    musicbrainz::MusicBrainzClient,
    traits::CatalogApi,
};
use crate::config::Config;

/// Settings read by the catalog operations at call time
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Only keep accepted releases, even when extras are requested
    pub official_releases_only: bool,
    /// Page size for paginated listings
    pub per_page: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            official_releases_only: false,
            per_page: 100,
        }
    }
}

/// Service for catalog lookups and release-group synchronization
pub struct CatalogService<A: CatalogApi = DiscogsClient> {
    pub(crate) api: A,
    pub(crate) musicbrainz: MusicBrainzClient,
    pub(crate) gateway: Arc<RateGateway>,
    pub(crate) config: Arc<RwLock<CatalogConfig>>,
}

impl<A: CatalogApi> CatalogService<A> {
    /// Assemble a service from its collaborators.
    ///
    /// Every service sharing `gateway` is serialized against the others.
    pub fn new(
        api: A,
        musicbrainz: MusicBrainzClient,
        gateway: Arc<RateGateway>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            api,
            musicbrainz,
            gateway,
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub fn gateway(&self) -> &Arc<RateGateway> {
        &self.gateway
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> CatalogConfig {
        self.config.read().clone()
    }

    /// Shared handle to the settings. Changes apply to the next call.
    pub fn config_handle(&self) -> Arc<RwLock<CatalogConfig>> {
        Arc::clone(&self.config)
    }
}

impl CatalogService<DiscogsClient> {
    /// Build the production service from the application config.
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        let catalog = &config.catalog;
        let gateway = Arc::new(RateGateway::new(catalog.minimum_delta(), catalog.snooze()));

        let discogs = DiscogsClient::with_base_url(
            &catalog.discogs_base_url,
            config.credentials.discogs_token.clone(),
        )?;
        let musicbrainz = MusicBrainzClient::with_base_url(&catalog.musicbrainz_base_url)?;

        Ok(Self::new(
            discogs,
            musicbrainz,
            gateway,
            CatalogConfig {
                official_releases_only: catalog.official_releases_only,
                per_page: catalog.per_page,
            },
        ))
    }
}
