//! Wiring of the session, API, cover cache and workflows

use crate::account::AccountService;
use crate::api::{CatalogApi, HttpCatalogApi};
use crate::catalog::CatalogClient;
use crate::config::ClientConfig;
use crate::cover::{CoverCache, CoverLookup, VolumeSearchLookup};
use crate::error::{ConfigError, Result};
use crate::reservation::ReservationManager;
use crate::session::Session;
use crate::storage::FileStore;
use std::sync::Arc;

/// Everything a front end needs, sharing one session
#[derive(Debug)]
pub struct LibrisClient {
    session: Arc<Session>,
    catalog: Arc<CatalogClient>,
    reservations: Arc<ReservationManager>,
    accounts: AccountService,
}

impl LibrisClient {
    /// Restore the persisted session and connect to the configured APIs
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let store = Arc::new(FileStore::new(&config.session_path));
        let session = Arc::new(Session::restore(store).await?);
        let api = Arc::new(HttpCatalogApi::new(http.clone(), &config.api_base_url));
        let lookup = Arc::new(VolumeSearchLookup::new(http, &config.cover_lookup_url));

        tracing::debug!(
            "Connected to {} (signed in: {})",
            config.api_base_url,
            session.is_signed_in()
        );
        Ok(Self::from_parts(
            api,
            lookup,
            session,
            config.max_active_reservations,
        ))
    }

    /// Assemble from existing parts, e.g. in-memory fakes
    pub fn from_parts(
        api: Arc<dyn CatalogApi>,
        lookup: Arc<dyn CoverLookup>,
        session: Arc<Session>,
        max_active_reservations: usize,
    ) -> Self {
        let covers = Arc::new(CoverCache::new(lookup));
        let catalog = Arc::new(CatalogClient::new(Arc::clone(&api), covers));
        let reservations = Arc::new(ReservationManager::new(
            Arc::clone(&api),
            Arc::clone(&session),
            Arc::clone(&catalog),
            max_active_reservations,
        ));
        let accounts = AccountService::new(api, Arc::clone(&session));

        Self {
            session,
            catalog,
            reservations,
            accounts,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn catalog(&self) -> &Arc<CatalogClient> {
        &self.catalog
    }

    pub fn covers(&self) -> &Arc<CoverCache> {
        self.catalog.covers()
    }

    pub fn reservations(&self) -> &Arc<ReservationManager> {
        &self.reservations
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }
}
