//! Reservation eligibility and the reserve workflow

mod dialog;

pub use dialog::{DialogState, DraftReservation, ReservationDialog, RESERVE_FALLBACK_MESSAGE};

use crate::access::Area;
use crate::api::{ApiResult, CatalogApi};
use crate::catalog::CatalogClient;
use crate::error::{Result, ValidationError};
use crate::session::Session;
use crate::types::{BookListing, Library, Reservation, ReservationQuota, Role};
use parking_lot::RwLock;
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Allowed lending periods, in days
pub const LENDING_PERIOD_DAYS: RangeInclusive<u32> = 1..=28;

/// Lending period a new reservation dialog starts with
pub const DEFAULT_LENDING_PERIOD: u32 = 7;

/// Enforces the client-side reservation rules and submits reservations
pub struct ReservationManager {
    api: Arc<dyn CatalogApi>,
    session: Arc<Session>,
    catalog: Arc<CatalogClient>,
    max_active: usize,
    libraries: RwLock<Option<Arc<Vec<Library>>>>,
    home_library: RwLock<Option<i64>>,
    active: RwLock<Arc<Vec<Reservation>>>,
}

impl std::fmt::Debug for ReservationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationManager")
            .field("quota", &self.quota())
            .field("home_library", &self.home_library())
            .finish()
    }
}

impl ReservationManager {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        session: Arc<Session>,
        catalog: Arc<CatalogClient>,
        max_active: usize,
    ) -> Self {
        Self {
            api,
            session,
            catalog,
            max_active,
            libraries: RwLock::new(None),
            home_library: RwLock::new(None),
            active: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Fetch libraries, home library and active reservations.
    ///
    /// The library list is fetched once per manager. Member data is skipped
    /// when signed out.
    pub async fn load(&self) -> ApiResult<()> {
        let (libraries, member) = tokio::join!(self.ensure_libraries(), self.load_member());
        libraries?;
        member
    }

    async fn ensure_libraries(&self) -> ApiResult<Arc<Vec<Library>>> {
        let cached = self.libraries.read().clone();
        if let Some(libraries) = cached {
            return Ok(libraries);
        }
        let libraries = Arc::new(self.api.list_libraries().await?);
        tracing::debug!("Loaded {} libraries", libraries.len());
        *self.libraries.write() = Some(Arc::clone(&libraries));
        Ok(libraries)
    }

    async fn load_member(&self) -> ApiResult<()> {
        let Some(token) = self.session.token() else {
            return Ok(());
        };
        let (profile, active) = tokio::join!(
            self.api.current_member(&token),
            self.refresh_active()
        );
        *self.home_library.write() = profile?.library_id;
        active.map(|_| ())
    }

    /// Re-fetch the caller's reservations. Signed out means none.
    pub async fn refresh_active(&self) -> ApiResult<Arc<Vec<Reservation>>> {
        let reservations = match self.session.token() {
            Some(token) => Arc::new(self.api.my_reservations(&token).await?),
            None => Arc::new(Vec::new()),
        };
        *self.active.write() = Arc::clone(&reservations);
        Ok(reservations)
    }

    /// Reservations from the last refresh, with their covers scheduled.
    ///
    /// Outside a tokio runtime the covers are left unscheduled.
    pub fn active_reservations(&self) -> Arc<Vec<Reservation>> {
        let reservations = Arc::clone(&self.active.read());
        for reservation in reservations.iter() {
            self.catalog.covers().schedule(&reservation.book_title);
        }
        reservations
    }

    /// Every reservation the server listed for the member, whatever its status
    pub fn active_count(&self) -> usize {
        self.active.read().len()
    }

    pub fn quota(&self) -> ReservationQuota {
        ReservationQuota {
            active: self.active_count(),
            max: self.max_active,
        }
    }

    /// Libraries loaded by [`ReservationManager::load`]; empty before that
    pub fn libraries(&self) -> Arc<Vec<Library>> {
        self.libraries.read().clone().unwrap_or_default()
    }

    /// The member's home library, the default place of return
    pub fn home_library(&self) -> Option<i64> {
        *self.home_library.read()
    }

    /// Whether the reserve action should be offered for `book`
    pub fn can_reserve(&self, book: &BookListing) -> bool {
        self.session.has_role(&Role::Member)
            && book.is_available()
            && book.book_copy_id.is_some()
            && !self.quota().is_exhausted()
    }

    /// Local checks, in order: quota, lending period, return library
    pub fn validate(
        &self,
        lending_period: u32,
        return_library_id: Option<i64>,
    ) -> std::result::Result<i64, ValidationError> {
        if self.quota().is_exhausted() {
            return Err(ValidationError::QuotaExceeded {
                max: self.max_active,
            });
        }
        if !LENDING_PERIOD_DAYS.contains(&lending_period) {
            return Err(ValidationError::InvalidPeriod {
                days: lending_period,
            });
        }
        let libraries = self.libraries();
        match return_library_id {
            Some(id) if libraries.iter().any(|library| library.id == id) => Ok(id),
            _ => Err(ValidationError::MissingReturnLibrary),
        }
    }

    /// Reserve `copy_id` for `lending_period` days, returned to `return_library_id`.
    ///
    /// Only members may reserve; the session is checked after the local rules.
    /// On success the listing and the active reservations are refreshed
    /// concurrently; refresh failures are logged, not returned.
    pub async fn reserve(
        &self,
        copy_id: i64,
        lending_period: u32,
        return_library_id: Option<i64>,
    ) -> Result<()> {
        let return_library_id = self.validate(lending_period, return_library_id)?;
        let token = self.session.require(Area::MyReservations)?;

        self.api
            .reserve_copy(&token, copy_id, return_library_id, lending_period)
            .await?;
        tracing::info!(
            "Reserved copy {} for {} days, returning to library {}",
            copy_id,
            lending_period,
            return_library_id
        );

        let (listing, active) = tokio::join!(self.catalog.refresh(), self.refresh_active());
        if let Err(e) = listing {
            tracing::warn!("Failed to refresh listing after reservation: {}", e);
        }
        if let Err(e) = active {
            tracing::warn!("Failed to refresh reservations after reservation: {}", e);
        }
        Ok(())
    }
}
