//! Catalog search and the current listing snapshot

use crate::api::{ApiResult, CatalogApi};
use crate::cover::CoverCache;
use crate::types::{BookListing, SearchFilters};
use parking_lot::RwLock;
use std::sync::Arc;

/// Searches the catalog and keeps the latest listing.
///
/// Each successful search replaces the listing wholesale and schedules cover
/// lookups for titles the cover cache has not seen yet.
pub struct CatalogClient {
    api: Arc<dyn CatalogApi>,
    covers: Arc<CoverCache>,
    listing: RwLock<Arc<Vec<BookListing>>>,
    filters: RwLock<SearchFilters>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("books", &self.listing.read().len())
            .field("filters", &*self.filters.read())
            .finish()
    }
}

impl CatalogClient {
    pub fn new(api: Arc<dyn CatalogApi>, covers: Arc<CoverCache>) -> Self {
        Self {
            api,
            covers,
            listing: RwLock::new(Arc::new(Vec::new())),
            filters: RwLock::new(SearchFilters::default()),
        }
    }

    pub fn covers(&self) -> &Arc<CoverCache> {
        &self.covers
    }

    /// Run a search and make its result the current listing
    pub async fn search(&self, filters: SearchFilters) -> ApiResult<Arc<Vec<BookListing>>> {
        let books = Arc::new(self.api.search_books(&filters).await?);
        tracing::debug!("Search returned {} books", books.len());

        // A failed search keeps both the old listing and the filters behind it
        *self.listing.write() = Arc::clone(&books);
        *self.filters.write() = filters;

        let scheduled = books
            .iter()
            .filter(|book| self.covers.schedule(&book.title))
            .count();
        if scheduled > 0 {
            tracing::debug!("Scheduled {} cover lookups", scheduled);
        }

        Ok(books)
    }

    /// Re-run the last successful search
    pub async fn refresh(&self) -> ApiResult<Arc<Vec<BookListing>>> {
        let filters = self.last_filters();
        self.search(filters).await
    }

    /// The listing from the most recent successful search
    pub fn listing(&self) -> Arc<Vec<BookListing>> {
        Arc::clone(&self.listing.read())
    }

    pub fn last_filters(&self) -> SearchFilters {
        self.filters.read().clone()
    }
}
