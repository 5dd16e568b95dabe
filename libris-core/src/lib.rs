//! Libris Core Library
//!
//! Client side of a library catalog: book search, reservations with a
//! client-enforced quota, lazily enriched cover images, and the account
//! flows around them. Every data operation is a call to the remote catalog
//! API; the only persisted state is the session token and role.

pub mod access;
pub mod account;
pub mod api;
pub mod catalog;
pub mod client;
pub mod config;
pub mod cover;
pub mod error;
pub mod reservation;
pub mod session;
pub mod storage;
pub mod types;

pub use access::{landing_area, Area};
pub use account::AccountService;
pub use api::{CatalogApi, HttpCatalogApi};
pub use catalog::CatalogClient;
pub use client::LibrisClient;
pub use config::ClientConfig;
pub use cover::{CoverArt, CoverCache, CoverEntry, CoverLookup, CoverResolved};
pub use error::{
    ApiError, ConfigError, EnrichmentError, LibrisError, Result, StorageError, ValidationError,
};
pub use reservation::{DialogState, ReservationDialog, ReservationManager};
pub use session::Session;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::{
    BookListing, BookStatus, Library, MemberProfile, RegistrationForm, Reservation,
    ReservationQuota, ReservationStatus, Role, SearchFilters, UserAccount,
};
