//! The remote catalog API, as seen by this client

mod http;

pub use http::HttpCatalogApi;

use crate::error::ApiError;
use crate::types::{
    BookListing, Credentials, Library, LoginResponse, MemberProfile, PasswordChange,
    RegistrationForm, Reservation, SearchFilters, UserAccount,
};
use async_trait::async_trait;

/// Result type for catalog API calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Calls against the catalog, reservation and authentication endpoints.
///
/// Methods taking a `token` send it as a bearer credential.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Search the catalog. Only non-blank filters are sent.
    async fn search_books(&self, filters: &SearchFilters) -> ApiResult<Vec<BookListing>>;

    /// The caller's current reservations
    async fn my_reservations(&self, token: &str) -> ApiResult<Vec<Reservation>>;

    /// Reserve a copy for `lending_period` days, returned to `return_library_id`
    async fn reserve_copy(
        &self,
        token: &str,
        copy_id: i64,
        return_library_id: i64,
        lending_period: u32,
    ) -> ApiResult<()>;

    async fn list_libraries(&self) -> ApiResult<Vec<Library>>;

    async fn current_member(&self, token: &str) -> ApiResult<MemberProfile>;

    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse>;

    async fn register(&self, form: &RegistrationForm) -> ApiResult<()>;

    async fn forgot_password(&self, email: &str) -> ApiResult<()>;

    async fn validate_reset_token(&self, token: &str) -> ApiResult<()>;

    async fn reset_password(&self, change: &PasswordChange) -> ApiResult<()>;

    async fn set_password(&self, change: &PasswordChange) -> ApiResult<()>;

    async fn list_users(&self, token: &str) -> ApiResult<Vec<UserAccount>>;

    async fn approve_user(&self, token: &str, user_id: i64) -> ApiResult<()>;
}

impl std::fmt::Debug for dyn CatalogApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn CatalogApi")
    }
}
