//! reqwest implementation of [`CatalogApi`]

use super::{ApiResult, CatalogApi};
use crate::error::ApiError;
use crate::types::{
    BookListing, Credentials, Library, LoginResponse, MemberProfile, PasswordChange,
    RegistrationForm, Reservation, SearchFilters, UserAccount,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

mod routes {
    pub const SEARCH: &str = "/books/search";
    pub const MY_RESERVATIONS: &str = "/books/my-reservations";
    pub const LIBRARIES: &str = "/api/auth/libraries";
    pub const ME: &str = "/users/me";
    pub const LOGIN: &str = "/api/Auth/login";
    pub const REGISTER: &str = "/api/Auth/register";
    pub const FORGOT_PASSWORD: &str = "/api/Auth/forgot-password";
    pub const VALIDATE_RESET_TOKEN: &str = "/api/Auth/validate-reset-token";
    pub const RESET_PASSWORD: &str = "/api/Auth/reset-password";
    pub const SET_PASSWORD: &str = "/api/Auth/set-password";
    pub const USERS: &str = "/api/Auth/users";

    pub fn reserve(copy_id: i64) -> String {
        format!("/books/{}/reserve", copy_id)
    }

    pub fn approve(user_id: i64) -> String {
        format!("/api/Auth/approve/{}", user_id)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReserveRequest {
    return_library_id: i64,
    lending_period: u32,
}

#[derive(Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

/// Catalog API client over HTTP + JSON
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    client: Client,
    base_url: String,
}

impl HttpCatalogApi {
    /// Create a client for `base_url` using an existing reqwest client
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::debug!("Catalog API client for {}", base_url);
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    /// Send and map non-success statuses to [`ApiError`]
    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = server_message(&body);
        tracing::debug!("Request failed with status {}: {:?}", status, message);

        if status == StatusCode::UNAUTHORIZED && message.is_none() {
            return Err(ApiError::Unauthorized);
        }
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_empty(&self, request: RequestBuilder) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }
}

/// Error bodies are plain text or a JSON string; blank means none
fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<String>(trimmed) {
        Ok(text) if text.trim().is_empty() => None,
        Ok(text) => Some(text),
        Err(_) => Some(trimmed.to_string()),
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn search_books(&self, filters: &SearchFilters) -> ApiResult<Vec<BookListing>> {
        let pairs = filters.query_pairs();
        let mut request = self.get(routes::SEARCH);
        if !pairs.is_empty() {
            request = request.query(&pairs);
        }
        self.send_json(request).await
    }

    async fn my_reservations(&self, token: &str) -> ApiResult<Vec<Reservation>> {
        self.send_json(self.get(routes::MY_RESERVATIONS).bearer_auth(token))
            .await
    }

    async fn reserve_copy(
        &self,
        token: &str,
        copy_id: i64,
        return_library_id: i64,
        lending_period: u32,
    ) -> ApiResult<()> {
        let body = ReserveRequest {
            return_library_id,
            lending_period,
        };
        self.send_empty(
            self.post(&routes::reserve(copy_id))
                .bearer_auth(token)
                .json(&body),
        )
        .await
    }

    async fn list_libraries(&self) -> ApiResult<Vec<Library>> {
        self.send_json(self.get(routes::LIBRARIES)).await
    }

    async fn current_member(&self, token: &str) -> ApiResult<MemberProfile> {
        self.send_json(self.get(routes::ME).bearer_auth(token)).await
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        self.send_json(self.post(routes::LOGIN).json(credentials))
            .await
    }

    async fn register(&self, form: &RegistrationForm) -> ApiResult<()> {
        self.send_empty(self.post(routes::REGISTER).json(form)).await
    }

    async fn forgot_password(&self, email: &str) -> ApiResult<()> {
        self.send_empty(
            self.post(routes::FORGOT_PASSWORD)
                .json(&ForgotPasswordRequest { email }),
        )
        .await
    }

    async fn validate_reset_token(&self, token: &str) -> ApiResult<()> {
        self.send_empty(
            self.get(routes::VALIDATE_RESET_TOKEN)
                .query(&[("token", token)]),
        )
        .await
    }

    async fn reset_password(&self, change: &PasswordChange) -> ApiResult<()> {
        self.send_empty(self.post(routes::RESET_PASSWORD).json(change))
            .await
    }

    async fn set_password(&self, change: &PasswordChange) -> ApiResult<()> {
        self.send_empty(self.post(routes::SET_PASSWORD).json(change))
            .await
    }

    async fn list_users(&self, token: &str) -> ApiResult<Vec<UserAccount>> {
        self.send_json(self.get(routes::USERS).bearer_auth(token))
            .await
    }

    async fn approve_user(&self, token: &str, user_id: i64) -> ApiResult<()> {
        self.send_empty(
            self.post(&routes::approve(user_id))
                .bearer_auth(token)
                .json(&serde_json::json!({})),
        )
        .await
    }
}
