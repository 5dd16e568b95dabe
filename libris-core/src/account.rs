//! Sign-in, registration, password flows and librarian approvals

use crate::access::Area;
use crate::api::CatalogApi;
use crate::error::{ApiError, Result, ValidationError};
use crate::session::Session;
use crate::types::{Credentials, PasswordChange, RegistrationForm, Role, UserAccount};
use std::sync::Arc;

pub const LOGIN_FALLBACK_MESSAGE: &str = "Login failed. Please try again.";
pub const REGISTER_FALLBACK_MESSAGE: &str = "Registration failed. Try again.";
pub const RESET_FALLBACK_MESSAGE: &str = "Password reset failed. Please try again.";
pub const SET_PASSWORD_FALLBACK_MESSAGE: &str = "Error setting password.";
pub const FORGOT_FALLBACK_MESSAGE: &str = "Error. Please try again.";

/// Account operations against the authentication endpoints
#[derive(Debug)]
pub struct AccountService {
    api: Arc<dyn CatalogApi>,
    session: Arc<Session>,
}

impl AccountService {
    pub fn new(api: Arc<dyn CatalogApi>, session: Arc<Session>) -> Self {
        Self { api, session }
    }

    /// Sign in and persist the issued token and role
    pub async fn login(&self, email: &str, password: &str) -> Result<Role> {
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&credentials).await?;
        self.session
            .login(response.token, response.user.role.clone())
            .await?;
        tracing::info!("Signed in as {}", response.user.role);
        Ok(response.user.role)
    }

    pub async fn logout(&self) -> Result<()> {
        self.session.logout().await
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<()> {
        if let Some(field) = form.missing_field() {
            return Err(ValidationError::MissingField(field).into());
        }
        self.api.register(form).await?;
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        if email.trim().is_empty() {
            return Err(ValidationError::MissingField("email").into());
        }
        self.api.forgot_password(email.trim()).await?;
        Ok(())
    }

    /// `false` when the server rejects the reset token
    pub async fn reset_token_is_valid(&self, token: &str) -> Result<bool> {
        if token.is_empty() {
            return Ok(false);
        }
        match self.api.validate_reset_token(token).await {
            Ok(()) => Ok(true),
            Err(ApiError::Rejected { .. } | ApiError::Unauthorized) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn reset_password(&self, token: &str, password: &str, confirm: &str) -> Result<()> {
        let change = password_change(Some(token), password, confirm)?;
        self.api.reset_password(&change).await?;
        Ok(())
    }

    /// Set the first password of a newly approved account
    pub async fn set_password(
        &self,
        token: Option<&str>,
        password: &str,
        confirm: &str,
    ) -> Result<()> {
        let change = password_change(token, password, confirm)?;
        self.api.set_password(&change).await?;
        Ok(())
    }

    /// Registrations waiting for approval
    pub async fn pending_users(&self) -> Result<Vec<UserAccount>> {
        let token = self.session.require(Area::ApproveUsers)?;
        let users = self.api.list_users(&token).await?;
        Ok(users.into_iter().filter(|user| !user.is_approved).collect())
    }

    pub async fn approve_user(&self, user_id: i64) -> Result<()> {
        let token = self.session.require(Area::ApproveUsers)?;
        self.api.approve_user(&token, user_id).await?;
        tracing::info!("Approved user {}", user_id);
        Ok(())
    }
}

fn password_change(
    token: Option<&str>,
    password: &str,
    confirm: &str,
) -> std::result::Result<PasswordChange, ValidationError> {
    let token = token
        .filter(|t| !t.trim().is_empty())
        .ok_or(ValidationError::MissingToken)?;
    if password.is_empty() {
        return Err(ValidationError::MissingField("password"));
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(PasswordChange {
        token: token.to_string(),
        password: password.to_string(),
    })
}
