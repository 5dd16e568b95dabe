//! Signed-in session: bearer token and role, persisted in a key-value store

use crate::access::Area;
use crate::error::{Result, ValidationError};
use crate::storage::KeyValueStore;
use crate::types::Role;
use parking_lot::RwLock;
use std::sync::Arc;

const TOKEN_KEY: &str = "token";
const ROLE_KEY: &str = "role";

#[derive(Clone, PartialEq, Eq)]
struct SignedIn {
    token: String,
    role: Role,
}

/// Session context shared by every component that calls a protected endpoint.
///
/// Created with [`Session::restore`], which reads the persisted credential,
/// and torn down with [`Session::logout`], which clears it.
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    current: RwLock<Option<SignedIn>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token
        f.debug_struct("Session")
            .field("signed_in", &self.is_signed_in())
            .field("role", &self.role())
            .finish()
    }
}

impl Session {
    /// Load the persisted credential. Both token and role must be present.
    pub async fn restore(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let token = store.get(TOKEN_KEY).await?;
        let role = store.get(ROLE_KEY).await?;

        let current = match (token, role) {
            (Some(token), Some(role)) if !token.is_empty() => Some(SignedIn {
                token,
                role: Role::from(role),
            }),
            _ => None,
        };

        if let Some(signed_in) = &current {
            tracing::debug!("Restored session for role {}", signed_in.role);
        }

        Ok(Self {
            store,
            current: RwLock::new(current),
        })
    }

    /// Persist a freshly issued credential
    pub async fn login(&self, token: impl Into<String>, role: Role) -> Result<()> {
        let token = token.into();
        self.store.set(TOKEN_KEY, &token).await?;
        self.store.set(ROLE_KEY, role.as_str()).await?;
        *self.current.write() = Some(SignedIn { token, role });
        Ok(())
    }

    /// Clear the persisted credential and reset to signed out
    pub async fn logout(&self) -> Result<()> {
        *self.current.write() = None;
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(ROLE_KEY).await?;
        Ok(())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.current.read().as_ref().map(|s| s.token.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.current.read().as_ref().map(|s| s.role.clone())
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.current
            .read()
            .as_ref()
            .is_some_and(|s| &s.role == role)
    }

    /// Whether the current session may enter `area`
    pub fn permits(&self, area: Area) -> bool {
        self.require(area).is_ok()
    }

    /// Check access to `area`, returning the token on success
    pub fn require(&self, area: Area) -> std::result::Result<String, ValidationError> {
        let guard = self.current.read();
        let signed_in = guard.as_ref().ok_or(ValidationError::NotSignedIn)?;
        match area.required_role() {
            Some(role) if role != signed_in.role => Err(ValidationError::Forbidden),
            _ => Ok(signed_in.token.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_restore_requires_token_and_role() {
        let store = Arc::new(MemoryStore::with_entries([("token", "abc")]));
        let session = Session::restore(store).await.unwrap();
        assert!(!session.is_signed_in());

        let store = Arc::new(MemoryStore::with_entries([
            ("token", "abc"),
            ("role", "Member"),
        ]));
        let session = Session::restore(store).await.unwrap();
        assert!(session.is_signed_in());
        assert_eq!(session.role(), Some(Role::Member));
        assert_eq!(session.token().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_login_then_logout_clears_store() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::restore(store.clone()).await.unwrap();

        session.login("t-1", Role::Librarian).await.unwrap();
        assert!(session.has_role(&Role::Librarian));
        assert_eq!(store.get("role").await.unwrap().as_deref(), Some("Librarian"));

        session.logout().await.unwrap();
        assert!(!session.is_signed_in());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_require_checks_role() {
        let session = Session::restore(Arc::new(MemoryStore::new())).await.unwrap();
        assert_eq!(
            session.require(Area::Catalog),
            Err(ValidationError::NotSignedIn)
        );

        session.login("t-2", Role::Member).await.unwrap();
        assert_eq!(session.require(Area::Catalog).as_deref(), Ok("t-2"));
        assert_eq!(session.require(Area::MyReservations).as_deref(), Ok("t-2"));
        assert_eq!(
            session.require(Area::ApproveUsers),
            Err(ValidationError::Forbidden)
        );
        assert!(!format!("{session:?}").contains("t-2"));
    }
}
