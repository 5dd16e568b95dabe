//! In-memory fakes shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use libris_core::api::ApiResult;
use libris_core::types::{
    Credentials, LoginResponse, LoginUser, PasswordChange, RegistrationForm,
};
use libris_core::{
    ApiError, BookListing, BookStatus, CatalogApi, CoverLookup, EnrichmentError, Library,
    LibrisClient, MemberProfile, MemoryStore, Reservation, ReservationStatus, Role,
    SearchFilters, Session, UserAccount,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const MEMBER_TOKEN: &str = "member-token";
pub const LIBRARIAN_TOKEN: &str = "librarian-token";

/// Catalog API fake holding books, libraries and reservations in memory
#[derive(Default)]
pub struct FakeCatalogApi {
    pub books: Mutex<Vec<BookListing>>,
    pub libraries: Mutex<Vec<Library>>,
    pub reservations: Mutex<Vec<Reservation>>,
    pub users: Mutex<Vec<UserAccount>>,
    pub home_library: Mutex<Option<i64>>,
    /// Reject the next reserve call with this status and body
    pub reject_reserve: Mutex<Option<(u16, Option<String>)>>,
    pub searches: Mutex<Vec<SearchFilters>>,
    /// Fail the next search with a server error
    pub fail_search: Mutex<bool>,
    pub reserve_calls: AtomicUsize,
    pub library_calls: AtomicUsize,
    pub approved: Mutex<Vec<i64>>,
    pub password_changes: Mutex<Vec<PasswordChange>>,
}

impl FakeCatalogApi {
    pub fn with_catalog() -> Arc<Self> {
        let api = Self::default();
        *api.books.lock() = vec![
            BookListing::new(1, "Watchmen", "Alan Moore").with_copy(101, BookStatus::Available),
            BookListing::new(2, "saga", "Brian K. Vaughan").with_copy(102, BookStatus::Available),
            BookListing::new(3, "Maus", "Art Spiegelman").with_copy(103, BookStatus::Reserved),
        ];
        *api.libraries.lock() = vec![
            Library {
                id: 1,
                name: "Central Library".to_string(),
                location: "Main St".to_string(),
            },
            Library {
                id: 2,
                name: "East Library".to_string(),
                location: "East Side".to_string(),
            },
        ];
        *api.home_library.lock() = Some(1);
        Arc::new(api)
    }

    pub fn reserve_calls(&self) -> usize {
        self.reserve_calls.load(Ordering::SeqCst)
    }

    /// Pre-existing active reservations
    pub fn seed_reservations(&self, count: usize) {
        let mut reservations = self.reservations.lock();
        for i in 0..count {
            reservations.push(reservation(1000 + i as i64, "Seeded", ReservationStatus::Active));
        }
    }

    fn check_token(&self, token: &str) -> ApiResult<()> {
        if token == MEMBER_TOKEN || token == LIBRARIAN_TOKEN {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

pub fn reservation(id: i64, title: &str, status: ReservationStatus) -> Reservation {
    let now = Utc::now();
    Reservation {
        id,
        reserved_at: now,
        expires_at: now + Duration::days(7),
        return_location: "Central Library".to_string(),
        book_title: title.to_string(),
        book_author: "Someone".to_string(),
        book_copy_location: "East Library".to_string(),
        status,
    }
}

#[async_trait]
impl CatalogApi for FakeCatalogApi {
    async fn search_books(&self, filters: &SearchFilters) -> ApiResult<Vec<BookListing>> {
        self.searches.lock().push(filters.clone());
        if std::mem::take(&mut *self.fail_search.lock()) {
            return Err(ApiError::Rejected {
                status: 500,
                message: Some("Search is unavailable.".to_string()),
            });
        }
        let books = self.books.lock().clone();
        Ok(books
            .into_iter()
            .filter(|b| match filters.available {
                Some(true) => b.is_available(),
                Some(false) => !b.is_available(),
                None => true,
            })
            .collect())
    }

    async fn my_reservations(&self, token: &str) -> ApiResult<Vec<Reservation>> {
        self.check_token(token)?;
        Ok(self.reservations.lock().clone())
    }

    async fn reserve_copy(
        &self,
        token: &str,
        copy_id: i64,
        return_library_id: i64,
        _lending_period: u32,
    ) -> ApiResult<()> {
        self.reserve_calls.fetch_add(1, Ordering::SeqCst);
        self.check_token(token)?;
        if let Some((status, message)) = self.reject_reserve.lock().take() {
            return Err(ApiError::Rejected { status, message });
        }

        let mut books = self.books.lock();
        let book = books
            .iter_mut()
            .find(|b| b.book_copy_id == Some(copy_id))
            .ok_or(ApiError::Rejected {
                status: 404,
                message: Some("Copy not found.".to_string()),
            })?;
        book.status = Some(BookStatus::Reserved);

        let location = self
            .libraries
            .lock()
            .iter()
            .find(|l| l.id == return_library_id)
            .map(|l| l.name.clone())
            .unwrap_or_default();
        let mut created = reservation(copy_id, &book.title, ReservationStatus::Active);
        created.return_location = location;
        self.reservations.lock().push(created);
        Ok(())
    }

    async fn list_libraries(&self) -> ApiResult<Vec<Library>> {
        self.library_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.libraries.lock().clone())
    }

    async fn current_member(&self, token: &str) -> ApiResult<MemberProfile> {
        self.check_token(token)?;
        Ok(MemberProfile {
            library_id: *self.home_library.lock(),
        })
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let (token, role) = match (credentials.email.as_str(), credentials.password.as_str()) {
            ("member@example.com", "secret") => (MEMBER_TOKEN, Role::Member),
            ("librarian@example.com", "secret") => (LIBRARIAN_TOKEN, Role::Librarian),
            _ => {
                return Err(ApiError::Rejected {
                    status: 401,
                    message: Some("Invalid email or password.".to_string()),
                })
            }
        };
        Ok(LoginResponse {
            token: token.to_string(),
            user: LoginUser { role },
        })
    }

    async fn register(&self, form: &RegistrationForm) -> ApiResult<()> {
        if self.users.lock().iter().any(|u| u.email == form.email) {
            return Err(ApiError::Rejected {
                status: 400,
                message: Some("Email already registered.".to_string()),
            });
        }
        let mut users = self.users.lock();
        let id = users.len() as i64 + 1;
        users.push(UserAccount {
            id,
            email: form.email.clone(),
            role: form.role.clone(),
            is_approved: false,
        });
        Ok(())
    }

    async fn forgot_password(&self, _email: &str) -> ApiResult<()> {
        Ok(())
    }

    async fn validate_reset_token(&self, token: &str) -> ApiResult<()> {
        if token == "good-reset" {
            Ok(())
        } else {
            Err(ApiError::Rejected {
                status: 400,
                message: None,
            })
        }
    }

    async fn reset_password(&self, change: &PasswordChange) -> ApiResult<()> {
        self.password_changes.lock().push(change.clone());
        Ok(())
    }

    async fn set_password(&self, change: &PasswordChange) -> ApiResult<()> {
        self.password_changes.lock().push(change.clone());
        Ok(())
    }

    async fn list_users(&self, token: &str) -> ApiResult<Vec<UserAccount>> {
        self.check_token(token)?;
        Ok(self.users.lock().clone())
    }

    async fn approve_user(&self, token: &str, user_id: i64) -> ApiResult<()> {
        self.check_token(token)?;
        let mut users = self.users.lock();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(ApiError::Rejected {
                status: 404,
                message: Some("User not found.".to_string()),
            })?;
        user.is_approved = true;
        self.approved.lock().push(user_id);
        Ok(())
    }
}

/// Cover lookup fake: known titles resolve, others have no record
#[derive(Default)]
pub struct FakeCoverLookup {
    pub covers: HashMap<String, String>,
    pub fail_for: Vec<String>,
    pub calls: Mutex<Vec<String>>,
    pub total: AtomicUsize,
}

impl FakeCoverLookup {
    pub fn with_covers(covers: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            covers: covers
                .iter()
                .map(|(t, u)| (t.to_string(), u.to_string()))
                .collect(),
            ..Self::default()
        })
    }

    pub fn calls_for(&self, title: &str) -> usize {
        self.calls.lock().iter().filter(|t| *t == title).count()
    }
}

#[async_trait]
impl CoverLookup for FakeCoverLookup {
    async fn thumbnail(&self, title: &str) -> Result<Option<String>, EnrichmentError> {
        self.calls.lock().push(title.to_string());
        self.total.fetch_add(1, Ordering::SeqCst);
        if self.fail_for.iter().any(|t| t == title) {
            return Err(EnrichmentError::Status(500));
        }
        Ok(self.covers.get(title).cloned())
    }
}

/// Client over the fakes, optionally signed in with `role`
pub async fn client_with(
    api: Arc<FakeCatalogApi>,
    lookup: Arc<FakeCoverLookup>,
    role: Option<Role>,
) -> LibrisClient {
    let session = Arc::new(
        Session::restore(Arc::new(MemoryStore::new()))
            .await
            .expect("memory store never fails"),
    );
    if let Some(role) = role {
        let token = if role == Role::Librarian {
            LIBRARIAN_TOKEN
        } else {
            MEMBER_TOKEN
        };
        session.login(token, role).await.unwrap();
    }
    LibrisClient::from_parts(api, lookup, session, 3)
}
