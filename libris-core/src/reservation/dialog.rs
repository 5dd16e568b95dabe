//! Per-book reservation dialog

use super::{ReservationManager, DEFAULT_LENDING_PERIOD};
use crate::error::{LibrisError, Result, ValidationError};
use crate::types::BookListing;

/// Shown when the server rejects a reservation without saying why
pub const RESERVE_FALLBACK_MESSAGE: &str = "Failed to reserve.";

/// Choices made in an open dialog
#[derive(Debug, Clone, PartialEq)]
pub struct DraftReservation {
    pub book: BookListing,
    pub lending_period: u32,
    pub return_library: Option<i64>,
    /// Message from the last failed confirm
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Open(DraftReservation),
    Submitting(DraftReservation),
}

/// `Closed → Open → Submitting → Closed | Open(with error)`, or `Open → Closed` on cancel.
#[derive(Debug, Default)]
pub struct ReservationDialog {
    state: DialogState,
}

impl ReservationDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open(_))
    }

    pub fn draft(&self) -> Option<&DraftReservation> {
        match &self.state {
            DialogState::Open(draft) | DialogState::Submitting(draft) => Some(draft),
            DialogState::Closed => None,
        }
    }

    /// Open for `book` with the default period and the member's home library
    pub fn open(&mut self, book: BookListing, home_library: Option<i64>) {
        self.state = DialogState::Open(DraftReservation {
            book,
            lending_period: DEFAULT_LENDING_PERIOD,
            return_library: home_library,
            error: None,
        });
    }

    pub fn set_lending_period(&mut self, days: u32) {
        if let DialogState::Open(draft) = &mut self.state {
            draft.lending_period = days;
        }
    }

    pub fn set_return_library(&mut self, library_id: Option<i64>) {
        if let DialogState::Open(draft) = &mut self.state {
            draft.return_library = library_id;
        }
    }

    pub fn cancel(&mut self) {
        self.state = DialogState::Closed;
    }

    /// Validate and submit. Success closes the dialog; failure reopens it
    /// with the error message so the user can retry.
    pub async fn confirm(&mut self, manager: &ReservationManager) -> Result<()> {
        let mut draft = match std::mem::take(&mut self.state) {
            DialogState::Open(draft) => draft,
            other => {
                self.state = other;
                return Ok(());
            }
        };
        draft.error = None;

        let result = match draft.book.book_copy_id {
            Some(copy_id) => {
                self.state = DialogState::Submitting(draft.clone());
                manager
                    .reserve(copy_id, draft.lending_period, draft.return_library)
                    .await
            }
            None => Err(LibrisError::from(ValidationError::MissingCopy)),
        };

        match result {
            Ok(()) => {
                self.state = DialogState::Closed;
                Ok(())
            }
            Err(e) => {
                draft.error = Some(e.user_message(RESERVE_FALLBACK_MESSAGE));
                self.state = DialogState::Open(draft);
                Err(e)
            }
        }
    }
}
