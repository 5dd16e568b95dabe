//! Catalog listings and search filters

use serde::{Deserialize, Serialize};

/// Availability of a listed copy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookStatus {
    Available,
    Reserved,

    /// Any status this client does not know about
    #[serde(other)]
    Unknown,
}

/// One row of a catalog search.
///
/// A listing is a snapshot of a single fetch; the next successful search
/// replaces the whole set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookListing {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub status: Option<BookStatus>,
    #[serde(default)]
    pub book_copy_id: Option<i64>,
}

impl BookListing {
    pub fn new(id: i64, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            category: None,
            location: None,
            status: None,
            book_copy_id: None,
        }
    }

    /// Mark this listing as an available copy
    pub fn with_copy(mut self, copy_id: i64, status: BookStatus) -> Self {
        self.book_copy_id = Some(copy_id);
        self.status = Some(status);
        self
    }

    pub fn is_available(&self) -> bool {
        self.status == Some(BookStatus::Available)
    }

    /// Stable key for list rendering: the copy id when there is one
    pub fn key(&self) -> i64 {
        self.book_copy_id.unwrap_or(self.id)
    }
}

/// Optional search filters. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub category: Option<String>,
    pub author: Option<String>,
    pub location: Option<String>,
    pub available: Option<bool>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    /// Query parameters for the search endpoint, present fields only
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("category", &self.category),
            ("author", &self.author),
            ("location", &self.location),
        ];

        let mut pairs: Vec<(&'static str, String)> = text
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| (key, v.to_string()))
            })
            .collect();

        if let Some(available) = self.available {
            pairs.push(("available", available.to_string()));
        }
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}
