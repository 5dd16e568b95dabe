//! Reservations as reported by the catalog API

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Reservation status. Only `Active` counts against the quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReservationStatus {
    Active,
    Other(String),
}

impl From<String> for ReservationStatus {
    fn from(value: String) -> Self {
        if value == "Active" {
            Self::Active
        } else {
            Self::Other(value)
        }
    }
}

impl From<ReservationStatus> for String {
    fn from(status: ReservationStatus) -> Self {
        match status {
            ReservationStatus::Active => "Active".to_string(),
            ReservationStatus::Other(value) => value,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Other(value) => f.write_str(value),
        }
    }
}

/// A member's claim on a book copy. Lifecycle is owned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i64,
    #[serde(deserialize_with = "timestamp")]
    pub reserved_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp")]
    pub expires_at: DateTime<Utc>,
    pub return_location: String,
    pub book_title: String,
    pub book_author: String,
    pub book_copy_location: String,
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }
}

/// Accept RFC 3339, or a naive ISO-8601 timestamp taken as UTC
fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

/// Current standing against the active-reservation limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationQuota {
    pub active: usize,
    pub max: usize,
}

impl ReservationQuota {
    pub fn is_exhausted(&self) -> bool {
        self.active >= self.max
    }

    pub fn remaining(&self) -> usize {
        self.max.saturating_sub(self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_naive_and_offset_timestamps() {
        let json = r#"{
            "id": 1,
            "reservedAt": "2024-03-01T09:30:00.123",
            "expiresAt": "2024-03-08T09:30:00Z",
            "returnLocation": "Central Library",
            "bookTitle": "Saga",
            "bookAuthor": "Brian K. Vaughan",
            "bookCopyLocation": "East Library",
            "status": "Active"
        }"#;
        let res: Reservation = serde_json::from_str(json).unwrap();
        assert!(res.is_active());
        assert_eq!(res.reserved_at.hour(), 9);
        assert_eq!(res.expires_at.day(), 8);
    }

    #[test]
    fn test_other_status_is_not_active() {
        let status = ReservationStatus::from("Returned".to_string());
        assert_eq!(status, ReservationStatus::Other("Returned".to_string()));
        assert_eq!(status.to_string(), "Returned");
    }

    #[test]
    fn test_quota() {
        let quota = ReservationQuota { active: 3, max: 3 };
        assert!(quota.is_exhausted());
        assert_eq!(quota.remaining(), 0);

        let quota = ReservationQuota { active: 1, max: 3 };
        assert!(!quota.is_exhausted());
        assert_eq!(quota.remaining(), 2);
    }
}
