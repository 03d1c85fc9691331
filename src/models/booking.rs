use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub name: String,
    pub email: String,
    pub event_type: String,
    pub event_date: NaiveDate,
    pub details: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Every status change the lifecycle accepts. Any booking may move to any
/// status, including the one it already has.
pub const ALLOWED_TRANSITIONS: &[(BookingStatus, BookingStatus)] = &[
    (BookingStatus::Pending, BookingStatus::Pending),
    (BookingStatus::Pending, BookingStatus::Confirmed),
    (BookingStatus::Pending, BookingStatus::Cancelled),
    (BookingStatus::Confirmed, BookingStatus::Pending),
    (BookingStatus::Confirmed, BookingStatus::Confirmed),
    (BookingStatus::Confirmed, BookingStatus::Cancelled),
    (BookingStatus::Cancelled, BookingStatus::Pending),
    (BookingStatus::Cancelled, BookingStatus::Confirmed),
    (BookingStatus::Cancelled, BookingStatus::Cancelled),
];

impl BookingStatus {
    pub const ALL: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    /// Strict parse; unknown values are rejected rather than defaulted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(BookingStatus::Pending),
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_allowed(from: BookingStatus, to: BookingStatus) -> bool {
        ALLOWED_TRANSITIONS.contains(&(from, to))
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a booking form submission. Every field is optional here so that
/// missing values surface as a validation error instead of a JSON rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub event_type: Option<String>,
    pub event_date: Option<String>,
    pub details: Option<String>,
    /// Chosen on the form but not stored.
    pub package: Option<String>,
}

/// A validated booking request, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub event_type: String,
    pub event_date: NaiveDate,
    pub details: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

impl BookingRequest {
    pub fn validate(self) -> Result<NewBooking, AppError> {
        let (Some(name), Some(email), Some(event_type), Some(event_date)) = (
            required(self.name),
            required(self.email),
            required(self.event_type),
            required(self.event_date),
        ) else {
            return Err(AppError::Validation("Missing required fields".to_string()));
        };

        let event_date = parse_event_date(&event_date)
            .ok_or_else(|| AppError::Validation("Invalid event date".to_string()))?;

        Ok(NewBooking {
            name,
            email,
            event_type,
            event_date,
            details: required(self.details),
        })
    }
}
