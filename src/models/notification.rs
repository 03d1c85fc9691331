use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    AdminNewBooking,
    CustomerAcknowledgement,
    Confirmation,
    Cancellation,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::AdminNewBooking => "ADMIN_NEW_BOOKING",
            NotificationKind::CustomerAcknowledgement => "CUSTOMER_ACKNOWLEDGEMENT",
            NotificationKind::Confirmation => "CONFIRMATION",
            NotificationKind::Cancellation => "CANCELLATION",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADMIN_NEW_BOOKING" => Some(NotificationKind::AdminNewBooking),
            "CUSTOMER_ACKNOWLEDGEMENT" => Some(NotificationKind::CustomerAcknowledgement),
            "CONFIRMATION" => Some(NotificationKind::Confirmation),
            "CANCELLATION" => Some(NotificationKind::Cancellation),
            _ => None,
        }
    }
}

/// One email attempt made on behalf of a booking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: i64,
    pub booking_id: String,
    pub kind: NotificationKind,
    pub recipient: String,
    pub subject: String,
    pub delivered: bool,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a single send, as reported by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub kind: NotificationKind,
    pub recipient: String,
    pub subject: String,
    pub error: Option<String>,
}

impl Delivery {
    pub fn delivered(&self) -> bool {
        self.error.is_none()
    }
}
