use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingRequest, BookingStatus, Delivery, NotificationRecord};
use crate::services::notifications;
use crate::state::AppState;

/// Appends each attempt to the notification log, then fails if any send failed.
/// A log write failure is logged and does not change the outcome.
fn settle_deliveries(
    state: &AppState,
    booking: &Booking,
    deliveries: &[Delivery],
) -> Result<(), AppError> {
    match state.conn() {
        Ok(db) => {
            for delivery in deliveries {
                if let Err(e) = queries::insert_notification(&db, &booking.id, delivery) {
                    tracing::error!(booking_id = %booking.id, error = %e, "failed to record notification");
                }
            }
        }
        Err(e) => {
            tracing::error!(booking_id = %booking.id, error = %e, "failed to record notifications");
        }
    }

    match failures(deliveries) {
        None => Ok(()),
        Some(failed) => Err(AppError::Notification(format!("booking {}: {failed}", booking.id))),
    }
}

/// Summary of every failed send, or `None` when all were delivered.
fn failures(deliveries: &[Delivery]) -> Option<String> {
    let failed: Vec<String> = deliveries
        .iter()
        .filter_map(|d| d.error.as_ref().map(|e| format!("{}: {e}", d.kind.as_str())))
        .collect();

    if failed.is_empty() {
        None
    } else {
        Some(failed.join("; "))
    }
}

pub async fn create_booking(state: &AppState, request: BookingRequest) -> Result<Booking, AppError> {
    let package = request.package.clone();
    let new = request.validate()?;

    let booking = {
        let db = state.conn()?;
        queries::insert_booking(&db, &new).map_err(AppError::Persistence)?
    };

    tracing::info!(
        booking_id = %booking.id,
        event_type = %booking.event_type,
        event_date = %booking.event_date,
        package = package.as_deref().unwrap_or("-"),
        "booking created"
    );

    let deliveries = notifications::notify_created(state, &booking).await;
    settle_deliveries(state, &booking, &deliveries)?;

    Ok(booking)
}

pub fn parse_status(raw: Option<&str>) -> Result<BookingStatus, AppError> {
    raw.and_then(BookingStatus::parse)
        .ok_or_else(|| AppError::Validation("Invalid status".to_string()))
}

pub async fn update_status(
    state: &AppState,
    id: &str,
    raw_status: Option<&str>,
) -> Result<Booking, AppError> {
    let status = parse_status(raw_status)?;

    let (previous, booking) = {
        let db = state.conn()?;
        let current = queries::get_booking_by_id(&db, id)
            .map_err(AppError::Persistence)?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if !BookingStatus::is_allowed(current.status, status) {
            return Err(AppError::Validation(format!(
                "Cannot change status from {} to {}",
                current.status, status
            )));
        }

        let updated = queries::update_booking_status(&db, id, status)
            .map_err(AppError::Persistence)?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
        (current.status, updated)
    };

    tracing::info!(booking_id = %booking.id, from = %previous, to = %booking.status, "booking status updated");

    let deliveries = notifications::notify_status_change(state, &booking).await;
    settle_deliveries(state, &booking, &deliveries)?;

    Ok(booking)
}

pub fn list_bookings(
    state: &AppState,
    status_filter: Option<BookingStatus>,
    limit: Option<i64>,
) -> Result<Vec<Booking>, AppError> {
    let db = state.conn()?;
    queries::get_all_bookings(&db, status_filter, limit).map_err(AppError::Persistence)
}

pub fn get_booking(state: &AppState, id: &str) -> Result<Booking, AppError> {
    let db = state.conn()?;
    queries::get_booking_by_id(&db, id)
        .map_err(AppError::Persistence)?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

pub fn get_notifications(state: &AppState, id: &str) -> Result<Vec<NotificationRecord>, AppError> {
    let db = state.conn()?;
    if queries::get_booking_by_id(&db, id)
        .map_err(AppError::Persistence)?
        .is_none()
    {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }
    queries::get_notifications_for_booking(&db, id).map_err(AppError::Persistence)
}

/// Runs the new-booking notification for a booking that is never stored.
pub async fn send_test_notification(state: &AppState) -> Result<(), AppError> {
    let now = chrono::Utc::now();
    let recipient = state
        .config
        .test_email_to
        .clone()
        .unwrap_or_else(|| state.config.admin_email.clone());

    let booking = Booking {
        id: "test-id".to_string(),
        name: "Test User".to_string(),
        email: recipient,
        event_type: "Test Event".to_string(),
        event_date: now.date_naive(),
        details: Some("This is a test booking to verify email functionality".to_string()),
        status: BookingStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    let deliveries = notifications::notify_created(state, &booking).await;
    match failures(&deliveries) {
        None => Ok(()),
        Some(failed) => Err(AppError::Notification(failed)),
    }
}
