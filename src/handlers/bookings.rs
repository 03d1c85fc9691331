use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Booking, BookingRequest, NotificationRecord};
use crate::services::bookings;
use crate::state::AppState;

/// Malformed bodies and query strings get the same `{error}` 400 as any
/// other validation failure instead of axum's plain-text rejection.
fn rejected(rejection: impl std::fmt::Display, message: &str) -> Response {
    tracing::debug!(error = %rejection, "rejected request");
    AppError::Validation(message.to_string()).into_response()
}

// POST /bookings
#[derive(Serialize)]
pub struct CreatedResponse {
    message: &'static str,
    booking: Booking,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Response, Response> {
    let Json(payload) = payload.map_err(|e| rejected(e, "Invalid request body"))?;
    let booking = bookings::create_booking(&state, payload)
        .await
        .map_err(|e| e.into_response_with("Failed to create booking"))?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Booking created successfully",
            booking,
        }),
    )
        .into_response())
}

// GET /bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct BookingsResponse {
    bookings: Vec<Booking>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BookingsQuery>, QueryRejection>,
) -> Result<Json<BookingsResponse>, Response> {
    let Query(query) = query.map_err(|e| rejected(e, "Invalid query parameters"))?;
    let status_filter = match query.status.as_deref() {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(
            bookings::parse_status(Some(raw.to_uppercase().as_str()))
                .map_err(|e| e.into_response_with("Failed to fetch bookings"))?,
        ),
    };

    let bookings = bookings::list_bookings(&state, status_filter, query.limit)
        .map_err(|e| e.into_response_with("Failed to fetch bookings"))?;

    Ok(Json(BookingsResponse { bookings }))
}

// GET /bookings/:id
#[derive(Serialize)]
pub struct BookingResponse {
    booking: Booking,
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, Response> {
    let booking = bookings::get_booking(&state, &id)
        .map_err(|e| e.into_response_with("Failed to fetch booking"))?;
    Ok(Json(BookingResponse { booking }))
}

// PATCH /bookings/:id
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, Response> {
    let Json(payload) = payload.map_err(|e| rejected(e, "Invalid status"))?;
    let booking = bookings::update_status(&state, &id, payload.status.as_deref())
        .await
        .map_err(|e| e.into_response_with("Failed to update booking"))?;
    Ok(Json(BookingResponse { booking }))
}

// GET /bookings/:id/notifications
#[derive(Serialize)]
pub struct NotificationsResponse {
    notifications: Vec<NotificationRecord>,
}

pub async fn get_notifications(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<NotificationsResponse>, Response> {
    let notifications = bookings::get_notifications(&state, &id)
        .map_err(|e| e.into_response_with("Failed to fetch notifications"))?;
    Ok(Json(NotificationsResponse { notifications }))
}
