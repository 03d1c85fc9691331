use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::bookings;
use crate::state::AppState;

#[derive(Serialize)]
pub struct TestEmailResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// GET /dev/test-email
pub async fn send_test_email(State(state): State<Arc<AppState>>) -> Response {
    match bookings::send_test_notification(&state).await {
        Ok(()) => Json(TestEmailResponse {
            success: true,
            message: Some("Test email sent successfully".to_string()),
            error: None,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "test email failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TestEmailResponse {
                    success: false,
                    message: None,
                    error: Some(e.to_string()),
                }),
            )
                .into_response()
        }
    }
}
