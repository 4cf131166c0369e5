// Event lifecycle HTTP routes
//
// The five wizard steps map onto four POST actions plus a GET for
// re-rendering state. Generated OTPs are echoed back in responses
// (simulated delivery; see fieldgate_core::otp).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use fieldgate_core::{Event, EventStore};

use crate::error::ApiError;
use crate::services::EventService;

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            service: Arc::new(EventService::new(store)),
        }
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/events/check-in", post(check_in))
        .route("/v1/events/{event_id}", get(get_event))
        .route("/v1/events/{event_id}/verify-start", post(verify_start_otp))
        .route("/v1/events/{event_id}/progress", post(update_progress))
        .route("/v1/events/{event_id}/complete", post(complete_event))
        .with_state(state)
}

// ============================================
// DTOs
// ============================================

/// Request body for vendor check-in
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckInBody {
    pub vendor_name: String,
    /// Self-contained encoded image string
    pub photo: String,
    pub lat: f64,
    pub long: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckInResponse {
    pub message: String,
    pub event_id: Uuid,
    /// The start OTP, echoed in place of real SMS delivery
    pub mock_otp_response: String,
}

/// Request body carrying a code for the two verification steps
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OtpBody {
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// Request body for a progress update; both fields optional
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProgressBody {
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProgressResponse {
    pub success: bool,
    /// The freshly issued closing OTP, echoed in place of real SMS delivery
    pub mock_closing_otp: String,
}

// ============================================
// Handlers
// ============================================

/// POST /v1/events/check-in - Step 1: vendor check-in
#[utoipa::path(
    post,
    path = "/v1/events/check-in",
    request_body = CheckInBody,
    responses(
        (status = 201, description = "Check-in successful", body = CheckInResponse),
        (status = 400, description = "Missing vendor name or photo"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn check_in(
    State(state): State<AppState>,
    Json(body): Json<CheckInBody>,
) -> Result<(StatusCode, Json<CheckInResponse>), ApiError> {
    let receipt = state.service.check_in(body).await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckInResponse {
            message: "Check-in successful".to_string(),
            event_id: receipt.event_id,
            mock_otp_response: receipt.start_otp,
        }),
    ))
}

/// GET /v1/events/{event_id} - Fetch an event for state-dependent rendering
#[utoipa::path(
    get,
    path = "/v1/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let event = state.service.get(event_id).await?;
    Ok(Json(event))
}

/// POST /v1/events/{event_id}/verify-start - Step 2: verify the start OTP
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/verify-start",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = OtpBody,
    responses(
        (status = 200, description = "Event started", body = ActionResponse),
        (status = 400, description = "Invalid OTP"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn verify_start_otp(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(body): Json<OtpBody>,
) -> Result<Json<ActionResponse>, ApiError> {
    state.service.verify_start_otp(event_id, &body.otp).await?;

    Ok(Json(ActionResponse {
        success: true,
        message: "Event Started!".to_string(),
    }))
}

/// POST /v1/events/{event_id}/progress - Step 3: attach photos/notes, reissue closing OTP
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/progress",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = ProgressBody,
    responses(
        (status = 200, description = "Progress recorded, closing OTP issued", body = ProgressResponse),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn update_progress(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(body): Json<ProgressBody>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let closing_otp = state.service.update_progress(event_id, body).await?;

    Ok(Json(ProgressResponse {
        success: true,
        mock_closing_otp: closing_otp,
    }))
}

/// POST /v1/events/{event_id}/complete - Step 4: verify the closing OTP
#[utoipa::path(
    post,
    path = "/v1/events/{event_id}/complete",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = OtpBody,
    responses(
        (status = 200, description = "Event completed", body = ActionResponse),
        (status = 400, description = "Invalid closing OTP"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn complete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(body): Json<OtpBody>,
) -> Result<Json<ActionResponse>, ApiError> {
    state
        .service
        .complete_event(event_id, &body.otp)
        .await
        .map_err(ApiError::closing)?;

    Ok(Json(ActionResponse {
        success: true,
        message: "Event Completed Successfully!".to_string(),
    }))
}
