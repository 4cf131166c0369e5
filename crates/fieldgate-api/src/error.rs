// API error responses
//
// Maps engine errors onto the wire contract: the client surface owns
// user-facing messaging, so bodies carry a `success` flag and a message.
// OTP mismatches are expected and retriable; the client loops until the
// operator types the right code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use fieldgate_core::EngineError;

/// Failure body shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

/// Wrapper making `EngineError` usable as an axum rejection
///
/// The two verification steps word a mismatch differently ("Invalid OTP"
/// at start, "Invalid Closing OTP" at completion), so the mismatch message
/// rides along with the error.
#[derive(Debug)]
pub struct ApiError {
    error: EngineError,
    mismatch_message: &'static str,
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        Self {
            error,
            mismatch_message: "Invalid OTP",
        }
    }
}

impl ApiError {
    /// Wrap an error from the completion step, where a mismatch is reported
    /// as an invalid closing code.
    pub fn closing(error: EngineError) -> Self {
        Self {
            error,
            mismatch_message: "Invalid Closing OTP",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.error {
            EngineError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            EngineError::NotFound(_) => (StatusCode::NOT_FOUND, "Event not found".to_string()),
            EngineError::OtpMismatch => {
                (StatusCode::BAD_REQUEST, self.mismatch_message.to_string())
            }
            EngineError::Dispatch(_) | EngineError::Store(_) => {
                tracing::error!(error = %self.error, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use uuid::Uuid;

    async fn body_message(resp: Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.success);
        body.message
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = ApiError::from(EngineError::not_found(Uuid::now_v7())).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn otp_mismatch_maps_to_400() {
        let resp = ApiError::from(EngineError::OtpMismatch).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_message(resp).await, "Invalid OTP");
    }

    #[tokio::test]
    async fn closing_mismatch_keeps_its_own_message() {
        let resp = ApiError::closing(EngineError::OtpMismatch).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_message(resp).await, "Invalid Closing OTP");
    }

    #[test]
    fn store_failure_maps_to_500() {
        let resp =
            ApiError::from(EngineError::Store(anyhow::anyhow!("connection refused")))
                .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
