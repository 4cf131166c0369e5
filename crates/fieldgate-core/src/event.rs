// Event domain types
//
// These types represent the Event entity (one tracked vendor visit) and its
// lifecycle status. Used by both API and storage crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Upper bound on an encoded photo payload (bytes of encoded text).
pub const MAX_PHOTO_BYTES: usize = 16 * 1024 * 1024;

/// Event lifecycle status
///
/// Advances only forward: NotStarted → CheckedIn → InProgress → Completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    NotStarted,
    CheckedIn,
    InProgress,
    Completed,
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::NotStarted => write!(f, "NOT_STARTED"),
            EventStatus::CheckedIn => write!(f, "CHECKED_IN"),
            EventStatus::InProgress => write!(f, "IN_PROGRESS"),
            EventStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl From<&str> for EventStatus {
    fn from(s: &str) -> Self {
        match s {
            "CHECKED_IN" => EventStatus::CheckedIn,
            "IN_PROGRESS" => EventStatus::InProgress,
            "COMPLETED" => EventStatus::Completed,
            _ => EventStatus::NotStarted,
        }
    }
}

/// Self-contained encoded image (e.g. a base64 data string).
///
/// Opaque to the core: never decoded or inspected, only bounded in size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(transparent)]
pub struct EncodedPhoto(String);

impl EncodedPhoto {
    pub fn new(encoded: impl Into<String>) -> Result<Self, EngineError> {
        let encoded = encoded.into();
        if encoded.is_empty() {
            return Err(EngineError::validation("photo must not be empty"));
        }
        if encoded.len() > MAX_PHOTO_BYTES {
            return Err(EngineError::validation(format!(
                "photo exceeds {} byte limit",
                MAX_PHOTO_BYTES
            )));
        }
        Ok(Self(encoded))
    }

    /// Wrap a string that was already validated on the way in
    /// (rehydrating a record from the store).
    pub fn from_stored(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Artifacts captured at check-in: vendor selfie, device geolocation, time.
///
/// Set exactly once, when the event is created. Coordinate validity as real
/// geography is a client concern; the core only requires finite numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CheckInRecord {
    pub photo: EncodedPhoto,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

/// Event - one tracked vendor visit from check-in to completion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Event {
    pub id: Uuid,
    pub vendor_name: String,
    pub status: EventStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<CheckInRecord>,
    /// Start OTP. Compared on verification, never cleared, so resubmitting
    /// the same correct code succeeds again.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_otp: Option<String>,
    /// Append-only within the in-progress window.
    #[serde(default)]
    pub setup_photos: Vec<EncodedPhoto>,
    /// Last write wins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Closing OTP. Overwritten on every progress update; only the latest
    /// issued value opens completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_otp: Option<String>,
    /// Denormalized completion flag, kept in lockstep with status.
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new event record (id and timestamps assigned by the store)
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub vendor_name: String,
    pub status: EventStatus,
    pub check_in: Option<CheckInRecord>,
    pub start_otp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            EventStatus::NotStarted,
            EventStatus::CheckedIn,
            EventStatus::InProgress,
            EventStatus::Completed,
        ] {
            assert_eq!(EventStatus::from(status.to_string().as_str()), status);
        }
    }

    #[test]
    fn unknown_status_defaults_to_not_started() {
        assert_eq!(EventStatus::from("bogus"), EventStatus::NotStarted);
    }

    #[test]
    fn empty_photo_rejected() {
        assert!(EncodedPhoto::new("").is_err());
    }

    #[test]
    fn oversized_photo_rejected() {
        let huge = "a".repeat(MAX_PHOTO_BYTES + 1);
        assert!(EncodedPhoto::new(huge).is_err());
    }
}
