// Database models (internal, may differ from domain types)

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use fieldgate_core::{CheckInRecord, EncodedPhoto, Event, EventStatus};

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub vendor_name: String,
    pub status: String,
    pub check_in_photo: Option<String>,
    pub check_in_latitude: Option<f64>,
    pub check_in_longitude: Option<f64>,
    pub check_in_at: Option<DateTime<Utc>>,
    pub start_otp: Option<String>,
    pub setup_photos: Vec<String>,
    pub notes: Option<String>,
    pub end_otp: Option<String>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        // The check-in record is written as one unit; all four columns are
        // present or none are.
        let check_in = match (
            row.check_in_photo,
            row.check_in_latitude,
            row.check_in_longitude,
            row.check_in_at,
        ) {
            (Some(photo), Some(latitude), Some(longitude), Some(timestamp)) => {
                Some(CheckInRecord {
                    photo: EncodedPhoto::from_stored(photo),
                    latitude,
                    longitude,
                    timestamp,
                })
            }
            _ => None,
        };

        Event {
            id: row.id,
            vendor_name: row.vendor_name,
            status: EventStatus::from(row.status.as_str()),
            check_in,
            start_otp: row.start_otp,
            setup_photos: row
                .setup_photos
                .into_iter()
                .map(EncodedPhoto::from_stored)
                .collect(),
            notes: row.notes,
            end_otp: row.end_otp,
            is_completed: row.is_completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
