// Event service: bridges HTTP DTOs to the lifecycle engine

use std::sync::Arc;
use uuid::Uuid;

use fieldgate_core::{
    CheckInReceipt, CheckInRequest, Event, EventStore, LifecycleEngine, Result,
};

use crate::events::{CheckInBody, ProgressBody};

pub struct EventService {
    engine: LifecycleEngine,
}

impl EventService {
    /// Wire the engine to any store backend with the default OTP backends
    /// (random codes, mock SMS delivery). Production passes the database;
    /// router tests pass the in-memory store.
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            engine: LifecycleEngine::new(store),
        }
    }

    pub async fn check_in(&self, body: CheckInBody) -> Result<CheckInReceipt> {
        self.engine
            .check_in(CheckInRequest {
                vendor_name: body.vendor_name,
                photo: body.photo,
                latitude: body.lat,
                longitude: body.long,
            })
            .await
    }

    pub async fn verify_start_otp(&self, event_id: Uuid, otp: &str) -> Result<()> {
        self.engine.verify_start_otp(event_id, otp).await
    }

    pub async fn update_progress(&self, event_id: Uuid, body: ProgressBody) -> Result<String> {
        self.engine
            .update_progress(event_id, body.photo, body.notes)
            .await
    }

    pub async fn complete_event(&self, event_id: Uuid, otp: &str) -> Result<()> {
        self.engine.complete_event(event_id, otp).await
    }

    pub async fn get(&self, event_id: Uuid) -> Result<Event> {
        self.engine.get_event(event_id).await
    }
}
