// In-memory implementations for examples and testing
//
// These keep all data in memory, making them perfect for:
// - Unit tests of the lifecycle engine
// - Quick prototyping without a database

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::event::{Event, NewEvent};
use crate::traits::EventStore;

/// In-memory event store
///
/// Stores events in a HashMap keyed by event id. Assigns v7 UUIDs on create,
/// like the database backend.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
}

impl InMemoryEventStore {
    /// Create a new in-memory event store
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored events
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Clear all events
    pub async fn clear(&self) {
        self.events.write().await.clear();
    }

    /// Pre-populate with an event (useful for testing)
    pub async fn seed(&self, event: Event) {
        self.events.write().await.insert(event.id, event);
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn create(&self, input: NewEvent) -> Result<Event> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::now_v7(),
            vendor_name: input.vendor_name,
            status: input.status,
            check_in: input.check_in,
            start_otp: input.start_otp,
            setup_photos: Vec::new(),
            notes: None,
            end_otp: None,
            is_completed: false,
            created_at: now,
            updated_at: now,
        };
        self.events.write().await.insert(event.id, event.clone());
        Ok(event)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Event>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn update(&self, event: &Event) -> Result<Event> {
        let mut updated = event.clone();
        updated.updated_at = Utc::now();
        self.events.write().await.insert(updated.id, updated.clone());
        Ok(updated)
    }
}
