// Database implementation of the core EventStore trait
//
// Bridges the engine's store seam to Postgres. Row <-> domain conversion
// lives in models.rs; anyhow errors from sqlx surface as EngineError::Store.

use async_trait::async_trait;
use uuid::Uuid;

use fieldgate_core::{EngineError, Event, EventStore, NewEvent, Result};

use crate::repositories::Database;

#[async_trait]
impl EventStore for Database {
    async fn create(&self, input: NewEvent) -> Result<Event> {
        let row = self.create_event(input).await?;
        Ok(row.into())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Event>> {
        let row = self.get_event(id).await?;
        Ok(row.map(Into::into))
    }

    async fn update(&self, event: &Event) -> Result<Event> {
        let row = self
            .update_event(event)
            .await?
            .ok_or_else(|| EngineError::not_found(event.id))?;
        Ok(row.into())
    }
}
