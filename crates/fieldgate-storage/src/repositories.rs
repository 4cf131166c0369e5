// Repository layer for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use fieldgate_core::{Event, NewEvent};

use crate::models::EventRow;

const EVENT_COLUMNS: &str = "id, vendor_name, status, check_in_photo, check_in_latitude, \
     check_in_longitude, check_in_at, start_otp, setup_photos, notes, end_otp, \
     is_completed, created_at, updated_at";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run pending migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Events (one row per tracked vendor visit)
    // ============================================

    pub async fn create_event(&self, input: NewEvent) -> Result<EventRow> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO events (id, vendor_name, status, check_in_photo, check_in_latitude, check_in_longitude, check_in_at, start_otp)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {EVENT_COLUMNS}
            "#,
        ))
        .bind(Uuid::now_v7())
        .bind(&input.vendor_name)
        .bind(input.status.to_string())
        .bind(input.check_in.as_ref().map(|c| c.photo.as_str().to_string()))
        .bind(input.check_in.as_ref().map(|c| c.latitude))
        .bind(input.check_in.as_ref().map(|c| c.longitude))
        .bind(input.check_in.as_ref().map(|c| c.timestamp))
        .bind(&input.start_otp)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Full-record update: every mutable column is replaced from the given
    /// domain event. Concurrent writers to the same id resolve last-write-wins.
    pub async fn update_event(&self, event: &Event) -> Result<Option<EventRow>> {
        let setup_photos: Vec<String> = event
            .setup_photos
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();

        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            UPDATE events
            SET
                vendor_name = $2,
                status = $3,
                start_otp = $4,
                setup_photos = $5,
                notes = $6,
                end_otp = $7,
                is_completed = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#,
        ))
        .bind(event.id)
        .bind(&event.vendor_name)
        .bind(event.status.to_string())
        .bind(&event.start_otp)
        .bind(&setup_photos)
        .bind(&event.notes)
        .bind(&event.end_otp)
        .bind(event.is_completed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
