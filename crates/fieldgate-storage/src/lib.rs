// Postgres storage layer with sqlx
//
// This crate provides the database implementation of the core EventStore
// trait: one `events` row per tracked vendor visit, written whole on every
// operation.

pub mod event_store;
pub mod models;
pub mod repositories;

pub use models::EventRow;
pub use repositories::Database;
