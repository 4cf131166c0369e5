// Core traits for pluggable backends
//
// These traits let the lifecycle engine run against different backends:
// - In-memory implementations for examples and testing
// - Database implementations for production
// - A mock OTP channel now, a real SMS dispatcher later

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::event::{Event, NewEvent};
use crate::otp::OtpPurpose;

// ============================================================================
// EventStore - Durable keyed storage for Event records
// ============================================================================

/// Trait for persisting event records
///
/// The store is the sole owner of per-record atomicity: each engine operation
/// is one fetch plus one full-record write, and concurrent writes to the same
/// id resolve last-write-wins.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Create a new record. The store assigns the id and timestamps.
    async fn create(&self, input: NewEvent) -> Result<Event>;

    /// Fetch a record by id. `None` when the id does not resolve.
    async fn fetch(&self, id: Uuid) -> Result<Option<Event>>;

    /// Persist the full record, replacing the stored copy.
    async fn update(&self, event: &Event) -> Result<Event>;
}

// ============================================================================
// OtpChannel - Out-of-band code delivery
// ============================================================================

/// Trait for relaying a generated OTP to the customer
///
/// Implementations can:
/// - Log the code (the shipped mock, see `MockSmsChannel`)
/// - Send a real SMS or push notification
/// - Collect codes in memory for testing
#[async_trait]
pub trait OtpChannel: Send + Sync {
    /// Relay a single code
    async fn send(&self, purpose: OtpPurpose, code: &str) -> Result<()>;
}
