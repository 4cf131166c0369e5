// Event Lifecycle Engine
//
// This crate provides a DB-agnostic implementation of the vendor-visit
// lifecycle: check-in → start verification → progress updates → completion,
// with each forward edge gated by a one-time code.
//
// Key design decisions:
// - Uses traits (EventStore, OtpChannel) for pluggable backends
// - OTP delivery is simulated: the mock channel logs the code and the API
//   echoes it back; a real SMS dispatcher slots in without touching the
//   state machine
// - Codes are compared, never consumed, so client retries with the same
//   correct code stay valid across crashes (see engine docs)
// - Status gating is deliberately permissive: only OTP equality guards the
//   gated edges, matching the upstream contract
// - Domain entity types (Event, CheckInRecord) are defined here for shared
//   use by the API and storage crates

pub mod engine;
pub mod error;
pub mod event;
pub mod otp;
pub mod traits;

// In-memory implementations for examples and testing
pub mod memory;

// Re-exports for convenience
pub use engine::{CheckInReceipt, CheckInRequest, LifecycleEngine};
pub use error::{EngineError, Result};
pub use event::{CheckInRecord, EncodedPhoto, Event, EventStatus, NewEvent, MAX_PHOTO_BYTES};
pub use memory::InMemoryEventStore;
pub use otp::{MockSmsChannel, OtpGenerator, OtpPurpose, RandomOtpGenerator, OTP_MAX, OTP_MIN};
pub use traits::{EventStore, OtpChannel};
