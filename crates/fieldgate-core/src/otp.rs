// OTP generation and the mock delivery channel
//
// Codes are 4-digit numeric strings drawn uniformly over [1000, 9999]. They
// stand in for one-time SMS codes relayed to the customer; they are not a
// security boundary, so a non-cryptographic RNG is fine.

use async_trait::async_trait;
use rand::Rng;

use crate::error::Result;
use crate::traits::OtpChannel;

/// Inclusive range for generated codes. Keeps every code exactly 4 digits.
pub const OTP_MIN: u32 = 1000;
pub const OTP_MAX: u32 = 9999;

/// What a dispatched code gates: starting the visit or closing it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPurpose {
    Start,
    Closing,
}

impl std::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OtpPurpose::Start => write!(f, "start"),
            OtpPurpose::Closing => write!(f, "closing"),
        }
    }
}

/// Source of fresh OTP codes
///
/// A trait so tests can substitute a deterministic sequence.
pub trait OtpGenerator: Send + Sync {
    /// Produce a fresh 4-digit numeric code
    fn generate(&self) -> String;
}

/// Default generator backed by the thread-local RNG
#[derive(Debug, Default, Clone)]
pub struct RandomOtpGenerator;

impl RandomOtpGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl OtpGenerator for RandomOtpGenerator {
    fn generate(&self) -> String {
        rand::thread_rng().gen_range(OTP_MIN..=OTP_MAX).to_string()
    }
}

/// Simulated SMS delivery: logs the code instead of sending it
///
/// This is the explicit simulation seam. The engine relays every generated
/// code through an [`OtpChannel`]; swapping this mock for a real SMS or push
/// dispatcher changes delivery without touching the state machine. The API
/// additionally echoes the code back in responses so an operator can read it
/// off-channel during demos.
#[derive(Debug, Default, Clone)]
pub struct MockSmsChannel;

impl MockSmsChannel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OtpChannel for MockSmsChannel {
    async fn send(&self, purpose: OtpPurpose, code: &str) -> Result<()> {
        tracing::info!(%purpose, code, "[mock sms] OTP for customer");
        Ok(())
    }
}
