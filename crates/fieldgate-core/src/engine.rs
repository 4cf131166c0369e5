// Event lifecycle engine
//
// Owns the Event state machine:
//
//   NOT_STARTED --check_in--> CHECKED_IN --verify_start_otp--> IN_PROGRESS
//   IN_PROGRESS --update_progress (any number)--> IN_PROGRESS
//   IN_PROGRESS --complete_event--> COMPLETED (terminal)
//
// Every gated edge has a companion mismatch self-loop that performs no
// mutation. Each operation is one store fetch (except check_in) plus one
// full-record write; atomicity per record belongs to the store.

use std::sync::Arc;
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::event::{CheckInRecord, EncodedPhoto, Event, EventStatus, NewEvent};
use crate::otp::{MockSmsChannel, OtpGenerator, OtpPurpose, RandomOtpGenerator};
use crate::traits::{EventStore, OtpChannel};

/// Input for the check-in operation
#[derive(Debug, Clone)]
pub struct CheckInRequest {
    pub vendor_name: String,
    /// Self-contained encoded image captured at the door.
    pub photo: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Outcome of a successful check-in
#[derive(Debug, Clone)]
pub struct CheckInReceipt {
    pub event_id: Uuid,
    /// The freshly issued start code. Echoed to the caller because delivery
    /// is simulated; a real channel would carry it to the customer instead.
    pub start_otp: String,
}

/// The lifecycle engine, generic over its store and OTP backends
pub struct LifecycleEngine {
    store: Arc<dyn EventStore>,
    generator: Arc<dyn OtpGenerator>,
    channel: Arc<dyn OtpChannel>,
}

impl LifecycleEngine {
    /// Create an engine with the default OTP backends (random codes, mock SMS)
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            generator: Arc::new(RandomOtpGenerator::new()),
            channel: Arc::new(MockSmsChannel::new()),
        }
    }

    /// Substitute the OTP generator (deterministic sequences in tests)
    pub fn with_generator(mut self, generator: Arc<dyn OtpGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Substitute the delivery channel (a real SMS dispatcher, or a recorder)
    pub fn with_channel(mut self, channel: Arc<dyn OtpChannel>) -> Self {
        self.channel = channel;
        self
    }

    /// Step 1: vendor check-in
    ///
    /// Validates inputs, issues the start OTP, relays it through the channel,
    /// and creates the record already in CHECKED_IN. A store failure leaves
    /// no partial record: the single create either lands or it doesn't.
    pub async fn check_in(&self, req: CheckInRequest) -> Result<CheckInReceipt> {
        if req.vendor_name.trim().is_empty() {
            return Err(EngineError::validation("vendorName must not be empty"));
        }
        let photo = EncodedPhoto::new(req.photo)?;
        if !req.latitude.is_finite() || !req.longitude.is_finite() {
            return Err(EngineError::validation(
                "latitude and longitude must be finite numbers",
            ));
        }

        let start_otp = self.generator.generate();
        self.channel.send(OtpPurpose::Start, &start_otp).await?;

        let event = self
            .store
            .create(NewEvent {
                vendor_name: req.vendor_name,
                status: EventStatus::CheckedIn,
                check_in: Some(CheckInRecord {
                    photo,
                    latitude: req.latitude,
                    longitude: req.longitude,
                    timestamp: chrono::Utc::now(),
                }),
                start_otp: Some(start_otp.clone()),
            })
            .await?;

        tracing::debug!(event_id = %event.id, vendor = %event.vendor_name, "vendor checked in");

        Ok(CheckInReceipt {
            event_id: event.id,
            start_otp,
        })
    }

    /// Step 2: verify the start OTP and move the event to IN_PROGRESS
    ///
    /// The code is compared, not consumed: a replay of the correct code
    /// succeeds again. Only OTP equality gates this edge; prior status is
    /// deliberately not checked (matches the permissive upstream contract).
    pub async fn verify_start_otp(&self, event_id: Uuid, otp: &str) -> Result<()> {
        let mut event = self.get_event(event_id).await?;

        if event.start_otp.as_deref() != Some(otp) {
            return Err(EngineError::OtpMismatch);
        }

        event.status = EventStatus::InProgress;
        self.store.update(&event).await?;
        tracing::debug!(%event_id, "event started");
        Ok(())
    }

    /// Step 3: attach progress artifacts and issue a fresh closing OTP
    ///
    /// Photos append; notes overwrite. The closing code is regenerated on
    /// every call, so each call invalidates the previously issued one.
    pub async fn update_progress(
        &self,
        event_id: Uuid,
        photo: Option<String>,
        notes: Option<String>,
    ) -> Result<String> {
        let mut event = self.get_event(event_id).await?;

        if let Some(photo) = photo {
            event.setup_photos.push(EncodedPhoto::new(photo)?);
        }
        if let Some(notes) = notes {
            event.notes = Some(notes);
        }

        let end_otp = self.generator.generate();
        self.channel.send(OtpPurpose::Closing, &end_otp).await?;
        event.end_otp = Some(end_otp.clone());

        self.store.update(&event).await?;
        tracing::debug!(%event_id, "progress updated, closing OTP reissued");
        Ok(end_otp)
    }

    /// Step 4: verify the latest closing OTP and complete the event
    ///
    /// On a match, status and the denormalized `is_completed` flag change
    /// together in one record write, so they can never diverge.
    pub async fn complete_event(&self, event_id: Uuid, otp: &str) -> Result<()> {
        let mut event = self.get_event(event_id).await?;

        if event.end_otp.as_deref() != Some(otp) {
            return Err(EngineError::OtpMismatch);
        }

        event.status = EventStatus::Completed;
        event.is_completed = true;
        self.store.update(&event).await?;
        tracing::debug!(%event_id, "event completed");
        Ok(())
    }

    /// Fetch an event, mapping a missing id to `NotFound`
    pub async fn get_event(&self, event_id: Uuid) -> Result<Event> {
        self.store
            .fetch(event_id)
            .await?
            .ok_or_else(|| EngineError::not_found(event_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryEventStore;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Hands out a scripted sequence of codes
    struct ScriptedOtpGenerator {
        codes: Mutex<VecDeque<&'static str>>,
    }

    impl ScriptedOtpGenerator {
        fn new(codes: &[&'static str]) -> Arc<Self> {
            Arc::new(Self {
                codes: Mutex::new(codes.iter().copied().collect()),
            })
        }
    }

    impl OtpGenerator for ScriptedOtpGenerator {
        fn generate(&self) -> String {
            self.codes
                .lock()
                .unwrap()
                .pop_front()
                .expect("script exhausted")
                .to_string()
        }
    }

    /// Records every dispatched code instead of delivering it
    #[derive(Default)]
    struct RecordingChannel {
        sent: Mutex<Vec<(OtpPurpose, String)>>,
    }

    #[async_trait]
    impl OtpChannel for RecordingChannel {
        async fn send(&self, purpose: OtpPurpose, code: &str) -> Result<()> {
            self.sent.lock().unwrap().push((purpose, code.to_string()));
            Ok(())
        }
    }

    fn check_in_request(vendor: &str) -> CheckInRequest {
        CheckInRequest {
            vendor_name: vendor.to_string(),
            photo: "data:image/jpeg;base64,/9j/4AAQ".to_string(),
            latitude: 12.9,
            longitude: 77.6,
        }
    }

    fn engine_with(
        store: Arc<InMemoryEventStore>,
        codes: &[&'static str],
    ) -> (LifecycleEngine, Arc<RecordingChannel>) {
        let channel = Arc::new(RecordingChannel::default());
        let engine = LifecycleEngine::new(store)
            .with_generator(ScriptedOtpGenerator::new(codes))
            .with_channel(channel.clone());
        (engine, channel)
    }

    #[tokio::test]
    async fn check_in_creates_checked_in_event_with_four_digit_otp() {
        let store = Arc::new(InMemoryEventStore::new());
        let engine = LifecycleEngine::new(store.clone());

        let receipt = engine.check_in(check_in_request("Asha")).await.unwrap();

        assert_eq!(receipt.start_otp.len(), 4);
        assert!(receipt.start_otp.chars().all(|c| c.is_ascii_digit()));

        let event = engine.get_event(receipt.event_id).await.unwrap();
        assert_eq!(event.status, EventStatus::CheckedIn);
        assert_eq!(event.vendor_name, "Asha");
        assert_eq!(event.start_otp, Some(receipt.start_otp));
        assert!(!event.is_completed);
        let check_in = event.check_in.expect("check-in record");
        assert_eq!(check_in.latitude, 12.9);
        assert_eq!(check_in.longitude, 77.6);
    }

    #[tokio::test]
    async fn check_in_rejects_blank_vendor_name() {
        let store = Arc::new(InMemoryEventStore::new());
        let engine = LifecycleEngine::new(store.clone());

        let mut req = check_in_request("  ");
        let err = engine.check_in(req.clone()).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        req.vendor_name = "Asha".to_string();
        req.photo = String::new();
        let err = engine.check_in(req).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));

        // rejected before any state mutation
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn check_in_rejects_non_finite_coordinates() {
        let store = Arc::new(InMemoryEventStore::new());
        let engine = LifecycleEngine::new(store.clone());

        let mut req = check_in_request("Asha");
        req.latitude = f64::NAN;
        assert!(matches!(
            engine.check_in(req).await.unwrap_err(),
            EngineError::Validation(_)
        ));

        let mut req = check_in_request("Asha");
        req.longitude = f64::INFINITY;
        assert!(matches!(
            engine.check_in(req).await.unwrap_err(),
            EngineError::Validation(_)
        ));

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn verify_start_transitions_and_correct_code_replays() {
        let store = Arc::new(InMemoryEventStore::new());
        let (engine, _) = engine_with(store, &["4821", "9034"]);

        let receipt = engine.check_in(check_in_request("Asha")).await.unwrap();
        engine
            .verify_start_otp(receipt.event_id, "4821")
            .await
            .unwrap();
        let event = engine.get_event(receipt.event_id).await.unwrap();
        assert_eq!(event.status, EventStatus::InProgress);

        // The code is compared, not consumed: the same correct code succeeds again.
        engine
            .verify_start_otp(receipt.event_id, "4821")
            .await
            .unwrap();
        let event = engine.get_event(receipt.event_id).await.unwrap();
        assert_eq!(event.status, EventStatus::InProgress);
    }

    #[tokio::test]
    async fn verify_start_wrong_code_never_mutates() {
        let store = Arc::new(InMemoryEventStore::new());
        let (engine, _) = engine_with(store, &["4821"]);

        let receipt = engine.check_in(check_in_request("Asha")).await.unwrap();
        for _ in 0..5 {
            let err = engine
                .verify_start_otp(receipt.event_id, "0000")
                .await
                .unwrap_err();
            assert!(matches!(err, EngineError::OtpMismatch));
            let event = engine.get_event(receipt.event_id).await.unwrap();
            assert_eq!(event.status, EventStatus::CheckedIn);
        }
    }

    #[tokio::test]
    async fn verify_start_unknown_id_is_not_found() {
        let store = Arc::new(InMemoryEventStore::new());
        let engine = LifecycleEngine::new(store.clone());

        let unknown = Uuid::now_v7();
        let err = engine.verify_start_otp(unknown, "0000").await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(id) if id == unknown));
        // no record created or altered
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn update_progress_appends_photos_and_overwrites_notes() {
        let store = Arc::new(InMemoryEventStore::new());
        let (engine, _) = engine_with(store, &["4821", "1111", "2222"]);

        let receipt = engine.check_in(check_in_request("Asha")).await.unwrap();
        engine
            .verify_start_otp(receipt.event_id, "4821")
            .await
            .unwrap();

        engine
            .update_progress(
                receipt.event_id,
                Some("photo-1".to_string()),
                Some("first pass".to_string()),
            )
            .await
            .unwrap();
        engine
            .update_progress(
                receipt.event_id,
                Some("photo-2".to_string()),
                Some("setup done".to_string()),
            )
            .await
            .unwrap();

        let event = engine.get_event(receipt.event_id).await.unwrap();
        let photos: Vec<&str> = event.setup_photos.iter().map(|p| p.as_str()).collect();
        assert_eq!(photos, ["photo-1", "photo-2"]);
        assert_eq!(event.notes.as_deref(), Some("setup done"));
    }

    #[tokio::test]
    async fn update_progress_reissues_closing_code_every_call() {
        let store = Arc::new(InMemoryEventStore::new());
        let (engine, channel) = engine_with(store, &["4821", "1111", "2222"]);

        let receipt = engine.check_in(check_in_request("Asha")).await.unwrap();
        let first = engine
            .update_progress(receipt.event_id, None, None)
            .await
            .unwrap();
        let second = engine
            .update_progress(receipt.event_id, None, None)
            .await
            .unwrap();

        assert_eq!(first, "1111");
        assert_eq!(second, "2222");
        let event = engine.get_event(receipt.event_id).await.unwrap();
        assert_eq!(event.end_otp.as_deref(), Some("2222"));

        // Every issued code went through the delivery channel.
        let sent = channel.sent.lock().unwrap();
        assert_eq!(
            *sent,
            vec![
                (OtpPurpose::Start, "4821".to_string()),
                (OtpPurpose::Closing, "1111".to_string()),
                (OtpPurpose::Closing, "2222".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn complete_with_stale_closing_code_fails() {
        let store = Arc::new(InMemoryEventStore::new());
        let (engine, _) = engine_with(store, &["4821", "1111", "2222"]);

        let receipt = engine.check_in(check_in_request("Asha")).await.unwrap();
        engine
            .verify_start_otp(receipt.event_id, "4821")
            .await
            .unwrap();
        let stale = engine
            .update_progress(receipt.event_id, None, None)
            .await
            .unwrap();
        engine
            .update_progress(receipt.event_id, None, None)
            .await
            .unwrap();

        let err = engine
            .complete_event(receipt.event_id, &stale)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::OtpMismatch));

        let event = engine.get_event(receipt.event_id).await.unwrap();
        assert_eq!(event.status, EventStatus::InProgress);
        assert!(!event.is_completed);
    }

    #[tokio::test]
    async fn complete_sets_status_and_flag_together() {
        let store = Arc::new(InMemoryEventStore::new());
        let (engine, _) = engine_with(store, &["4821", "9034"]);

        let receipt = engine.check_in(check_in_request("Asha")).await.unwrap();
        engine
            .verify_start_otp(receipt.event_id, "4821")
            .await
            .unwrap();
        let closing = engine
            .update_progress(receipt.event_id, None, Some("setup done".to_string()))
            .await
            .unwrap();
        engine
            .complete_event(receipt.event_id, &closing)
            .await
            .unwrap();

        let event = engine.get_event(receipt.event_id).await.unwrap();
        assert_eq!(event.status, EventStatus::Completed);
        assert!(event.is_completed);
    }

    #[tokio::test]
    async fn complete_unknown_id_is_not_found() {
        let store = Arc::new(InMemoryEventStore::new());
        let engine = LifecycleEngine::new(store);

        let unknown = Uuid::now_v7();
        let err = engine.complete_event(unknown, "1234").await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(id) if id == unknown));
    }

    #[tokio::test]
    async fn full_visit_happy_path() {
        let store = Arc::new(InMemoryEventStore::new());
        let (engine, _) = engine_with(store, &["4821", "9034"]);

        let receipt = engine.check_in(check_in_request("Asha")).await.unwrap();
        assert_eq!(receipt.start_otp, "4821");

        engine
            .verify_start_otp(receipt.event_id, "4821")
            .await
            .unwrap();
        assert_eq!(
            engine.get_event(receipt.event_id).await.unwrap().status,
            EventStatus::InProgress
        );

        let closing = engine
            .update_progress(receipt.event_id, None, Some("setup done".to_string()))
            .await
            .unwrap();
        assert_eq!(closing, "9034");

        engine
            .complete_event(receipt.event_id, "9034")
            .await
            .unwrap();
        let event = engine.get_event(receipt.event_id).await.unwrap();
        assert_eq!(event.status, EventStatus::Completed);
        assert!(event.is_completed);
        assert_eq!(event.notes.as_deref(), Some("setup done"));
    }
}
