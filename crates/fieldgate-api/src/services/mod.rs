// Services layer for business logic
// Services own DTO-to-engine translation, calling the lifecycle engine directly

pub mod event;

pub use event::EventService;
