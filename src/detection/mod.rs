#[cfg(feature = "desktop")]
pub mod commands;
pub mod controller;
pub mod events;
mod loop_worker;
pub mod state;

pub use controller::{DetectionController, MoodSnapshot, Readiness};
pub use events::EventSink;
pub use state::{DetectionStatus, SessionState};
