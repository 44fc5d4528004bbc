use crate::history::MoodSample;

use super::MoodSnapshot;

pub const STATE_CHANGED_EVENT: &str = "mood-state-changed";
pub const MOOD_DETECTED_EVENT: &str = "mood-detected";

/// Where the controller announces state changes. Implementations must not
/// block: they are called from the tick loop.
pub trait EventSink: Send + Sync {
    fn state_changed(&self, snapshot: &MoodSnapshot);
    fn mood_detected(&self, sample: &MoodSample);
}

#[cfg(feature = "desktop")]
pub use tauri_sink::TauriSink;

#[cfg(feature = "desktop")]
mod tauri_sink {
    use log::warn;
    use tauri::{AppHandle, Emitter};

    use super::*;

    pub struct TauriSink {
        app_handle: AppHandle,
    }

    impl TauriSink {
        pub fn new(app_handle: AppHandle) -> Self {
            Self { app_handle }
        }
    }

    impl EventSink for TauriSink {
        fn state_changed(&self, snapshot: &MoodSnapshot) {
            if let Err(err) = self.app_handle.emit(STATE_CHANGED_EVENT, snapshot) {
                warn!("failed to emit {STATE_CHANGED_EVENT}: {err}");
            }
        }

        fn mood_detected(&self, sample: &MoodSample) {
            if let Err(err) = self.app_handle.emit(MOOD_DETECTED_EVENT, sample) {
                warn!("failed to emit {MOOD_DETECTED_EVENT}: {err}");
            }
        }
    }
}

#[cfg(test)]
pub(crate) use recording::RecordingSink;

#[cfg(test)]
mod recording {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) states: Mutex<Vec<MoodSnapshot>>,
        pub(crate) detections: Mutex<Vec<MoodSample>>,
    }

    impl RecordingSink {
        pub(crate) fn states(&self) -> Vec<MoodSnapshot> {
            self.states.lock().unwrap().clone()
        }

        pub(crate) fn detections(&self) -> Vec<MoodSample> {
            self.detections.lock().unwrap().clone()
        }
    }

    impl EventSink for RecordingSink {
        fn state_changed(&self, snapshot: &MoodSnapshot) {
            self.states.lock().unwrap().push(snapshot.clone());
        }

        fn mood_detected(&self, sample: &MoodSample) {
            self.detections.lock().unwrap().push(*sample);
        }
    }
}
