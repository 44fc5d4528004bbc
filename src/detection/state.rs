use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::{History, MoodSample};
use crate::mood::{MoodLabel, RankedMood};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DetectionStatus {
    #[default]
    Idle,
    Detecting,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub session_id: String,
    pub status: DetectionStatus,
    pub current_mood: MoodLabel,
    pub confidence: u8,
    pub detection_count: u32,
    pub face_detected: bool,
    pub session_start_time: DateTime<Utc>,
}

impl SessionState {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            status: DetectionStatus::Idle,
            current_mood: MoodLabel::Neutral,
            confidence: 0,
            detection_count: 0,
            face_detected: true,
            session_start_time: started_at,
        }
    }

    pub fn is_detecting(&self) -> bool {
        self.status == DetectionStatus::Detecting
    }

    /// Back to the display defaults. Identity and start time survive.
    pub fn reset(&mut self) {
        let session_id = std::mem::take(&mut self.session_id);
        *self = Self {
            session_id,
            ..Self::new(self.session_start_time)
        };
    }
}

/// Session data guarded as one unit by the controller.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    pub(crate) state: SessionState,
    pub(crate) history: History,
}

impl Session {
    pub(crate) fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            state: SessionState::new(started_at),
            history: History::new(),
        }
    }

    pub(crate) fn begin_detection(&mut self) {
        self.state.status = DetectionStatus::Detecting;
    }

    pub(crate) fn end_detection(&mut self) {
        self.state.status = DetectionStatus::Idle;
    }

    /// Records a successful read and ends the detection run.
    pub(crate) fn record(&mut self, ranked: RankedMood, at: DateTime<Utc>) -> MoodSample {
        let stored = self.history.push(MoodSample {
            mood: ranked.mood,
            confidence: ranked.confidence,
            timestamp: at,
        });

        self.state.detection_count = self.state.detection_count.saturating_add(1);
        self.state.face_detected = true;
        self.state.current_mood = stored.mood;
        self.state.confidence = stored.confidence;
        self.end_detection();
        stored
    }

    pub(crate) fn record_miss(&mut self) {
        self.state.face_detected = false;
    }

    pub(crate) fn reset(&mut self) {
        self.end_detection();
        self.history.clear();
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_session_starts_idle() {
        let state = SessionState::new(Utc::now());
        assert_eq!(DetectionStatus::default(), DetectionStatus::Idle);
        assert_eq!(state.status, DetectionStatus::default());
        assert_eq!(state.current_mood, MoodLabel::default());
    }

    #[test]
    fn record_updates_current_mood_and_stops() {
        let now = Utc::now();
        let mut session = Session::new(now);
        session.begin_detection();
        session.record(
            RankedMood {
                mood: MoodLabel::Surprised,
                confidence: 71,
            },
            now + Duration::seconds(2),
        );

        assert_eq!(session.state.current_mood, MoodLabel::Surprised);
        assert_eq!(session.state.confidence, 71);
        assert_eq!(session.state.detection_count, 1);
        assert!(!session.state.is_detecting());
        assert_eq!(session.history.len(), 1);
    }

    #[test]
    fn reset_keeps_identity_and_start_time() {
        let started = Utc::now() - Duration::minutes(3);
        let mut session = Session::new(started);
        let initial = session.state.clone();

        session.begin_detection();
        session.record_miss();
        session.record(
            RankedMood {
                mood: MoodLabel::Angry,
                confidence: 88,
            },
            Utc::now(),
        );
        session.reset();

        assert_eq!(session.state, initial);
        assert!(session.history.is_empty());
    }
}
