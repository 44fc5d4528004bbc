pub mod aggregate;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mood::MoodLabel;

pub use aggregate::{
    confidence_series, format_duration, last_detected_mood, mood_tallies, most_frequent_mood,
    recent_view, session_duration, session_stats, ChartPoint, MoodTally, SessionStats,
    DEFAULT_RECENT,
};

pub const HISTORY_CAPACITY: usize = 10;

/// One successful detection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoodSample {
    pub mood: MoodLabel,
    pub confidence: u8,
    pub timestamp: DateTime<Utc>,
}

/// The most recent detections, oldest first. Holds at most
/// [`HISTORY_CAPACITY`] samples; pushing past that evicts the oldest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    samples: Vec<MoodSample>,
}

impl History {
    pub fn new() -> Self {
        Self {
            samples: Vec::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Appends a sample and returns what was actually stored. Timestamps never
    /// go backwards: a sample older than the newest entry takes its time.
    pub fn push(&mut self, mut sample: MoodSample) -> MoodSample {
        if let Some(last) = self.samples.last() {
            if sample.timestamp < last.timestamp {
                sample.timestamp = last.timestamp;
            }
        }

        self.samples.push(sample);

        if self.samples.len() > HISTORY_CAPACITY {
            self.samples.remove(0);
        }

        sample
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn latest(&self) -> Option<&MoodSample> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[MoodSample] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(mood: MoodLabel, confidence: u8, timestamp: DateTime<Utc>) -> MoodSample {
        MoodSample {
            mood,
            confidence,
            timestamp,
        }
    }

    #[test]
    fn never_exceeds_capacity_and_evicts_oldest() {
        let start = Utc::now();
        let mut history = History::new();
        for i in 0..25u8 {
            history.push(sample(
                MoodLabel::ALL[i as usize % 7],
                i,
                start + Duration::seconds(i as i64),
            ));
            assert!(history.len() <= HISTORY_CAPACITY);
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        let confidences: Vec<u8> = history.as_slice().iter().map(|s| s.confidence).collect();
        assert_eq!(confidences, (15..25).collect::<Vec<u8>>());
    }

    #[test]
    fn timestamps_do_not_go_backwards() {
        let now = Utc::now();
        let mut history = History::new();
        history.push(sample(MoodLabel::Happy, 80, now));
        let stored = history.push(sample(MoodLabel::Sad, 60, now - Duration::seconds(5)));

        assert_eq!(stored.timestamp, now);
        assert_eq!(history.latest().map(|s| s.mood), Some(MoodLabel::Sad));
    }
}
