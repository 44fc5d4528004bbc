//! Derived views over a history snapshot.
//!
//! Everything that counts, orders or filters history lives here so the
//! canonical tie-break stays in one place.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::activity::Activity;
use crate::mood::MoodLabel;

use super::MoodSample;

pub const DEFAULT_RECENT: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoodTally {
    pub mood: MoodLabel,
    pub count: u32,
}

/// One point of the mood fluctuation chart.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub mood: MoodLabel,
    pub confidence: u8,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub duration_secs: u64,
    pub duration_label: String,
    pub detection_count: u32,
    pub most_frequent_mood: MoodLabel,
    pub last_detected_mood: MoodLabel,
    pub tallies: Vec<MoodTally>,
    pub suggested_activity: Activity,
    pub suggestion: &'static str,
}

/// Count per label for all seven labels, canonical order.
pub fn mood_tallies(history: &[MoodSample]) -> Vec<MoodTally> {
    let mut counts = [0u32; MoodLabel::ALL.len()];
    for sample in history {
        counts[sample.mood.index()] += 1;
    }

    MoodLabel::ALL
        .into_iter()
        .map(|mood| MoodTally {
            mood,
            count: counts[mood.index()],
        })
        .collect()
}

/// Label seen most often. Ties go to the earlier label in canonical order;
/// an empty history reads as `Neutral`.
pub fn most_frequent_mood(history: &[MoodSample]) -> MoodLabel {
    let mut best: Option<MoodTally> = None;
    for tally in mood_tallies(history) {
        if tally.count == 0 {
            continue;
        }
        match best {
            Some(current) if current.count >= tally.count => {}
            _ => best = Some(tally),
        }
    }
    best.map(|tally| tally.mood).unwrap_or_default()
}

pub fn last_detected_mood(history: &[MoodSample]) -> MoodLabel {
    history.last().map(|sample| sample.mood).unwrap_or_default()
}

/// Whole seconds since `start`, never negative.
pub fn session_duration(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - start).num_seconds().max(0) as u64
}

/// `"3m 7s"` style label used by the statistics panel.
pub fn format_duration(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}

/// The last `n` samples, most recent first.
pub fn recent_view(history: &[MoodSample], n: usize) -> Vec<MoodSample> {
    history.iter().rev().take(n).copied().collect()
}

pub fn confidence_series(history: &[MoodSample]) -> Vec<ChartPoint> {
    history
        .iter()
        .map(|sample| ChartPoint {
            timestamp: sample.timestamp,
            mood: sample.mood,
            confidence: sample.confidence,
        })
        .collect()
}

pub fn session_stats(
    history: &[MoodSample],
    detection_count: u32,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> SessionStats {
    let duration_secs = session_duration(start, now);
    let last = last_detected_mood(history);

    SessionStats {
        duration_secs,
        duration_label: format_duration(duration_secs),
        detection_count,
        most_frequent_mood: most_frequent_mood(history),
        last_detected_mood: last,
        tallies: mood_tallies(history),
        suggested_activity: Activity::for_mood(last),
        suggestion: last.profile().suggestion,
    }
}
