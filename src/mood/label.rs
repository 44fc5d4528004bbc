use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven expressions the classifier reports.
///
/// Variant order is the canonical label order: it is the `Ord` of the enum and
/// the tie-break used everywhere a ranking has equal scores.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Happy,
    Sad,
    Angry,
    Surprised,
    Fearful,
    Disgusted,
    #[default]
    Neutral,
}

impl MoodLabel {
    pub const ALL: [MoodLabel; 7] = [
        MoodLabel::Happy,
        MoodLabel::Sad,
        MoodLabel::Angry,
        MoodLabel::Surprised,
        MoodLabel::Fearful,
        MoodLabel::Disgusted,
        MoodLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Happy => "happy",
            MoodLabel::Sad => "sad",
            MoodLabel::Angry => "angry",
            MoodLabel::Surprised => "surprised",
            MoodLabel::Fearful => "fearful",
            MoodLabel::Disgusted => "disgusted",
            MoodLabel::Neutral => "neutral",
        }
    }

    /// Position in the canonical order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Strict lookup. Case and surrounding whitespace are ignored.
    pub fn parse(raw: &str) -> Option<MoodLabel> {
        let raw = raw.trim();
        MoodLabel::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(raw))
    }

    /// Lookup for display paths: anything unrecognized reads as `Neutral`.
    pub fn normalize(raw: &str) -> MoodLabel {
        Self::parse(raw).unwrap_or_default()
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMood(pub String);

impl fmt::Display for UnknownMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mood label: {}", self.0)
    }
}

impl std::error::Error for UnknownMood {}

impl FromStr for MoodLabel {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoodLabel::parse(s).ok_or_else(|| UnknownMood(s.to_string()))
    }
}
