use serde::Serialize;

use super::MoodLabel;

/// Display data the UI shows next to a mood.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoodProfile {
    pub mood: MoodLabel,
    pub emoji: &'static str,
    pub quote: &'static str,
    /// Wellbeing tip shown in the insights panel.
    pub suggestion: &'static str,
}

impl MoodLabel {
    pub fn profile(&self) -> MoodProfile {
        let (emoji, quote, suggestion) = match self {
            MoodLabel::Happy => (
                "😊",
                "Happiness radiates from within like sunshine.",
                "Keep spreading positivity! Try journaling your good moments.",
            ),
            MoodLabel::Sad => (
                "😢",
                "Every storm eventually clears to reveal the rainbow.",
                "It’s okay to feel low. Listen to calming music or talk to a friend.",
            ),
            MoodLabel::Angry => (
                "😠",
                "In the depths of calm lies your greatest strength.",
                "Take a deep breath. Try a short walk or breathing exercise.",
            ),
            MoodLabel::Surprised => (
                "😲",
                "Life's surprises are the universe's way of keeping us curious.",
                "Use your energy creatively—draw or write something fun.",
            ),
            MoodLabel::Fearful => (
                "😨",
                "Courage isn't the absence of fear, it's moving forward despite it.",
                "Try grounding techniques. A quick meditation can help.",
            ),
            MoodLabel::Disgusted => (
                "🤢",
                "Sometimes we must feel disgust to appreciate beauty.",
                "Engage in something that makes you feel calm and safe.",
            ),
            MoodLabel::Neutral => (
                "😐",
                "In stillness, we find our center and inner peace.",
                "Consider reflecting or taking a short break.",
            ),
        };

        MoodProfile {
            mood: *self,
            emoji,
            quote,
            suggestion,
        }
    }
}

/// Profiles for every label, canonical order.
pub fn palette() -> Vec<MoodProfile> {
    MoodLabel::ALL.iter().map(MoodLabel::profile).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_covers_every_label_once() {
        let palette = palette();
        assert_eq!(palette.len(), MoodLabel::ALL.len());
        for (profile, label) in palette.iter().zip(MoodLabel::ALL) {
            assert_eq!(profile.mood, label);
            assert!(!profile.quote.is_empty());
            assert!(!profile.suggestion.is_empty());
        }
    }

    #[test]
    fn suggestions_keep_their_punctuation() {
        assert_eq!(
            MoodLabel::Sad.profile().suggestion,
            "It’s okay to feel low. Listen to calming music or talk to a friend."
        );
        assert_eq!(
            MoodLabel::Surprised.profile().suggestion,
            "Use your energy creatively—draw or write something fun."
        );
    }
}
