use serde::{Deserialize, Serialize};

use crate::mood::MoodLabel;

/// Mini-games the UI can offer for a detected mood.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Activity {
    MoodMatch,
    ReactionTimer,
    GratitudeFlip,
    BubblePop,
    BreatheWithMe,
    QuickQuiz,
    MindfulMoment,
}

impl Activity {
    pub const FALLBACK: Activity = Activity::MindfulMoment;

    pub fn for_mood(mood: MoodLabel) -> Activity {
        match mood {
            MoodLabel::Happy => Activity::MoodMatch,
            MoodLabel::Neutral => Activity::ReactionTimer,
            MoodLabel::Sad => Activity::GratitudeFlip,
            MoodLabel::Angry => Activity::BubblePop,
            MoodLabel::Fearful => Activity::BreatheWithMe,
            MoodLabel::Surprised => Activity::QuickQuiz,
            MoodLabel::Disgusted => Activity::MindfulMoment,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Activity::MoodMatch => "mood-match",
            Activity::ReactionTimer => "reaction-timer",
            Activity::GratitudeFlip => "gratitude-flip",
            Activity::BubblePop => "bubble-pop",
            Activity::BreatheWithMe => "breathe-with-me",
            Activity::QuickQuiz => "quick-quiz",
            Activity::MindfulMoment => "mindful-moment",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Activity::MoodMatch => "Mood Match Game",
            Activity::ReactionTimer => "Reaction Timer",
            Activity::GratitudeFlip => "Gratitude Flip",
            Activity::BubblePop => "Bubble Pop",
            Activity::BreatheWithMe => "Breathe With Me",
            Activity::QuickQuiz => "Quick Quiz",
            Activity::MindfulMoment => "Try a Mindful Moment",
        }
    }
}

/// Lookup for mood text coming from outside the engine. Unknown text gets the
/// mindful fallback rather than the neutral game.
pub fn activity_for_label(raw: &str) -> Activity {
    MoodLabel::parse(raw)
        .map(Activity::for_mood)
        .unwrap_or(Activity::FALLBACK)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySuggestion {
    pub activity: Activity,
    pub id: &'static str,
    pub name: &'static str,
}

impl From<Activity> for ActivitySuggestion {
    fn from(activity: Activity) -> Self {
        Self {
            activity,
            id: activity.id(),
            name: activity.display_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_mood_has_an_activity() {
        let mapped: Vec<Activity> = MoodLabel::ALL.into_iter().map(Activity::for_mood).collect();
        assert_eq!(mapped.len(), 7);
        let distinct: HashSet<_> = mapped.iter().collect();
        assert_eq!(distinct.len(), 7);
        assert_eq!(Activity::for_mood(MoodLabel::Happy), Activity::MoodMatch);
        assert_eq!(Activity::for_mood(MoodLabel::Disgusted), Activity::MindfulMoment);
    }

    #[test]
    fn unknown_text_falls_back_to_mindful() {
        assert_eq!(activity_for_label("sad"), Activity::GratitudeFlip);
        assert_eq!(activity_for_label("bored"), Activity::MindfulMoment);
        assert_eq!(activity_for_label(""), Activity::MindfulMoment);
    }

    #[test]
    fn serialized_id_matches_id() {
        let json = serde_json::to_string(&Activity::BreatheWithMe).unwrap();
        assert_eq!(json, format!("\"{}\"", Activity::BreatheWithMe.id()));
    }
}
