use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::MoodLabel;

/// Per-label scores from a single classifier call.
///
/// Scores are nominally in `[0, 1]` but producers are not required to make
/// them sum to one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpressionDistribution {
    scores: BTreeMap<MoodLabel, f64>,
}

impl ExpressionDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (MoodLabel, f64)>,
    {
        Self {
            scores: scores.into_iter().collect(),
        }
    }

    /// Builds a distribution from untyped classifier output. Keys that are not
    /// mood labels are dropped.
    pub fn from_raw<I, K>(raw: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut scores = BTreeMap::new();
        for (key, score) in raw {
            match MoodLabel::parse(key.as_ref()) {
                Some(label) => {
                    scores.insert(label, score);
                }
                None => warn!("dropping unknown expression label {:?}", key.as_ref()),
            }
        }
        Self { scores }
    }

    pub fn set(&mut self, label: MoodLabel, score: f64) {
        self.scores.insert(label, score);
    }

    pub fn score(&self, label: MoodLabel) -> Option<f64> {
        self.scores.get(&label).copied()
    }

    /// Entries in canonical label order.
    pub fn iter(&self) -> impl Iterator<Item = (MoodLabel, f64)> + '_ {
        self.scores.iter().map(|(label, score)| (*label, *score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// True when every label carries a score.
    pub fn is_complete(&self) -> bool {
        self.scores.len() == MoodLabel::ALL.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_drops_unknown_keys() {
        let dist = ExpressionDistribution::from_raw([
            ("happy", 0.4),
            ("contempt", 0.9),
            ("Sad", 0.1),
        ]);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.score(MoodLabel::Happy), Some(0.4));
        assert_eq!(dist.score(MoodLabel::Sad), Some(0.1));
        assert!(!dist.is_complete());
    }

    #[test]
    fn iterates_in_canonical_order() {
        let dist = ExpressionDistribution::from_scores([
            (MoodLabel::Neutral, 0.1),
            (MoodLabel::Happy, 0.2),
            (MoodLabel::Angry, 0.3),
        ]);
        let labels: Vec<_> = dist.iter().map(|(label, _)| label).collect();
        assert_eq!(
            labels,
            vec![MoodLabel::Happy, MoodLabel::Angry, MoodLabel::Neutral]
        );
    }
}
