use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::MoodError;

use super::{ExpressionDistribution, MoodLabel};

/// The winning label of a distribution and its score as a whole percentage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RankedMood {
    pub mood: MoodLabel,
    pub confidence: u8,
}

/// Picks the dominant expression.
///
/// Highest score wins; equal scores resolve to the label that comes first in
/// canonical order, so the result never depends on how the producer ordered
/// its output.
pub fn rank(distribution: &ExpressionDistribution) -> Result<RankedMood, MoodError> {
    let ranked = ranking(distribution)?;
    let (mood, score) = ranked[0];
    Ok(RankedMood {
        mood,
        confidence: to_percent(score),
    })
}

/// Every label of the distribution sorted by (score desc, canonical order asc).
pub fn ranking(distribution: &ExpressionDistribution) -> Result<Vec<(MoodLabel, f64)>, MoodError> {
    if distribution.is_empty() {
        return Err(MoodError::NoFaceDetected);
    }
    if distribution.iter().any(|(_, score)| !score.is_finite()) {
        return Err(MoodError::NoFaceDetected);
    }

    let mut entries: Vec<(MoodLabel, f64)> = distribution.iter().collect();
    entries.sort_by(|(a_label, a_score), (b_label, b_score)| {
        b_score
            .partial_cmp(a_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a_label.cmp(b_label))
    });
    Ok(entries)
}

/// Round-half-up of `score * 100`, clamped to a valid percentage.
pub fn to_percent(score: f64) -> u8 {
    let scaled = (score * 100.0 + 0.5).floor();
    scaled.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> ExpressionDistribution {
        ExpressionDistribution::from_scores([
            (MoodLabel::Happy, 0.2),
            (MoodLabel::Sad, 0.9),
            (MoodLabel::Angry, 0.1),
            (MoodLabel::Surprised, 0.05),
            (MoodLabel::Fearful, 0.05),
            (MoodLabel::Disgusted, 0.05),
            (MoodLabel::Neutral, 0.3),
        ])
    }

    #[test]
    fn picks_sad_at_ninety() {
        let ranked = rank(&scenario()).unwrap();
        assert_eq!(
            ranked,
            RankedMood {
                mood: MoodLabel::Sad,
                confidence: 90
            }
        );
    }

    #[test]
    fn winner_is_never_beaten() {
        let samples = [
            [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7],
            [0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1],
            [0.0, 0.0, 0.99, 0.0, 0.01, 0.0, 0.0],
            [0.33, 0.12, 0.33, 0.01, 0.0, 0.2, 0.01],
        ];
        for scores in samples {
            let dist = ExpressionDistribution::from_scores(
                MoodLabel::ALL.into_iter().zip(scores),
            );
            let ranked = rank(&dist).unwrap();
            let winner_score = dist.score(ranked.mood).unwrap();
            assert!(dist.iter().all(|(_, score)| winner_score >= score));
        }
    }

    #[test]
    fn ties_resolve_by_canonical_order() {
        let forward = ExpressionDistribution::from_raw([
            ("angry", 0.4),
            ("surprised", 0.4),
            ("happy", 0.1),
        ]);
        let backward = ExpressionDistribution::from_raw([
            ("surprised", 0.4),
            ("happy", 0.1),
            ("angry", 0.4),
        ]);
        assert_eq!(rank(&forward).unwrap().mood, MoodLabel::Angry);
        assert_eq!(rank(&forward).unwrap(), rank(&backward).unwrap());
    }

    #[test]
    fn full_ranking_is_sorted() {
        let order: Vec<MoodLabel> = ranking(&scenario())
            .unwrap()
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(
            order,
            vec![
                MoodLabel::Sad,
                MoodLabel::Neutral,
                MoodLabel::Happy,
                MoodLabel::Angry,
                MoodLabel::Surprised,
                MoodLabel::Fearful,
                MoodLabel::Disgusted,
            ]
        );
    }

    #[test]
    fn empty_or_malformed_means_no_face() {
        assert_eq!(
            rank(&ExpressionDistribution::new()),
            Err(MoodError::NoFaceDetected)
        );
        let nan = ExpressionDistribution::from_scores([
            (MoodLabel::Happy, f64::NAN),
            (MoodLabel::Sad, 0.2),
        ]);
        assert_eq!(rank(&nan), Err(MoodError::NoFaceDetected));
    }

    #[test]
    fn percent_rounds_half_up_and_clamps() {
        assert_eq!(to_percent(0.125), 13);
        assert_eq!(to_percent(0.124), 12);
        assert_eq!(to_percent(0.0), 0);
        assert_eq!(to_percent(1.0), 100);
        assert_eq!(to_percent(1.7), 100);
        assert_eq!(to_percent(-0.3), 0);
    }
}
