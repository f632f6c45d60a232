//! Headliner decision matrix
//!
//! Each candidate is scored on six criteria. The raw ranking score is
//! rescaled to 0-100 against the best candidate, the other five criteria are
//! already on a 0-100 scale. The total is the weighted sum.

use headliner_common::config::DecisionWeights;
use headliner_common::{Error, Result};
use serde::Serialize;
use tracing::debug;

/// One row of the decision matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionCandidate {
    pub artist: String,
    /// Raw ranking score, any positive scale
    pub ranking_score: f64,
    pub genre_match: f64,
    pub target_demo_match: f64,
    pub tour_availability: f64,
    pub cost_effectiveness: f64,
    pub social_engagement: f64,
}

impl DecisionCandidate {
    fn criteria(&self) -> [f64; 5] {
        [
            self.genre_match,
            self.target_demo_match,
            self.tour_availability,
            self.cost_effectiveness,
            self.social_engagement,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionContribution {
    pub criterion: &'static str,
    /// Value on the 0-100 scale
    pub value: f64,
    pub weighted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionOutcome {
    pub artist: String,
    pub contributions: Vec<CriterionContribution>,
    pub total_score: f64,
}

impl DecisionOutcome {
    pub fn contribution(&self, criterion: &str) -> Option<&CriterionContribution> {
        self.contributions.iter().find(|c| c.criterion == criterion)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecisionMatrix {
    weights: DecisionWeights,
}

impl DecisionMatrix {
    pub fn new(weights: DecisionWeights) -> Self {
        Self { weights }
    }

    /// The five finalists weighed by the dashboard
    pub fn default_candidates() -> Vec<DecisionCandidate> {
        // (artist, ranking score, genre, demographic, availability, cost, social)
        let rows: [(&str, f64, [f64; 5]); 5] = [
            ("Sabrina Carpenter", 814.86, [95.0, 95.0, 90.0, 85.0, 95.0]),
            ("Taylor Swift", 719.34, [90.0, 85.0, 60.0, 50.0, 90.0]),
            ("Chappell Roan", 565.93, [85.0, 90.0, 85.0, 90.0, 85.0]),
            ("Billie Eilish", 489.15, [80.0, 90.0, 70.0, 75.0, 90.0]),
            ("Zach Bryan", 547.12, [60.0, 70.0, 80.0, 80.0, 75.0]),
        ];
        rows.iter()
            .map(|(artist, ranking_score, c)| DecisionCandidate {
                artist: artist.to_string(),
                ranking_score: *ranking_score,
                genre_match: c[0],
                target_demo_match: c[1],
                tour_availability: c[2],
                cost_effectiveness: c[3],
                social_engagement: c[4],
            })
            .collect()
    }

    /// Score every candidate, best total first (stable on ties)
    ///
    /// # Errors
    /// `Data` if there are no candidates, the best ranking score is not
    /// positive, or a criterion value is outside 0-100.
    pub fn evaluate(&self, candidates: &[DecisionCandidate]) -> Result<Vec<DecisionOutcome>> {
        if candidates.is_empty() {
            return Err(Error::data("decision matrix has no candidates"));
        }
        let max_score = candidates
            .iter()
            .map(|c| c.ranking_score)
            .fold(f64::NEG_INFINITY, f64::max);
        if !(max_score.is_finite() && max_score > 0.0) {
            return Err(Error::data(format!(
                "best ranking score must be positive, got {}",
                max_score
            )));
        }

        let names = self.weights.named();
        let mut outcomes = candidates
            .iter()
            .map(|candidate| {
                if let Some(bad) = candidate
                    .criteria()
                    .iter()
                    .find(|v| !(0.0..=100.0).contains(*v))
                {
                    return Err(Error::data(format!(
                        "criterion value {} for '{}' is outside 0-100",
                        bad, candidate.artist
                    )));
                }

                let mut values = vec![candidate.ranking_score / max_score * 100.0];
                values.extend(candidate.criteria());

                let contributions: Vec<CriterionContribution> = names
                    .iter()
                    .zip(values)
                    .map(|(&(criterion, weight), value)| CriterionContribution {
                        criterion,
                        value,
                        weighted: value * weight,
                    })
                    .collect();
                let total_score = contributions.iter().map(|c| c.weighted).sum();

                Ok(DecisionOutcome {
                    artist: candidate.artist.clone(),
                    contributions,
                    total_score,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        outcomes.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        debug!("Decision matrix evaluated {} candidates", outcomes.len());
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matrix_picks_sabrina() {
        let outcomes = DecisionMatrix::default()
            .evaluate(&DecisionMatrix::default_candidates())
            .unwrap();

        assert_eq!(outcomes[0].artist, "Sabrina Carpenter");
        // 0.3*100 + 0.2*95 + 0.2*95 + 0.1*90 + 0.1*85 + 0.1*95
        assert!((outcomes[0].total_score - 95.0).abs() < 1e-9);
        let ranking = outcomes[0].contribution("ranking_score").unwrap();
        assert!((ranking.value - 100.0).abs() < 1e-9);
        assert!((ranking.weighted - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_ranking_score_rescaled_to_best() {
        let outcomes = DecisionMatrix::default()
            .evaluate(&DecisionMatrix::default_candidates())
            .unwrap();
        let taylor = outcomes.iter().find(|o| o.artist == "Taylor Swift").unwrap();
        let value = taylor.contribution("ranking_score").unwrap().value;
        assert!((value - 719.34 / 814.86 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_totals_descending() {
        let outcomes = DecisionMatrix::default()
            .evaluate(&DecisionMatrix::default_candidates())
            .unwrap();
        for pair in outcomes.windows(2) {
            assert!(pair[0].total_score >= pair[1].total_score);
        }
    }

    #[test]
    fn test_out_of_range_criterion_rejected() {
        let mut candidates = DecisionMatrix::default_candidates();
        candidates[1].genre_match = 140.0;
        assert!(matches!(
            DecisionMatrix::default().evaluate(&candidates),
            Err(Error::Data(_))
        ));
    }

    #[test]
    fn test_empty_or_zero_scores_rejected() {
        assert!(DecisionMatrix::default().evaluate(&[]).is_err());
        let mut candidates = DecisionMatrix::default_candidates();
        for c in &mut candidates {
            c.ranking_score = 0.0;
        }
        assert!(DecisionMatrix::default().evaluate(&candidates).is_err());
    }
}
