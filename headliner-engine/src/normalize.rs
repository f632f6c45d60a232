//! Score Normalizer
//!
//! Min-max scales `frequency` and `rank_sum` across the whole input
//! population and combines the two normalized values into a ranking score:
//!
//! `ranking_score = scale * (frequency_weight * f + rank_sum_weight * r)`
//!
//! With non-negative weights the score is monotonically non-decreasing in
//! both components. The defaults (0.5 / 0.5 / 100) give the dashboard's
//! 0-100 scale.

use crate::model::ArtistRecord;
use headliner_common::config::RankingConfig;
use headliner_common::{Error, Result};

/// Weights of the ranking score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingWeights {
    pub frequency: f64,
    pub rank_sum: f64,
    pub scale: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            frequency: 0.5,
            rank_sum: 0.5,
            scale: 100.0,
        }
    }
}

impl From<&RankingConfig> for RankingWeights {
    fn from(config: &RankingConfig) -> Self {
        Self {
            frequency: config.frequency_weight,
            rank_sum: config.rank_sum_weight,
            scale: config.scale,
        }
    }
}

/// Pure min-max normalizer over a population of artists
#[derive(Debug, Clone, Default)]
pub struct ScoreNormalizer {
    weights: RankingWeights,
}

impl ScoreNormalizer {
    /// # Errors
    /// `InvalidInput` if a weight is negative or non-finite, or the scale is
    /// not positive.
    pub fn new(weights: RankingWeights) -> Result<Self> {
        for (name, w) in [("frequency", weights.frequency), ("rank_sum", weights.rank_sum)] {
            if !(w.is_finite() && w >= 0.0) {
                return Err(Error::InvalidInput(format!(
                    "{} weight must be non-negative, got {}",
                    name, w
                )));
            }
        }
        if !(weights.scale.is_finite() && weights.scale > 0.0) {
            return Err(Error::InvalidInput(format!(
                "scale must be positive, got {}",
                weights.scale
            )));
        }
        Ok(Self { weights })
    }

    pub fn weights(&self) -> RankingWeights {
        self.weights
    }

    pub fn ranking_score(&self, frequency_normalized: f64, rank_sum_normalized: f64) -> f64 {
        self.weights.scale
            * (self.weights.frequency * frequency_normalized
                + self.weights.rank_sum * rank_sum_normalized)
    }

    /// Normalize every record against the full input population
    ///
    /// Returns new records in input order; clusters are cleared because they
    /// depend on the normalized values.
    ///
    /// # Errors
    /// `Data` if the population is empty, or if either raw column is constant
    /// (which includes a single-record population).
    pub fn normalize(&self, records: &[ArtistRecord]) -> Result<Vec<ArtistRecord>> {
        let frequencies: Vec<f64> = records.iter().map(|r| r.frequency as f64).collect();
        let rank_sums: Vec<f64> = records.iter().map(|r| r.rank_sum).collect();

        let frequency_normalized = min_max(&frequencies)
            .map_err(|e| Error::data(format!("cannot normalize frequency: {}", e)))?;
        let rank_sum_normalized = min_max(&rank_sums)
            .map_err(|e| Error::data(format!("cannot normalize rank_sum: {}", e)))?;

        let normalized: Vec<ArtistRecord> = records
            .iter()
            .zip(frequency_normalized)
            .zip(rank_sum_normalized)
            .map(|((record, f), r)| ArtistRecord {
                frequency_normalized: f,
                rank_sum_normalized: r,
                ranking_score: self.ranking_score(f, r),
                cluster: None,
                ..record.clone()
            })
            .collect();

        tracing::debug!("Normalized {} artist records", normalized.len());
        Ok(normalized)
    }
}

/// Linear min-max scaling to [0, 1]
///
/// # Errors
/// `Data` if `values` is empty, contains a non-finite value, or has
/// `max == min`.
pub fn min_max(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(Error::data("empty population"));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::data("population contains a non-finite value"));
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range == 0.0 {
        return Err(Error::data(format!(
            "all {} values equal {}, range is zero",
            values.len(),
            min
        )));
    }
    Ok(values.iter().map(|v| (v - min) / range).collect())
}
