//! Similarity Engine
//!
//! K-nearest-neighbor lookup in standardized (z-score) feature space:
//!
//! 1. Standardize each of the eight feature columns over the full feature
//!    table, using the population standard deviation.
//! 2. Euclidean distance from the reference artist to every other artist.
//! 3. Stable ascending sort by distance; ties keep table order.
//! 4. `similarity_score = 1 - distance / max_distance`, where `max_distance`
//!    is taken over the returned neighbors only. Scores are therefore only
//!    comparable between lookups that used the same K.
//!
//! The reference artist is reported separately with distance 0 and a
//! similarity of exactly 1.0 by convention.

use crate::model::{
    Diagnostic, FeatureRecord, SimilarityResult, TableKind, FEATURE_COUNT, FEATURE_NAMES,
};
use crate::tables::FeatureTable;
use headliner_common::{Error, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Feature vectors after z-score standardization
#[derive(Debug, Clone, PartialEq)]
pub struct Standardized {
    pub means: [f64; FEATURE_COUNT],
    /// Population standard deviation per column
    pub std_devs: [f64; FEATURE_COUNT],
    /// One vector per input record, in input order
    pub vectors: Vec<[f64; FEATURE_COUNT]>,
    /// Columns whose raw values are all equal
    pub constant_columns: Vec<&'static str>,
}

/// Standardize every feature column over `records`
///
/// A column whose values are all equal standardizes to all zeros and is listed in
/// `constant_columns`.
///
/// # Errors
/// `Data` if fewer than two records are given.
pub fn standardize(records: &[FeatureRecord]) -> Result<Standardized> {
    if records.len() < 2 {
        return Err(Error::data(format!(
            "standardization needs at least 2 artists, got {}",
            records.len()
        )));
    }

    let raw: Vec<[f64; FEATURE_COUNT]> = records.iter().map(|r| r.features.to_vector()).collect();
    let n = raw.len() as f64;

    let mut means = [0.0; FEATURE_COUNT];
    let mut std_devs = [0.0; FEATURE_COUNT];
    let mut constant_columns = Vec::new();

    for col in 0..FEATURE_COUNT {
        let mean = raw.iter().map(|v| v[col]).sum::<f64>() / n;
        means[col] = mean;
        // Raw equality; repeated inexact values such as 0.1 leave rounding
        // residue in the variance
        let first = raw[0][col];
        if raw.iter().all(|v| v[col] == first) {
            warn!("Feature '{}' is constant, standardizing to zero", FEATURE_NAMES[col]);
            constant_columns.push(FEATURE_NAMES[col]);
            continue;
        }
        let variance = raw.iter().map(|v| (v[col] - mean).powi(2)).sum::<f64>() / n;
        std_devs[col] = variance.sqrt();
    }

    let vectors = raw
        .iter()
        .map(|v| {
            let mut z = [0.0; FEATURE_COUNT];
            for col in 0..FEATURE_COUNT {
                if std_devs[col] > 0.0 {
                    z[col] = (v[col] - means[col]) / std_devs[col];
                }
            }
            z
        })
        .collect();

    Ok(Standardized {
        means,
        std_devs,
        vectors,
        constant_columns,
    })
}

/// Euclidean distance between two feature vectors
pub fn euclidean(a: &[f64; FEATURE_COUNT], b: &[f64; FEATURE_COUNT]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Outcome of one nearest-neighbor lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityReport {
    /// The reference artist itself (distance 0, similarity 1.0)
    pub reference: SimilarityResult,
    /// Most similar first
    pub neighbors: Vec<SimilarityResult>,
    pub requested_k: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl SimilarityReport {
    /// Reference row followed by the neighbors, as shown in comparison tables
    pub fn rows(&self) -> impl Iterator<Item = &SimilarityResult> {
        std::iter::once(&self.reference).chain(self.neighbors.iter())
    }
}

/// Stateless KNN lookup over a feature table
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityEngine;

impl SimilarityEngine {
    pub fn new() -> Self {
        Self
    }

    /// The `min(k, N - 1)` artists closest to `reference`
    ///
    /// # Errors
    /// - `InvalidInput` if `k == 0`
    /// - `Data` if the table has fewer than two artists or lacks `reference`
    pub fn find_similar(
        &self,
        table: &FeatureTable,
        reference: &str,
        k: usize,
    ) -> Result<SimilarityReport> {
        let candidates: Vec<usize> = (0..table.len()).collect();
        self.lookup(table, reference, &candidates, k, Vec::new())
    }

    /// Like [`find_similar`](Self::find_similar), restricted to `candidates`
    ///
    /// Standardization still runs over the whole table. Candidates missing
    /// from the table are dropped and reported as join mismatches; the
    /// reference itself and repeated names are ignored.
    pub fn find_similar_among(
        &self,
        table: &FeatureTable,
        reference: &str,
        candidates: &[String],
        k: usize,
    ) -> Result<SimilarityReport> {
        let mut indices = Vec::new();
        let mut diagnostics = Vec::new();
        for name in candidates {
            match table.position(name) {
                Some(idx) if !indices.contains(&idx) => indices.push(idx),
                Some(_) => {}
                None => {
                    warn!("Comparison artist '{}' not in feature table, skipping", name);
                    diagnostics.push(Diagnostic::join_mismatch(name.as_str(), TableKind::Features));
                }
            }
        }
        // Keep table order so distance ties resolve the same way as an
        // unrestricted lookup
        indices.sort_unstable();
        self.lookup(table, reference, &indices, k, diagnostics)
    }

    fn lookup(
        &self,
        table: &FeatureTable,
        reference: &str,
        candidates: &[usize],
        k: usize,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Result<SimilarityReport> {
        if k == 0 {
            return Err(Error::InvalidInput("k must be at least 1".to_string()));
        }
        let records = table.records();
        let standardized = standardize(records)?;
        let ref_idx = table.position(reference).ok_or_else(|| {
            Error::data(format!("reference artist '{}' not found in feature table", reference))
        })?;

        diagnostics.extend(
            standardized
                .constant_columns
                .iter()
                .map(|&feature| Diagnostic::ConstantFeature { feature }),
        );

        let ref_vec = &standardized.vectors[ref_idx];
        let mut scored: Vec<(usize, f64)> = candidates
            .iter()
            .filter(|&&idx| idx != ref_idx)
            .map(|&idx| (idx, euclidean(ref_vec, &standardized.vectors[idx])))
            .collect();
        // sort_by is stable: equal distances keep candidate order
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        let max_distance = scored.iter().map(|(_, d)| *d).fold(0.0, f64::max);
        let neighbors: Vec<SimilarityResult> = scored
            .iter()
            .map(|&(idx, distance)| SimilarityResult {
                artist_name: records[idx].artist_name.clone(),
                distance,
                similarity_score: similarity_score(distance, max_distance),
                minimum_fee: records[idx].minimum_fee,
            })
            .collect();

        debug!(
            "Distances from '{}': {:?}",
            reference,
            neighbors.iter().map(|n| (&n.artist_name, n.distance)).collect::<Vec<_>>()
        );
        info!(
            "Found {} of {} requested neighbors for '{}'",
            neighbors.len(),
            k,
            reference
        );

        Ok(SimilarityReport {
            reference: SimilarityResult {
                artist_name: records[ref_idx].artist_name.clone(),
                distance: 0.0,
                similarity_score: 1.0,
                minimum_fee: records[ref_idx].minimum_fee,
            },
            neighbors,
            requested_k: k,
            diagnostics,
        })
    }
}

/// `1 - distance / max_distance`; every neighbor scores 1.0 when all
/// returned distances are zero
fn similarity_score(distance: f64, max_distance: f64) -> f64 {
    if max_distance > 0.0 {
        1.0 - distance / max_distance
    } else {
        1.0
    }
}
