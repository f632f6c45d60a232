//! Dashboard report assembly
//!
//! Runs every computation once over a [`Dataset`] and collects the fully
//! derived records the rendering layer consumes. A failed similarity lookup
//! is captured in the report instead of aborting it.

use crate::cluster::{self, ClusterAssigner, ClusterSummary};
use crate::decision::{DecisionMatrix, DecisionOutcome};
use crate::join::{self, JoinReport};
use crate::model::{ArtistRecord, Diagnostic};
use crate::normalize::{RankingWeights, ScoreNormalizer};
use crate::ranking::RankingOverview;
use crate::selection::SelectionComparison;
use crate::similarity::{SimilarityEngine, SimilarityReport};
use crate::tables::Dataset;
use headliner_common::{Result, TomlConfig};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::{info, warn};

/// Similarity section: a report, or why it could not be produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SimilaritySection {
    Ok(SimilarityReport),
    Failed { reference: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub overview: RankingOverview,
    /// Cohort with clusters assigned, by source-table rank
    pub cohort: Vec<ArtistRecord>,
    pub clusters: Vec<ClusterSummary>,
    pub selection: SelectionComparison,
    pub similarity: SimilaritySection,
    pub decision: Vec<DecisionOutcome>,
    pub join: JoinReport,
    /// Every diagnostic raised while building the report
    pub diagnostics: Vec<Diagnostic>,
}

impl DashboardReport {
    /// # Errors
    /// Propagates `Data`/`InvalidInput` from normalization, clustering and
    /// the decision matrix; similarity failures are recorded instead.
    pub fn build(dataset: &Dataset, config: &TomlConfig) -> Result<Self> {
        let normalizer = ScoreNormalizer::new(RankingWeights::from(&config.ranking))?;
        let normalized = normalizer.normalize(dataset.artists.records())?;

        let overview = RankingOverview::build(&normalized, config.ranking.top_n);

        let cohort = cluster::select_cohort(
            &normalized,
            config.cohort.max_rank,
            &config.cohort.always_include,
        );
        let clustered = if cohort.members.is_empty() {
            warn!("Cohort is empty, skipping cluster assignment");
            Vec::new()
        } else {
            ClusterAssigner::new().assign(&cohort.members)?
        };
        let clusters = cluster::summarize(&clustered);

        let selection = SelectionComparison::build(
            &clustered,
            &config.selection.headliner,
            &config.selection.opener,
            config.selection.alternatives,
        );

        let reference = &config.similarity.reference;
        let similarity = match SimilarityEngine::new().find_similar(
            &dataset.features,
            reference,
            config.similarity.k,
        ) {
            Ok(report) => SimilaritySection::Ok(report),
            Err(e) => {
                warn!("Similarity lookup for '{}' failed: {}", reference, e);
                SimilaritySection::Failed {
                    reference: reference.clone(),
                    error: e.to_string(),
                }
            }
        };

        let decision =
            DecisionMatrix::new(config.decision).evaluate(&DecisionMatrix::default_candidates())?;

        let join = join::join(&normalized, &dataset.features);

        let mut diagnostics = cohort.diagnostics.clone();
        diagnostics.extend(selection.diagnostics.iter().cloned());
        if let SimilaritySection::Ok(report) = &similarity {
            diagnostics.extend(report.diagnostics.iter().cloned());
        }
        diagnostics.extend(join.diagnostics.iter().cloned());

        info!(
            "Report built: {} artists ranked, {} in cohort, {} diagnostics",
            normalized.len(),
            clustered.len(),
            diagnostics.len()
        );

        Ok(Self {
            overview,
            cohort: clustered,
            clusters,
            selection,
            similarity,
            decision,
            join,
            diagnostics,
        })
    }

    /// Plain-text rendering for terminals
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "== Top {} artists by ranking score", self.overview.entries.len())?;
        for (i, r) in self.overview.entries.iter().enumerate() {
            writeln!(
                out,
                "{:>3}. {:<24} {:>7.2}  (freq {:.3}, rank sum {:.3})",
                i + 1,
                r.name,
                r.ranking_score,
                r.frequency_normalized,
                r.rank_sum_normalized
            )?;
        }
        if let Some(points) = self.overview.lead_points {
            write!(out, "Lead over runner-up: {:.2} points", points)?;
            if let Some(percent) = self.overview.lead_percent {
                write!(out, " ({:.1}%)", percent)?;
            }
            writeln!(out)?;
        }

        writeln!(out, "\n== Clusters")?;
        for summary in &self.clusters {
            writeln!(
                out,
                "Cluster {} ({}): {} artists",
                summary.cluster.label(),
                summary.description,
                summary.count
            )?;
        }

        writeln!(out, "\n== Selection comparison")?;
        for r in self.selection.rows() {
            let label = r.cluster.map(|c| c.label().to_string()).unwrap_or_else(|| "-".to_string());
            writeln!(
                out,
                "{:<24} {:>7.2}  cluster {}",
                r.name, r.ranking_score, label
            )?;
        }

        writeln!(out, "\n== Similarity")?;
        match &self.similarity {
            SimilaritySection::Ok(report) => {
                for row in report.rows() {
                    writeln!(
                        out,
                        "{:<24} similarity {:.2}  distance {:.3}  fee ${}",
                        row.artist_name, row.similarity_score, row.distance, row.minimum_fee
                    )?;
                }
            }
            SimilaritySection::Failed { reference, error } => {
                writeln!(out, "No similarity results for '{}': {}", reference, error)?;
            }
        }

        writeln!(out, "\n== Decision matrix")?;
        for outcome in &self.decision {
            writeln!(out, "{:<24} {:>6.2}", outcome.artist, outcome.total_score)?;
        }

        if !self.diagnostics.is_empty() {
            writeln!(out, "\n== Diagnostics")?;
            for d in &self.diagnostics {
                writeln!(out, "- {}", d)?;
            }
        }
        Ok(())
    }
}
