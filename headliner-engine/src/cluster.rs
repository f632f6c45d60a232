//! Cluster Assigner
//!
//! Deterministic threshold cascade over the two normalized metrics. This is
//! a rule cascade, not an unsupervised clustering algorithm:
//!
//! 1. `frequency_normalized > 0.7 && rank_sum_normalized > 0.4` → cluster 1
//! 2. otherwise `frequency_normalized > 0.3` → cluster 2
//! 3. otherwise → cluster 3
//!
//! Rule 1 always wins over rule 2. All comparisons are strict.

use crate::model::{ArtistRecord, Cluster, Diagnostic, TableKind};
use headliner_common::{Error, Result};
use serde::Serialize;
use tracing::{debug, warn};

const TOP_FREQUENCY: f64 = 0.7;
const TOP_RANK_SUM: f64 = 0.4;
const POPULAR_FREQUENCY: f64 = 0.3;

/// Cluster of a single normalized pair
pub fn classify(frequency_normalized: f64, rank_sum_normalized: f64) -> Cluster {
    if frequency_normalized > TOP_FREQUENCY && rank_sum_normalized > TOP_RANK_SUM {
        Cluster::TopPerformer
    } else if frequency_normalized > POPULAR_FREQUENCY {
        Cluster::Popular
    } else {
        Cluster::Emerging
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterAssigner;

impl ClusterAssigner {
    pub fn new() -> Self {
        Self
    }

    /// Assign a cluster to every record
    ///
    /// # Errors
    /// `Data` if the input is empty or a record carries normalized values
    /// outside [0, 1] (i.e. it was never normalized).
    pub fn assign(&self, records: &[ArtistRecord]) -> Result<Vec<ArtistRecord>> {
        if records.is_empty() {
            return Err(Error::data("cannot cluster an empty population"));
        }
        records
            .iter()
            .map(|record| {
                let (f, r) = (record.frequency_normalized, record.rank_sum_normalized);
                if !((0.0..=1.0).contains(&f) && (0.0..=1.0).contains(&r)) {
                    return Err(Error::data(format!(
                        "artist '{}' is not normalized (frequency {}, rank_sum {})",
                        record.name, f, r
                    )));
                }
                Ok(ArtistRecord {
                    cluster: Some(classify(f, r)),
                    ..record.clone()
                })
            })
            .collect()
    }
}

/// Artists chosen for the cluster view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cohort {
    /// Sorted by source-table rank
    pub members: Vec<ArtistRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Pick the top `max_rank` artists plus every always-included name
///
/// Normalized values are kept as computed over the full population; the
/// cohort is never re-normalized on its own.
pub fn select_cohort(records: &[ArtistRecord], max_rank: u32, always_include: &[String]) -> Cohort {
    let mut members: Vec<ArtistRecord> = records
        .iter()
        .filter(|r| r.rank <= max_rank || always_include.contains(&r.name))
        .cloned()
        .collect();
    members.sort_by_key(|r| r.rank);

    let diagnostics: Vec<Diagnostic> = always_include
        .iter()
        .filter(|name| !records.iter().any(|r| &r.name == *name))
        .map(|name| {
            warn!("Cohort artist '{}' not found in ranking table", name);
            Diagnostic::join_mismatch(name.as_str(), TableKind::Rankings)
        })
        .collect();

    debug!("Selected cohort of {} artists (max rank {})", members.len(), max_rank);
    Cohort {
        members,
        diagnostics,
    }
}

/// Aggregate view of one cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub cluster: Cluster,
    pub description: &'static str,
    pub count: usize,
    pub mean_frequency_normalized: Option<f64>,
    pub mean_rank_sum_normalized: Option<f64>,
    pub members: Vec<String>,
}

/// Summaries for clusters 1, 2 and 3, in that order
///
/// Records without a cluster are skipped.
pub fn summarize(records: &[ArtistRecord]) -> Vec<ClusterSummary> {
    Cluster::ALL
        .iter()
        .map(|&cluster| {
            let in_cluster: Vec<&ArtistRecord> = records
                .iter()
                .filter(|r| r.cluster == Some(cluster))
                .collect();
            let count = in_cluster.len();
            let mean = |value: fn(&ArtistRecord) -> f64| {
                (count > 0).then(|| in_cluster.iter().map(|r| value(r)).sum::<f64>() / count as f64)
            };
            ClusterSummary {
                cluster,
                description: cluster.description(),
                count,
                mean_frequency_normalized: mean(|r: &ArtistRecord| r.frequency_normalized),
                mean_rank_sum_normalized: mean(|r: &ArtistRecord| r.rank_sum_normalized),
                members: in_cluster.iter().map(|r| r.name.clone()).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(name: &str, rank: u32, f: f64, r: f64) -> ArtistRecord {
        ArtistRecord {
            frequency_normalized: f,
            rank_sum_normalized: r,
            ..ArtistRecord::new(name, 0, 0.0, rank)
        }
    }

    #[test]
    fn test_rule_cascade_examples() {
        assert_eq!(classify(0.8, 0.5), Cluster::TopPerformer);
        assert_eq!(classify(0.5, 0.1), Cluster::Popular);
        assert_eq!(classify(0.1, 0.1), Cluster::Emerging);
    }

    #[test]
    fn test_rule_one_takes_precedence() {
        // Satisfies rule 2's frequency condition as well
        assert_eq!(classify(0.95, 0.41), Cluster::TopPerformer);
        // Fails rule 1 on rank_sum, falls to rule 2
        assert_eq!(classify(0.95, 0.4), Cluster::Popular);
    }

    #[test]
    fn test_thresholds_are_strict() {
        assert_eq!(classify(0.7, 0.9), Cluster::Popular);
        assert_eq!(classify(0.3, 0.9), Cluster::Emerging);
        assert_eq!(classify(0.3000001, 0.0), Cluster::Popular);
    }

    #[test]
    fn test_assign_is_idempotent() {
        let input = vec![
            normalized("A", 1, 0.9, 0.8),
            normalized("B", 2, 0.5, 0.2),
            normalized("C", 3, 0.1, 0.0),
        ];
        let assigner = ClusterAssigner::new();
        let first = assigner.assign(&input).unwrap();
        let second = assigner.assign(&first).unwrap();
        assert_eq!(first, second);
        let labels: Vec<u8> = first.iter().map(|r| r.cluster.unwrap().label()).collect();
        assert_eq!(labels, vec![1, 2, 3]);
    }

    #[test]
    fn test_assign_rejects_unnormalized() {
        let input = vec![normalized("A", 1, 1.5, 0.2)];
        assert!(matches!(ClusterAssigner::new().assign(&input), Err(Error::Data(_))));
        assert!(matches!(ClusterAssigner::new().assign(&[]), Err(Error::Data(_))));
    }

    #[test]
    fn test_cohort_includes_named_artist_outside_rank() {
        let records = vec![
            normalized("C", 3, 0.5, 0.5),
            normalized("A", 1, 0.9, 0.9),
            normalized("Late", 40, 0.1, 0.1),
            normalized("B", 2, 0.7, 0.7),
        ];
        let always = vec!["Late".to_string(), "Nobody".to_string()];
        let cohort = select_cohort(&records, 2, &always);

        let names: Vec<&str> = cohort.members.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "Late"]);
        assert_eq!(
            cohort.diagnostics,
            vec![Diagnostic::join_mismatch("Nobody", TableKind::Rankings)]
        );
        // Normalized values carried over untouched
        assert_eq!(cohort.members[2].frequency_normalized, 0.1);
    }

    #[test]
    fn test_summary_counts_and_means() {
        let clustered = ClusterAssigner::new()
            .assign(&[
                normalized("A", 1, 0.9, 0.8),
                normalized("B", 2, 0.8, 0.6),
                normalized("C", 3, 0.1, 0.0),
            ])
            .unwrap();
        let summary = summarize(&clustered);

        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].count, 2);
        assert!((summary[0].mean_frequency_normalized.unwrap() - 0.85).abs() < 1e-12);
        assert_eq!(summary[1].count, 0);
        assert!(summary[1].mean_rank_sum_normalized.is_none());
        assert_eq!(summary[2].members, vec!["C".to_string()]);
    }
}
