//! headliner-engine library interface
//!
//! Ranking and similarity engine behind the headliner selection dashboard:
//! - Score Normalizer: min-max scaling and composite ranking score
//! - Cluster Assigner: three-tier threshold cascade
//! - Similarity Engine: standardized Euclidean KNN over audio features
//! - Ranking overview, selection comparison and decision matrix
//!
//! Every computation is a pure function of its inputs. Load the source
//! tables once into a [`Dataset`] and pass it explicitly.

pub mod cluster;
pub mod decision;
pub mod join;
pub mod model;
pub mod normalize;
pub mod ranking;
pub mod report;
pub mod selection;
pub mod similarity;
pub mod tables;

pub use crate::cluster::{classify, ClusterAssigner};
pub use crate::model::{ArtistRecord, Cluster, Diagnostic, FeatureRecord, SimilarityResult};
pub use crate::normalize::{RankingWeights, ScoreNormalizer};
pub use crate::report::DashboardReport;
pub use crate::similarity::{SimilarityEngine, SimilarityReport};
pub use crate::tables::{ArtistTable, Dataset, FeatureTable};
