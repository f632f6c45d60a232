//! Record types shared by every engine component
//!
//! Records are built once from the source tables and treated as read-only
//! afterwards; each computation returns new records instead of mutating its
//! input.

use serde::{Serialize, Serializer};

/// Number of audio features used for similarity
pub const FEATURE_COUNT: usize = 8;

/// Feature column names, in vector order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "danceability",
    "energy",
    "speechiness",
    "acousticness",
    "liveness",
    "valence",
    "tempo",
    "popularity",
];

/// Popularity tier assigned by the threshold cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cluster {
    /// Cluster 1: high frequency and strong chart positions
    TopPerformer,
    /// Cluster 2: moderate chart frequency
    Popular,
    /// Cluster 3: everyone else
    Emerging,
}

impl Cluster {
    /// All clusters in label order
    pub const ALL: [Cluster; 3] = [Cluster::TopPerformer, Cluster::Popular, Cluster::Emerging];

    /// Numeric label (1, 2 or 3)
    pub fn label(&self) -> u8 {
        match self {
            Cluster::TopPerformer => 1,
            Cluster::Popular => 2,
            Cluster::Emerging => 3,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Cluster::TopPerformer => "Top performers",
            Cluster::Popular => "Popular artists",
            Cluster::Emerging => "Emerging artists",
        }
    }
}

impl Serialize for Cluster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.label())
    }
}

/// One candidate artist from the ranking table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRecord {
    pub name: String,
    /// Chart appearance count
    pub frequency: u64,
    /// Cumulative weighted chart-position score
    pub rank_sum: f64,
    /// Ordinal position in the source table (1-based)
    pub rank: u32,
    pub frequency_normalized: f64,
    pub rank_sum_normalized: f64,
    pub ranking_score: f64,
    pub cluster: Option<Cluster>,
}

impl ArtistRecord {
    /// Raw record; derived fields are zero until the normalizer runs
    pub fn new(name: impl Into<String>, frequency: u64, rank_sum: f64, rank: u32) -> Self {
        Self {
            name: name.into(),
            frequency,
            rank_sum,
            rank,
            frequency_normalized: 0.0,
            rank_sum_normalized: 0.0,
            ranking_score: 0.0,
            cluster: None,
        }
    }
}

/// Audio-style features of an artist's catalogue
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub liveness: f64,
    pub valence: f64,
    pub tempo: f64,
    pub popularity: f64,
}

impl AudioFeatures {
    /// Feature vector in [`FEATURE_NAMES`] order
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.danceability,
            self.energy,
            self.speechiness,
            self.acousticness,
            self.liveness,
            self.valence,
            self.tempo,
            self.popularity,
        ]
    }

    pub fn from_vector(v: [f64; FEATURE_COUNT]) -> Self {
        Self {
            danceability: v[0],
            energy: v[1],
            speechiness: v[2],
            acousticness: v[3],
            liveness: v[4],
            valence: v[5],
            tempo: v[6],
            popularity: v[7],
        }
    }
}

/// One artist from the audio feature table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub artist_name: String,
    pub features: AudioFeatures,
    /// Minimum booking fee in dollars
    pub minimum_fee: u64,
}

impl FeatureRecord {
    pub fn new(artist_name: impl Into<String>, features: AudioFeatures, minimum_fee: u64) -> Self {
        Self {
            artist_name: artist_name.into(),
            features,
            minimum_fee,
        }
    }
}

/// One row of a nearest-neighbor lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityResult {
    pub artist_name: String,
    /// Euclidean distance in standardized feature space
    pub distance: f64,
    pub similarity_score: f64,
    pub minimum_fee: u64,
}

/// Which source table a name was looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Rankings,
    Features,
}

/// Recoverable condition reported next to a (possibly partial) result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Artist name could not be found in one of the two tables
    JoinMismatch {
        artist: String,
        missing_from: TableKind,
    },
    /// Feature column with zero variance; standardized to all zeros
    ConstantFeature { feature: &'static str },
}

impl Diagnostic {
    pub fn join_mismatch(artist: impl Into<String>, missing_from: TableKind) -> Self {
        Diagnostic::JoinMismatch {
            artist: artist.into(),
            missing_from,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::JoinMismatch {
                artist,
                missing_from,
            } => {
                let table = match missing_from {
                    TableKind::Rankings => "ranking",
                    TableKind::Features => "feature",
                };
                write!(f, "'{}' is missing from the {} table", artist, table)
            }
            Diagnostic::ConstantFeature { feature } => {
                write!(f, "feature '{}' is constant across all artists", feature)
            }
        }
    }
}
