//! Source tables: artist rankings and audio features
//!
//! Both tables are loaded once per process and handed to the engine
//! explicitly through [`Dataset`]. Construction validates the invariants the
//! computations rely on (unique names, finite values), so the engine never
//! has to re-check them.

use crate::model::{ArtistRecord, AudioFeatures, FeatureRecord};
use headliner_common::config::DataConfig;
use headliner_common::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Artist score table compiled into the binary
const BUNDLED_ARTIST_SCORES: &str = include_str!("../data/artist_scores.csv");

/// Raw row of the artist score CSV; extra columns are ignored
#[derive(Debug, Deserialize)]
struct ArtistRow {
    artists: String,
    frequency: u64,
    rank_sum: f64,
    rank: u32,
}

/// Raw row of the audio feature CSV
#[derive(Debug, Deserialize)]
struct FeatureRow {
    #[serde(rename = "Artists")]
    artists: String,
    danceability: f64,
    energy: f64,
    speechiness: f64,
    acousticness: f64,
    liveness: f64,
    valence: f64,
    tempo: f64,
    popularity: f64,
    #[serde(rename = "Minimum Fees (in Dollars)")]
    minimum_fee: u64,
}

/// Validated ranking table
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistTable {
    records: Vec<ArtistRecord>,
}

impl ArtistTable {
    /// Validate and wrap raw records
    ///
    /// # Errors
    /// `Data` if the table is empty, a name repeats, `rank_sum` is negative
    /// or non-finite, or `rank` is zero.
    pub fn new(records: Vec<ArtistRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::data("artist table is empty"));
        }
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.name.as_str()) {
                return Err(Error::data(format!("duplicate artist '{}'", record.name)));
            }
            if !(record.rank_sum.is_finite() && record.rank_sum >= 0.0) {
                return Err(Error::data(format!(
                    "artist '{}' has invalid rank_sum {}",
                    record.name, record.rank_sum
                )));
            }
            if record.rank == 0 {
                return Err(Error::data(format!("artist '{}' has rank 0", record.name)));
            }
        }
        Ok(Self { records })
    }

    /// Parse a CSV with `artists,frequency,rank_sum,rank` columns
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();
        for row in csv_reader.deserialize::<ArtistRow>() {
            let row = row?;
            records.push(ArtistRecord::new(
                row.artists.trim(),
                row.frequency,
                row.rank_sum,
                row.rank,
            ));
        }
        Self::new(records)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        info!("Loaded {} artists from {}", table.len(), path.display());
        Ok(table)
    }

    /// The artist score table shipped with the binary
    pub fn bundled() -> Result<Self> {
        Self::from_reader(BUNDLED_ARTIST_SCORES.as_bytes())
    }

    pub fn records(&self) -> &[ArtistRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ArtistRecord> {
        self.records.iter().find(|r| r.name == name)
    }
}

/// Validated audio feature table
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    records: Vec<FeatureRecord>,
}

impl FeatureTable {
    /// Validate and wrap raw records
    ///
    /// # Errors
    /// `Data` if the table is empty, a name repeats, or a feature is not finite.
    pub fn new(records: Vec<FeatureRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::data("feature table is empty"));
        }
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.artist_name.as_str()) {
                return Err(Error::data(format!(
                    "duplicate artist '{}' in feature table",
                    record.artist_name
                )));
            }
            if record.features.to_vector().iter().any(|v| !v.is_finite()) {
                return Err(Error::data(format!(
                    "artist '{}' has a non-finite feature value",
                    record.artist_name
                )));
            }
        }
        Ok(Self { records })
    }

    /// Parse a CSV with `Artists`, the eight features and the fee column
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();
        for row in csv_reader.deserialize::<FeatureRow>() {
            let row = row?;
            let features = AudioFeatures {
                danceability: row.danceability,
                energy: row.energy,
                speechiness: row.speechiness,
                acousticness: row.acousticness,
                liveness: row.liveness,
                valence: row.valence,
                tempo: row.tempo,
                popularity: row.popularity,
            };
            records.push(FeatureRecord::new(row.artists.trim(), features, row.minimum_fee));
        }
        Self::new(records)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        info!("Loaded {} feature rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Six-artist sample used by the dashboard's similarity view
    pub fn sample() -> Self {
        // (artist, danceability, energy, speechiness, acousticness, liveness,
        //  valence, tempo, popularity, minimum fee)
        let rows: [(&str, [f64; 8], u64); 6] = [
            ("Sabrina Carpenter", [0.72, 0.65, 0.12, 0.25, 0.15, 0.70, 118.0, 85.0], 500_000),
            ("Gracie Abrams", [0.68, 0.61, 0.11, 0.35, 0.14, 0.65, 115.0, 80.0], 150_000),
            ("Olivia Rodrigo", [0.65, 0.67, 0.14, 0.20, 0.20, 0.55, 120.0, 92.0], 450_000),
            ("Ariana Grande", [0.71, 0.68, 0.10, 0.15, 0.18, 0.68, 125.0, 90.0], 650_000),
            ("Dua Lipa", [0.75, 0.80, 0.08, 0.10, 0.16, 0.72, 122.0, 88.0], 550_000),
            ("Taylor Swift", [0.63, 0.62, 0.15, 0.30, 0.12, 0.60, 110.0, 95.0], 800_000),
        ];
        let records = rows
            .iter()
            .map(|(name, v, fee)| FeatureRecord::new(*name, AudioFeatures::from_vector(*v), *fee))
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.artist_name == name)
    }

    pub fn get(&self, name: &str) -> Option<&FeatureRecord> {
        self.position(name).map(|i| &self.records[i])
    }
}

/// Both source tables, loaded once and shared read-only
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub artists: ArtistTable,
    pub features: FeatureTable,
}

impl Dataset {
    pub fn new(artists: ArtistTable, features: FeatureTable) -> Self {
        Self { artists, features }
    }

    /// Built-in tables only
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(ArtistTable::bundled()?, FeatureTable::sample()))
    }

    /// Load the configured tables
    ///
    /// A configured file that cannot be loaded is logged and replaced by the
    /// built-in table, the way the dashboard fell back to sample data.
    pub fn load(data: &DataConfig) -> Result<Self> {
        let artists = match &data.artist_scores {
            Some(path) => ArtistTable::from_csv_path(path).or_else(|e| {
                warn!(
                    "Failed to load artist scores from {}: {} (using bundled table)",
                    path.display(),
                    e
                );
                ArtistTable::bundled()
            })?,
            None => {
                debug!("No artist score file configured, using bundled table");
                ArtistTable::bundled()?
            }
        };

        let features = match &data.features {
            Some(path) => FeatureTable::from_csv_path(path).unwrap_or_else(|e| {
                warn!(
                    "Failed to load audio features from {}: {} (using sample features)",
                    path.display(),
                    e
                );
                FeatureTable::sample()
            }),
            None => {
                debug!("No feature file configured, using sample features");
                FeatureTable::sample()
            }
        };

        Ok(Self::new(artists, features))
    }
}
