//! Best-effort join of ranking records with audio features
//!
//! Names are matched by exact equality. A name present in only one table is
//! reported, never fatal.

use crate::model::{ArtistRecord, Diagnostic, FeatureRecord, TableKind};
use crate::tables::FeatureTable;
use serde::Serialize;
use tracing::warn;

/// One artist present in both tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedArtist {
    pub ranking: ArtistRecord,
    pub features: FeatureRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinReport {
    /// In ranking-record order
    pub matched: Vec<JoinedArtist>,
    pub diagnostics: Vec<Diagnostic>,
}

impl JoinReport {
    pub fn unmatched(&self, table: TableKind) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::JoinMismatch {
                    artist,
                    missing_from,
                } if *missing_from == table => Some(artist.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Pair ranking records with feature rows by artist name
pub fn join(artists: &[ArtistRecord], features: &FeatureTable) -> JoinReport {
    let mut matched = Vec::new();
    let mut diagnostics = Vec::new();

    for artist in artists {
        match features.get(&artist.name) {
            Some(feature) => matched.push(JoinedArtist {
                ranking: artist.clone(),
                features: feature.clone(),
            }),
            None => diagnostics.push(Diagnostic::join_mismatch(
                artist.name.as_str(),
                TableKind::Features,
            )),
        }
    }

    for feature in features.records() {
        if !artists.iter().any(|a| a.name == feature.artist_name) {
            diagnostics.push(Diagnostic::join_mismatch(
                feature.artist_name.as_str(),
                TableKind::Rankings,
            ));
        }
    }

    if !diagnostics.is_empty() {
        warn!(
            "Joined {} artists, {} names unmatched",
            matched.len(),
            diagnostics.len()
        );
    }

    JoinReport {
        matched,
        diagnostics,
    }
}
