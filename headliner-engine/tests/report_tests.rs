//! Integration tests for report assembly and table loading from disk

use headliner_common::TomlConfig;
use headliner_engine::model::{Diagnostic, TableKind};
use headliner_engine::report::SimilaritySection;
use headliner_engine::{DashboardReport, Dataset};
use std::io::Write;
use tempfile::NamedTempFile;

fn default_report() -> DashboardReport {
    let dataset = Dataset::builtin().unwrap();
    DashboardReport::build(&dataset, &TomlConfig::default()).unwrap()
}

#[test]
fn test_default_report_sections() {
    let report = default_report();

    assert_eq!(report.overview.entries.len(), 20);
    assert_eq!(report.overview.leader().unwrap().name, "Sabrina Carpenter");
    assert!(report.overview.lead_points.unwrap() > 0.0);

    assert_eq!(report.cohort.len(), 31);
    assert!(report.cohort.iter().all(|r| r.cluster.is_some()));
    let total: usize = report.clusters.iter().map(|c| c.count).sum();
    assert_eq!(total, 31);

    assert_eq!(report.selection.headliner.as_ref().unwrap().name, "Sabrina Carpenter");
    assert_eq!(report.selection.opener.as_ref().unwrap().name, "Gracie Abrams");
    assert_eq!(report.selection.alternatives.len(), 5);
    assert_eq!(report.selection.alternatives[0].name, "Taylor Swift");

    match &report.similarity {
        SimilaritySection::Ok(similarity) => {
            assert_eq!(similarity.neighbors.len(), 5);
            assert_eq!(similarity.neighbors[0].artist_name, "Gracie Abrams");
        }
        SimilaritySection::Failed { error, .. } => panic!("similarity failed: {}", error),
    }

    assert_eq!(report.decision[0].artist, "Sabrina Carpenter");
}

#[test]
fn test_join_diagnostics_surface_in_report() {
    let report = default_report();

    // Every sample feature artist is ranked; most ranked artists lack features
    assert_eq!(report.join.matched.len(), 6);
    assert!(report.join.unmatched(TableKind::Rankings).is_empty());
    assert!(report
        .diagnostics
        .contains(&Diagnostic::join_mismatch("Zach Bryan", TableKind::Features)));
}

#[test]
fn test_missing_reference_does_not_abort_report() {
    let mut config = TomlConfig::default();
    config.similarity.reference = "Zach Bryan".to_string();

    let report = DashboardReport::build(&Dataset::builtin().unwrap(), &config).unwrap();
    match &report.similarity {
        SimilaritySection::Failed { reference, error } => {
            assert_eq!(reference, "Zach Bryan");
            assert!(error.contains("Zach Bryan"));
        }
        SimilaritySection::Ok(_) => panic!("expected failed similarity section"),
    }
}

#[test]
fn test_empty_cohort_still_builds_report() {
    let config =
        TomlConfig::from_toml_str("[cohort]\nmax_rank = 0\nalways_include = [\"Nobody\"]\n").unwrap();

    let report = DashboardReport::build(&Dataset::builtin().unwrap(), &config).unwrap();
    assert!(report.cohort.is_empty());
    assert!(report.clusters.iter().all(|c| c.count == 0));
    assert!(report
        .diagnostics
        .contains(&Diagnostic::join_mismatch("Nobody", TableKind::Rankings)));
    assert_eq!(report.overview.entries.len(), 20);
    assert!(!report.to_text().is_empty());
}

#[test]
fn test_report_serializes_clusters_as_labels() {
    let json = serde_json::to_value(default_report()).unwrap();

    assert_eq!(json["similarity"]["status"], "ok");
    assert_eq!(json["cohort"][0]["name"], "Sabrina Carpenter");
    assert_eq!(json["cohort"][0]["cluster"], 1);
    assert_eq!(json["clusters"][2]["cluster"], 3);
}

#[test]
fn test_text_report_mentions_every_section() {
    let text = default_report().to_text();
    for header in ["== Top 20", "== Clusters", "== Selection comparison", "== Similarity", "== Decision matrix"] {
        assert!(text.contains(header), "missing {}", header);
    }
}

#[test]
fn test_dataset_loaded_from_csv_files() {
    let mut artists = NamedTempFile::new().unwrap();
    writeln!(artists, "artists,frequency,rank_sum,rank").unwrap();
    writeln!(artists, "Sabrina Carpenter,30,900.0,1").unwrap();
    writeln!(artists, "Gracie Abrams,5,100.0,2").unwrap();
    writeln!(artists, "Clairo,10,300.0,3").unwrap();
    artists.flush().unwrap();

    let mut features = NamedTempFile::new().unwrap();
    writeln!(
        features,
        "Artists,danceability,energy,speechiness,acousticness,liveness,valence,tempo,popularity,Minimum Fees (in Dollars)"
    )
    .unwrap();
    writeln!(features, "Sabrina Carpenter,0.72,0.65,0.12,0.25,0.15,0.70,118,85,500000").unwrap();
    writeln!(features, "Gracie Abrams,0.68,0.61,0.11,0.35,0.14,0.65,115,80,150000").unwrap();
    writeln!(features, "Clairo,0.55,0.40,0.05,0.60,0.10,0.40,100,70,90000").unwrap();
    features.flush().unwrap();

    let config = TomlConfig::from_toml_str(&format!(
        "[data]\nartist_scores = {:?}\nfeatures = {:?}\n",
        artists.path().display().to_string(),
        features.path().display().to_string()
    ))
    .unwrap();

    let dataset = Dataset::load(&config.data).unwrap();
    assert_eq!(dataset.artists.len(), 3);
    assert_eq!(dataset.features.len(), 3);

    let report = DashboardReport::build(&dataset, &config).unwrap();
    assert_eq!(report.overview.entries.len(), 3);
    assert!(report.join.diagnostics.is_empty());
    match &report.similarity {
        SimilaritySection::Ok(similarity) => assert_eq!(similarity.neighbors.len(), 2),
        SimilaritySection::Failed { error, .. } => panic!("similarity failed: {}", error),
    }
}
