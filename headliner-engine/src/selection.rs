//! Headliner/opener comparison against the strongest alternatives

use crate::model::{ArtistRecord, Diagnostic, TableKind};
use crate::ranking::top_by_score;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionComparison {
    pub headliner: Option<ArtistRecord>,
    pub opener: Option<ArtistRecord>,
    /// Best-scoring artists other than the chosen pair
    pub alternatives: Vec<ArtistRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SelectionComparison {
    /// A missing headliner or opener is reported, not fatal
    pub fn build(records: &[ArtistRecord], headliner: &str, opener: &str, alternatives: usize) -> Self {
        let mut diagnostics = Vec::new();
        let mut find = |name: &str| {
            let found = records.iter().find(|r| r.name == name).cloned();
            if found.is_none() {
                warn!("Selected artist '{}' not found in ranking table", name);
                diagnostics.push(Diagnostic::join_mismatch(name, TableKind::Rankings));
            }
            found
        };
        let headliner_record = find(headliner);
        let opener_record = find(opener);

        let alternatives = top_by_score(
            records
                .iter()
                .filter(|r| r.name != headliner && r.name != opener),
            alternatives,
        );

        Self {
            headliner: headliner_record,
            opener: opener_record,
            alternatives,
            diagnostics,
        }
    }

    /// Headliner, opener, then alternatives, skipping missing picks
    pub fn rows(&self) -> impl Iterator<Item = &ArtistRecord> {
        self.headliner
            .iter()
            .chain(self.opener.iter())
            .chain(self.alternatives.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(name: &str, score: f64) -> ArtistRecord {
        ArtistRecord {
            ranking_score: score,
            ..ArtistRecord::new(name, 0, 0.0, 1)
        }
    }

    #[test]
    fn test_alternatives_exclude_selected_pair() {
        let records = vec![
            scored("Head", 90.0),
            scored("Alt1", 80.0),
            scored("Open", 20.0),
            scored("Alt2", 70.0),
            scored("Alt3", 60.0),
        ];
        let comparison = SelectionComparison::build(&records, "Head", "Open", 2);

        assert_eq!(comparison.headliner.as_ref().unwrap().name, "Head");
        assert_eq!(comparison.opener.as_ref().unwrap().name, "Open");
        let alts: Vec<&str> = comparison.alternatives.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(alts, vec!["Alt1", "Alt2"]);
        assert_eq!(comparison.rows().count(), 4);
        assert!(comparison.diagnostics.is_empty());
    }

    #[test]
    fn test_missing_opener_reported() {
        let records = vec![scored("Head", 90.0), scored("Alt1", 80.0)];
        let comparison = SelectionComparison::build(&records, "Head", "Ghost", 5);

        assert!(comparison.opener.is_none());
        assert_eq!(
            comparison.diagnostics,
            vec![Diagnostic::join_mismatch("Ghost", TableKind::Rankings)]
        );
        assert_eq!(comparison.alternatives.len(), 1);
    }
}
