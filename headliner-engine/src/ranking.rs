//! Ranking overview: top artists by ranking score and the leader's margin

use crate::model::ArtistRecord;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingOverview {
    /// Highest ranking score first; ties keep input order
    pub entries: Vec<ArtistRecord>,
    /// Leader's score minus the runner-up's
    pub lead_points: Option<f64>,
    /// Leader's score relative to the runner-up, in percent
    pub lead_percent: Option<f64>,
}

impl RankingOverview {
    pub fn build(records: &[ArtistRecord], top_n: usize) -> Self {
        let entries = top_by_score(records, top_n);

        let (lead_points, lead_percent) = match entries.as_slice() {
            [first, second, ..] => {
                let points = first.ranking_score - second.ranking_score;
                let percent = (second.ranking_score > 0.0)
                    .then(|| (first.ranking_score / second.ranking_score - 1.0) * 100.0);
                (Some(points), percent)
            }
            _ => (None, None),
        };

        Self {
            entries,
            lead_points,
            lead_percent,
        }
    }

    pub fn leader(&self) -> Option<&ArtistRecord> {
        self.entries.first()
    }
}

/// The `n` highest-scoring records, stable on ties
pub fn top_by_score<'a, I>(records: I, n: usize) -> Vec<ArtistRecord>
where
    I: IntoIterator<Item = &'a ArtistRecord>,
{
    let mut sorted: Vec<ArtistRecord> = records.into_iter().cloned().collect();
    sorted.sort_by(|a, b| b.ranking_score.total_cmp(&a.ranking_score));
    sorted.truncate(n);
    sorted
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
    fn test_overview_sorts_and_truncates() {
        let records = vec![scored("B", 50.0), scored("A", 80.0), scored("C", 10.0)];
        let overview = RankingOverview::build(&records, 2);

        let names: Vec<&str> = overview.entries.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!((overview.lead_points.unwrap() - 30.0).abs() < 1e-12);
        assert!((overview.lead_percent.unwrap() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![scored("First", 5.0), scored("Second", 5.0)];
        let top = top_by_score(&records, 2);
        assert_eq!(top[0].name, "First");
        assert_eq!(top[1].name, "Second");
    }

    #[test]
    fn test_lead_undefined_without_runner_up() {
        let overview = RankingOverview::build(&[scored("Solo", 10.0)], 5);
        assert!(overview.lead_points.is_none());
        assert!(overview.lead_percent.is_none());

        let zero = RankingOverview::build(&[scored("A", 10.0), scored("B", 0.0)], 5);
        assert_eq!(zero.lead_points, Some(10.0));
        assert!(zero.lead_percent.is_none());
    }
}
