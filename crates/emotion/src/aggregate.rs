//! Signal aggregation.
//!
//! Runs every sub-scorer over one record and keeps each contribution, already
//! multiplied by its merge weight, in a [`SignalBreakdown`]. Summing the
//! breakdown in field order gives the raw mood vector.
//!
//! ## Merge order and weights
//! | Signal          | Weight             |
//! |-----------------|--------------------|
//! | era             | 1.0 (pre-weighted) |
//! | overview        | 1.2 / 0.35 themes  |
//! | tagline         | 0.8 / 0.25 themes  |
//! | genre base      | 1.3                |
//! | genre combos    | 1.0                |
//! | keyword themes  | 0.2 per hit        |
//! | runtime         | 0.4                |
//! | rating          | 0.5                |
//! | popularity      | 0.3                |

use crate::catalog::RuleSet;
use crate::genre::GenreScorer;
use crate::keywords::KeywordThemeScorer;
use crate::scalar::ScalarScorer;
use crate::scores::MoodScores;
use crate::text::{Passage, TextScorer};
use data_loader::MovieRecord;

/// Per-signal contributions for one record
#[derive(Debug, Clone, PartialEq)]
pub struct SignalBreakdown {
    pub era: MoodScores,
    pub overview: MoodScores,
    pub tagline: MoodScores,
    pub genre_base: MoodScores,
    pub genre_bonus: MoodScores,
    pub keyword_themes: MoodScores,
    pub runtime: MoodScores,
    pub rating: MoodScores,
    pub popularity: MoodScores,
}

impl SignalBreakdown {
    /// Signal names paired with their contributions, in merge order
    pub fn signals(&self) -> [(&'static str, &MoodScores); 9] {
        [
            ("era", &self.era),
            ("overview", &self.overview),
            ("tagline", &self.tagline),
            ("genre_base", &self.genre_base),
            ("genre_bonus", &self.genre_bonus),
            ("keyword_themes", &self.keyword_themes),
            ("runtime", &self.runtime),
            ("rating", &self.rating),
            ("popularity", &self.popularity),
        ]
    }

    /// Raw (unnormalized) mood vector
    pub fn raw(&self) -> MoodScores {
        let mut total = MoodScores::zeros(self.era.len());
        for (_, contribution) in self.signals() {
            total.merge(contribution, 1.0);
        }
        total
    }
}

/// Combines the sub-scorers for one record
pub struct Aggregator<'a> {
    rules: &'a RuleSet,
    reference_year: i32,
}

impl<'a> Aggregator<'a> {
    pub fn new(rules: &'a RuleSet, reference_year: i32) -> Self {
        Self {
            rules,
            reference_year,
        }
    }

    pub fn breakdown(&self, record: &MovieRecord) -> SignalBreakdown {
        let rules = self.rules;
        let m = rules.multipliers;
        let zeros = || MoodScores::zeros(rules.catalog.len());

        let text = TextScorer::new(rules);
        let scalar = ScalarScorer::new(rules);

        let era = record
            .release_year()
            .map(|year| scalar.score_era(year, self.reference_year))
            .unwrap_or_else(zeros);

        let overview = match record.overview.as_deref() {
            Some(overview) => text.score_passage(overview, Passage::Overview),
            None => zeros(),
        };
        let tagline = match record.tagline.as_deref() {
            Some(tagline) => text.score_passage(tagline, Passage::Tagline),
            None => zeros(),
        };

        let genres = GenreScorer::new(rules).score(&record.genre_ids());
        let keyword_themes = KeywordThemeScorer::new(rules).score(&record.keyword_list());

        let runtime = record
            .runtime
            .map(|minutes| scalar.score_runtime(minutes).scaled(m.runtime))
            .unwrap_or_else(zeros);

        let rating = match (record.vote_average, record.vote_count) {
            (Some(average), Some(count)) => scalar.score_rating(average, count).scaled(m.rating),
            _ => zeros(),
        };

        let popularity = record
            .popularity
            .map(|p| scalar.score_popularity(p).scaled(m.popularity))
            .unwrap_or_else(zeros);

        SignalBreakdown {
            era,
            overview,
            tagline,
            genre_base: genres.base.scaled(m.genre),
            genre_bonus: genres.bonus,
            keyword_themes,
            runtime,
            rating,
            popularity,
        }
    }

    pub fn raw_scores(&self, record: &MovieRecord) -> MoodScores {
        self.breakdown(record).raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::EmotionRules;

    fn rules() -> RuleSet {
        RuleSet::compile(&EmotionRules::default()).unwrap()
    }

    #[test]
    fn test_empty_record_has_no_signal() {
        let rules = rules();
        let aggregator = Aggregator::new(&rules, 2025);
        let breakdown = aggregator.breakdown(&MovieRecord::default());

        for (name, contribution) in breakdown.signals() {
            assert!(contribution.is_all_zero(), "{name} should be empty");
            assert_eq!(contribution.len(), rules.catalog.len());
        }
        assert!(breakdown.raw().is_all_zero());
    }

    #[test]
    fn test_genre_base_is_scaled() {
        let rules = rules();
        let aggregator = Aggregator::new(&rules, 2025);
        let record = MovieRecord {
            genres: Some("Romance".to_string()),
            ..MovieRecord::default()
        };

        let raw = aggregator.raw_scores(&record);
        let romantic = rules.catalog.index_of("romantic").unwrap();
        assert!((raw.get(romantic) - 0.9 * 0.45 * 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_unparseable_date_skips_era() {
        let rules = rules();
        let aggregator = Aggregator::new(&rules, 2025);
        let record = MovieRecord {
            release_date: Some("unknown".to_string()),
            ..MovieRecord::default()
        };
        assert!(aggregator.breakdown(&record).era.is_all_zero());
    }

    #[test]
    fn test_scalar_signals_are_weighted() {
        let rules = rules();
        let aggregator = Aggregator::new(&rules, 2025);
        let record = MovieRecord {
            runtime: Some(170.0),
            vote_average: Some(8.0),
            vote_count: Some(25_000),
            popularity: Some(120.0),
            ..MovieRecord::default()
        };
        let breakdown = aggregator.breakdown(&record);
        let thoughtful = rules.catalog.index_of("thoughtful").unwrap();
        let excited = rules.catalog.index_of("excited").unwrap();

        assert!((breakdown.runtime.get(thoughtful) - 0.7 * 0.4).abs() < 1e-12);
        assert!((breakdown.rating.get(thoughtful) - 0.6 * 0.5).abs() < 1e-12);
        assert!((breakdown.popularity.get(excited) - 0.5 * 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_vote_average_without_count_is_ignored() {
        let rules = rules();
        let aggregator = Aggregator::new(&rules, 2025);
        let record = MovieRecord {
            vote_average: Some(9.0),
            ..MovieRecord::default()
        };
        assert!(aggregator.breakdown(&record).rating.is_all_zero());
    }
}
