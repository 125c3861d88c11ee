//! Genre signal scorer.
//!
//! ## Algorithm
//! 1. For every resolved genre id with a profile, add
//!    `profile_weight * genre_content_weight` to each mood of the profile
//! 2. For every combination whose required genres are all present, add its
//!    bonus map in full
//!
//! The two parts are returned separately because the aggregator scales the
//! base part (x1.3) but not the bonuses.

use crate::catalog::RuleSet;
use crate::scores::MoodScores;
use data_loader::GenreId;

/// Genre contribution split into its scaled and unscaled parts
#[derive(Debug, Clone, PartialEq)]
pub struct GenreContribution {
    pub base: MoodScores,
    pub bonus: MoodScores,
}

/// Scores resolved genre ids against the genre emotion table
pub struct GenreScorer<'a> {
    rules: &'a RuleSet,
}

impl<'a> GenreScorer<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Per-genre profile contributions (duplicated ids count twice)
    pub fn base_scores(&self, genre_ids: &[GenreId]) -> MoodScores {
        let mut scores = MoodScores::zeros(self.rules.catalog.len());
        let weight = self.rules.content_weights.genre;

        for id in genre_ids {
            if let Some(profile) = self.rules.genre_emotions.get(id) {
                scores.add_weights(profile, weight);
            }
        }
        scores
    }

    /// Sum of every combination bonus whose genres are all present
    pub fn combination_bonuses(&self, genre_ids: &[GenreId]) -> MoodScores {
        let mut scores = MoodScores::zeros(self.rules.catalog.len());

        for combo in &self.rules.combinations {
            if combo.matches(genre_ids) {
                scores.add_weights(&combo.bonuses, 1.0);
            }
        }
        scores
    }

    /// Names of the combinations that fire for `genre_ids`
    pub fn matching_combinations(&self, genre_ids: &[GenreId]) -> Vec<&str> {
        self.rules
            .combinations
            .iter()
            .filter(|combo| combo.matches(genre_ids))
            .map(|combo| combo.name.as_str())
            .collect()
    }

    pub fn score(&self, genre_ids: &[GenreId]) -> GenreContribution {
        GenreContribution {
            base: self.base_scores(genre_ids),
            bonus: self.combination_bonuses(genre_ids),
        }
    }
}
