//! Keyword theme groups.
//!
//! A record's keyword list is matched against each theme group; every entry
//! containing at least one trigger counts once. The count, scaled by the
//! keyword theme multiplier, goes to each mood in the group's fan-out.

use crate::catalog::{KeywordGroup, RuleSet};
use crate::scores::MoodScores;

fn entries_hit(group: &KeywordGroup, keywords: &[String]) -> usize {
    keywords
        .iter()
        .filter(|kw| group.triggers.iter().any(|t| kw.contains(t.as_str())))
        .count()
}

pub struct KeywordThemeScorer<'a> {
    rules: &'a RuleSet,
}

impl<'a> KeywordThemeScorer<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Number of keyword entries per group that contain any of its triggers,
    /// in rule order
    pub fn group_hits<'k>(&'k self, keywords: &[String]) -> Vec<(&'k str, usize)> {
        self.rules
            .keyword_themes
            .iter()
            .map(|group| (group.name.as_str(), entries_hit(group, keywords)))
            .collect()
    }

    /// Scaled theme bonuses. `keywords` must already be parsed
    /// (lower-cased and trimmed).
    pub fn score(&self, keywords: &[String]) -> MoodScores {
        let mut scores = MoodScores::zeros(self.rules.catalog.len());
        if keywords.is_empty() {
            return scores;
        }
        let scale = self.rules.multipliers.keyword_theme;

        for group in &self.rules.keyword_themes {
            let bonus = entries_hit(group, keywords) as f64 * scale;
            if bonus > 0.0 {
                for &mood in &group.moods {
                    scores.add(mood, bonus);
                }
            }
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::EmotionRules;
    use data_loader::parse_keywords;

    fn rules() -> RuleSet {
        RuleSet::compile(&EmotionRules::default()).unwrap()
    }

    #[test]
    fn test_no_keywords() {
        let rules = rules();
        assert!(KeywordThemeScorer::new(&rules).score(&[]).is_all_zero());
    }

    #[test]
    fn test_entry_counts_once_per_group() {
        let rules = rules();
        let scorer = KeywordThemeScorer::new(&rules);

        // "sword fight battle" hits two action triggers but is a single entry
        let keywords = parse_keywords("sword fight battle, car chase, friendship");
        let hits = scorer.group_hits(&keywords);
        assert_eq!(hits[0], ("action", 2));

        let scores = scorer.score(&keywords);
        let excited = rules.catalog.index_of("excited").unwrap();
        let energetic = rules.catalog.index_of("energetic").unwrap();
        assert!((scores.get(excited) - 0.4).abs() < 1e-12);
        assert!((scores.get(energetic) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_fan_out_to_every_group_mood() {
        let rules = rules();
        let scorer = KeywordThemeScorer::new(&rules);

        let keywords = parse_keywords("'forbidden love'");
        let scores = scorer.score(&keywords);
        for mood in ["sad", "happy", "romantic"] {
            let idx = rules.catalog.index_of(mood).unwrap();
            assert!((scores.get(idx) - 0.2).abs() < 1e-12, "{mood}");
        }
        assert_eq!(scores.get(rules.catalog.index_of("excited").unwrap()), 0.0);
    }
}
