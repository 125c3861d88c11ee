//! Text signal scorer for overview and tagline passages.
//!
//! ## Algorithm
//! 1. Lower-case the passage
//! 2. For each mood, count how many of its keywords occur as substrings
//! 3. Add `count * base_weight * keyword_weight` and, from the same count,
//!    `count * base_weight * atmosphere_weight`
//! 4. Separately count theme phrases (sad, romantic, nostalgic) and add
//!    `count * theme_scale`
//!
//! Matching is plain containment, so "fun" also fires inside "funeral".
//! That imprecision is part of the rules and is kept.

use crate::catalog::RuleSet;
use crate::scores::MoodScores;

/// Which passage is being scored; selects the merge multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passage {
    Overview,
    Tagline,
}

/// Scores free text against the mood keyword lists and theme phrases
pub struct TextScorer<'a> {
    rules: &'a RuleSet,
}

impl<'a> TextScorer<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Keyword and atmosphere score per mood, before passage scaling
    pub fn keyword_scores(&self, text: &str) -> MoodScores {
        let catalog = &self.rules.catalog;
        let weights = self.rules.content_weights;
        let mut scores = MoodScores::zeros(catalog.len());

        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return scores;
        }

        for (idx, mood) in catalog.iter().enumerate() {
            let matches = mood
                .keywords
                .iter()
                .filter(|k| text.contains(k.as_str()))
                .count();
            if matches == 0 {
                continue;
            }
            let matches = matches as f64;
            scores.add(idx, matches * mood.base_weight * weights.keyword);
            scores.add(idx, matches * mood.base_weight * weights.atmosphere);
        }
        scores
    }

    /// Raw theme phrase counts per mood (moods without a theme list stay 0)
    pub fn theme_counts(&self, text: &str) -> MoodScores {
        let mut counts = MoodScores::zeros(self.rules.catalog.len());
        let text = text.to_lowercase();

        for theme in &self.rules.text_themes {
            let hits = theme
                .phrases
                .iter()
                .filter(|p| text.contains(p.as_str()))
                .count();
            counts.add(theme.mood, hits as f64);
        }
        counts
    }

    /// Full contribution of one passage, with its keyword multiplier and
    /// theme scale applied. Empty text contributes nothing.
    pub fn score_passage(&self, text: &str, passage: Passage) -> MoodScores {
        let m = self.rules.multipliers;
        let (keyword_scale, theme_scale) = match passage {
            Passage::Overview => (m.overview_keywords, m.overview_themes),
            Passage::Tagline => (m.tagline_keywords, m.tagline_themes),
        };

        let mut scores = MoodScores::zeros(self.rules.catalog.len());
        if text.is_empty() {
            return scores;
        }
        scores.merge(&self.keyword_scores(text), keyword_scale);
        scores.merge(&self.theme_counts(text), theme_scale);
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::EmotionRules;

    fn rules() -> RuleSet {
        RuleSet::compile(&EmotionRules::default()).unwrap()
    }

    fn idx(rules: &RuleSet, mood: &str) -> usize {
        rules.catalog.index_of(mood).unwrap()
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let rules = rules();
        let scorer = TextScorer::new(&rules);

        assert!(scorer.keyword_scores("").is_all_zero());
        assert!(scorer.keyword_scores("   ").is_all_zero());
        assert!(scorer.score_passage("", Passage::Overview).is_all_zero());
    }

    #[test]
    fn test_keyword_and_atmosphere_both_count() {
        let rules = rules();
        let scorer = TextScorer::new(&rules);

        // "Calm" is a single peaceful keyword and nothing else matches.
        let scores = scorer.keyword_scores("CALM");
        let expected = 0.3 * 0.35 + 0.3 * 0.2;
        assert!((scores.get(idx(&rules, "peaceful")) - expected).abs() < 1e-12);
        assert_eq!(scores.get(idx(&rules, "happy")), 0.0);
    }

    #[test]
    fn test_substring_matching_is_not_word_bounded() {
        let rules = rules();
        let scorer = TextScorer::new(&rules);

        // "funeral" contains the happy keyword "fun" as well as the sad keyword "funeral"
        let scores = scorer.keyword_scores("a funeral");
        assert!(scores.get(idx(&rules, "happy")) > 0.0);
        assert!(scores.get(idx(&rules, "sad")) > 0.0);
    }

    #[test]
    fn test_repeated_keyword_counts_per_listing() {
        let rules = rules();
        let scorer = TextScorer::new(&rules);

        // "depression" is listed twice for sad
        let scores = scorer.keyword_scores("depression");
        let expected = 2.0 * 0.45 * 0.35 + 2.0 * 0.45 * 0.2;
        assert!((scores.get(idx(&rules, "sad")) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_theme_counts() {
        let rules = rules();
        let scorer = TextScorer::new(&rules);

        let counts = scorer.theme_counts("Lovers share a kiss at their wedding");
        // love, kiss, wedding, lovers
        assert_eq!(counts.get(idx(&rules, "romantic")), 4.0);
        assert_eq!(counts.get(idx(&rules, "happy")), 0.0);
    }

    #[test]
    fn test_overview_outweighs_tagline() {
        let rules = rules();
        let scorer = TextScorer::new(&rules);
        let text = "A story of grief and heartbreak";

        let overview = scorer.score_passage(text, Passage::Overview);
        let tagline = scorer.score_passage(text, Passage::Tagline);
        let sad = idx(&rules, "sad");

        assert!(overview.get(sad) > tagline.get(sad));

        let keyword = scorer.keyword_scores(text).get(sad);
        let themes = scorer.theme_counts(text).get(sad);
        assert!((overview.get(sad) - (keyword * 1.2 + themes * 0.35)).abs() < 1e-12);
        assert!((tagline.get(sad) - (keyword * 0.8 + themes * 0.25)).abs() < 1e-12);
    }
}
