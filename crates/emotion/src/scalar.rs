//! Bucketed scorers for the scalar signals: release era, runtime, audience
//! rating and popularity.
//!
//! Each scorer returns unscaled contributions; the aggregator applies the
//! merge multipliers. Bucket boundaries are fixed here, bucket weights come
//! from the rules.

use crate::catalog::RuleSet;
use crate::scores::MoodScores;

/// Ratings need at least this many votes to count
pub const MIN_VOTE_COUNT: u64 = 100;

/// Vote count at which the rating confidence factor saturates
pub const VOTE_SATURATION: f64 = 10_000.0;

/// Age (in years) at which the nostalgia boost is maxed out
const FULL_NOSTALGIA_AGE: f64 = 100.0;

/// Runtime bucket a film falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeBucket {
    /// Under 80 minutes
    Short,
    /// 80 to 120 minutes inclusive
    Standard,
    /// Over 120, up to 150 minutes
    Long,
    /// Over 150 minutes
    Epic,
}

impl RuntimeBucket {
    /// Bucket for a runtime; `None` for zero, negative or non-finite runtimes.
    /// Fractional minutes are truncated first.
    pub fn classify(runtime_minutes: f64) -> Option<Self> {
        if !runtime_minutes.is_finite() {
            return None;
        }
        let minutes = runtime_minutes.trunc();
        if minutes <= 0.0 {
            None
        } else if minutes < 80.0 {
            Some(Self::Short)
        } else if minutes <= 120.0 {
            Some(Self::Standard)
        } else if minutes <= 150.0 {
            Some(Self::Long)
        } else {
            Some(Self::Epic)
        }
    }
}

/// Effective-rating bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingBucket {
    High,
    MidHigh,
    Mid,
}

impl RatingBucket {
    pub fn classify(effective_rating: f64) -> Option<Self> {
        if effective_rating >= 6.5 {
            Some(Self::High)
        } else if effective_rating >= 6.2 {
            Some(Self::MidHigh)
        } else if effective_rating >= 6.0 {
            Some(Self::Mid)
        } else {
            None
        }
    }
}

/// Popularity bucket; there is no lower bound, so zero and negative
/// popularity land in `LessPopular`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopularityBucket {
    VeryPopular,
    ModeratelyPopular,
    LessPopular,
}

impl PopularityBucket {
    pub fn classify(popularity: f64) -> Self {
        if popularity >= 100.0 {
            Self::VeryPopular
        } else if popularity >= 50.0 {
            Self::ModeratelyPopular
        } else {
            Self::LessPopular
        }
    }
}

/// Audience rating attenuated by vote-count confidence
///
/// `None` when there are fewer than [`MIN_VOTE_COUNT`] votes.
pub fn effective_rating(vote_average: f64, vote_count: u64) -> Option<f64> {
    if vote_count < MIN_VOTE_COUNT {
        return None;
    }
    let confidence = (vote_count as f64 / VOTE_SATURATION).min(1.0);
    Some(vote_average * confidence)
}

/// Scalar signal scorers sharing one rule set
pub struct ScalarScorer<'a> {
    rules: &'a RuleSet,
}

impl<'a> ScalarScorer<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    fn zeros(&self) -> MoodScores {
        MoodScores::zeros(self.rules.catalog.len())
    }

    /// Era weights for the range containing `release_year`, plus the
    /// age-based nostalgia boost when the film is older than `reference_year`
    pub fn score_era(&self, release_year: i32, reference_year: i32) -> MoodScores {
        let mut scores = self.zeros();
        let year_weight = self.rules.content_weights.year;

        for (mood, ranges) in self.rules.era.iter() {
            if let Some(range) = ranges.iter().find(|r| r.contains(release_year)) {
                scores.add(mood, range.weight * year_weight);
            }
        }

        let age = reference_year.saturating_sub(release_year);
        if age > 0 {
            let boost =
                (f64::from(age) / FULL_NOSTALGIA_AGE).min(1.0) * self.rules.multipliers.age_boost;
            scores.add(self.rules.age_boost_mood, boost * year_weight);
        }
        scores
    }

    pub fn score_runtime(&self, runtime_minutes: f64) -> MoodScores {
        let mut scores = self.zeros();
        let table = &self.rules.runtime;
        let weights = match RuntimeBucket::classify(runtime_minutes) {
            Some(RuntimeBucket::Short) => &table.short,
            Some(RuntimeBucket::Standard) => &table.standard,
            Some(RuntimeBucket::Long) => &table.long,
            Some(RuntimeBucket::Epic) => &table.epic,
            None => return scores,
        };
        scores.add_weights(weights, 1.0);
        scores
    }

    pub fn score_rating(&self, vote_average: f64, vote_count: u64) -> MoodScores {
        let mut scores = self.zeros();
        let table = &self.rules.rating;
        let bucket = effective_rating(vote_average, vote_count).and_then(RatingBucket::classify);
        let weights = match bucket {
            Some(RatingBucket::High) => &table.high,
            Some(RatingBucket::MidHigh) => &table.mid_high,
            Some(RatingBucket::Mid) => &table.mid,
            None => return scores,
        };
        scores.add_weights(weights, 1.0);
        scores
    }

    pub fn score_popularity(&self, popularity: f64) -> MoodScores {
        let mut scores = self.zeros();
        let table = &self.rules.popularity;
        let weights = match PopularityBucket::classify(popularity) {
            PopularityBucket::VeryPopular => &table.very_popular,
            PopularityBucket::ModeratelyPopular => &table.moderately_popular,
            PopularityBucket::LessPopular => &table.less_popular,
        };
        scores.add_weights(weights, 1.0);
        scores
    }
}
