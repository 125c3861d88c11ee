//! Filter on audience votes.
//!
//! Removes records without a usable rating, with too few votes, or with an
//! average outside the accepted range.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::MovieRecord;

/// Removes records below vote thresholds.
///
/// ## Algorithm
/// For each record, keep it only if:
/// 1. vote_count is present, positive and >= min_count
/// 2. vote_average is present, positive and within [min_rating, max_rating]
pub struct VoteFilter {
    min_count: u64,
    min_rating: f64,
    max_rating: f64,
}

impl VoteFilter {
    /// Create a new VoteFilter.
    ///
    /// # Arguments
    /// * `min_count` - Minimum number of votes (typically 50)
    /// * `min_rating` - Minimum average rating (typically 5.0)
    /// * `max_rating` - Maximum average rating (typically 10.0)
    pub fn new(min_count: u64, min_rating: f64, max_rating: f64) -> Self {
        Self {
            min_count,
            min_rating,
            max_rating,
        }
    }

    fn keeps(&self, record: &MovieRecord) -> bool {
        let count_ok = matches!(record.vote_count, Some(c) if c > 0 && c >= self.min_count);
        let rating_ok = matches!(
            record.vote_average,
            Some(r) if r > 0.0 && r >= self.min_rating && r <= self.max_rating
        );
        count_ok && rating_ok
    }
}

impl Default for VoteFilter {
    fn default() -> Self {
        Self::new(50, 5.0, 10.0)
    }
}

impl Filter for VoteFilter {
    fn name(&self) -> &str {
        "VoteFilter"
    }

    fn apply(&self, records: Vec<MovieRecord>) -> Result<Vec<MovieRecord>> {
        Ok(records.into_iter().filter(|r| self.keeps(r)).collect())
    }
}
