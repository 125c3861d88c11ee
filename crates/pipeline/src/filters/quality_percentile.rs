//! Relative quality cut.
//!
//! Scores every record by a blend of vote volume, rating and relative
//! popularity, then drops the lowest-scoring share of the batch. Unlike the
//! other filters this one depends on the whole batch, so it should run last.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::MovieRecord;
use rayon::prelude::*;

/// Quality score of one record
///
/// `ln(1 + vote_count) * 0.4 + vote_average * 0.4 + popularity / max_popularity * 0.2`
///
/// Missing fields count as zero, and the popularity term is zero when
/// `max_popularity` is not positive.
pub fn quality_score(record: &MovieRecord, max_popularity: f64) -> f64 {
    let votes = record.vote_count.unwrap_or(0) as f64;
    let rating = record.vote_average.unwrap_or(0.0);
    let popularity = if max_popularity > 0.0 {
        record.popularity.unwrap_or(0.0) / max_popularity
    } else {
        0.0
    };
    votes.ln_1p() * 0.4 + rating * 0.4 + popularity * 0.2
}

/// Linear-interpolated quantile of sorted values (`q` in [0, 1])
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Keeps the top `keep_fraction` of records by [`quality_score`].
///
/// ## Algorithm
/// 1. Find the largest popularity in the batch
/// 2. Score every record (in parallel)
/// 3. Threshold = the `(1 - keep_fraction)` quantile of the scores
/// 4. Keep records scoring at or above the threshold, in input order
pub struct QualityPercentileFilter {
    keep_fraction: f64,
}

impl QualityPercentileFilter {
    /// # Arguments
    /// * `keep_fraction` - Share of the batch to keep, clamped to [0, 1] (typically 0.8)
    pub fn new(keep_fraction: f64) -> Self {
        Self {
            keep_fraction: keep_fraction.clamp(0.0, 1.0),
        }
    }
}

impl Default for QualityPercentileFilter {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl Filter for QualityPercentileFilter {
    fn name(&self) -> &str {
        "QualityPercentileFilter"
    }

    fn apply(&self, records: Vec<MovieRecord>) -> Result<Vec<MovieRecord>> {
        let max_popularity = records
            .iter()
            .filter_map(|r| r.popularity)
            .fold(0.0_f64, f64::max);

        let scores: Vec<f64> = records
            .par_iter()
            .map(|r| quality_score(r, max_popularity))
            .collect();

        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let Some(threshold) = quantile(&sorted, 1.0 - self.keep_fraction) else {
            return Ok(records);
        };
        tracing::debug!("Quality threshold: {:.3}", threshold);

        Ok(records
            .into_iter()
            .zip(scores)
            .filter(|(_, score)| *score >= threshold)
            .map(|(record, _)| record)
            .collect())
    }
}
