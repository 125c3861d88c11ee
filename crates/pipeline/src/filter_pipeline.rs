//! The FilterPipeline chains filters over a batch of movie records.

use crate::filters::{
    AdultFilter, QualityPercentileFilter, ReleaseYearFilter, RuntimeFilter, VoteFilter,
};
use crate::traits::Filter;
use anyhow::Result;
use data_loader::MovieRecord;
use tracing::{debug, info};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(VoteFilter::new(50, 5.0, 10.0))
///     .add_filter(RuntimeFilter::new(60.0));
///
/// let kept = pipeline.apply(records)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The standard pre-scoring chain:
    /// votes, release year, runtime, adult flag, then the top 80% by quality
    pub fn upstream_defaults() -> Self {
        Self::new()
            .add_filter(VoteFilter::default())
            .add_filter(ReleaseYearFilter::default())
            .add_filter(RuntimeFilter::default())
            .add_filter(AdultFilter)
            .add_filter(QualityPercentileFilter::default())
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Filter names in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence.
    ///
    /// ## Algorithm
    /// 1. Start with the input records
    /// 2. For each filter in order, log the input count, apply it, log the
    ///    output count
    /// 3. Return the final set
    pub fn apply(&self, records: Vec<MovieRecord>) -> Result<Vec<MovieRecord>> {
        let input = records.len();
        let mut current = records;
        for filter in &self.filters {
            debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current)?;
            debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        info!("Filter pipeline kept {} of {} records", current.len(), input);
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let records = vec![MovieRecord::titled("A"), MovieRecord::titled("B")];

        let filtered = pipeline.apply(records.clone()).unwrap();
        assert_eq!(filtered, records);
    }

    #[test]
    fn test_single_filter() {
        let pipeline = FilterPipeline::new().add_filter(AdultFilter);
        let records = vec![
            MovieRecord {
                adult: Some(true),
                ..MovieRecord::titled("A")
            },
            MovieRecord::titled("B"),
        ];

        let filtered = pipeline.apply(records).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].display_title(), "B");
    }

    #[test]
    fn test_upstream_defaults_order() {
        let pipeline = FilterPipeline::upstream_defaults();
        assert_eq!(
            pipeline.filter_names(),
            vec![
                "VoteFilter",
                "ReleaseYearFilter",
                "RuntimeFilter",
                "AdultFilter",
                "QualityPercentileFilter"
            ]
        );
    }
}
