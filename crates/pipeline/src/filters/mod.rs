//! Filter implementations for the pre-scoring pipeline.
//!
//! Each filter checks one data-quality condition on a movie record and can be
//! composed into a FilterPipeline.

pub mod adult;
pub mod quality_percentile;
pub mod release_year;
pub mod runtime;
pub mod vote;

// Re-export for convenience
pub use adult::AdultFilter;
pub use quality_percentile::{QualityPercentileFilter, quality_score};
pub use release_year::ReleaseYearFilter;
pub use runtime::RuntimeFilter;
pub use vote::VoteFilter;
