//! Pre-scoring filters for movie records.
//!
//! This crate provides:
//! - Filter trait and implementations for dropping low-quality records
//! - FilterPipeline for composing filters
//!
//! ## Architecture
//! Records pass through the filters in order; each filter sees only the
//! survivors of the previous one. The default chain removes records with too
//! few votes, out-of-range release years, short or missing runtimes and
//! adult titles, then keeps the top 80% by a combined quality score.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//! use pipeline::filters::*;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(VoteFilter::new(100, 6.0, 10.0))
//!     .add_filter(AdultFilter);
//!
//! let kept = pipeline.apply(records)?;
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
