//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to a set of movie records before scoring.

use anyhow::Result;
use data_loader::MovieRecord;

/// Core trait for filtering movie records.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared across threads
/// - Filters take ownership of the Vec<MovieRecord> and return a filtered Vec
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of records.
    ///
    /// # Returns
    /// * `Ok(Vec<MovieRecord>)` - The records that pass, in input order
    /// * `Err` - If filtering fails
    fn apply(&self, records: Vec<MovieRecord>) -> Result<Vec<MovieRecord>>;
}
