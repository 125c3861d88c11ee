//! Filter to exclude adult titles.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::MovieRecord;

/// Removes records explicitly flagged as adult.
///
/// Records with no adult flag are kept.
pub struct AdultFilter;

impl Filter for AdultFilter {
    fn name(&self) -> &str {
        "AdultFilter"
    }

    fn apply(&self, records: Vec<MovieRecord>) -> Result<Vec<MovieRecord>> {
        Ok(records
            .into_iter()
            .filter(|r| r.adult != Some(true))
            .collect())
    }
}
