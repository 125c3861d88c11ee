//! Filter on runtime. Records without a runtime are dropped.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::MovieRecord;

pub struct RuntimeFilter {
    min_runtime: f64,
}

impl RuntimeFilter {
    /// # Arguments
    /// * `min_runtime` - Minimum runtime in minutes (typically 60)
    pub fn new(min_runtime: f64) -> Self {
        Self { min_runtime }
    }
}

impl Default for RuntimeFilter {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl Filter for RuntimeFilter {
    fn name(&self) -> &str {
        "RuntimeFilter"
    }

    fn apply(&self, records: Vec<MovieRecord>) -> Result<Vec<MovieRecord>> {
        Ok(records
            .into_iter()
            .filter(|r| r.runtime.is_some_and(|m| m >= self.min_runtime))
            .collect())
    }
}
