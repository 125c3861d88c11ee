//! Filter on release year.
//!
//! Drops records released before a cutoff or dated in the future, and records
//! whose release date has no parseable year.

use crate::traits::Filter;
use anyhow::Result;
use chrono::{Datelike, Local};
use data_loader::MovieRecord;

/// Keeps records released within `[min_year, max_year]`.
pub struct ReleaseYearFilter {
    min_year: i32,
    max_year: i32,
}

impl ReleaseYearFilter {
    /// Create a new ReleaseYearFilter with an inclusive year range.
    pub fn new(min_year: i32, max_year: i32) -> Self {
        Self { min_year, max_year }
    }

    /// Keep releases from `min_year` up to the current year
    pub fn since(min_year: i32) -> Self {
        Self::new(min_year, Local::now().year())
    }
}

impl Default for ReleaseYearFilter {
    fn default() -> Self {
        Self::since(1970)
    }
}

impl Filter for ReleaseYearFilter {
    fn name(&self) -> &str {
        "ReleaseYearFilter"
    }

    fn apply(&self, records: Vec<MovieRecord>) -> Result<Vec<MovieRecord>> {
        let filtered = records
            .into_iter()
            .filter(|record| {
                record
                    .release_year()
                    .is_some_and(|year| year >= self.min_year && year <= self.max_year)
            })
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn released(title: &str, date: Option<&str>) -> MovieRecord {
        MovieRecord {
            release_date: date.map(str::to_string),
            ..MovieRecord::titled(title)
        }
    }

    #[test]
    fn test_release_year_filter() {
        let records = vec![
            released("Too Old", Some("1965-04-01")),
            released("Edge", Some("1970-01-01")),
            released("Recent", Some("2019-08-30")),
            released("Future", Some("2031-01-01")),
            released("Undated", None),
            released("Garbled", Some("TBA")),
        ];

        let filtered = ReleaseYearFilter::new(1970, 2025).apply(records).unwrap();
        let titles: Vec<&str> = filtered.iter().map(|r| r.display_title()).collect();
        assert_eq!(titles, vec!["Edge", "Recent"]);
    }

    #[test]
    fn test_default_upper_bound_is_current_year() {
        let this_year = Local::now().year();
        let records = vec![
            released("Now", Some(&format!("{this_year}-01-01"))),
            released("Next", Some(&format!("{}-01-01", this_year + 1))),
        ];

        let filtered = ReleaseYearFilter::default().apply(records).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].display_title(), "Now");
    }
}
