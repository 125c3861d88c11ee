//! Emotion engine: the public entry point for scoring records.
//!
//! The engine owns the compiled rules and is immutable after construction,
//! so one instance can be shared across threads (`Arc<EmotionEngine>`).
//!
//! ## Algorithm (per record)
//! 1. Build the signal breakdown and sum it into the raw vector
//! 2. Reject the record if any raw component is not finite
//! 3. Normalize onto 0-10
//!
//! A rejected record still produces output: a zero vector under its title,
//! marked as a fallback. Input lines that never parsed into a record are
//! handled the same way, so a batch always yields one output per input.

use crate::aggregate::{Aggregator, SignalBreakdown};
use crate::catalog::{MoodCatalog, RuleSet};
use crate::error::{Result, ScoreError};
use crate::normalize::{TieBreak, normalize};
use crate::rules::EmotionRules;
use crate::scores::MoodScores;
use chrono::{Datelike, Local};
use data_loader::{MovieRecord, RecordLine};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Output row: one mood vector per input record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionRecord {
    pub title: String,
    pub release_year: Option<i32>,
    pub emotion_vector: Vec<f64>,
}

/// Whether a record was scored or replaced by the fallback vector
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Scored,
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub outcome: ScoreOutcome,
    pub record: EmotionRecord,
}

impl ScoredRecord {
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, ScoreOutcome::Fallback { .. })
    }
}

/// Counts for one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub scored: usize,
    pub fallback: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[ScoredRecord]) -> Self {
        let fallback = results.iter().filter(|r| r.is_fallback()).count();
        Self {
            total: results.len(),
            scored: results.len() - fallback,
            fallback,
        }
    }
}

/// Scores movie records into mood vectors
pub struct EmotionEngine {
    rules: RuleSet,

    /// Year used for the age-based nostalgia boost
    reference_year: i32,

    tie_break: TieBreak,
}

impl EmotionEngine {
    /// Validate `rules` and build an engine
    ///
    /// The reference year defaults to the current local year.
    pub fn new(rules: &EmotionRules) -> Result<Self> {
        let rules = RuleSet::compile(rules)?;
        info!("Compiled rule set with {} moods", rules.catalog.len());
        Ok(Self {
            rules,
            reference_year: Local::now().year(),
            tie_break: TieBreak::default(),
        })
    }

    /// Engine over the built-in reference rules
    pub fn with_default_rules() -> Result<Self> {
        Self::new(&EmotionRules::default())
    }

    /// Pin the reference year (default: the current year)
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    /// Configure the tie-break policy (default: [`TieBreak::Flat`])
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn catalog(&self) -> &MoodCatalog {
        &self.rules.catalog
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Per-signal contributions for `record`
    pub fn breakdown(&self, record: &MovieRecord) -> SignalBreakdown {
        Aggregator::new(&self.rules, self.reference_year).breakdown(record)
    }

    /// Unnormalized mood vector for `record`
    pub fn raw_scores(&self, record: &MovieRecord) -> MoodScores {
        Aggregator::new(&self.rules, self.reference_year).raw_scores(record)
    }

    /// Score one record, surfacing internal failures
    pub fn try_score(
        &self,
        record: &MovieRecord,
    ) -> std::result::Result<EmotionRecord, ScoreError> {
        let raw = self.raw_scores(record);

        if let Some((idx, value)) = raw
            .as_slice()
            .iter()
            .copied()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            let mood = self
                .rules
                .catalog
                .get(idx)
                .map(|m| m.id.clone())
                .unwrap_or_default();
            return Err(ScoreError::NonFiniteScore { mood, value });
        }

        Ok(EmotionRecord {
            title: record.display_title().to_string(),
            release_year: record.release_year(),
            emotion_vector: normalize(raw.as_slice(), self.tie_break),
        })
    }

    /// Score one record. Never fails: errors become a fallback zero vector.
    pub fn score_one(&self, record: &MovieRecord) -> ScoredRecord {
        match self.try_score(record) {
            Ok(scored) => ScoredRecord {
                outcome: ScoreOutcome::Scored,
                record: scored,
            },
            Err(e) => self.fallback(record.display_title(), e),
        }
    }

    /// Score one input line; a line that did not parse becomes a fallback
    pub fn score_line(&self, line: &RecordLine) -> ScoredRecord {
        match line {
            Ok(record) => self.score_one(record),
            Err(bad) => self.fallback(
                bad.display_title(),
                ScoreError::MalformedRecord {
                    line: bad.line,
                    reason: bad.reason.clone(),
                },
            ),
        }
    }

    /// Score a batch in parallel; output order matches input order
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn score_many(&self, records: &[MovieRecord]) -> Vec<ScoredRecord> {
        let results: Vec<ScoredRecord> = records.par_iter().map(|r| self.score_one(r)).collect();
        log_summary(&results);
        results
    }

    /// Score parsed input lines in parallel, one result per line
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub fn score_lines(&self, lines: &[RecordLine]) -> Vec<ScoredRecord> {
        let results: Vec<ScoredRecord> = lines.par_iter().map(|l| self.score_line(l)).collect();
        log_summary(&results);
        results
    }

    fn fallback(&self, title: &str, error: ScoreError) -> ScoredRecord {
        warn!("Falling back for '{}': {}", title, error);
        ScoredRecord {
            outcome: ScoreOutcome::Fallback {
                reason: error.to_string(),
            },
            record: EmotionRecord {
                title: title.to_string(),
                release_year: None,
                emotion_vector: vec![0.0; self.rules.catalog.len()],
            },
        }
    }
}

fn log_summary(results: &[ScoredRecord]) {
    let summary = BatchSummary::from_results(results);
    info!(
        "Scored {} records ({} fallback)",
        summary.scored, summary.fallback
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::UNKNOWN_TITLE;

    fn engine() -> EmotionEngine {
        EmotionEngine::with_default_rules()
            .unwrap()
            .with_reference_year(2025)
    }

    #[test]
    fn test_empty_record() {
        let engine = engine();
        let result = engine.score_one(&MovieRecord::default());

        assert_eq!(result.outcome, ScoreOutcome::Scored);
        assert_eq!(result.record.title, UNKNOWN_TITLE);
        assert_eq!(result.record.release_year, None);
        assert_eq!(result.record.emotion_vector, vec![0.0; 12]);
    }

    #[test]
    fn test_builder_defaults() {
        let engine = EmotionEngine::with_default_rules().unwrap();
        assert_eq!(engine.tie_break(), TieBreak::Flat);
        assert!(engine.reference_year() >= 2024);

        let engine = engine.with_tie_break(TieBreak::ramp()).with_reference_year(1999);
        assert_eq!(engine.reference_year(), 1999);
        assert_eq!(engine.tie_break(), TieBreak::ramp());
    }

    #[test]
    fn test_romance_dominates() {
        let engine = engine();
        let record = MovieRecord {
            title: Some("Brief Encounter".to_string()),
            genres: Some("Romance".to_string()),
            ..MovieRecord::default()
        };

        let romantic = engine.catalog().index_of("romantic").unwrap();
        let raw = engine.raw_scores(&record);
        assert_eq!(raw.argmax().map(|(i, _)| i), Some(romantic));

        let scored = engine.score_one(&record).record;
        let top = scored
            .emotion_vector
            .iter()
            .cloned()
            .fold(f64::MIN, f64::max);
        assert_eq!(scored.emotion_vector[romantic], top);
    }

    #[test]
    fn test_batch_summary() {
        let results = vec![
            ScoredRecord {
                outcome: ScoreOutcome::Scored,
                record: EmotionRecord {
                    title: "a".to_string(),
                    release_year: None,
                    emotion_vector: vec![],
                },
            },
            ScoredRecord {
                outcome: ScoreOutcome::Fallback {
                    reason: "boom".to_string(),
                },
                record: EmotionRecord {
                    title: "b".to_string(),
                    release_year: None,
                    emotion_vector: vec![],
                },
            },
        ];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(
            summary,
            BatchSummary {
                total: 2,
                scored: 1,
                fallback: 1
            }
        );
    }

    #[test]
    fn test_output_serializes_null_year() {
        let record = EmotionRecord {
            title: "X".to_string(),
            release_year: None,
            emotion_vector: vec![1.5, 0.0],
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"title":"X","release_year":null,"emotion_vector":[1.5,0.0]}"#
        );
    }
}
