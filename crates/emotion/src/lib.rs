//! # Emotion Crate
//!
//! Turns movie records into fixed-length mood vectors on a 0-10 scale, one
//! component per mood in the catalog.
//!
//! ## Main Components
//!
//! - **rules**: Serializable rule tables and the built-in reference rules
//! - **catalog**: Validated, index-resolved form of the rules
//! - **text / genre / scalar / keywords**: Independent signal scorers
//! - **aggregate**: Merges the signals into a raw vector
//! - **normalize**: Sigmoid normalization and tie-break policy
//! - **engine**: Public entry point (`score_one`, `score_many`)
//!
//! ## Example Usage
//!
//! ```ignore
//! use emotion::EmotionEngine;
//! use data_loader::load_movie_records;
//!
//! let engine = EmotionEngine::with_default_rules()?;
//! let records = load_movie_records(Path::new("data/movies.jsonl"))?;
//! for scored in engine.score_many(&records) {
//!     println!("{} {:?}", scored.record.title, scored.record.emotion_vector);
//! }
//! ```

pub mod error;
pub mod rules;
pub mod scores;
pub mod catalog;
pub mod text;
pub mod genre;
pub mod scalar;
pub mod keywords;
pub mod aggregate;
pub mod normalize;
pub mod engine;

pub use error::{ConfigError, Result, ScoreError};
pub use rules::EmotionRules;
pub use catalog::{MoodCatalog, MoodDefinition, RuleSet};
pub use scores::{MoodIndex, MoodScores};
pub use aggregate::SignalBreakdown;
pub use normalize::{TieBreak, normalize, round2};
pub use engine::{BatchSummary, EmotionEngine, EmotionRecord, ScoreOutcome, ScoredRecord};
