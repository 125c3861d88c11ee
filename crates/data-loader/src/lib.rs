//! # Data Loader Crate
//!
//! This crate handles reading and writing movie records for the mood scorer.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, Genre, GenreId)
//! - **parser**: Field-level parsing (genre ids, keywords, release year, lenient numbers)
//! - **dataset**: JSON Lines loading (strict, or per-line for scoring) and writing
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::load_movie_records;
//! use std::path::Path;
//!
//! let records = load_movie_records(Path::new("data/movies.jsonl"))?;
//! for record in &records {
//!     println!("{} -> {:?}", record.display_title(), record.genre_ids());
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod dataset;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{Genre, GenreId, MalformedRecord, MovieRecord, RecordLine, UNKNOWN_TITLE};
pub use parser::{extract_release_year, parse_keywords, resolve_genre_ids};
pub use dataset::{
    load_json_lines, load_movie_records, load_record_lines, parse_json_lines, parse_record_lines,
    write_json_lines,
};
