//! Core domain types for movie records.
//!
//! This module defines the record shape handed to the emotion engine and the
//! canonical genre table. Key points:
//! - Every field of a [`MovieRecord`] is optional; absence is never an error
//! - Numeric fields go through lenient deserializers (see `parser`)
//! - [`Genre`] carries the fixed name → numeric id mapping

use crate::parser;
use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Numeric genre identifier (TMDB ids, e.g. 28 for Action)
pub type GenreId = u32;

/// Sentinel title used when a record carries no usable title
pub const UNKNOWN_TITLE: &str = "Unknown Movie";

// =============================================================================
// Genre
// =============================================================================

/// The genres the scorer knows about.
///
/// Names outside this set are dropped during resolution; they are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Animation,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Family,
    Fantasy,
    History,
    Horror,
    Music,
    Mystery,
    Romance,
    ScienceFiction,
    Thriller,
    War,
    Western,
}

impl Genre {
    /// Every known genre, in declaration order
    pub const ALL: [Genre; 18] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Family,
        Genre::Fantasy,
        Genre::History,
        Genre::Horror,
        Genre::Music,
        Genre::Mystery,
        Genre::Romance,
        Genre::ScienceFiction,
        Genre::Thriller,
        Genre::War,
        Genre::Western,
    ];

    /// Canonical numeric id
    pub fn id(self) -> GenreId {
        match self {
            Genre::Action => 28,
            Genre::Adventure => 12,
            Genre::Animation => 16,
            Genre::Comedy => 35,
            Genre::Crime => 80,
            Genre::Documentary => 99,
            Genre::Drama => 18,
            Genre::Family => 10751,
            Genre::Fantasy => 14,
            Genre::History => 36,
            Genre::Horror => 27,
            Genre::Music => 10402,
            Genre::Mystery => 9648,
            Genre::Romance => 10749,
            Genre::ScienceFiction => 878,
            Genre::Thriller => 53,
            Genre::War => 10752,
            Genre::Western => 37,
        }
    }

    /// Display name, as it appears in the genres field of a record
    pub fn name(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Animation => "Animation",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Family => "Family",
            Genre::Fantasy => "Fantasy",
            Genre::History => "History",
            Genre::Horror => "Horror",
            Genre::Music => "Music",
            Genre::Mystery => "Mystery",
            Genre::Romance => "Romance",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Thriller => "Thriller",
            Genre::War => "War",
            Genre::Western => "Western",
        }
    }

    /// Look a genre up by numeric id
    pub fn from_id(id: GenreId) -> Option<Genre> {
        Genre::ALL.into_iter().find(|genre| genre.id() == id)
    }

    /// Look a genre up by exact display name
    pub fn from_name(name: &str) -> Option<Genre> {
        Genre::ALL.into_iter().find(|genre| genre.name() == name)
    }
}

// =============================================================================
// MovieRecord
// =============================================================================

/// One movie as produced by the upstream dataset.
///
/// Field names follow the dataset columns (`vote_average`, `release_date`...).
/// Text fields that are empty after trimming deserialize to `None`; numeric
/// fields accept numbers or numeric strings and fall back to `None` for
/// anything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(
        default,
        deserialize_with = "parser::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    #[serde(
        default,
        deserialize_with = "parser::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub overview: Option<String>,

    #[serde(
        default,
        deserialize_with = "parser::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub tagline: Option<String>,

    /// Comma- or pipe-delimited genre names, e.g. `"Action, Adventure"`
    #[serde(
        default,
        deserialize_with = "parser::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub genres: Option<String>,

    /// Comma-delimited free-form keywords, possibly quoted
    #[serde(
        default,
        deserialize_with = "parser::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub keywords: Option<String>,

    /// Runtime in minutes
    #[serde(
        default,
        alias = "runtime_minutes",
        deserialize_with = "parser::lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub runtime: Option<f64>,

    #[serde(
        default,
        deserialize_with = "parser::lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub vote_average: Option<f64>,

    #[serde(
        default,
        deserialize_with = "parser::lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub vote_count: Option<u64>,

    #[serde(
        default,
        deserialize_with = "parser::lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub popularity: Option<f64>,

    /// Release date, `YYYY-MM-DD` in the source data
    #[serde(
        default,
        deserialize_with = "parser::lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<String>,

    #[serde(
        default,
        deserialize_with = "parser::lenient_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub adult: Option<bool>,
}

/// An input line that could not be read as a [`MovieRecord`]
///
/// Kept in place of the record so a batch keeps one entry per input line.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRecord {
    /// 1-based line number in the source file
    pub line: usize,
    /// Title string found on the line, if the line was a JSON object with one
    pub title: Option<String>,
    pub reason: String,
}

impl MalformedRecord {
    /// Title to report in output, falling back to [`UNKNOWN_TITLE`]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }
}

/// One input line: the parsed record, or why it could not be parsed
pub type RecordLine = std::result::Result<MovieRecord, MalformedRecord>;

impl MovieRecord {
    /// Create a record with only a title set
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Title to report in output, falling back to [`UNKNOWN_TITLE`]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }

    /// Resolved genre ids, in order of appearance (unknown names dropped)
    pub fn genre_ids(&self) -> Vec<GenreId> {
        self.genres
            .as_deref()
            .map(parser::resolve_genre_ids)
            .unwrap_or_default()
    }

    /// Parsed keyword list (lower-cased, quotes stripped, empties dropped)
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .as_deref()
            .map(parser::parse_keywords)
            .unwrap_or_default()
    }

    /// Release year taken from the leading four digits of `release_date`
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(parser::extract_release_year)
    }
}
