//! Field-level parsing for movie records.
//!
//! Everything here is total: bad input degrades to "absent" (an empty list,
//! `None`) rather than an error, so that a single odd field never costs the
//! whole record its score.
//!
//! - Genre resolution: `"Action|Science Fiction"` → `[28, 878]`
//! - Keyword parsing: `"'love', \"war\""` → `["love", "war"]`
//! - Release year: `"1999-03-31"` → `Some(1999)`
//! - Lenient serde deserializers for text, numbers, counts and flags

use crate::types::{Genre, GenreId};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a single genre name into a Genre
///
/// Example: "Action" -> Some(Genre::Action)
///          "Science Fiction" -> Some(Genre::ScienceFiction)
///          "TV Movie" -> None
pub fn parse_genre(s: &str) -> Option<Genre> {
    Genre::from_name(s.trim())
}

/// Resolve a delimited genre list into numeric ids
///
/// Both `,` and `|` act as separators. Unknown names are skipped, duplicates
/// are kept in order of appearance.
///
/// Example: "Action|Adventure, Sci-Fi" -> vec![28, 12]
pub fn resolve_genre_ids(genre_text: &str) -> Vec<GenreId> {
    genre_text
        .split([',', '|'])
        .filter_map(parse_genre)
        .map(Genre::id)
        .collect()
}

/// Parse a comma-delimited keyword list
///
/// Single and double quotes are removed, entries are trimmed and
/// lower-cased, and empty entries are dropped.
pub fn parse_keywords(keyword_text: &str) -> Vec<String> {
    keyword_text
        .replace(['"', '\''], "")
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Extract the release year from a date string
///
/// Only the first four characters are considered, and they must all be ASCII
/// digits.
///
/// Example: "1995-10-30" -> Some(1995)
///          "n/a" -> None
pub fn extract_release_year(release_date: &str) -> Option<i32> {
    let head = release_date.get(..4)?;
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}

// =============================================================================
// Lenient deserializers
// =============================================================================

fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Text field: strings are trimmed and kept if non-empty, numbers are
/// rendered as text (a movie called `1917`), anything else is absent.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Numeric field: finite numbers or numeric strings, otherwise absent.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

/// Count field: like [`lenient_number`], truncated toward zero. Negative
/// counts are treated as absent.
pub fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .filter(|n| *n >= 0.0)
        .map(|n| n.trunc() as u64))
}

/// Boolean field: JSON booleans, `"true"`/`"false"` in any case, or `0`/`1`.
pub fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Some(Value::Number(n)) => match n.as_f64() {
            Some(x) if x == 0.0 => Some(false),
            Some(x) if x == 1.0 => Some(true),
            _ => None,
        },
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovieRecord;

    #[test]
    fn test_parse_genre() {
        assert_eq!(parse_genre("Action"), Some(Genre::Action));
        assert_eq!(parse_genre(" Science Fiction "), Some(Genre::ScienceFiction));
        assert_eq!(parse_genre("TV Movie"), None);
        // Matching is case-sensitive, like the dataset's own labels
        assert_eq!(parse_genre("action"), None);
    }

    #[test]
    fn test_resolve_genre_ids_mixed_delimiters() {
        assert_eq!(
            resolve_genre_ids("Action|Adventure, Science Fiction"),
            vec![28, 12, 878]
        );
    }

    #[test]
    fn test_resolve_genre_ids_drops_unknown_and_keeps_duplicates() {
        assert_eq!(resolve_genre_ids("Drama, Sci-Fi, Drama"), vec![18, 18]);
        assert!(resolve_genre_ids("").is_empty());
        assert!(resolve_genre_ids(" , | ").is_empty());
    }

    #[test]
    fn test_parse_keywords() {
        let keywords = parse_keywords("'Love', \"Time Travel\",, WAR ,");
        assert_eq!(keywords, vec!["love", "time travel", "war"]);
        assert!(parse_keywords("").is_empty());
    }

    #[test]
    fn test_extract_release_year() {
        assert_eq!(extract_release_year("1995-10-30"), Some(1995));
        assert_eq!(extract_release_year("2001"), Some(2001));
        assert_eq!(extract_release_year("199"), None);
        assert_eq!(extract_release_year("n/a-01-01"), None);
        assert_eq!(extract_release_year("19x5-01-01"), None);
        assert_eq!(extract_release_year(""), None);
    }

    #[test]
    fn test_lenient_fields() {
        let record: MovieRecord = serde_json::from_str(
            r#"{
                "title": 1917,
                "overview": "   ",
                "runtime": "119.0",
                "vote_average": "not a number",
                "vote_count": 2500.7,
                "popularity": null,
                "release_date": "2019-12-25",
                "adult": "False"
            }"#,
        )
        .unwrap();

        assert_eq!(record.title.as_deref(), Some("1917"));
        assert_eq!(record.overview, None);
        assert_eq!(record.runtime, Some(119.0));
        assert_eq!(record.vote_average, None);
        assert_eq!(record.vote_count, Some(2500));
        assert_eq!(record.popularity, None);
        assert_eq!(record.release_year(), Some(2019));
        assert_eq!(record.adult, Some(false));
    }

    #[test]
    fn test_negative_count_is_absent() {
        let record: MovieRecord = serde_json::from_str(r#"{"vote_count": -4}"#).unwrap();
        assert_eq!(record.vote_count, None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let record: MovieRecord =
            serde_json::from_str(r#"{"id": 550, "title": "Fight Club", "budget": 63000000}"#)
                .unwrap();
        assert_eq!(record.display_title(), "Fight Club");
    }
}
