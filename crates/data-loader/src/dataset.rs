//! JSON Lines loading and writing.
//!
//! Input datasets hold one [`MovieRecord`] object per line; scoring output
//! uses the same layout. Lines are parsed in parallel with Rayon, and the
//! result keeps file order.
//!
//! [`parse_json_lines`] is strict: one bad line fails the load.
//! [`parse_record_lines`] is the scoring path: a bad line becomes a
//! [`MalformedRecord`] in its slot and the rest of the batch still loads.

use crate::error::{DataLoadError, Result};
use crate::types::{MalformedRecord, MovieRecord, RecordLine};
use rayon::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Read a whole file into a string, mapping "not found" to a friendlier error
fn read_to_string(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

/// Parse JSON Lines content
///
/// Blank lines are skipped. A line that is not valid JSON for `T` fails the
/// whole parse with its 1-based line number.
///
/// `source` is only used to label errors.
pub fn parse_json_lines<T>(source: &str, content: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned + Send,
{
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    lines
        .par_iter()
        .map(|&(line_no, line)| {
            serde_json::from_str(line).map_err(|e| DataLoadError::ParseError {
                file: source.to_string(),
                line: line_no,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Load every item of a JSON Lines file
pub fn load_json_lines<T>(path: &Path) -> Result<Vec<T>>
where
    T: DeserializeOwned + Send,
{
    debug!("Reading {:?}", path);
    let content = read_to_string(path)?;
    parse_json_lines(&path.display().to_string(), &content)
}

/// Load movie records from a JSON Lines file
pub fn load_movie_records(path: &Path) -> Result<Vec<MovieRecord>> {
    let records: Vec<MovieRecord> = load_json_lines(path)?;
    info!("Loaded {} movie records from {:?}", records.len(), path);
    Ok(records)
}

/// Read one line as a movie record
///
/// The line is parsed as a JSON value first, so a line that is valid JSON
/// but not a record can still report its title.
fn record_from_line(line_no: usize, line: &str) -> RecordLine {
    let value: Value = serde_json::from_str(line).map_err(|e| MalformedRecord {
        line: line_no,
        title: None,
        reason: e.to_string(),
    })?;

    let title = value
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    serde_json::from_value(value).map_err(|e| MalformedRecord {
        line: line_no,
        title,
        reason: e.to_string(),
    })
}

/// Parse JSON Lines content into one entry per non-blank line
///
/// Never fails: lines that are not records come back as [`MalformedRecord`]s
/// in their original position.
pub fn parse_record_lines(content: &str) -> Vec<RecordLine> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    lines
        .par_iter()
        .map(|&(line_no, line)| record_from_line(line_no, line))
        .collect()
}

/// Load a JSON Lines file for scoring, keeping malformed lines in place
///
/// Only whole-file problems (missing file, I/O) are errors.
pub fn load_record_lines(path: &Path) -> Result<Vec<RecordLine>> {
    debug!("Reading {:?}", path);
    let content = read_to_string(path)?;
    let lines = parse_record_lines(&content);

    let malformed = lines.iter().filter(|l| l.is_err()).count();
    if malformed > 0 {
        warn!("{} of {} lines in {:?} are not valid records", malformed, lines.len(), path);
    }
    info!("Loaded {} movie records from {:?}", lines.len() - malformed, path);
    Ok(lines)
}

/// Write items as JSON Lines, one object per line
pub fn write_json_lines<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for item in items {
        serde_json::to_writer(&mut writer, item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    info!("Wrote {} lines to {:?}", items.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_lines_preserves_order() {
        let content = r#"
{"title": "Alien", "genres": "Horror|Science Fiction"}

{"title": "Amélie", "genres": "Comedy, Romance"}
{"title": "Heat"}
"#;
        let records: Vec<MovieRecord> = parse_json_lines("inline", content).unwrap();
        let titles: Vec<&str> = records.iter().map(|r| r.display_title()).collect();
        assert_eq!(titles, vec!["Alien", "Amélie", "Heat"]);
        assert_eq!(records[0].genre_ids(), vec![27, 878]);
    }

    #[test]
    fn test_parse_json_lines_reports_line_number() {
        let content = "{\"title\": \"ok\"}\n{not json}\n";
        let err = parse_json_lines::<MovieRecord>("movies.jsonl", content).unwrap_err();
        match err {
            DataLoadError::ParseError { file, line, .. } => {
                assert_eq!(file, "movies.jsonl");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_record_lines_keep_bad_lines_in_place() {
        let content = r#"{"title": "Good One", "genres": "Comedy"}
{"title": "Dup", "title": "Dup2", "runtime": 95}
["not", "an", "object"]
{"title": "Truncated", "genres":
{"title": "Good Two", "genres": "Drama"}
"#;
        let lines = parse_record_lines(content);
        assert_eq!(lines.len(), 5);

        assert_eq!(lines[0].as_ref().unwrap().display_title(), "Good One");
        // Repeated keys are read last-one-wins instead of rejecting the line
        let dup = lines[1].as_ref().unwrap();
        assert_eq!(dup.display_title(), "Dup2");
        assert_eq!(dup.runtime, Some(95.0));

        let not_object = lines[2].as_ref().unwrap_err();
        assert_eq!(not_object.line, 3);
        assert_eq!(not_object.display_title(), crate::UNKNOWN_TITLE);

        let truncated = lines[3].as_ref().unwrap_err();
        assert_eq!(truncated.line, 4);
        assert_eq!(truncated.title, None);

        assert_eq!(lines[4].as_ref().unwrap().display_title(), "Good Two");
    }

    #[test]
    fn test_lenient_fields_are_not_malformed() {
        let lines = parse_record_lines(r#"{"title": 1917}
{"title": "  Heat  ", "runtime": [1, 2]}
"#);
        // Numeric titles and junk numeric fields are lenient, not malformed
        assert_eq!(lines[0].as_ref().unwrap().display_title(), "1917");
        let heat = lines[1].as_ref().unwrap();
        assert_eq!(heat.display_title(), "Heat");
        assert_eq!(heat.runtime, None);
    }

    #[test]
    fn test_load_record_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.jsonl");
        std::fs::write(&path, "{\"title\": \"A\"}\nnot json\n{\"title\": \"B\"}\n").unwrap();

        let lines = load_record_lines(&path).unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].is_ok());
        assert!(lines[1].is_err());
        assert!(lines[2].is_ok());

        let missing = load_record_lines(Path::new("definitely/not/here.jsonl"));
        assert!(matches!(missing, Err(DataLoadError::FileNotFound { .. })));
    }

    #[test]
    fn test_missing_file() {
        let err = load_movie_records(Path::new("definitely/not/here.jsonl")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.jsonl");

        let mut heat = MovieRecord::titled("Heat");
        heat.runtime = Some(170.0);
        heat.release_date = Some("1995-12-15".to_string());
        let records = vec![MovieRecord::titled("Alien"), heat];

        write_json_lines(&path, &records).unwrap();
        let loaded = load_movie_records(&path).unwrap();

        assert_eq!(loaded, records);
    }
}
