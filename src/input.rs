//! Loading encoded polylines from files.
//!
//! Two layouts are understood:
//!
//! - a JSON array whose entries are either bare strings or objects carrying
//!   the polyline in `map.summary_polyline`, `map.polyline`,
//!   `summary_polyline` or `polyline` (activity exports use the first);
//! - anything else is read as one encoded polyline per line.
//!
//! Polyline strings may legitimately contain `\`, so the line format is read
//! verbatim with only surrounding whitespace removed.

use std::path::Path;

use log::debug;
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Default, Deserialize)]
struct ActivityMap {
    summary_polyline: Option<String>,
    polyline: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Record {
    Encoded(String),
    Activity {
        map: Option<ActivityMap>,
        summary_polyline: Option<String>,
        polyline: Option<String>,
    },
    Other(IgnoredAny),
}

impl Record {
    fn into_polyline(self) -> Option<String> {
        match self {
            Record::Encoded(s) => Some(s),
            Record::Activity {
                map,
                summary_polyline,
                polyline,
            } => {
                let map = map.unwrap_or_default();
                map.summary_polyline
                    .or(map.polyline)
                    .or(summary_polyline)
                    .or(polyline)
            }
            Record::Other(IgnoredAny) => None,
        }
    }
}

/// Extract encoded polylines from a JSON array.
///
/// Entries without a polyline are skipped.
pub fn parse_json(text: &str) -> Result<Vec<String>> {
    let records: Vec<Record> = serde_json::from_str(text)?;
    let total = records.len();
    let polylines: Vec<String> = records
        .into_iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let p = r.into_polyline();
            if p.is_none() {
                debug!("record #{} has no polyline, skipping", i);
            }
            p
        })
        .collect();
    debug!("{} of {} records carry a polyline", polylines.len(), total);
    Ok(polylines)
}

/// One encoded polyline per non-blank line.
pub fn parse_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}

/// True if `text` holds nothing but polyline characters and whitespace.
fn is_polyline_text(text: &str) -> bool {
    text.bytes()
        .all(|b| b.is_ascii_whitespace() || (b'?'..=b'~').contains(&b))
}

/// Parse either layout.
///
/// Text starting with `[` is tried as JSON first. `[` is also a polyline
/// character (a first latitude just north of the equator), so when that fails
/// and the text uses only the polyline alphabet it is read line by line.
pub fn parse_polylines(text: &str) -> Result<Vec<String>> {
    if !text.trim_start().starts_with('[') {
        return Ok(parse_lines(text));
    }
    match parse_json(text) {
        Ok(polylines) => Ok(polylines),
        Err(_) if is_polyline_text(text) => {
            debug!("not a JSON array, reading one polyline per line");
            Ok(parse_lines(text))
        }
        Err(e) => Err(e),
    }
}

/// Read a polyline file in either layout.
pub fn load_polylines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let polylines = parse_polylines(&text)?;
    debug!("loaded {} polylines from {}", polylines.len(), path.display());
    Ok(polylines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_export() {
        let text = r#"[
            {"id": 1, "name": "Morning Ride",
             "map": {"id": "a1", "summary_polyline": "_p~iF~ps|U_ulLnnqC_mqNvxq`@", "resource_state": 2}},
            {"id": 2, "map": {"id": "a2", "summary_polyline": null}},
            {"id": 3, "map": {"id": "a3", "polyline": "??"}}
        ]"#;
        let p = parse_json(text).unwrap();
        assert_eq!(p, vec!["_p~iF~ps|U_ulLnnqC_mqNvxq`@".to_string(), "??".to_string()]);
    }

    #[test]
    fn test_mixed_records() {
        let text = r#"["??", {"polyline": "_p~iF~ps|U"}, {"summary_polyline": "AA"}, 42, null]"#;
        let p = parse_json(text).unwrap();
        assert_eq!(p, vec!["??", "_p~iF~ps|U", "AA"]);
    }

    #[test]
    fn test_map_takes_precedence() {
        let text = r#"[{"polyline": "top", "map": {"summary_polyline": "inner"}}]"#;
        assert_eq!(parse_json(text).unwrap(), vec!["inner"]);
    }

    #[test]
    fn test_line_format_keeps_backslashes() {
        let text = "  _p~iF~ps|U \n\n}~kvHmzrr@ba\\\\\r\n";
        assert_eq!(parse_polylines(text).unwrap(), vec!["_p~iF~ps|U", "}~kvHmzrr@ba\\\\"]);
    }

    #[test]
    fn test_line_file_starting_with_bracket() {
        // A first latitude of 0.00014 encodes to a leading '['.
        let first = crate::polyline::encode(&[
            crate::basics::GeoPoint::new(0.00014, 0.0),
            crate::basics::GeoPoint::new(1.0, 1.0),
        ]);
        assert!(first.starts_with('['));
        let text = format!("{}\n_p~iF~ps|U\n", first);
        assert_eq!(parse_polylines(&text).unwrap(), vec![first, "_p~iF~ps|U".to_string()]);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(parse_polylines("[ {\"map\": ").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polylines.json");
        std::fs::write(&path, r#"[{"map": {"summary_polyline": "??"}}]"#).unwrap();
        assert_eq!(load_polylines(&path).unwrap(), vec!["??"]);
        assert!(load_polylines(dir.path().join("missing.json")).is_err());
    }
}
