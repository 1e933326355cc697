//! JSON-lines entry files.
//!
//! One object per line:
//!
//! ```text
//! {"test":"login","scenario":{"user":"x"},"requirements":["US-12"]}
//! {"test":"logout"}
//! ```
//!
//! `scenario` and `requirements` are optional. Blank lines are skipped. A
//! null `requirements` reads as an empty list, and a null id inside it is
//! treated like a blank one.

use std::path::Path;

use covtrace_core::CoverageSession;
use covtrace_error::{CoverageError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// One recorded `(test, scenario, requirements)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverageEntry {
    pub test: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<Value>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub requirements: Vec<Option<String>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Option<String>>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl CoverageEntry {
    pub fn new(test: impl Into<String>) -> Self {
        Self {
            test: Some(test.into()),
            scenario: None,
            requirements: Vec::new(),
        }
    }

    pub fn with_scenario(mut self, scenario: Value) -> Self {
        self.scenario = Some(scenario);
        self
    }

    pub fn with_requirement(mut self, id: impl Into<String>) -> Self {
        self.requirements.push(Some(id.into()));
        self
    }
}

/// Counts from [`replay_entries`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayStats {
    pub accepted: usize,
    pub dropped: usize,
}

/// Parse a JSON-lines payload. Line numbers in errors are 1-based.
pub fn parse_entries(payload: &str) -> Result<Vec<CoverageEntry>> {
    let mut entries = Vec::new();
    for (line_index, line) in payload.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry: CoverageEntry =
            serde_json::from_str(line).map_err(|error| CoverageError::EntryParse {
                line: line_index + 1,
                detail: error.to_string(),
            })?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Read and parse an entries file.
pub fn load_entries(path: &Path) -> Result<Vec<CoverageEntry>> {
    let payload = std::fs::read_to_string(path)?;
    let entries = parse_entries(&payload)?;
    debug!(path = %path.display(), count = entries.len(), "loaded coverage entries");
    Ok(entries)
}

/// Feed `entries` into `session` in order. Null requirement ids follow the
/// same drop rules as blank ones.
pub fn replay_entries(session: &mut CoverageSession, entries: &[CoverageEntry]) -> ReplayStats {
    let mut stats = ReplayStats::default();
    for entry in entries {
        let requirements: Vec<&str> = entry
            .requirements
            .iter()
            .map(|id| id.as_deref().unwrap_or_default())
            .collect();
        let accepted = session.add_entry(
            entry.test.as_deref().unwrap_or_default(),
            entry.scenario.clone(),
            &requirements,
        );
        if accepted {
            stats.accepted += 1;
        } else {
            stats.dropped += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_skips_blank_lines() {
        let payload = concat!(
            r#"{"test":"login","scenario":{"user":"x"},"requirements":["US-12"]}"#,
            "\n\n   \n",
            r#"{"test":"logout"}"#,
            "\n"
        );
        let entries = parse_entries(payload).expect("parse");
        assert_eq!(
            entries,
            vec![
                CoverageEntry::new("login")
                    .with_scenario(json!({"user": "x"}))
                    .with_requirement("US-12"),
                CoverageEntry::new("logout"),
            ]
        );
    }

    #[test]
    fn null_fields_parse_as_absent() {
        let entries =
            parse_entries(r#"{"test":null,"scenario":null,"requirements":[]}"#).expect("parse");
        assert_eq!(entries[0].test, None);
        assert_eq!(entries[0].scenario, None);
    }

    #[test]
    fn null_requirement_list_parses_as_empty() {
        let entries =
            parse_entries(r#"{"test":"t","requirements":null}"#).expect("null list accepted");
        assert_eq!(entries, vec![CoverageEntry::new("t")]);
    }

    #[test]
    fn null_requirement_ids_are_skipped_on_replay() {
        let payload = concat!(
            r#"{"test":"t1","requirements":[null,"R1"]}"#,
            "\n",
            r#"{"test":"t2","requirements":[null]}"#,
            "\n",
            r#"{"test":"t3","requirements":null}"#,
            "\n"
        );
        let entries = parse_entries(payload).expect("null ids accepted");
        assert_eq!(entries[0].requirements, vec![None, Some("R1".to_owned())]);

        let mut session = CoverageSession::new("application").expect("valid");
        let stats = replay_entries(&mut session, &entries);
        assert_eq!(
            stats,
            ReplayStats {
                accepted: 2,
                dropped: 1
            }
        );
        let ids: Vec<&str> = session.requirements().keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["R1"]);
        assert!(session.subject_tree().test("t1").is_some());
        assert!(session.subject_tree().test("t2").is_none());
        assert!(session.subject_tree().test("t3").is_some());
    }

    #[test]
    fn parse_reports_line_number() {
        let payload = "{\"test\":\"a\"}\n{not json}\n";
        let err = parse_entries(payload).expect_err("bad line");
        assert!(matches!(err, CoverageError::EntryParse { line: 2, .. }));
    }

    #[test]
    fn parse_rejects_unknown_fields() {
        let err = parse_entries(r#"{"test":"a","extra":1}"#).expect_err("unknown field");
        assert!(matches!(err, CoverageError::EntryParse { line: 1, .. }));
    }

    #[test]
    fn replay_counts_dropped_entries() {
        let mut session = CoverageSession::new("application").expect("valid");
        let entries = vec![
            CoverageEntry::new("t1").with_requirement("R1"),
            CoverageEntry {
                test: None,
                scenario: None,
                requirements: Vec::new(),
            },
            CoverageEntry::new("").with_scenario(json!("s")),
            CoverageEntry::new("t2").with_requirement(""),
            CoverageEntry::new("t1").with_scenario(json!("s")),
        ];
        let stats = replay_entries(&mut session, &entries);
        assert_eq!(
            stats,
            ReplayStats {
                accepted: 2,
                dropped: 3
            }
        );
        assert_eq!(session.summary().test_count, 1);
        assert_eq!(session.summary().requirement_count, 1);
    }

    #[test]
    fn load_reads_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("entries.jsonl");
        std::fs::write(&path, "{\"test\":\"a\"}\n{\"test\":\"b\"}\n").expect("write");
        assert_eq!(load_entries(&path).expect("load").len(), 2);
    }
}
