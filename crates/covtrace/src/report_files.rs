//! Report filenames and persistence.
//!
//! Each report is one flat JSON file named after the report subject:
//! `<slug>_coverage.json` and `<slug>_requirements_coverage.json`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use covtrace_core::{CoverageSession, CoverageSummary};
use covtrace_error::{CoverageError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::CoverageConfig;

pub const SUBJECT_REPORT_SUFFIX: &str = "_coverage.json";
pub const REQUIREMENT_REPORT_SUFFIX: &str = "_requirements_coverage.json";

const FALLBACK_SLUG: &str = "coverage";

/// Filename stem for `subject`: ASCII-lowercased, each run of other
/// characters collapsed to one `_`, no leading or trailing `_`.
#[must_use]
pub fn subject_slug(subject: &str) -> String {
    let mut slug = String::with_capacity(subject.len());
    let mut pending_separator = false;
    for ch in subject.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    if slug.is_empty() {
        return FALLBACK_SLUG.to_owned();
    }
    slug
}

/// Where the two reports for one subject live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPaths {
    /// Subject coverage document.
    pub subject: PathBuf,
    /// Requirement coverage document.
    pub requirements: PathBuf,
}

impl ReportPaths {
    #[must_use]
    pub fn new(output_dir: &Path, subject: &str) -> Self {
        let slug = subject_slug(subject);
        Self {
            subject: output_dir.join(format!("{slug}{SUBJECT_REPORT_SUFFIX}")),
            requirements: output_dir.join(format!("{slug}{REQUIREMENT_REPORT_SUFFIX}")),
        }
    }

    #[must_use]
    pub fn for_config(config: &CoverageConfig) -> Self {
        Self::new(&config.output_dir, &config.subject)
    }

    fn all(&self) -> [&Path; 2] {
        [self.subject.as_path(), self.requirements.as_path()]
    }
}

/// Result of [`write_reports`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenReports {
    pub subject_report: PathBuf,
    pub requirement_report: PathBuf,
    pub summary: CoverageSummary,
}

/// Remove both report files if present. Returns how many were removed.
pub fn clean_reports(paths: &ReportPaths) -> Result<usize> {
    let mut removed = 0;
    for path in paths.all() {
        match std::fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed stale report");
                removed += 1;
            }
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => {
                return Err(CoverageError::ReportWrite {
                    path: path.to_path_buf(),
                    detail: format!("remove_failed error={error}"),
                });
            }
        }
    }
    Ok(removed)
}

/// Render both documents from `session` and write them to `paths`.
pub fn write_reports(session: &CoverageSession, paths: &ReportPaths) -> Result<WrittenReports> {
    let subject_text = session.render_subject_report()?;
    let requirement_text = session.render_requirement_report()?;

    write_file(&paths.subject, &subject_text)?;
    write_file(&paths.requirements, &requirement_text)?;

    let summary = session.summary();
    info!(
        subject = %summary.subject,
        tests = summary.test_count,
        scenarios = summary.scenario_count,
        requirements = summary.requirement_count,
        subject_report = %paths.subject.display(),
        requirement_report = %paths.requirements.display(),
        "coverage reports written"
    );

    Ok(WrittenReports {
        subject_report: paths.subject.clone(),
        requirement_report: paths.requirements.clone(),
        summary,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|error| CoverageError::ReportWrite {
            path: path.to_path_buf(),
            detail: format!("create_dir_failed error={error}"),
        })?;
    }
    std::fs::write(path, contents).map_err(|error| CoverageError::ReportWrite {
        path: path.to_path_buf(),
        detail: format!("write_failed error={error}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slug_normalizes_subject() {
        assert_eq!(subject_slug("application"), "application");
        assert_eq!(subject_slug("Payment Service"), "payment_service");
        assert_eq!(subject_slug("  Auth -- API v2 "), "auth_api_v2");
        assert_eq!(subject_slug("ÜberApp"), "berapp");
        assert_eq!(subject_slug("***"), "coverage");
    }

    #[test]
    fn paths_derive_from_subject() {
        let paths = ReportPaths::new(Path::new("out"), "Payment Service");
        assert_eq!(
            paths.subject,
            PathBuf::from("out/payment_service_coverage.json")
        );
        assert_eq!(
            paths.requirements,
            PathBuf::from("out/payment_service_requirements_coverage.json")
        );
    }

    #[test]
    fn write_then_clean_round_trip() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = ReportPaths::new(&temp.path().join("nested/dir"), "application");

        let mut session = CoverageSession::new("application").expect("valid");
        session.add_entry("t", Some(json!("s")), &["R1"]);

        let written = write_reports(&session, &paths).expect("write");
        assert_eq!(written.summary.test_count, 1);
        assert_eq!(
            std::fs::read_to_string(&paths.subject).expect("read subject report"),
            r#"{"application_coverage":[{"subject":"application","tests":[{"test":"t","scenarios":["s"]}]}]}"#
        );
        assert_eq!(
            std::fs::read_to_string(&paths.requirements).expect("read requirement report"),
            r#"{"requirements_coverage":[{"id":"R1","subjects":[{"subject":"application","tests":[{"test":"t","scenarios":["s"]}]}]}]}"#
        );

        assert_eq!(clean_reports(&paths).expect("clean"), 2);
        assert!(!paths.subject.exists());
        assert_eq!(clean_reports(&paths).expect("clean again"), 0);
    }

    #[test]
    fn empty_session_writes_bare_documents() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = ReportPaths::new(temp.path(), "application");
        let session = CoverageSession::new("application").expect("valid");
        write_reports(&session, &paths).expect("write");
        assert_eq!(
            std::fs::read_to_string(&paths.subject).expect("read"),
            r#"{"application_coverage"}"#
        );
        assert_eq!(
            std::fs::read_to_string(&paths.requirements).expect("read"),
            r#"{"requirements_coverage"}"#
        );
    }

    #[test]
    fn write_fails_when_output_dir_is_a_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "x").expect("write blocker");
        let paths = ReportPaths::new(&blocker, "application");
        let session = CoverageSession::new("application").expect("valid");
        let err = write_reports(&session, &paths).expect_err("cannot write under a file");
        assert!(matches!(err, CoverageError::ReportWrite { .. }));
    }
}
