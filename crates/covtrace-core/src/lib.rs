//! In-memory coverage aggregation for covtrace.
//!
//! Coverage data forms a strict four-level tree:
//!
//! ```text
//! RequirementCoverage ─▶ SubjectCoverage ─▶ TestRecord ─▶ ScenarioValue
//! ```
//!
//! Every level keeps its children in an identity-keyed [`MergeSet`], so a
//! child recorded twice is merged rather than appended and every collection
//! iterates (and serializes) in ascending key order. The same logical
//! coverage therefore always renders to the same JSON text, whatever order
//! the entries arrived in.
//!
//! [`CoverageSession`] owns one subject tree and one requirement forest and is
//! the only place entries enter the model.

pub mod merge_set;
pub mod render;
pub mod requirement;
pub mod scenario;
pub mod session;
pub mod subject;
pub mod test_record;

pub use covtrace_error::{CoverageError, NameKind, Result};
pub use merge_set::{Identified, MergeSet};
pub use render::{REQUIREMENT_REPORT_KEY, SUBJECT_REPORT_KEY};
pub use requirement::RequirementCoverage;
pub use scenario::ScenarioValue;
pub use session::{CoverageSession, CoverageSummary, DEFAULT_SUBJECT};
pub use subject::SubjectCoverage;
pub use test_record::TestRecord;

/// Returns `true` when `value` cannot serve as an identity key.
#[inline]
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate a candidate identity key.
pub(crate) fn require_name(value: String, kind: NameKind) -> Result<String> {
    if is_blank(&value) {
        return Err(CoverageError::invalid_name(kind));
    }
    Ok(value)
}

/// Check the precondition of a same-identity merge.
pub(crate) fn require_same_identity(expected: &str, actual: &str) -> Result<()> {
    if expected != actual {
        return Err(CoverageError::MergeIdentityMismatch {
            expected: expected.to_owned(),
            actual: actual.to_owned(),
        });
    }
    Ok(())
}
