//! Coverage recording front door and report plumbing.
//!
//! [`CoverageRecorder`] is what test code talks to: it accepts entries
//! through the `add_*` family, feeds them into a
//! [`CoverageSession`](covtrace_core::CoverageSession), and writes the two
//! JSON reports into the configured output directory. [`SharedRecorder`]
//! wraps it in a single lock for test suites that record from several
//! threads.
//!
//! The `coverage_report` binary replays a JSON-lines entries file through
//! the same path.

pub mod config;
pub mod entries;
pub mod logging;
pub mod recorder;
pub mod report_files;

pub use config::CoverageConfig;
pub use covtrace_core::{CoverageSession, CoverageSummary, DEFAULT_SUBJECT};
pub use covtrace_error::{CoverageError, NameKind, Result};
pub use entries::{CoverageEntry, ReplayStats, load_entries, parse_entries, replay_entries};
pub use recorder::{CoverageRecorder, SharedRecorder};
pub use report_files::{ReportPaths, WrittenReports, clean_reports, write_reports};
