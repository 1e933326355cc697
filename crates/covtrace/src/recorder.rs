//! The recording front door.
//!
//! Every `add_*` method is best-effort. A missing or blank test name is
//! dropped without an error, as are null scenarios and blank requirement ids.

use std::sync::Arc;

use covtrace_core::{CoverageSession, CoverageSummary};
use covtrace_error::Result;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::CoverageConfig;
use crate::entries::{CoverageEntry, ReplayStats, replay_entries};
use crate::report_files::{ReportPaths, WrittenReports, clean_reports, write_reports};

/// Records coverage entries for one report subject and writes its reports.
#[derive(Debug)]
pub struct CoverageRecorder {
    config: CoverageConfig,
    paths: ReportPaths,
    session: CoverageSession,
}

impl CoverageRecorder {
    /// Create a recorder. With `clean_on_start`, stale reports for the same
    /// subject are removed first; a failed removal is logged, not returned.
    pub fn new(config: CoverageConfig) -> Result<Self> {
        config.validate()?;
        let session = CoverageSession::new(config.subject.clone())?;
        let paths = ReportPaths::for_config(&config);
        if config.clean_on_start {
            match clean_reports(&paths) {
                Ok(removed) => debug!(subject = %config.subject, removed, "stale reports cleaned"),
                Err(error) => warn!(subject = %config.subject, %error, "stale report cleanup failed"),
            }
        }
        Ok(Self {
            config,
            paths,
            session,
        })
    }

    /// Record that `test` ran.
    pub fn add_test(&mut self, test: Option<&str>) -> bool {
        self.add_entry::<&str>(test, None, &[])
    }

    /// Record that `test` ran with `scenario`.
    pub fn add_scenario(&mut self, test: Option<&str>, scenario: Option<Value>) -> bool {
        self.add_entry::<&str>(test, scenario, &[])
    }

    /// Record that `test` ran with `scenario` and verifies each requirement.
    /// See [`CoverageSession::add_entry`] for the drop rules.
    pub fn add_entry<R: AsRef<str>>(
        &mut self,
        test: Option<&str>,
        scenario: Option<Value>,
        requirements: &[R],
    ) -> bool {
        let Some(test) = test else {
            debug!(subject = %self.config.subject, "dropping entry without test name");
            return false;
        };
        self.session.add_entry(test, scenario, requirements)
    }

    /// Replay parsed entries in order.
    pub fn replay(&mut self, entries: &[CoverageEntry]) -> ReplayStats {
        replay_entries(&mut self.session, entries)
    }

    /// Render and persist both reports. Safe to call repeatedly.
    pub fn write(&self) -> Result<WrittenReports> {
        write_reports(&self.session, &self.paths)
    }

    pub fn summary(&self) -> CoverageSummary {
        self.session.summary()
    }

    pub fn session(&self) -> &CoverageSession {
        &self.session
    }

    pub fn config(&self) -> &CoverageConfig {
        &self.config
    }

    pub fn paths(&self) -> &ReportPaths {
        &self.paths
    }

    pub fn into_shared(self) -> SharedRecorder {
        SharedRecorder::new(self)
    }
}

/// A [`CoverageRecorder`] behind one exclusive lock, held for the whole of
/// each call. Cloning shares the same recorder.
#[derive(Debug, Clone)]
pub struct SharedRecorder {
    inner: Arc<Mutex<CoverageRecorder>>,
}

impl SharedRecorder {
    pub fn new(recorder: CoverageRecorder) -> Self {
        Self {
            inner: Arc::new(Mutex::new(recorder)),
        }
    }

    pub fn add_test(&self, test: Option<&str>) -> bool {
        self.inner.lock().add_test(test)
    }

    pub fn add_scenario(&self, test: Option<&str>, scenario: Option<Value>) -> bool {
        self.inner.lock().add_scenario(test, scenario)
    }

    pub fn add_entry<R: AsRef<str>>(
        &self,
        test: Option<&str>,
        scenario: Option<Value>,
        requirements: &[R],
    ) -> bool {
        self.inner.lock().add_entry(test, scenario, requirements)
    }

    pub fn write(&self) -> Result<WrittenReports> {
        self.inner.lock().write()
    }

    pub fn summary(&self) -> CoverageSummary {
        self.inner.lock().summary()
    }

    /// Run `f` against the session while holding the lock.
    pub fn with_session<T>(&self, f: impl FnOnce(&CoverageSession) -> T) -> T {
        f(self.inner.lock().session())
    }
}
