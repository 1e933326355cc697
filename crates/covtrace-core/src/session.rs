//! Per-report recording context.
//!
//! A [`CoverageSession`] holds the two trees built from one stream of
//! entries: the subject tree rooted at the report subject, and the
//! requirement forest keyed by requirement id. Entries are merged in as they
//! arrive; rendering reads the trees without touching them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::merge_set::MergeSet;
use crate::render::{render_requirement_report, render_subject_report};
use crate::requirement::RequirementCoverage;
use crate::scenario::ScenarioValue;
use crate::subject::SubjectCoverage;
use crate::test_record::TestRecord;
use crate::{Result, is_blank};

/// Subject used when a report does not name one.
pub const DEFAULT_SUBJECT: &str = "application";

/// Aggregate counters over a session, for logs and CLI output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub subject: String,
    pub test_count: usize,
    pub scenario_count: usize,
    pub requirement_count: usize,
    pub requirement_test_executions: usize,
}

/// Recording context for one report.
#[derive(Debug, Clone)]
pub struct CoverageSession {
    subject_tree: SubjectCoverage,
    requirements: MergeSet<RequirementCoverage>,
}

impl CoverageSession {
    /// Start an empty session for `subject`. Fails on a blank subject.
    pub fn new(subject: impl Into<String>) -> Result<Self> {
        Ok(Self {
            subject_tree: SubjectCoverage::new(subject, None)?,
            requirements: MergeSet::new(),
        })
    }

    pub fn subject(&self) -> &str {
        self.subject_tree.subject()
    }

    /// Record that `test` ran, optionally with `scenario`, against the report
    /// subject only.
    pub fn add_test_entry(&mut self, test: &str, scenario: Option<Value>) -> bool {
        self.add_entry::<&str>(test, scenario, &[])
    }

    /// Record one entry.
    ///
    /// A blank `test` is dropped. A null or blank-string `scenario` adds the
    /// test without a scenario. With an empty `requirements` slice only the
    /// subject tree is updated; otherwise every non-blank id gets its own copy
    /// of the entry, and if none of the supplied ids is usable the whole
    /// entry is dropped.
    ///
    /// Returns whether anything was recorded. Never fails: rejected input is
    /// logged at debug level and ignored.
    pub fn add_entry<R: AsRef<str>>(
        &mut self,
        test: &str,
        scenario: Option<Value>,
        requirements: &[R],
    ) -> bool {
        if is_blank(test) {
            debug!(subject = %self.subject(), "dropping entry with blank test name");
            return false;
        }

        let requirement_ids: Vec<&str> = requirements
            .iter()
            .map(|id| id.as_ref())
            .filter(|id| !is_blank(id))
            .collect();
        if !requirements.is_empty() && requirement_ids.is_empty() {
            debug!(
                subject = %self.subject(),
                test,
                supplied = requirements.len(),
                "dropping entry whose requirement ids are all blank"
            );
            return false;
        }

        let scenario = scenario.map(ScenarioValue::new);
        let evidence = match TestRecord::with_scenario(test, scenario)
            .and_then(|record| SubjectCoverage::new(self.subject(), Some(record)))
        {
            Ok(evidence) => evidence,
            Err(error) => {
                debug!(subject = %self.subject(), test, %error, "dropping entry");
                return false;
            }
        };

        // Each owner gets its own copy of the scenario set.
        for id in requirement_ids {
            match RequirementCoverage::new(id, Some(evidence.clone())) {
                Ok(coverage) => {
                    self.requirements.insert(coverage);
                }
                Err(error) => {
                    debug!(requirement = id, %error, "dropping requirement");
                }
            }
        }

        if let Err(error) = self.subject_tree.merge(evidence) {
            debug!(subject = %self.subject(), %error, "subject tree rejected entry");
            return false;
        }
        true
    }

    pub fn subject_tree(&self) -> &SubjectCoverage {
        &self.subject_tree
    }

    pub fn requirements(&self) -> &MergeSet<RequirementCoverage> {
        &self.requirements
    }

    pub fn requirement(&self, id: &str) -> Option<&RequirementCoverage> {
        self.requirements.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.subject_tree.is_empty() && self.requirements.is_empty()
    }

    /// Render the subject coverage document.
    pub fn render_subject_report(&self) -> Result<String> {
        render_subject_report(&self.subject_tree)
    }

    /// Render the requirement coverage document.
    pub fn render_requirement_report(&self) -> Result<String> {
        render_requirement_report(&self.requirements)
    }

    pub fn summary(&self) -> CoverageSummary {
        CoverageSummary {
            subject: self.subject().to_owned(),
            test_count: self.subject_tree.test_count(),
            scenario_count: self.subject_tree.scenario_count(),
            requirement_count: self.requirements.len(),
            requirement_test_executions: self
                .requirements
                .iter()
                .map(RequirementCoverage::test_execution_count)
                .sum(),
        }
    }

    /// Drop all recorded entries, keeping the subject.
    pub fn clear(&mut self) {
        self.subject_tree.clear();
        self.requirements.clear();
    }
}
