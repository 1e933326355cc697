//! Coverage of one subject: the tests exercised against it.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::merge_set::{Identified, MergeSet};
use crate::test_record::TestRecord;
use crate::{NameKind, Result, require_name, require_same_identity};

/// A named subject and the tests recorded against it, unique by test name.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectCoverage {
    subject: String,
    tests: MergeSet<TestRecord>,
}

impl SubjectCoverage {
    /// Create coverage for `subject`, optionally seeded with one test.
    /// Fails with `InvalidName` on a blank subject.
    pub fn new(subject: impl Into<String>, test: Option<TestRecord>) -> Result<Self> {
        let mut coverage = Self {
            subject: require_name(subject.into(), NameKind::Subject)?,
            tests: MergeSet::new(),
        };
        if let Some(test) = test {
            coverage.add_test(test);
        }
        Ok(coverage)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Add `test`, merging its scenarios into a stored test of the same name.
    pub fn add_test(&mut self, test: TestRecord) {
        self.tests.insert(test);
    }

    /// Add each test with the same merge rule as [`add_test`](Self::add_test).
    pub fn add_tests(&mut self, tests: impl IntoIterator<Item = TestRecord>) {
        self.tests.merge_all(tests);
    }

    /// Fold another coverage of the same subject into this one.
    pub fn merge(&mut self, other: Self) -> Result<()> {
        require_same_identity(&self.subject, &other.subject)?;
        self.absorb(other);
        Ok(())
    }

    pub fn test(&self, name: &str) -> Option<&TestRecord> {
        self.tests.get(name)
    }

    pub fn tests(&self) -> &MergeSet<TestRecord> {
        &self.tests
    }

    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Total scenarios across all tests.
    pub fn scenario_count(&self) -> usize {
        self.tests.iter().map(TestRecord::scenario_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.tests.clear();
    }
}

impl Identified for SubjectCoverage {
    fn identity(&self) -> &str {
        &self.subject
    }

    fn absorb(&mut self, other: Self) {
        self.tests.merge_all(other.tests);
    }
}

impl PartialEq for SubjectCoverage {
    fn eq(&self, other: &Self) -> bool {
        self.subject == other.subject
    }
}

impl Eq for SubjectCoverage {}

impl PartialOrd for SubjectCoverage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SubjectCoverage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.subject.cmp(&other.subject)
    }
}

impl Hash for SubjectCoverage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.subject.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScenarioValue;

    fn record(name: &str, scenario: Option<&str>) -> TestRecord {
        TestRecord::with_scenario(name, scenario.map(ScenarioValue::from)).expect("valid test")
    }

    fn names(coverage: &SubjectCoverage) -> Vec<&str> {
        coverage.tests().iter().map(TestRecord::name).collect()
    }

    #[test]
    fn blank_subject_is_rejected() {
        assert!(SubjectCoverage::new("", None).is_err());
        assert!(SubjectCoverage::new("  ", Some(record("t", None))).is_err());
    }

    #[test]
    fn tests_are_ordered_by_name() {
        let mut coverage = SubjectCoverage::new("app", Some(record("b", None))).expect("valid");
        coverage.add_test(record("a", None));
        assert_eq!(names(&coverage), vec!["a", "b"]);
    }

    #[test]
    fn same_named_tests_merge_scenarios() {
        let mut coverage = SubjectCoverage::new("app", Some(record("t", Some("x")))).expect("valid");
        coverage.add_test(record("t", Some("y")));
        assert_eq!(coverage.test_count(), 1);
        assert_eq!(coverage.test("t").map(TestRecord::scenario_count), Some(2));
        assert_eq!(coverage.scenario_count(), 2);
    }

    #[test]
    fn add_tests_merges_duplicates_within_batch() {
        let mut coverage = SubjectCoverage::new("app", None).expect("valid");
        coverage.add_tests(vec![
            record("t", Some("x")),
            record("t", Some("y")),
            record("u", None),
        ]);
        assert_eq!(names(&coverage), vec!["t", "u"]);
        assert_eq!(coverage.test("t").map(TestRecord::scenario_count), Some(2));
    }

    #[test]
    fn merge_unions_tests_recursively() {
        let mut left = SubjectCoverage::new("app", Some(record("t", Some("x")))).expect("valid");
        let mut right = SubjectCoverage::new("app", Some(record("t", Some("y")))).expect("valid");
        right.add_test(record("v", None));

        left.merge(right).expect("same subject");
        assert_eq!(names(&left), vec!["t", "v"]);
        assert_eq!(left.test("t").map(TestRecord::scenario_count), Some(2));
    }

    #[test]
    fn merge_rejects_different_subject() {
        let mut left = SubjectCoverage::new("app", None).expect("valid");
        let right = SubjectCoverage::new("other", Some(record("t", None))).expect("valid");
        assert!(left.merge(right).is_err());
        assert!(left.is_empty());
    }

    #[test]
    fn serializes_subject_then_tests() {
        let mut coverage = SubjectCoverage::new("app", Some(record("b", None))).expect("valid");
        coverage.add_test(record("a", Some("s")));
        assert_eq!(
            serde_json::to_string(&coverage).expect("serialize"),
            r#"{"subject":"app","tests":[{"test":"a","scenarios":["s"]},{"test":"b"}]}"#
        );
    }
}
