//! Coverage of one requirement: the subjects that carry evidence for it.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::merge_set::{Identified, MergeSet};
use crate::subject::SubjectCoverage;
use crate::{NameKind, Result, require_name, require_same_identity};

/// A requirement id and the subject coverages contributing to it.
#[derive(Debug, Clone, Serialize)]
pub struct RequirementCoverage {
    id: String,
    subjects: MergeSet<SubjectCoverage>,
}

impl RequirementCoverage {
    /// Create coverage for requirement `id`. A requirement with no subjects is
    /// legal here even though the recording path never builds one.
    pub fn new(id: impl Into<String>, subject: Option<SubjectCoverage>) -> Result<Self> {
        let mut coverage = Self {
            id: require_name(id.into(), NameKind::Requirement)?,
            subjects: MergeSet::new(),
        };
        if let Some(subject) = subject {
            coverage.add_subject_coverage(subject);
        }
        Ok(coverage)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add `coverage`, merging it into a stored coverage of the same subject.
    pub fn add_subject_coverage(&mut self, coverage: SubjectCoverage) {
        self.subjects.insert(coverage);
    }

    pub fn add_subject_coverages(&mut self, coverages: impl IntoIterator<Item = SubjectCoverage>) {
        self.subjects.merge_all(coverages);
    }

    /// Fold another coverage of the same requirement into this one.
    pub fn merge(&mut self, other: Self) -> Result<()> {
        require_same_identity(&self.id, &other.id)?;
        self.absorb(other);
        Ok(())
    }

    pub fn subject(&self, subject: &str) -> Option<&SubjectCoverage> {
        self.subjects.get(subject)
    }

    pub fn subjects(&self) -> &MergeSet<SubjectCoverage> {
        &self.subjects
    }

    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// Sum of test counts over all subjects. Recomputed on every call.
    pub fn test_execution_count(&self) -> usize {
        self.subjects.iter().map(SubjectCoverage::test_count).sum()
    }
}

impl Identified for RequirementCoverage {
    fn identity(&self) -> &str {
        &self.id
    }

    fn absorb(&mut self, other: Self) {
        self.subjects.merge_all(other.subjects);
    }
}

impl PartialEq for RequirementCoverage {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RequirementCoverage {}

impl PartialOrd for RequirementCoverage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RequirementCoverage {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for RequirementCoverage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
