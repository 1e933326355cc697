//! A named test and the scenarios it ran with.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use tracing::debug;

use crate::merge_set::Identified;
use crate::scenario::ScenarioValue;
use crate::{CoverageError, NameKind, Result, require_name, require_same_identity};

/// A test plus the distinct scenarios it was executed with.
///
/// Identity is the test name alone: two records with the same name but
/// different scenario sets compare equal and are merged, never stored twice.
#[derive(Debug, Clone, Serialize)]
pub struct TestRecord {
    #[serde(rename = "test")]
    name: String,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    scenarios: BTreeSet<ScenarioValue>,
}

impl TestRecord {
    /// Create an empty record. Fails with `InvalidName` on a blank name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            name: require_name(name.into(), NameKind::Test)?,
            scenarios: BTreeSet::new(),
        })
    }

    /// Create a record holding at most one scenario.
    pub fn with_scenario(name: impl Into<String>, scenario: Option<ScenarioValue>) -> Result<Self> {
        let mut record = Self::new(name)?;
        if let Some(scenario) = scenario {
            record.add_scenario(scenario);
        }
        Ok(record)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach a scenario, failing with `InvalidScenario` on a null or blank
    /// payload. Returns `true` only when the scenario was not already present.
    pub fn try_add_scenario(&mut self, scenario: ScenarioValue) -> Result<bool> {
        if scenario.is_empty_payload() {
            return Err(CoverageError::InvalidScenario);
        }
        Ok(self.scenarios.insert(scenario))
    }

    /// Best-effort [`try_add_scenario`](Self::try_add_scenario): empty
    /// payloads are logged and dropped.
    pub fn add_scenario(&mut self, scenario: ScenarioValue) -> bool {
        match self.try_add_scenario(scenario) {
            Ok(inserted) => inserted,
            Err(error) => {
                debug!(test = %self.name, %error, "dropping scenario");
                false
            }
        }
    }

    /// Attach each scenario in turn. `None` behaves like an empty collection.
    pub fn add_scenarios<I>(&mut self, scenarios: Option<I>)
    where
        I: IntoIterator<Item = ScenarioValue>,
    {
        for scenario in scenarios.into_iter().flatten() {
            self.add_scenario(scenario);
        }
    }

    /// Union `other`'s scenarios into this record.
    ///
    /// Fails with `MergeIdentityMismatch` if the names differ; `self` is left
    /// untouched in that case.
    pub fn merge_from(&mut self, other: Self) -> Result<()> {
        require_same_identity(&self.name, &other.name)?;
        self.absorb(other);
        Ok(())
    }

    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    pub fn has_scenario(&self, scenario: &ScenarioValue) -> bool {
        self.scenarios.contains(scenario)
    }

    /// Scenarios in ascending canonical-text order.
    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioValue> {
        self.scenarios.iter()
    }
}

impl Identified for TestRecord {
    fn identity(&self) -> &str {
        &self.name
    }

    fn absorb(&mut self, other: Self) {
        self.scenarios.extend(other.scenarios);
    }
}

impl PartialEq for TestRecord {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TestRecord {}

impl PartialOrd for TestRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TestRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl Hash for TestRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
