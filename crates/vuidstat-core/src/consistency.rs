//! Cross-universe consistency checks

use crate::alias;
use crate::identifier::{ClassifiedIds, IdPrefix, UNDEFINED_SENTINEL};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Policy knobs shared by the consistency and coverage computations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsistencyPolicy {
    /// Fold deprecated identifier spellings before comparing
    pub dealias: bool,
    /// Leave unassigned-prefix identifiers out of every report
    pub ignore_unassigned: bool,
}

impl Default for ConsistencyPolicy {
    fn default() -> Self {
        Self {
            dealias: true,
            ignore_unassigned: true,
        }
    }
}

impl ConsistencyPolicy {
    /// Apply alias folding to `ids` if the policy asks for it.
    pub fn fold(&self, ids: &BTreeSet<String>) -> BTreeSet<String> {
        if self.dealias {
            alias::normalize(ids)
        } else {
            ids.clone()
        }
    }

    fn reportable(&self, id: &str) -> bool {
        id != UNDEFINED_SENTINEL
            && !(self.ignore_unassigned && IdPrefix::of(id) == Some(IdPrefix::Unassigned))
    }
}

/// The three consistency checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// Referenced by implementation, absent from the registry
    UndefinedInImplementation,
    /// Referenced by tests, absent from the registry
    UndefinedInTests,
    /// Referenced by tests, absent from the implementation
    TestedNotChecked,
}

impl CheckKind {
    pub fn description(&self) -> &'static str {
        match self {
            CheckKind::UndefinedInImplementation => {
                "found in layer code are not defined in the registry"
            }
            CheckKind::UndefinedInTests => "found in layer tests are not defined in the registry",
            CheckKind::TestedNotChecked => "found in tests but are not checked in layer code",
        }
    }
}

impl Display for CheckKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub kind: CheckKind,
    /// Offending identifiers, sorted
    pub offenders: Vec<String>,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.offenders.is_empty()
    }
}

/// All three checks together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub undefined_in_implementation: CheckResult,
    pub undefined_in_tests: CheckResult,
    pub tested_not_checked: CheckResult,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.checks().all(CheckResult::passed)
    }

    pub fn checks(&self) -> impl Iterator<Item = &CheckResult> {
        [
            &self.undefined_in_implementation,
            &self.undefined_in_tests,
            &self.tested_not_checked,
        ]
        .into_iter()
    }
}

/// Set algebra over the registry, implementation and test universes
#[derive(Debug, Clone)]
pub struct Consistency {
    policy: ConsistencyPolicy,
    registry: BTreeSet<String>,
    implementation: BTreeSet<String>,
    tests: BTreeSet<String>,
}

impl Consistency {
    pub fn new(
        policy: ConsistencyPolicy,
        registry: &ClassifiedIds,
        implementation: &ClassifiedIds,
        tests: &ClassifiedIds,
    ) -> Self {
        Self {
            policy,
            registry: registry.all(),
            implementation: policy.fold(&implementation.all()),
            tests: policy.fold(&tests.all()),
        }
    }

    fn difference(
        &self,
        kind: CheckKind,
        left: &BTreeSet<String>,
        right: &BTreeSet<String>,
    ) -> CheckResult {
        CheckResult {
            kind,
            offenders: left
                .difference(right)
                .filter(|id| self.policy.reportable(id))
                .cloned()
                .collect(),
        }
    }

    pub fn undefined_in_implementation(&self) -> CheckResult {
        self.difference(
            CheckKind::UndefinedInImplementation,
            &self.implementation,
            &self.registry,
        )
    }

    pub fn undefined_in_tests(&self) -> CheckResult {
        self.difference(CheckKind::UndefinedInTests, &self.tests, &self.registry)
    }

    pub fn tested_not_checked(&self) -> CheckResult {
        self.difference(
            CheckKind::TestedNotChecked,
            &self.tests,
            &self.implementation,
        )
    }

    pub fn run(&self) -> ConsistencyReport {
        ConsistencyReport {
            undefined_in_implementation: self.undefined_in_implementation(),
            undefined_in_tests: self.undefined_in_tests(),
            tested_not_checked: self.tested_not_checked(),
        }
    }
}
