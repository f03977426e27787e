//! Read-only view over one run's results

use crate::alias;
use crate::consistency::{Consistency, ConsistencyPolicy, ConsistencyReport};
use crate::coverage::{CoverageReport, unimplemented_explicit};
use crate::implementation::{ImplementationIndex, OccurrenceSite};
use crate::registry::{Registry, RegistryEntry};
use crate::test_index::TestIndex;
use std::collections::BTreeSet;

/// Everything known about one identifier
///
/// Sites and tests include those recorded under deprecated spellings of the
/// identifier when the policy folds aliases.
#[derive(Debug, Clone)]
pub struct VuidStatus<'a> {
    /// Registry entry, if the identifier is defined
    pub entry: Option<&'a RegistryEntry>,
    /// Implementation sites, in scan order per spelling
    pub sites: Vec<&'a OccurrenceSite>,
    /// Tests referencing the identifier, if any test source mentions it
    pub tests: Option<BTreeSet<&'a str>>,
}

impl VuidStatus<'_> {
    pub fn defined(&self) -> bool {
        self.entry.is_some()
    }

    pub fn implemented(&self) -> bool {
        !self.sites.is_empty()
    }

    pub fn tested(&self) -> bool {
        self.tests.is_some()
    }
}

/// One registry identifier as it appears in the exported database
#[derive(Debug, Clone)]
pub struct DatabaseRow<'a> {
    pub id: &'a str,
    pub entry: &'a RegistryEntry,
    /// Referenced by implementation (after alias folding, per policy)
    pub checked: bool,
    /// Test names (after alias folding, per policy)
    pub tests: Option<BTreeSet<&'a str>>,
}

/// The registry, both indexes and the policy they are judged under
#[derive(Debug, Clone)]
pub struct Analysis {
    registry: Registry,
    implementation: ImplementationIndex,
    tests: TestIndex,
    policy: ConsistencyPolicy,
}

impl Analysis {
    pub fn new(
        registry: Registry,
        implementation: ImplementationIndex,
        tests: TestIndex,
        policy: ConsistencyPolicy,
    ) -> Self {
        Self {
            registry,
            implementation,
            tests,
            policy,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn implementation(&self) -> &ImplementationIndex {
        &self.implementation
    }

    pub fn tests(&self) -> &TestIndex {
        &self.tests
    }

    pub fn policy(&self) -> &ConsistencyPolicy {
        &self.policy
    }

    pub fn consistency(&self) -> ConsistencyReport {
        Consistency::new(
            self.policy,
            self.registry.ids(),
            self.implementation.ids(),
            self.tests.ids(),
        )
        .run()
    }

    pub fn coverage(&self) -> CoverageReport {
        CoverageReport::compute(
            &self.policy,
            self.registry.ids(),
            self.implementation.ids(),
            self.tests.ids(),
        )
    }

    /// Registry explicit identifiers no implementation references
    pub fn unimplemented(&self) -> Vec<String> {
        unimplemented_explicit(&self.policy, self.registry.ids(), self.implementation.ids())
    }

    /// `id` followed by its deprecated spellings when the policy folds them
    fn spellings<'b>(&self, id: &'b str) -> Vec<&'b str> {
        let mut spellings = vec![id];
        if self.policy.dealias {
            spellings.extend(alias::aliases_of(id));
        }
        spellings
    }

    fn tests_for<'b>(&'b self, spellings: &[&str]) -> Option<BTreeSet<&'b str>> {
        let mut found: Option<BTreeSet<&str>> = None;
        for spelling in spellings {
            if let Some(tests) = self.tests.tests_for(spelling) {
                found
                    .get_or_insert_with(BTreeSet::new)
                    .extend(tests.iter().map(String::as_str));
            }
        }
        found
    }

    /// Point query. `None` when the identifier appears nowhere.
    pub fn status(&self, id: &str) -> Option<VuidStatus<'_>> {
        let spellings = self.spellings(id);
        let status = VuidStatus {
            entry: self.registry.get(id),
            sites: spellings
                .iter()
                .flat_map(|spelling| self.implementation.occurrences(spelling))
                .collect(),
            tests: self.tests_for(&spellings),
        };
        (status.defined() || status.implemented() || status.tested()).then_some(status)
    }

    /// One row per registry identifier, sorted by identifier
    pub fn rows(&self) -> Vec<DatabaseRow<'_>> {
        let checked = self.policy.fold(&self.implementation.ids().all());
        self.registry
            .entries()
            .map(|(id, entry)| DatabaseRow {
                id,
                entry,
                checked: checked.contains(id),
                tests: self.tests_for(&self.spellings(id)),
            })
            .collect()
    }
}
