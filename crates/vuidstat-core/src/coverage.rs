//! Coverage analysis and reporting

use crate::consistency::ConsistencyPolicy;
use crate::identifier::ClassifiedIds;
use facet::Facet;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// A count over a class size. Not applicable when the class is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Facet)]
pub struct Ratio {
    pub numerator: usize,
    pub denominator: usize,
}

impl Ratio {
    pub fn new(numerator: usize, denominator: usize) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    fn overlap(part: &BTreeSet<String>, whole: &BTreeSet<String>) -> Self {
        Self::new(part.intersection(whole).count(), whole.len())
    }

    /// Percentage (0.0 - 100.0), or `None` for an empty class
    pub fn percent(&self) -> Option<f64> {
        (self.denominator != 0)
            .then(|| 100.0 * self.numerator as f64 / self.denominator as f64)
    }
}

impl Display for Ratio {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.percent() {
            Some(percent) => write!(f, "{percent:.1}%"),
            None => f.write_str("n/a"),
        }
    }
}

/// Checked and tested ratios per class
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct CoverageReport {
    /// Registry explicit identifiers referenced by implementation
    pub checked_explicit: Ratio,
    /// Registry implicit identifiers referenced by implementation
    pub checked_implicit: Ratio,
    /// All registry identifiers referenced by implementation
    pub checked_overall: Ratio,
    /// Implemented explicit identifiers referenced by tests
    pub tested_explicit: Ratio,
    /// Implemented implicit identifiers referenced by tests
    pub tested_implicit: Ratio,
    /// All implemented identifiers referenced by tests
    pub tested_overall: Ratio,
}

impl CoverageReport {
    /// Compute coverage from the three universes.
    ///
    /// Implementation and test universes are alias-folded per `policy`.
    /// Unassigned identifiers count toward the overall tested ratio only when
    /// the policy does not ignore them; the registry never holds any.
    pub fn compute(
        policy: &ConsistencyPolicy,
        registry: &ClassifiedIds,
        implementation: &ClassifiedIds,
        tests: &ClassifiedIds,
    ) -> Self {
        let checks_explicit = policy.fold(&implementation.explicit);
        let checks_implicit = policy.fold(&implementation.implicit);
        let tests_explicit = policy.fold(&tests.explicit);
        let tests_implicit = policy.fold(&tests.implicit);

        let overall = |ids: &ClassifiedIds| {
            if policy.ignore_unassigned {
                policy.fold(&ids.assigned())
            } else {
                policy.fold(&ids.all())
            }
        };

        CoverageReport {
            checked_explicit: Ratio::overlap(&checks_explicit, &registry.explicit),
            checked_implicit: Ratio::overlap(&checks_implicit, &registry.implicit),
            checked_overall: Ratio::overlap(&overall(implementation), &registry.assigned()),
            tested_explicit: Ratio::overlap(&tests_explicit, &checks_explicit),
            tested_implicit: Ratio::overlap(&tests_implicit, &checks_implicit),
            tested_overall: Ratio::overlap(&overall(tests), &overall(implementation)),
        }
    }
}

/// Registry explicit identifiers with no implementation reference, sorted
pub fn unimplemented_explicit(
    policy: &ConsistencyPolicy,
    registry: &ClassifiedIds,
    implementation: &ClassifiedIds,
) -> Vec<String> {
    let checked = policy.fold(&implementation.explicit);
    registry.explicit.difference(&checked).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> ClassifiedIds {
        ClassifiedIds::from_ids(list.iter().copied()).unwrap()
    }

    #[test]
    fn empty_class_is_not_applicable() {
        let ratio = Ratio::new(0, 0);
        assert_eq!(ratio.percent(), None);
        assert_eq!(ratio.to_string(), "n/a");
        assert_eq!(Ratio::new(1, 4).to_string(), "25.0%");
    }

    #[test]
    fn ratios_use_intersections() {
        let registry = ids(&["VUID-a-x-00001", "VUID-a-y-00002", "VUID-a-z"]);
        let checks = ids(&["VUID-a-x-00001", "VUID-a-typo-00009", "UNASSIGNED-q"]);
        let tests = ids(&["VUID-a-x-00001", "UNASSIGNED-q"]);
        let report =
            CoverageReport::compute(&ConsistencyPolicy::default(), &registry, &checks, &tests);

        assert_eq!(report.checked_explicit, Ratio::new(1, 2));
        assert_eq!(report.checked_implicit, Ratio::new(0, 1));
        assert_eq!(report.checked_overall, Ratio::new(1, 3));
        assert_eq!(report.tested_explicit, Ratio::new(1, 2));
        assert_eq!(report.tested_implicit.percent(), None);
        assert_eq!(report.tested_overall, Ratio::new(1, 2));

        let policy = ConsistencyPolicy {
            ignore_unassigned: false,
            ..Default::default()
        };
        let report = CoverageReport::compute(&policy, &registry, &checks, &tests);
        assert_eq!(report.tested_overall, Ratio::new(2, 3));
    }

    #[test]
    fn empty_registry_does_not_panic() {
        let empty = ids(&[]);
        let report = CoverageReport::compute(&ConsistencyPolicy::default(), &empty, &empty, &empty);
        assert_eq!(report.checked_overall.percent(), None);
        assert_eq!(report.tested_overall.percent(), None);
    }

    #[test]
    fn unimplemented_lists_missing_explicit() {
        let registry = ids(&["VUID-a-x-00001", "VUID-a-y-00002", "VUID-a-z"]);
        let checks = ids(&["VUID-a-x-00001"]);
        assert_eq!(
            unimplemented_explicit(&ConsistencyPolicy::default(), &registry, &checks),
            vec!["VUID-a-y-00002"]
        );
    }
}
