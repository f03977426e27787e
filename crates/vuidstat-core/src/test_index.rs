//! Test-side identifier index
//!
//! Test sources declare cases with a macro such as
//! `TEST_F(VkLayerTest, DrawWithoutPipeline) {`. Every identifier found after
//! a declaration belongs to that test until the next declaration. When the
//! formatter pushed the name onto its own line, the declaration line ends in
//! a comma and the name is read from the following line.

use crate::error::Result;
use crate::identifier::ClassifiedIds;
use crate::scanner::{Feed, MarkerScanner, extract_identifiers};
use crate::sources::{SourceFile, Sources};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Test fixture groups of the validation layer test suite
pub const DEFAULT_TEST_GROUPS: &[&str] =
    &["VkLayerTest", "VkPositiveLayerTest", "VkWsiEnabledLayerTest"];

/// Trigger text that opens a test declaration for `group`.
pub fn group_trigger(group: &str) -> String {
    format!("TEST_F({group}")
}

/// Test name from a declaration line: the last comma-separated field,
/// trimmed of whitespace and closing delimiters.
pub fn test_name_from(line: &str) -> &str {
    line.rsplit(',')
        .next()
        .unwrap_or(line)
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '{' | ')'))
}

/// Which test the scanner is currently inside
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TestScope {
    #[default]
    NoActiveTest,
    ActiveTest(String),
    /// A declaration was seen but its name is on the next line
    AwaitingTestName,
}

impl TestScope {
    /// Advance on one logical line. Returns whether identifiers on this
    /// line should be collected.
    pub fn observe(&mut self, line: &str, triggers: &[String]) -> bool {
        if triggers.iter().any(|trigger| line.contains(trigger.as_str())) {
            let name = test_name_from(line);
            if name.is_empty() {
                *self = TestScope::AwaitingTestName;
                return false;
            }
            *self = TestScope::ActiveTest(name.to_string());
        } else if *self == TestScope::AwaitingTestName {
            *self = TestScope::ActiveTest(test_name_from(line).to_string());
        }
        true
    }

    pub fn current(&self) -> Option<&str> {
        match self {
            TestScope::ActiveTest(name) => Some(name),
            TestScope::NoActiveTest | TestScope::AwaitingTestName => None,
        }
    }
}

/// Identifier to test-name associations across all test sources
#[derive(Debug, Clone, Default)]
pub struct TestIndex {
    tests: BTreeMap<String, BTreeSet<String>>,
    ids: ClassifiedIds,
}

impl TestIndex {
    /// Scan every test source in order. `triggers` are the substrings that
    /// mark a test declaration (see [`group_trigger`]).
    pub fn build(sources: impl Sources, triggers: &[String]) -> Result<Self> {
        let mut index = Self::default();
        for file in sources.load()? {
            index.scan_file(&file, triggers)?;
        }
        debug!(
            distinct = index.tests.len(),
            explicit = index.ids.explicit.len(),
            implicit = index.ids.implicit.len(),
            unassigned = index.ids.unassigned.len(),
            "indexed test sources"
        );
        Ok(index)
    }

    fn scan_file(&mut self, file: &SourceFile, triggers: &[String]) -> Result<()> {
        let mut scanner = MarkerScanner::new();
        let mut scope = TestScope::default();

        for (idx, raw) in file.content.lines().enumerate() {
            let line = match scanner.feed(raw) {
                Feed::Line(line) => line,
                Feed::Comment | Feed::Pending => continue,
            };
            if !scope.observe(&line, triggers) {
                continue;
            }
            for id in extract_identifiers(&line) {
                self.ids.insert(id.clone())?;
                let tests = self.tests.entry(id).or_default();
                match scope.current() {
                    Some(name) => {
                        tests.insert(name.to_string());
                    }
                    None => warn!(
                        "{}:{} references an identifier outside any test",
                        file.path.display(),
                        idx + 1
                    ),
                }
            }
        }

        if let Some(dangling) = scanner.finish() {
            warn!(
                "{} ends inside a split identifier: {}",
                file.path.display(),
                dangling.trim()
            );
        }
        Ok(())
    }

    /// Distinct identifiers by class
    pub fn ids(&self) -> &ClassifiedIds {
        &self.ids
    }

    /// Tests referencing `id`, or `None` when no test source mentions it
    pub fn tests_for(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.tests.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.tests.iter().map(|(id, tests)| (id.as_str(), tests))
    }

    /// Number of distinct identifiers
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}
