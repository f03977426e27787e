//! Implementation-side identifier index

use crate::error::Result;
use crate::identifier::ClassifiedIds;
use crate::scanner::MarkerScanner;
use crate::sources::{SourceFile, Sources};
use facet::Facet;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Where an identifier was found in implementation source
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct OccurrenceSite {
    /// Source file path
    pub file: PathBuf,
    /// Line number (1-indexed)
    pub line: usize,
}

impl Display for OccurrenceSite {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.file.display(), self.line)
    }
}

/// Identifier occurrences across all implementation sources
#[derive(Debug, Clone, Default)]
pub struct ImplementationIndex {
    occurrences: BTreeMap<String, Vec<OccurrenceSite>>,
    duplicates: usize,
    ids: ClassifiedIds,
}

impl ImplementationIndex {
    /// Scan every line of every source, in order.
    pub fn build(sources: impl Sources) -> Result<Self> {
        let mut index = Self::default();
        for file in sources.load()? {
            index.scan_file(&file);
        }
        index.ids = ClassifiedIds::from_ids(index.occurrences.keys().cloned())?;
        debug!(
            distinct = index.occurrences.len(),
            duplicates = index.duplicates,
            unassigned = index.ids.unassigned.len(),
            "indexed implementation sources"
        );
        Ok(index)
    }

    fn scan_file(&mut self, file: &SourceFile) {
        let mut scanner = MarkerScanner::new();
        for (idx, line) in file.content.lines().enumerate() {
            for id in scanner.scan_line(line) {
                self.record(
                    id,
                    OccurrenceSite {
                        file: file.path.clone(),
                        line: idx + 1,
                    },
                );
            }
        }
        if let Some(dangling) = scanner.finish() {
            warn!(
                "{} ends inside a split identifier: {}",
                file.path.display(),
                dangling.trim()
            );
        }
    }

    fn record(&mut self, id: String, site: OccurrenceSite) {
        let sites = self.occurrences.entry(id).or_default();
        if !sites.is_empty() {
            self.duplicates += 1;
        }
        sites.push(site);
    }

    /// Distinct identifiers by class
    pub fn ids(&self) -> &ClassifiedIds {
        &self.ids
    }

    /// Occurrence sites of `id`, in scan order. Empty when never referenced.
    pub fn occurrences(&self, id: &str) -> &[OccurrenceSite] {
        self.occurrences.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Occurrences beyond the first, summed over all identifiers
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }

    /// All identifiers with their sites, in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[OccurrenceSite])> {
        self.occurrences
            .iter()
            .map(|(id, sites)| (id.as_str(), sites.as_slice()))
    }

    /// Number of distinct identifiers
    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}
