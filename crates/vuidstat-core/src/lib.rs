//! vuidstat-core - Core library for valid usage identifier coverage analysis
//!
//! This crate reconciles three independent sources of truth about valid
//! usage identifiers (VUIDs):
//! - the registry (`validusage.json`), which defines every identifier
//! - the validation layer sources, which reference the identifiers they check
//! - the layer test sources, which reference the identifiers each test covers
//!
//! and answers which identifiers are implemented, which are tested, which
//! references do not exist in the registry, and which are tested without
//! being checked.
//!
//! # Example
//!
//! ```
//! use vuidstat_core::{
//!     Analysis, ConsistencyPolicy, ImplementationIndex, MemorySources, Registry, TestIndex,
//!     group_trigger,
//! };
//!
//! let registry = Registry::from_json(r#"{
//!     "version info": { "api version": "1.1.82" },
//!     "validation": { "vkCmdDraw": { "core": [
//!         { "vuid": "VUID-vkCmdDraw-None-02700", "text": "A pipeline must be bound" }
//!     ] } }
//! }"#).unwrap();
//!
//! let implementation = ImplementationIndex::build(
//!     MemorySources::new().add("draw.cpp", r#"Log("VUID-vkCmdDraw-None-02700");"#),
//! ).unwrap();
//!
//! let tests = TestIndex::build(
//!     MemorySources::new().add(
//!         "tests.cpp",
//!         "TEST_F(VkLayerTest, Draw) {\n  Expect(\"VUID-vkCmdDraw-None-02700\");\n}\n",
//!     ),
//!     &[group_trigger("VkLayerTest")],
//! ).unwrap();
//!
//! let analysis = Analysis::new(registry, implementation, tests, ConsistencyPolicy::default());
//! assert!(analysis.consistency().is_consistent());
//! assert_eq!(analysis.coverage().checked_explicit.percent(), Some(100.0));
//! ```

mod alias;
mod analysis;
mod consistency;
mod coverage;
mod error;
mod identifier;
mod implementation;
mod registry;
mod scanner;
mod sources;
mod test_index;

pub use alias::{KHR_ALIASES, aliases_of, canonical, normalize};
pub use analysis::{Analysis, DatabaseRow, VuidStatus};
pub use consistency::{
    CheckKind, CheckResult, Consistency, ConsistencyPolicy, ConsistencyReport,
};
pub use coverage::{CoverageReport, Ratio, unimplemented_explicit};
pub use error::{Error, Result};
pub use identifier::{
    ClassifiedIds, IdClass, IdPrefix, UNDEFINED_SENTINEL, classify, contains_prefix, is_explicit,
};
pub use implementation::{ImplementationIndex, OccurrenceSite};
pub use registry::{Registry, RegistryEntry, strip_tags, unescape_html};
pub use scanner::{Feed, MarkerScanner, ScanState, extract_identifiers, is_comment_line};
pub use sources::{MemorySources, PathSources, SourceFile, Sources};
pub use test_index::{DEFAULT_TEST_GROUPS, TestIndex, TestScope, group_trigger, test_name_from};
