//! Registry loading and parsing
//!
//! The registry is the `validusage.json` file shipped with the API headers:
//!
//! ```json
//! {
//!   "version info": { "api version": "1.1.82" },
//!   "validation": {
//!     "vkCmdDraw": {
//!       "core": [ { "vuid": "VUID-vkCmdDraw-None-02700", "text": "..." } ]
//!     }
//!   }
//! }
//! ```

use crate::error::{Error, Result};
use crate::identifier::{ClassifiedIds, IdClass, is_explicit};
use facet::Facet;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Facet)]
struct RegistryFile {
    #[facet(rename = "version info")]
    version_info: VersionInfo,
    validation: HashMap<String, HashMap<String, Vec<RawRule>>>,
}

#[derive(Debug, Clone, Facet)]
struct VersionInfo {
    #[facet(rename = "api version")]
    api_version: String,
}

#[derive(Debug, Clone, Facet)]
struct RawRule {
    vuid: String,
    #[facet(default)]
    text: String,
}

/// Metadata for one registry identifier
#[derive(Debug, Clone, PartialEq, Eq, Facet)]
pub struct RegistryEntry {
    /// Owning API entry point or structure
    pub api: String,
    /// Owning extension, or `core`
    pub extension: String,
    /// Explicit or implicit
    pub class: IdClass,
    /// Description with markup removed and entities decoded
    pub text: String,
}

/// The canonical identifier catalog
#[derive(Debug, Clone, Default)]
pub struct Registry {
    api_version: String,
    entries: BTreeMap<String, RegistryEntry>,
    ids: ClassifiedIds,
}

impl Registry {
    /// Load and parse the registry at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::RegistryUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    /// Parse a registry from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::parse(Path::new("<inline>"), json)
    }

    fn parse(path: &Path, json: &str) -> Result<Self> {
        let unreadable = |reason: String| Error::RegistryUnreadable {
            path: PathBuf::from(path),
            reason,
        };
        let file: RegistryFile = facet_json::from_str(json).map_err(|e| unreadable(e.to_string()))?;

        let mut registry = Registry {
            api_version: file.version_info.api_version,
            ..Default::default()
        };

        // Sorted walk so a duplicated identifier always keeps the same owner.
        let mut apis: Vec<_> = file.validation.into_iter().collect();
        apis.sort_by(|a, b| a.0.cmp(&b.0));
        for (api, extensions) in apis {
            let mut extensions: Vec<_> = extensions.into_iter().collect();
            extensions.sort_by(|a, b| a.0.cmp(&b.0));
            for (extension, rules) in extensions {
                for rule in rules {
                    registry.insert(&api, &extension, rule);
                }
            }
        }

        debug!(
            explicit = registry.ids.explicit.len(),
            implicit = registry.ids.implicit.len(),
            "loaded registry {}",
            path.display()
        );
        Ok(registry)
    }

    fn insert(&mut self, api: &str, extension: &str, rule: RawRule) {
        if self.entries.contains_key(&rule.vuid) {
            return;
        }
        let class = if is_explicit(&rule.vuid) {
            self.ids.explicit.insert(rule.vuid.clone());
            IdClass::Explicit
        } else {
            self.ids.implicit.insert(rule.vuid.clone());
            IdClass::Implicit
        };
        let entry = RegistryEntry {
            api: api.to_string(),
            extension: extension.to_string(),
            class,
            text: unescape_html(&strip_tags(&rule.text)),
        };
        self.entries.insert(rule.vuid, entry);
    }

    /// API version from the registry's version descriptor
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Registry identifiers by class. The unassigned subset is always empty.
    pub fn ids(&self) -> &ClassifiedIds {
        &self.ids
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Entries in identifier order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &RegistryEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Remove `<...>` markup. A `<` with no closing `>` on the same line is kept.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        let line_end = after.find('\n').unwrap_or(after.len());
        match after[..line_end].find('>') {
            Some(close) => rest = &after[close + 1..],
            None => {
                out.push('<');
                rest = &after[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("ndash", '\u{2013}'),
    ("mdash", '\u{2014}'),
    ("lsquo", '\u{2018}'),
    ("rsquo", '\u{2019}'),
    ("ldquo", '\u{201c}'),
    ("rdquo", '\u{201d}'),
    ("hellip", '\u{2026}'),
    ("times", '\u{d7}'),
    ("minus", '\u{2212}'),
    ("le", '\u{2264}'),
    ("ge", '\u{2265}'),
    ("ne", '\u{2260}'),
    ("plusmn", '\u{b1}'),
    ("middot", '\u{b7}'),
    ("rarr", '\u{2192}'),
    ("larr", '\u{2190}'),
];

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    NAMED_ENTITIES
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|(_, ch)| *ch)
}

/// Decode HTML character references. Unknown references are left as-is.
pub fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .find(';')
            .filter(|&semi| semi > 0 && semi <= 10)
            .and_then(|semi| decode_entity(&after[..semi]).map(|ch| (ch, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
