//! Identifier prefixes and explicit/implicit classification

use crate::error::{Error, Result};
use facet::Facet;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Placeholder identifier meaning "no associated rule". Never reported.
pub const UNDEFINED_SENTINEL: &str = "VUID-Undefined";

/// Recognized identifier prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Facet)]
#[repr(u8)]
pub enum IdPrefix {
    /// Formally assigned by the registry
    Vuid,
    /// Provisional, not yet in the registry
    Unassigned,
}

impl IdPrefix {
    pub const ALL: [IdPrefix; 2] = [IdPrefix::Vuid, IdPrefix::Unassigned];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Vuid => "VUID-",
            IdPrefix::Unassigned => "UNASSIGNED-",
        }
    }

    /// The prefix `id` starts with, if any.
    pub fn of(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| id.starts_with(p.as_str()))
    }
}

/// Whether `text` contains any recognized prefix anywhere.
pub fn contains_prefix(text: &str) -> bool {
    IdPrefix::ALL.iter().any(|p| text.contains(p.as_str()))
}

/// Whether `text` begins with any recognized prefix.
pub fn starts_with_prefix(text: &str) -> bool {
    IdPrefix::of(text).is_some()
}

/// Classification of an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Facet)]
#[repr(u8)]
pub enum IdClass {
    /// Ends in five decimal digits
    Explicit,
    /// Formally prefixed but without the numeric suffix
    Implicit,
    /// Carries the provisional prefix
    Unassigned,
}

impl IdClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdClass::Explicit => "explicit",
            IdClass::Implicit => "implicit",
            IdClass::Unassigned => "unassigned",
        }
    }
}

impl Display for IdClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '"' | '\'' | ',' | ';' | ':' | ')' | '}' | ']')
}

/// True when the last five characters, ignoring trailing boundary
/// characters, are all decimal digits.
pub fn is_explicit(id: &str) -> bool {
    let bytes = id.trim_end_matches(is_boundary).as_bytes();
    bytes.len() >= 5 && bytes[bytes.len() - 5..].iter().all(u8::is_ascii_digit)
}

/// Classify an identifier by prefix, then by numeric suffix.
pub fn classify(id: &str) -> Result<IdClass> {
    match IdPrefix::of(id) {
        Some(IdPrefix::Vuid) if is_explicit(id) => Ok(IdClass::Explicit),
        Some(IdPrefix::Vuid) => Ok(IdClass::Implicit),
        Some(IdPrefix::Unassigned) => Ok(IdClass::Unassigned),
        None => Err(Error::ScannerPrefixViolation { id: id.to_string() }),
    }
}

/// One identifier universe, partitioned by class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedIds {
    pub explicit: BTreeSet<String>,
    pub implicit: BTreeSet<String>,
    pub unassigned: BTreeSet<String>,
}

impl ClassifiedIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify every identifier, failing on the first one without a prefix.
    pub fn from_ids<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for id in ids {
            set.insert(id.into())?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, id: String) -> Result<IdClass> {
        let class = classify(&id)?;
        self.class_mut(class).insert(id);
        Ok(class)
    }

    pub fn get(&self, class: IdClass) -> &BTreeSet<String> {
        match class {
            IdClass::Explicit => &self.explicit,
            IdClass::Implicit => &self.implicit,
            IdClass::Unassigned => &self.unassigned,
        }
    }

    fn class_mut(&mut self, class: IdClass) -> &mut BTreeSet<String> {
        match class {
            IdClass::Explicit => &mut self.explicit,
            IdClass::Implicit => &mut self.implicit,
            IdClass::Unassigned => &mut self.unassigned,
        }
    }

    pub fn class_of(&self, id: &str) -> Option<IdClass> {
        [IdClass::Explicit, IdClass::Implicit, IdClass::Unassigned]
            .into_iter()
            .find(|class| self.get(*class).contains(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.class_of(id).is_some()
    }

    /// Explicit and implicit members.
    pub fn assigned(&self) -> BTreeSet<String> {
        self.explicit.union(&self.implicit).cloned().collect()
    }

    /// Every member, unassigned included.
    pub fn all(&self) -> BTreeSet<String> {
        let mut all = self.assigned();
        all.extend(self.unassigned.iter().cloned());
        all
    }

    pub fn len(&self) -> usize {
        self.explicit.len() + self.implicit.len() + self.unassigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_requires_five_trailing_digits() {
        assert!(is_explicit("VUID-vkCmdDraw-None-02700"));
        assert!(is_explicit("VUID-vkCmdDraw-None-02700\","));
        assert!(!is_explicit("VUID-vkCmdDraw-commandBuffer-parameter"));
        assert!(!is_explicit("VUID-vkCmdDraw-None-0270a"));
        assert!(!is_explicit("0270"));
    }

    #[test]
    fn classify_routes_by_prefix() {
        assert_eq!(classify("VUID-foo-bar-00001").unwrap(), IdClass::Explicit);
        assert_eq!(classify("VUID-foo-baz").unwrap(), IdClass::Implicit);
        assert_eq!(
            classify("UNASSIGNED-CoreValidation-DrawState-00001").unwrap(),
            IdClass::Unassigned
        );
    }

    #[test]
    fn classify_rejects_missing_prefix() {
        let err = classify("kVUID-foo").unwrap_err();
        assert!(matches!(err, Error::ScannerPrefixViolation { ref id } if id == "kVUID-foo"));
    }

    #[test]
    fn classification_is_idempotent() {
        for id in ["VUID-a-b-12345", "VUID-a-b", "UNASSIGNED-x"] {
            let once = ClassifiedIds::from_ids([id]).unwrap();
            let twice = ClassifiedIds::from_ids(once.all()).unwrap();
            assert_eq!(once, twice);
            assert_eq!(once.class_of(id), Some(classify(id).unwrap()));
        }
    }

    #[test]
    fn prefix_lookup() {
        assert_eq!(IdPrefix::of("VUID-x"), Some(IdPrefix::Vuid));
        assert_eq!(IdPrefix::of("UNASSIGNED-x"), Some(IdPrefix::Unassigned));
        assert_eq!(IdPrefix::of("x VUID-x"), None);
        assert!(contains_prefix("x VUID-x"));
        assert!(!contains_prefix("VUID_x"));
    }

    #[test]
    fn assigned_excludes_unassigned() {
        let ids = ClassifiedIds::from_ids(["VUID-a-00001", "VUID-b", "UNASSIGNED-c"]).unwrap();
        assert_eq!(ids.assigned().len(), 2);
        assert_eq!(ids.all().len(), 3);
        assert_eq!(ids.len(), 3);
    }
}
