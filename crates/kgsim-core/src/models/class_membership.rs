//! Compact class-membership encoding: `class:count|class:count|...`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{CLASS_COUNT_SEPARATOR, CLASS_ENTRY_SEPARATOR};

/// One class an entity belongs to, with the class's transitive instance count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCount {
    pub class: String,
    pub count: u64,
}

/// Ordered list of the classes an entity belongs to (directly or through
/// inheritance), each with its transitive instance count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMembership {
    entries: Vec<ClassCount>,
}

impl ClassMembership {
    pub fn new(entries: Vec<ClassCount>) -> Self {
        Self { entries }
    }

    /// Parse the packed backend format.
    ///
    /// Malformed entries are skipped with a warning rather than failing the
    /// whole record. Fractional counts are truncated.
    pub fn parse_compact(packed: &str) -> Self {
        let mut entries = Vec::new();
        for raw in packed.split(CLASS_ENTRY_SEPARATOR) {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let Some((class, count)) = raw.rsplit_once(CLASS_COUNT_SEPARATOR) else {
                warn!(entry = raw, "class-count entry without separator, skipping");
                continue;
            };
            let count = count
                .trim()
                .parse::<u64>()
                .ok()
                .or_else(|| count.trim().parse::<f64>().ok().map(|c| c.max(0.0) as u64));
            match count {
                Some(count) if !class.trim().is_empty() => entries.push(ClassCount {
                    class: class.trim().to_string(),
                    count,
                }),
                _ => warn!(entry = raw, "malformed class-count entry, skipping"),
            }
        }
        Self { entries }
    }

    /// Serialize back to the packed backend format.
    pub fn to_compact(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}{}{}", e.class, CLASS_COUNT_SEPARATOR, e.count))
            .collect::<Vec<_>>()
            .join(&CLASS_ENTRY_SEPARATOR.to_string())
    }

    pub fn entries(&self) -> &[ClassCount] {
        &self.entries
    }

    pub fn contains(&self, class: &str) -> bool {
        self.entries.iter().any(|e| e.class == class)
    }

    pub fn count_of(&self, class: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.class == class).map(|e| e.count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_packed_string() {
        let m = ClassMembership::parse_compact("Q5:9000|Q215627:12000");
        assert_eq!(m.len(), 2);
        assert_eq!(m.count_of("Q5"), Some(9000));
        assert!(m.contains("Q215627"));
        assert!(!m.contains("Q1"));
    }

    #[test]
    fn skips_malformed_entries() {
        let m = ClassMembership::parse_compact("Q5:10||bogus|Q6:abc|:4|Q7:2.0");
        let classes: Vec<&str> = m.entries().iter().map(|e| e.class.as_str()).collect();
        assert_eq!(classes, vec!["Q5", "Q7"]);
        assert_eq!(m.count_of("Q7"), Some(2));
    }

    #[test]
    fn compact_form_is_stable() {
        let packed = "Q1:10|Q2:100";
        assert_eq!(ClassMembership::parse_compact(packed).to_compact(), packed);
    }

    #[test]
    fn empty_string_is_empty_membership() {
        assert!(ClassMembership::parse_compact("").is_empty());
    }
}
