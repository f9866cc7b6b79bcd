//! Deduplicated, insertion-ordered set of phonetic code strings.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

/// Distinct candidate strings in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct PhoneticCandidateSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl PhoneticCandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{s}`: the starting frontier of a rewrite or pipeline.
    pub fn singleton(s: impl Into<String>) -> Self {
        let mut set = Self::new();
        set.insert(s.into());
        set
    }

    /// Returns false when `s` was already present.
    pub fn insert(&mut self, s: String) -> bool {
        if self.seen.contains(&s) {
            return false;
        }
        self.seen.insert(s.clone());
        self.items.push(s);
        true
    }

    pub fn extend_from(&mut self, other: PhoneticCandidateSet) {
        for s in other.items {
            self.insert(s);
        }
    }

    pub fn contains(&self, s: &str) -> bool {
        self.seen.contains(s)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Keep only the first `n` members.
    pub fn truncate(&mut self, n: usize) {
        if n >= self.items.len() {
            return;
        }
        for dropped in self.items.drain(n..) {
            self.seen.remove(&dropped);
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }

    /// Members sorted, for order-insensitive comparisons.
    pub fn sorted(&self) -> Vec<String> {
        let mut v = self.items.clone();
        v.sort();
        v
    }
}

impl PartialEq for PhoneticCandidateSet {
    /// Set equality; insertion order is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.seen == other.seen
    }
}

impl Eq for PhoneticCandidateSet {}

impl FromIterator<String> for PhoneticCandidateSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::new();
        for s in iter {
            set.insert(s);
        }
        set
    }
}

impl<'a> FromIterator<&'a str> for PhoneticCandidateSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl IntoIterator for PhoneticCandidateSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Members joined with `|`, the conventional printed form.
impl fmt::Display for PhoneticCandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.items.join("|"))
    }
}

impl Serialize for PhoneticCandidateSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_dedups_and_keeps_first_seen_order() {
        let mut set = PhoneticCandidateSet::new();
        assert!(set.insert("b".into()));
        assert!(set.insert("a".into()));
        assert!(!set.insert("b".into()));
        assert_eq!(set.as_slice(), ["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn equality_ignores_order() {
        let a: PhoneticCandidateSet = ["x", "y"].into_iter().collect();
        let b: PhoneticCandidateSet = ["y", "x"].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn truncate_keeps_prefix_and_forgets_dropped() {
        let mut set: PhoneticCandidateSet = ["a", "b", "c"].into_iter().collect();
        set.truncate(2);
        assert_eq!(set.len(), 2);
        assert!(!set.contains("c"));
        assert!(set.insert("c".into()));
    }

    #[test]
    fn display_joins_with_pipe() {
        let set: PhoneticCandidateSet = ["kon", "kohen"].into_iter().collect();
        assert_eq!(set.to_string(), "kon|kohen");
        assert_eq!(PhoneticCandidateSet::singleton("").to_string(), "");
    }

    #[test]
    fn serializes_as_array() {
        let set: PhoneticCandidateSet = ["a", "o"].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","o"]"#);
    }
}
