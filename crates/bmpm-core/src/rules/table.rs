use std::collections::HashMap;

use tracing::trace;

use crate::language::Language;

use super::rule::{RawRule, Rule};
use super::RuleLoadError;

/// A named slice of raw records, the unit tables are concatenated from.
#[derive(Debug, Clone, Copy)]
pub struct FragmentRef<'a> {
    pub name: &'a str,
    pub records: &'a [RawRule],
}

/// Ordered, immutable rule sequence for one (language, convention, stage).
///
/// Table order is priority order: among equally long matches the earlier
/// rule wins. Rules are indexed by their first pattern character so a cursor
/// position only scans rules that can possibly match there.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    name: String,
    rules: Vec<Rule>,
    by_first: HashMap<char, Vec<usize>>,
}

impl RuleTable {
    /// Concatenate fragments in order and validate every record.
    ///
    /// Replacement branches restricted to other languages than `language`
    /// are dropped; a rule left with no branch is left out of the table.
    pub fn build(
        name: &str,
        language: Language,
        fragments: &[FragmentRef<'_>],
    ) -> Result<Self, RuleLoadError> {
        let mut rules = Vec::with_capacity(fragments.iter().map(|f| f.records.len()).sum());
        for fragment in fragments {
            for (index, raw) in fragment.records.iter().enumerate() {
                match Rule::from_raw(raw, language, fragment.name, index)? {
                    Some(rule) => rules.push(rule),
                    None => trace!(fragment = fragment.name, index, "no branch for {language}"),
                }
            }
        }

        let mut by_first: HashMap<char, Vec<usize>> = HashMap::new();
        for (idx, rule) in rules.iter().enumerate() {
            by_first.entry(rule.first_char()).or_default().push(idx);
        }

        Ok(Self {
            name: name.to_string(),
            rules,
            by_first,
        })
    }

    /// Single-fragment `any` table, mostly for ad hoc and test tables.
    pub fn from_records(name: &str, records: &[RawRule]) -> Result<Self, RuleLoadError> {
        Self::build(name, Language::Any, &[FragmentRef { name, records }])
    }

    /// A table with no rules: every character maps to itself.
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The winning rule at cursor `i`: longest pattern, then earliest in table.
    pub fn best_match(&self, word: &[char], i: usize) -> Option<(usize, &Rule)> {
        let candidates = self.by_first.get(word.get(i)?)?;
        let mut best: Option<(usize, &Rule)> = None;
        for &idx in candidates {
            let rule = &self.rules[idx];
            if best.is_some_and(|(_, b)| b.pattern_len() >= rule.pattern_len()) {
                continue;
            }
            if rule.matches_at(word, i) {
                best = Some((idx, rule));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Replacement;

    fn word(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn concatenation_preserves_fragment_order() {
        let lang = vec![RawRule::new("a", "", "", "1")];
        let common = vec![RawRule::new("a", "", "", "2"), RawRule::new("b", "", "", "3")];
        let table = RuleTable::build(
            "t",
            Language::Any,
            &[
                FragmentRef { name: "lang", records: &lang },
                FragmentRef { name: "common", records: &common },
            ],
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        let (idx, rule) = table.best_match(&word("a"), 0).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(rule.replacement_text(), "1");
    }

    #[test]
    fn longest_pattern_wins_over_table_order() {
        let records = vec![RawRule::new("c", "", "", "k"), RawRule::new("ck", "", "", "k")];
        let table = RuleTable::from_records("t", &records).unwrap();
        let (idx, rule) = table.best_match(&word("neck"), 2).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(rule.pattern(), "ck");
    }

    #[test]
    fn equal_length_tie_goes_to_earlier_rule() {
        let records = vec![RawRule::new("ch", "", "", "x"), RawRule::new("ch", "", "", "tS")];
        let table = RuleTable::from_records("t", &records).unwrap();
        let (idx, _) = table.best_match(&word("ch"), 0).unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn context_failure_falls_through_to_shorter_rule() {
        let records = vec![RawRule::new("ch", "", "$", "x"), RawRule::new("c", "", "", "k")];
        let table = RuleTable::from_records("t", &records).unwrap();
        let (idx, _) = table.best_match(&word("chi"), 0).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn no_match_and_out_of_range() {
        let records = vec![RawRule::new("x", "", "", "y")];
        let table = RuleTable::from_records("t", &records).unwrap();
        assert!(table.best_match(&word("abc"), 0).is_none());
        assert!(table.best_match(&word("abc"), 3).is_none());
    }

    #[test]
    fn first_bad_record_fails_the_table() {
        let records = vec![
            RawRule::new("a", "", "", "b"),
            RawRule::Record(vec!["a".into(), "b".into()]),
        ];
        let err = RuleTable::from_records("frag", &records).unwrap_err();
        assert!(matches!(err, RuleLoadError::Arity { index: 1, arity: 2, .. }));
    }

    #[test]
    fn table_language_filters_restricted_branches() {
        let records = vec![
            RawRule::new("g", "", "", "(g[french]|gv[spanish])"),
            RawRule::new("b", "", "", "(b|v[spanish])"),
        ];
        let frag = [FragmentRef { name: "any", records: &records }];

        let german = RuleTable::build("t", Language::German, &frag).unwrap();
        assert_eq!(german.len(), 1);
        assert_eq!(german.rules()[0].replacement(), &Replacement::Literal("b".into()));

        let spanish = RuleTable::build("t", Language::Spanish, &frag).unwrap();
        assert_eq!(spanish.len(), 2);
        assert_eq!(spanish.rules()[0].replacement(), &Replacement::Literal("gv".into()));

        let any = RuleTable::build("t", Language::Any, &frag).unwrap();
        assert_eq!(any.rules()[0].replacement().branch_count(), 2);
    }

    #[test]
    fn empty_table() {
        let table = RuleTable::empty("none");
        assert!(table.is_empty());
        assert!(table.best_match(&word("a"), 0).is_none());
    }
}
