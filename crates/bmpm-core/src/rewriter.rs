//! Maximal-munch rewriting of one word through one rule table.
//!
//! The word is consumed left to right. At each cursor the longest matching
//! rule wins (earliest in table order on ties); a position no rule matches
//! copies its character through unchanged and advances by one, so a word of
//! n characters takes at most n steps. Alternation replacements fork every
//! candidate in the frontier, which is deduplicated after each step.

use tracing::{debug, debug_span};

use crate::candidates::PhoneticCandidateSet;
use crate::rules::{Replacement, Rule, RuleTable};

/// One applied rule (or identity fallback) during a rewrite.
#[derive(Debug, Clone, Copy)]
pub struct RewriteStep<'a> {
    /// Cursor position, in characters.
    pub position: usize,
    /// Characters consumed at `position`.
    pub consumed: usize,
    /// Table index and rule, or `None` for the identity fallback.
    pub rule: Option<(usize, &'a Rule)>,
    /// Frontier size after this step.
    pub frontier_len: usize,
}

/// Rewrite `word` into its candidate set under `table`.
pub fn rewrite(word: &str, table: &RuleTable) -> PhoneticCandidateSet {
    rewrite_observed(word, table, |_| {})
}

/// `rewrite`, reporting every step to `on_step`.
pub fn rewrite_observed<'t>(
    word: &str,
    table: &'t RuleTable,
    mut on_step: impl FnMut(RewriteStep<'t>),
) -> PhoneticCandidateSet {
    let chars: Vec<char> = word.chars().collect();
    let _span = debug_span!("rewrite", table = table.name(), char_count = chars.len()).entered();

    let mut frontier = PhoneticCandidateSet::singleton("");
    let mut i = 0;
    while i < chars.len() {
        let (consumed, rule) = match table.best_match(&chars, i) {
            Some((idx, rule)) => {
                frontier = expand(frontier, rule.replacement());
                (rule.pattern_len(), Some((idx, rule)))
            }
            None => {
                frontier = append(frontier, chars[i].encode_utf8(&mut [0; 4]));
                (1, None)
            }
        };
        on_step(RewriteStep {
            position: i,
            consumed,
            rule,
            frontier_len: frontier.len(),
        });
        i += consumed;
    }

    debug!(candidates = frontier.len());
    frontier
}

fn append(frontier: PhoneticCandidateSet, suffix: &str) -> PhoneticCandidateSet {
    if suffix.is_empty() {
        return frontier;
    }
    frontier
        .into_iter()
        .map(|mut s| {
            s.push_str(suffix);
            s
        })
        .collect()
}

fn expand(frontier: PhoneticCandidateSet, replacement: &Replacement) -> PhoneticCandidateSet {
    match replacement {
        Replacement::Literal(text) => append(frontier, text),
        Replacement::Alternatives(alts) => {
            let mut next = PhoneticCandidateSet::new();
            for base in frontier.iter() {
                for alt in alts {
                    let mut s = String::with_capacity(base.len() + alt.len());
                    s.push_str(base);
                    s.push_str(alt);
                    next.insert(s);
                }
            }
            next
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RawRule;

    fn table(records: &[(&str, &str, &str, &str)]) -> RuleTable {
        let raw: Vec<RawRule> = records
            .iter()
            .map(|(p, l, r, rep)| RawRule::new(p, l, r, rep))
            .collect();
        RuleTable::from_records("test", &raw).unwrap()
    }

    fn sorted(set: &PhoneticCandidateSet) -> Vec<String> {
        set.sorted()
    }

    #[test]
    fn empty_table_is_identity() {
        let t = RuleTable::empty("none");
        for word in ["", "a", "neck", "Šťastný", "שלום"] {
            let out = rewrite(word, &t);
            assert_eq!(out.as_slice(), [word.to_string()]);
        }
    }

    #[test]
    fn empty_word_yields_empty_string() {
        let t = table(&[("a", "", "", "(a|o)")]);
        let out = rewrite("", &t);
        assert_eq!(out.as_slice(), [String::new()]);
    }

    #[test]
    fn maximal_munch_consumes_ck_in_one_step() {
        let t = table(&[("c", "", "", "k"), ("ck", "", "", "k")]);
        let mut steps = Vec::new();
        let out = rewrite_observed("neck", &t, |s| steps.push((s.position, s.consumed)));
        assert_eq!(out.as_slice(), ["nek".to_string()]);
        assert_eq!(steps, vec![(0, 1), (1, 1), (2, 2)]);
    }

    #[test]
    fn alternation_cross_product() {
        let t = table(&[("au", "", "", "(D|a|u)")]);
        let out = rewrite("au", &t);
        assert_eq!(sorted(&out), vec!["D", "a", "u"]);
    }

    #[test]
    fn alternation_forks_every_existing_candidate() {
        let t = table(&[("a", "", "", "(a|o)"), ("e", "", "", "(e|i)")]);
        let out = rewrite("ae", &t);
        assert_eq!(out.as_slice(), ["ae", "ai", "oe", "oi"].map(String::from));
    }

    #[test]
    fn converging_branches_are_deduplicated() {
        let t = table(&[("a", "", "", "(x|)"), ("b", "", "", "(|x)")]);
        let out = rewrite("ab", &t);
        // x+"" and ""+x converge
        assert_eq!(sorted(&out), vec!["", "x", "xx"]);
    }

    #[test]
    fn deletion_rule() {
        let t = table(&[("h", "", "$", "")]);
        assert_eq!(rewrite("ah", &t).as_slice(), ["a".to_string()]);
        assert_eq!(rewrite("ha", &t).as_slice(), ["ha".to_string()]);
    }

    #[test]
    fn context_sees_stage_input_not_output() {
        // "b" -> "a" must not make the following "a" see an "a" on its left.
        let t = table(&[("b", "", "", "a"), ("a", "a", "", "X")]);
        assert_eq!(rewrite("ba", &t).as_slice(), ["aa".to_string()]);
        assert_eq!(rewrite("aa", &t).as_slice(), ["aX".to_string()]);
    }

    #[test]
    fn pattern_longer_than_rest_cannot_match() {
        let t = table(&[("abc", "", "", "Z")]);
        assert_eq!(rewrite("ab", &t).as_slice(), ["ab".to_string()]);
    }

    #[test]
    fn steps_never_exceed_word_length() {
        let t = table(&[("a", "", "", "(a|o)"), ("ss", "", "", "s")]);
        let word = "assassin";
        let mut count = 0;
        rewrite_observed(word, &t, |_| count += 1);
        assert!(count <= word.chars().count());
    }

    #[test]
    fn identity_fallback_is_reported_without_rule() {
        let t = table(&[("a", "", "", "o")]);
        let mut rules = Vec::new();
        rewrite_observed("ba", &t, |s| rules.push(s.rule.map(|(idx, _)| idx)));
        assert_eq!(rules, vec![None, Some(0)]);
    }
}
