use serde::{Deserialize, Serialize};

use crate::language::{Language, UnknownLanguage};

use super::context::{ContextPattern, Side};
use super::RuleLoadError;

/// One record as it appears in a fragment file, before validation.
///
/// Fragments occasionally end with a bare string naming the fragment. Those
/// deserialize as `Marker` and are never valid rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRule {
    Record(Vec<String>),
    Marker(String),
}

impl RawRule {
    pub fn new(pattern: &str, left: &str, right: &str, replacement: &str) -> Self {
        RawRule::Record(vec![
            pattern.to_string(),
            left.to_string(),
            right.to_string(),
            replacement.to_string(),
        ])
    }
}

/// What a matched pattern is replaced with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// A literal string, possibly empty (deletion).
    Literal(String),
    /// Mutually exclusive outputs; each opens a separate candidate branch.
    Alternatives(Vec<String>),
}

impl Replacement {
    /// Parse `source` as seen by a table for `language`.
    ///
    /// `(a|b|)` is an alternation; anything else is literal text. A branch may
    /// end in a language restriction, `v[spanish]` or `ts[english+german]`;
    /// restricted branches survive only in tables of a listed language or of
    /// `any`. Returns `None` when no branch survives.
    pub fn parse(source: &str, language: Language) -> Result<Option<Self>, UnknownLanguage> {
        let branches: Vec<&str> = match source
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
        {
            Some(inner) if inner.contains('|') => inner.split('|').collect(),
            Some(inner) => vec![inner],
            None => vec![source],
        };

        let mut alts: Vec<String> = Vec::new();
        for branch in branches {
            let (text, allowed) = split_restriction(branch)?;
            let keep = language == Language::Any || allowed.map_or(true, |l| l.contains(&language));
            if keep && !alts.iter().any(|a| a == text) {
                alts.push(text.to_string());
            }
        }

        Ok(match alts.len() {
            0 => None,
            1 => Some(Replacement::Literal(alts.remove(0))),
            _ => Some(Replacement::Alternatives(alts)),
        })
    }

    pub fn branch_count(&self) -> usize {
        match self {
            Replacement::Literal(_) => 1,
            Replacement::Alternatives(alts) => alts.len(),
        }
    }
}

/// `text[lang+lang]` into its text and language list.
fn split_restriction(branch: &str) -> Result<(&str, Option<Vec<Language>>), UnknownLanguage> {
    let Some(open) = branch.strip_suffix(']').and_then(|b| b.rfind('[')) else {
        return Ok((branch, None));
    };
    let languages = branch[open + 1..branch.len() - 1]
        .split('+')
        .map(str::parse)
        .collect::<Result<Vec<Language>, _>>()?;
    Ok((&branch[..open], Some(languages)))
}

/// A validated (pattern, left, right, replacement) rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Vec<char>,
    pattern_text: String,
    left: ContextPattern,
    right: ContextPattern,
    replacement: Replacement,
    replacement_text: String,
}

impl Rule {
    /// Validate a raw record for a table of `language`. `fragment` and
    /// `index` only label errors.
    ///
    /// `Ok(None)` means the record is valid but every replacement branch is
    /// restricted to other languages, so it has no place in this table.
    pub fn from_raw(
        raw: &RawRule,
        language: Language,
        fragment: &str,
        index: usize,
    ) -> Result<Option<Self>, RuleLoadError> {
        let fields = match raw {
            RawRule::Record(fields) => fields,
            RawRule::Marker(marker) => {
                return Err(RuleLoadError::Marker {
                    fragment: fragment.to_string(),
                    index,
                    marker: marker.clone(),
                })
            }
        };
        let [pattern, left, right, replacement] = fields.as_slice() else {
            return Err(RuleLoadError::Arity {
                fragment: fragment.to_string(),
                index,
                arity: fields.len(),
            });
        };
        if pattern.is_empty() {
            return Err(RuleLoadError::EmptyPattern {
                fragment: fragment.to_string(),
                index,
            });
        }

        let context = |src: &str, side: Side| {
            ContextPattern::compile(src, side).map_err(|e| RuleLoadError::InvalidContext {
                fragment: fragment.to_string(),
                index,
                context: src.to_string(),
                reason: e.reason,
            })
        };
        let left = context(left.as_str(), Side::Left)?;
        let right = context(right.as_str(), Side::Right)?;

        let parsed = Replacement::parse(replacement, language).map_err(|e| {
            RuleLoadError::InvalidReplacement {
                fragment: fragment.to_string(),
                index,
                replacement: replacement.clone(),
                language: e.0,
            }
        })?;
        let Some(parsed) = parsed else {
            return Ok(None);
        };

        Ok(Some(Self {
            pattern: pattern.chars().collect(),
            pattern_text: pattern.clone(),
            left,
            right,
            replacement: parsed,
            replacement_text: replacement.clone(),
        }))
    }

    pub fn pattern(&self) -> &str {
        &self.pattern_text
    }

    /// Pattern length in characters.
    pub fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    pub fn first_char(&self) -> char {
        self.pattern[0]
    }

    pub fn left(&self) -> &ContextPattern {
        &self.left
    }

    pub fn right(&self) -> &ContextPattern {
        &self.right
    }

    pub fn replacement(&self) -> &Replacement {
        &self.replacement
    }

    pub fn replacement_text(&self) -> &str {
        &self.replacement_text
    }

    /// Whether this rule applies to `word` at cursor `i`.
    ///
    /// Contexts are always tested against `word`, the stage input, never
    /// against the partially rewritten output.
    pub fn matches_at(&self, word: &[char], i: usize) -> bool {
        let end = i + self.pattern.len();
        end <= word.len()
            && word[i..end] == self.pattern[..]
            && self.left.holds(word, i, end)
            && self.right.holds(word, i, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(p: &str, l: &str, r: &str, rep: &str) -> Rule {
        Rule::from_raw(&RawRule::new(p, l, r, rep), Language::Any, "test", 0)
            .unwrap()
            .unwrap()
    }

    fn parse(source: &str) -> Replacement {
        Replacement::parse(source, Language::Any).unwrap().unwrap()
    }

    #[test]
    fn replacement_literal_and_alternatives() {
        assert_eq!(parse("k"), Replacement::Literal("k".into()));
        assert_eq!(parse(""), Replacement::Literal(String::new()));
        assert_eq!(
            parse("(D|a|u)"),
            Replacement::Alternatives(vec!["D".into(), "a".into(), "u".into()])
        );
        assert_eq!(
            parse("(i|)"),
            Replacement::Alternatives(vec!["i".into(), String::new()])
        );
    }

    #[test]
    fn replacement_single_parenthesized_is_literal() {
        assert_eq!(parse("(ts)"), Replacement::Literal("ts".into()));
        assert_eq!(parse("(a|a)"), Replacement::Literal("a".into()));
    }

    #[test]
    fn restricted_branches_follow_the_table_language() {
        let source = "(b|v[spanish])";
        assert_eq!(
            Replacement::parse(source, Language::Any).unwrap(),
            Some(Replacement::Alternatives(vec!["b".into(), "v".into()]))
        );
        assert_eq!(
            Replacement::parse(source, Language::Spanish).unwrap(),
            Some(Replacement::Alternatives(vec!["b".into(), "v".into()]))
        );
        assert_eq!(
            Replacement::parse(source, Language::German).unwrap(),
            Some(Replacement::Literal("b".into()))
        );
    }

    #[test]
    fn restriction_lists_and_empty_restricted_branch() {
        assert_eq!(
            Replacement::parse("(i|Y[german]|[english])", Language::English).unwrap(),
            Some(Replacement::Alternatives(vec!["i".into(), String::new()]))
        );
        let source = "(ts[english+german+russian]|tS[english+german])";
        assert_eq!(
            Replacement::parse(source, Language::Russian).unwrap(),
            Some(Replacement::Literal("ts".into()))
        );
    }

    #[test]
    fn fully_restricted_rule_is_left_out() {
        let raw = RawRule::new("g", "", "", "(g[french]|gv[portuguese+spanish])");
        assert!(Rule::from_raw(&raw, Language::Polish, "f", 0).unwrap().is_none());
        assert!(Rule::from_raw(&raw, Language::French, "f", 0).unwrap().is_some());
    }

    #[test]
    fn unknown_restriction_language_is_rejected() {
        let raw = RawRule::new("a", "", "", "(a|o[klingon])");
        let err = Rule::from_raw(&raw, Language::Any, "gen.rules.any", 4).unwrap_err();
        assert!(matches!(
            err,
            RuleLoadError::InvalidReplacement { index: 4, ref language, .. } if language == "klingon"
        ));
    }

    #[test]
    fn rule_matches_with_bounds_check() {
        let r = rule("sch", "", "", "S");
        let word: Vec<char> = "busch".chars().collect();
        assert!(r.matches_at(&word, 2));
        assert!(!r.matches_at(&word, 3));
        assert!(!r.matches_at(&word, 4));
    }

    #[test]
    fn rule_context_uses_original_word() {
        let r = rule("e", "", "$", "");
        let word: Vec<char> = "anne".chars().collect();
        assert!(r.matches_at(&word, 3));
        assert!(!r.matches_at(&word, 0));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let raw = RawRule::Record(vec!["a".into(), "".into(), "b".into()]);
        let err = Rule::from_raw(&raw, Language::Any, "gen.rules.english", 7).unwrap_err();
        assert!(matches!(err, RuleLoadError::Arity { arity: 3, index: 7, .. }));
    }

    #[test]
    fn empty_pattern_is_rejected() {
        let raw = RawRule::new("", "", "", "x");
        let err = Rule::from_raw(&raw, Language::Any, "f", 0).unwrap_err();
        assert!(matches!(err, RuleLoadError::EmptyPattern { .. }));
    }

    #[test]
    fn marker_is_rejected() {
        let raw = RawRule::Marker("approxfrench".into());
        let err = Rule::from_raw(&raw, Language::Any, "f", 3).unwrap_err();
        assert!(matches!(err, RuleLoadError::Marker { index: 3, .. }));
    }

    #[test]
    fn bad_context_is_rejected() {
        let raw = RawRule::new("a", "(b", "", "x");
        let err = Rule::from_raw(&raw, Language::Any, "f", 0).unwrap_err();
        assert!(matches!(err, RuleLoadError::InvalidContext { .. }));
    }
}
