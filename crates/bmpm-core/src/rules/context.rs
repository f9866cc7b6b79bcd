//! Left/right context patterns.
//!
//! A context is a small regex-like language: literal characters, `.` for any
//! single character, character classes (`[abc]`, `[^abc]`), grouped
//! disjunctions (`(a|bc|[xy])`), and the word-edge anchors `^` and `$`. A left
//! context must match a suffix of the text before the rule pattern; a right
//! context must match a prefix of the text after it. Anchors may appear
//! anywhere, including inside groups, and always refer to the true word
//! boundaries, never to the local window.

use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ContextError {
    pub reason: &'static str,
}

impl ContextError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Element {
    Char(char),
    Any,
    Class { negated: bool, chars: Vec<char> },
    Group(Vec<Vec<Element>>),
    Start,
    End,
}

impl Element {
    /// Single-character test. Groups and anchors never reach here.
    fn accepts(&self, c: char) -> bool {
        match self {
            Element::Char(x) => *x == c,
            Element::Any => true,
            Element::Class { negated, chars } => chars.contains(&c) != *negated,
            Element::Group(_) | Element::Start | Element::End => false,
        }
    }
}

/// A compiled context constraint for one side of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextPattern {
    source: String,
    side: Side,
    seq: Vec<Element>,
}

impl ContextPattern {
    pub fn compile(source: &str, side: Side) -> Result<Self, ContextError> {
        let mut parser = Parser {
            chars: source.chars().peekable(),
        };
        let mut alts = parser.alternatives(false)?;
        // '|' outside a group is rejected, so the top level has exactly one branch.
        let seq = alts.pop().unwrap_or_default();

        Ok(Self {
            source: source.to_string(),
            side,
            seq,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the context places no constraint at all.
    pub fn is_unconstrained(&self) -> bool {
        self.seq.is_empty()
    }

    /// Evaluate against `word`, where the rule pattern occupies `start..end`.
    pub fn holds(&self, word: &[char], start: usize, end: usize) -> bool {
        if self.is_unconstrained() {
            return true;
        }
        match self.side {
            Side::Left => backward(&self.seq, word, start, &|_| true),
            Side::Right => forward(&self.seq, word, end, &|_| true),
        }
    }
}

/// Match `elems` left to right from `pos`; `done` decides on each end position.
fn forward(elems: &[Element], text: &[char], pos: usize, done: &dyn Fn(usize) -> bool) -> bool {
    let Some((first, rest)) = elems.split_first() else {
        return done(pos);
    };
    match first {
        Element::Group(alts) => alts
            .iter()
            .any(|alt| forward(alt, text, pos, &|p| forward(rest, text, p, done))),
        Element::Start => pos == 0 && forward(rest, text, pos, done),
        Element::End => pos == text.len() && forward(rest, text, pos, done),
        single => {
            text.get(pos).is_some_and(|&c| single.accepts(c))
                && forward(rest, text, pos + 1, done)
        }
    }
}

/// Match `elems` right to left, ending just before `pos`.
fn backward(elems: &[Element], text: &[char], pos: usize, done: &dyn Fn(usize) -> bool) -> bool {
    let Some((last, rest)) = elems.split_last() else {
        return done(pos);
    };
    match last {
        Element::Group(alts) => alts
            .iter()
            .any(|alt| backward(alt, text, pos, &|p| backward(rest, text, p, done))),
        Element::Start => pos == 0 && backward(rest, text, pos, done),
        Element::End => pos == text.len() && backward(rest, text, pos, done),
        single => pos > 0 && single.accepts(text[pos - 1]) && backward(rest, text, pos - 1, done),
    }
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Parser<'_> {
    fn alternatives(&mut self, in_group: bool) -> Result<Vec<Vec<Element>>, ContextError> {
        let mut alts: Vec<Vec<Element>> = vec![Vec::new()];
        loop {
            let Some(c) = self.chars.next() else {
                if in_group {
                    return Err(ContextError::new("unclosed group"));
                }
                return Ok(alts);
            };
            let element = match c {
                ')' if in_group => return Ok(alts),
                ')' => return Err(ContextError::new("unmatched ')'")),
                '|' if in_group => {
                    alts.push(Vec::new());
                    continue;
                }
                '|' => return Err(ContextError::new("'|' outside a group")),
                '(' => Element::Group(self.alternatives(true)?),
                '[' => self.class()?,
                ']' => return Err(ContextError::new("unmatched ']'")),
                '^' => Element::Start,
                '$' => Element::End,
                '.' => Element::Any,
                other => Element::Char(other),
            };
            if let Some(branch) = alts.last_mut() {
                branch.push(element);
            }
        }
    }

    fn class(&mut self) -> Result<Element, ContextError> {
        let negated = self.chars.next_if_eq(&'^').is_some();
        let mut chars = Vec::new();
        loop {
            match self.chars.next() {
                None => return Err(ContextError::new("unclosed character class")),
                Some(']') => break,
                Some(c) => chars.push(c),
            }
        }
        if chars.is_empty() {
            return Err(ContextError::new("empty character class"));
        }
        Ok(Element::Class { negated, chars })
    }
}
