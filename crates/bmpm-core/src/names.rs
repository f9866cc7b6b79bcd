//! Input normalization and name-prefix handling.
//!
//! Names often carry particles (`van`, `de la`, `ben`, `d'`) that may or may
//! not be written together with the surname. Each input is expanded into the
//! spellings worth encoding; the engine unions their codes.

use std::cmp::Reverse;

use crate::language::NamingConvention;

/// Trim, lowercase and collapse internal whitespace.
pub fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Spellings to encode for `input` under `convention`.
///
/// `prefixes` is the convention's particle list; longer particles are tried
/// first, so `de la` wins over `de`. With `concat`, the kept words are joined
/// into one string; otherwise each word is its own variant. The result is
/// never empty and has no duplicates.
pub fn name_variants(
    input: &str,
    convention: NamingConvention,
    prefixes: &[String],
    concat: bool,
) -> Vec<String> {
    let mut ordered = prefixes.to_vec();
    ordered.sort_by_key(|p| Reverse(p.chars().count()));

    let mut out = Vec::new();
    collect_variants(&normalize(input), convention, &ordered, concat, &mut out);
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn collect_variants(
    name: &str,
    convention: NamingConvention,
    prefixes: &[String],
    concat: bool,
    out: &mut Vec<String>,
) {
    if convention == NamingConvention::Generic {
        if let Some(rest) = name.strip_prefix("d'") {
            collect_variants(rest, convention, prefixes, concat, out);
            collect_variants(&format!("d{rest}"), convention, prefixes, concat, out);
            return;
        }
        for prefix in prefixes {
            let Some(rest) = name
                .strip_prefix(prefix.as_str())
                .and_then(|r| r.strip_prefix(' '))
            else {
                continue;
            };
            let joined: String = prefix.split_whitespace().collect();
            collect_variants(rest, convention, prefixes, concat, out);
            collect_variants(&format!("{joined}{rest}"), convention, prefixes, concat, out);
            return;
        }
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    let is_prefix = |w: &&str| prefixes.iter().any(|p| p == w);
    let kept: Vec<&str> = match convention {
        NamingConvention::Generic => words.clone(),
        NamingConvention::Ashkenazic => words.iter().copied().filter(|w| !is_prefix(w)).collect(),
        NamingConvention::Sephardic => words
            .iter()
            .map(|w| w.rsplit('\'').next().unwrap_or(w))
            .filter(|w| !w.is_empty() && !is_prefix(w))
            .collect(),
    };
    let kept = if kept.is_empty() { words } else { kept };

    let mut push = |s: String| {
        if !out.contains(&s) {
            out.push(s);
        }
    };
    if concat {
        push(kept.concat());
    } else {
        for w in kept {
            push(w.to_string());
        }
    }
}
