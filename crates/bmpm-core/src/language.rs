//! Closed identifier sets: languages, naming conventions and rewrite stages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A language with (potentially) registered rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Any,
    Arabic,
    Cyrillic,
    Czech,
    Dutch,
    English,
    French,
    German,
    Greek,
    GreekLatin,
    Hebrew,
    Hungarian,
    Italian,
    Polish,
    Portuguese,
    Romanian,
    Russian,
    Spanish,
    Turkish,
}

impl Language {
    pub const ALL: [Language; 19] = [
        Language::Any,
        Language::Arabic,
        Language::Cyrillic,
        Language::Czech,
        Language::Dutch,
        Language::English,
        Language::French,
        Language::German,
        Language::Greek,
        Language::GreekLatin,
        Language::Hebrew,
        Language::Hungarian,
        Language::Italian,
        Language::Polish,
        Language::Portuguese,
        Language::Romanian,
        Language::Russian,
        Language::Spanish,
        Language::Turkish,
    ];

    /// Lowercase name used in rule files, settings and the CLI.
    pub fn name(self) -> &'static str {
        match self {
            Language::Any => "any",
            Language::Arabic => "arabic",
            Language::Cyrillic => "cyrillic",
            Language::Czech => "czech",
            Language::Dutch => "dutch",
            Language::English => "english",
            Language::French => "french",
            Language::German => "german",
            Language::Greek => "greek",
            Language::GreekLatin => "greeklatin",
            Language::Hebrew => "hebrew",
            Language::Hungarian => "hungarian",
            Language::Italian => "italian",
            Language::Polish => "polish",
            Language::Portuguese => "portuguese",
            Language::Romanian => "romanian",
            Language::Russian => "russian",
            Language::Spanish => "spanish",
            Language::Turkish => "turkish",
        }
    }

    /// Languages whose approx/exact tables fold in the shared Hebrew fragment.
    pub fn is_hebrew_derived(self) -> bool {
        matches!(self, Language::Hebrew)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.name() == lower)
            .ok_or(UnknownLanguage(s.to_string()))
    }
}

/// Onomastic tradition selecting which fragment set is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingConvention {
    Generic,
    Ashkenazic,
    Sephardic,
}

impl NamingConvention {
    pub const ALL: [NamingConvention; 3] = [
        NamingConvention::Generic,
        NamingConvention::Ashkenazic,
        NamingConvention::Sephardic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NamingConvention::Generic => "generic",
            NamingConvention::Ashkenazic => "ashkenazic",
            NamingConvention::Sephardic => "sephardic",
        }
    }

    /// Short prefix of the embedded rule file (`gen`, `ash`, `sep`).
    pub fn short_name(self) -> &'static str {
        match self {
            NamingConvention::Generic => "gen",
            NamingConvention::Ashkenazic => "ash",
            NamingConvention::Sephardic => "sep",
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown naming convention: {0} (expected generic, ashkenazic or sephardic)")]
pub struct UnknownConvention(pub String);

impl FromStr for NamingConvention {
    type Err = UnknownConvention;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "generic" | "gen" => Ok(NamingConvention::Generic),
            "ashkenazic" | "ash" => Ok(NamingConvention::Ashkenazic),
            "sephardic" | "sep" => Ok(NamingConvention::Sephardic),
            _ => Err(UnknownConvention(s.to_string())),
        }
    }
}

/// One of the three ordered rewrite passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Orthography to the intermediate phonetic alphabet.
    Rules,
    /// Coarsening toward approximate pronunciation.
    Approx,
    /// Canonical comparable form.
    Exact,
}

impl Stage {
    pub const ORDER: [Stage; 3] = [Stage::Rules, Stage::Approx, Stage::Exact];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Rules => "rules",
            Stage::Approx => "approx",
            Stage::Exact => "exact",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rules" => Ok(Stage::Rules),
            "approx" => Ok(Stage::Approx),
            "exact" => Ok(Stage::Exact),
            other => Err(format!("unknown stage: {other}")),
        }
    }
}
