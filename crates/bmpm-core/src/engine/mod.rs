//! Multi-language encoding: one pipeline per requested language, unioned.
//!
//! `Engine` borrows an immutable `RuleRegistry`; encoding allocates only
//! per-call state, so one engine can serve any number of threads.

#[cfg(test)]
mod tests;

use std::num::NonZeroUsize;
use std::thread;

use serde::Serialize;
use tracing::{debug, debug_span};

use crate::candidates::PhoneticCandidateSet;
use crate::language::{Language, NamingConvention};
use crate::names::name_variants;
use crate::pipeline::StagePipeline;
use crate::rules::RuleRegistry;
use crate::settings::{settings, NameSettings, Settings};

/// A requested language that has no rules under the requested convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("language {language:?} is not supported under the {convention} convention")]
pub struct LanguageNotSupported {
    pub language: String,
    pub convention: NamingConvention,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("no languages requested")]
    EmptyLanguages,
}

/// Result of one `encode` call.
///
/// Unsupported languages are reported here rather than failing the call.
#[derive(Debug, Clone, Serialize)]
pub struct Encoding {
    pub codes: PhoneticCandidateSet,
    /// Languages that contributed, in request order.
    pub languages: Vec<Language>,
    pub unsupported: Vec<LanguageNotSupported>,
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Join multi-word names before encoding.
    pub concat: bool,
    /// Cap on returned codes; 0 disables.
    pub max_codes: usize,
    pub names: NameSettings,
}

impl EngineOptions {
    pub fn from_settings(s: &Settings) -> Self {
        Self {
            concat: s.engine.concat,
            max_codes: s.engine.max_codes,
            names: s.names.clone(),
        }
    }

    fn prefixes(&self, convention: NamingConvention) -> &[String] {
        match convention {
            NamingConvention::Generic => &self.names.generic,
            NamingConvention::Ashkenazic => &self.names.ashkenazic,
            NamingConvention::Sephardic => &self.names.sephardic,
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_settings(settings())
    }
}

pub struct Engine<'r> {
    registry: &'r RuleRegistry,
    options: EngineOptions,
}

impl Engine<'static> {
    /// Engine over the global registry and global settings.
    pub fn global() -> Self {
        Engine::new(RuleRegistry::global(), EngineOptions::default())
    }
}

impl<'r> Engine<'r> {
    pub fn new(registry: &'r RuleRegistry, options: EngineOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &'r RuleRegistry {
        self.registry
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Encode `word` under every requested language and union the codes.
    ///
    /// Language hints are names (`"hebrew"`, `"polish"`...). Names that are
    /// unknown, or have no rules for `convention`, are skipped and listed in
    /// `Encoding::unsupported`. Only an empty hint list is an error.
    pub fn encode<S: AsRef<str>>(
        &self,
        word: &str,
        convention: NamingConvention,
        languages: &[S],
    ) -> Result<Encoding, EncodeError> {
        if languages.is_empty() {
            return Err(EncodeError::EmptyLanguages);
        }
        let _span = debug_span!("encode", word, convention = convention.name()).entered();

        let mut pipelines: Vec<StagePipeline> = Vec::new();
        let mut unsupported: Vec<LanguageNotSupported> = Vec::new();
        for hint in languages {
            let name = hint.as_ref();
            let resolved = name
                .parse::<Language>()
                .ok()
                .and_then(|lang| StagePipeline::resolve(self.registry, lang, convention));
            match resolved {
                Some(p) => {
                    if !pipelines.iter().any(|q| q.language() == p.language()) {
                        pipelines.push(p);
                    }
                }
                None => {
                    let key = name.trim().to_lowercase();
                    let seen = unsupported
                        .iter()
                        .any(|u| u.language.trim().to_lowercase() == key);
                    if !seen {
                        debug!(language = name, "unsupported language skipped");
                        unsupported.push(LanguageNotSupported {
                            language: name.to_string(),
                            convention,
                        });
                    }
                }
            }
        }

        let variants = name_variants(
            word,
            convention,
            self.options.prefixes(convention),
            self.options.concat,
        );

        let mut codes = PhoneticCandidateSet::new();
        for pipeline in &pipelines {
            for variant in &variants {
                codes.extend_from(pipeline.run(variant));
            }
        }

        let max = self.options.max_codes;
        if max > 0 && codes.len() > max {
            debug!(codes = codes.len(), max, "truncating codes");
            codes.truncate(max);
        }
        debug!(codes = codes.len(), unsupported = unsupported.len());

        Ok(Encoding {
            codes,
            languages: pipelines.iter().map(StagePipeline::language).collect(),
            unsupported,
        })
    }

    /// `encode` with typed language hints.
    pub fn encode_languages(
        &self,
        word: &str,
        convention: NamingConvention,
        languages: &[Language],
    ) -> Result<Encoding, EncodeError> {
        let names: Vec<&str> = languages.iter().map(|l| l.name()).collect();
        self.encode(word, convention, &names)
    }

    /// Encode many words in parallel; results are in input order.
    pub fn encode_batch<W, S>(
        &self,
        words: &[W],
        convention: NamingConvention,
        languages: &[S],
    ) -> Vec<Result<Encoding, EncodeError>>
    where
        W: AsRef<str> + Sync,
        S: AsRef<str> + Sync,
    {
        if words.is_empty() {
            return Vec::new();
        }
        let workers = thread::available_parallelism()
            .map_or(1, NonZeroUsize::get)
            .min(words.len());
        let chunk_len = words.len().div_ceil(workers);

        thread::scope(|scope| {
            let handles: Vec<_> = words
                .chunks(chunk_len)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|w| self.encode(w.as_ref(), convention, languages))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }
}
