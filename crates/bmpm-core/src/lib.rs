//! Beider–Morse phonetic rewriting engine.
//!
//! A word is rewritten through three rule tables per language (orthography
//! to phonetic alphabet, approximation, canonical form). Each table is
//! applied with maximal-munch matching under left/right context
//! constraints, and alternation replacements fork the output, so a word
//! yields a *set* of phonetic codes. The engine unions the sets of every
//! requested language.
//!
//! ```no_run
//! use bmpm_core::{Engine, NamingConvention};
//!
//! let engine = Engine::global();
//! let result = engine
//!     .encode("Schwarz", NamingConvention::Generic, &["german", "polish"])
//!     .unwrap();
//! println!("{}", result.codes);
//! ```

pub mod candidates;
pub mod engine;
pub mod explain;
pub mod language;
pub mod names;
pub mod pipeline;
pub mod rewriter;
pub mod rules;
pub mod settings;

pub use candidates::PhoneticCandidateSet;
pub use engine::{EncodeError, Encoding, Engine, EngineOptions, LanguageNotSupported};
pub use language::{Language, NamingConvention, Stage};
pub use pipeline::StagePipeline;
pub use rewriter::rewrite;
pub use rules::{RuleLoadError, RuleRegistry, RuleTable};
