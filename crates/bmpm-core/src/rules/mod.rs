//! Rule records, context patterns, tables and the table registry.
//!
//! Rule data lives in one embedded TOML file per naming convention
//! (`data/gen.toml`, `data/ash.toml`, `data/sep.toml`). Fragments from those
//! files are concatenated into `RuleTable`s per (language, convention,
//! stage) and held in a `RuleRegistry`.

pub mod context;
mod fragments;
mod registry;
mod rule;
mod table;

pub use context::{ContextError, ContextPattern, Side};
pub use fragments::{default_toml, parse_convention_toml, ConventionRules, Fragment};
pub use registry::{RuleRegistry, RuleRegistryBuilder};
pub use rule::{RawRule, Replacement, Rule};
pub use table::{FragmentRef, RuleTable};

/// A rule source or record that cannot become part of a table.
#[derive(Debug, thiserror::Error)]
pub enum RuleLoadError {
    #[error("TOML parse error in {source_name} rules: {message}")]
    Parse { source_name: String, message: String },

    #[error("{fragment}[{index}]: expected 4 fields, found {arity}")]
    Arity {
        fragment: String,
        index: usize,
        arity: usize,
    },

    #[error("{fragment}[{index}]: empty pattern")]
    EmptyPattern { fragment: String, index: usize },

    #[error("{fragment}[{index}]: bare marker {marker:?} is not a rule")]
    Marker {
        fragment: String,
        index: usize,
        marker: String,
    },

    #[error("{fragment}[{index}]: invalid context {context:?}: {reason}")]
    InvalidContext {
        fragment: String,
        index: usize,
        context: String,
        reason: &'static str,
    },

    #[error("{fragment}[{index}]: replacement {replacement:?} names unknown language {language:?}")]
    InvalidReplacement {
        fragment: String,
        index: usize,
        replacement: String,
        language: String,
    },

    #[error("unknown fragment: {name}")]
    UnknownFragment { name: String },

    #[error("rule registry already initialized")]
    AlreadyInitialized,
}
