//! Rules -> Approx -> Exact chaining for one (language, convention).

use std::sync::Arc;

use tracing::{debug, debug_span};

use crate::candidates::PhoneticCandidateSet;
use crate::language::{Language, NamingConvention, Stage};
use crate::rewriter::rewrite;
use crate::rules::{RuleRegistry, RuleTable};

/// Resolved stage tables for one (language, convention).
#[derive(Debug, Clone)]
pub struct StagePipeline {
    language: Language,
    convention: NamingConvention,
    stages: Vec<(Stage, Arc<RuleTable>)>,
}

impl StagePipeline {
    /// `None` when the registry has no rules-stage table for the pair.
    pub fn resolve(
        registry: &RuleRegistry,
        language: Language,
        convention: NamingConvention,
    ) -> Option<Self> {
        let stages = registry.stages(language, convention)?;
        Some(Self {
            language,
            convention,
            stages,
        })
    }

    /// A pipeline over explicit tables, in the order given.
    pub fn from_tables(
        language: Language,
        convention: NamingConvention,
        stages: Vec<(Stage, Arc<RuleTable>)>,
    ) -> Self {
        Self {
            language,
            convention,
            stages,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn convention(&self) -> NamingConvention {
        self.convention
    }

    pub fn stages(&self) -> &[(Stage, Arc<RuleTable>)] {
        &self.stages
    }

    /// Run every stage, rewriting each member of the previous stage's output
    /// and unioning the results.
    pub fn run(&self, word: &str) -> PhoneticCandidateSet {
        let _span = debug_span!(
            "pipeline",
            language = self.language.name(),
            convention = self.convention.name()
        )
        .entered();

        let mut current = PhoneticCandidateSet::singleton(word);
        for (stage, table) in &self.stages {
            current = run_stage(&current, table);
            debug!(stage = stage.name(), candidates = current.len());
        }
        current
    }
}

/// `⋃ rewrite(s, table)` over every member of `input`.
pub fn run_stage(input: &PhoneticCandidateSet, table: &RuleTable) -> PhoneticCandidateSet {
    let mut out = PhoneticCandidateSet::new();
    for s in input.iter() {
        out.extend_from(rewrite(s, table));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RawRule;

    fn table(name: &str, records: &[(&str, &str, &str, &str)]) -> Arc<RuleTable> {
        let raw: Vec<RawRule> = records
            .iter()
            .map(|(p, l, r, rep)| RawRule::new(p, l, r, rep))
            .collect();
        Arc::new(RuleTable::from_records(name, &raw).unwrap())
    }

    #[test]
    fn stages_feed_each_other() {
        let pipeline = StagePipeline::from_tables(
            Language::English,
            NamingConvention::Generic,
            vec![
                (Stage::Rules, table("rules", &[("ph", "", "", "f")])),
                (Stage::Approx, table("approx", &[("f", "", "", "(f|v)")])),
                (Stage::Exact, table("exact", &[("v", "", "", "f")])),
            ],
        );
        let out = pipeline.run("phil");
        assert_eq!(out.as_slice(), ["fil".to_string()]);
    }

    #[test]
    fn union_across_stage_inputs() {
        let pipeline = StagePipeline::from_tables(
            Language::English,
            NamingConvention::Generic,
            vec![
                (Stage::Rules, table("rules", &[("a", "", "", "(a|e)")])),
                (Stage::Approx, table("approx", &[("e", "", "", "(e|i)")])),
            ],
        );
        let out = pipeline.run("ab");
        assert_eq!(out.sorted(), vec!["ab", "eb", "ib"]);
    }

    #[test]
    fn no_stages_returns_input() {
        let pipeline =
            StagePipeline::from_tables(Language::Any, NamingConvention::Generic, Vec::new());
        assert_eq!(pipeline.run("xyz").as_slice(), ["xyz".to_string()]);
    }

    #[test]
    fn resolve_from_registry() {
        let registry = RuleRegistry::builtin().unwrap();
        let pipeline =
            StagePipeline::resolve(&registry, Language::English, NamingConvention::Generic)
                .unwrap();
        assert_eq!(pipeline.stages().len(), 3);
        assert!(StagePipeline::resolve(&registry, Language::Russian, NamingConvention::Sephardic)
            .is_none());
    }

    #[test]
    fn run_stage_on_empty_input_is_empty() {
        let t = table("t", &[]);
        assert!(run_stage(&PhoneticCandidateSet::new(), &t).is_empty());
    }
}
