use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use tracing::{debug, debug_span};

use crate::language::{Language, NamingConvention, Stage};

use super::fragments::{default_toml, parse_convention_toml, ConventionRules};
use super::table::{FragmentRef, RuleTable};
use super::RuleLoadError;

static CUSTOM_SOURCES: OnceLock<Vec<(NamingConvention, String)>> = OnceLock::new();
static INSTANCE: OnceLock<RuleRegistry> = OnceLock::new();

type TableKey = (Language, NamingConvention, Stage);

/// Immutable map from (language, convention, stage) to its composed table.
///
/// Built once; safe to share across threads for concurrent reads.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    tables: HashMap<TableKey, Arc<RuleTable>>,
}

impl RuleRegistry {
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::default()
    }

    /// Registry over the embedded rule files.
    pub fn builtin() -> Result<Self, RuleLoadError> {
        Self::builder().build()
    }

    /// Replace some conventions' rule sources before the first `global()` call.
    ///
    /// Fails with `AlreadyInitialized` once `global()` has built the registry.
    pub fn init_custom(sources: Vec<(NamingConvention, String)>) -> Result<(), RuleLoadError> {
        if INSTANCE.get().is_some() {
            return Err(RuleLoadError::AlreadyInitialized);
        }
        // Validate eagerly
        let mut builder = Self::builder();
        for (convention, source) in &sources {
            builder = builder.convention_source(*convention, source.clone());
        }
        builder.build()?;
        CUSTOM_SOURCES
            .set(sources)
            .map_err(|_| RuleLoadError::AlreadyInitialized)
    }

    /// Get or initialize the global registry.
    pub fn global() -> &'static RuleRegistry {
        INSTANCE.get_or_init(|| {
            let mut builder = Self::builder();
            for (convention, source) in CUSTOM_SOURCES.get().into_iter().flatten() {
                builder = builder.convention_source(*convention, source.clone());
            }
            builder.build().expect("rule TOML must be valid")
        })
    }

    pub fn table(
        &self,
        lang: Language,
        convention: NamingConvention,
        stage: Stage,
    ) -> Option<&Arc<RuleTable>> {
        self.tables.get(&(lang, convention, stage))
    }

    /// Whether (language, convention) has at least a rules-stage table.
    pub fn supports(&self, lang: Language, convention: NamingConvention) -> bool {
        self.tables.contains_key(&(lang, convention, Stage::Rules))
    }

    /// Stage tables to run, in order. `None` when the language is unsupported.
    pub fn stages(
        &self,
        lang: Language,
        convention: NamingConvention,
    ) -> Option<Vec<(Stage, Arc<RuleTable>)>> {
        if !self.supports(lang, convention) {
            return None;
        }
        Some(
            Stage::ORDER
                .into_iter()
                .filter_map(|stage| {
                    self.table(lang, convention, stage)
                        .map(|t| (stage, Arc::clone(t)))
                })
                .collect(),
        )
    }

    /// Supported languages for a convention, in declaration order.
    pub fn languages(&self, convention: NamingConvention) -> Vec<Language> {
        Language::ALL
            .into_iter()
            .filter(|&lang| self.supports(lang, convention))
            .collect()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

/// Collects per-convention sources; anything not overridden uses the
/// embedded file.
#[derive(Debug, Default)]
pub struct RuleRegistryBuilder {
    sources: BTreeMap<NamingConvention, String>,
}

impl RuleRegistryBuilder {
    pub fn convention_source(mut self, convention: NamingConvention, toml: String) -> Self {
        self.sources.insert(convention, toml);
        self
    }

    pub fn build(self) -> Result<RuleRegistry, RuleLoadError> {
        let _span = debug_span!("build_registry", custom = self.sources.len()).entered();
        let mut tables = HashMap::new();
        for convention in NamingConvention::ALL {
            let source = self
                .sources
                .get(&convention)
                .map(String::as_str)
                .unwrap_or(default_toml(convention));
            let rules = parse_convention_toml(convention, source)?;
            register_convention(&rules, &mut tables)?;
        }
        debug!(table_count = tables.len());
        Ok(RuleRegistry { tables })
    }
}

fn register_convention(
    rules: &ConventionRules,
    tables: &mut HashMap<TableKey, Arc<RuleTable>>,
) -> Result<(), RuleLoadError> {
    let convention = rules.convention();
    let languages: Vec<Language> = rules.languages().collect();
    for lang in languages {
        for stage in Stage::ORDER {
            let Some(parts) = rules.compose(lang, stage) else {
                continue;
            };
            let refs: Vec<FragmentRef<'_>> = parts.iter().map(|f| f.as_fragment_ref()).collect();
            let name = format!("{}/{}/{}", convention.short_name(), lang, stage);
            let table = RuleTable::build(&name, lang, &refs)?;
            tables.insert((lang, convention, stage), Arc::new(table));
        }
    }
    Ok(())
}
