use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::language::{Language, NamingConvention, Stage};

use super::rule::RawRule;
use super::table::FragmentRef;
use super::RuleLoadError;

pub const GENERIC_TOML: &str = include_str!("data/gen.toml");
pub const ASHKENAZIC_TOML: &str = include_str!("data/ash.toml");
pub const SEPHARDIC_TOML: &str = include_str!("data/sep.toml");

/// Embedded rule source for a convention.
pub fn default_toml(convention: NamingConvention) -> &'static str {
    match convention {
        NamingConvention::Generic => GENERIC_TOML,
        NamingConvention::Ashkenazic => ASHKENAZIC_TOML,
        NamingConvention::Sephardic => SEPHARDIC_TOML,
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConventionFile {
    #[serde(default)]
    hebrew_common: Vec<RawRule>,
    #[serde(default)]
    rules: BTreeMap<String, Vec<RawRule>>,
    #[serde(default)]
    approx: BTreeMap<String, Vec<RawRule>>,
    #[serde(default)]
    exact: BTreeMap<String, Vec<RawRule>>,
}

/// Raw records of one named fragment, with sentinel markers removed.
#[derive(Debug, Clone)]
pub struct Fragment {
    name: String,
    records: Vec<RawRule>,
    markers: Vec<String>,
}

impl Fragment {
    fn new(name: String, raw: Vec<RawRule>) -> Self {
        let mut records = Vec::with_capacity(raw.len());
        let mut markers = Vec::new();
        for record in raw {
            match record {
                RawRule::Marker(marker) => {
                    debug!(fragment = %name, %marker, "dropping sentinel marker");
                    markers.push(marker);
                }
                rule => records.push(rule),
            }
        }
        Self {
            name,
            records,
            markers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[RawRule] {
        &self.records
    }

    /// Sentinel strings that were filtered out of this fragment.
    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn as_fragment_ref(&self) -> FragmentRef<'_> {
        FragmentRef {
            name: &self.name,
            records: &self.records,
        }
    }
}

/// Every fragment of one naming convention, keyed by language.
#[derive(Debug, Clone)]
pub struct ConventionRules {
    convention: NamingConvention,
    rules: BTreeMap<Language, Fragment>,
    approx: BTreeMap<Language, Fragment>,
    approx_common: Option<Fragment>,
    exact: BTreeMap<Language, Fragment>,
    exact_common: Option<Fragment>,
    hebrew_common: Option<Fragment>,
}

/// Parse a convention rule file.
///
/// Keys of `[rules]`, `[approx]` and `[exact]` must be language names;
/// `common` is additionally allowed under `[approx]` and `[exact]`.
pub fn parse_convention_toml(
    convention: NamingConvention,
    source: &str,
) -> Result<ConventionRules, RuleLoadError> {
    let file: ConventionFile = toml::from_str(source).map_err(|e| RuleLoadError::Parse {
        source_name: convention.short_name().to_string(),
        message: e.to_string(),
    })?;

    let prefix = convention.short_name();
    let (approx, approx_common) = split_section(prefix, Stage::Approx, file.approx)?;
    let (exact, exact_common) = split_section(prefix, Stage::Exact, file.exact)?;
    let (rules, rules_common) = split_section(prefix, Stage::Rules, file.rules)?;
    if rules_common.is_some() {
        return Err(RuleLoadError::UnknownFragment {
            name: format!("{prefix}.rules.common"),
        });
    }

    let hebrew_common = (!file.hebrew_common.is_empty())
        .then(|| Fragment::new(format!("{prefix}.hebrew_common"), file.hebrew_common));

    Ok(ConventionRules {
        convention,
        rules,
        approx,
        approx_common,
        exact,
        exact_common,
        hebrew_common,
    })
}

type Section = (BTreeMap<Language, Fragment>, Option<Fragment>);

fn split_section(
    prefix: &str,
    stage: Stage,
    raw: BTreeMap<String, Vec<RawRule>>,
) -> Result<Section, RuleLoadError> {
    let mut by_lang = BTreeMap::new();
    let mut common = None;
    for (key, records) in raw {
        let name = format!("{prefix}.{stage}.{key}");
        if key == "common" {
            common = Some(Fragment::new(name, records));
            continue;
        }
        let lang = key
            .parse::<Language>()
            .map_err(|_| RuleLoadError::UnknownFragment { name: name.clone() })?;
        by_lang.insert(lang, Fragment::new(name, records));
    }
    Ok((by_lang, common))
}

impl ConventionRules {
    pub fn convention(&self) -> NamingConvention {
        self.convention
    }

    /// Languages with a rules-stage fragment, i.e. the supported set.
    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.rules.keys().copied()
    }

    /// All fragments, for validation and listing.
    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> + '_ {
        self.rules
            .values()
            .chain(self.approx.values())
            .chain(self.approx_common.iter())
            .chain(self.exact.values())
            .chain(self.exact_common.iter())
            .chain(self.hebrew_common.iter())
    }

    /// Ordered fragment list for one (language, stage), or `None` when the
    /// stage has nothing registered for that language.
    ///
    /// The language fragment always comes first; shared fragments follow as
    /// lower-priority fallbacks.
    pub fn compose(&self, lang: Language, stage: Stage) -> Option<Vec<&Fragment>> {
        let hebrew = stage != Stage::Rules && lang.is_hebrew_derived();

        let parts: Vec<&Fragment> = match stage {
            Stage::Rules => return self.rules.get(&lang).map(|f| vec![f]),
            Stage::Approx => self
                .approx
                .get(&lang)
                .into_iter()
                .chain(self.approx_common.as_ref())
                .collect(),
            Stage::Exact => self
                .exact
                .get(&lang)
                .into_iter()
                .chain(self.exact_common.as_ref())
                .collect(),
        };

        let parts: Vec<&Fragment> = parts
            .into_iter()
            .chain(self.hebrew_common.as_ref().filter(|_| hebrew))
            .collect();

        (!parts.is_empty()).then_some(parts)
    }
}
