//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

use crate::language::{Language, NamingConvention};

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();
static INSTANCE: OnceLock<Settings> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    if INSTANCE.get().is_some() {
        return Err(SettingsError::AlreadyInitialized);
    }
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub engine: EngineSettings,
    pub names: NameSettings,
    /// Parsed `engine.languages`.
    #[serde(skip)]
    default_languages: Vec<Language>,
}

impl Settings {
    pub fn default_languages(&self) -> &[Language] {
        &self.default_languages
    }

    pub fn default_convention(&self) -> NamingConvention {
        self.engine.convention
    }

    /// Particle list for a convention.
    pub fn prefixes(&self, convention: NamingConvention) -> &[String] {
        match convention {
            NamingConvention::Generic => &self.names.generic,
            NamingConvention::Ashkenazic => &self.names.ashkenazic,
            NamingConvention::Sephardic => &self.names.sephardic,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    pub convention: NamingConvention,
    pub languages: Vec<String>,
    pub concat: bool,
    pub max_codes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameSettings {
    pub generic: Vec<String>,
    pub ashkenazic: Vec<String>,
    pub sephardic: Vec<String>,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let mut s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    s.default_languages = parse_languages(&s.engine.languages)?;
    validate(&s)?;
    Ok(s)
}

fn parse_languages(raw: &[String]) -> Result<Vec<Language>, SettingsError> {
    if raw.is_empty() {
        return Err(SettingsError::InvalidValue {
            field: "engine.languages".to_string(),
            reason: "must name at least one language".to_string(),
        });
    }
    raw.iter()
        .map(|name| {
            name.parse::<Language>()
                .map_err(|e| SettingsError::InvalidValue {
                    field: "engine.languages".to_string(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_prefixes {
        ($field:ident) => {
            if let Some(bad) = s
                .names
                .$field
                .iter()
                .find(|p| p.trim().is_empty() || p.as_str() != p.trim().to_lowercase())
            {
                return Err(SettingsError::InvalidValue {
                    field: concat!("names.", stringify!($field)).to_string(),
                    reason: format!("prefix {bad:?} must be non-empty, trimmed and lowercase"),
                });
            }
        };
    }

    check_prefixes!(generic);
    check_prefixes!(ashkenazic);
    check_prefixes!(sephardic);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_custom_after_first_use_is_rejected() {
        let _ = settings();
        let err = init_custom(DEFAULT_SETTINGS_TOML.to_string()).unwrap_err();
        assert!(matches!(err, SettingsError::AlreadyInitialized));
    }

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.default_convention(), NamingConvention::Generic);
        assert_eq!(s.default_languages(), [Language::Any]);
        assert!(s.engine.concat);
        assert_eq!(s.engine.max_codes, 0);
        assert!(s.prefixes(NamingConvention::Generic).contains(&"de la".to_string()));
        assert!(s.prefixes(NamingConvention::Ashkenazic).contains(&"ben".to_string()));
        assert!(s.prefixes(NamingConvention::Sephardic).contains(&"al".to_string()));
    }

    #[test]
    fn parse_valid_custom_toml() {
        let toml = r#"
[engine]
convention = "sephardic"
languages = ["hebrew", "spanish"]
concat = false
max_codes = 10

[names]
generic = []
ashkenazic = ["ben"]
sephardic = ["al", "el"]
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert_eq!(s.default_convention(), NamingConvention::Sephardic);
        assert_eq!(s.default_languages(), [Language::Hebrew, Language::Spanish]);
        assert!(!s.engine.concat);
        assert_eq!(s.engine.max_codes, 10);
        assert!(s.prefixes(NamingConvention::Generic).is_empty());
    }

    fn with_engine(engine: &str) -> String {
        format!(
            "[engine]\n{engine}\n\n[names]\ngeneric = []\nashkenazic = []\nsephardic = []\n"
        )
    }

    #[test]
    fn error_unknown_language() {
        let toml = with_engine(
            "convention = \"generic\"\nlanguages = [\"klingon\"]\nconcat = true\nmax_codes = 0",
        );
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { ref field, .. } if field == "engine.languages"));
    }

    #[test]
    fn error_empty_languages() {
        let toml =
            with_engine("convention = \"generic\"\nlanguages = []\nconcat = true\nmax_codes = 0");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
    }

    #[test]
    fn error_unknown_convention() {
        let toml = with_engine(
            "convention = \"martian\"\nlanguages = [\"any\"]\nconcat = true\nmax_codes = 0",
        );
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_uppercase_prefix() {
        let toml = r#"
[engine]
convention = "generic"
languages = ["any"]
concat = true
max_codes = 0

[names]
generic = ["Van"]
ashkenazic = []
sephardic = []
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { ref field, .. } if field == "names.generic"));
    }

    #[test]
    fn error_missing_section() {
        let err = parse_settings_toml("[engine]\nconvention = \"generic\"\n").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn global_settings_use_defaults() {
        let s = settings();
        assert!(!s.default_languages().is_empty());
    }
}
