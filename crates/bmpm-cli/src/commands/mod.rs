use std::fs;
use std::process;

use bmpm_core::language::NamingConvention;
use bmpm_core::RuleRegistry;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub mod batch_ops;
pub mod config_ops;
pub mod encode_ops;

/// Install custom settings and rules before anything touches the globals.
pub fn init_globals(
    settings_file: Option<&str>,
    rules_file: Option<&str>,
    rules_convention: NamingConvention,
) {
    if let Some(file) = settings_file {
        let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
        die!(bmpm_core::settings::init_custom(content), "Error in {file}: {}");
    }
    if let Some(file) = rules_file {
        let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
        die!(
            RuleRegistry::init_custom(vec![(rules_convention, content)]),
            "Error in {file}: {}"
        );
    }
}

/// Requested languages, or the configured defaults when none were given.
pub(crate) fn languages_or_default(langs: &[String]) -> Vec<String> {
    if langs.is_empty() {
        bmpm_core::settings::settings().engine.languages.clone()
    } else {
        langs.to_vec()
    }
}
