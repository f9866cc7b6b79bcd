use std::fs;
use std::process;

use bmpm_core::language::NamingConvention;
use bmpm_core::{RuleRegistry, Stage};

pub fn rules_export(convention: NamingConvention) {
    print!("{}", bmpm_core::rules::default_toml(convention));
}

pub fn rules_validate(file: &str, convention: NamingConvention) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let registry = die!(
        RuleRegistry::builder()
            .convention_source(convention, content)
            .build(),
        "Error: {}"
    );
    let languages = registry.languages(convention);
    let rule_count: usize = languages
        .iter()
        .filter_map(|&lang| registry.table(lang, convention, Stage::Rules))
        .map(|t| t.len())
        .sum();
    println!(
        "OK: {} languages, {} rules-stage rules ({convention})",
        languages.len(),
        rule_count
    );
}

pub fn settings_export() {
    print!("{}", bmpm_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        bmpm_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: engine.convention={}, engine.languages={}, engine.concat={}, engine.max_codes={}",
        s.engine.convention,
        s.engine.languages.join(","),
        s.engine.concat,
        s.engine.max_codes
    );
}
