
use super::*;
use crate::settings::{parse_settings_toml, DEFAULT_SETTINGS_TOML};

pub(super) fn default_options() -> EngineOptions {
    let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
    EngineOptions::from_settings(&s)
}

pub(super) fn engine() -> Engine<'static> {
    Engine::new(RuleRegistry::global(), default_options())
}
