fn main() {
    // Validate embedded TOML files at compile time.
    validate_toml(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
    );
    validate_toml("src/rules/data/gen.toml", include_str!("src/rules/data/gen.toml"));
    validate_toml("src/rules/data/ash.toml", include_str!("src/rules/data/ash.toml"));
    validate_toml("src/rules/data/sep.toml", include_str!("src/rules/data/sep.toml"));
}

fn validate_toml(path: &str, content: &str) {
    if toml::from_str::<toml::Table>(content).is_err() {
        panic!("{path} contains invalid TOML");
    }
}
