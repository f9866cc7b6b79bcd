use std::path::PathBuf;

use clap::{Parser, Subcommand};

use bmpm_cli::commands::{batch_ops, config_ops, encode_ops, init_globals};
use bmpm_cli::trace_init::init_tracing;
use bmpm_core::language::NamingConvention;

#[derive(Parser)]
#[command(name = "bmpm", about = "Beider-Morse phonetic encoding tool")]
struct Cli {
    /// Custom settings TOML (default: embedded settings)
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Custom rule TOML replacing one convention's embedded rules
    #[arg(long, global = true)]
    rules: Option<String>,
    /// Convention the --rules file replaces
    #[arg(long, global = true, default_value = "generic")]
    rules_convention: NamingConvention,
    /// Write JSON trace events to this directory (requires the `trace` feature)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode one or more names
    Encode {
        /// Names to encode
        #[arg(required = true)]
        words: Vec<String>,
        /// Naming convention (generic, ashkenazic, sephardic)
        #[arg(short, long)]
        convention: Option<NamingConvention>,
        /// Language hint; repeatable (default: engine.languages)
        #[arg(short, long = "lang")]
        langs: Vec<String>,
        /// Encode each word of a multi-word name separately
        #[arg(long)]
        no_concat: bool,
        /// Output one JSON object per name
        #[arg(long)]
        json: bool,
    },

    /// Show every rewrite step of one language pipeline
    Explain {
        /// Name to explain
        word: String,
        /// Language whose pipeline is explained
        #[arg(short, long)]
        lang: String,
        /// Naming convention (generic, ashkenazic, sephardic)
        #[arg(short, long)]
        convention: Option<NamingConvention>,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Encode names from a file (one per line) into JSONL
    Batch {
        /// Path to the input file
        input: String,
        /// Path to the output JSONL file
        output: String,
        /// Naming convention (generic, ashkenazic, sephardic)
        #[arg(short, long)]
        convention: Option<NamingConvention>,
        /// Language hint; repeatable (default: engine.languages)
        #[arg(short, long = "lang")]
        langs: Vec<String>,
        /// Encode each word of a multi-word name separately
        #[arg(long)]
        no_concat: bool,
    },

    /// Print the embedded rule TOML of a convention
    RulesExport {
        #[arg(short, long, default_value = "generic")]
        convention: NamingConvention,
    },

    /// Validate a rule TOML file for a convention
    RulesValidate {
        /// Path to the rule TOML file
        file: String,
        #[arg(short, long, default_value = "generic")]
        convention: NamingConvention,
    },

    /// Print the embedded default settings TOML
    SettingsExport,

    /// Validate a settings TOML file
    SettingsValidate {
        /// Path to the settings TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.as_deref());
    init_globals(
        cli.settings.as_deref(),
        cli.rules.as_deref(),
        cli.rules_convention,
    );

    match cli.command {
        Command::Encode {
            words,
            convention,
            langs,
            no_concat,
            json,
        } => encode_ops::encode_cmd(&words, convention, &langs, no_concat, json),
        Command::Explain {
            word,
            lang,
            convention,
            json,
        } => encode_ops::explain_cmd(&word, &lang, convention, json),
        Command::Batch {
            input,
            output,
            convention,
            langs,
            no_concat,
        } => batch_ops::batch_cmd(&input, &output, convention, &langs, no_concat),
        Command::RulesExport { convention } => config_ops::rules_export(convention),
        Command::RulesValidate { file, convention } => {
            config_ops::rules_validate(&file, convention)
        }
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
