use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process;

use serde::{Deserialize, Serialize};
use tracing::debug;

use bmpm_core::language::NamingConvention;
use bmpm_core::settings::settings;
use bmpm_core::{Engine, EngineOptions, RuleRegistry};

use super::languages_or_default;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One output line per input word.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchRecord {
    pub word: String,
    pub codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unsupported: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub words: usize,
    pub codes: usize,
    pub errors: usize,
}

/// Encode every non-blank line of `input` and write JSONL to `output`.
pub fn run_batch(
    engine: &Engine<'_>,
    input: &Path,
    output: &Path,
    convention: NamingConvention,
    langs: &[String],
) -> Result<BatchSummary, BatchError> {
    let reader = BufReader::new(File::open(input)?);
    let mut words = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }

    let results = engine.encode_batch(&words, convention, langs);
    debug!(words = words.len(), "batch encoded");

    let mut writer = BufWriter::new(File::create(output)?);
    let mut summary = BatchSummary::default();
    for (word, result) in words.into_iter().zip(results) {
        summary.words += 1;
        let record = match result {
            Ok(encoding) => {
                summary.codes += encoding.codes.len();
                BatchRecord {
                    word,
                    unsupported: encoding
                        .unsupported
                        .iter()
                        .map(|u| u.language.clone())
                        .collect(),
                    codes: encoding.codes.into_vec(),
                    error: None,
                }
            }
            Err(e) => {
                summary.errors += 1;
                BatchRecord {
                    word,
                    codes: Vec::new(),
                    unsupported: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        };
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(summary)
}

pub fn batch_cmd(
    input: &str,
    output: &str,
    convention: Option<NamingConvention>,
    langs: &[String],
    no_concat: bool,
) {
    let convention = convention.unwrap_or_else(|| settings().default_convention());
    let langs = languages_or_default(langs);
    let mut options = EngineOptions::default();
    if no_concat {
        options.concat = false;
    }
    let engine = Engine::new(RuleRegistry::global(), options);

    let summary = die!(
        run_batch(&engine, Path::new(input), Path::new(output), convention, &langs),
        "Error: {}"
    );
    eprintln!(
        "{} words, {} codes, {} errors -> {output}",
        summary.words, summary.codes, summary.errors
    );
}
