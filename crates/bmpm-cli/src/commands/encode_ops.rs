use std::process;

use serde::Serialize;

use bmpm_core::explain::{explain_pipeline, format_explain, ExplainPipeline};
use bmpm_core::language::{Language, NamingConvention};
use bmpm_core::names::normalize;
use bmpm_core::settings::settings;
use bmpm_core::{Encoding, Engine, EngineOptions, RuleRegistry, StagePipeline};

use super::languages_or_default;

#[derive(Serialize)]
struct EncodeLine<'a> {
    word: &'a str,
    #[serde(flatten)]
    encoding: &'a Encoding,
}

pub fn encode_cmd(
    words: &[String],
    convention: Option<NamingConvention>,
    langs: &[String],
    no_concat: bool,
    json: bool,
) {
    let convention = convention.unwrap_or_else(|| settings().default_convention());
    let langs = languages_or_default(langs);
    let mut options = EngineOptions::default();
    if no_concat {
        options.concat = false;
    }
    let engine = Engine::new(RuleRegistry::global(), options);

    for word in words {
        let encoding = die!(engine.encode(word, convention, &langs), "Error: {}");
        for missing in &encoding.unsupported {
            eprintln!("warning: {missing}");
        }
        if json {
            let line = EncodeLine {
                word,
                encoding: &encoding,
            };
            println!("{}", die!(serde_json::to_string(&line), "Error: {}"));
        } else {
            println!("{word}\t{}", encoding.codes);
        }
    }
}

pub fn explain_cmd(word: &str, lang: &str, convention: Option<NamingConvention>, json: bool) {
    let convention = convention.unwrap_or_else(|| settings().default_convention());
    let language: Language = die!(lang.parse(), "Error: {}");
    let Some(pipeline) = StagePipeline::resolve(RuleRegistry::global(), language, convention)
    else {
        eprintln!("Error: {language} has no rules under the {convention} convention");
        process::exit(1);
    };

    let result = explain_pipeline(&normalize(word), &pipeline);
    if json {
        println!("{}", die!(serde_json::to_string_pretty(&result), "Error: {}"));
    } else {
        print!("{}", format_pipeline(&result));
    }
}

fn format_pipeline(result: &ExplainPipeline) -> String {
    let mut out = format!(
        "{} ({}, {}) -> {}\n",
        result.word, result.language, result.convention, result.output
    );
    for stage in &result.stages {
        out.push_str(&format!(
            "\n== {} [{}] {} rules, {} candidates\n",
            stage.stage,
            stage.table,
            stage.rule_count,
            stage.output.len()
        ));
        out.push_str(&format_explain(&stage.first));
    }
    out
}
