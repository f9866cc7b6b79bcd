//! Step-by-step diagnostics for rewrites and pipelines.

use serde::Serialize;

use crate::candidates::PhoneticCandidateSet;
use crate::language::Stage;
use crate::pipeline::{run_stage, StagePipeline};
use crate::rewriter::rewrite_observed;
use crate::rules::RuleTable;

/// Full diagnostic result for one rewrite.
#[derive(Debug, Serialize)]
pub struct ExplainResult {
    pub table: String,
    pub word: String,
    pub steps: Vec<ExplainStep>,
    pub output: PhoneticCandidateSet,
}

/// One cursor step.
#[derive(Debug, Serialize)]
pub struct ExplainStep {
    pub position: usize,
    pub consumed: usize,
    /// Text consumed at `position`.
    pub matched: String,
    /// Table index of the applied rule; `None` means identity fallback.
    pub rule_index: Option<usize>,
    pub left_context: String,
    pub right_context: String,
    pub replacement: String,
    pub frontier_len: usize,
}

/// One stage of a pipeline explanation.
#[derive(Debug, Serialize)]
pub struct ExplainStage {
    pub stage: Stage,
    pub table: String,
    pub rule_count: usize,
    /// Rewrite of the first input string of this stage.
    pub first: ExplainResult,
    /// Union over all inputs of this stage.
    pub output: PhoneticCandidateSet,
}

#[derive(Debug, Serialize)]
pub struct ExplainPipeline {
    pub word: String,
    pub language: String,
    pub convention: String,
    pub stages: Vec<ExplainStage>,
    pub output: PhoneticCandidateSet,
}

/// Rewrite `word` under `table`, recording every step.
pub fn explain(word: &str, table: &RuleTable) -> ExplainResult {
    let chars: Vec<char> = word.chars().collect();
    let mut steps = Vec::new();
    let output = rewrite_observed(word, table, |step| {
        let matched: String = chars[step.position..step.position + step.consumed]
            .iter()
            .collect();
        let (rule_index, left, right, replacement) = match step.rule {
            Some((idx, rule)) => (
                Some(idx),
                rule.left().source().to_string(),
                rule.right().source().to_string(),
                rule.replacement_text().to_string(),
            ),
            None => (None, String::new(), String::new(), matched.clone()),
        };
        steps.push(ExplainStep {
            position: step.position,
            consumed: step.consumed,
            matched,
            rule_index,
            left_context: left,
            right_context: right,
            replacement,
            frontier_len: step.frontier_len,
        });
    });

    ExplainResult {
        table: table.name().to_string(),
        word: word.to_string(),
        steps,
        output,
    }
}

/// Run `pipeline` on `word`, explaining the first input of every stage.
pub fn explain_pipeline(word: &str, pipeline: &StagePipeline) -> ExplainPipeline {
    let mut current = PhoneticCandidateSet::singleton(word);
    let mut stages = Vec::with_capacity(pipeline.stages().len());
    for (stage, table) in pipeline.stages() {
        let first_input = current.iter().next().unwrap_or_default().to_string();
        let first = explain(&first_input, table);
        current = run_stage(&current, table);
        stages.push(ExplainStage {
            stage: *stage,
            table: table.name().to_string(),
            rule_count: table.len(),
            first,
            output: current.clone(),
        });
    }

    ExplainPipeline {
        word: word.to_string(),
        language: pipeline.language().to_string(),
        convention: pipeline.convention().to_string(),
        stages,
        output: current,
    }
}

/// Render an explanation as indented text.
pub fn format_explain(result: &ExplainResult) -> String {
    let mut out = format!("{} [{}] -> {}\n", result.word, result.table, result.output);
    for step in &result.steps {
        let rule = match step.rule_index {
            Some(idx) => format!(
                "#{idx} {:?} {:?} {:?} -> {:?}",
                step.matched, step.left_context, step.right_context, step.replacement
            ),
            None => format!("identity {:?}", step.matched),
        };
        out.push_str(&format!(
            "  @{:<3} +{} {}  (frontier {})\n",
            step.position, step.consumed, rule, step.frontier_len
        ));
    }
    out
}
