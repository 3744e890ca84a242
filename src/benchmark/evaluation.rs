//! Phase 2: grade every artifact with a local model.

use std::time::Duration;

use strum::Display;
use tracing::{debug, warn};

use crate::error::PlantCareError;
use crate::generation::LocalReadiness;
use crate::plant::PlantName;
use crate::prompt::{grading_prompt, GradingSubject};
use crate::provider::{ModelProvider, ProviderRequest};
use crate::storage::{InstructionStore, StoredArtifact, StoredContent};
use crate::types::GenerationSettings;

/// Grader classification of one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
    Unclear,
    Error,
}

/// How far into the grader's answer the fallback search looks.
const VERDICT_SEARCH_CHARS: usize = 50;

/// Classify grader output.
///
/// A case-insensitive `PASS`/`FAIL` prefix wins. Otherwise the first 50
/// characters are searched for the literal `PASS`, then `FAIL`.
pub fn classify_verdict(text: &str) -> Verdict {
    let upper = text.to_uppercase();
    if upper.starts_with("PASS") {
        return Verdict::Pass;
    }
    if upper.starts_with("FAIL") {
        return Verdict::Fail;
    }

    let head = crate::prompt::truncate_chars(text, VERDICT_SEARCH_CHARS);
    if head.contains("PASS") {
        Verdict::Pass
    } else if head.contains("FAIL") {
        Verdict::Fail
    } else {
        Verdict::Unclear
    }
}

/// Whether the grading step itself ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum EvaluationStatus {
    Ok,
    Error,
}

/// Text attached to an evaluation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationNote {
    /// Grader output, or the error text for an `ERROR` verdict.
    Explanation(String),
    /// Why no grading happened.
    Reason(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRecord {
    pub plant: PlantName,
    pub status: EvaluationStatus,
    pub verdict: Verdict,
    pub note: EvaluationNote,
}

/// Sends grading prompts to one model.
pub struct Evaluator<'a> {
    provider: &'a dyn ModelProvider,
    store: &'a InstructionStore,
    max_content_chars: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        provider: &'a dyn ModelProvider,
        store: &'a InstructionStore,
        max_content_chars: usize,
    ) -> Self {
        Self {
            provider,
            store,
            max_content_chars,
        }
    }

    pub fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    /// Grade one stored artifact. Every failure is folded into [`Verdict::Error`].
    pub async fn evaluate(&self, plant: &PlantName, stored: &StoredArtifact) -> (Verdict, String) {
        let content = match self.store.load(stored) {
            Ok(content) => content,
            Err(PlantCareError::UnexpectedContent { .. }) => {
                return (Verdict::Error, "Unexpected content in text file".into());
            }
            Err(e) => {
                println!("Error reading file {}: {e}", stored.path.display());
                return (Verdict::Error, "Could not read instruction file".into());
            }
        };

        let subject = match &content {
            StoredContent::Instructions(text) => GradingSubject::Instructions(text),
            StoredContent::UnknownPlant => GradingSubject::UnknownPlant,
        };
        let prompt = grading_prompt(plant, subject, self.max_content_chars);

        println!("Evaluating with {} model...", self.provider.model_id());
        let request = ProviderRequest::new(prompt, GenerationSettings::default());
        match self.provider.generate_text(&request).await {
            Ok(response) => {
                let evaluation = response.text.trim().to_string();
                debug!(plant = %plant, %evaluation, "grader answered");
                (classify_verdict(&evaluation), evaluation)
            }
            Err(e) => {
                warn!(plant = %plant, error = %e, "grading failed");
                (Verdict::Error, describe_grading_error(&e))
            }
        }
    }
}

fn describe_grading_error(error: &PlantCareError) -> String {
    match error.status() {
        Some(status) => format!("API request failed with status code {status}"),
        None => format!("Error evaluating instructions: {error}"),
    }
}

/// Check once that the grading model is loaded. Problems are reported, never fatal.
pub async fn check_grading_model(readiness: LocalReadiness<'_>) {
    let model = readiness.availability.model().to_string();
    match readiness
        .availability
        .ensure(readiness.catalog, readiness.puller)
        .await
    {
        Ok(true) => println!("{model} is available and will be used for evaluation"),
        Ok(false) => println!("Cannot proceed without {model} model. Benchmark will fail."),
        Err(e) => println!("Error checking model availability: {e}"),
    }
}

/// Grade every plant in order, pausing after each grading call.
pub async fn evaluate_all(
    plants: &[PlantName],
    store: &InstructionStore,
    evaluator: &Evaluator<'_>,
    pause: Duration,
) -> Vec<EvaluationRecord> {
    println!("\n{}", "=".repeat(50));
    println!("PHASE 2: EVALUATING INSTRUCTIONS");
    println!("{}", "=".repeat(50));
    println!("Using model {} for all evaluations", evaluator.model_id());

    let mut records = Vec::with_capacity(plants.len());
    for plant in plants {
        println!("\nEvaluating: {plant}");

        let Some(stored) = store.locate(plant) else {
            println!("No instructions found for '{plant}', skipping evaluation");
            records.push(EvaluationRecord {
                plant: plant.clone(),
                status: EvaluationStatus::Error,
                verdict: Verdict::Fail,
                note: EvaluationNote::Reason("No instructions found".into()),
            });
            continue;
        };

        let (verdict, explanation) = evaluator.evaluate(plant, &stored).await;
        println!("Evaluation result: {verdict}");
        records.push(EvaluationRecord {
            plant: plant.clone(),
            status: EvaluationStatus::Ok,
            verdict,
            note: EvaluationNote::Explanation(explanation),
        });

        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }
    records
}
