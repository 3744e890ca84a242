//! Two-phase benchmark: generate missing artifacts, then grade all of them.

pub mod evaluation;
pub mod report;
pub mod runner;

pub use evaluation::{
    check_grading_model, classify_verdict, evaluate_all, EvaluationNote, EvaluationRecord,
    EvaluationStatus, Evaluator, Verdict,
};
pub use report::{timestamp_now, BenchmarkReport, TIMESTAMP_FORMAT};
pub use runner::{
    generate_all, GenerationRecord, GenerationRunner, GenerationStatus, InProcessRunner,
    SubprocessRunner,
};

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::error::PlantCareError;
use crate::generation::LocalReadiness;
use crate::plant::PlantName;
use crate::storage::InstructionStore;

/// Read a newline-delimited plant list. Lines are trimmed and blanks skipped.
pub fn read_plant_list(path: &Path) -> Result<Vec<PlantName>, PlantCareError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        PlantCareError::Configuration(format!(
            "cannot read plants file {}: {e}",
            path.display()
        ))
    })?;
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PlantName::new)
        .collect()
}

/// Everything one benchmark run needs.
pub struct BenchmarkRun<'a> {
    pub plants: &'a [PlantName],
    pub store: &'a InstructionStore,
    pub runner: &'a mut dyn GenerationRunner,
    pub evaluator: &'a Evaluator<'a>,
    /// Availability check for the grading model, run once before phase 2.
    pub grading_readiness: Option<LocalReadiness<'a>>,
    pub pause: Duration,
    pub report_dir: &'a Path,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct BenchmarkOutcome {
    pub generation: Vec<GenerationRecord>,
    pub report: BenchmarkReport,
    pub report_path: PathBuf,
}

impl BenchmarkRun<'_> {
    /// Run both phases and write the report. Per-plant failures never abort the run.
    pub async fn execute(self) -> Result<BenchmarkOutcome, PlantCareError> {
        let timestamp = timestamp_now();
        println!("Starting benchmark at {timestamp}");
        println!("Will use {} for evaluation", self.evaluator.model_id());
        info!(plants = self.plants.len(), "benchmark started");

        let generation = generate_all(self.plants, self.store, self.runner).await;

        if let Some(readiness) = self.grading_readiness {
            check_grading_model(readiness).await;
        }
        let records = evaluate_all(self.plants, self.store, self.evaluator, self.pause).await;

        let report = BenchmarkReport::new(
            timestamp,
            self.evaluator.model_id(),
            self.plants.len(),
            records,
        );
        let report_path = report.write_to(self.report_dir)?;
        report.print_summary(&report_path);
        info!(path = %report_path.display(), pass_rate = report.pass_rate(), "benchmark finished");

        Ok(BenchmarkOutcome {
            generation,
            report,
            report_path,
        })
    }
}
