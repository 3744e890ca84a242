//! Benchmark aggregation and the Markdown report.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::PlantCareError;

use super::evaluation::{EvaluationNote, EvaluationRecord, Verdict};

/// Timestamp format embedded in report names, `YYYY-MM-DD_HH-MM-SS`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Local time formatted with [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub timestamp: String,
    pub evaluation_model: String,
    pub total_plants: usize,
    pub records: Vec<EvaluationRecord>,
}

impl BenchmarkReport {
    pub fn new(
        timestamp: impl Into<String>,
        evaluation_model: impl Into<String>,
        total_plants: usize,
        records: Vec<EvaluationRecord>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            evaluation_model: evaluation_model.into(),
            total_plants,
            records,
        }
    }

    pub fn passed(&self) -> usize {
        self.count(|v| v == Verdict::Pass)
    }

    pub fn failed(&self) -> usize {
        self.count(|v| v == Verdict::Fail)
    }

    /// Everything that is neither PASS nor FAIL.
    pub fn errors(&self) -> usize {
        self.count(|v| !matches!(v, Verdict::Pass | Verdict::Fail))
    }

    /// Percentage of all listed plants that passed; 0 for an empty list.
    pub fn pass_rate(&self) -> f64 {
        if self.total_plants == 0 {
            return 0.0;
        }
        self.passed() as f64 / self.total_plants as f64 * 100.0
    }

    fn count(&self, pred: impl Fn(Verdict) -> bool) -> usize {
        self.records.iter().filter(|r| pred(r.verdict)).count()
    }

    pub fn file_name(&self) -> String {
        format!("benchmark_results_{}.md", self.timestamp)
    }

    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "# Plant Care Benchmark Results\n\n\
             Timestamp: {}\n\n\
             Evaluation model: {}\n\n\
             {}\n\
             ## Detailed Results\n\n",
            self.timestamp,
            self.evaluation_model,
            self.summary_lines(),
        );

        for record in &self.records {
            let _ = writeln!(out, "### {}", record.plant);
            let _ = writeln!(out, "Result: {}", record.verdict);
            match &record.note {
                EvaluationNote::Explanation(text) => {
                    let _ = write!(out, "Explanation: {text}\n\n");
                }
                EvaluationNote::Reason(text) => {
                    let _ = write!(out, "Reason: {text}\n\n");
                }
            }
        }
        out
    }

    fn summary_lines(&self) -> String {
        format!(
            "Total plants tested: {}\nPassed: {} ({:.1}%)\nFailed: {}\nErrors: {}\n",
            self.total_plants,
            self.passed(),
            self.pass_rate(),
            self.failed(),
            self.errors(),
        )
    }

    /// Write the report into `dir` and return its path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, PlantCareError> {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
        let path = dir.join(self.file_name());
        fs::write(&path, self.render_markdown())?;
        Ok(path)
    }

    /// Console summary after the report has been written to `path`.
    pub fn print_summary(&self, path: &Path) {
        println!("\n\n{}", "=".repeat(50));
        println!("BENCHMARK SUMMARY ({})", self.timestamp);
        println!("{}", "=".repeat(50));
        println!("Evaluation model: {}", self.evaluation_model);
        print!("{}", self.summary_lines());
        println!("\nDetailed results written to {}", path.display());
    }
}
