//! Command-line surfaces: `plant-care` and `plant-benchmark`.

pub mod benchmark;
pub mod care;

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::availability::{CommandPuller, ModelAvailability, ModelPuller};
use crate::config::PlantCareConfig;
use crate::error::PlantCareError;
use crate::generation::LocalReadiness;
use crate::models::ollama::OllamaModel;
use crate::models::LanguageModel;
use crate::provider::ollama::OllamaProvider;

/// Generate care instructions for one plant and store them.
#[derive(Parser, Debug)]
#[command(name = "plant-care", version, about = "Generate plant care instructions with an LLM")]
pub struct PlantCareArgs {
    /// Model to use (format: provider:model, e.g. groq:llama-3.1-8b-instant or ollama:tinyllama)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Directory for instruction files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the instructions instead of writing a file
    #[arg(short, long)]
    pub print: bool,

    /// Stream tokens as they arrive (with --print)
    #[arg(long, requires = "print")]
    pub stream: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Plant name (positional)
    pub plant_name: Option<String>,
}

/// Generate missing instructions for a plant list, then grade them all.
#[derive(Parser, Debug)]
#[command(name = "plant-benchmark", version, about = "Benchmark generated plant care instructions")]
pub struct BenchmarkArgs {
    /// Newline-delimited plant list
    #[arg(short, long)]
    pub plants: Option<PathBuf>,

    /// Directory for instruction files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Directory the report is written to
    #[arg(short, long)]
    pub report_dir: Option<PathBuf>,

    /// Grading model (format: provider:model, e.g. ollama:phi3:mini)
    #[arg(short, long)]
    pub evaluation_model: Option<String>,

    /// Generate by running this command once per plant instead of in-process
    #[arg(short, long)]
    pub generator_command: Option<PathBuf>,

    /// Pause after each grading call, in milliseconds
    #[arg(long)]
    pub pause_ms: Option<u64>,

    /// Config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_model(selector: &str) -> Result<LanguageModel, PlantCareError> {
    selector.parse().map_err(|_| {
        PlantCareError::InvalidArgument(format!(
            "Invalid model format: '{selector}'. Use provider:model like groq:llama-3.1-8b-instant"
        ))
    })
}

/// Catalog, puller and availability cache for a model on the local server.
pub(crate) struct LocalBackend {
    pub catalog: OllamaProvider,
    pub puller: Option<CommandPuller>,
    pub availability: ModelAvailability,
}

impl LocalBackend {
    /// `None` for hosted models.
    pub(crate) fn for_model(
        model: &LanguageModel,
        config: &PlantCareConfig,
        sentinel: Option<&Path>,
    ) -> Option<Self> {
        let LanguageModel::Ollama(ollama_model) = model else {
            return None;
        };
        let name = ollama_model.as_str();
        let availability = match sentinel {
            Some(path) => ModelAvailability::with_sentinel(name, path),
            None => ModelAvailability::new(name),
        };
        Some(Self {
            catalog: OllamaProvider::new(
                OllamaModel::Custom(name.to_string()),
                config.ollama_base_url(),
            )
            .with_timeout(config.request_timeout("ollama")),
            puller: config
                .ollama
                .auto_pull
                .then(|| CommandPuller::new(config.ollama.pull_program.clone())),
            availability,
        })
    }

    pub(crate) fn readiness(&mut self) -> LocalReadiness<'_> {
        LocalReadiness {
            availability: &mut self.availability,
            catalog: &self.catalog,
            puller: self.puller.as_ref().map(|p| p as &dyn ModelPuller),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_plant_care_with_defaults() {
        let args = PlantCareArgs::try_parse_from(["plant-care", "Aloe Vera"]).unwrap();
        assert_eq!(args.plant_name.as_deref(), Some("Aloe Vera"));
        assert!(args.model.is_none());
        assert!(args.output_dir.is_none());
        assert!(!args.print);
        assert!(!args.stream);
        assert!(!args.verbose);
    }

    #[test]
    fn parse_plant_care_without_name_leaves_it_to_the_binary() {
        let args = PlantCareArgs::try_parse_from(["plant-care"]).unwrap();
        assert!(args.plant_name.is_none());
    }

    #[test]
    fn parse_plant_care_with_all_options() {
        let args = PlantCareArgs::try_parse_from([
            "plant-care",
            "-m",
            "ollama:tinyllama",
            "--output-dir",
            "out",
            "--config",
            "plantcare.toml",
            "--print",
            "--stream",
            "-v",
            "Snake Plant",
        ])
        .unwrap();
        assert_eq!(args.model.as_deref(), Some("ollama:tinyllama"));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.config, Some(PathBuf::from("plantcare.toml")));
        assert!(args.print && args.stream && args.verbose);
        assert_eq!(args.plant_name.as_deref(), Some("Snake Plant"));
    }

    #[test]
    fn dash_leading_plant_name_after_separator() {
        let args = PlantCareArgs::try_parse_from(["plant-care", "--", "-Dracaena"]).unwrap();
        assert_eq!(args.plant_name.as_deref(), Some("-Dracaena"));
    }

    #[test]
    fn stream_requires_print() {
        assert!(PlantCareArgs::try_parse_from(["plant-care", "--stream", "Basil"]).is_err());
    }

    #[test]
    fn parse_benchmark_options() {
        let args = BenchmarkArgs::try_parse_from([
            "plant-benchmark",
            "--plants",
            "list.txt",
            "--evaluation-model",
            "ollama:phi3:mini",
            "--generator-command",
            "./plant-care",
            "--pause-ms",
            "0",
        ])
        .unwrap();
        assert_eq!(args.plants, Some(PathBuf::from("list.txt")));
        assert_eq!(args.evaluation_model.as_deref(), Some("ollama:phi3:mini"));
        assert_eq!(args.generator_command, Some(PathBuf::from("./plant-care")));
        assert_eq!(args.pause_ms, Some(0));
        assert!(args.report_dir.is_none());
    }

    #[test]
    fn benchmark_takes_no_positional() {
        assert!(BenchmarkArgs::try_parse_from(["plant-benchmark", "Basil"]).is_err());
    }

    #[test]
    fn model_parse_error_names_the_format() {
        let err = parse_model("llama").unwrap_err();
        assert!(err.to_string().contains("provider:model"));
    }

    #[test]
    fn local_backend_only_for_ollama_models() {
        let config = PlantCareConfig::new();
        let hosted = parse_model("groq:llama-3.1-8b-instant").unwrap();
        assert!(LocalBackend::for_model(&hosted, &config, None).is_none());

        let local = parse_model("ollama:tinyllama").unwrap();
        let backend = LocalBackend::for_model(&local, &config, None).unwrap();
        assert_eq!(backend.availability.model(), "tinyllama");
        assert!(backend.puller.is_some());
    }
}
