//! Configuration system (layered: CLI > env > config file > defaults).

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PlantCareError;

/// File name looked up in the working directory and the platform config dir.
pub const CONFIG_FILE_NAME: &str = "plantcare.toml";

/// Default generation model.
pub const DEFAULT_MODEL: &str = "groq:llama-3.1-8b-instant";

/// Default grading model for the benchmark.
pub const DEFAULT_EVALUATION_MODEL: &str = "ollama:phi3:mini";

/// Layered configuration for plant-care.
///
/// Credentials are only ever taken from the environment, never from the file.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantCareConfig {
    /// Directory holding one artifact per plant.
    pub output_dir: PathBuf,
    /// Newline-delimited plant list read by the benchmark.
    pub plants_file: PathBuf,
    /// Directory the benchmark report is written to.
    pub report_dir: PathBuf,
    /// Generation model, `provider:model_id`.
    pub model: String,
    /// Grading model, `provider:model_id`.
    pub evaluation_model: String,
    pub groq: GroqSettings,
    pub ollama: OllamaSettings,
    pub evaluation: EvaluationSettings,
    #[serde(skip)]
    api_keys: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroqSettings {
    pub base_url: Option<String>,
    /// Per-request limit in seconds; unset means no limit.
    pub request_timeout_secs: Option<u64>,
}

impl Default for GroqSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_secs: Some(120),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    pub base_url: Option<String>,
    /// Pull a missing model before giving up on it.
    pub auto_pull: bool,
    /// Program invoked as `<pull_program> pull <model>`.
    pub pull_program: String,
    /// File recording that the generation model was confirmed loaded.
    pub availability_sentinel: Option<PathBuf>,
    /// Per-request limit in seconds. Unset by default: local models on CPU
    /// can take minutes per answer.
    pub request_timeout_secs: Option<u64>,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            auto_pull: true,
            pull_program: "ollama".to_string(),
            availability_sentinel: None,
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Pause after each grading call.
    pub pause_ms: u64,
    /// Characters of instruction content sent to the grader.
    pub max_content_chars: usize,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            pause_ms: 1000,
            max_content_chars: crate::prompt::DEFAULT_GRADING_CONTENT_CHARS,
        }
    }
}

impl fmt::Debug for PlantCareConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlantCareConfig")
            .field("output_dir", &self.output_dir)
            .field("plants_file", &self.plants_file)
            .field("report_dir", &self.report_dir)
            .field("model", &self.model)
            .field("evaluation_model", &self.evaluation_model)
            .field("groq", &self.groq)
            .field("ollama", &self.ollama)
            .field("evaluation", &self.evaluation)
            .field("api_keys", &self.api_keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for PlantCareConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("plant_instructions"),
            plants_file: PathBuf::from("plants.txt"),
            report_dir: PathBuf::from("."),
            model: DEFAULT_MODEL.to_string(),
            evaluation_model: DEFAULT_EVALUATION_MODEL.to_string(),
            groq: GroqSettings::default(),
            ollama: OllamaSettings::default(),
            evaluation: EvaluationSettings::default(),
            api_keys: HashMap::new(),
        }
    }
}

impl PlantCareConfig {
    /// Defaults only, no file and no environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, PlantCareError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PlantCareError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, PlantCareError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load file (explicit path or discovered) and then apply the environment.
    ///
    /// An explicit path must exist; discovered locations are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, PlantCareError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let file = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => discover_config_file(),
        };

        let mut config = match file {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                Self::from_file(&path)?
            }
            None => Self::new(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Overlay environment variables (GROQ_API_KEY, GROQ_BASE_URL, OLLAMA_BASE_URL).
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            if !key.is_empty() {
                self.set_api_key("groq", key);
            }
        }

        let url_mappings = [("GROQ_BASE_URL", "groq"), ("OLLAMA_BASE_URL", "ollama")];
        for (env_var, provider) in &url_mappings {
            if let Ok(url) = std::env::var(env_var) {
                self.set_base_url(provider, url);
            }
        }
    }

    pub fn set_api_key(&mut self, provider: &str, key: String) {
        self.api_keys.insert(provider.to_string(), key);
    }

    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        self.api_keys.get(provider).cloned()
    }

    pub fn has_credentials(&self, provider: &str) -> bool {
        self.api_keys.contains_key(provider)
    }

    pub fn set_base_url(&mut self, provider: &str, url: String) {
        match provider {
            "groq" => self.groq.base_url = Some(url),
            "ollama" => self.ollama.base_url = Some(url),
            _ => {}
        }
    }

    pub fn get_base_url(&self, provider: &str) -> Option<String> {
        match provider {
            "groq" => self.groq.base_url.clone(),
            "ollama" => self.ollama.base_url.clone(),
            _ => None,
        }
    }

    /// Per-request timeout for `provider`, if one is configured.
    pub fn request_timeout(&self, provider: &str) -> Option<Duration> {
        let secs = match provider {
            "groq" => self.groq.request_timeout_secs,
            "ollama" => self.ollama.request_timeout_secs,
            _ => None,
        };
        secs.map(Duration::from_secs)
    }

    /// Ollama base URL, falling back to the default local port.
    pub fn ollama_base_url(&self) -> String {
        self.ollama
            .base_url
            .clone()
            .unwrap_or_else(|| "http://localhost:11434".to_string())
    }
}

fn discover_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    directories::ProjectDirs::from("", "", "plantcare")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}
