//! Local model availability: list, remediate by pulling, cache the answer.
//!
//! A [`ModelAvailability`] is an explicit value owned by the caller and passed
//! into every check. With a sentinel path configured the confirmation also
//! survives across processes: the file's existence means "confirmed".

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::PlantCareError;

/// Lists the models an inference server currently has loaded.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    async fn list_models(&self) -> Result<Vec<String>, PlantCareError>;
}

/// Makes a missing model available, typically by downloading it.
#[async_trait]
pub trait ModelPuller: Send + Sync {
    async fn pull(&self, model: &str) -> Result<(), PlantCareError>;
}

/// Pulls models by running `<program> pull <model>`.
#[derive(Debug, Clone)]
pub struct CommandPuller {
    program: String,
}

impl CommandPuller {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CommandPuller {
    fn default() -> Self {
        Self::new("ollama")
    }
}

#[async_trait]
impl ModelPuller for CommandPuller {
    async fn pull(&self, model: &str) -> Result<(), PlantCareError> {
        println!("Running: {} pull {model}", self.program);
        let status = tokio::process::Command::new(&self.program)
            .arg("pull")
            .arg(model)
            .status()
            .await
            .map_err(|e| PlantCareError::Subprocess {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(PlantCareError::Subprocess {
                program: self.program.clone(),
                message: format!("pull {model} exited with {status}"),
            })
        }
    }
}

/// Whether an `/api/tags` entry names `wanted`.
///
/// Untagged pulls are listed as `<name>:latest`.
pub fn listed_name_matches(wanted: &str, listed: &str) -> bool {
    listed == wanted || (!wanted.contains(':') && listed == format!("{wanted}:latest"))
}

/// Cached answer to "is this model loaded on the inference server?".
#[derive(Debug, Clone)]
pub struct ModelAvailability {
    model: String,
    confirmed: bool,
    sentinel: Option<PathBuf>,
}

impl ModelAvailability {
    /// In-process cache only; starts unconfirmed.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            confirmed: false,
            sentinel: None,
        }
    }

    /// Cache backed by a sentinel file; an existing file counts as confirmed.
    pub fn with_sentinel(model: impl Into<String>, sentinel: impl Into<PathBuf>) -> Self {
        let sentinel = sentinel.into();
        Self {
            model: model.into(),
            confirmed: sentinel.exists(),
            sentinel: Some(sentinel),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn sentinel(&self) -> Option<&Path> {
        self.sentinel.as_deref()
    }

    /// Make sure the model is loaded, listing models only when not already confirmed.
    ///
    /// Returns `Ok(false)` when the model is missing and could not be pulled.
    /// A failed listing invalidates the cache and is returned as an error.
    pub async fn ensure(
        &mut self,
        catalog: &dyn ModelCatalog,
        puller: Option<&dyn ModelPuller>,
    ) -> Result<bool, PlantCareError> {
        if self.confirmed {
            debug!(model = %self.model, "model availability already confirmed");
            return Ok(true);
        }

        println!("Checking if {} is available...", self.model);
        let listed = match catalog.list_models().await {
            Ok(listed) => listed,
            Err(e) => {
                self.invalidate();
                return Err(e);
            }
        };
        println!("Available models: {}", listed.join(", "));

        if listed.iter().any(|name| listed_name_matches(&self.model, name)) {
            info!(model = %self.model, "model is available");
            self.confirm()?;
            return Ok(true);
        }

        let Some(puller) = puller else {
            warn!(model = %self.model, "model not loaded and pulling is disabled");
            return Ok(false);
        };

        println!("{} not found. Attempting to pull it...", self.model);
        match puller.pull(&self.model).await {
            Ok(()) => {
                println!("Successfully pulled {} model", self.model);
                self.confirm()?;
                Ok(true)
            }
            Err(e) => {
                println!("Error pulling {} model: {e}", self.model);
                Ok(false)
            }
        }
    }

    /// Record the model as available, writing the sentinel when configured.
    pub fn confirm(&mut self) -> Result<(), PlantCareError> {
        self.confirmed = true;
        if let Some(path) = &self.sentinel {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, &self.model)?;
        }
        Ok(())
    }

    /// Forget the cached answer so the next check lists models again.
    pub fn invalidate(&mut self) {
        self.confirmed = false;
        if let Some(path) = &self.sentinel {
            match fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "removed availability sentinel"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "could not remove availability sentinel"
                ),
            }
        }
    }
}
