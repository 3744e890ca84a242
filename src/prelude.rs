//! Convenience re-exports for common use.

pub use crate::availability::{ModelAvailability, ModelCatalog, ModelPuller};
pub use crate::benchmark::{BenchmarkReport, Verdict};
pub use crate::config::PlantCareConfig;
pub use crate::error::{PlantCareError, Result};
pub use crate::generation::{care_settings, generate_or_unknown, CareGenerator, LocalReadiness};
pub use crate::models::LanguageModel;
pub use crate::plant::{InstructionArtifact, PlantName};
pub use crate::provider::{create_provider, ModelProvider};
pub use crate::storage::InstructionStore;
pub use crate::types::{GenerationSettings, TextStreamDelta, Usage};
