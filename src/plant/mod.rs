//! Plant identity, filesystem keys, and instruction artifacts.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PlantCareError;

/// Content of the `.txt` file recorded for a plant the backend did not recognize.
pub const UNKNOWN_SENTINEL: &str = "None";

static DISALLOWED: OnceLock<Regex> = OnceLock::new();

fn disallowed() -> &'static Regex {
    DISALLOWED.get_or_init(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("static pattern"))
}

/// Lowercase `name` and replace every character outside `[A-Za-z0-9_-]` with `_`.
///
/// The mapping is many-to-one: `"Aloe Vera"` and `"aloe.vera"` share a key.
pub fn sanitize_filename(name: &str) -> String {
    disallowed()
        .replace_all(&name.to_lowercase(), "_")
        .into_owned()
}

/// User-supplied plant name. The only identity key for generated artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlantName(String);

impl PlantName {
    /// Wrap a plant name. Empty names are rejected; nothing is trimmed.
    pub fn new(name: impl Into<String>) -> Result<Self, PlantCareError> {
        let name = name.into();
        if name.is_empty() {
            return Err(PlantCareError::InvalidArgument(
                "Plant name is required".into(),
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn sanitized_key(&self) -> SanitizedKey {
        SanitizedKey(sanitize_filename(&self.0))
    }
}

impl fmt::Display for PlantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PlantName {
    type Error = PlantCareError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlantName> for String {
    fn from(value: PlantName) -> Self {
        value.0
    }
}

/// Filesystem key derived from a [`PlantName`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedKey(String);

impl SanitizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name for an artifact of the given kind.
    pub fn file_name(&self, artifact: ArtifactKind) -> String {
        format!("{}.{}", self.0, artifact.extension())
    }
}

impl fmt::Display for SanitizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which of the two on-disk shapes an artifact takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// `<key>.md` with a heading and the instructions body.
    Markdown,
    /// `<key>.txt` containing exactly [`UNKNOWN_SENTINEL`].
    Sentinel,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Sentinel => "txt",
        }
    }
}

/// Outcome of asking a backend about a plant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionArtifact {
    /// The backend produced care instructions (Markdown body).
    Known(String),
    /// The backend did not recognize the plant, or could not be asked.
    Unknown,
}

impl InstructionArtifact {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Known(_) => ArtifactKind::Markdown,
            Self::Unknown => ArtifactKind::Sentinel,
        }
    }

    pub fn file_extension(&self) -> &'static str {
        self.kind().extension()
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// File content persisted for this artifact.
    pub fn render(&self, plant: &PlantName) -> String {
        match self {
            Self::Known(body) => format!("# {plant} Care Instructions\n\n{body}"),
            Self::Unknown => UNKNOWN_SENTINEL.to_string(),
        }
    }
}
