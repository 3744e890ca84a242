//! Unknown-plant detection by substring heuristic.

use crate::plant::InstructionArtifact;

/// Phrases a backend uses when it does not recognize the plant.
///
/// Matching is a plain case-insensitive substring test, so genuine instructions
/// that happen to contain one of these phrases are classified as unknown too.
pub const UNKNOWN_PLANT_PATTERNS: [&str; 6] = [
    "not a known plant",
    "don't recognize this plant",
    "couldn't find information",
    "not a recognized plant",
    "unable to identify",
    "not a valid plant",
];

/// Whether `text` contains any unknown-plant phrase.
pub fn signals_unknown_plant(text: &str) -> bool {
    let lowered = text.to_lowercase();
    UNKNOWN_PLANT_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

/// Turn raw backend text into an artifact.
pub fn classify_response(text: &str) -> InstructionArtifact {
    if signals_unknown_plant(text) {
        InstructionArtifact::Unknown
    } else {
        InstructionArtifact::Known(text.to_string())
    }
}
