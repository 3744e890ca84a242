//! Prompt templates for care generation and grading.

use crate::plant::PlantName;

/// Characters of instruction content forwarded to the grading model.
pub const DEFAULT_GRADING_CONTENT_CHARS: usize = 3500;

/// Stand-in response shown to the grader for plants recorded as unknown.
pub const UNKNOWN_PLANT_DESCRIPTION: &str = "The plant is unknown or doesn't exist.";

/// Build the care-instructions prompt for `plant`.
///
/// The name is interpolated as-is.
pub fn care_prompt(plant: &PlantName) -> String {
    format!(
        "Create comprehensive care instructions for the plant known as '{plant}'.

Please include:
- Common and scientific name(s)
- Watering requirements (frequency, amount)
- Light needs (direct sun, partial shade, etc.)
- Soil preferences
- Temperature and humidity requirements
- Fertilization schedule
- Propagation methods
- Common problems and solutions
- Any special care notes

Format the response as a markdown document with appropriate sections and headings.
If this is not a known plant, please indicate that clearly."
    )
}

/// What the grader is asked to judge.
#[derive(Debug, Clone, Copy)]
pub enum GradingSubject<'a> {
    /// Contents of a persisted instructions file.
    Instructions(&'a str),
    /// The plant was recorded as unknown.
    UnknownPlant,
}

/// Build the strict-evaluator prompt for `plant`.
///
/// Instruction content is cut to `max_chars` characters.
pub fn grading_prompt(plant: &PlantName, subject: GradingSubject<'_>, max_chars: usize) -> String {
    let (response, rubric) = match subject {
        GradingSubject::Instructions(content) => (
            truncate_chars(content, max_chars).to_string(),
            "Evaluate the response. If the instructions are correct and useful for caring for \
             this plant, respond with PASS. Otherwise, respond with FAIL.",
        ),
        GradingSubject::UnknownPlant => (
            format!("\"{UNKNOWN_PLANT_DESCRIPTION}\""),
            "Evaluate the response. If this plant truly doesn't exist or is extremely rare, \
             respond with PASS.\nIf this is a common plant that should have care instructions, \
             respond with FAIL.",
        ),
    };

    format!(
        "You are a strict evaluator of plant care instructions.

Your job is to judge whether the response provided for a given plant name is:
- Factually correct
- Clear and actionable
- Appropriate for the plant

You must return only one of two verdicts: PASS or FAIL.

---

Input:
{plant}

Response:
{response}

---

{rubric}

Only respond with PASS or FAIL, followed by a one-sentence reason."
    )
}

/// First `max_chars` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
