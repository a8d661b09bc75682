//! Assembly-line stations (§4.5): each station owns a predicate over error
//! categories; `applicable_stations` walks the canonical, fixed order and
//! keeps only stations with at least one matching error.

use style_core::model::error::{Error, RuleCategory};
use style_core::model::rewrite::Delta;

use super::transform::{enforce_length_ratio, Constraints, TextTransform, TransformError};

/// One assembly-line station (§4.5). `predicate` decides which errors this
/// station addresses; `instruction` is the station-specific payload handed
/// to the text-transformation capability.
pub struct Station {
    pub id: &'static str,
    pub name: &'static str,
    predicate: fn(&RuleCategory) -> bool,
    instruction: &'static str,
}

impl Station {
    fn matches(&self, errors: &[Error]) -> bool {
        errors.iter().any(|e| (self.predicate)(&e.category))
    }

    /// Number of `errors` this station's predicate addresses.
    pub fn count_matching(&self, errors: &[Error]) -> usize {
        errors.iter().filter(|e| (self.predicate)(&e.category)).count()
    }

    /// Runs this station's transform over `text`, restricted to the errors
    /// it addresses, and enforces the shared length-ratio constraint.
    pub fn run(
        &self,
        text: &str,
        errors: &[Error],
        transform: &dyn TextTransform,
        constraints: &Constraints,
    ) -> Result<(String, Vec<Delta>), TransformError> {
        let matching: Vec<&Error> = errors.iter().filter(|e| (self.predicate)(&e.category)).collect();
        let instruction = format!(
            "{} ({} issue(s): {})",
            self.instruction,
            matching.len(),
            matching
                .iter()
                .map(|e| e.rule_id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let output = transform.transform(&instruction, text, constraints)?;
        enforce_length_ratio(text, &output.text, constraints)?;
        Ok((output.text, output.deltas))
    }
}

fn is_urgent_grammar(category: &RuleCategory) -> bool {
    matches!(category, RuleCategory::Grammar | RuleCategory::Punctuation)
}

fn is_clarity(category: &RuleCategory) -> bool {
    matches!(category, RuleCategory::WordUsage | RuleCategory::Pronouns)
}

fn is_structure(category: &RuleCategory) -> bool {
    matches!(category, RuleCategory::Structure | RuleCategory::References)
}

fn is_tone(category: &RuleCategory) -> bool {
    matches!(category, RuleCategory::Tone | RuleCategory::Claims)
}

fn is_final_polish(category: &RuleCategory) -> bool {
    matches!(category, RuleCategory::Commands) || matches!(category, RuleCategory::Other(_))
}

/// The canonical, fixed station order (§4.5). Implementations may extend
/// this list, but existing ids and their relative order never change.
pub fn canonical_stations() -> Vec<Station> {
    vec![
        Station {
            id: "urgent_grammar",
            name: "Urgent Grammar",
            predicate: is_urgent_grammar,
            instruction: "fix grammar and punctuation errors without changing meaning",
        },
        Station {
            id: "clarity",
            name: "Clarity",
            predicate: is_clarity,
            instruction: "replace ambiguous word choices and pronoun references with clearer ones",
        },
        Station {
            id: "structure",
            name: "Structure",
            predicate: is_structure,
            instruction: "fix structural and reference issues (links, versions, product names)",
        },
        Station {
            id: "tone",
            name: "Tone",
            predicate: is_tone,
            instruction: "adjust tone and soften unsupported claims",
        },
        Station {
            id: "final_polish",
            name: "Final Polish",
            predicate: is_final_polish,
            instruction: "apply a final polish pass for remaining issues",
        },
    ]
}

/// `applicable_stations(block_errors) -> ordered list` (§4.5): filters the
/// canonical order down to stations with at least one matching error,
/// capped by `max_stations` (Open Question decision #4).
pub fn applicable_stations(errors: &[Error], max_stations: usize) -> Vec<Station> {
    canonical_stations()
        .into_iter()
        .filter(|station| station.matches(errors))
        .take(max_stations)
        .collect()
}
