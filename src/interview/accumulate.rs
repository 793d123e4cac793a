//! Constraint accumulation across interview steps.
//!
//! [`apply`] folds one answer into the session state and returns the updated
//! state. It never mutates its inputs and never fails: answers that don't
//! map to anything leave the state unchanged, so the caller can hold the one
//! authoritative copy per session without defensive cloning.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::QuestionId;
use super::normalize;

/// Structured preference state accumulated across interview steps.
///
/// An absent field means "no constraint in that dimension". Every value of
/// this type is fully valid — there is no partially constructed state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    /// Upper bound on page count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
    /// Inclusive lower bound on publication year. Violations are penalized
    /// by the rule scorer, never hard-excluded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pubyear: Option<i32>,
    /// Traits the reader weighs when choosing a book; empty means unset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_context_traits: Vec<String>,
    /// Preferred genres in selection order; the first entry is primary.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genre_candidates: Vec<String>,
    /// Exclusion tags matched against candidate descriptions.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclude_terms: BTreeSet<String>,
}

/// Per-session interview state: constraints plus the narrative.
///
/// The narrative is append-only — free-text answers are joined with a single
/// space and never truncated or restructured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewState {
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub narrative: String,
}

/// One answer, as delivered by the interview surface.
///
/// Which fields are meaningful depends on the question's kind; fields that
/// don't apply are simply ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Answer {
    /// Free-text answer body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_text: Option<String>,
    /// Single-choice selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice: Option<String>,
    /// Multi-choice selections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    /// Genre multi-choice selections, in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

impl Answer {
    /// A free-text answer.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            free_text: Some(body.into()),
            ..Self::default()
        }
    }

    /// A single-choice answer.
    pub fn choice(label: impl Into<String>) -> Self {
        Self {
            choice: Some(label.into()),
            ..Self::default()
        }
    }

    /// A multi-choice answer.
    pub fn choices(labels: &[&str]) -> Self {
        Self {
            choices: Some(labels.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    /// A genre-selection answer.
    pub fn genres(labels: &[&str]) -> Self {
        Self {
            genres: Some(labels.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }
}

/// Result of one accumulation step.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    /// The updated session state.
    pub state: InterviewState,
    /// Negative tags extracted by this step (only the exclusion question
    /// produces any).
    pub negatives: Vec<String>,
}

/// Fold one answer into the interview state.
///
/// `now_year` anchors the recency computation; production callers pass
/// `chrono::Utc::now().year()`. Dispatch by question id:
///
/// - free-text questions append to the narrative,
/// - the length choice sets `max_pages` only when it maps to a bucket,
/// - the recency selection sets `min_pubyear` or explicitly clears it
///   (무관 never leaves a stale cutoff behind),
/// - non-empty trait/genre selections replace the prior value, empty ones
///   leave it untouched,
/// - the exclusion question unions extracted tags into `exclude_terms`.
pub fn apply(state: &InterviewState, id: QuestionId, answer: &Answer, now_year: i32) -> ApplyOutcome {
    let mut next = state.clone();
    let mut negatives = Vec::new();

    match id {
        QuestionId::Squin | QuestionId::Keywords => {
            if let Some(text) = answer.free_text.as_deref() {
                append_narrative(&mut next.narrative, text);
            }
        }
        QuestionId::Length => {
            if let Some(pages) = answer
                .choice
                .as_deref()
                .and_then(normalize::max_pages_for_choice)
            {
                next.constraints.max_pages = Some(pages);
            }
        }
        QuestionId::Recency => {
            if let Some(choices) = answer.choices.as_deref() {
                next.constraints.min_pubyear =
                    normalize::min_pubyear_for_choices(choices, now_year);
            }
        }
        QuestionId::Context => {
            if let Some(choices) = answer.choices.as_deref() {
                if !choices.is_empty() {
                    next.constraints.preferred_context_traits = choices.to_vec();
                }
            }
        }
        QuestionId::Genre => {
            if let Some(genres) = answer.genres.as_deref() {
                if !genres.is_empty() {
                    next.constraints.genre_candidates = genres.to_vec();
                }
            }
        }
        QuestionId::Negative => {
            if let Some(text) = answer.free_text.as_deref() {
                negatives = normalize::extract_negatives(text);
                next.constraints
                    .exclude_terms
                    .extend(negatives.iter().cloned());
            }
        }
    }

    ApplyOutcome {
        state: next,
        negatives,
    }
}

/// [`apply`] over a wire-format question id.
///
/// Ids outside the fixed recognized set return the state unchanged — the
/// interview surface never fails on an unknown id.
pub fn apply_raw(state: &InterviewState, qid: &str, answer: &Answer, now_year: i32) -> ApplyOutcome {
    match QuestionId::from_wire(qid) {
        Some(id) => apply(state, id, answer, now_year),
        None => ApplyOutcome {
            state: state.clone(),
            negatives: Vec::new(),
        },
    }
}

fn append_narrative(narrative: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !narrative.is_empty() {
        narrative.push(' ');
    }
    narrative.push_str(text);
}
