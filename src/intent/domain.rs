//! Intent labels and classification results.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// What a user turn is trying to accomplish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Describe or refine the project itself.
    Interview,
    /// Ask about existing tasks, documents or sprints.
    Query,
    /// Brainstorm and capture ideas.
    Idea,
    /// Write or revise documents.
    Document,
    /// Turn a document into engineering tasks.
    Compile,
    /// Organize work into sprints.
    Plan,
    /// Carry out a concrete change in the workspace.
    Execute,
    /// Review progress and risks.
    Analyze,
    /// The classifier could not decide.
    Unclear,
}

/// Error returned when an intent label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown intent: {0}")]
pub struct ParseIntentError(pub String);

impl Intent {
    /// Intent used when classification produces nothing usable and no
    /// workflow is active.
    pub const DEFAULT: Self = Self::Query;

    /// Every label, in the order presented to the classifier.
    pub const ALL: [Self; 9] = [
        Self::Interview,
        Self::Query,
        Self::Idea,
        Self::Document,
        Self::Compile,
        Self::Plan,
        Self::Execute,
        Self::Analyze,
        Self::Unclear,
    ];

    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interview => "interview",
            Self::Query => "query",
            Self::Idea => "idea",
            Self::Document => "document",
            Self::Compile => "compile",
            Self::Plan => "plan",
            Self::Execute => "execute",
            Self::Analyze => "analyze",
            Self::Unclear => "unclear",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Intent {
    type Error = ParseIntentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        let intent = match normalized.as_str() {
            "interview" | "onboarding" => Self::Interview,
            "query" | "question" => Self::Query,
            "idea" | "brainstorm" => Self::Idea,
            "document" | "documenting" | "doc" => Self::Document,
            "compile" | "compiling" => Self::Compile,
            "plan" | "planning" => Self::Plan,
            "execute" | "execution" => Self::Execute,
            "analyze" | "analyse" | "analysis" => Self::Analyze,
            "unclear" | "unknown" => Self::Unclear,
            _ => return Err(ParseIntentError(value.to_owned())),
        };
        Ok(intent)
    }
}

/// The classifier's verdict for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentClassification {
    /// Selected intent.
    pub intent: Intent,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Short justification from the model.
    pub reasoning: String,
}

impl IntentClassification {
    /// Creates a classification, clamping `confidence` into `[0, 1]`.
    #[must_use]
    pub fn new(intent: Intent, confidence: f64, reasoning: impl Into<String>) -> Self {
        let bounded = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            intent,
            confidence: bounded,
            reasoning: reasoning.into(),
        }
    }

    /// Classification used when the model output is unusable.
    #[must_use]
    pub fn fallback(intent: Intent, reason: impl Into<String>) -> Self {
        Self::new(intent, 0.0, reason)
    }
}
