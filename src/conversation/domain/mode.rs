//! Engine modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The engine's current state, which decides which workflow continues an
/// ambiguous turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// No workflow has run yet.
    #[default]
    Idle,
    /// Gathering the project manifest.
    Interview,
    /// Organizing sprints.
    Planning,
    /// Answering questions about the workspace.
    Query,
    /// Capturing ideas.
    Idea,
    /// Writing documents.
    Documenting,
    /// Compiling documents into tasks.
    Compiling,
    /// Carrying out general requests.
    Executing,
    /// Reviewing progress.
    Analyzing,
}

impl Mode {
    /// Returns the upper-case label used in prompts and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Interview => "INTERVIEW",
            Self::Planning => "PLANNING",
            Self::Query => "QUERY",
            Self::Idea => "IDEA",
            Self::Documenting => "DOCUMENTING",
            Self::Compiling => "COMPILING",
            Self::Executing => "EXECUTING",
            Self::Analyzing => "ANALYZING",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
