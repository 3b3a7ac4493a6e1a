//! Manifest state management: merging interview facts, tracking which
//! required fields are still missing, and condensing the manifest for prompts.

use crate::manifest::domain::{ManifestField, ManifestUpdate, ProjectManifest, REQUIRED_FIELDS};

const SUMMARY_MISSION_CHARS: usize = 160;

/// Outcome of applying one interview turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterviewProgress {
    /// Fields that left the missing set during this turn.
    pub newly_completed: Vec<ManifestField>,
    /// Completeness score after the turn.
    pub completeness_score: u8,
}

/// Maintains a [`ProjectManifest`] and its missing-field set.
///
/// The missing set only ever shrinks within a session. A field leaves it when
/// the model judges the field complete *and* the field holds information;
/// nothing puts a field back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestStateManager;

impl ManifestStateManager {
    /// Creates a manager.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the required fields that are structurally empty, in prompt
    /// order, and refreshes the manifest's completeness score to match.
    pub fn assess(self, manifest: &mut ProjectManifest) -> Vec<ManifestField> {
        let missing: Vec<ManifestField> = REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| manifest.is_field_empty(*field))
            .collect();
        manifest.set_missing_count(missing.len());
        missing
    }

    /// Merges an interview update and applies the model's completion
    /// judgements.
    pub fn apply_interview(
        self,
        manifest: &mut ProjectManifest,
        missing: &mut Vec<ManifestField>,
        update: &ManifestUpdate,
        judged_complete: &[ManifestField],
    ) -> InterviewProgress {
        update.apply_to(manifest);

        let mut newly_completed = Vec::new();
        missing.retain(|field| {
            let complete = judged_complete.contains(field) && !manifest.is_field_empty(*field);
            if complete {
                newly_completed.push(*field);
            }
            !complete
        });
        manifest.set_missing_count(missing.len());

        InterviewProgress {
            newly_completed,
            completeness_score: manifest.completeness_score(),
        }
    }

    /// Renders the condensed one-paragraph summary stored in workflow state.
    #[must_use]
    pub fn summary(self, manifest: &ProjectManifest, missing: &[ManifestField]) -> String {
        let name = if manifest.name.trim().is_empty() {
            "Unnamed project"
        } else {
            manifest.name.trim()
        };
        let mut parts = vec![name.to_owned()];
        if let Some(phase) = manifest.phase {
            parts.push(format!("phase: {phase}"));
        }
        if !manifest.mission.trim().is_empty() {
            parts.push(format!(
                "mission: {}",
                truncate_chars(manifest.mission.trim(), SUMMARY_MISSION_CHARS)
            ));
        }
        if !manifest.target_users.is_empty() {
            parts.push(format!("users: {}", manifest.target_users.join(", ")));
        }
        if !manifest.tech_stack.is_empty() {
            parts.push(format!("stack: {}", manifest.tech_stack.join(", ")));
        }
        parts.push(format!("{}% complete", manifest.completeness_score()));
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|field| field.as_str()).collect();
            parts.push(format!("missing: {}", names.join(", ")));
        }
        parts.join(" | ")
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_owned();
    }
    let mut truncated: String = text.chars().take(limit).collect();
    truncated.push_str("...");
    truncated
}
