//! The project manifest aggregate and its interview delta.

use super::{ManifestField, completeness_score};
use crate::extraction::{optional_text, string_list};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle phase of the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectPhase {
    /// Still deciding what to build.
    Planning,
    /// Actively building the first version.
    Build,
    /// Growing an existing product.
    Scaling,
    /// Keeping a mature product running.
    Maintenance,
}

impl ProjectPhase {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Build => "build",
            Self::Scaling => "scaling",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for ProjectPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing a project phase.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project phase: {0}")]
pub struct ParseProjectPhaseError(pub String);

impl TryFrom<&str> for ProjectPhase {
    type Error = ParseProjectPhaseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "planning" | "idea" | "discovery" => Ok(Self::Planning),
            "build" | "building" | "mvp" => Ok(Self::Build),
            "scaling" | "growth" => Ok(Self::Scaling),
            "maintenance" | "maintaining" => Ok(Self::Maintenance),
            _ => Err(ParseProjectPhaseError(value.to_owned())),
        }
    }
}

/// Snapshot of a linked source repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    /// Clone URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Default branch name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    /// Languages detected in the repository.
    #[serde(default)]
    pub languages: Vec<String>,
    /// Short prose summary of the codebase.
    #[serde(default)]
    pub summary: String,
}

/// Structured summary of the project the user is building.
///
/// # Invariants
///
/// - `completeness_score` is derived from the set of missing required fields
///   and always lies within `0..=100`; it is only written through
///   [`ProjectManifest::set_missing_count`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// Project name.
    #[serde(default)]
    pub name: String,
    /// Mission statement.
    #[serde(default)]
    pub mission: String,
    /// Target user groups.
    #[serde(default)]
    pub target_users: Vec<String>,
    /// Technology stack.
    #[serde(default)]
    pub tech_stack: Vec<String>,
    /// Lifecycle phase.
    #[serde(default)]
    pub phase: Option<ProjectPhase>,
    /// Headline features.
    #[serde(default)]
    pub features: Vec<String>,
    /// Competing products.
    #[serde(default)]
    pub competitors: Vec<String>,
    /// Brand voice.
    #[serde(default)]
    pub brand_voice: String,
    /// Success metrics.
    #[serde(default)]
    pub success_metrics: Vec<String>,
    /// Optional linked repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<RepositorySnapshot>,
    #[serde(default)]
    completeness_score: u8,
}

impl ProjectManifest {
    /// Creates an empty manifest with a score of zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the derived completeness score.
    #[must_use]
    pub const fn completeness_score(&self) -> u8 {
        self.completeness_score
    }

    /// Re-derives the completeness score from a count of missing fields.
    pub fn set_missing_count(&mut self, missing: usize) {
        self.completeness_score = completeness_score(missing);
    }

    /// Returns `true` when the field holds no information.
    #[must_use]
    pub fn is_field_empty(&self, field: ManifestField) -> bool {
        fn blank(value: &str) -> bool {
            value.trim().is_empty()
        }
        fn blank_list(values: &[String]) -> bool {
            values.iter().all(|value| blank(value))
        }
        match field {
            ManifestField::Name => blank(&self.name),
            ManifestField::Mission => blank(&self.mission),
            ManifestField::TargetUsers => blank_list(&self.target_users),
            ManifestField::TechStack => blank_list(&self.tech_stack),
            ManifestField::Phase => self.phase.is_none(),
            ManifestField::Features => blank_list(&self.features),
            ManifestField::Competitors => blank_list(&self.competitors),
            ManifestField::BrandVoice => blank(&self.brand_voice),
            ManifestField::SuccessMetrics => blank_list(&self.success_metrics),
        }
    }
}

/// Facts stated during one interview turn.
///
/// Scalars overwrite the manifest when non-blank; lists are merged into the
/// existing values without duplicates. Every field tolerates the wrong JSON
/// shape: a bare string is read as a list and a list as joined text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestUpdate {
    /// New project name.
    #[serde(default, deserialize_with = "optional_text")]
    pub name: Option<String>,
    /// New mission statement.
    #[serde(default, deserialize_with = "optional_text")]
    pub mission: Option<String>,
    /// Additional target users.
    #[serde(default, alias = "target_users", deserialize_with = "string_list")]
    pub target_users: Vec<String>,
    /// Additional stack entries.
    #[serde(default, alias = "tech_stack", deserialize_with = "string_list")]
    pub tech_stack: Vec<String>,
    /// New phase label; unknown labels are ignored.
    #[serde(default, deserialize_with = "optional_text")]
    pub phase: Option<String>,
    /// Additional features.
    #[serde(default, deserialize_with = "string_list")]
    pub features: Vec<String>,
    /// Additional competitors.
    #[serde(default, deserialize_with = "string_list")]
    pub competitors: Vec<String>,
    /// New brand voice.
    #[serde(default, alias = "brand_voice", deserialize_with = "optional_text")]
    pub brand_voice: Option<String>,
    /// Additional success metrics.
    #[serde(default, alias = "success_metrics", deserialize_with = "string_list")]
    pub success_metrics: Vec<String>,
}

impl ManifestUpdate {
    /// Merges the update into `manifest`.
    pub fn apply_to(&self, manifest: &mut ProjectManifest) {
        overwrite(&mut manifest.name, self.name.as_deref());
        overwrite(&mut manifest.mission, self.mission.as_deref());
        overwrite(&mut manifest.brand_voice, self.brand_voice.as_deref());
        if let Some(phase) = self
            .phase
            .as_deref()
            .and_then(|raw| ProjectPhase::try_from(raw).ok())
        {
            manifest.phase = Some(phase);
        }
        merge(&mut manifest.target_users, &self.target_users);
        merge(&mut manifest.tech_stack, &self.tech_stack);
        merge(&mut manifest.features, &self.features);
        merge(&mut manifest.competitors, &self.competitors);
        merge(&mut manifest.success_metrics, &self.success_metrics);
    }
}

fn overwrite(target: &mut String, value: Option<&str>) {
    if let Some(text) = value.map(str::trim).filter(|text| !text.is_empty()) {
        text.clone_into(target);
    }
}

fn merge(target: &mut Vec<String>, additions: &[String]) {
    for addition in additions.iter().map(|value| value.trim()) {
        if addition.is_empty() {
            continue;
        }
        let already_present = target
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(addition));
        if !already_present {
            target.push(addition.to_owned());
        }
    }
}
