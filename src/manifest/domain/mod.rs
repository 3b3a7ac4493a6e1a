//! Domain types for the project manifest.

mod field;
mod manifest;

pub use field::{
    ManifestField, ParseManifestFieldError, REQUIRED_FIELD_COUNT, REQUIRED_FIELDS,
    completeness_score,
};
pub use manifest::{
    ManifestUpdate, ParseProjectPhaseError, ProjectManifest, ProjectPhase, RepositorySnapshot,
};
