//! Required manifest fields and the completeness formula.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A required field of the project manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestField {
    /// Project name.
    Name,
    /// One-paragraph mission statement.
    Mission,
    /// Who the product is for.
    TargetUsers,
    /// Languages, frameworks and services.
    TechStack,
    /// Lifecycle phase.
    Phase,
    /// Headline features.
    Features,
    /// Competing products.
    Competitors,
    /// Tone of voice for user-facing copy.
    BrandVoice,
    /// How success is measured.
    SuccessMetrics,
}

/// Every required field, in prompt order.
pub const REQUIRED_FIELDS: [ManifestField; 9] = [
    ManifestField::Name,
    ManifestField::Mission,
    ManifestField::TargetUsers,
    ManifestField::TechStack,
    ManifestField::Phase,
    ManifestField::Features,
    ManifestField::Competitors,
    ManifestField::BrandVoice,
    ManifestField::SuccessMetrics,
];

/// Number of required manifest fields.
pub const REQUIRED_FIELD_COUNT: usize = REQUIRED_FIELDS.len();

impl ManifestField {
    /// Returns the canonical field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Mission => "mission",
            Self::TargetUsers => "target_users",
            Self::TechStack => "tech_stack",
            Self::Phase => "phase",
            Self::Features => "features",
            Self::Competitors => "competitors",
            Self::BrandVoice => "brand_voice",
            Self::SuccessMetrics => "success_metrics",
        }
    }
}

impl fmt::Display for ManifestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing a manifest field name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown manifest field: {0}")]
pub struct ParseManifestFieldError(pub String);

impl TryFrom<&str> for ManifestField {
    type Error = ParseManifestFieldError;

    /// Accepts snake case and camel case spellings.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| *ch != '_' && *ch != '-' && *ch != ' ')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "name" => Ok(Self::Name),
            "mission" => Ok(Self::Mission),
            "targetusers" => Ok(Self::TargetUsers),
            "techstack" => Ok(Self::TechStack),
            "phase" => Ok(Self::Phase),
            "features" => Ok(Self::Features),
            "competitors" => Ok(Self::Competitors),
            "brandvoice" => Ok(Self::BrandVoice),
            "successmetrics" => Ok(Self::SuccessMetrics),
            _ => Err(ParseManifestFieldError(value.to_owned())),
        }
    }
}

/// Completeness percentage for a manifest with `missing` unfilled fields.
///
/// Computes `round(100 * (required - missing) / required)` in integer
/// arithmetic, rounding halves up. `missing` is clamped to the number of
/// required fields, so the result is always within `0..=100`.
#[must_use]
pub fn completeness_score(missing: usize) -> u8 {
    let filled = REQUIRED_FIELD_COUNT.saturating_sub(missing.min(REQUIRED_FIELD_COUNT));
    let doubled_total = REQUIRED_FIELD_COUNT * 2;
    let rounded = (filled * 200 + REQUIRED_FIELD_COUNT)
        .checked_div(doubled_total)
        .unwrap_or(0);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 100)]
    #[case(1, 89)]
    #[case(2, 78)]
    #[case(5, 44)]
    #[case(9, 0)]
    #[case(40, 0)]
    fn completeness_follows_rounded_formula(#[case] missing: usize, #[case] expected: u8) {
        assert_eq!(completeness_score(missing), expected);
    }

    #[rstest]
    fn completeness_is_bounded_for_every_missing_count() {
        for missing in 0..=REQUIRED_FIELD_COUNT + 3 {
            let score = completeness_score(missing);
            assert!(score <= 100, "score {score} out of range for {missing}");
        }
    }

    #[rstest]
    #[case("targetUsers", ManifestField::TargetUsers)]
    #[case("target_users", ManifestField::TargetUsers)]
    #[case("Brand Voice", ManifestField::BrandVoice)]
    #[case("successMetrics", ManifestField::SuccessMetrics)]
    fn field_names_parse_in_either_case(#[case] raw: &str, #[case] expected: ManifestField) {
        assert_eq!(ManifestField::try_from(raw), Ok(expected));
    }

    #[rstest]
    fn unknown_field_is_rejected() {
        assert!(ManifestField::try_from("budget").is_err());
    }
}
