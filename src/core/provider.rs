//! Provider descriptors.
//!
//! Defines the quota providers the dashboard knows about and the
//! normalization pipeline each provider's report runs through.

use serde::{Deserialize, Serialize};

use crate::normalize::Transform;

// =============================================================================
// Provider Enum
// =============================================================================

/// Supported quota providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Claude,
    Codex,
    Gemini,
    Kimi,
    Glm,
}

impl Provider {
    /// All providers in display order.
    pub const ALL: &'static [Self] = &[
        Self::Claude,
        Self::Codex,
        Self::Gemini,
        Self::Kimi,
        Self::Glm,
    ];

    /// Key used in the credential store and logs.
    #[must_use]
    pub const fn cli_name(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Codex => "codex",
            Self::Gemini => "gemini",
            Self::Kimi => "kimi",
            Self::Glm => "glm",
        }
    }

    /// Display name for section banners and the summary.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Claude => "Claude",
            Self::Codex => "Codex",
            Self::Gemini => "Gemini",
            Self::Kimi => "Kimi",
            Self::Glm => "GLM Coding Plan",
        }
    }

    /// Icon shown before the display name.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Claude => "◆",
            Self::Codex => "◇",
            Self::Gemini => "✦",
            Self::Kimi => "◐",
            Self::Glm => "◈",
        }
    }

    /// Parse from a credential store key (case-insensitive).
    #[must_use]
    pub fn from_cli_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        Self::ALL.iter().find(|p| p.cli_name() == lower).copied()
    }

    /// Whether a secondary used/total fetch is merged into this provider's report.
    #[must_use]
    pub const fn has_derived_usage(self) -> bool {
        matches!(self, Self::Glm)
    }

    /// Ordered text transforms applied to this provider's raw report.
    ///
    /// Blank-line tidying always runs last and is not listed here.
    #[must_use]
    pub const fn transforms(self) -> &'static [Transform] {
        match self {
            Self::Glm => &[Transform::InjectDerivedUsage, Transform::InlineResetLines],
            Self::Gemini => &[Transform::RerenderQuotaLines],
            Self::Claude | Self::Codex | Self::Kimi => &[Transform::InlineResetLines],
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_names_round_trip() {
        for &provider in Provider::ALL {
            assert_eq!(Provider::from_cli_name(provider.cli_name()), Some(provider));
        }
    }

    #[test]
    fn from_cli_name_is_case_insensitive() {
        assert_eq!(Provider::from_cli_name(" GLM "), Some(Provider::Glm));
        assert_eq!(Provider::from_cli_name("openai"), None);
    }

    #[test]
    fn only_glm_has_derived_usage() {
        let with_derived: Vec<_> = Provider::ALL
            .iter()
            .filter(|p| p.has_derived_usage())
            .collect();
        assert_eq!(with_derived, vec![&Provider::Glm]);
    }

    #[test]
    fn derived_usage_is_injected_before_reset_inlining() {
        assert_eq!(
            Provider::Glm.transforms(),
            &[Transform::InjectDerivedUsage, Transform::InlineResetLines]
        );
    }
}
