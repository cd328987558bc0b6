use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-signal weights. Each weight is the most that signal can add or take away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    pub references: f64,
    pub citation_needed_penalty: f64,
    pub problem_templates_penalty: f64,
    pub recency: f64,
    pub revert: f64,
    pub talk_penalty: f64,
    pub length: f64,
    pub structure: f64,
    pub quality_bonus: f64,
    pub protection_bonus: f64,
    pub editor_diversity: f64,
}

impl Weights {
    fn named(&self) -> [(&'static str, f64); 11] {
        [
            ("references", self.references),
            ("citationNeededPenalty", self.citation_needed_penalty),
            ("problemTemplatesPenalty", self.problem_templates_penalty),
            ("recency", self.recency),
            ("revert", self.revert),
            ("talkPenalty", self.talk_penalty),
            ("length", self.length),
            ("structure", self.structure),
            ("qualityBonus", self.quality_bonus),
            ("protectionBonus", self.protection_bonus),
            ("editorDiversity", self.editor_diversity),
        ]
    }
}

/// Hard thresholds; any rule that fires short-circuits scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RejectRules {
    /// `Some(0)` rejects on any citation-needed marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation_needed_greater_than: Option<u32>,
    pub has_problem_templates: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revert_rate_above: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_since_last_edit_above: Option<f64>,
}

/// Immutable scoring policy: weights plus optional rejection rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub weights: Weights,
    #[serde(default)]
    pub reject_if: RejectRules,
}

/// Built-in policy presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrictnessProfile {
    Permissive,
    #[default]
    Normal,
    Strict,
}

impl StrictnessProfile {
    pub const ALL: [StrictnessProfile; 3] = [
        StrictnessProfile::Permissive,
        StrictnessProfile::Normal,
        StrictnessProfile::Strict,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StrictnessProfile::Permissive => "permissive",
            StrictnessProfile::Normal => "normal",
            StrictnessProfile::Strict => "strict",
        }
    }

    pub fn policy(&self) -> Policy {
        match self {
            StrictnessProfile::Permissive => Policy {
                weights: Weights {
                    references: 35.0,
                    citation_needed_penalty: 6.0,
                    problem_templates_penalty: 12.0,
                    recency: 18.0,
                    revert: 10.0,
                    talk_penalty: 5.0,
                    length: 12.0,
                    structure: 6.0,
                    quality_bonus: 10.0,
                    protection_bonus: 3.0,
                    editor_diversity: 6.0,
                },
                reject_if: RejectRules {
                    revert_rate_above: Some(0.9),
                    ..RejectRules::default()
                },
            },
            StrictnessProfile::Normal => Policy {
                weights: Weights {
                    references: 30.0,
                    citation_needed_penalty: 10.0,
                    problem_templates_penalty: 20.0,
                    recency: 20.0,
                    revert: 15.0,
                    talk_penalty: 10.0,
                    length: 10.0,
                    structure: 8.0,
                    quality_bonus: 12.0,
                    protection_bonus: 4.0,
                    editor_diversity: 8.0,
                },
                reject_if: RejectRules::default(),
            },
            StrictnessProfile::Strict => Policy {
                weights: Weights {
                    references: 20.0,
                    citation_needed_penalty: 30.0,
                    problem_templates_penalty: 35.0,
                    recency: 25.0,
                    revert: 20.0,
                    talk_penalty: 15.0,
                    length: 8.0,
                    structure: 10.0,
                    quality_bonus: 18.0,
                    protection_bonus: 4.0,
                    editor_diversity: 10.0,
                },
                reject_if: RejectRules {
                    citation_needed_greater_than: Some(0),
                    has_problem_templates: true,
                    revert_rate_above: Some(0.4),
                    // five years
                    days_since_last_edit_above: Some(1825.0),
                },
            },
        }
    }
}

impl fmt::Display for StrictnessProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for StrictnessProfile {
    type Err = PolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "normal" | "default" => Ok(Self::Normal),
            "strict" => Ok(Self::Strict),
            other => Err(PolicyError::UnknownProfile(other.to_string())),
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        StrictnessProfile::Normal.policy()
    }
}

/// Partial weight vector; unset fields keep the base policy's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeightOverrides {
    pub references: Option<f64>,
    pub citation_needed_penalty: Option<f64>,
    pub problem_templates_penalty: Option<f64>,
    pub recency: Option<f64>,
    pub revert: Option<f64>,
    pub talk_penalty: Option<f64>,
    pub length: Option<f64>,
    pub structure: Option<f64>,
    pub quality_bonus: Option<f64>,
    pub protection_bonus: Option<f64>,
    pub editor_diversity: Option<f64>,
}

/// Caller-supplied adjustments merged onto a base profile.
///
/// When `reject_if` is present it replaces the base profile's rules as a
/// whole; fields left out of it take their defaults (no rule).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyOverrides {
    pub profile: Option<StrictnessProfile>,
    pub weights: WeightOverrides,
    pub reject_if: Option<RejectRules>,
}

impl PolicyOverrides {
    pub fn profile(profile: StrictnessProfile) -> Self {
        Self {
            profile: Some(profile),
            ..Self::default()
        }
    }

    pub fn with_weights(mut self, weights: WeightOverrides) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_reject_rules(mut self, rules: RejectRules) -> Self {
        self.reject_if = Some(rules);
        self
    }

    /// Resolve into a validated policy.
    pub fn build(&self) -> Result<Policy, PolicyError> {
        let base = self.profile.unwrap_or_default().policy();
        base.merged(self)
    }
}

impl Policy {
    /// Apply `overrides` onto this policy. The profile in `overrides` is ignored here;
    /// see [`PolicyOverrides::build`].
    pub fn merged(&self, overrides: &PolicyOverrides) -> Result<Policy, PolicyError> {
        let w = &overrides.weights;
        let base = &self.weights;
        let policy = Policy {
            weights: Weights {
                references: w.references.unwrap_or(base.references),
                citation_needed_penalty: w
                    .citation_needed_penalty
                    .unwrap_or(base.citation_needed_penalty),
                problem_templates_penalty: w
                    .problem_templates_penalty
                    .unwrap_or(base.problem_templates_penalty),
                recency: w.recency.unwrap_or(base.recency),
                revert: w.revert.unwrap_or(base.revert),
                talk_penalty: w.talk_penalty.unwrap_or(base.talk_penalty),
                length: w.length.unwrap_or(base.length),
                structure: w.structure.unwrap_or(base.structure),
                quality_bonus: w.quality_bonus.unwrap_or(base.quality_bonus),
                protection_bonus: w.protection_bonus.unwrap_or(base.protection_bonus),
                editor_diversity: w.editor_diversity.unwrap_or(base.editor_diversity),
            },
            reject_if: overrides.reject_if.unwrap_or(self.reject_if),
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        for (name, value) in self.weights.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(PolicyError::InvalidWeight { name, value });
            }
        }

        let thresholds = [
            ("revertRateAbove", self.reject_if.revert_rate_above),
            (
                "daysSinceLastEditAbove",
                self.reject_if.days_since_last_edit_above,
            ),
        ];
        for (name, value) in thresholds {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(PolicyError::InvalidThreshold { name, value });
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("weight '{name}' must be a finite non-negative number (got {value})")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("threshold '{name}' must be a finite non-negative number (got {value})")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("unknown strictness profile '{0}' (expected permissive, normal, or strict)")]
    UnknownProfile(String),
}
