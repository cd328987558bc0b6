use super::config::RejectRules;
use super::highlights::Highlights;
use super::rules::ScoreComponent;
use crate::signals::Signals;
use serde::{Deserialize, Serialize, Serializer};

/// Ordered quality tiers; `Weak < Moderate < Good < Excellent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Weak,
    Moderate,
    Good,
    Excellent,
}

impl Verdict {
    /// Inclusive lower bounds: 85, 60, 40.
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Verdict::Excellent
        } else if score >= 60.0 {
            Verdict::Good
        } else if score >= 40.0 {
            Verdict::Moderate
        } else {
            Verdict::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Weak => "Weak",
            Verdict::Moderate => "Moderate",
            Verdict::Good => "Good",
            Verdict::Excellent => "Excellent",
        }
    }
}

/// Hard rule that zeroed a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    #[serde(rename = "citation needed")]
    CitationNeeded,
    #[serde(rename = "problem templates")]
    ProblemTemplates,
    #[serde(rename = "revert rate")]
    RevertRate,
    #[serde(rename = "stale")]
    Stale,
}

impl RejectionReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::CitationNeeded => "citation needed",
            RejectionReason::ProblemTemplates => "problem templates",
            RejectionReason::RevertRate => "revert rate",
            RejectionReason::Stale => "stale",
        }
    }
}

/// Outcome of applying a policy to a set of signals.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreResult {
    /// A rejection rule fired: score 0, verdict Weak.
    Rejected { reason: RejectionReason },
    Scored {
        score: f64,
        verdict: Verdict,
        highlights: Highlights,
        components: Vec<ScoreComponent>,
    },
}

impl ScoreResult {
    pub fn score(&self) -> f64 {
        match self {
            ScoreResult::Rejected { .. } => 0.0,
            ScoreResult::Scored { score, .. } => *score,
        }
    }

    pub fn verdict(&self) -> Verdict {
        match self {
            ScoreResult::Rejected { .. } => Verdict::Weak,
            ScoreResult::Scored { verdict, .. } => *verdict,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ScoreResult::Rejected { .. })
    }

    pub fn reason(&self) -> Option<RejectionReason> {
        match self {
            ScoreResult::Rejected { reason } => Some(*reason),
            ScoreResult::Scored { .. } => None,
        }
    }

    pub fn highlights(&self) -> Option<&Highlights> {
        match self {
            ScoreResult::Rejected { .. } => None,
            ScoreResult::Scored { highlights, .. } => Some(highlights),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            ScoreResult::Rejected { reason } => format!("rejected: {}", reason.code()),
            ScoreResult::Scored { score, verdict, .. } => {
                format!("{} ({score:.1}/100)", verdict.label())
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreView<'a> {
    score: f64,
    verdict: Verdict,
    rejected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<RejectionReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlights: Option<&'a Highlights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<&'a [ScoreComponent]>,
}

impl Serialize for ScoreResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let view = match self {
            ScoreResult::Rejected { reason } => ScoreView {
                score: 0.0,
                verdict: Verdict::Weak,
                rejected: true,
                reason: Some(*reason),
                highlights: None,
                components: None,
            },
            ScoreResult::Scored {
                score,
                verdict,
                highlights,
                components,
            } => ScoreView {
                score: *score,
                verdict: *verdict,
                rejected: false,
                reason: None,
                highlights: Some(highlights),
                components: Some(components),
            },
        };
        view.serialize(serializer)
    }
}

/// Rules are checked in a fixed order; the first that fires wins.
pub(crate) fn check_rejection(signals: &Signals, rules: &RejectRules) -> Option<RejectionReason> {
    if let Some(limit) = rules.citation_needed_greater_than {
        if signals.citation_needed > limit {
            return Some(RejectionReason::CitationNeeded);
        }
    }

    if rules.has_problem_templates && signals.problem_templates > 0 {
        return Some(RejectionReason::ProblemTemplates);
    }

    if let Some(limit) = rules.revert_rate_above {
        if signals.revert_rate > limit {
            return Some(RejectionReason::RevertRate);
        }
    }

    if let Some(limit) = rules.days_since_last_edit_above {
        if signals.days_since_last_edit > limit {
            return Some(RejectionReason::Stale);
        }
    }

    None
}
