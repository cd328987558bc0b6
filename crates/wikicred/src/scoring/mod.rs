//! Policy-driven scoring of article signals.

mod config;
mod highlights;
mod policy;
mod rules;

#[cfg(test)]
mod tests;

pub use config::{
    Policy, PolicyError, PolicyOverrides, RejectRules, StrictnessProfile, WeightOverrides, Weights,
};
pub use highlights::{Highlight, HighlightTag, Highlights, Polarity};
pub use policy::{RejectionReason, ScoreResult, Verdict};
pub use rules::{Factor, ScoreComponent};

use crate::signals::Signals;
use highlights::select_highlights;
use policy::check_rejection;

/// Score `signals` under `policy`.
///
/// Rejection rules are checked first; otherwise the weighted factors are
/// summed and clamped into `0..=100`.
pub fn apply_policy(signals: &Signals, policy: &Policy) -> ScoreResult {
    if let Some(reason) = check_rejection(signals, &policy.reject_if) {
        return ScoreResult::Rejected { reason };
    }

    let (components, total) = rules::score_signals(signals, &policy.weights);
    let score = clamp_score(total);
    let verdict = Verdict::from_score(score);
    let highlights = select_highlights(signals, &policy.weights, &components, verdict);

    ScoreResult::Scored {
        score,
        verdict,
        highlights,
        components,
    }
}

fn clamp_score(total: f64) -> f64 {
    if total.is_nan() {
        0.0
    } else {
        total.clamp(0.0, 100.0)
    }
}
