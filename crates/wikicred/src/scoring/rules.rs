use super::config::Weights;
use crate::signals::Signals;
use serde::{Deserialize, Serialize};

pub(crate) const REFERENCE_SATURATION: f64 = 15.0;
pub(crate) const CITATION_NEEDED_SATURATION: f64 = 5.0;
pub(crate) const PROBLEM_TEMPLATE_SATURATION: f64 = 2.0;
pub(crate) const TALK_ISSUE_SATURATION: f64 = 2.0;
pub(crate) const RECENCY_WINDOW_DAYS: f64 = 365.0;
pub(crate) const IDEAL_WORD_COUNT: u32 = 2000;
pub(crate) const IDEAL_HEADING_COUNT: u32 = 5;
pub(crate) const IDEAL_EDITOR_COUNT: u32 = 10;
pub(crate) const PARTIAL_QUALITY_SHARE: f64 = 0.7;

/// The eleven weighted terms of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    References,
    CitationNeeded,
    ProblemTemplates,
    Recency,
    Revert,
    TalkIssues,
    Length,
    Structure,
    Quality,
    Protection,
    EditorDiversity,
}

/// Signed points one factor contributed (penalties are negative).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: Factor,
    pub points: f64,
}

impl ScoreComponent {
    fn new(factor: Factor, points: f64) -> Self {
        Self { factor, points }
    }
}

/// Per-factor points in evaluation order, plus their unclamped sum.
pub(crate) fn score_signals(signals: &Signals, w: &Weights) -> (Vec<ScoreComponent>, f64) {
    let references = w
        .references
        .min(f64::from(signals.reference_count) * (w.references / REFERENCE_SATURATION));

    let citation_needed = penalty(
        w.citation_needed_penalty,
        signals.citation_needed,
        CITATION_NEEDED_SATURATION,
    );

    let problem_templates = penalty(
        w.problem_templates_penalty,
        signals.problem_templates,
        PROBLEM_TEMPLATE_SATURATION,
    );

    let recency = if signals.days_since_last_edit > RECENCY_WINDOW_DAYS {
        0.0
    } else {
        w.recency * (1.0 - signals.days_since_last_edit / RECENCY_WINDOW_DAYS)
    };

    // not capped beyond the weight: revert_rate is never negative
    let revert = w.revert * (1.0 - signals.revert_rate);

    let talk = penalty(w.talk_penalty, signals.talk_issues, TALK_ISSUE_SATURATION);

    let length = if signals.word_count > 0 {
        let capped = signals.word_count.min(IDEAL_WORD_COUNT);
        w.length * (f64::from(capped) / f64::from(IDEAL_WORD_COUNT))
    } else {
        0.0
    };

    let structure = w.structure
        * (f64::from(signals.heading_count.min(IDEAL_HEADING_COUNT))
            / f64::from(IDEAL_HEADING_COUNT));

    let quality = if signals.is_featured_article {
        w.quality_bonus
    } else if signals.is_good_article {
        w.quality_bonus * PARTIAL_QUALITY_SHARE
    } else if signals.is_stub {
        -w.quality_bonus * PARTIAL_QUALITY_SHARE
    } else {
        0.0
    };

    let protection = if signals.is_protected {
        w.protection_bonus
    } else {
        0.0
    };

    let editors = w.editor_diversity
        * (f64::from(signals.unique_editors.min(IDEAL_EDITOR_COUNT))
            / f64::from(IDEAL_EDITOR_COUNT));

    let components = vec![
        ScoreComponent::new(Factor::References, references),
        ScoreComponent::new(Factor::CitationNeeded, citation_needed),
        ScoreComponent::new(Factor::ProblemTemplates, problem_templates),
        ScoreComponent::new(Factor::Recency, recency),
        ScoreComponent::new(Factor::Revert, revert),
        ScoreComponent::new(Factor::TalkIssues, talk),
        ScoreComponent::new(Factor::Length, length),
        ScoreComponent::new(Factor::Structure, structure),
        ScoreComponent::new(Factor::Quality, quality),
        ScoreComponent::new(Factor::Protection, protection),
        ScoreComponent::new(Factor::EditorDiversity, editors),
    ];

    let total = components
        .iter()
        .fold(0.0, |acc, component| acc + component.points);

    (components, total)
}

/// `min(weight, count * weight / saturation)`, returned as a deduction.
fn penalty(weight: f64, count: u32, saturation: f64) -> f64 {
    let amount = weight.min(f64::from(count) * (weight / saturation));
    if amount > 0.0 {
        -amount
    } else {
        0.0
    }
}

pub(crate) fn points_for(components: &[ScoreComponent], factor: Factor) -> f64 {
    components
        .iter()
        .find(|component| component.factor == factor)
        .map(|component| component.points)
        .unwrap_or(0.0)
}
