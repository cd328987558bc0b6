//! Short, ranked explanations attached to a score.
//!
//! Thresholds are fixed per signal and independent of the policy weights;
//! the weights only decide how highlights are ordered.

use super::config::Weights;
use super::policy::Verdict;
use super::rules::{points_for, Factor, ScoreComponent};
use crate::signals::Signals;
use serde::{Deserialize, Serialize};

const MAX_PER_SIDE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightTag {
    ManyReferences,
    RecentlyEdited,
    StableHistory,
    Comprehensive,
    WellStructured,
    FeaturedArticle,
    GoodArticle,
    Protected,
    DiverseEditors,
    CitationNeeded,
    ProblemTemplates,
    TalkDisputes,
    Stub,
    Stale,
    FrequentReverts,
    NoReferences,
    FewReferences,
    ShortArticle,
    PoorStructure,
    FewEditors,
    MultipleSmallWeaknesses,
}

impl HighlightTag {
    pub fn label(&self) -> &'static str {
        match self {
            HighlightTag::ManyReferences => "well referenced",
            HighlightTag::RecentlyEdited => "recently edited",
            HighlightTag::StableHistory => "stable edit history",
            HighlightTag::Comprehensive => "comprehensive length",
            HighlightTag::WellStructured => "clear section structure",
            HighlightTag::FeaturedArticle => "featured article",
            HighlightTag::GoodArticle => "good article",
            HighlightTag::Protected => "page protection",
            HighlightTag::DiverseEditors => "many independent editors",
            HighlightTag::CitationNeeded => "citation needed markers",
            HighlightTag::ProblemTemplates => "maintenance banners",
            HighlightTag::TalkDisputes => "disputes on talk page",
            HighlightTag::Stub => "stub article",
            HighlightTag::Stale => "not edited recently",
            HighlightTag::FrequentReverts => "frequent reverts",
            HighlightTag::NoReferences => "no references",
            HighlightTag::FewReferences => "few references",
            HighlightTag::ShortArticle => "short article",
            HighlightTag::PoorStructure => "little structure",
            HighlightTag::FewEditors => "few editors",
            HighlightTag::MultipleSmallWeaknesses => "multiple small weaknesses",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    #[serde(rename = "type")]
    pub polarity: Polarity,
    #[serde(rename = "id")]
    pub tag: HighlightTag,
    /// Sort key: magnitude of the points behind this highlight.
    pub contribution: f64,
}

impl Highlight {
    fn positive(tag: HighlightTag, contribution: f64) -> Self {
        Self {
            polarity: Polarity::Positive,
            tag,
            contribution: contribution.abs(),
        }
    }

    fn negative(tag: HighlightTag, contribution: f64) -> Self {
        Self {
            polarity: Polarity::Negative,
            tag,
            contribution: contribution.abs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Highlights {
    pub positives: Vec<Highlight>,
    pub negatives: Vec<Highlight>,
}

impl Highlights {
    pub fn positive_tags(&self) -> Vec<HighlightTag> {
        self.positives.iter().map(|highlight| highlight.tag).collect()
    }

    pub fn negative_tags(&self) -> Vec<HighlightTag> {
        self.negatives.iter().map(|highlight| highlight.tag).collect()
    }
}

pub(crate) fn select_highlights(
    signals: &Signals,
    weights: &Weights,
    components: &[ScoreComponent],
    verdict: Verdict,
) -> Highlights {
    let positives = top(strong_positives(signals, components));
    let mut negatives = top(strong_negatives(signals, weights, components));

    if verdict == Verdict::Weak && negatives.is_empty() {
        negatives = top(soft_negatives(signals, weights, components));
        if negatives.is_empty() {
            negatives.push(Highlight::negative(
                HighlightTag::MultipleSmallWeaknesses,
                0.0,
            ));
        }
    }

    Highlights {
        positives,
        negatives,
    }
}

fn top(mut highlights: Vec<Highlight>) -> Vec<Highlight> {
    // stable: equal contributions keep evaluation order
    highlights.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    highlights.truncate(MAX_PER_SIDE);
    highlights
}

fn strong_positives(signals: &Signals, components: &[ScoreComponent]) -> Vec<Highlight> {
    let points = |factor| points_for(components, factor);
    let mut found = Vec::new();

    if signals.reference_count >= 15 {
        found.push(Highlight::positive(
            HighlightTag::ManyReferences,
            points(Factor::References),
        ));
    }
    if signals.days_since_last_edit <= 30.0 {
        found.push(Highlight::positive(
            HighlightTag::RecentlyEdited,
            points(Factor::Recency),
        ));
    }
    if signals.revert_rate <= 0.05 && signals.unique_editors > 0 {
        found.push(Highlight::positive(
            HighlightTag::StableHistory,
            points(Factor::Revert),
        ));
    }
    if signals.word_count >= 1500 {
        found.push(Highlight::positive(
            HighlightTag::Comprehensive,
            points(Factor::Length),
        ));
    }
    if signals.heading_count >= 4 {
        found.push(Highlight::positive(
            HighlightTag::WellStructured,
            points(Factor::Structure),
        ));
    }
    if signals.is_featured_article {
        found.push(Highlight::positive(
            HighlightTag::FeaturedArticle,
            points(Factor::Quality),
        ));
    } else if signals.is_good_article {
        found.push(Highlight::positive(
            HighlightTag::GoodArticle,
            points(Factor::Quality),
        ));
    }
    if signals.is_protected {
        found.push(Highlight::positive(
            HighlightTag::Protected,
            points(Factor::Protection),
        ));
    }
    if signals.unique_editors >= 5 {
        found.push(Highlight::positive(
            HighlightTag::DiverseEditors,
            points(Factor::EditorDiversity),
        ));
    }

    found
}

fn strong_negatives(
    signals: &Signals,
    weights: &Weights,
    components: &[ScoreComponent],
) -> Vec<Highlight> {
    let points = |factor| points_for(components, factor);
    let mut found = Vec::new();

    if signals.citation_needed >= 3 {
        found.push(Highlight::negative(
            HighlightTag::CitationNeeded,
            points(Factor::CitationNeeded),
        ));
    }
    if signals.problem_templates >= 1 {
        found.push(Highlight::negative(
            HighlightTag::ProblemTemplates,
            points(Factor::ProblemTemplates),
        ));
    }
    if signals.talk_issues >= 3 {
        found.push(Highlight::negative(
            HighlightTag::TalkDisputes,
            points(Factor::TalkIssues),
        ));
    }
    if signals.is_stub && !signals.is_featured_article && !signals.is_good_article {
        found.push(Highlight::negative(
            HighlightTag::Stub,
            points(Factor::Quality),
        ));
    }
    if signals.days_since_last_edit > 365.0 {
        found.push(Highlight::negative(HighlightTag::Stale, weights.recency));
    }
    if signals.revert_rate >= 0.2 {
        found.push(Highlight::negative(
            HighlightTag::FrequentReverts,
            weights.revert * signals.revert_rate,
        ));
    }
    if signals.reference_count == 0 {
        found.push(Highlight::negative(
            HighlightTag::NoReferences,
            weights.references,
        ));
    }

    found
}

/// Looser thresholds used only to explain a weak score that crossed no strong one.
/// Each key is the share of the weight the article forfeited (or the penalty applied).
fn soft_negatives(
    signals: &Signals,
    weights: &Weights,
    components: &[ScoreComponent],
) -> Vec<Highlight> {
    let points = |factor| points_for(components, factor);
    let forfeited = |weight: f64, factor| (weight - points(factor)).max(0.0);
    let mut found = Vec::new();

    if signals.reference_count < 15 {
        found.push(Highlight::negative(
            HighlightTag::FewReferences,
            forfeited(weights.references, Factor::References),
        ));
    }
    if signals.citation_needed >= 1 {
        found.push(Highlight::negative(
            HighlightTag::CitationNeeded,
            points(Factor::CitationNeeded),
        ));
    }
    if signals.days_since_last_edit > 180.0 {
        found.push(Highlight::negative(
            HighlightTag::Stale,
            forfeited(weights.recency, Factor::Recency),
        ));
    }
    if signals.revert_rate >= 0.1 {
        found.push(Highlight::negative(
            HighlightTag::FrequentReverts,
            weights.revert * signals.revert_rate,
        ));
    }
    if signals.talk_issues >= 1 {
        found.push(Highlight::negative(
            HighlightTag::TalkDisputes,
            points(Factor::TalkIssues),
        ));
    }
    if signals.word_count < 1000 {
        found.push(Highlight::negative(
            HighlightTag::ShortArticle,
            forfeited(weights.length, Factor::Length),
        ));
    }
    if signals.heading_count < 2 {
        found.push(Highlight::negative(
            HighlightTag::PoorStructure,
            forfeited(weights.structure, Factor::Structure),
        ));
    }
    if signals.unique_editors < 3 {
        found.push(Highlight::negative(
            HighlightTag::FewEditors,
            forfeited(weights.editor_diversity, Factor::EditorDiversity),
        ));
    }

    found
}
