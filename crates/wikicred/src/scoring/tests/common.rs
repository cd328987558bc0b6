use crate::scoring::{Policy, Weights};
use crate::signals::Signals;

/// An article that maxes out every positive factor under the normal profile.
pub(super) fn exemplary_signals() -> Signals {
    Signals {
        reference_count: 20,
        citation_needed: 0,
        problem_templates: 0,
        days_since_last_edit: 0.0,
        revert_rate: 0.0,
        talk_issues: 0,
        word_count: 2000,
        heading_count: 5,
        is_stub: false,
        is_good_article: false,
        is_featured_article: true,
        is_protected: true,
        unique_editors: 12,
    }
}

/// Weak under the normal profile without crossing any strong negative threshold.
pub(super) fn middling_signals() -> Signals {
    Signals {
        reference_count: 5,
        citation_needed: 1,
        problem_templates: 0,
        days_since_last_edit: 200.0,
        revert_rate: 0.12,
        talk_issues: 0,
        word_count: 500,
        heading_count: 1,
        is_stub: false,
        is_good_article: false,
        is_featured_article: false,
        is_protected: false,
        unique_editors: 2,
    }
}

pub(super) fn troubled_signals() -> Signals {
    Signals {
        reference_count: 0,
        citation_needed: 10,
        problem_templates: 5,
        talk_issues: 5,
        is_stub: true,
        ..Signals::default()
    }
}

pub(super) fn zero_weights() -> Policy {
    Policy {
        weights: Weights {
            references: 0.0,
            citation_needed_penalty: 0.0,
            problem_templates_penalty: 0.0,
            recency: 0.0,
            revert: 0.0,
            talk_penalty: 0.0,
            length: 0.0,
            structure: 0.0,
            quality_bonus: 0.0,
            protection_bonus: 0.0,
            editor_diversity: 0.0,
        },
        reject_if: Default::default(),
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
