//! Quality facts derived from one article's markup and revision history.

mod collector;
pub(crate) mod extract;

pub use collector::{SignalCollector, TALK_PREFIX};
pub use extract::{
    content_signals, revision_signals, talk_issue_count, ContentSignals, RevisionSignals,
};

use serde::{Deserialize, Serialize};

/// Days reported when an article has no revision history at all.
pub const NO_HISTORY_DAYS: f64 = 999.0;

/// Scoring input. Counts are never negative, `revert_rate` lies in `0..=1`,
/// and missing upstream data yields zero/neutral values rather than gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Signals {
    pub reference_count: u32,
    pub citation_needed: u32,
    pub problem_templates: u32,
    pub days_since_last_edit: f64,
    pub revert_rate: f64,
    pub talk_issues: u32,
    pub word_count: u32,
    pub heading_count: u32,
    pub is_stub: bool,
    pub is_good_article: bool,
    pub is_featured_article: bool,
    pub is_protected: bool,
    pub unique_editors: u32,
}

impl Default for Signals {
    fn default() -> Self {
        Self {
            reference_count: 0,
            citation_needed: 0,
            problem_templates: 0,
            days_since_last_edit: NO_HISTORY_DAYS,
            revert_rate: 0.0,
            talk_issues: 0,
            word_count: 0,
            heading_count: 0,
            is_stub: false,
            is_good_article: false,
            is_featured_article: false,
            is_protected: false,
            unique_editors: 0,
        }
    }
}

/// A caller-supplied signal set outside its documented domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SignalsError {
    #[error("revertRate must lie in 0..=1 (got {0})")]
    RevertRate(f64),
    #[error("daysSinceLastEdit must be a non-negative number (got {0})")]
    DaysSinceLastEdit(f64),
}

impl Signals {
    /// Checks the ranges the scoring rules rely on. Collected signals always
    /// pass; hand-built ones (e.g. `POST /api/score`) may not.
    pub fn validate(&self) -> Result<(), SignalsError> {
        if !(0.0..=1.0).contains(&self.revert_rate) {
            return Err(SignalsError::RevertRate(self.revert_rate));
        }
        if !self.days_since_last_edit.is_finite() || self.days_since_last_edit < 0.0 {
            return Err(SignalsError::DaysSinceLastEdit(self.days_since_last_edit));
        }
        Ok(())
    }

    pub(crate) fn assemble(
        content: ContentSignals,
        revisions: RevisionSignals,
        talk_issues: u32,
    ) -> Self {
        Self {
            reference_count: content.reference_count,
            citation_needed: content.citation_needed,
            problem_templates: content.problem_templates,
            days_since_last_edit: revisions.days_since_last_edit,
            revert_rate: revisions.revert_rate,
            talk_issues,
            word_count: content.word_count,
            heading_count: content.heading_count,
            is_stub: content.is_stub,
            is_good_article: content.is_good_article,
            is_featured_article: content.is_featured_article,
            is_protected: revisions.is_protected,
            unique_editors: revisions.unique_editors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_boundaries_validate() {
        assert_eq!(Signals::default().validate(), Ok(()));

        let edges = Signals {
            revert_rate: 1.0,
            days_since_last_edit: 0.0,
            ..Signals::default()
        };
        assert_eq!(edges.validate(), Ok(()));
    }

    #[test]
    fn out_of_range_signals_are_rejected() {
        let negative_rate = Signals {
            revert_rate: -1.0,
            ..Signals::default()
        };
        assert_eq!(negative_rate.validate(), Err(SignalsError::RevertRate(-1.0)));

        let above_one = Signals {
            revert_rate: 1.5,
            ..Signals::default()
        };
        assert_eq!(above_one.validate(), Err(SignalsError::RevertRate(1.5)));

        let future_edit = Signals {
            days_since_last_edit: -3650.0,
            ..Signals::default()
        };
        assert_eq!(
            future_edit.validate(),
            Err(SignalsError::DaysSinceLastEdit(-3650.0))
        );

        let unbounded = Signals {
            days_since_last_edit: f64::INFINITY,
            ..Signals::default()
        };
        assert!(unbounded.validate().is_err());
    }
}
