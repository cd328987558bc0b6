//! End-to-end analysis: resolve a title, collect its signals, score them.

mod router;
mod service;


pub use router::analysis_router;
pub use service::ReliabilityService;

use crate::scoring::{Policy, PolicyError, PolicyOverrides, ScoreResult};
use crate::signals::{Signals, SignalsError};
use crate::wiki::{EvidenceLink, UrlError, WikiError};
use serde::{Deserialize, Serialize, Serializer};

/// Body of `POST /api/analyze`. `url` wins over `title` when both are set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub lang: Option<String>,
    pub policy: Option<PolicyOverrides>,
    pub prefer_choice: bool,
}

impl AnalyzeRequest {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }
}

/// Candidate list returned instead of a score when the caller asked to choose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateChoice {
    pub suggestions: Vec<String>,
    pub resolved_from: Option<String>,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub outcome: ScoreResult,
    pub signals: Signals,
    pub evidence: Vec<EvidenceLink>,
    pub lang: String,
    pub title: String,
    /// The submitted title, when resolution changed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_from: Option<String>,
    pub suggestions: Vec<String>,
    pub policy: Policy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Choice(CandidateChoice),
    Report(Box<AnalysisReport>),
}

impl AnalysisOutcome {
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisOutcome::Report(report) => Some(report),
            AnalysisOutcome::Choice(_) => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChoiceView<'a> {
    choose: bool,
    suggestions: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    resolved_from: Option<&'a str>,
    lang: &'a str,
}

impl Serialize for CandidateChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ChoiceView {
            choose: true,
            suggestions: &self.suggestions,
            resolved_from: self.resolved_from.as_deref(),
            lang: &self.lang,
        }
        .serialize(serializer)
    }
}

impl Serialize for AnalysisOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AnalysisOutcome::Choice(choice) => choice.serialize(serializer),
            AnalysisOutcome::Report(report) => report.serialize(serializer),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("not a Wikipedia article URL ({0})")]
    InvalidUrl(#[from] UrlError),
    #[error("unsupported language code '{0}'")]
    InvalidLanguage(String),
    #[error("title or url required")]
    MissingInput,
    #[error("article not found")]
    NotFound { suggestions: Vec<String> },
    #[error("title is a disambiguation page; choose a more specific title")]
    Disambiguation { suggestions: Vec<String> },
    #[error("invalid policy: {0}")]
    Policy(#[from] PolicyError),
    #[error("invalid signals: {0}")]
    Signals(#[from] SignalsError),
    #[error("wiki request failed: {0}")]
    Network(#[from] WikiError),
}

impl AnalysisError {
    /// Stable machine-readable code for response bodies.
    pub fn reason(&self) -> &'static str {
        match self {
            AnalysisError::InvalidUrl(_) => "invalid_url",
            AnalysisError::InvalidLanguage(_) => "invalid_language",
            AnalysisError::MissingInput => "missing_input",
            AnalysisError::NotFound { .. } => "missing",
            AnalysisError::Disambiguation { .. } => "disambiguation",
            AnalysisError::Policy(_) => "invalid_policy",
            AnalysisError::Signals(_) => "invalid_signals",
            AnalysisError::Network(_) => "upstream",
        }
    }

    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            AnalysisError::NotFound { suggestions }
            | AnalysisError::Disambiguation { suggestions } => Some(suggestions),
            _ => None,
        }
    }
}
