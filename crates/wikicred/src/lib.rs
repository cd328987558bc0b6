//! Reliability scoring for encyclopedia articles.
//!
//! A request flows through three stages: the [`resolver`] maps a user-supplied
//! title onto a canonical article (or a ranked suggestion list), the
//! [`signals`] collector derives quality facts from the article's markup and
//! revision history, and the [`scoring`] engine turns those facts into a score,
//! verdict, and highlights under a [`scoring::Policy`].

pub mod analysis;
pub mod config;
pub mod error;
pub mod patterns;
pub mod resolver;
pub mod scoring;
pub mod signals;
pub mod telemetry;
pub mod wiki;

pub use analysis::{
    analysis_router, AnalysisError, AnalysisOutcome, AnalyzeRequest, ReliabilityService,
};
pub use resolver::{CandidateResolver, ResolutionFailure, ResolutionResult, ResolveOptions};
pub use scoring::{
    apply_policy, Policy, PolicyOverrides, ScoreResult, StrictnessProfile, Verdict,
};
pub use signals::{SignalCollector, Signals, SignalsError};
pub use wiki::{MediaWikiClient, WikiApi, WikiError};
