use std::sync::Arc;

use tracing::{info, warn};

use super::{AnalysisError, AnalysisOutcome, AnalysisReport, AnalyzeRequest, CandidateChoice};
use crate::config::{is_language_code, WikiConfig};
use crate::resolver::{
    CandidateResolver, ResolutionFailure, ResolutionResult, ResolveOptions,
    DEFAULT_SUGGESTION_LIMIT,
};
use crate::scoring::{apply_policy, Policy, ScoreResult};
use crate::signals::{SignalCollector, Signals};
use crate::wiki::{evidence_links, parse_wiki_url, WikiApi};

const FALLBACK_LANG: &str = "en";

/// Composes the resolver, signal collector, and scorer over one wiki backend.
pub struct ReliabilityService<A> {
    resolver: CandidateResolver<Arc<A>>,
    collector: SignalCollector<Arc<A>>,
    default_lang: String,
    suggestion_limit: usize,
}

impl<A> ReliabilityService<A>
where
    A: WikiApi + 'static,
{
    pub fn new(api: Arc<A>) -> Self {
        Self {
            resolver: CandidateResolver::new(Arc::clone(&api)),
            collector: SignalCollector::new(api),
            default_lang: FALLBACK_LANG.to_string(),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }

    pub fn from_config(api: Arc<A>, config: &WikiConfig) -> Self {
        let mut service = Self::new(api);
        service.default_lang = config.default_lang.clone();
        service.suggestion_limit = config.suggestion_limit;
        service
    }

    pub fn default_lang(&self) -> &str {
        &self.default_lang
    }

    pub fn default_resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            with_alternatives: true,
            limit: self.suggestion_limit,
        }
    }

    /// Language to use for a request, validated.
    pub fn language(&self, requested: Option<&str>) -> Result<String, AnalysisError> {
        match requested.map(str::trim).filter(|lang| !lang.is_empty()) {
            None => Ok(self.default_lang.clone()),
            Some(lang) if is_language_code(lang) => Ok(lang.to_string()),
            Some(lang) => Err(AnalysisError::InvalidLanguage(lang.to_string())),
        }
    }

    pub async fn resolve(
        &self,
        title: &str,
        lang: &str,
        options: ResolveOptions,
    ) -> Result<ResolutionResult, AnalysisError> {
        Ok(self.resolver.resolve(title, lang, options).await?)
    }

    pub async fn collect(&self, title: &str, lang: &str) -> Result<Signals, AnalysisError> {
        Ok(self.collector.collect(title, lang).await?)
    }

    pub fn score(&self, signals: &Signals, policy: &Policy) -> ScoreResult {
        apply_policy(signals, policy)
    }

    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisOutcome, AnalysisError> {
        // policy errors surface before any upstream call
        let policy = request
            .policy
            .unwrap_or_default()
            .build()?;

        let target = self.target(&request).await?;
        let Target {
            title,
            lang,
            resolved_from,
            suggestions,
        } = match target {
            Selection::Analyze(target) => target,
            Selection::Choose(choice) => return Ok(AnalysisOutcome::Choice(choice)),
        };

        let signals = self.collect(&title, &lang).await?;
        let outcome = self.score(&signals, &policy);

        info!(
            title = %title,
            lang = %lang,
            score = outcome.score(),
            verdict = outcome.verdict().label(),
            rejected = outcome.is_rejected(),
            "article analysed"
        );

        Ok(AnalysisOutcome::Report(Box::new(AnalysisReport {
            outcome,
            signals,
            evidence: evidence_links(&title, &lang),
            lang,
            title,
            resolved_from,
            suggestions,
            policy,
        })))
    }

    async fn target(&self, request: &AnalyzeRequest) -> Result<Selection, AnalysisError> {
        if let Some(url) = request.url.as_deref().filter(|url| !url.trim().is_empty()) {
            let article = parse_wiki_url(url)?;
            return Ok(Selection::Analyze(Target {
                title: article.title,
                lang: article.lang,
                resolved_from: None,
                suggestions: Vec::new(),
            }));
        }

        let input = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .ok_or(AnalysisError::MissingInput)?;
        let lang = self.language(request.lang.as_deref())?;

        let (canonical, suggestions) = match self
            .resolve(input, &lang, self.default_resolve_options())
            .await?
        {
            ResolutionResult::Resolved { title, suggestions } => (title, suggestions),
            ResolutionResult::Unresolved {
                reason,
                suggestions,
            } => {
                warn!(input, lang = %lang, reason = reason.label(), "title did not resolve");
                return Err(match reason {
                    ResolutionFailure::Disambiguation => {
                        AnalysisError::Disambiguation { suggestions }
                    }
                    ResolutionFailure::Missing => AnalysisError::NotFound { suggestions },
                });
            }
        };

        let resolved_from = (canonical != input).then(|| input.to_string());

        if request.prefer_choice {
            return Ok(Selection::Choose(CandidateChoice {
                suggestions,
                resolved_from,
                lang,
            }));
        }

        Ok(Selection::Analyze(Target {
            title: canonical,
            lang,
            resolved_from,
            suggestions,
        }))
    }
}

struct Target {
    title: String,
    lang: String,
    resolved_from: Option<String>,
    suggestions: Vec<String>,
}

enum Selection {
    Analyze(Target),
    Choose(CandidateChoice),
}
