//! Maps a possibly ambiguous or misspelled title onto a canonical article.

mod ranking;

use crate::patterns::is_disambiguation_title;
use crate::wiki::{SearchMode, WikiApi, WikiError};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use tracing::{debug, info};

/// Prefix searches are capped lower than full-text ones upstream-side.
const PREFIX_SEARCH_CAP: usize = 5;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub with_alternatives: bool,
    pub limit: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            with_alternatives: true,
            limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

/// Why an input title did not resolve to a usable article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionFailure {
    Disambiguation,
    Missing,
}

impl ResolutionFailure {
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionFailure::Disambiguation => "disambiguation",
            ResolutionFailure::Missing => "missing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    /// `suggestions` starts with `title` and never repeats it.
    Resolved {
        title: String,
        suggestions: Vec<String>,
    },
    Unresolved {
        reason: ResolutionFailure,
        suggestions: Vec<String>,
    },
}

impl ResolutionResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ResolutionResult::Resolved { .. })
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            ResolutionResult::Resolved { title, .. } => Some(title),
            ResolutionResult::Unresolved { .. } => None,
        }
    }

    pub fn suggestions(&self) -> &[String] {
        match self {
            ResolutionResult::Resolved { suggestions, .. }
            | ResolutionResult::Unresolved { suggestions, .. } => suggestions,
        }
    }
}

#[derive(Serialize)]
struct ResolutionView<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<ResolutionFailure>,
    suggestions: &'a [String],
}

impl Serialize for ResolutionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let view = match self {
            ResolutionResult::Resolved { title, suggestions } => ResolutionView {
                ok: true,
                title: Some(title),
                reason: None,
                suggestions,
            },
            ResolutionResult::Unresolved {
                reason,
                suggestions,
            } => ResolutionView {
                ok: false,
                title: None,
                reason: Some(*reason),
                suggestions,
            },
        };
        view.serialize(serializer)
    }
}

enum ExactMatch {
    Article(String),
    Failed(ResolutionFailure),
}

/// Title resolution over any [`WikiApi`] implementation.
pub struct CandidateResolver<A> {
    api: A,
}

impl<A: WikiApi> CandidateResolver<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Resolve `input` in the `lang` edition. Upstream failures are returned
    /// as errors without retrying.
    pub async fn resolve(
        &self,
        input: &str,
        lang: &str,
        options: ResolveOptions,
    ) -> Result<ResolutionResult, WikiError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(ResolutionResult::Unresolved {
                reason: ResolutionFailure::Missing,
                suggestions: Vec::new(),
            });
        }

        let limit = options.limit.max(1);
        let (exact, alternatives) = tokio::try_join!(
            self.lookup_exact(input, lang),
            self.alternatives(input, lang, limit, options.with_alternatives),
        )?;

        let result = match exact {
            ExactMatch::Article(title) => {
                let mut suggestions = Vec::with_capacity(alternatives.len() + 1);
                suggestions.push(title.clone());
                suggestions.extend(alternatives.into_iter().filter(|alt| *alt != title));
                ResolutionResult::Resolved { title, suggestions }
            }
            ExactMatch::Failed(reason) => ResolutionResult::Unresolved {
                reason,
                suggestions: alternatives,
            },
        };

        info!(
            input,
            lang,
            ok = result.is_ok(),
            suggestions = result.suggestions().len(),
            "title resolved"
        );
        Ok(result)
    }

    async fn lookup_exact(&self, input: &str, lang: &str) -> Result<ExactMatch, WikiError> {
        let batch = self.api.query_titles(lang, &[input.to_string()]).await?;
        let canonical = batch.canonical_title(input);
        let page = batch.page(&canonical).or_else(|| batch.pages.first());

        let Some(page) = page.filter(|page| !page.missing) else {
            return Ok(ExactMatch::Failed(ResolutionFailure::Missing));
        };

        if page.disambiguation || is_disambiguation_title(&page.title) {
            return Ok(ExactMatch::Failed(ResolutionFailure::Disambiguation));
        }

        Ok(ExactMatch::Article(page.title.clone()))
    }

    async fn alternatives(
        &self,
        input: &str,
        lang: &str,
        limit: usize,
        enabled: bool,
    ) -> Result<Vec<String>, WikiError> {
        if !enabled {
            return Ok(Vec::new());
        }

        let qualified = format!("{input} (");
        let (near, prefix, full, parenthetical) = tokio::try_join!(
            self.api.search(lang, input, SearchMode::NearMatch, limit),
            self.api
                .search(lang, input, SearchMode::Prefix, limit.min(PREFIX_SEARCH_CAP)),
            self.api.search(lang, input, SearchMode::FullText, limit),
            self.api.search(lang, &qualified, SearchMode::Prefix, limit),
        )?;

        let candidates: Vec<String> = near
            .into_iter()
            .chain(prefix)
            .chain(full)
            .chain(parenthetical)
            .collect();
        debug!(input, candidates = candidates.len(), "search candidates gathered");

        let ranked = ranking::rank_candidates(input, candidates);
        let mut kept = self.filter_existing(lang, ranked).await?;
        kept.truncate(limit);
        Ok(kept)
    }

    /// Keep candidates that exist and are not disambiguation pages, replacing
    /// redirects with their targets and collapsing duplicate targets.
    async fn filter_existing(
        &self,
        lang: &str,
        candidates: Vec<String>,
    ) -> Result<Vec<String>, WikiError> {
        if candidates.is_empty() {
            return Ok(candidates);
        }

        let batch = self.api.query_titles(lang, &candidates).await?;
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for candidate in &candidates {
            let canonical = batch.canonical_title(candidate);
            let Some(page) = batch.page(&canonical) else {
                continue;
            };
            if page.missing || page.disambiguation || is_disambiguation_title(&canonical) {
                continue;
            }
            if seen.insert(canonical.clone()) {
                kept.push(canonical);
            }
        }

        Ok(kept)
    }
}
