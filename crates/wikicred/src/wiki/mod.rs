//! Read-only access to an encyclopedia's query/parse API.
//!
//! [`WikiApi`] is the network seam: the resolver and signal collector only
//! ever see these four operations, so they can be driven by
//! [`MediaWikiClient`] in production and by in-memory fakes in tests.

mod client;
mod payload;
pub mod url;

pub use client::MediaWikiClient;
pub use url::{evidence_links, parse_wiki_url, ArticleRef, EvidenceLink, UrlError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Search strategies offered by the upstream index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    NearMatch,
    Prefix,
    FullText,
}

/// One page entry from a title query, after redirects were followed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub title: String,
    pub missing: bool,
    /// The structural `disambiguation` page property was present.
    pub disambiguation: bool,
    pub protection_entries: usize,
}

/// Result of a batched title query: pages plus the title rewrites applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleBatch {
    pub pages: Vec<PageInfo>,
    /// Title normalisation (`foo_bar` -> `Foo bar`), keyed by the submitted form.
    pub normalized: HashMap<String, String>,
    /// Redirect hops, keyed by the redirecting title.
    pub redirects: HashMap<String, String>,
}

impl TitleBatch {
    /// Follow normalisation then redirects for a submitted title.
    pub fn canonical_title(&self, submitted: &str) -> String {
        let normalized = self
            .normalized
            .get(submitted)
            .map(String::as_str)
            .unwrap_or(submitted);
        self.redirects
            .get(normalized)
            .cloned()
            .unwrap_or_else(|| normalized.to_string())
    }

    pub fn page(&self, title: &str) -> Option<&PageInfo> {
        self.pages.iter().find(|page| page.title == title)
    }

    pub fn merge(&mut self, other: TitleBatch) {
        self.pages.extend(other.pages);
        self.normalized.extend(other.normalized);
        self.redirects.extend(other.redirects);
    }
}

/// Rendered and raw forms of a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub html: String,
    pub wikitext: String,
    /// Transcluded template names as returned upstream (e.g. `Template:Cn`).
    pub templates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub timestamp: Option<DateTime<Utc>>,
    pub user: Option<String>,
    pub tags: Vec<String>,
}

/// Most recent revisions (newest first) plus page protection metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionHistory {
    pub revisions: Vec<Revision>,
    pub protection_entries: usize,
}

/// Upper bound on revisions requested per page.
pub const REVISION_LIMIT: usize = 200;

/// Upstream limit on titles per query request.
pub const TITLES_PER_QUERY: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum WikiError {
    #[error("'{0}' is not a language code")]
    InvalidLanguage(String),
    #[error("unable to build http client: {0}")]
    Client(String),
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("upstream returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("unexpected response shape from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("upstream api error {code}: {info}")]
    Api { code: String, info: String },
}

#[async_trait]
pub trait WikiApi: Send + Sync {
    /// Look up titles with redirect following enabled.
    async fn query_titles(&self, lang: &str, titles: &[String]) -> Result<TitleBatch, WikiError>;

    /// Rendered HTML, wikitext, and template list for one page.
    async fn parse_page(&self, lang: &str, title: &str) -> Result<ParsedPage, WikiError>;

    async fn search(
        &self,
        lang: &str,
        query: &str,
        mode: SearchMode,
        limit: usize,
    ) -> Result<Vec<String>, WikiError>;

    /// Up to [`REVISION_LIMIT`] most recent revisions.
    async fn revisions(&self, lang: &str, title: &str) -> Result<RevisionHistory, WikiError>;
}

#[async_trait]
impl<T> WikiApi for std::sync::Arc<T>
where
    T: WikiApi + ?Sized,
{
    async fn query_titles(&self, lang: &str, titles: &[String]) -> Result<TitleBatch, WikiError> {
        (**self).query_titles(lang, titles).await
    }

    async fn parse_page(&self, lang: &str, title: &str) -> Result<ParsedPage, WikiError> {
        (**self).parse_page(lang, title).await
    }

    async fn search(
        &self,
        lang: &str,
        query: &str,
        mode: SearchMode,
        limit: usize,
    ) -> Result<Vec<String>, WikiError> {
        (**self).search(lang, query, mode, limit).await
    }

    async fn revisions(&self, lang: &str, title: &str) -> Result<RevisionHistory, WikiError> {
        (**self).revisions(lang, title).await
    }
}
