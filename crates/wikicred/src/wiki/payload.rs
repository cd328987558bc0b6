//! Wire shapes for `format=json&formatversion=2` responses.
//!
//! Every field is optional or defaulted: upstream omits keys freely, and an
//! absent value must decode as "nothing there" rather than an error.

use super::{PageInfo, ParsedPage, Revision, RevisionHistory, TitleBatch};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub(crate) code: String,
    #[serde(default)]
    pub(crate) info: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub(crate) error: Option<ApiErrorBody>,
    #[serde(default)]
    pub(crate) query: Option<QueryBody>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QueryBody {
    #[serde(default)]
    normalized: Vec<TitleMapping>,
    #[serde(default)]
    redirects: Vec<TitleMapping>,
    #[serde(default)]
    pages: Vec<PagePayload>,
    #[serde(default)]
    search: Vec<SearchHit>,
    #[serde(default)]
    prefixsearch: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct TitleMapping {
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PagePayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    pageprops: Option<PageProps>,
    #[serde(default)]
    protection: Vec<serde_json::Value>,
    #[serde(default)]
    revisions: Vec<RevisionPayload>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RevisionPayload {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

impl QueryBody {
    pub(crate) fn into_title_batch(self) -> TitleBatch {
        let pages = self
            .pages
            .into_iter()
            .filter_map(|page| {
                let title = page.title?;
                Some(PageInfo {
                    title,
                    missing: page.missing || page.invalid,
                    disambiguation: page
                        .pageprops
                        .map(|props| props.disambiguation.is_some())
                        .unwrap_or(false),
                    protection_entries: page.protection.len(),
                })
            })
            .collect();

        TitleBatch {
            pages,
            normalized: collect_mappings(self.normalized),
            redirects: collect_mappings(self.redirects),
        }
    }

    pub(crate) fn into_search_titles(self) -> Vec<String> {
        self.search
            .into_iter()
            .chain(self.prefixsearch)
            .map(|hit| hit.title)
            .collect()
    }

    pub(crate) fn into_revision_history(self) -> RevisionHistory {
        let Some(page) = self.pages.into_iter().next() else {
            return RevisionHistory::default();
        };

        let revisions = page
            .revisions
            .into_iter()
            .map(|revision| Revision {
                timestamp: revision.timestamp.as_deref().and_then(parse_timestamp),
                user: revision.user.filter(|user| !user.is_empty()),
                tags: revision.tags,
            })
            .collect();

        RevisionHistory {
            revisions,
            protection_entries: page.protection.len(),
        }
    }
}

fn collect_mappings(mappings: Vec<TitleMapping>) -> std::collections::HashMap<String, String> {
    mappings
        .into_iter()
        .filter_map(|mapping| Some((mapping.from?, mapping.to?)))
        .collect()
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ParseResponse {
    #[serde(default)]
    pub(crate) error: Option<ApiErrorBody>,
    #[serde(default)]
    pub(crate) parse: Option<ParseBody>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ParseBody {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    wikitext: Option<String>,
    #[serde(default)]
    templates: Vec<TemplatePayload>,
}

#[derive(Debug, Deserialize)]
struct TemplatePayload {
    #[serde(default)]
    title: Option<String>,
}

impl ParseBody {
    pub(crate) fn into_parsed_page(self) -> ParsedPage {
        ParsedPage {
            html: self.text.unwrap_or_default(),
            wikitext: self.wikitext.unwrap_or_default(),
            templates: self
                .templates
                .into_iter()
                .filter_map(|template| template.title)
                .collect(),
        }
    }
}
