#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use wikicred::wiki::{
    PageInfo, ParsedPage, Revision, RevisionHistory, SearchMode, TitleBatch, WikiApi, WikiError,
};

/// In-memory wiki with scripted search results and injectable failures.
#[derive(Default)]
pub struct FakeWiki {
    articles: HashMap<String, bool>,
    redirects: HashMap<String, String>,
    pages: HashMap<String, ParsedPage>,
    histories: HashMap<String, RevisionHistory>,
    searches: HashMap<(SearchMode, String), Vec<String>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeWiki {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn article(mut self, title: &str) -> Self {
        self.articles.insert(title.to_string(), false);
        self
    }

    pub fn disambiguation(mut self, title: &str) -> Self {
        self.articles.insert(title.to_string(), true);
        self
    }

    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    pub fn page(mut self, title: &str, page: ParsedPage) -> Self {
        self.pages.insert(title.to_string(), page);
        self
    }

    pub fn history(mut self, title: &str, history: RevisionHistory) -> Self {
        self.histories.insert(title.to_string(), history);
        self
    }

    pub fn search_results(mut self, mode: SearchMode, query: &str, titles: &[&str]) -> Self {
        self.searches.insert(
            (mode, query.to_string()),
            titles.iter().map(|title| title.to_string()).collect(),
        );
        self
    }

    /// Fail any call whose key (`parse:Title`, `revisions:Title`, `search`, `query`) matches.
    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex").clone()
    }

    fn record(&self, key: String) -> Result<(), WikiError> {
        self.calls.lock().expect("calls mutex").push(key.clone());
        let kind = key.split(':').next().unwrap_or_default();
        if self.failing.contains(&key) || self.failing.contains(kind) {
            return Err(WikiError::Transport {
                url: format!("fake://{key}"),
                message: "connection reset".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WikiApi for FakeWiki {
    async fn query_titles(&self, _lang: &str, titles: &[String]) -> Result<TitleBatch, WikiError> {
        self.record(format!("query:{}", titles.join("|")))?;

        let mut batch = TitleBatch::default();
        for title in titles {
            let canonical = match self.redirects.get(title) {
                Some(target) => {
                    batch.redirects.insert(title.clone(), target.clone());
                    target.clone()
                }
                None => title.clone(),
            };
            if batch.page(&canonical).is_some() {
                continue;
            }
            let page = match self.articles.get(&canonical) {
                Some(disambiguation) => PageInfo {
                    title: canonical,
                    missing: false,
                    disambiguation: *disambiguation,
                    protection_entries: 0,
                },
                None => PageInfo {
                    title: canonical,
                    missing: true,
                    ..PageInfo::default()
                },
            };
            batch.pages.push(page);
        }
        Ok(batch)
    }

    async fn parse_page(&self, _lang: &str, title: &str) -> Result<ParsedPage, WikiError> {
        self.record(format!("parse:{title}"))?;
        self.pages
            .get(title)
            .cloned()
            .ok_or_else(|| WikiError::Api {
                code: "missingtitle".to_string(),
                info: format!("The page {title} doesn't exist."),
            })
    }

    async fn search(
        &self,
        _lang: &str,
        query: &str,
        mode: SearchMode,
        limit: usize,
    ) -> Result<Vec<String>, WikiError> {
        self.record(format!("search:{mode:?}:{query}"))?;
        let mut titles = self
            .searches
            .get(&(mode, query.to_string()))
            .cloned()
            .unwrap_or_default();
        titles.truncate(limit);
        Ok(titles)
    }

    async fn revisions(&self, _lang: &str, title: &str) -> Result<RevisionHistory, WikiError> {
        self.record(format!("revisions:{title}"))?;
        Ok(self.histories.get(title).cloned().unwrap_or_default())
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

/// `count` revisions, newest first, `days_ago` before [`fixed_now`], cycling
/// through `editors` distinct users; every `revert_every`th one is tagged as a rollback.
pub fn history(
    count: usize,
    days_ago: i64,
    editors: usize,
    revert_every: Option<usize>,
) -> RevisionHistory {
    let newest = fixed_now() - Duration::days(days_ago);
    let revisions = (0..count)
        .map(|index| Revision {
            timestamp: Some(newest - Duration::hours(index as i64)),
            user: Some(format!("Editor{}", index % editors.max(1))),
            tags: match revert_every {
                Some(every) if index % every == 0 => vec!["mw-rollback".to_string()],
                _ => Vec::new(),
            },
        })
        .collect();
    RevisionHistory {
        revisions,
        protection_entries: 0,
    }
}

/// Article body with `references` cite anchors, `headings` sections, and about `words` words.
pub fn article_html(references: usize, headings: usize, words: usize) -> String {
    let mut html = String::new();
    for section in 0..headings {
        html.push_str(&format!("<h2 id=\"s{section}\">Section</h2>"));
    }
    html.push_str("<p>");
    html.push_str(&vec!["lorem"; words].join(" "));
    html.push_str("</p>");
    for reference in 0..references {
        html.push_str(&format!(
            "<sup id=\"cite_ref-{reference}\" class=\"reference\">\
             <a href=\"#cite_note-{reference}\">[{reference}]</a></sup>"
        ));
    }
    html
}

/// Like [`history`], anchored `days_ago` before the real clock.
pub fn recent_history(count: usize, days_ago: i64, editors: usize) -> RevisionHistory {
    let shift = Utc::now() - fixed_now();
    let mut history = history(count, days_ago, editors, None);
    for revision in &mut history.revisions {
        revision.timestamp = revision.timestamp.map(|timestamp| timestamp + shift);
    }
    history
}

pub fn well_sourced_page() -> ParsedPage {
    ParsedPage {
        html: article_html(20, 5, 2100),
        wikitext: String::new(),
        templates: vec!["Template:Featured article".to_string()],
    }
}
