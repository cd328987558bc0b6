use super::payload::{ApiErrorBody, ParseResponse, QueryResponse};
use super::{
    ParsedPage, RevisionHistory, SearchMode, TitleBatch, WikiApi, WikiError, REVISION_LIMIT,
    TITLES_PER_QUERY,
};
use crate::config::{is_language_code, WikiConfig};
use async_trait::async_trait;
use futures_util::future::try_join_all;
use serde::de::DeserializeOwned;
use tracing::debug;

/// `reqwest`-backed client for the MediaWiki action API.
///
/// No retries are attempted: a failed request surfaces as a [`WikiError`] and
/// callers decide whether to try again.
#[derive(Debug, Clone)]
pub struct MediaWikiClient {
    http: reqwest::Client,
    config: WikiConfig,
}

impl MediaWikiClient {
    pub fn new(config: WikiConfig) -> Result<Self, WikiError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|err| WikiError::Client(err.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &WikiConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        lang: &str,
        params: &[(&str, &str)],
    ) -> Result<T, WikiError> {
        if !is_language_code(lang) {
            return Err(WikiError::InvalidLanguage(lang.to_string()));
        }

        let url = self.config.endpoint(lang);
        debug!(%url, ?params, "wiki api request");

        let response = self
            .http
            .get(&url)
            .query(&[("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(|err| WikiError::Transport {
                url: url.clone(),
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WikiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await.map_err(|err| WikiError::Transport {
            url: url.clone(),
            message: err.to_string(),
        })?;

        serde_json::from_slice(&body).map_err(|err| WikiError::Decode {
            url,
            message: err.to_string(),
        })
    }

    async fn query(&self, lang: &str, params: &[(&str, &str)]) -> Result<QueryResponse, WikiError> {
        let mut all: Vec<(&str, &str)> = vec![("action", "query")];
        all.extend_from_slice(params);
        let response: QueryResponse = self.get_json(lang, &all).await?;
        if let Some(error) = response.error {
            return Err(api_error(error));
        }
        Ok(response)
    }

    async fn query_chunk(&self, lang: &str, titles: &[String]) -> Result<TitleBatch, WikiError> {
        let joined = titles.join("|");
        let response = self
            .query(
                lang,
                &[
                    ("redirects", "1"),
                    ("prop", "pageprops|info"),
                    ("inprop", "protection"),
                    ("titles", joined.as_str()),
                ],
            )
            .await?;
        Ok(response
            .query
            .map(|body| body.into_title_batch())
            .unwrap_or_default())
    }
}

fn api_error(error: ApiErrorBody) -> WikiError {
    WikiError::Api {
        code: error.code,
        info: error.info,
    }
}

#[async_trait]
impl WikiApi for MediaWikiClient {
    async fn query_titles(&self, lang: &str, titles: &[String]) -> Result<TitleBatch, WikiError> {
        if titles.is_empty() {
            return Ok(TitleBatch::default());
        }

        let batches = try_join_all(
            titles
                .chunks(TITLES_PER_QUERY)
                .map(|chunk| self.query_chunk(lang, chunk)),
        )
        .await?;

        let mut merged = TitleBatch::default();
        for batch in batches {
            merged.merge(batch);
        }
        Ok(merged)
    }

    async fn parse_page(&self, lang: &str, title: &str) -> Result<ParsedPage, WikiError> {
        let response: ParseResponse = self
            .get_json(
                lang,
                &[
                    ("action", "parse"),
                    ("page", title),
                    ("prop", "text|wikitext|templates"),
                ],
            )
            .await?;

        if let Some(error) = response.error {
            return Err(api_error(error));
        }

        Ok(response
            .parse
            .map(|body| body.into_parsed_page())
            .unwrap_or_default())
    }

    async fn search(
        &self,
        lang: &str,
        query: &str,
        mode: SearchMode,
        limit: usize,
    ) -> Result<Vec<String>, WikiError> {
        let limit = limit.to_string();
        let params: Vec<(&str, &str)> = match mode {
            SearchMode::NearMatch => vec![
                ("list", "search"),
                ("srwhat", "nearmatch"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
            ],
            SearchMode::Prefix => vec![
                ("list", "prefixsearch"),
                ("pssearch", query),
                ("pslimit", limit.as_str()),
            ],
            SearchMode::FullText => vec![
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
            ],
        };

        let response = self.query(lang, &params).await?;
        Ok(response
            .query
            .map(|body| body.into_search_titles())
            .unwrap_or_default())
    }

    async fn revisions(&self, lang: &str, title: &str) -> Result<RevisionHistory, WikiError> {
        let limit = REVISION_LIMIT.to_string();
        let response = self
            .query(
                lang,
                &[
                    ("prop", "revisions|info"),
                    ("rvprop", "ids|timestamp|user|flags|tags"),
                    ("rvlimit", limit.as_str()),
                    ("inprop", "protection"),
                    ("titles", title),
                ],
            )
            .await?;

        Ok(response
            .query
            .map(|body| body.into_revision_history())
            .unwrap_or_default())
    }
}
