use super::extract::{content_signals, revision_signals, talk_issue_count};
use super::Signals;
use crate::wiki::{ParsedPage, WikiApi, WikiError};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Canonical talk namespace prefix; accepted by every language edition.
pub const TALK_PREFIX: &str = "Talk:";

/// Gathers [`Signals`] for a canonical title from three independent payloads.
pub struct SignalCollector<A> {
    api: A,
}

impl<A: WikiApi> SignalCollector<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn collect(&self, title: &str, lang: &str) -> Result<Signals, WikiError> {
        self.collect_at(title, lang, Utc::now()).await
    }

    /// Same as [`collect`](Self::collect) with an explicit clock for staleness.
    pub async fn collect_at(
        &self,
        title: &str,
        lang: &str,
        now: DateTime<Utc>,
    ) -> Result<Signals, WikiError> {
        let (article, history, talk) = tokio::join!(
            self.api.parse_page(lang, title),
            self.api.revisions(lang, title),
            self.talk_page(title, lang),
        );
        let article = article?;
        let history = history?;

        let signals = Signals::assemble(
            content_signals(&article),
            revision_signals(&history, now),
            talk_issue_count(&talk.html),
        );

        info!(
            title,
            lang,
            references = signals.reference_count,
            words = signals.word_count,
            revisions = history.revisions.len(),
            "signals collected"
        );
        Ok(signals)
    }

    /// The talk page is optional evidence: any failure degrades to an empty page.
    async fn talk_page(&self, title: &str, lang: &str) -> ParsedPage {
        let talk_title = format!("{TALK_PREFIX}{title}");
        match self.api.parse_page(lang, &talk_title).await {
            Ok(page) => page,
            Err(err) => {
                warn!(title, lang, error = %err, "talk page unavailable; assuming no issues");
                ParsedPage::default()
            }
        }
    }
}
