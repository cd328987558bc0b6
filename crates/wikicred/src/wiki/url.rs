use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// A language edition plus article title extracted from a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRef {
    pub title: String,
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("not a valid URL")]
    Malformed,
    #[error("not a Wikipedia article URL")]
    NotWikipedia,
    #[error("URL does not name an article")]
    MissingTitle,
}

/// Parse `https://{lang}.wikipedia.org/wiki/{Title}` (desktop or mobile host)
/// or the `/w/index.php?title=` form.
pub fn parse_wiki_url(input: &str) -> Result<ArticleRef, UrlError> {
    let url = Url::parse(input.trim()).map_err(|_| UrlError::Malformed)?;
    let host = url
        .host_str()
        .map(str::to_ascii_lowercase)
        .ok_or(UrlError::NotWikipedia)?;
    let lang = language_from_host(&host).ok_or(UrlError::NotWikipedia)?;

    let raw_title = if let Some(encoded) = url.path().strip_prefix("/wiki/") {
        percent_decode_str(encoded)
            .decode_utf8()
            .map_err(|_| UrlError::Malformed)?
            .into_owned()
    } else if url.path() == "/w/index.php" {
        url.query_pairs()
            .find(|(key, _)| key == "title")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default()
    } else {
        String::new()
    };

    let without_fragment = raw_title.split('#').next().unwrap_or_default();
    let spaced = without_fragment.replace('_', " ");
    let title = strip_talk_prefix(spaced.trim()).to_string();

    if title.is_empty() {
        return Err(UrlError::MissingTitle);
    }

    Ok(ArticleRef { title, lang })
}

fn language_from_host(host: &str) -> Option<String> {
    let prefix = host.strip_suffix(".wikipedia.org")?;
    let lang = prefix.strip_suffix(".m").unwrap_or(prefix);
    let valid = !lang.is_empty() && lang.chars().all(|ch| ch.is_ascii_lowercase() || ch == '-');
    valid.then(|| lang.to_string())
}

fn strip_talk_prefix(title: &str) -> &str {
    match title.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("talk:") => &title[5..],
        _ => title,
    }
}

/// Links a reader can follow to check the inputs behind a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceLink {
    pub label: String,
    pub url: String,
}

// Matches JavaScript's encodeURIComponent unreserved set.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn evidence_links(title: &str, lang: &str) -> Vec<EvidenceLink> {
    let encoded = utf8_percent_encode(title, COMPONENT).to_string();
    let base = format!("https://{lang}.wikipedia.org");
    vec![
        EvidenceLink {
            label: "Article".to_string(),
            url: format!("{base}/wiki/{encoded}"),
        },
        EvidenceLink {
            label: "History".to_string(),
            url: format!("{base}/w/index.php?title={encoded}&action=history"),
        },
        EvidenceLink {
            label: "Talk".to_string(),
            url: format!("{base}/wiki/Talk:{encoded}"),
        },
    ]
}
