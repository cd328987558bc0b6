//! The reqwest client against a mocked MediaWiki action API.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wikicred::config::WikiConfig;
use wikicred::wiki::{MediaWikiClient, SearchMode, WikiApi, WikiError};

fn client(server: &MockServer) -> MediaWikiClient {
    let config = WikiConfig {
        api_url: format!("{}/{{lang}}/api.php", server.uri()),
        user_agent: "wikicred-tests/0.1".to_string(),
        ..WikiConfig::default()
    };
    MediaWikiClient::new(config).expect("client builds")
}

#[tokio::test]
async fn title_query_follows_normalisation_and_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/api.php"))
        .and(query_param("action", "query"))
        .and(query_param("redirects", "1"))
        .and(query_param("formatversion", "2"))
        .and(query_param("titles", "nyc|Mercury|Xyzzy"))
        .and(header("user-agent", "wikicred-tests/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": {
                "normalized": [{ "fromencoded": false, "from": "nyc", "to": "Nyc" }],
                "redirects": [{ "from": "Nyc", "to": "New York City" }],
                "pages": [
                    { "pageid": 645042, "ns": 0, "title": "New York City", "pageprops": {} },
                    {
                        "pageid": 19694,
                        "ns": 0,
                        "title": "Mercury",
                        "pageprops": { "disambiguation": "" }
                    },
                    { "ns": 0, "title": "Xyzzy", "missing": true }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let titles = vec!["nyc".to_string(), "Mercury".to_string(), "Xyzzy".to_string()];
    let batch = client(&server)
        .query_titles("en", &titles)
        .await
        .expect("query succeeds");

    assert_eq!(batch.canonical_title("nyc"), "New York City");
    let city = batch.page("New York City").expect("city page");
    assert!(!city.missing && !city.disambiguation);
    assert!(batch.page("Mercury").expect("mercury page").disambiguation);
    assert!(batch.page("Xyzzy").expect("missing page").missing);
}

#[tokio::test]
async fn large_title_batches_are_split() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/api.php"))
        .and(query_param("action", "query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "query": { "pages": [] } })))
        .expect(2)
        .mount(&server)
        .await;

    let titles: Vec<String> = (0..60).map(|index| format!("Page {index}")).collect();
    let batch = client(&server)
        .query_titles("en", &titles)
        .await
        .expect("query succeeds");

    assert!(batch.pages.is_empty());
}

#[tokio::test]
async fn near_match_and_prefix_searches_decode_titles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("list", "search"))
        .and(query_param("srwhat", "nearmatch"))
        .and(query_param("srsearch", "Helsinki"))
        .and(query_param("srlimit", "8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": { "search": [{ "ns": 0, "title": "Helsinki" }] }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("list", "prefixsearch"))
        .and(query_param("pssearch", "Helsinki ("))
        .and(query_param("pslimit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": { "prefixsearch": [
                { "ns": 0, "title": "Helsinki (ship)", "pageid": 3 },
                { "ns": 0, "title": "Helsinki (band)", "pageid": 4 }
            ] }
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let near = client
        .search("fi", "Helsinki", SearchMode::NearMatch, 8)
        .await;
    let prefix = client
        .search("fi", "Helsinki (", SearchMode::Prefix, 5)
        .await
        .expect("prefix search succeeds");

    assert_eq!(near.expect("near match succeeds"), vec!["Helsinki"]);
    assert_eq!(prefix, vec!["Helsinki (ship)", "Helsinki (band)"]);
}

#[tokio::test]
async fn parse_returns_html_wikitext_and_templates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/api.php"))
        .and(query_param("action", "parse"))
        .and(query_param("page", "Rust (programming language)"))
        .and(query_param("prop", "text|wikitext|templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "parse": {
                "title": "Rust (programming language)",
                "pageid": 29414838,
                "text": "<p>Rust is a language.</p>",
                "wikitext": "Rust is a language.{{cn}}",
                "templates": [
                    { "ns": 10, "title": "Template:Cn", "exists": true },
                    { "ns": 10, "title": "Template:Good article", "exists": true }
                ]
            }
        })))
        .mount(&server)
        .await;

    let page = client(&server)
        .parse_page("en", "Rust (programming language)")
        .await
        .expect("parse succeeds");

    assert_eq!(page.html, "<p>Rust is a language.</p>");
    assert!(page.wikitext.ends_with("{{cn}}"));
    assert_eq!(page.templates, vec!["Template:Cn", "Template:Good article"]);
}

#[tokio::test]
async fn revisions_carry_tags_users_and_protection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("prop", "revisions|info"))
        .and(query_param("inprop", "protection"))
        .and(query_param("rvlimit", "200"))
        .and(query_param("titles", "Rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": { "pages": [{
                "pageid": 1,
                "title": "Rust",
                "protection": [{ "type": "edit", "level": "autoconfirmed", "expiry": "infinity" }],
                "revisions": [
                    {
                        "revid": 2,
                        "user": "Alice",
                        "timestamp": "2025-05-30T12:00:00Z",
                        "tags": ["mw-undo"]
                    },
                    { "revid": 1, "user": "Bob", "timestamp": "2025-05-01T00:00:00Z", "tags": [] }
                ]
            }] }
        })))
        .mount(&server)
        .await;

    let history = client(&server)
        .revisions("en", "Rust")
        .await
        .expect("revisions succeed");

    assert_eq!(history.revisions.len(), 2);
    assert_eq!(history.protection_entries, 1);
    assert_eq!(history.revisions[0].user.as_deref(), Some("Alice"));
    assert_eq!(history.revisions[0].tags, vec!["mw-undo"]);
    assert!(history.revisions[1].timestamp.is_some());
}

#[tokio::test]
async fn api_error_body_becomes_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "code": "missingtitle", "info": "The page you specified doesn't exist." }
        })))
        .mount(&server)
        .await;

    let error = client(&server)
        .parse_page("en", "Talk:Nothing here")
        .await
        .expect_err("api error surfaces");

    match error {
        WikiError::Api { code, .. } => assert_eq!(code, "missingtitle"),
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_failures_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let error = client(&server)
        .revisions("en", "Rust")
        .await
        .expect_err("status error surfaces");

    assert!(matches!(error, WikiError::Status { status: 503, .. }));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let error = client(&server)
        .search("en", "Rust", SearchMode::FullText, 8)
        .await
        .expect_err("decode error surfaces");

    assert!(matches!(error, WikiError::Decode { .. }));
}

#[tokio::test]
async fn language_codes_are_validated_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let error = client(&server)
        .parse_page("evil.example.com/", "Rust")
        .await
        .expect_err("invalid language");

    assert!(matches!(error, WikiError::InvalidLanguage(_)));
}
