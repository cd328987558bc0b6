//! Pure text analysis over fetched payloads. Nothing here touches the network.

use crate::patterns::{
    citation_needed_markers, has_quality_label, talk_issue_regex, MarkupSource, QualityClass,
    PROBLEM_TEMPLATE_FRAGMENTS, REVERT_TAG_FRAGMENTS,
};
use crate::signals::NO_HISTORY_DAYS;
use crate::wiki::{ParsedPage, RevisionHistory};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

struct MarkupRegexes {
    script: Regex,
    style: Regex,
    tag: Regex,
    heading: Regex,
    cite_ref_id: Regex,
    reference_sup: Regex,
    wikitext_ref: Regex,
    noteref_role: Regex,
}

fn regexes() -> &'static MarkupRegexes {
    static REGEXES: OnceLock<MarkupRegexes> = OnceLock::new();
    REGEXES.get_or_init(|| MarkupRegexes {
        script: Regex::new(r"(?is)<script\b.*?</script>").expect("static pattern"),
        style: Regex::new(r"(?is)<style\b.*?</style>").expect("static pattern"),
        tag: Regex::new(r"<[^>]+>").expect("static pattern"),
        heading: Regex::new(r"(?i)<h[2-4][^>]*>").expect("static pattern"),
        cite_ref_id: Regex::new(r#"(?i)id="cite_ref-[^"]+""#).expect("static pattern"),
        reference_sup: Regex::new(r#"(?i)<sup[^>]*class="[^"]*\breference\b[^"]*"[^>]*>"#)
            .expect("static pattern"),
        wikitext_ref: Regex::new(r"(?i)<ref[\s>]").expect("static pattern"),
        noteref_role: Regex::new(r#"(?i)role="doc-noteref""#).expect("static pattern"),
    })
}

/// Facts taken from the article body and its templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSignals {
    pub reference_count: u32,
    pub citation_needed: u32,
    pub problem_templates: u32,
    pub word_count: u32,
    pub heading_count: u32,
    pub is_stub: bool,
    pub is_good_article: bool,
    pub is_featured_article: bool,
}

/// Facts taken from the revision list and page metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionSignals {
    pub days_since_last_edit: f64,
    pub revert_rate: f64,
    pub unique_editors: u32,
    pub is_protected: bool,
}

pub fn content_signals(page: &ParsedPage) -> ContentSignals {
    let templates: Vec<String> = page
        .templates
        .iter()
        .map(|name| name.to_lowercase())
        .collect();

    ContentSignals {
        reference_count: reference_count(&page.html, &page.wikitext),
        citation_needed: citation_needed_count(&page.html, &page.wikitext),
        problem_templates: problem_template_count(&templates),
        word_count: word_count(&page.html),
        heading_count: count(&regexes().heading, &page.html),
        is_stub: has_quality_label(&templates, QualityClass::Stub),
        is_good_article: has_quality_label(&templates, QualityClass::Good),
        is_featured_article: has_quality_label(&templates, QualityClass::Featured),
    }
}

pub fn revision_signals(history: &RevisionHistory, now: DateTime<Utc>) -> RevisionSignals {
    let revisions = &history.revisions;

    let days_since_last_edit = revisions
        .first()
        .and_then(|revision| revision.timestamp)
        .map(|last_edit| ((now - last_edit).num_milliseconds() as f64 / 86_400_000.0).max(0.0))
        .unwrap_or(NO_HISTORY_DAYS);

    let revert_rate = if revisions.is_empty() {
        0.0
    } else {
        let reverts = revisions
            .iter()
            .filter(|revision| {
                revision.tags.iter().any(|tag| {
                    REVERT_TAG_FRAGMENTS
                        .iter()
                        .any(|fragment| tag.contains(fragment))
                })
            })
            .count();
        reverts as f64 / revisions.len() as f64
    };

    let unique_editors = revisions
        .iter()
        .filter_map(|revision| revision.user.as_deref())
        .collect::<HashSet<_>>()
        .len() as u32;

    RevisionSignals {
        days_since_last_edit,
        revert_rate,
        unique_editors,
        is_protected: history.protection_entries > 0,
    }
}

pub fn talk_issue_count(talk_html: &str) -> u32 {
    count(talk_issue_regex(), talk_html)
}

fn count(regex: &Regex, text: &str) -> u32 {
    regex.find_iter(text).count() as u32
}

fn word_count(html: &str) -> u32 {
    let re = regexes();
    let without_scripts = re.script.replace_all(html, " ");
    let without_styles = re.style.replace_all(&without_scripts, " ");
    let plain = re.tag.replace_all(&without_styles, " ");
    plain.split_whitespace().count() as u32
}

/// Unique inline citation anchors, falling back to wikitext `<ref>` tags and
/// then to elements marked as footnote references.
fn reference_count(html: &str, wikitext: &str) -> u32 {
    let re = regexes();

    let unique_ids: HashSet<&str> = re
        .cite_ref_id
        .find_iter(html)
        .map(|found| found.as_str())
        .collect();
    let mut total = unique_ids.len() as u32;

    if total == 0 {
        total = count(&re.reference_sup, html);
    }
    if total == 0 {
        total = count(&re.wikitext_ref, wikitext);
    }
    if total == 0 {
        total = count(&re.noteref_role, html);
    }
    total
}

/// Markers in the HTML and the wikitext are summed; the same underlying
/// marker is usually counted once in each.
fn citation_needed_count(html: &str, wikitext: &str) -> u32 {
    citation_needed_markers()
        .iter()
        .map(|marker| match marker.source {
            MarkupSource::RenderedHtml => count(&marker.regex, html),
            MarkupSource::Wikitext => count(&marker.regex, wikitext),
        })
        .sum()
}

fn problem_template_count(templates: &[String]) -> u32 {
    templates
        .iter()
        .filter(|name| {
            PROBLEM_TEMPLATE_FRAGMENTS
                .iter()
                .any(|fragment| name.contains(fragment))
        })
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::Revision;
    use chrono::{Duration, TimeZone};

    fn page(html: &str, wikitext: &str, templates: &[&str]) -> ParsedPage {
        ParsedPage {
            html: html.to_string(),
            wikitext: wikitext.to_string(),
            templates: templates.iter().map(|name| name.to_string()).collect(),
        }
    }

    #[test]
    fn word_count_ignores_scripts_styles_and_tags() {
        let html = r#"<div><style>.a { color: red }</style><p>Rust is a <b>systems</b> language.</p>
            <script type="text/javascript">var ignored = "many words here";</script>
            <p>Fast</p></div>"#;
        assert_eq!(word_count(html), 6);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn headings_count_levels_two_to_four_only() {
        let html = "<h1>T</h1><h2 id=\"a\">A</h2><h3>B</h3><H4>C</H4><h5>D</h5>";
        let signals = content_signals(&page(html, "", &[]));
        assert_eq!(signals.heading_count, 3);
    }

    #[test]
    fn references_prefer_unique_cite_ids() {
        let html = r#"<sup id="cite_ref-1" class="reference"></sup>
            <sup id="cite_ref-1" class="reference"></sup>
            <sup id="cite_ref-smith-2" class="reference"></sup>"#;
        assert_eq!(reference_count(html, "<ref>a</ref><ref>b</ref><ref>c</ref>"), 2);
    }

    #[test]
    fn references_fall_back_to_wikitext_then_roles() {
        assert_eq!(reference_count("<p>none</p>", "a<ref>x</ref> b<ref name=y/> <references/>"), 2);
        assert_eq!(
            reference_count(r#"<a role="doc-noteref">1</a><a role="doc-noteref">2</a>"#, ""),
            2
        );
        assert_eq!(reference_count("", ""), 0);
    }

    #[test]
    fn citation_needed_sums_html_and_wikitext_markers() {
        let html = r#"<sup class="Template-Fact">[<i>citation needed</i>]</sup>
            <sup>[lähde?]</sup>"#;
        let wikitext = "claim{{Citation needed|date=May 2024}} other{{cn}} fi{{lähde?}}";
        // Template-Fact + "citation needed" + [lähde?] + {{Citation needed + {{cn + {{lähde?}}
        assert_eq!(citation_needed_count(html, wikitext), 6);
    }

    #[test]
    fn template_flags_and_problem_banners() {
        let signals = content_signals(&page(
            "",
            "",
            &[
                "Template:Disputed",
                "Template:Advert",
                "Template:Good article",
                "Malline:Tynkä",
                "Template:Infobox country",
            ],
        ));
        assert_eq!(signals.problem_templates, 2);
        assert!(signals.is_good_article);
        assert!(signals.is_stub);
        assert!(!signals.is_featured_article);
    }

    #[test]
    fn revision_facts_from_history() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let history = RevisionHistory {
            revisions: vec![
                Revision {
                    timestamp: Some(now - Duration::days(3)),
                    user: Some("Alice".to_string()),
                    tags: vec!["mw-rollback".to_string()],
                },
                Revision {
                    timestamp: Some(now - Duration::days(9)),
                    user: Some("Bob".to_string()),
                    tags: vec![],
                },
                Revision {
                    timestamp: Some(now - Duration::days(10)),
                    user: Some("Alice".to_string()),
                    tags: vec!["mw-undo".to_string(), "visualeditor".to_string()],
                },
                Revision {
                    timestamp: None,
                    user: None,
                    tags: vec![],
                },
            ],
            protection_entries: 2,
        };

        let facts = revision_signals(&history, now);
        assert!((facts.days_since_last_edit - 3.0).abs() < 1e-9);
        assert!((facts.revert_rate - 0.5).abs() < 1e-9);
        assert_eq!(facts.unique_editors, 2);
        assert!(facts.is_protected);
    }

    #[test]
    fn empty_history_is_neutral() {
        let facts = revision_signals(&RevisionHistory::default(), Utc::now());
        assert_eq!(facts.days_since_last_edit, NO_HISTORY_DAYS);
        assert_eq!(facts.revert_rate, 0.0);
        assert_eq!(facts.unique_editors, 0);
        assert!(!facts.is_protected);
    }

    #[test]
    fn talk_keywords_are_case_insensitive() {
        let html = "<p>NPOV dispute; proposed Merge. Controversial. Cleanup tag.</p>";
        assert_eq!(talk_issue_count(html), 5);
    }
}
