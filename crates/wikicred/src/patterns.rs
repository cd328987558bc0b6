//! String tables used for heuristic classification.
//!
//! Every rule here is a denylist-style substring or regex match rather than a
//! structural guarantee. Rows from all language editions apply to every
//! article; new editions are supported by adding rows, not branches.

use regex::Regex;
use std::sync::OnceLock;

/// How a disambiguation title suffix is matched against a lowercased title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixMatch {
    Contains,
    EndsWith,
}

#[derive(Debug, Clone, Copy)]
pub struct DisambiguationSuffix {
    pub pattern: &'static str,
    pub mode: SuffixMatch,
}

pub const DISAMBIGUATION_SUFFIXES: &[DisambiguationSuffix] = &[
    DisambiguationSuffix {
        pattern: "(disambiguation)",
        mode: SuffixMatch::Contains,
    },
    DisambiguationSuffix {
        pattern: "(täsmennyssivu)",
        mode: SuffixMatch::Contains,
    },
    DisambiguationSuffix {
        pattern: " (täsmennys)",
        mode: SuffixMatch::EndsWith,
    },
];

/// Title-based disambiguation check; complements the `disambiguation` page property.
pub fn is_disambiguation_title(title: &str) -> bool {
    let lower = title.to_lowercase();
    DISAMBIGUATION_SUFFIXES.iter().any(|suffix| match suffix.mode {
        SuffixMatch::Contains => lower.contains(suffix.pattern),
        SuffixMatch::EndsWith => lower.ends_with(suffix.pattern),
    })
}

/// Where a citation-needed marker pattern is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupSource {
    RenderedHtml,
    Wikitext,
}

#[derive(Debug, Clone, Copy)]
pub struct MarkerPattern {
    pub source: MarkupSource,
    pub regex: &'static str,
}

pub const CITATION_NEEDED_PATTERNS: &[MarkerPattern] = &[
    MarkerPattern {
        source: MarkupSource::RenderedHtml,
        regex: r"(?i)Template-Fact",
    },
    MarkerPattern {
        source: MarkupSource::RenderedHtml,
        regex: r"(?i)\bcitation needed\b",
    },
    MarkerPattern {
        source: MarkupSource::RenderedHtml,
        regex: r"(?i)\[lähde\?\]",
    },
    MarkerPattern {
        source: MarkupSource::Wikitext,
        regex: r"(?i)\{\{\s*(citation needed|fact|cn)\b",
    },
    MarkerPattern {
        source: MarkupSource::Wikitext,
        regex: r"(?i)\{\{\s*lähde\?\s*\}\}",
    },
];

/// Lowercase fragments that mark a template as a content problem banner.
pub const PROBLEM_TEMPLATE_FRAGMENTS: &[&str] =
    &["disputed", "advert", "unreferenced", "coi", "hoax"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityClass {
    Stub,
    Good,
    Featured,
}

#[derive(Debug, Clone, Copy)]
pub struct QualityLabel {
    pub class: QualityClass,
    pub fragment: &'static str,
}

pub const QUALITY_LABELS: &[QualityLabel] = &[
    QualityLabel {
        class: QualityClass::Stub,
        fragment: "stub",
    },
    QualityLabel {
        class: QualityClass::Stub,
        fragment: "tynkä",
    },
    QualityLabel {
        class: QualityClass::Good,
        fragment: "good article",
    },
    QualityLabel {
        class: QualityClass::Good,
        fragment: "laadukas artikkeli",
    },
    QualityLabel {
        class: QualityClass::Featured,
        fragment: "featured article",
    },
    QualityLabel {
        class: QualityClass::Featured,
        fragment: "valittu artikkeli",
    },
];

/// Whether any lowercase template name carries a label of the given class.
pub fn has_quality_label(templates: &[String], class: QualityClass) -> bool {
    QUALITY_LABELS
        .iter()
        .filter(|label| label.class == class)
        .any(|label| templates.iter().any(|name| name.contains(label.fragment)))
}

/// Keywords counted in talk-page HTML as signs of unresolved disputes.
pub const TALK_ISSUE_KEYWORDS: &[&str] = &["dispute", "pov", "controvers", "merge", "cleanup"];

/// Revision tag fragments that identify a revert.
pub const REVERT_TAG_FRAGMENTS: &[&str] = &["rollback", "undo"];

pub(crate) struct CompiledMarker {
    pub(crate) source: MarkupSource,
    pub(crate) regex: Regex,
}

/// Citation-needed patterns compiled once per process.
pub(crate) fn citation_needed_markers() -> &'static [CompiledMarker] {
    static MARKERS: OnceLock<Vec<CompiledMarker>> = OnceLock::new();
    MARKERS.get_or_init(|| {
        CITATION_NEEDED_PATTERNS
            .iter()
            .filter_map(|pattern| {
                Regex::new(pattern.regex).ok().map(|regex| CompiledMarker {
                    source: pattern.source,
                    regex,
                })
            })
            .collect()
    })
}

/// Case-insensitive alternation of [`TALK_ISSUE_KEYWORDS`].
pub(crate) fn talk_issue_regex() -> &'static Regex {
    static TALK: OnceLock<Regex> = OnceLock::new();
    TALK.get_or_init(|| {
        let alternation = TALK_ISSUE_KEYWORDS
            .iter()
            .map(|keyword| regex::escape(keyword))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("(?i){alternation}")).expect("talk keywords are literal")
    })
}
