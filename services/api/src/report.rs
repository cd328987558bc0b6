use crate::infra::build_service;
use clap::Args;
use std::fmt::Write as _;
use wikicred::analysis::{AnalysisReport, CandidateChoice};
use wikicred::config::AppConfig;
use wikicred::error::AppError;
use wikicred::scoring::{Highlight, ScoreResult};
use wikicred::{
    AnalysisOutcome, AnalyzeRequest, PolicyOverrides, ResolutionResult, ResolveOptions,
    StrictnessProfile,
};

#[derive(Args, Debug, Default)]
#[group(required = true, multiple = false)]
pub(crate) struct ArticleTarget {
    /// Article title to resolve before scoring
    #[arg(long)]
    pub(crate) title: Option<String>,
    /// Full article URL; skips title resolution
    #[arg(long)]
    pub(crate) url: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    #[command(flatten)]
    pub(crate) target: ArticleTarget,
    /// Language edition (defaults to WIKI_DEFAULT_LANG)
    #[arg(long)]
    pub(crate) lang: Option<String>,
    /// Strictness profile: permissive, normal, or strict
    #[arg(long)]
    pub(crate) profile: Option<StrictnessProfile>,
    /// Stop after resolution and list the candidate titles
    #[arg(long)]
    pub(crate) prefer_choice: bool,
    /// Print the raw JSON report instead of the summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ResolveArgs {
    /// Title to resolve
    #[arg(long)]
    pub(crate) title: String,
    /// Language edition (defaults to WIKI_DEFAULT_LANG)
    #[arg(long)]
    pub(crate) lang: Option<String>,
    /// Maximum number of suggestions
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        target,
        lang,
        profile,
        prefer_choice,
        json,
    } = args;

    let config = AppConfig::load()?;
    let service = build_service(&config.wiki)?;

    let request = AnalyzeRequest {
        title: target.title,
        url: target.url,
        lang,
        policy: profile.map(PolicyOverrides::profile),
        prefer_choice,
    };

    let outcome = match service.analyze(request).await {
        Ok(outcome) => outcome,
        Err(err) => {
            if let Some(suggestions) = err.suggestions().filter(|list| !list.is_empty()) {
                eprintln!("Did you mean:");
                for suggestion in suggestions {
                    eprintln!("  - {suggestion}");
                }
            }
            return Err(err.into());
        }
    };

    if json {
        let rendered = serde_json::to_string_pretty(&outcome).map_err(std::io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    let text = match &outcome {
        AnalysisOutcome::Report(report) => render_report(report),
        AnalysisOutcome::Choice(choice) => render_choice(choice),
    };
    print!("{text}");
    Ok(())
}

pub(crate) async fn run_resolve(args: ResolveArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config.wiki)?;

    let lang = service.language(args.lang.as_deref())?;
    let mut options = service.default_resolve_options();
    if let Some(limit) = args.limit {
        options = ResolveOptions { limit, ..options };
    }

    let result = service.resolve(&args.title, &lang, options).await?;
    print!("{}", render_resolution(&args.title, &lang, &result));
    Ok(())
}

fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", report.title, report.lang);
    if let Some(original) = &report.resolved_from {
        let _ = writeln!(out, "  resolved from: {original}");
    }
    let _ = writeln!(out, "  result: {}", report.outcome.summary());

    if let ScoreResult::Scored { highlights, .. } = &report.outcome {
        if !highlights.positives.is_empty() {
            let _ = writeln!(out, "  strengths: {}", labels(&highlights.positives));
        }
        if !highlights.negatives.is_empty() {
            let _ = writeln!(out, "  concerns: {}", labels(&highlights.negatives));
        }
    }

    let signals = &report.signals;
    let _ = writeln!(
        out,
        "  signals: {} references, {} citation needed, {} problem templates, {} talk issues",
        signals.reference_count,
        signals.citation_needed,
        signals.problem_templates,
        signals.talk_issues
    );
    let _ = writeln!(
        out,
        "           {:.1} days since last edit, revert rate {:.2}, {} editors",
        signals.days_since_last_edit, signals.revert_rate, signals.unique_editors
    );
    let _ = writeln!(
        out,
        "           {} words, {} headings",
        signals.word_count, signals.heading_count
    );

    let flags: Vec<&str> = [
        (signals.is_featured_article, "featured"),
        (signals.is_good_article, "good"),
        (signals.is_stub, "stub"),
        (signals.is_protected, "protected"),
    ]
    .iter()
    .filter(|(set, _)| *set)
    .map(|(_, label)| *label)
    .collect();
    if !flags.is_empty() {
        let _ = writeln!(out, "  flags: {}", flags.join(", "));
    }

    let _ = writeln!(out, "  evidence:");
    for link in &report.evidence {
        let _ = writeln!(out, "    {:<8} {}", link.label, link.url);
    }

    let others: Vec<&str> = report
        .suggestions
        .iter()
        .filter(|title| **title != report.title)
        .map(String::as_str)
        .collect();
    if !others.is_empty() {
        let _ = writeln!(out, "  see also: {}", others.join(", "));
    }
    out
}

fn labels(highlights: &[Highlight]) -> String {
    highlights
        .iter()
        .map(|highlight| highlight.tag.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_choice(choice: &CandidateChoice) -> String {
    let mut out = String::new();
    match &choice.resolved_from {
        Some(original) => {
            let _ = writeln!(out, "Candidates for '{original}' ({}):", choice.lang);
        }
        None => {
            let _ = writeln!(out, "Candidates ({}):", choice.lang);
        }
    }
    for (index, title) in choice.suggestions.iter().enumerate() {
        let _ = writeln!(out, "  {}. {title}", index + 1);
    }
    out
}

fn render_resolution(input: &str, lang: &str, result: &ResolutionResult) -> String {
    let mut out = String::new();
    match result {
        ResolutionResult::Resolved { title, .. } => {
            let _ = writeln!(out, "'{input}' resolves to '{title}' ({lang})");
        }
        ResolutionResult::Unresolved { reason, .. } => {
            let _ = writeln!(out, "'{input}' did not resolve ({lang}): {}", reason.label());
        }
    }
    for title in result.suggestions() {
        let _ = writeln!(out, "  - {title}");
    }
    out
}
