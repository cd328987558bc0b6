use std::collections::HashSet;

const EXACT_BONUS: u32 = 100;
const PREFIX_BONUS: u32 = 60;
const QUALIFIED_PREFIX_BONUS: u32 = 50;
const CONTAINS_BONUS: u32 = 10;

/// Relevance of a candidate title to the user's query (case-insensitive).
///
/// A prefix match carrying a parenthetical qualifier (`Name (island)`) earns
/// an extra bonus so disambiguated variants outrank loose full-text hits.
pub(crate) fn candidate_score(query: &str, candidate: &str) -> u32 {
    let query = query.to_lowercase();
    let candidate = candidate.to_lowercase();

    let exact = candidate == query;
    let starts = candidate.starts_with(&query);
    let qualified = starts && candidate.contains('(');
    let contains = candidate.contains(&query);

    let mut score = 0;
    if exact {
        score += EXACT_BONUS;
    }
    if starts {
        score += PREFIX_BONUS;
    }
    if qualified {
        score += QUALIFIED_PREFIX_BONUS;
    }
    if contains {
        score += CONTAINS_BONUS;
    }
    score
}

/// Order candidates by descending score, keeping concatenation order on ties,
/// then drop repeated titles.
pub(crate) fn rank_candidates(query: &str, candidates: Vec<String>) -> Vec<String> {
    let mut scored: Vec<(u32, String)> = candidates
        .into_iter()
        .map(|title| (candidate_score(query, &title), title))
        .collect();
    // stable: equal scores keep their relative order
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut seen = HashSet::new();
    scored
        .into_iter()
        .map(|(_, title)| title)
        .filter(|title| seen.insert(title.clone()))
        .collect()
}
