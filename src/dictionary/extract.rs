//! Definition candidates from dictionary HTML.
//!
//! Page layouts differ between sources and change without notice, so this is
//! a coarse heuristic: gather every fragment that looks like Persian prose and
//! let the longest one win.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Containers that usually hold the meaning, in order of preference.
const MEANING_SELECTORS: [&str; 6] = [
    "div.meaning",
    "div.mean",
    "div.definition",
    "div.entry",
    "div#content",
    "article",
];

/// Elements scanned site-wide after the selector rules.
const BROAD_SCAN_SELECTOR: &str = "p, div, span";

const MIN_MEANING_CHARS: usize = 10;

/// True for text with at least one Persian/Arabic letter and more than ten chars.
///
/// Navigation and footer text in Persian passes this filter as well.
pub fn looks_like_meaning(text: &str) -> bool {
    text.chars().any(is_persian) && text.chars().count() > MIN_MEANING_CHARS
}

fn is_persian(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Collect candidate fragments from a page.
///
/// Selector rules contribute the first match of each rule (block-joined);
/// the broad scan then adds every matching `p`/`div`/`span` (space-joined).
/// Duplicates are dropped, first-seen order is kept.
pub fn collect_candidates(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut candidates = Vec::new();

    for selector_str in MEANING_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                candidates.push(element_text(&element, "\n"));
            }
        }
    }

    if let Ok(selector) = Selector::parse(BROAD_SCAN_SELECTOR) {
        candidates.extend(
            document
                .select(&selector)
                .map(|element| element_text(&element, " ")),
        );
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|text| looks_like_meaning(text))
        .filter(|text| seen.insert(text.clone()))
        .collect()
}

/// Text nodes trimmed, empty ones dropped, joined with `separator`.
fn element_text(element: &ElementRef, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// The candidate with the most chars; the earliest wins a tie.
pub fn pick_longest(candidates: Vec<String>) -> Option<String> {
    let mut best: Option<(usize, String)> = None;
    for candidate in candidates {
        let len = candidate.chars().count();
        if best.as_ref().map_or(true, |(best_len, _)| len > *best_len) {
            best = Some((len, candidate));
        }
    }
    best.map(|(_, text)| text)
}

/// Truncate to at most `max_chars` chars without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
