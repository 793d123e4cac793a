//! Answer normalizers: raw UI answer values → typed constraint deltas.
//!
//! Every function here is total and side-effect-free. Unrecognized input
//! yields "no constraint" rather than an error; the accumulator decides what
//! that means for the running state.

use std::sync::LazyLock;

use regex::Regex;

/// Page ceiling for the 짧음 bucket.
pub const SHORT_MAX_PAGES: u32 = 200;
/// Page ceiling for the 중간 bucket.
pub const MEDIUM_MAX_PAGES: u32 = 500;
/// Sentinel ceiling for 장편: effectively unbounded, so the rule scorer
/// never penalizes length once a reader has opted into long books.
pub const UNBOUNDED_MAX_PAGES: u32 = 10_000;

/// Year offset for the "비교적 최근" recency option.
pub const RECENT_YEARS: i32 = 3;
/// Year offset for the "최신 선호" recency option.
pub const NEWEST_YEARS: i32 = 5;

/// Map a length choice to a page ceiling.
///
/// Matching is by the distinguishing substring of each option label, so
/// shortened labels from older clients still normalize.
pub fn max_pages_for_choice(choice: &str) -> Option<u32> {
    if choice.is_empty() {
        return None;
    }
    if choice.contains("짧") {
        return Some(SHORT_MAX_PAGES);
    }
    if choice.contains("중간") || choice.contains("500") {
        return Some(MEDIUM_MAX_PAGES);
    }
    if choice.contains("장편") {
        return Some(UNBOUNDED_MAX_PAGES);
    }
    None
}

/// Resolve recency selections to an inclusive minimum publication year.
///
/// "무관" anywhere in the selection, or no recognized option, means no
/// constraint. When several recency options are selected the *least
/// restrictive* (oldest) cutoff wins — ties go toward leniency.
pub fn min_pubyear_for_choices(choices: &[String], now_year: i32) -> Option<i32> {
    if choices.is_empty() || choices.iter().any(|c| c.contains("무관")) {
        return None;
    }
    let mut cutoffs = Vec::new();
    if choices.iter().any(|c| c.contains("3년")) {
        cutoffs.push(now_year - RECENT_YEARS);
    }
    if choices.iter().any(|c| c.contains("5년")) {
        cutoffs.push(now_year - NEWEST_YEARS);
    }
    cutoffs.into_iter().min()
}

/// Trigger table for negative-term extraction: (pattern, emitted tag).
///
/// This is literal keyword matching, not sentiment analysis; text that hits
/// no trigger contributes nothing.
static NEGATIVE_TRIGGERS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"철학|형이상학").unwrap(), "철학적"),
        (Regex::new(r"잔혹|폭력|고어").unwrap(), "잔혹"),
        (
            Regex::new(r"로맨스\s*X|연애\s*X|로맨스\s*싫|연애\s*싫|로맨스\s*빼").unwrap(),
            "로맨스 제외",
        ),
    ]
});

/// Extract exclusion tags from a free-text answer.
///
/// Returns at most one tag per trigger category, in trigger-table order.
pub fn extract_negatives(text: &str) -> Vec<String> {
    NEGATIVE_TRIGGERS
        .iter()
        .filter(|(re, _)| re.is_match(text))
        .map(|(_, tag)| (*tag).to_string())
        .collect()
}
