//! The three scoring signals and their blend.

use crate::interview::Constraints;

use super::BookRecord;

/// Blend weights for (semantic, rule, popularity). Tunable constants, not
/// derived from data.
pub const BLEND_WEIGHTS: (f32, f32, f32) = (0.55, 0.25, 0.20);

/// Sales-point scale for the popularity tanh.
const SALES_SCALE: f32 = 5000.0;

/// Deterministic constraint score: independent additive adjustments per
/// dimension, no normalization or clamping.
///
/// A dimension only contributes when both the constraint is set and the
/// candidate carries the datum — a missing page count or unparseable date
/// is "no signal", not a failure.
pub fn rule_score<B: BookRecord>(book: &B, constraints: &Constraints) -> f32 {
    let mut score = 0.0;

    if let (Some(max_pages), Some(pages)) = (constraints.max_pages, book.page_count()) {
        if pages <= max_pages {
            score += 0.35;
        } else {
            score -= 0.15;
        }
    }

    if let (Some(min_year), Some(year)) = (constraints.min_pubyear, book.publication_year()) {
        if year >= min_year {
            score += 0.3;
        } else {
            score -= 0.1;
        }
    }

    if !constraints.exclude_terms.is_empty() {
        let text = format!("{} {}", book.descriptive_text(), book.category_label());
        for term in &constraints.exclude_terms {
            if !term.is_empty() && text.contains(term.as_str()) {
                score -= 0.25;
            }
        }
    }

    score
}

/// Popularity signal from review rank and sales point.
///
/// `0.7 × (review_rank / 10) + 0.3 × tanh(sales_point / 5000)`; bounded to
/// `[0, 1]` for review ranks in `[0, 10]` and non-negative sales.
pub fn popularity_score<B: BookRecord>(book: &B) -> f32 {
    0.7 * (book.review_rank() / 10.0) + 0.3 * (book.sales_point() / SALES_SCALE).tanh()
}

/// Fixed-weight linear combination of the three signals.
pub fn blend(semantic: f32, rule: f32, popularity: f32) -> f32 {
    let (ws, wr, wp) = BLEND_WEIGHTS;
    ws * semantic + wr * rule + wp * popularity
}
