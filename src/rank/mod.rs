//! Candidate scoring and reranking.
//!
//! Three independent signals are computed per candidate — semantic
//! similarity to the interview narrative, rule-based constraint matching,
//! and popularity — then blended with fixed weights into the final order.
//! Semantic similarity comes from the embedding collaborator; this module
//! only consumes vectors.

pub mod rerank;
pub mod score;

use serde::{Deserialize, Serialize};

pub use rerank::{DEFAULT_TOP_K, Ranked, rerank};
pub use score::{BLEND_WEIGHTS, blend, popularity_score, rule_score};

/// Capabilities a candidate book must expose to be scored.
///
/// Catalog records vary in shape; this trait is the one adapter seam the
/// scorer sees. Missing data is reported as `None`/zero and the affected
/// scoring term is skipped — malformed candidates never fail a request.
pub trait BookRecord {
    /// Page count, when the catalog provided one.
    fn page_count(&self) -> Option<u32>;
    /// Publication year, when the publication date has a parseable
    /// 4-digit year prefix.
    fn publication_year(&self) -> Option<i32>;
    /// Description text used for exclusion-term matching and embedding.
    fn descriptive_text(&self) -> &str;
    /// Category/genre label.
    fn category_label(&self) -> &str;
    /// Review rank signal, 0–10; 0 when missing.
    fn review_rank(&self) -> f32;
    /// Sales/popularity signal; 0 when missing.
    fn sales_point(&self) -> f32;
}

/// Per-candidate score breakdown, attached to each reranked result.
///
/// Derived, request-scoped data — never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Blended total the ordering is based on.
    pub total: f32,
    /// Dot product of the narrative vector and the candidate vector.
    pub semantic: f32,
    /// Constraint-based additive score (unclamped, may be negative).
    pub rule: f32,
    /// Review-rank + sales signal, in `[0, 1]`.
    pub popularity: f32,
}

/// Parse a publication year from a catalog date string.
///
/// Catalog dates are `YYYY-MM-DD`; only the 4-digit year prefix is trusted.
pub(crate) fn year_prefix(pub_date: &str) -> Option<i32> {
    let prefix = pub_date.get(..4)?;
    if prefix.bytes().all(|b| b.is_ascii_digit()) {
        prefix.parse().ok()
    } else {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_prefix_parses_catalog_dates() {
        assert_eq!(year_prefix("2023-05-01"), Some(2023));
        assert_eq!(year_prefix("1999"), Some(1999));
    }

    #[test]
    fn year_prefix_rejects_malformed_dates() {
        assert_eq!(year_prefix(""), None);
        assert_eq!(year_prefix("23-05"), None);
        assert_eq!(year_prefix("abcd-01-01"), None);
    }
}
