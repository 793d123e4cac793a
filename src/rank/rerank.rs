//! Reranking: score every candidate, order by blended total, truncate.

use crate::error::RankError;
use crate::interview::Constraints;

use super::{BookRecord, ScoreBreakdown, score};

/// Default number of results returned to the caller.
pub const DEFAULT_TOP_K: usize = 5;

/// A candidate with its attached score breakdown.
#[derive(Debug, Clone)]
pub struct Ranked<B> {
    pub book: B,
    pub scores: ScoreBreakdown,
}

/// Rerank candidates by the blended score and keep the top `top_k`.
///
/// `books` and `book_vecs` must be index-aligned, and every vector must
/// share `narrative_vec`'s dimension; violations are precondition errors.
/// Vectors are expected pre-normalized (the embedder contract), so the dot
/// product is cosine similarity.
///
/// Candidates with equal blended totals keep their input order — the sort
/// is stable and the comparison is on the total alone.
pub fn rerank<B: BookRecord>(
    narrative_vec: &[f32],
    books: Vec<B>,
    book_vecs: &[Vec<f32>],
    constraints: &Constraints,
    top_k: usize,
) -> Result<Vec<Ranked<B>>, RankError> {
    if books.len() != book_vecs.len() {
        return Err(RankError::IndexMismatch {
            books: books.len(),
            vectors: book_vecs.len(),
        });
    }
    for (index, vec) in book_vecs.iter().enumerate() {
        if vec.len() != narrative_vec.len() {
            return Err(RankError::DimensionMismatch {
                expected: narrative_vec.len(),
                actual: vec.len(),
                index,
            });
        }
    }

    let mut ranked: Vec<Ranked<B>> = books
        .into_iter()
        .zip(book_vecs)
        .map(|(book, vec)| {
            let semantic = dot(narrative_vec, vec);
            let rule = score::rule_score(&book, constraints);
            let popularity = score::popularity_score(&book);
            let total = score::blend(semantic, rule, popularity);
            Ranked {
                book,
                scores: ScoreBreakdown {
                    total,
                    semantic,
                    rule,
                    popularity,
                },
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.scores.total.total_cmp(&a.scores.total));
    ranked.truncate(top_k);
    Ok(ranked)
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::testing::TestBook;

    fn unit(x: f32, y: f32) -> Vec<f32> {
        let norm = (x * x + y * y).sqrt();
        vec![x / norm, y / norm]
    }

    #[test]
    fn semantically_close_candidate_wins_despite_weaker_rules() {
        // similarities ~[0.9, 0.1], rules [0.0, 0.65], popularity [0.2, 0.2]
        let constraints = Constraints {
            max_pages: Some(200),
            min_pubyear: Some(2022),
            ..Constraints::default()
        };
        let near = TestBook {
            review_rank: 2.857143, // popularity ≈ 0.2
            ..TestBook::default()
        };
        let far = TestBook {
            pages: Some(150),
            pub_date: "2024-01-01".into(),
            review_rank: 2.857143,
            ..TestBook::default()
        };
        let narrative = unit(1.0, 0.0);
        let vecs = vec![unit(0.9, (1.0f32 - 0.81).sqrt()), unit(0.1, (1.0f32 - 0.01).sqrt())];

        let ranked = rerank(&narrative, vec![near, far], &vecs, &constraints, 1).unwrap();
        assert_eq!(ranked.len(), 1);
        assert!((ranked[0].scores.semantic - 0.9).abs() < 1e-3);
        assert!((ranked[0].scores.total - 0.535).abs() < 1e-2);
    }

    #[test]
    fn reranking_sorted_input_is_idempotent() {
        let books: Vec<TestBook> = (0..4)
            .map(|i| TestBook {
                review_rank: 10.0 - i as f32 * 2.0,
                description: format!("book {i}"),
                ..TestBook::default()
            })
            .collect();
        let vecs = vec![vec![1.0, 0.0]; 4];
        let narrative = vec![1.0, 0.0];
        let constraints = Constraints::default();

        let first = rerank(&narrative, books, &vecs, &constraints, 4).unwrap();
        let order: Vec<String> = first
            .iter()
            .map(|r| r.book.description.clone())
            .collect();

        let again = rerank(
            &narrative,
            first.into_iter().map(|r| r.book).collect(),
            &vecs,
            &constraints,
            4,
        )
        .unwrap();
        let order_again: Vec<String> = again
            .iter()
            .map(|r| r.book.description.clone())
            .collect();
        assert_eq!(order, order_again);
    }

    #[test]
    fn equal_totals_keep_input_order() {
        let books: Vec<TestBook> = (0..3)
            .map(|i| TestBook {
                description: format!("tied {i}"),
                ..TestBook::default()
            })
            .collect();
        let vecs = vec![vec![1.0]; 3];
        let ranked = rerank(&[1.0], books, &vecs, &Constraints::default(), 3).unwrap();
        let order: Vec<&str> = ranked
            .iter()
            .map(|r| r.book.description.as_str())
            .collect();
        assert_eq!(order, ["tied 0", "tied 1", "tied 2"]);
    }

    #[test]
    fn truncates_to_top_k_with_breakdowns_attached() {
        let books: Vec<TestBook> = (0..8)
            .map(|i| TestBook {
                review_rank: i as f32,
                ..TestBook::default()
            })
            .collect();
        let vecs = vec![vec![1.0]; 8];
        let ranked = rerank(&[1.0], books, &vecs, &Constraints::default(), 5).unwrap();
        assert_eq!(ranked.len(), 5);
        // descending by total
        for pair in ranked.windows(2) {
            assert!(pair[0].scores.total >= pair[1].scores.total);
        }
        let top = &ranked[0];
        assert!((top.scores.popularity - 0.49).abs() < 1e-6);
        assert!((top.scores.total - score::blend(1.0, 0.0, 0.49)).abs() < 1e-6);
    }

    #[test]
    fn misaligned_inputs_are_precondition_errors() {
        let books = vec![TestBook::default()];
        let err = rerank(&[1.0], books, &[], &Constraints::default(), 5).unwrap_err();
        assert!(matches!(err, RankError::IndexMismatch { books: 1, vectors: 0 }));

        let books = vec![TestBook::default()];
        let vecs = vec![vec![1.0, 0.0]];
        let err = rerank(&[1.0], books, &vecs, &Constraints::default(), 5).unwrap_err();
        assert!(matches!(
            err,
            RankError::DimensionMismatch {
                expected: 1,
                actual: 2,
                index: 0
            }
        ));
    }
}
