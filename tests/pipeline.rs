//! End-to-end tests for the recommendation pipeline.
//!
//! These tests exercise the full flow — interview accumulation, retrieval
//! strategy selection, the degradation ladder, embedding, and reranking —
//! against a scripted fake catalog and a deterministic fake embedder, the
//! substitution the injected-collaborator design exists for.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use squin::catalog::{
    BookItem, Catalog, ListKind, ListParams, LookupParams, SearchParams, SubInfo,
};
use squin::embed::Embedder;
use squin::error::{CatalogError, EmbedError, SquinError};
use squin::interview::{self, Answer, InterviewState, QuestionId};
use squin::recommend::{RecommendRequest, Recommender};

const YEAR: i32 = 2026;
const DIM: usize = 4;

/// One recorded catalog call, for ladder-order assertions.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Search { category: Option<u32> },
    List { kind: ListKind, category: Option<u32> },
    Lookup { item_id: String },
}

/// Scripted catalog: fixed responses per lookup mode, with a call log.
#[derive(Default)]
struct FakeCatalog {
    search_with_category: Vec<BookItem>,
    search_without_category: Vec<BookItem>,
    bestseller: Vec<BookItem>,
    lookup_result: Vec<BookItem>,
    fail: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeCatalog {
    /// Box a shared handle for the recommender while keeping one to
    /// inspect the call log.
    fn shared(self) -> (Arc<Self>, Box<dyn Catalog>) {
        let shared = Arc::new(self);
        (Arc::clone(&shared), Box::new(SharedCatalog(shared)))
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn check_fail(&self) -> Result<(), CatalogError> {
        if self.fail {
            Err(CatalogError::Transport {
                message: "connection refused".into(),
            })
        } else {
            Ok(())
        }
    }
}

impl Catalog for FakeCatalog {
    fn search(&self, params: &SearchParams) -> Result<Vec<BookItem>, CatalogError> {
        self.calls.lock().unwrap().push(Call::Search {
            category: params.category_id,
        });
        self.check_fail()?;
        Ok(if params.category_id.is_some() {
            self.search_with_category.clone()
        } else {
            self.search_without_category.clone()
        })
    }

    fn list(&self, params: &ListParams) -> Result<Vec<BookItem>, CatalogError> {
        self.calls.lock().unwrap().push(Call::List {
            kind: params.kind,
            category: params.category_id,
        });
        self.check_fail()?;
        Ok(if params.kind == ListKind::Bestseller && params.category_id.is_none() {
            self.bestseller.clone()
        } else {
            Vec::new()
        })
    }

    fn lookup(&self, params: &LookupParams) -> Result<Vec<BookItem>, CatalogError> {
        self.calls.lock().unwrap().push(Call::Lookup {
            item_id: params.item_id.clone(),
        });
        self.check_fail()?;
        Ok(self.lookup_result.clone())
    }
}

/// Forwarder so the recommender can own a boxed view of a shared fake.
struct SharedCatalog(Arc<FakeCatalog>);

impl Catalog for SharedCatalog {
    fn search(&self, params: &SearchParams) -> Result<Vec<BookItem>, CatalogError> {
        self.0.search(params)
    }
    fn list(&self, params: &ListParams) -> Result<Vec<BookItem>, CatalogError> {
        self.0.list(params)
    }
    fn lookup(&self, params: &LookupParams) -> Result<Vec<BookItem>, CatalogError> {
        self.0.lookup(params)
    }
}

/// Deterministic embedder: each known text maps to a one-hot axis, so dot
/// products are exactly 1.0 (same axis) or 0.0. Unknown texts land on axis 0.
#[derive(Default)]
struct FakeEmbedder {
    axes: HashMap<String, usize>,
    fail: bool,
}

impl FakeEmbedder {
    fn with_axes(pairs: &[(&str, usize)]) -> Self {
        Self {
            axes: pairs
                .iter()
                .map(|(text, axis)| (text.to_string(), *axis))
                .collect(),
            fail: false,
        }
    }
}

impl Embedder for FakeEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if self.fail {
            return Err(EmbedError::Unavailable {
                url: "http://fake:11434".into(),
            });
        }
        Ok(texts
            .iter()
            .map(|text| {
                let axis = *self.axes.get(text).unwrap_or(&0);
                let mut vec = vec![0.0; DIM];
                vec[axis] = 1.0;
                vec
            })
            .collect())
    }
}

fn book(
    title: &str,
    description: &str,
    pages: u32,
    pub_date: &str,
    rank: f32,
    sales: f32,
) -> BookItem {
    BookItem {
        title: title.into(),
        author: "작가 미상".into(),
        pub_date: pub_date.into(),
        description: description.into(),
        isbn13: format!("979{:010}", title.len()),
        category_name: "국내도서>에세이".into(),
        cover: String::new(),
        link: String::new(),
        customer_review_rank: rank,
        sales_point: sales,
        sub_info: SubInfo {
            item_page: Some(pages),
            ..SubInfo::default()
        },
    }
}

/// Run the whole fixed interview and return the session state.
fn interviewed_state() -> InterviewState {
    let steps: Vec<(QuestionId, Answer)> = vec![
        (
            QuestionId::Squin,
            Answer::text("따뜻하고 잔잔한 이야기가 마음에 남았어요"),
        ),
        (QuestionId::Length, Answer::choice("짧음(~200쪽)")),
        (
            QuestionId::Recency,
            Answer::choices(&["비교적 최근(3년 이내)"]),
        ),
        (QuestionId::Context, Answer::choices(&["문체(문장 구성)"])),
        (QuestionId::Genre, Answer::genres(&["에세이"])),
        (QuestionId::Negative, Answer::text("잔혹 장면은 빼주세요")),
        (QuestionId::Keywords, Answer::text("위로")),
    ];

    let mut state = InterviewState::default();
    for (id, answer) in &steps {
        state = interview::apply(&state, *id, answer, YEAR).state;
    }
    state
}

fn request_for(state: &InterviewState) -> RecommendRequest {
    RecommendRequest {
        narrative: state.narrative.clone(),
        constraints: state.constraints.clone(),
        ..RecommendRequest::default()
    }
}

#[test]
fn interview_accumulates_constraints_and_narrative() {
    let state = interviewed_state();
    assert_eq!(
        state.narrative,
        "따뜻하고 잔잔한 이야기가 마음에 남았어요 위로"
    );
    assert_eq!(state.constraints.max_pages, Some(200));
    assert_eq!(state.constraints.min_pubyear, Some(YEAR - 3));
    assert_eq!(state.constraints.genre_candidates, vec!["에세이"]);
    assert!(state.constraints.exclude_terms.contains("잔혹"));
}

#[test]
fn full_pipeline_ranks_the_matching_book_first() {
    let state = interviewed_state();

    let warm = book("위로의 산문", "따뜻한 위로의 에세이", 180, "2025-03-01", 9.0, 10_000.0);
    let gory = book("피의 연대기", "잔혹하고 어두운 스릴러", 620, "2015-01-01", 8.0, 50_000.0);

    let (log, catalog) = FakeCatalog {
        search_with_category: vec![gory, warm],
        ..FakeCatalog::default()
    }
    .shared();
    let embedder = FakeEmbedder::with_axes(&[
        (state.narrative.as_str(), 0),
        ("따뜻한 위로의 에세이", 0),
        ("잔혹하고 어두운 스릴러", 1),
    ]);

    let recommender = Recommender::new(catalog, Box::new(embedder));
    let items = recommender.recommend(&request_for(&state)).unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "위로의 산문");
    // 180 pages ≤ 200 and 2025 ≥ 2023: both rule bonuses apply
    assert!((items[0].scores.rule - 0.65).abs() < 1e-6);
    assert!((items[0].scores.semantic - 1.0).abs() < 1e-6);
    // the gory book is semantically far and takes the page, year, and
    // exclusion penalties
    assert!((items[1].scores.rule - (-0.5)).abs() < 1e-6);
    assert!(items[0].scores.total > items[1].scores.total);

    // the primary genre candidate restricted the first fetch
    assert_eq!(
        log.calls(),
        vec![Call::Search {
            category: Some(55889)
        }]
    );
}

#[test]
fn degradation_ladder_walks_category_then_bestseller() {
    let state = interviewed_state();
    let (log, catalog) = FakeCatalog {
        bestseller: vec![book("베스트셀러", "모두가 읽는 책", 300, "2024-01-01", 7.0, 90_000.0)],
        ..FakeCatalog::default()
    }
    .shared();

    let recommender = Recommender::new(catalog, Box::new(FakeEmbedder::default()));
    let items = recommender.recommend(&request_for(&state)).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "베스트셀러");
    assert_eq!(
        log.calls(),
        vec![
            Call::Search {
                category: Some(55889)
            },
            Call::Search { category: None },
            Call::List {
                kind: ListKind::Bestseller,
                category: None
            },
        ]
    );
}

#[test]
fn empty_at_every_rung_is_an_empty_success() {
    let (log, catalog) = FakeCatalog::default().shared();
    let recommender = Recommender::new(catalog, Box::new(FakeEmbedder::default()));

    let request = RecommendRequest {
        narrative: "아무도 찾지 않는 이야기".into(),
        ..RecommendRequest::default()
    };
    let items = recommender.recommend(&request).unwrap();
    assert!(items.is_empty());
    // no category to drop, so a single search rung before the bestseller
    // fallback
    assert_eq!(
        log.calls(),
        vec![
            Call::Search { category: None },
            Call::List {
                kind: ListKind::Bestseller,
                category: None
            },
        ]
    );
}

#[test]
fn isbn_lookup_outranks_other_strategies() {
    let (log, catalog) = FakeCatalog {
        lookup_result: vec![book("찾던 그 책", "정확히 그 책", 200, "2023-01-01", 9.0, 100.0)],
        ..FakeCatalog::default()
    }
    .shared();
    let recommender = Recommender::new(catalog, Box::new(FakeEmbedder::default()));

    let request = RecommendRequest {
        narrative: "무시되는 검색어".into(),
        isbn: Some("9791190090018".into()),
        list_kind: Some(ListKind::ItemNewHot),
        ..RecommendRequest::default()
    };
    let items = recommender.recommend(&request).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "찾던 그 책");
    assert_eq!(
        log.calls(),
        vec![Call::Lookup {
            item_id: "9791190090018".into()
        }]
    );
}

#[test]
fn catalog_failure_is_an_error_not_an_empty_result() {
    let recommender = Recommender::new(
        Box::new(FakeCatalog {
            fail: true,
            ..FakeCatalog::default()
        }),
        Box::new(FakeEmbedder::default()),
    );
    let request = RecommendRequest {
        narrative: "아무 이야기".into(),
        ..RecommendRequest::default()
    };
    let err = recommender.recommend(&request).unwrap_err();
    assert!(matches!(
        err,
        SquinError::Catalog(CatalogError::Transport { .. })
    ));
}

#[test]
fn embedding_failure_propagates() {
    let recommender = Recommender::new(
        Box::new(FakeCatalog {
            search_without_category: vec![book("한 권", "본문", 100, "2024-01-01", 5.0, 0.0)],
            ..FakeCatalog::default()
        }),
        Box::new(FakeEmbedder {
            fail: true,
            ..FakeEmbedder::default()
        }),
    );
    let request = RecommendRequest {
        narrative: "아무 이야기".into(),
        ..RecommendRequest::default()
    };
    let err = recommender.recommend(&request).unwrap_err();
    assert!(matches!(
        err,
        SquinError::Embed(EmbedError::Unavailable { .. })
    ));
}
