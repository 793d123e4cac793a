//! Retrieval orchestration: strategy selection, degradation ladder,
//! embedding, reranking.
//!
//! The orchestrator owns nothing global — the catalog and embedder are
//! injected at construction and reused across requests. One inbound request
//! triggers the outbound calls sequentially: fetch candidates, embed, rerank.
//!
//! The catalog's search is exact/keyword-based and narrow constraints
//! frequently over-filter, so empty results walk a degradation ladder
//! (drop the category, then fall back to the bestseller listing) before an
//! empty success is returned. Collaborator failures are never degraded —
//! they propagate as typed errors.

use serde::{Deserialize, Serialize};

use crate::catalog::{
    BookItem, Catalog, ListKind, ListParams, LookupParams, SearchParams, categories,
};
use crate::config::Settings;
use crate::embed::Embedder;
use crate::error::{EmbedError, SquinResult};
use crate::interview::Constraints;
use crate::rank::{DEFAULT_TOP_K, ScoreBreakdown, rerank};

/// One recommendation request, assembled from a finished interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    /// The accumulated interview narrative, used as the search query and
    /// the semantic anchor.
    pub narrative: String,
    /// The accumulated constraint set.
    #[serde(default)]
    pub constraints: Constraints,
    /// Direct identifier lookup; highest-priority strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    /// Browse a curated listing instead of searching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_kind: Option<ListKind>,
    /// Explicit category name; overrides genre candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Explicit category id; overrides everything else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u32>,
    /// 1-based result page start.
    #[serde(default = "default_start")]
    pub start: u32,
    /// Candidate pool size per fetch.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Results returned after reranking.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_start() -> u32 {
    1
}

fn default_max_results() -> u32 {
    40
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Default for RecommendRequest {
    fn default() -> Self {
        Self {
            narrative: String::new(),
            constraints: Constraints::default(),
            isbn: None,
            list_kind: None,
            category: None,
            category_id: None,
            start: default_start(),
            max_results: default_max_results(),
            top_k: default_top_k(),
        }
    }
}

/// One recommended book with its score breakdown and the description-family
/// fields the presentation layer summarizes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub author: String,
    pub isbn13: String,
    pub category: String,
    pub pubdate: String,
    pub cover: String,
    pub link: String,
    pub scores: ScoreBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
}

/// Resolve the category id for a request: explicit id, then explicit name,
/// then the primary genre candidate.
fn resolve_category(request: &RecommendRequest) -> Option<u32> {
    if let Some(id) = request.category_id {
        return Some(id);
    }
    if let Some(id) = request
        .category
        .as_deref()
        .and_then(categories::category_id_for)
    {
        return Some(id);
    }
    request
        .constraints
        .genre_candidates
        .first()
        .and_then(|genre| categories::category_id_for(genre))
}

/// The recommendation pipeline with its injected collaborators.
///
/// Construct once, reuse across requests; lifecycle belongs to the caller.
pub struct Recommender {
    catalog: Box<dyn Catalog>,
    embedder: Box<dyn Embedder>,
}

impl Recommender {
    pub fn new(catalog: Box<dyn Catalog>, embedder: Box<dyn Embedder>) -> Self {
        Self { catalog, embedder }
    }

    /// Build the production pipeline from settings: Aladin catalog plus the
    /// configured embedding backend. Missing keys fail fast here.
    pub fn from_settings(settings: &Settings) -> SquinResult<Self> {
        let catalog = crate::catalog::aladin::AladinClient::new(settings.ttb_key.clone())?;
        let embedder = crate::embed::from_settings(settings)?;
        Ok(Self::new(Box::new(catalog), embedder))
    }

    /// Run one recommendation request end to end.
    ///
    /// An empty list after the full degradation ladder is a success; only
    /// collaborator failures produce an error.
    pub fn recommend(&self, request: &RecommendRequest) -> SquinResult<Vec<Recommendation>> {
        let category_id = resolve_category(request);
        tracing::info!(
            strategy = strategy_name(request),
            category_id,
            "collecting candidates"
        );

        let mut books = self.fetch(request, category_id)?;

        if books.is_empty() && category_id.is_some() {
            tracing::info!("no candidates; retrying without category restriction");
            books = self.fetch(request, None)?;
        }
        if books.is_empty() {
            tracing::info!("no candidates; falling back to bestseller listing");
            let mut params = ListParams::new(ListKind::Bestseller);
            params.max_results = 50;
            books = self.catalog.list(&params)?;
        }
        if books.is_empty() {
            tracing::info!("degradation ladder exhausted; returning empty result");
            return Ok(Vec::new());
        }

        let texts: Vec<String> = books.iter().map(|b| b.embedding_text().to_string()).collect();
        let book_vecs = self.embedder.embed(&texts)?;
        let narrative_vec = self
            .embedder
            .embed(std::slice::from_ref(&request.narrative))?
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::ParseError {
                message: "provider returned no vector for the narrative".into(),
            })?;

        let ranked = rerank(
            &narrative_vec,
            books,
            &book_vecs,
            &request.constraints,
            request.top_k,
        )?;

        tracing::info!(returned = ranked.len(), "reranked candidates");
        Ok(ranked
            .into_iter()
            .map(|r| to_recommendation(r.book, r.scores))
            .collect())
    }

    /// Execute the selected lookup strategy: identifier, listing, or search.
    fn fetch(
        &self,
        request: &RecommendRequest,
        category_id: Option<u32>,
    ) -> SquinResult<Vec<BookItem>> {
        if let Some(isbn) = &request.isbn {
            return Ok(self.catalog.lookup(&LookupParams::isbn13(isbn.as_str()))?);
        }
        if let Some(kind) = request.list_kind {
            let mut params = ListParams::new(kind);
            params.start = request.start;
            params.max_results = request.max_results.max(10);
            params.category_id = category_id;
            return Ok(self.catalog.list(&params)?);
        }
        let mut params = SearchParams::new(request.narrative.as_str());
        params.start = request.start;
        params.max_results = request.max_results;
        params.category_id = category_id;
        Ok(self.catalog.search(&params)?)
    }
}

fn strategy_name(request: &RecommendRequest) -> &'static str {
    if request.isbn.is_some() {
        "lookup"
    } else if request.list_kind.is_some() {
        "list"
    } else {
        "search"
    }
}

fn to_recommendation(book: BookItem, scores: ScoreBreakdown) -> Recommendation {
    let description = if book.description.is_empty() {
        book.sub_info.description.clone()
    } else {
        Some(book.description.clone())
    };
    Recommendation {
        title: book.title,
        author: book.author,
        isbn13: book.isbn13,
        category: book.category_name,
        pubdate: book.pub_date,
        cover: book.cover,
        link: book.link,
        scores,
        description,
        sub_description: book.sub_info.sub_description,
        full_description: book.sub_info.full_description,
    }
}
