//! The book-catalog collaborator: lookup modes, item records, categories.
//!
//! The catalog is an injected trait object so the pipeline can run against
//! the real Aladin open API ([`aladin::AladinClient`]) or a fake in tests.
//! "No results" is a valid empty success everywhere in this module — errors
//! mean the request itself could not complete.

pub mod aladin;
pub mod categories;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::rank::BookRecord;

/// Description-bearing optional result fields requested on every fetch so
/// candidates arrive with embeddable text.
pub const DESCRIPTION_OPT_RESULT: &str =
    "FullDescription,SubDescription,Description,Story,AuthorIntro,SubInfo";

/// Listing kinds supported by the browse lookup mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListKind {
    Bestseller,
    ItemNewAll,
    ItemNewSpecial,
    ItemNew,
    ItemEditorChoice,
    BlogBest,
    ItemNewHot,
    Recommend,
}

impl ListKind {
    /// The catalog's wire name for this listing.
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Bestseller => "Bestseller",
            Self::ItemNewAll => "ItemNewAll",
            Self::ItemNewSpecial => "ItemNewSpecial",
            Self::ItemNew => "ItemNew",
            Self::ItemEditorChoice => "ItemEditorChoice",
            Self::BlogBest => "BlogBest",
            Self::ItemNewHot => "ItemNewHot",
            Self::Recommend => "Recommend",
        }
    }

    /// Parse a caller-supplied listing name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bestseller" => Some(Self::Bestseller),
            "itemnewall" => Some(Self::ItemNewAll),
            "itemnewspecial" => Some(Self::ItemNewSpecial),
            "itemnew" => Some(Self::ItemNew),
            "itemeditorchoice" => Some(Self::ItemEditorChoice),
            "blogbest" => Some(Self::BlogBest),
            "itemnewhot" => Some(Self::ItemNewHot),
            "recommend" => Some(Self::Recommend),
            _ => None,
        }
    }
}

/// Identifier types for the direct lookup mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ItemIdType {
    #[default]
    Isbn13,
    Isbn,
    ItemId,
}

impl ItemIdType {
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Isbn13 => "ISBN13",
            Self::Isbn => "ISBN",
            Self::ItemId => "ItemId",
        }
    }
}

/// Parameters for search-by-query.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    pub start: u32,
    pub max_results: u32,
    pub category_id: Option<u32>,
    pub author: Option<String>,
    pub publisher: Option<String>,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            start: 1,
            max_results: 40,
            category_id: None,
            author: None,
            publisher: None,
        }
    }
}

/// Parameters for browse-by-listing.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub kind: ListKind,
    pub start: u32,
    pub max_results: u32,
    pub category_id: Option<u32>,
    pub year: Option<u32>,
    pub month: Option<u32>,
    pub week: Option<u32>,
}

impl ListParams {
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            start: 1,
            max_results: 50,
            category_id: None,
            year: None,
            month: None,
            week: None,
        }
    }
}

/// Parameters for lookup-by-identifier.
#[derive(Debug, Clone)]
pub struct LookupParams {
    pub item_id: String,
    pub id_type: ItemIdType,
}

impl LookupParams {
    pub fn isbn13(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            id_type: ItemIdType::Isbn13,
        }
    }
}

/// The three catalog lookup modes.
///
/// Object-safe so the orchestrator can hold `Box<dyn Catalog>`; transport
/// and authorization failures surface as [`CatalogError`], never as empty
/// results. `Send + Sync` so one client can serve all server requests.
pub trait Catalog: Send + Sync {
    fn search(&self, params: &SearchParams) -> Result<Vec<BookItem>, CatalogError>;
    fn list(&self, params: &ListParams) -> Result<Vec<BookItem>, CatalogError>;
    fn lookup(&self, params: &LookupParams) -> Result<Vec<BookItem>, CatalogError>;
}

/// Nested per-item details delivered under `subInfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubInfo {
    pub item_page: Option<u32>,
    pub description: Option<String>,
    pub sub_description: Option<String>,
    pub full_description: Option<String>,
}

/// One catalog book record, as returned by all three lookup modes.
///
/// Unknown payload fields are ignored; missing fields default so a sparse
/// record still scores (with the affected terms skipped).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookItem {
    pub title: String,
    pub author: String,
    pub pub_date: String,
    pub description: String,
    pub isbn13: String,
    pub category_name: String,
    pub cover: String,
    pub link: String,
    pub customer_review_rank: f32,
    pub sales_point: f32,
    pub sub_info: SubInfo,
}

impl BookItem {
    /// Text embedded for semantic similarity: the first non-empty of
    /// description, subInfo description, title.
    pub fn embedding_text(&self) -> &str {
        if !self.description.is_empty() {
            return &self.description;
        }
        if let Some(desc) = self.sub_info.description.as_deref() {
            if !desc.is_empty() {
                return desc;
            }
        }
        &self.title
    }
}

impl BookRecord for BookItem {
    fn page_count(&self) -> Option<u32> {
        self.sub_info.item_page
    }

    fn publication_year(&self) -> Option<i32> {
        crate::rank::year_prefix(&self.pub_date)
    }

    fn descriptive_text(&self) -> &str {
        &self.description
    }

    fn category_label(&self) -> &str {
        &self.category_name
    }

    fn review_rank(&self) -> f32 {
        self.customer_review_rank
    }

    fn sales_point(&self) -> f32 {
        self.sales_point
    }
}
