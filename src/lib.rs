//! # squin
//!
//! A conversational book recommendation engine. A fixed-sequence interview
//! accumulates a reader's preferences into a structured constraint set and a
//! free-text narrative; candidates fetched from the book catalog are then
//! reranked by blending semantic similarity, rule-based constraint matching,
//! and popularity.
//!
//! ## Architecture
//!
//! - **Interview** (`interview`): fixed 7-question sequence, total answer
//!   normalizers, pure-functional constraint accumulation
//! - **Ranking** (`rank`): rule / popularity / semantic scoring with fixed
//!   blend weights, stable reranking with per-item score breakdowns
//! - **Catalog** (`catalog`): Aladin open-API client behind an injectable
//!   trait, static genre → category table
//! - **Embedding** (`embed`): local (Ollama) and remote (OpenAI) backends
//!   behind one trait, selected by configuration
//! - **Orchestration** (`recommend`): lookup strategy selection, the
//!   degradation ladder, embed + rerank
//!
//! ## Library usage
//!
//! ```no_run
//! use squin::interview::{self, Answer, InterviewState, QuestionId};
//! use squin::recommend::{RecommendRequest, Recommender};
//! use squin::config::Settings;
//!
//! let state = InterviewState::default();
//! let out = interview::apply(&state, QuestionId::Squin, &Answer::text("따뜻한 성장담"), 2026);
//!
//! let settings = Settings::from_env().unwrap();
//! let recommender = Recommender::from_settings(&settings).unwrap();
//! let items = recommender.recommend(&RecommendRequest {
//!     narrative: out.state.narrative.clone(),
//!     constraints: out.state.constraints.clone(),
//!     ..RecommendRequest::default()
//! }).unwrap();
//! ```

pub mod catalog;
pub mod config;
pub mod embed;
pub mod error;
pub mod interview;
pub mod rank;
pub mod recommend;
