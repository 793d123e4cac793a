//! squind — the squin HTTP server.
//!
//! Exposes the interview and recommendation surfaces over REST:
//!
//! - `GET  /health` — server status
//! - `GET  /interview/questions` — the fixed question sequence
//! - `POST /interview/parse` — fold one answer into session state
//! - `POST /recommend` — run the retrieval + rerank pipeline
//!
//! Session state lives with the client: `/interview/parse` takes the
//! current constraints and narrative and returns the updated pair, so the
//! server holds no per-user state. Catalog failures map to 502, embedding
//! and configuration failures to 500; an empty recommendation list is a
//! 200 with zero items.
//!
//! Build and run: `cargo run --features server --bin squind`

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Datelike;
use miette::IntoDiagnostic;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use squin::catalog::categories;
use squin::config::Settings;
use squin::error::SquinError;
use squin::interview::{self, Answer, Constraints, InterviewState, QuestionId, QUESTIONS};
use squin::recommend::{RecommendRequest, Recommendation, Recommender};

struct ServerState {
    recommender: Recommender,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load(None)?;
    // Collaborators are constructed once; a missing catalog key or remote
    // embedding key fails startup instead of the first request.
    let recommender = Recommender::from_settings(&settings)?;
    let state = Arc::new(ServerState { recommender });

    let app = Router::new()
        .route("/health", get(health))
        .route("/interview/questions", get(questions))
        .route("/interview/parse", post(parse))
        .route("/recommend", post(recommend))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(settings.listen_addr.as_str())
        .await
        .into_diagnostic()?;
    tracing::info!(addr = %settings.listen_addr, "squind listening");
    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn questions() -> Json<Value> {
    let questions: Vec<Value> = QUESTIONS
        .iter()
        .map(|q| {
            let options: Vec<&str> = if q.id == QuestionId::Genre {
                categories::genre_options()
            } else {
                q.options.to_vec()
            };
            json!({
                "id": q.id.as_wire(),
                "kind": q.kind,
                "prompt": q.prompt,
                "options": options,
            })
        })
        .collect();
    Json(json!({ "questions": questions }))
}

/// One interview step: current session state plus the answer.
#[derive(Deserialize)]
struct ParseRequest {
    qid: String,
    #[serde(default)]
    free_text: Option<String>,
    #[serde(default)]
    choice: Option<String>,
    #[serde(default)]
    choices: Option<Vec<String>>,
    #[serde(default)]
    genres: Option<Vec<String>>,
    #[serde(default)]
    constraints: Constraints,
    #[serde(default)]
    narrative: String,
}

#[derive(Serialize)]
struct ParseResponse {
    constraints: Constraints,
    narrative: String,
    negatives: Vec<String>,
}

async fn parse(Json(request): Json<ParseRequest>) -> Json<ParseResponse> {
    let state = InterviewState {
        constraints: request.constraints,
        narrative: request.narrative,
    };
    let answer = Answer {
        free_text: request.free_text,
        choice: request.choice,
        choices: request.choices,
        genres: request.genres,
    };
    let outcome = interview::apply_raw(
        &state,
        &request.qid,
        &answer,
        chrono::Utc::now().year(),
    );
    Json(ParseResponse {
        constraints: outcome.state.constraints,
        narrative: outcome.state.narrative,
        negatives: outcome.negatives,
    })
}

#[derive(Serialize)]
struct RecommendResponse {
    items: Vec<Recommendation>,
}

async fn recommend(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, (StatusCode, String)> {
    // The pipeline is synchronous end to end; keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || state.recommender.recommend(&request))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    match result {
        Ok(items) => Ok(Json(RecommendResponse { items })),
        Err(SquinError::Catalog(e)) => Err((StatusCode::BAD_GATEWAY, format!("catalog error: {e}"))),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}
