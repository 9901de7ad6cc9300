//! HTTP routes.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use aqua_agent_core::DisplaySink;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Omitted on the first message; the response carries the assigned id.
    pub session_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub kind: &'static str,
    pub reply: String,
    /// Product images to render alongside the reply, fire-and-forget.
    pub images: Vec<String>,
}

/// Display sink that buffers one HTTP exchange. Image failures are the
/// browser's problem; the URLs are merely forwarded.
#[derive(Default)]
struct BufferSink {
    replies: Vec<String>,
    images: Vec<String>,
}

impl DisplaySink for BufferSink {
    fn display_reply(&mut self, text: &str) {
        self.replies.push(text.to_string());
    }

    fn display_image(&mut self, url: &str) {
        self.images.push(url.to_string());
    }
}

async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<ChatResponse> {
    let (session_id, session) = state.session(request.session_id);

    // One turn at a time per session; concurrent requests for the same
    // session queue here.
    let mut session = session.lock().await;
    let mut sink = BufferSink::default();

    match state
        .engine
        .process_turn(&mut session, &request.message, &mut sink)
        .await
    {
        Ok(outcome) => Json(ChatResponse {
            session_id,
            kind: outcome.kind.as_str(),
            reply: outcome.reply,
            images: sink.images,
        }),
        Err(error) => {
            // Collaborator failures surface as a polite apology; the
            // turn was not recorded, so an identical retry starts fresh.
            tracing::error!(%error, collaborator = error.is_collaborator_failure(), "turn failed");
            Json(ChatResponse {
                session_id,
                kind: "error",
                reply: state.engine.templates().apology.clone(),
                images: Vec::new(),
            })
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "products": state.engine.catalog().len(),
        "sessions": state.session_count(),
    }))
}
