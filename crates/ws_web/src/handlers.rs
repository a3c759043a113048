use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use ws_core::{Article, ChatRequest, Error, HistoryTurn, Role};
use ws_inference::prompt::truncate_history;

use crate::AppState;

pub const DEFAULT_RANDOM_COUNT: usize = 5;
pub const MAX_RANDOM_COUNT: usize = 20;
pub const DEFAULT_SEARCH_LIMIT: usize = 3;

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Pull a chat request out of an arbitrary JSON body. Only `prompt` is
/// required; everything else degrades to empty.
fn parse_chat_request(body: &[u8]) -> Option<ChatRequest> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let prompt = value.get("prompt")?.as_str()?.trim();
    if prompt.is_empty() {
        return None;
    }

    let text = |field: &str| value.get(field).and_then(Value::as_str).unwrap_or_default().to_string();
    let history: Vec<HistoryTurn> = value
        .get("history")
        .and_then(Value::as_array)
        .map(|turns| {
            turns
                .iter()
                .map(|turn| HistoryTurn {
                    role: Role::from_wire(turn.get("role").and_then(Value::as_str).unwrap_or_default()),
                    content: turn.get("content").and_then(Value::as_str).unwrap_or_default().to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    Some(ChatRequest {
        prompt: prompt.to_string(),
        topic: text("topic"),
        context: text("context"),
        history: truncate_history(&history),
    })
}

pub async fn chat(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let Some(model) = state.chat_model.clone() else {
        tracing::error!("Chat request refused: no GEMINI_API_KEY configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Missing GEMINI_API_KEY");
    };

    let Some(request) = parse_chat_request(&body) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid prompt");
    };

    tracing::debug!(
        "💬 Chat about {:?} ({} history turns) via {}",
        request.topic,
        request.history.len(),
        model.name()
    );
    match model.generate(&request).await {
        Ok(text) => Json(json!({ "text": text })).into_response(),
        Err(e) => {
            tracing::error!("Chat model {} failed: {}", model.name(), e);
            let message = match e {
                Error::ChatService(message) => message,
                other => other.to_string(),
            };
            error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RandomParams {
    count: Option<usize>,
}

pub async fn random_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RandomParams>,
) -> Json<Vec<Article>> {
    let count = params.count.unwrap_or(DEFAULT_RANDOM_COUNT).min(MAX_RANDOM_COUNT);
    Json(state.source.fetch_random_articles(count).await)
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

pub async fn search_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.trim();
    if query.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Missing query");
    }
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    Json(state.source.search_articles(query, limit).await).into_response()
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "model": state.chat_model.as_ref().map(|model| model.name().to_string()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_request_normalizes_history() {
        let body = json!({
            "prompt": "  Who built it? ",
            "topic": "Eiffel Tower",
            "history": [
                { "role": "assistant", "content": "Hello" },
                { "role": "system", "content": "ignored role" },
                { "role": "assistant" }
            ]
        });
        let request = parse_chat_request(body.to_string().as_bytes()).unwrap();

        assert_eq!(request.prompt, "Who built it?");
        assert_eq!(request.topic, "Eiffel Tower");
        assert_eq!(request.context, "");
        let roles: Vec<Role> = request.history.iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(request.history[2].content, "");
    }

    #[test]
    fn test_parse_chat_request_keeps_last_twelve_turns() {
        let history: Vec<Value> = (0..20).map(|i| json!({ "role": "user", "content": i.to_string() })).collect();
        let body = json!({ "prompt": "q", "history": history });
        let request = parse_chat_request(body.to_string().as_bytes()).unwrap();

        assert_eq!(request.history.len(), 12);
        assert_eq!(request.history[0].content, "8");
    }

    #[test]
    fn test_parse_chat_request_rejects_bad_prompts() {
        for body in ["not json", "{}", r#"{"prompt": 3}"#, r#"{"prompt": "   "}"#, "[]"] {
            assert!(parse_chat_request(body.as_bytes()).is_none(), "{}", body);
        }
    }
}
