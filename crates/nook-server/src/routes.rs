use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::server::AppState;
use crate::service::DEFAULT_CHANNEL;
use crate::template;

/// Extract a named cookie from the request headers.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').map(str::trim).find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == name && !v.is_empty()).then(|| v.to_string())
    })
}

fn set_cookie(headers: &mut HeaderMap, name: &str, value: &str) {
    if let Ok(v) = HeaderValue::from_str(&format!("{name}={value}")) {
        headers.append(header::SET_COOKIE, v);
    }
}

/// Chat page for the cookie-selected channel.
///
/// First visit issues a session cookie; the channel cookie defaults to
/// the standing default channel. Viewing a channel creates it lazily.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let mut response_headers = HeaderMap::new();

    let session_id = match cookie_value(&headers, "uuid") {
        Some(id) => id,
        None => {
            let id = uuid::Uuid::now_v7().to_string();
            set_cookie(&mut response_headers, "uuid", &id);
            id
        }
    };

    let channel = match cookie_value(&headers, "channel") {
        Some(ch) => ch,
        None => {
            set_cookie(&mut response_headers, "channel", DEFAULT_CHANNEL);
            DEFAULT_CHANNEL.to_string()
        }
    };

    let ch = state.service.registry().get_or_create(&channel);
    debug!(channel = %channel, messages = ch.messages.len(), "chat page viewed");

    let body = template::chat_page(&session_id, &channel, &ch.messages);
    (response_headers, Html(body))
}

/// Sorted channel listing.
pub async fn channels(State(state): State<AppState>) -> Html<String> {
    let names = state.service.registry().list();
    Html(template::channels_page(&names))
}

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub markdown: bool,
}

/// Inbound prompt submission.
pub async fn prompt(
    State(state): State<AppState>,
    Json(req): Json<PromptRequest>,
) -> impl IntoResponse {
    if req.uuid.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "missing uuid"})),
        );
    }
    if req.prompt.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "missing prompt"})),
        );
    }

    let reply = state
        .service
        .prompt(&req.uuid, &req.channel, &req.prompt, req.markdown)
        .await;

    let rendered = if req.markdown {
        reply.rendered_html
    } else {
        String::new()
    };

    (
        StatusCode::OK,
        Json(json!({"answer": reply.answer, "markdown": rendered})),
    )
}

/// Health check endpoint.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "healthy"}))
}
