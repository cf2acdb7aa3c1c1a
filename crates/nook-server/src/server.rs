use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::service::ChatService;

/// Server configuration.
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ChatService>,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/channels", get(routes::channels))
        .route("/chat/prompt", post(routes::prompt))
        .route("/health", get(routes::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and start serving. Returns a handle that keeps the server
/// task alive and reports the bound port (useful with port 0).
pub async fn start(
    config: ServerConfig,
    service: Arc<ChatService>,
) -> Result<ServerHandle, std::io::Error> {
    let router = build_router(AppState { service });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "server started");

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        _server: server_handle,
    })
}

/// Handle returned by `start()`; keeps the server task alive.
pub struct ServerHandle {
    pub port: u16,
    _server: tokio::task::JoinHandle<()>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use nook_core::completer::Completer;
    use nook_llm::mock::{MockCompleter, MockReply};
    use nook_store::{ChannelRegistry, FlushSignal};

    fn test_service(replies: Vec<MockReply>) -> Arc<ChatService> {
        let (flush, _rx) = FlushSignal::new();
        let registry = Arc::new(ChannelRegistry::new(flush));
        let completer = Arc::new(MockCompleter::new(replies)) as Arc<dyn Completer>;
        let service = ChatService::new(registry, completer);
        service.seed_default_channels();
        Arc::new(service)
    }

    async fn start_test_server(replies: Vec<MockReply>) -> ServerHandle {
        let config = ServerConfig { port: 0 };
        start(config, test_service(replies)).await.unwrap()
    }

    #[tokio::test]
    async fn serves_health() {
        let handle = start_test_server(vec![]).await;
        assert!(handle.port > 0);

        let url = format!("http://127.0.0.1:{}/health", handle.port);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn chat_page_issues_session_cookie() {
        let handle = start_test_server(vec![]).await;
        let url = format!("http://127.0.0.1:{}/", handle.port);

        let client = reqwest::Client::new();
        let resp = client.get(&url).send().await.unwrap();
        assert_eq!(resp.status(), 200);

        let cookies: Vec<String> = resp
            .headers()
            .get_all("set-cookie")
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert!(cookies.iter().any(|c| c.starts_with("uuid=")));
        assert!(cookies.iter().any(|c| c.starts_with("channel=general")));

        let body = resp.text().await.unwrap();
        assert!(body.contains("<title>Chat | Nook</title>"));
    }

    #[tokio::test]
    async fn prompt_roundtrip_through_http() {
        let handle = start_test_server(vec![MockReply::text("**the answer**")]).await;
        let url = format!("http://127.0.0.1:{}/chat/prompt", handle.port);

        let client = reqwest::Client::new();
        let resp = client
            .post(&url)
            .json(&serde_json::json!({
                "uuid": "sess-1",
                "prompt": "the question",
                "channel": "general",
                "markdown": true
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["answer"], "**the answer**");
        assert!(body["markdown"]
            .as_str()
            .unwrap()
            .contains("<strong>the answer</strong>"));
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected() {
        let handle = start_test_server(vec![]).await;
        let url = format!("http://127.0.0.1:{}/chat/prompt", handle.port);

        let client = reqwest::Client::new();
        let resp = client
            .post(&url)
            .json(&serde_json::json!({"uuid": "sess-1", "prompt": ""}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
    }

    #[tokio::test]
    async fn channel_listing_is_sorted() {
        let handle = start_test_server(vec![]).await;
        let url = format!("http://127.0.0.1:{}/channels", handle.port);

        let body = reqwest::get(&url).await.unwrap().text().await.unwrap();
        let crypto = body.find("#crypto").unwrap();
        let general = body.find("#general").unwrap();
        let test = body.find("#test").unwrap();
        assert!(crypto < general && general < test);
    }
}
