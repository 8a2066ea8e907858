//! Axum router configuration with middleware.
//!
//! API routes live under `/api/`; `/chat` is kept as an alias of
//! `/api/chat` for older clients. Middleware: CORS and request tracing.
//!
//! When a web directory is given and exists, the built browser client is
//! served from it. API routes take priority; unknown paths fall through to
//! its `index.html`.

use std::path::Path;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState, web_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat::chat))
        // Auth
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // History
        .route(
            "/history",
            get(handlers::history::get_history)
                .post(handlers::history::save_history)
                .delete(handlers::history::clear_history),
        )
        .route("/init", get(handlers::init::init));

    let mut router = Router::new()
        .nest("/api", api_routes)
        .route("/chat", post(handlers::chat::chat))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(dir) = web_dir.filter(|dir| dir.exists()) {
        let serve_dir = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %dir.display(), "Static file serving enabled");
    }

    router
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::header::CONTENT_TYPE;
    use axum::http::{Request, Response, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use windveal_core::llm::box_provider::BoxChatProvider;
    use windveal_core::llm::fallback::FallbackChain;
    use windveal_core::llm::provider::ChatProvider;
    use windveal_infra::sqlite::pool::DatabasePool;
    use windveal_types::chat::ChatTurn;
    use windveal_types::llm::ProviderError;

    /// Provider with a canned outcome that counts its calls.
    struct StubProvider {
        name: &'static str,
        outcome: Result<String, ProviderError>,
        calls: Arc<AtomicUsize>,
    }

    impl ChatProvider for StubProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn complete(
            &self,
            _message: &str,
            _history: &[ChatTurn],
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn missing_key(env_var: &str) -> ProviderError {
        ProviderError::MissingCredential {
            env_var: env_var.to_string(),
        }
    }

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        std::mem::forget(dir);
        pool
    }

    /// Router over Gemini (no key), OpenAI and HuggingFace stubs.
    async fn build_test_router(
        openai: Result<String, ProviderError>,
        huggingface: Result<String, ProviderError>,
    ) -> (Router, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let stub = |name, outcome| {
            BoxChatProvider::new(StubProvider {
                name,
                outcome,
                calls: Arc::clone(&calls),
            })
        };
        let chain = FallbackChain::new(
            vec![
                stub("Gemini", Err(missing_key("GOOGLE_API_KEY"))),
                stub("OpenAI", openai),
                stub("HuggingFace", huggingface),
            ],
            Duration::from_secs(5),
        );
        let state = AppState::from_parts(chain, test_pool().await);
        (build_router(state, None), calls)
    }

    async fn default_router() -> Router {
        build_test_router(
            Ok("Hello there!".to_string()),
            Ok("unused".to_string()),
        )
        .await
        .0
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, json_body(response).await)
    }

    async fn register(app: &Router, username: &str, email: &str) -> (StatusCode, Value) {
        send(
            app,
            json_request(
                "POST",
                "/api/auth/register",
                json!({"username": username, "email": email, "password": "hunter22"}),
            ),
        )
        .await
    }

    #[tokio::test]
    async fn chat_blank_message_is_rejected_before_any_provider() {
        let (app, calls) =
            build_test_router(Ok("unused".to_string()), Ok("unused".to_string())).await;

        let (status, body) = send(
            &app,
            json_request("POST", "/api/chat", json!({"message": "   ", "history": []})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Message is required"}));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn chat_missing_or_empty_message_is_rejected() {
        let (app, calls) =
            build_test_router(Ok("unused".to_string()), Ok("unused".to_string())).await;

        for body in [json!({"history": []}), json!({"message": ""}), json!({})] {
            let (status, body) = send(&app, json_request("POST", "/api/chat", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"error": "Message is required"}));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn chat_tolerates_malformed_history_turns() {
        let app = default_router().await;

        let history = json!([
            {"role": null, "content": "x"},
            {"role": 5, "content": "y"},
            {"role": "bot", "content": null},
            {"content": "no role"}
        ]);
        let (status, body) = send(
            &app,
            json_request("POST", "/api/chat", json!({"message": "Hi", "history": history})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Hello there!");
    }

    #[tokio::test]
    async fn chat_accepts_body_without_json_content_type() {
        let app = default_router().await;
        let body = json!({"message": "Hi"}).to_string();

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .body(Body::from(body.clone()))
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(CONTENT_TYPE, "text/plain;charset=UTF-8")
            .body(Body::from(body))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"], "OpenAI");
    }

    #[tokio::test]
    async fn chat_falls_through_to_first_working_provider() {
        let (app, calls) = build_test_router(
            Ok("Hello there!".to_string()),
            Ok("should not be reached".to_string()),
        )
        .await;

        let (status, body) = send(
            &app,
            json_request("POST", "/api/chat", json!({"message": "Hi", "history": []})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": "Hello there!", "model": "OpenAI"}));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn chat_all_failed_reports_last_error() {
        let (app, calls) = build_test_router(
            Err(ProviderError::UpstreamHttp {
                status: 429,
                message: "Rate limit reached".to_string(),
                body: String::new(),
            }),
            Err(missing_key("HUGGINGFACE_API_KEY")),
        )
        .await;

        let (status, body) = send(
            &app,
            json_request("POST", "/api/chat", json!({"message": "Hi"})),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "HUGGINGFACE_API_KEY not set"}));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn chat_accepts_null_history_and_legacy_path() {
        let app = default_router().await;

        let (status, body) = send(
            &app,
            json_request("POST", "/chat", json!({"message": "Hi", "history": null})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"], "OpenAI");
    }

    #[tokio::test]
    async fn malformed_body_is_generic_failure() {
        let app = default_router().await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to process request"}));
    }

    #[tokio::test]
    async fn register_then_login() {
        let app = default_router().await;

        let (status, body) = register(&app, "ana", "ana@example.com").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["username"], "ana");
        assert_eq!(body["user"]["email"], "ana@example.com");
        assert!(body["user"].get("password_hash").is_none());

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/auth/login",
                json!({"username": "ana", "password": "hunter22"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "ana");
    }

    #[tokio::test]
    async fn register_duplicate_and_missing_fields() {
        let app = default_router().await;
        register(&app, "ana", "ana@example.com").await;

        let (status, _) = register(&app, "ana", "other@example.com").await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            json_request("POST", "/api/auth/register", json!({"username": "bob"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_wrong_password_is_unauthorized() {
        let app = default_router().await;
        register(&app, "ana", "ana@example.com").await;

        for username in ["ana", "ghost"] {
            let (status, body) = send(
                &app,
                json_request(
                    "POST",
                    "/api/auth/login",
                    json!({"username": username, "password": "wrong"}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn history_save_load_clear() {
        let app = default_router().await;
        let (_, body) = register(&app, "ana", "ana@example.com").await;
        let user_id = body["user"]["id"].as_i64().unwrap();
        let uri = format!("/api/history?userId={user_id}");

        let get = || Request::builder().uri(uri.as_str()).body(Body::empty()).unwrap();

        let (status, body) = send(&app, get()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"history": []}));

        let messages = json!([
            {"role": "user", "content": "Hi"},
            {"role": "bot", "content": "Hello there!"}
        ]);
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/history",
                json!({"userId": user_id.to_string(), "messages": messages}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (_, body) = send(&app, get()).await;
        assert_eq!(body["history"], messages);

        let (status, _) = send(
            &app,
            json_request("DELETE", "/api/history", json!({"userId": user_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, get()).await;
        assert_eq!(body, json!({"history": []}));
    }

    #[tokio::test]
    async fn history_keeps_client_turn_fields() {
        let app = default_router().await;
        let (_, body) = register(&app, "ana", "ana@example.com").await;
        let user_id = body["user"]["id"].as_i64().unwrap();

        let messages = json!([
            {"role": "user", "content": "Hi"},
            {"role": "bot", "content": "Hello", "feedback": "like"}
        ]);
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/history",
                json!({"userId": user_id, "messages": messages}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let request = Request::builder()
            .uri(format!("/api/history?userId={user_id}"))
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(&app, request).await;
        assert_eq!(body["history"], messages);
        assert_eq!(body["history"][1]["feedback"], "like");
    }

    #[tokio::test]
    async fn history_validation_errors() {
        let app = default_router().await;

        let request = Request::builder()
            .uri("/api/history")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "User ID required"}));

        let (status, body) = send(
            &app,
            json_request("POST", "/api/history", json!({"userId": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing data"}));

        let (status, _) = send(
            &app,
            json_request("POST", "/api/history", json!({"userId": 4242, "messages": []})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_and_init() {
        let app = default_router().await;

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let request = Request::builder().uri("/api/init").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn unknown_paths_fall_back_to_web_index() {
        let web = tempfile::tempdir().unwrap();
        std::fs::write(web.path().join("index.html"), "<html>windveal</html>").unwrap();

        let chain = FallbackChain::new(Vec::new(), Duration::from_secs(1));
        let state = AppState::from_parts(chain, test_pool().await);
        let app = build_router(state, Some(web.path()));

        let request = Request::builder()
            .uri("/some/client/route")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"<html>windveal</html>");
    }
}
