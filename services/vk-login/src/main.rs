//! VK login helper
//!
//! Runs one OAuth authorization-code login against VK:
//! 1. Prints the authorization URL for the configured app
//! 2. Serves the callback URL locally and waits for the redirect
//! 3. Exchanges the code, fetches the user's profile, and exits

mod config;
mod error;
mod login;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vk_api::{Authenticator, Credentials};

use crate::config::Config;
use crate::login::{LoginState, callback_handler};

/// Build the router: the callback route plus a health probe.
fn build_router(state: LoginState, callback_path: &str) -> Router {
    Router::new()
        .route(callback_path, get(callback_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // JSON logs; LOG_LEVEL wins over RUST_LOG
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str());

    let config_path = Config::resolve_path(cli_config_path);
    info!(path = %config_path.display(), "loading configuration");

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let secret = config
        .app
        .secret
        .clone()
        .context("app secret was not resolved")?;
    let credentials = Credentials::new(
        config.app.app_id.clone(),
        secret,
        config.app.scopes.clone(),
        &config.app.callback_url,
    )
    .context("invalid app credentials")?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.server.timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    let auth = Authenticator::new(credentials, config.api.clone())
        .context("invalid API configuration")?
        .with_http_client(http.clone());

    let expected_state = uuid::Uuid::new_v4().as_simple().to_string();
    let authorization_url = auth.authorization_url(&expected_state);
    let callback_path = config.callback_path();

    info!(
        app_id = %config.app.app_id,
        listen_addr = %config.server.listen_addr,
        callback_path = %callback_path,
        scopes = config.app.scopes.len(),
        "configuration loaded"
    );
    println!("Open this URL to authorize:\n{authorization_url}");

    let completed = Arc::new(Notify::new());
    let state = LoginState {
        auth: Arc::new(auth),
        api: config.api.clone(),
        lookup: Arc::new(config.lookup),
        http,
        expected_state: expected_state.into(),
        completed: completed.clone(),
    };

    let app = build_router(state, &callback_path);
    let listener = TcpListener::bind(config.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.server.listen_addr))?;
    info!(addr = %config.server.listen_addr, "waiting for callback");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = completed.notified() => info!("login complete, shutting down"),
                _ = shutdown_signal() => {}
            }
        })
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn health_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "waiting_for_callback" }))
}

/// Wait for SIGTERM or SIGINT.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use vk_api::{ApiConfig, NameCase};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::LookupConfig;

    const CALLBACK: &str = "http://127.0.0.1:8765/vk/callback";

    fn test_state(server_uri: &str) -> LoginState {
        let api = ApiConfig {
            token_url: format!("{server_uri}/access_token"),
            api_base_url: format!("{server_uri}/method/"),
            ..ApiConfig::default()
        };
        let creds = Credentials::new("4242", "app-secret", ["email"], CALLBACK).unwrap();
        LoginState {
            auth: Arc::new(Authenticator::new(creds, api.clone()).unwrap()),
            api,
            lookup: Arc::new(LookupConfig {
                fields: vec!["city".into()],
                name_case: NameCase::Nom,
            }),
            http: reqwest::Client::new(),
            expected_state: "expected-state".into(),
            completed: Arc::new(Notify::new()),
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn mount_no_requests(server: &MockServer) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn health_endpoint_returns_json() {
        let app = build_router(test_state("http://unused"), "/vk/callback");
        let (status, json) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "waiting_for_callback");
    }

    #[tokio::test]
    async fn callback_completes_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/access_token"))
            .and(query_param("code", "good-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok123",
                "expires_in": 86400,
                "user_id": 42,
                "email": "user@example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/method/users.get"))
            .and(query_param("access_token", "tok123"))
            .and(query_param("user_ids", "42"))
            .and(query_param("fields", "city"))
            .and(query_param("name_case", "nom"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": [{"id": 42, "first_name": "Ivan", "last_name": "Petrov",
                              "city": {"id": 1, "title": "Moscow"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let state = test_state(&server.uri());
        let completed = state.completed.clone();
        let app = build_router(state, "/vk/callback");

        let (status, json) =
            get_json(app, "/vk/callback?code=good-code&state=expected-state").await;
        assert_eq!(status, StatusCode::OK, "body: {json}");
        assert_eq!(json["user_id"], "42");
        assert_eq!(json["email"], "user@example.com");
        assert_eq!(json["profile"]["first_name"], "Ivan");
        assert_eq!(json["profile"]["city"]["title"], "Moscow");

        // A stored permit means the shutdown signal was sent
        tokio::time::timeout(Duration::from_secs(1), completed.notified())
            .await
            .expect("login completion must be signalled");
    }

    #[tokio::test]
    async fn callback_rejects_state_mismatch() {
        let server = MockServer::start().await;
        mount_no_requests(&server).await;

        let app = build_router(test_state(&server.uri()), "/vk/callback");
        let (status, json) = get_json(app, "/vk/callback?code=c&state=forged").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("state"));
    }

    #[tokio::test]
    async fn callback_reports_user_denial() {
        let server = MockServer::start().await;
        mount_no_requests(&server).await;

        let app = build_router(test_state(&server.uri()), "/vk/callback");
        let (status, json) = get_json(
            app,
            "/vk/callback?error=access_denied&error_description=User%20denied%20your%20request",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["error"],
            "authorization denied: User denied your request"
        );
    }

    #[tokio::test]
    async fn callback_without_code_is_bad_request() {
        let server = MockServer::start().await;
        mount_no_requests(&server).await;

        let app = build_router(test_state(&server.uri()), "/vk/callback");
        let (status, _) = get_json(app, "/vk/callback?state=expected-state").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn expired_code_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Code is expired."
            })))
            .mount(&server)
            .await;

        let app = build_router(test_state(&server.uri()), "/vk/callback");
        let (status, json) =
            get_json(app, "/vk/callback?code=old&state=expected-state").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "token exchange failed: Code is expired.");
    }
}
