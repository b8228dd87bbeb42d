use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{parse_flag, AppConfig};
use crate::joke::{HttpJokeClient, JokeSource};
use crate::render::Renderer;

/// Initialize dotenv and structured tracing based on RUST_LOG.
/// - Supports explicit env file paths via ENV_FILE, DOTENV_PATH
/// - Falls back to default .env discovery
/// - Logs the source used
pub fn init_tracing() {
    let mut env_source: String = "none".into();
    for key in ["ENV_FILE", "DOTENV_PATH"] {
        if let Ok(p) = std::env::var(key) {
            let p = p.trim();
            if !p.is_empty()
                && std::path::Path::new(p).is_file()
                && dotenvy::from_filename(p).is_ok()
            {
                env_source = format!("{p} ({key})");
                break;
            }
        }
    }

    if env_source == "none" {
        if let Ok(path) = dotenvy::dotenv() {
            env_source = path.display().to_string();
        }
    }

    // Initialize tracing (respects RUST_LOG potentially provided by the env file)
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=info".into());
    let subscriber = fmt().with_env_filter(EnvFilter::new(filter)).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::info!("Environment loaded from: {}", env_source);
}

/// Shared application state used by the HTTP server and handlers.
#[derive(Clone)]
pub struct AppState {
    pub renderer: Renderer,
    pub jokes: Arc<dyn JokeSource>,
    /// Whether an upstream credential was configured at start-up.
    pub joke_enabled: bool,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        let client = HttpJokeClient::new(build_http_client_from_env(), config.joke.clone());
        Self {
            renderer: Renderer::new(config.template_dir.clone(), config.escape_output),
            jokes: Arc::new(client),
            joke_enabled: config.joke.api_key.is_some(),
        }
    }

    /// State with a caller-supplied joke source (used by tests and embedders).
    pub fn with_joke_source(renderer: Renderer, jokes: Arc<dyn JokeSource>) -> Self {
        Self {
            renderer,
            jokes,
            joke_enabled: true,
        }
    }
}

/// Build an HTTP client honoring proxy environment variables.
///
/// Environment:
/// - MULTITOOL_NO_PROXY = 1|true|yes|on  -> disable all proxies
/// - HTTP_PROXY / http_proxy             -> HTTP proxy
/// - HTTPS_PROXY / https_proxy           -> HTTPS proxy
///
/// Request timeouts are applied per call from `JokeConfig::timeout`.
pub fn build_http_client_from_env() -> reqwest::Client {
    let mut builder = reqwest::Client::builder();

    let no_proxy = std::env::var("MULTITOOL_NO_PROXY")
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(false);

    if no_proxy {
        builder = builder.no_proxy();
    } else {
        if let Ok(http_p) = std::env::var("HTTP_PROXY").or_else(|_| std::env::var("http_proxy")) {
            let u = http_p.trim();
            if !u.is_empty() {
                if let Ok(p) = reqwest::Proxy::http(u) {
                    builder = builder.proxy(p);
                }
            }
        }
        if let Ok(https_p) = std::env::var("HTTPS_PROXY").or_else(|_| std::env::var("https_proxy"))
        {
            let u = https_p.trim();
            if !u.is_empty() {
                if let Ok(p) = reqwest::Proxy::https(u) {
                    builder = builder.proxy(p);
                }
            }
        }
    }

    builder = builder.user_agent(format!("multitool/{}", env!("CARGO_PKG_VERSION")));

    builder.build().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to default HTTP client");
        reqwest::Client::new()
    })
}

/// Build a JSON error response with the given HTTP status and message.
pub fn error_response(status: StatusCode, msg: &str) -> Response {
    let body = serde_json::json!({ "error": { "message": msg } });
    (status, axum::Json(body)).into_response()
}

/// Build a CORS layer from environment variables.
///
/// Environment variables:
/// - CORS_ALLOWED_ORIGINS: "*" or comma-separated origins (e.g., "https://a.com, https://b.com")
/// - CORS_MAX_AGE: max age in seconds (u64)
///
/// Only GET is ever routed, so methods are fixed. Origins default to Any.
pub fn cors_layer_from_env() -> tower_http::cors::CorsLayer {
    use std::time::Duration;
    use tower_http::cors::{AllowOrigin, Any, CorsLayer};

    let mut layer = CorsLayer::new()
        .allow_methods([http::Method::GET])
        .allow_headers(Any);

    let origins: Vec<http::HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| s.trim() != "*")
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .filter_map(|p| http::HeaderValue::from_str(p).ok())
                .collect()
        })
        .unwrap_or_default();
    layer = if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    };

    if let Ok(secs) = std::env::var("CORS_MAX_AGE") {
        if let Ok(n) = secs.trim().parse::<u64>() {
            layer = layer.max_age(Duration::from_secs(n));
        }
    }

    layer
}
