use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::ops::{self, TemperatureInputError};
use crate::render::{Envelope, OutputFormat};
use crate::util::{cors_layer_from_env, AppState};

pub const WELCOME: &str = "Welcome To MoreLess User Managment";
pub const GREETING: &str = "Hello Les Fous!";

const ROUTES: &[&str] = &[
    "/",
    "/hello",
    "/invert",
    "/f2c",
    "/c2f",
    "/random-joke",
    "/status",
];

/// `?output=` on every rendered route.
#[derive(Debug, Default, Deserialize)]
pub struct OutputQuery {
    pub output: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InvertQuery {
    pub phrase: Option<String>,
    pub output: Option<String>,
}

/// Temperatures arrive as raw strings so a bad number is rendered through the
/// failure envelope instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct FahrenheitQuery {
    pub fahrenheit: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CelsiusQuery {
    pub celsius: Option<String>,
    pub output: Option<String>,
}

/// Build the Axum router with all tool routes, CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/hello", get(hello))
        .route("/invert", get(invert))
        .route("/f2c", get(fahrenheit_to_celsius))
        .route("/c2f", get(celsius_to_fahrenheit))
        .route("/random-joke", get(random_joke))
        .route("/status", get(status))
        .with_state(Arc::new(state))
        .layer(cors_layer_from_env())
        .layer(TraceLayer::new_for_http())
}

async fn index() -> &'static str {
    WELCOME
}

async fn hello() -> &'static str {
    GREETING
}

/// Service status endpoint exposing version and available routes.
async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "multitool",
        "version": env!("CARGO_PKG_VERSION"),
        "joke_enabled": state.joke_enabled,
        "escape_output": state.renderer.escapes(),
        "routes": ROUTES,
    }))
}

async fn invert(
    State(state): State<Arc<AppState>>,
    Query(q): Query<InvertQuery>,
) -> Result<Response, AppError> {
    let format = OutputFormat::parse_lenient(q.output.as_deref());
    match q.phrase.as_deref().filter(|p| !p.is_empty()) {
        Some(phrase) => {
            let message = ops::invert_message(phrase);
            respond(&state, &message, format, Envelope::Success).await
        }
        None => {
            let message = "Please provide a non-empty phrase.";
            respond(&state, message, format, Envelope::Failure).await
        }
    }
}

async fn fahrenheit_to_celsius(
    State(state): State<Arc<AppState>>,
    Query(q): Query<FahrenheitQuery>,
) -> Result<Response, AppError> {
    let format = OutputFormat::parse_lenient(q.output.as_deref());
    match ops::parse_temperature(q.fahrenheit.as_deref()) {
        Ok(f) => respond(&state, &ops::f2c_message(f), format, Envelope::Success).await,
        Err(e) => {
            let message = temperature_failure("Fahrenheit", e);
            respond(&state, &message, format, Envelope::Failure).await
        }
    }
}

async fn celsius_to_fahrenheit(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CelsiusQuery>,
) -> Result<Response, AppError> {
    let format = OutputFormat::parse_lenient(q.output.as_deref());
    match ops::parse_temperature(q.celsius.as_deref()) {
        Ok(c) => respond(&state, &ops::c2f_message(c), format, Envelope::Success).await,
        Err(e) => {
            let message = temperature_failure("Celsius", e);
            respond(&state, &message, format, Envelope::Failure).await
        }
    }
}

async fn random_joke(
    State(state): State<Arc<AppState>>,
    Query(q): Query<OutputQuery>,
) -> Result<Response, AppError> {
    let format = OutputFormat::parse_lenient(q.output.as_deref());
    let joke = state.jokes.fetch_joke().await?;
    respond(&state, &joke, format, Envelope::Success).await
}

fn temperature_failure(scale: &str, err: TemperatureInputError) -> String {
    match err {
        TemperatureInputError::Missing => format!("Please provide a {scale} temperature."),
        TemperatureInputError::NotANumber => {
            format!("Please provide a valid numeric {scale} temperature.")
        }
    }
}

/// Render `message` and attach the matching content type. Failure envelopes
/// are sent with 400.
async fn respond(
    state: &AppState,
    message: &str,
    format: OutputFormat,
    envelope: Envelope,
) -> Result<Response, AppError> {
    let rendered = state.renderer.render(message, format, envelope).await?;
    let status = match envelope {
        Envelope::Success => StatusCode::OK,
        Envelope::Failure => {
            tracing::debug!(message, ?format, "rejected request input");
            StatusCode::BAD_REQUEST
        }
    };
    Ok((
        status,
        [(header::CONTENT_TYPE, rendered.content_type())],
        rendered.body,
    )
        .into_response())
}
