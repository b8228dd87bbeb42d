#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use multitool::joke::{JokeError, JokeSource};
use multitool::render::Renderer;
use multitool::server::build_router;
use multitool::util::AppState;
use tower::ServiceExt;

pub mod upstream_stub;

/// Directory holding the shipped `result.html`.
pub fn template_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"))
}

/// Joke source answering from memory.
pub struct StubJokes {
    pub reply: Result<String, fn() -> JokeError>,
}

#[async_trait]
impl JokeSource for StubJokes {
    async fn fetch_joke(&self) -> Result<String, JokeError> {
        match &self.reply {
            Ok(joke) => Ok(joke.clone()),
            Err(make) => Err(make()),
        }
    }
}

pub fn app_with(renderer: Renderer, jokes: Arc<dyn JokeSource>) -> Router {
    build_router(AppState::with_joke_source(renderer, jokes))
}

/// Router with the shipped templates, escaping on, and a fixed joke.
pub fn app() -> Router {
    app_with(
        Renderer::new(template_dir(), true),
        Arc::new(StubJokes {
            reply: Ok("Why do programmers prefer dark mode? Because light attracts bugs.".into()),
        }),
    )
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

/// Issue a GET through the router without binding a socket.
pub async fn get(app: Router, uri: &str) -> TestResponse {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("router is infallible");
    let status = resp.status();
    let content_type = resp
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    TestResponse {
        status,
        content_type,
        body: String::from_utf8(bytes.to_vec()).expect("utf-8 body"),
    }
}
