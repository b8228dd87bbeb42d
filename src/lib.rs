#![forbid(unsafe_code)]
#![doc = r#"
MultiTool

A small HTTP toolbox: phrase inversion, Fahrenheit/Celsius conversion and a
chat-completion powered joke, each rendered as plain text, HTML, JSON or XML
depending on the caller's `output` query parameter.

Modules
- `render`: Envelope rendering per output format (the shared piece every route goes through).
- `ops`: Pure inversion and temperature conversion.
- `joke`: Outbound Chat Completions call behind the `JokeSource` trait.
- `models`: Chat Completions request/response subset.
- `server`: Axum router and handlers.
- `config`: Environment configuration.
- `error`: Infrastructure errors mapped to HTTP responses.
- `util`: Shared helpers (tracing, HTTP client, CORS, app state).
"#]

pub mod config;
pub mod error;
pub mod joke;
pub mod models;
pub mod ops;
pub mod render;
pub mod server;
pub mod util;

pub use crate::config::AppConfig;
pub use crate::error::AppError;
pub use crate::joke::{HttpJokeClient, JokeError, JokeSource};
pub use crate::render::{Envelope, OutputFormat, Rendered, Renderer};
pub use crate::server::build_router;
pub use crate::util::AppState;

// Re-export the chat model namespace for convenience (`use multitool::chat`).
pub use crate::models::chat;
