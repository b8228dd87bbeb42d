//! Multi-format response rendering.
//!
//! Every handler ends by wrapping a fully formed message string in an envelope
//! chosen by the caller's `output` parameter:
//! - `text`: the message as-is
//! - `json`: `{"message": "..."}` / `{"error": "..."}`
//! - `xml`: `<response><message>...</message></response>` / `<error><message>...</message></error>`
//! - `html`: the `result.html` template (success) or an inline red error block (failure)
//!
//! Unknown formats silently degrade to `text`.

use std::path::PathBuf;

use thiserror::Error;

/// File name of the HTML success template inside the template directory.
pub const RESULT_TEMPLATE: &str = "result.html";

/// Title substituted into the `{{title}}` placeholder of the HTML template.
pub const HTML_TITLE: &str = "MultiTool API Response";

const TITLE_PLACEHOLDER: &str = "{{title}}";
const MESSAGE_PLACEHOLDER: &str = "{{message}}";

/// Caller-selected rendering mode for a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
    Json,
    Xml,
}

impl OutputFormat {
    /// Case-insensitive parse; anything unrecognised (or absent) is `Text`.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return OutputFormat::Text;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "html" => OutputFormat::Html,
            "json" => OutputFormat::Json,
            "xml" => OutputFormat::Xml,
            _ => OutputFormat::Text,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Text => "text/plain; charset=utf-8",
            OutputFormat::Html => "text/html; charset=utf-8",
            OutputFormat::Json => "application/json; charset=utf-8",
            OutputFormat::Xml => "application/xml; charset=utf-8",
        }
    }
}

/// Which envelope template to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    Success,
    Failure,
}

/// A rendered body together with the format it was rendered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub format: OutputFormat,
    pub body: String,
}

impl Rendered {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read HTML template {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders messages into envelopes.
///
/// `escape` controls whether message text is escaped for the target format.
/// With escaping disabled the message is spliced in verbatim, so a quote or
/// angle bracket in user input can break the surrounding structure.
#[derive(Debug, Clone)]
pub struct Renderer {
    template_dir: PathBuf,
    escape: bool,
}

impl Renderer {
    pub fn new(template_dir: impl Into<PathBuf>, escape: bool) -> Self {
        Self {
            template_dir: template_dir.into(),
            escape,
        }
    }

    pub fn template_path(&self) -> PathBuf {
        self.template_dir.join(RESULT_TEMPLATE)
    }

    pub fn escapes(&self) -> bool {
        self.escape
    }

    pub async fn render(
        &self,
        message: &str,
        format: OutputFormat,
        envelope: Envelope,
    ) -> Result<Rendered, RenderError> {
        let body = match (format, envelope) {
            (OutputFormat::Text, _) => message.to_string(),
            (OutputFormat::Json, Envelope::Success) => self.json_envelope("message", message),
            (OutputFormat::Json, Envelope::Failure) => self.json_envelope("error", message),
            (OutputFormat::Xml, Envelope::Success) => format!(
                "<response><message>{}</message></response>",
                self.markup(message)
            ),
            (OutputFormat::Xml, Envelope::Failure) => {
                format!("<error><message>{}</message></error>", self.markup(message))
            }
            (OutputFormat::Html, Envelope::Success) => self.html_page(message).await?,
            (OutputFormat::Html, Envelope::Failure) => format!(
                "<div style='background-color: red; color: white; padding: 10px;'>{}</div>",
                self.markup(message)
            ),
        };
        Ok(Rendered { format, body })
    }

    // Keeps the `{"key": "value"}` spacing clients of the original service parse.
    fn json_envelope(&self, key: &str, message: &str) -> String {
        let value = if self.escape {
            // Serializing a &str cannot fail.
            serde_json::to_string(message).unwrap_or_else(|_| format!("\"{message}\""))
        } else {
            format!("\"{message}\"")
        };
        format!("{{\"{key}\": {value}}}")
    }

    fn markup(&self, message: &str) -> String {
        if self.escape {
            htmlescape::encode_minimal(message)
        } else {
            message.to_string()
        }
    }

    async fn html_page(&self, message: &str) -> Result<String, RenderError> {
        let path = self.template_path();
        let template = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| RenderError::Template {
                path: path.clone(),
                source,
            })?;
        Ok(template
            .replace(TITLE_PLACEHOLDER, HTML_TITLE)
            .replace(MESSAGE_PLACEHOLDER, &self.markup(message)))
    }
}
