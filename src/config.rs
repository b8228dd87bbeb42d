use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default upstream for `/random-joke`.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_JOKE_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_JOKE_PROMPT: &str = "Tell me a joke related to Devops or ICT.";
pub const DEFAULT_JOKE_MAX_TOKENS: u32 = 50;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// A credential that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Settings for the chat-completion upstream used by `/random-joke`.
#[derive(Debug, Clone)]
pub struct JokeConfig {
    pub base_url: String,
    pub api_key: Option<Secret>,
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for JokeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_JOKE_MODEL.to_string(),
            prompt: DEFAULT_JOKE_PROMPT.to_string(),
            max_tokens: DEFAULT_JOKE_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

impl JokeConfig {
    /// `{base_url}/chat/completions`, tolerant of a trailing slash on the base.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Process-wide configuration, loaded once at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub template_dir: PathBuf,
    /// Escape message text inside JSON/XML/HTML envelopes.
    pub escape_output: bool,
    pub joke: JokeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            template_dir: PathBuf::from("templates"),
            escape_output: true,
            joke: JokeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Build configuration from process environment variables.
    ///
    /// Environment:
    /// - BIND_ADDR                            -> listen address (default 0.0.0.0:8080)
    /// - MULTITOOL_TEMPLATE_DIR               -> directory holding result.html (default ./templates)
    /// - MULTITOOL_ESCAPE_OUTPUT              -> 1|true|yes|on / 0|false|no|off (default on)
    /// - OPENAI_BASE_URL                      -> chat-completion base URL
    /// - OPENAI_API_KEY                       -> bearer credential; unset disables /random-joke
    /// - MULTITOOL_JOKE_MODEL / _PROMPT / _MAX_TOKENS
    /// - MULTITOOL_UPSTREAM_TIMEOUT_SECONDS   -> outbound request timeout (u64)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading through `lookup`, so tests
    /// do not have to mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let escape_output = match get("MULTITOOL_ESCAPE_OUTPUT") {
            Some(v) => parse_flag(&v).unwrap_or_else(|| {
                tracing::warn!(value = %v, "MULTITOOL_ESCAPE_OUTPUT is not a boolean; keeping escaping on");
                true
            }),
            None => defaults.escape_output,
        };

        let max_tokens = parse_or_default(
            "MULTITOOL_JOKE_MAX_TOKENS",
            get("MULTITOOL_JOKE_MAX_TOKENS"),
            DEFAULT_JOKE_MAX_TOKENS,
        );
        let timeout_secs = parse_or_default(
            "MULTITOOL_UPSTREAM_TIMEOUT_SECONDS",
            get("MULTITOOL_UPSTREAM_TIMEOUT_SECONDS"),
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        );

        AppConfig {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            template_dir: get("MULTITOOL_TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_dir),
            escape_output,
            joke: JokeConfig {
                base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.joke.base_url),
                api_key: get("OPENAI_API_KEY").map(Secret::new),
                model: get("MULTITOOL_JOKE_MODEL").unwrap_or(defaults.joke.model),
                prompt: get("MULTITOOL_JOKE_PROMPT").unwrap_or(defaults.joke.prompt),
                max_tokens,
                timeout: Duration::from_secs(timeout_secs),
            },
        }
    }
}

/// Truthy: 1,true,yes,on. Falsy: 0,false,no,off.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + Copy + fmt::Display,
{
    match raw {
        Some(v) => v.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %v, fallback = %default, "invalid numeric setting");
            default
        }),
        None => default,
    }
}
