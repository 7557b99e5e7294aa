use serde::{Deserialize, Serialize};

use crate::text_bank::Locale;

/// Main configuration structure loaded from answer_normalizer.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub server: ServerConfig,
    pub completion: CompletionConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Immutable settings of the normalization pipeline
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Written to `meta.version` of every answer
    pub schema_version: String,
    /// Locale of the canned text bank and `meta.language`
    pub language: Locale,
    pub max_references: usize,
    /// Missing required fields at or above which the holistic bundle is used
    pub missing_threshold: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            schema_version: "answer-json-v2".to_string(),
            language: Locale::Ko,
            max_references: 2,
            missing_threshold: 4,
        }
    }
}

/// HTTP surface and prompt-context limits
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: std::net::SocketAddr,
    pub path: String,
    /// Most recent conversation turns forwarded to the generative service
    pub turn_window: usize,
    /// Character cap for each serialized context block in the prompt
    pub context_char_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787"
                .parse()
                .expect("default bind address should parse"),
            path: "/api/answer".to_string(),
            turn_window: 12,
            context_char_limit: 2000,
        }
    }
}

/// Generative service (OpenAI-compatible chat completions) settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_ms: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-5".to_string(),
            temperature: 0.4,
            timeout_ms: 60_000,
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub openai_api_key: Option<String>,
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            log_level: "answer_normalizer=info,tower_http=info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        config.openai_api_key = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty());
        if let Some(level) = lookup("ANSWER_LOG").or_else(|| lookup("RUST_LOG")) {
            config.log_level = level;
        }
        config
    }
}

/// Load `ANSWER_ENV_FILE` if set, otherwise `./.env` when present.
pub fn load_env_file() {
    if let Ok(env_path) = std::env::var("ANSWER_ENV_FILE") {
        let _ = dotenvy::from_path(env_path);
    } else {
        let _ = dotenvy::dotenv();
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses ANSWER_CONFIG environment variable or defaults to "answer_normalizer.toml"
    pub fn load() -> anyhow::Result<Self> {
        load_env_file();

        let config_path = std::env::var("ANSWER_CONFIG")
            .unwrap_or_else(|_| "answer_normalizer.toml".to_string());

        let mut config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            Self::from_toml_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply env-first overrides; unparsable values are ignored with a warning.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(lang) = lookup("ANSWER_LANGUAGE") {
            match Locale::parse(&lang) {
                Some(locale) => self.pipeline.language = locale,
                None => tracing::warn!(
                    "ANSWER_LANGUAGE '{}' not supported, keeping {}",
                    lang,
                    self.pipeline.language.as_str()
                ),
            }
        }
        if let Some(threshold) =
            lookup("ANSWER_MISSING_THRESHOLD").and_then(|v| v.parse::<usize>().ok())
        {
            self.pipeline.missing_threshold = threshold;
        }
        if let Some(max) = lookup("ANSWER_MAX_REFERENCES").and_then(|v| v.parse::<usize>().ok())
        {
            self.pipeline.max_references = max;
        }
        if let Some(bind) = lookup("ANSWER_HTTP_BIND") {
            match bind.parse() {
                Ok(addr) => self.server.bind = addr,
                Err(_) => tracing::warn!("ANSWER_HTTP_BIND '{}' is not a socket address", bind),
            }
        }
        if let Some(path) = lookup("ANSWER_HTTP_PATH") {
            self.server.path = path;
        }
        if let Some(window) = lookup("ANSWER_TURN_WINDOW").and_then(|v| v.parse::<usize>().ok())
        {
            self.server.turn_window = window;
        }
        if let Some(model) = lookup("OPENAI_MODEL").filter(|m| !m.trim().is_empty()) {
            self.completion.model = model;
        }
        if let Some(base_url) = lookup("OPENAI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            self.completion.base_url = base_url;
        }
    }

    /// Validate the configuration, clamping soft limits
    pub fn validate(&mut self) -> anyhow::Result<()> {
        if !(1..=5).contains(&self.pipeline.missing_threshold) {
            anyhow::bail!(
                "missing_threshold must be between 1 and 5 (got {})",
                self.pipeline.missing_threshold
            );
        }
        if self.pipeline.max_references > 2 {
            tracing::warn!(
                "max_references {} exceeds max 2, clamping to 2",
                self.pipeline.max_references
            );
            self.pipeline.max_references = 2;
        }
        if self.pipeline.schema_version.trim().is_empty() {
            anyhow::bail!("schema_version must not be empty");
        }
        if !self.server.path.starts_with('/') {
            anyhow::bail!("server.path must start with '/' (got '{}')", self.server.path);
        }
        if self.server.turn_window == 0 {
            tracing::warn!("turn_window 0 drops all conversation context");
        }
        if !(0.0..=2.0).contains(&self.completion.temperature) {
            anyhow::bail!("completion.temperature must be between 0.0 and 2.0");
        }
        if !self.completion.base_url.starts_with("http://")
            && !self.completion.base_url.starts_with("https://")
        {
            tracing::warn!(
                "Completion base URL '{}' doesn't start with http:// or https://",
                self.completion.base_url
            );
        }
        Ok(())
    }
}
