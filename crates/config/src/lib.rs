//! Configuration loading and validation for ContentScout.
//!
//! Loads configuration from a TOML file (default `contentscout.toml` in the
//! working directory) with `CONTENTSCOUT_*` environment variable overrides.
//! Validates all settings at startup.

use contentscout_core::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The root configuration structure. Maps directly to the TOML file.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Document store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// LLM runtime settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Third-party search API settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Report output settings
    #[serde(default)]
    pub reports: ReportsConfig,

    /// Retry policy for outbound calls
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Timeouts, in seconds
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Signing keys for request authentication
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by the CORS layer. `*` allows any.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Requests per client per minute on the campaign endpoint.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}
fn default_rate_limit() -> u32 {
    100
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            rate_limit_per_minute: default_rate_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `memory` or `sqlite`
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// SQLite database file, used when backend is `sqlite`.
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,
}

fn default_store_backend() -> String {
    "memory".into()
}
fn default_sqlite_path() -> PathBuf {
    PathBuf::from("contentscout.db")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            sqlite_path: default_sqlite_path(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// `memory` or `redis`
    #[serde(default = "default_cache_backend")]
    pub backend: String,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis_password: Option<String>,
}

fn default_cache_backend() -> String {
    "memory".into()
}
fn default_redis_url() -> String {
    "redis://localhost:6379/0".into()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_cache_backend(),
            redis_url: default_redis_url(),
            redis_password: None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model for the four research agents.
    #[serde(default = "default_research_model")]
    pub research_model: String,
    /// Model for the aggregator; synthesis benefits from a stronger one.
    #[serde(default = "default_aggregator_model")]
    pub aggregator_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_research_model() -> String {
    "gpt-4o-mini".into()
}
fn default_aggregator_model() -> String {
    "gpt-4o".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key: None,
            research_model: default_research_model(),
            aggregator_model: default_aggregator_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serpapi_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    #[serde(default = "default_reports_dir")]
    pub output_dir: PathBuf,
    /// Formats the report writer converts to, beyond the Markdown source.
    #[serde(default = "default_report_formats")]
    pub formats: Vec<String>,
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}
fn default_report_formats() -> Vec<String> {
    vec!["pdf".into(), "docx".into()]
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_reports_dir(),
            formats: default_report_formats(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Application secret for signing outbound artifacts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// Key for signing API tokens, when token auth is enabled upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_agent_timeout")]
    pub agent_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}
fn default_agent_timeout() -> u64 {
    300
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            agent_timeout_secs: default_agent_timeout(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("server", &self.server)
            .field("store", &self.store)
            .field("cache", &self.cache)
            .field("llm", &self.llm)
            .field("search", &self.search)
            .field("reports", &self.reports)
            .field("retry", &self.retry)
            .field("limits", &self.limits)
            .field("security", &self.security)
            .finish()
    }
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("secret_key", &redact(&self.secret_key))
            .field("jwt_secret", &redact(&self.jwt_secret))
            .finish()
    }
}

impl std::fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheConfig")
            .field("backend", &self.backend)
            .field("redis_url", &self.redis_url)
            .field("redis_password", &redact(&self.redis_password))
            .finish()
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("research_model", &self.research_model)
            .field("aggregator_model", &self.aggregator_model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("serpapi_key", &redact(&self.serpapi_key))
            .field("youtube_api_key", &redact(&self.youtube_api_key))
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            cache: CacheConfig::default(),
            llm: LlmConfig::default(),
            search: SearchConfig::default(),
            reports: ReportsConfig::default(),
            retry: RetryPolicy::default(),
            limits: LimitsConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (`contentscout.toml`),
    /// then apply environment variable overrides:
    /// - `CONTENTSCOUT_LLM_API_KEY` (also accepts `OPENAI_API_KEY`)
    /// - `CONTENTSCOUT_SERPAPI_KEY`, `CONTENTSCOUT_YOUTUBE_API_KEY`
    /// - `CONTENTSCOUT_REDIS_URL`, `CONTENTSCOUT_SQLITE_PATH`
    /// - `CONTENTSCOUT_HOST`, `CONTENTSCOUT_PORT`
    /// - `CONTENTSCOUT_SECRET_KEY`, `CONTENTSCOUT_JWT_SECRET`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("contentscout.toml")).map(Self::apply_env_overrides)
    }

    /// Load configuration from a specific file path, without env overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(mut self) -> Self {
        if self.llm.api_key.is_none() {
            self.llm.api_key = std::env::var("CONTENTSCOUT_LLM_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }
        if self.search.serpapi_key.is_none() {
            self.search.serpapi_key = std::env::var("CONTENTSCOUT_SERPAPI_KEY").ok();
        }
        if self.search.youtube_api_key.is_none() {
            self.search.youtube_api_key = std::env::var("CONTENTSCOUT_YOUTUBE_API_KEY").ok();
        }
        if let Ok(url) = std::env::var("CONTENTSCOUT_REDIS_URL") {
            self.cache.redis_url = url;
        }
        if let Ok(path) = std::env::var("CONTENTSCOUT_SQLITE_PATH") {
            self.store.sqlite_path = PathBuf::from(path);
        }
        if let Ok(host) = std::env::var("CONTENTSCOUT_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("CONTENTSCOUT_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
        }
        if self.security.secret_key.is_none() {
            self.security.secret_key = std::env::var("CONTENTSCOUT_SECRET_KEY").ok();
        }
        if self.security.jwt_secret.is_none() {
            self.security.jwt_secret = std::env::var("CONTENTSCOUT_JWT_SECRET").ok();
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.store.backend.as_str(), "memory" | "sqlite") {
            return Err(ConfigError::ValidationError(format!(
                "store.backend must be 'memory' or 'sqlite', got '{}'",
                self.store.backend
            )));
        }
        if !matches!(self.cache.backend.as_str(), "memory" | "redis") {
            return Err(ConfigError::ValidationError(format!(
                "cache.backend must be 'memory' or 'redis', got '{}'",
                self.cache.backend
            )));
        }
        if self.server.rate_limit_per_minute == 0 {
            return Err(ConfigError::ValidationError(
                "server.rate_limit_per_minute must be at least 1".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(
                "llm.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        for format in &self.reports.formats {
            if !matches!(format.as_str(), "pdf" | "docx" | "html") {
                return Err(ConfigError::ValidationError(format!(
                    "reports.formats entries must be pdf, docx, or html, got '{format}'"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
