// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the portfolio API.
//!
//! Values are layered, lowest precedence first: built-in defaults, an
//! optional TOML file (`PORTFOLIO_CONFIG`, default `portfolio.toml`),
//! `PORTFOLIO_*` environment variables with `__` between nested keys, and
//! finally the legacy `CONTACT_EMAIL` variable for the recipient address.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised while loading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Deployment environment. Controls how much internal detail error
/// responses may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Prefix the API routes are mounted under (default: /api)
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    #[serde(default)]
    pub environment: Environment,

    /// Take the origin address from `X-Forwarded-For` (default: false)
    #[serde(default)]
    pub trust_proxy: bool,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub spam: SpamConfig,

    #[serde(default)]
    pub contact: ContactConfig,

    #[serde(default)]
    pub mail: MailConfig,

    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub cors: CorsConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Contact form rate limiting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Submissions allowed per address per window (default: 3)
    #[serde(default = "default_max_submissions")]
    pub max_submissions: u32,

    /// Window length in seconds (default: 900)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// How often expired windows are purged, in seconds (default: 60)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

/// Field bounds for contact submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,

    #[serde(default = "default_max_subject_len")]
    pub max_subject_len: usize,

    #[serde(default = "default_min_message_len")]
    pub min_message_len: usize,

    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
}

/// Content policy applied to sanitized submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamConfig {
    /// Prohibited phrases, matched case-insensitively
    #[serde(default = "default_spam_keywords")]
    pub keywords: Vec<String>,

    /// Maximum URLs allowed in a message (default: 2)
    #[serde(default = "default_max_links")]
    pub max_links: usize,
}

/// Where contact notifications go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Notification recipient (default: louie@louie.cloud)
    #[serde(default = "default_recipient")]
    pub recipient: String,

    /// Source address; falls back to the recipient, which the mail
    /// provider has already verified
    #[serde(default)]
    pub sender: Option<String>,

    #[serde(default = "default_site_name")]
    pub site_name: String,

    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

/// Mail transport selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    /// Log notifications instead of sending them
    #[default]
    Log,
    /// POST notifications to an HTTP mail relay
    Http,
}

/// Outbound mail collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub transport: MailTransport,

    /// Relay endpoint, required for the `http` transport
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Upper bound on a single send, in milliseconds (default: 10000)
    #[serde(default = "default_mail_timeout_ms")]
    pub timeout_ms: u64,
}

/// Identity provider used by the admin content routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Token verification endpoint; without it no token is accepted
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_admin_group")]
    pub admin_group: String,

    #[serde(default = "default_identity_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorsConfig {
    /// Allowed origins; empty disables the CORS layer
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_max_submissions() -> u32 {
    3
}

fn default_window_secs() -> u64 {
    15 * 60
}

fn default_cleanup_interval_secs() -> u64 {
    60
}

fn default_max_name_len() -> usize {
    100
}

fn default_max_subject_len() -> usize {
    200
}

fn default_min_message_len() -> usize {
    10
}

fn default_max_message_len() -> usize {
    5000
}

fn default_spam_keywords() -> Vec<String> {
    [
        "viagra",
        "cialis",
        "lottery",
        "winner",
        "casino",
        "crypto",
        "bitcoin",
        "investment opportunity",
        "nigerian prince",
        "click here",
        "buy now",
        "limited time",
        "act now",
        "congratulations",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_links() -> usize {
    2
}

fn default_recipient() -> String {
    "louie@louie.cloud".to_string()
}

fn default_site_name() -> String {
    "louie.cloud".to_string()
}

fn default_subject_prefix() -> String {
    "Portfolio Contact".to_string()
}

fn default_mail_timeout_ms() -> u64 {
    10_000
}

fn default_admin_group() -> String {
    "admin".to_string()
}

fn default_identity_timeout_ms() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            api_prefix: default_api_prefix(),
            environment: Environment::default(),
            trust_proxy: false,
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            spam: SpamConfig::default(),
            contact: ContactConfig::default(),
            mail: MailConfig::default(),
            identity: IdentityConfig::default(),
            cors: CorsConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_submissions: default_max_submissions(),
            window_secs: default_window_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_name_len: default_max_name_len(),
            max_subject_len: default_max_subject_len(),
            min_message_len: default_min_message_len(),
            max_message_len: default_max_message_len(),
        }
    }
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            keywords: default_spam_keywords(),
            max_links: default_max_links(),
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: default_recipient(),
            sender: None,
            site_name: default_site_name(),
            subject_prefix: default_subject_prefix(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: MailTransport::default(),
            endpoint: None,
            api_key: None,
            timeout_ms: default_mail_timeout_ms(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            admin_group: default_admin_group(),
            timeout_ms: default_identity_timeout_ms(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl ContactConfig {
    /// Address notifications are sent from.
    pub fn source_address(&self) -> &str {
        self.sender.as_deref().unwrap_or(&self.recipient)
    }
}

impl MailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl IdentityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load configuration from the layered sources and check it.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("PORTFOLIO_CONFIG").unwrap_or_else(|_| "portfolio.toml".to_string());

        let loaded: Config = config::Config::builder()
            .add_source(config::File::with_name(&path).required(false))
            .add_source(
                config::Environment::with_prefix("PORTFOLIO")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("spam.keywords")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .set_override_option("contact.recipient", std::env::var("CONTACT_EMAIL").ok())?
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Check cross-field constraints the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        if !self.api_prefix.starts_with('/') {
            return Err(ConfigError::Invalid {
                key: "api_prefix",
                reason: format!("must start with '/', got {:?}", self.api_prefix),
            });
        }

        if self.metrics.enabled {
            let path = self.metrics.path.as_str();
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid {
                    key: "metrics.path",
                    reason: format!("must start with '/', got {path:?}"),
                });
            }
            if matches!(path, "/health" | "/healthz") {
                return Err(ConfigError::Invalid {
                    key: "metrics.path",
                    reason: format!("{path} is reserved for the health check"),
                });
            }
        }

        if self.rate_limit.max_submissions == 0 {
            return Err(ConfigError::Invalid {
                key: "rate_limit.max_submissions",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "rate_limit.window_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.rate_limit.cleanup_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "rate_limit.cleanup_interval_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.mail.transport == MailTransport::Http {
            match self.mail.endpoint.as_deref() {
                Some(endpoint) => check_url("mail.endpoint", endpoint)?,
                None => {
                    return Err(ConfigError::Invalid {
                        key: "mail.endpoint",
                        reason: "required when mail.transport is http".to_string(),
                    })
                }
            }
        }

        if let Some(endpoint) = self.identity.endpoint.as_deref() {
            check_url("identity.endpoint", endpoint)?;
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr.parse().map_err(|e| ConfigError::Invalid {
            key: "bind_addr",
            reason: format!("{e}"),
        })
    }
}

fn check_url(key: &'static str, value: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(value).map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }

    Ok(())
}
