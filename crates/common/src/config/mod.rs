//! Configuration management for CiteLedger services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml, config.yaml), or the single file named
//!   by APP_CONFIG_FILE
//! - Default values

use crate::errors::{AppError, Result};
use citeledger_ledger::{
    LedgerConfig, LedgerError, Principal, DEFAULT_CITATION_REWARD_BASE,
    DEFAULT_MAX_CITATIONS_PER_PAPER,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Ledger policy configuration
    #[serde(default)]
    pub ledger: LedgerSettings,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerSettings {
    /// Ceiling on live citations per cited paper
    #[serde(default = "default_max_citations")]
    pub max_citations_per_paper: u64,

    /// Reward multiplier for new citations
    #[serde(default = "default_reward_base")]
    pub citation_reward_base: u64,

    /// Authority bound at startup, if any
    pub bootstrap_authority: Option<String>,

    /// Only the authority may change policy
    #[serde(default)]
    pub restrict_policy_to_authority: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Service name, attached to startup logs and as a global metrics label
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 30 }
fn default_shutdown_timeout() -> u64 { 30 }
fn default_max_citations() -> u64 { DEFAULT_MAX_CITATIONS_PER_PAPER }
fn default_reward_base() -> u64 { DEFAULT_CITATION_REWARD_BASE }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_metrics_port() -> u16 { 9090 }
fn default_service_name() -> String { "citeledger".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            max_citations_per_paper: default_max_citations(),
            citation_reward_base: default_reward_base(),
            bootstrap_authority: None,
            restrict_policy_to_authority: false,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            metrics_port: default_metrics_port(),
            service_name: default_service_name(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            ledger: LedgerSettings::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl LedgerSettings {
    /// Starting policy for a fresh ledger. The authority is left unbound;
    /// `bootstrap_authority` goes through the one-shot binding instead.
    pub fn ledger_config(&self) -> Result<LedgerConfig> {
        let config = LedgerConfig {
            authority: None,
            max_citations_per_paper: self.max_citations_per_paper,
            citation_reward_base: self.citation_reward_base,
            restrict_policy_to_authority: self.restrict_policy_to_authority,
        };
        config.validate().map_err(|e| AppError::Configuration {
            message: match e {
                LedgerError::InvalidWeight => {
                    "ledger.max_citations_per_paper must be positive".to_string()
                }
                LedgerError::InvalidReward => {
                    "ledger.citation_reward_base must be positive".to_string()
                }
                other => format!("Invalid ledger settings: {other}"),
            },
        })?;
        Ok(config)
    }

    /// Authority to bind at startup
    pub fn bootstrap_principal(&self) -> Option<Principal> {
        self.bootstrap_authority
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Principal::from)
    }
}

/// Environment variable naming a single config file to load instead of `config/`
pub const CONFIG_FILE_ENV: &str = "APP_CONFIG_FILE";

impl AppConfig {
    /// Load from `APP_CONFIG_FILE` when set, otherwise from the layered sources
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Self::load(),
        }
    }

    /// Load configuration from environment and files
    pub fn load() -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            // Load base config file
            .add_source(File::with_name("config/default").required(false))
            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Load local overrides
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables with APP__ prefix
            // e.g., APP__LEDGER__CITATION_REWARD_BASE=200
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ledger.max_citations_per_paper, 1000);
        assert_eq!(config.ledger.citation_reward_base, 100);
        assert!(!config.ledger.restrict_policy_to_authority);
    }

    #[test]
    fn test_ledger_config_conversion() {
        let settings = LedgerSettings {
            max_citations_per_paper: 5,
            citation_reward_base: 250,
            bootstrap_authority: Some("ST2TEST".to_string()),
            restrict_policy_to_authority: true,
        };
        let config = settings.ledger_config().unwrap();
        assert_eq!(config.max_citations_per_paper, 5);
        assert_eq!(config.citation_reward_base, 250);
        assert!(config.authority.is_none());
        assert!(config.restrict_policy_to_authority);
        assert_eq!(settings.bootstrap_principal(), Some(Principal::new("ST2TEST")));
    }

    #[test]
    fn test_zero_limits_rejected() {
        let settings = LedgerSettings {
            max_citations_per_paper: 0,
            ..LedgerSettings::default()
        };
        assert!(matches!(
            settings.ledger_config(),
            Err(AppError::Configuration { .. })
        ));

        let settings = LedgerSettings {
            citation_reward_base: 0,
            ..LedgerSettings::default()
        };
        assert!(settings.ledger_config().is_err());
    }

    #[test]
    fn test_blank_bootstrap_authority_ignored() {
        let settings = LedgerSettings {
            bootstrap_authority: Some("   ".to_string()),
            ..LedgerSettings::default()
        };
        assert!(settings.bootstrap_principal().is_none());
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir()
            .join(format!("citeledger-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[server]\nshutdown_timeout_secs = 5\n\n[ledger]\nmax_citations_per_paper = 7\nbootstrap_authority = \"ST2TEST\"\n",
        )
        .unwrap();

        let loaded = AppConfig::from_file(path.to_str().unwrap());
        std::fs::remove_file(&path).unwrap();

        let config = loaded.unwrap();
        assert_eq!(config.ledger.max_citations_per_paper, 7);
        assert_eq!(config.ledger.citation_reward_base, 100);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(config.ledger.bootstrap_principal(), Some(Principal::new("ST2TEST")));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let path = std::env::temp_dir().join("citeledger-config-missing.toml");
        assert!(matches!(
            AppConfig::from_file(path.to_str().unwrap()),
            Err(AppError::Configuration { .. })
        ));
    }

    #[test]
    fn test_timeouts() {
        let config = AppConfig::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
    }
}
