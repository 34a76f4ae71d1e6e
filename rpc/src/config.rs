//! Server configuration with TOML file support.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use vita_types::VerificationParams;

use crate::error::RpcError;

/// Configuration for the Vita re-verification server.
///
/// Can be loaded from a TOML file via [`RpcConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Data directory for the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum LMDB map size in megabytes.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    /// Endpoint of the external face-comparison service.
    #[serde(default = "default_comparison_url")]
    pub comparison_url: String,

    /// Timeout for one comparison round-trip, in seconds.
    #[serde(default = "default_comparison_timeout_secs")]
    pub comparison_timeout_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Protocol tunables (relying party, TTLs, threshold, intervals).
    #[serde(default)]
    pub verification: VerificationParams,

    /// Bearer token -> subject id. Development identity provider; see
    /// `auth::StaticTokens`.
    #[serde(default)]
    pub subject_tokens: HashMap<String, String>,

    /// Bearer token -> officer id.
    #[serde(default)]
    pub officer_tokens: HashMap<String, String>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_listen_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7091
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./vita_data")
}

fn default_map_size_mb() -> usize {
    1024
}

fn default_comparison_url() -> String {
    "http://127.0.0.1:7191/compare".to_string()
}

fn default_comparison_timeout_secs() -> u64 {
    10
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl RpcConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, RpcError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RpcError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, RpcError> {
        toml::from_str(s).map_err(|e| RpcError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, RpcError> {
        toml::to_string_pretty(self).map_err(|e| RpcError::Config(e.to_string()))
    }

    /// LMDB map size in bytes.
    pub fn map_size(&self) -> usize {
        self.map_size_mb * 1024 * 1024
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
            data_dir: default_data_dir(),
            map_size_mb: default_map_size_mb(),
            comparison_url: default_comparison_url(),
            comparison_timeout_secs: default_comparison_timeout_secs(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            verification: VerificationParams::default(),
            subject_tokens: HashMap::new(),
            officer_tokens: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = RpcConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = RpcConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.port, config.port);
        assert_eq!(parsed.verification.challenge_ttl_secs, 300);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = RpcConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.port, 7091);
        assert_eq!(config.log_format, "human");
        assert_eq!(config.verification.similarity_threshold, 80);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            port = 9999
            map_size_mb = 64
        "#;
        let config = RpcConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.port, 9999);
        assert_eq!(config.map_size(), 64 * 1024 * 1024);
        assert_eq!(config.log_format, "human"); // default
    }

    #[test]
    fn verification_table_overrides() {
        let toml = r#"
            [verification]
            rp_id = "id.example"
            origin = "https://id.example"
            challenge_ttl_secs = 120
            similarity_threshold = 90
            credential_interval_secs = 94608000
            similarity_interval_secs = 15552000
        "#;
        let config = RpcConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.verification.rp_id, "id.example");
        assert_eq!(config.verification.similarity_threshold, 90);
        assert_eq!(config.verification.challenge_ttl_secs, 120);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = RpcConfig::from_toml_file("/nonexistent/vita.toml");
        assert!(matches!(result, Err(RpcError::Config(_))));
    }
}
