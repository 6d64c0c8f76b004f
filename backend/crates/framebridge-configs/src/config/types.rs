use super::defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Top-level FrameBridge configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Settings applied to every ephemeral DataFusion session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Default catalog of each session
    #[serde(default = "default_catalog_name")]
    pub catalog_name: String,

    /// Database (DataFusion schema) that input frames are registered in and
    /// that is selected as current for the query
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// SQL parser dialect (default: MySQL)
    #[serde(default = "default_sql_dialect")]
    pub dialect: String,

    /// Execution partitions per query (default: 1).
    /// Values above 1 may reorder rows of queries without ORDER BY.
    #[serde(default = "default_target_partitions")]
    pub target_partitions: usize,

    /// Rows per record batch produced by the engine
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Lower-case unquoted identifiers (and registered table names).
    /// Off by default so table names match frame names exactly.
    #[serde(default)]
    pub enable_ident_normalization: bool,

    /// Optional bound on query execution plus result decoding, in milliseconds
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: Option<u64>,
}

impl EngineSettings {
    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            catalog_name: default_catalog_name(),
            database_name: default_database_name(),
            dialect: default_sql_dialect(),
            target_partitions: default_target_partitions(),
            batch_size: default_batch_size(),
            enable_ident_normalization: false,
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

/// Logging settings for embedding binaries and tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional per-target log level overrides (e.g., datafusion="info").
    /// Configure via a TOML table:
    /// [logging.targets]
    /// datafusion = "info"
    #[serde(default)]
    pub targets: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            targets: HashMap::new(),
        }
    }
}
