use super::defaults::SUPPORTED_DIALECTS;
use super::types::BridgeConfig;
use std::fs;
use std::path::Path;

const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const VALID_LOG_FORMATS: [&str; 2] = ["compact", "json"];

impl BridgeConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: BridgeConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        let engine = &self.engine;

        if engine.catalog_name.trim().is_empty() {
            return Err(anyhow::anyhow!("engine.catalog_name cannot be empty"));
        }

        if engine.database_name.trim().is_empty() {
            return Err(anyhow::anyhow!("engine.database_name cannot be empty"));
        }

        if !SUPPORTED_DIALECTS
            .iter()
            .any(|d| d.eq_ignore_ascii_case(&engine.dialect))
        {
            return Err(anyhow::anyhow!(
                "Invalid SQL dialect '{}'. Must be one of: {}",
                engine.dialect,
                SUPPORTED_DIALECTS.join(", ")
            ));
        }

        if engine.target_partitions == 0 {
            return Err(anyhow::anyhow!("engine.target_partitions cannot be 0"));
        }

        if engine.batch_size == 0 {
            return Err(anyhow::anyhow!("engine.batch_size cannot be 0"));
        }

        if engine.query_timeout_ms == Some(0) {
            return Err(anyhow::anyhow!(
                "engine.query_timeout_ms cannot be 0; omit it to disable the timeout"
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LOG_LEVELS.join(", ")
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                VALID_LOG_FORMATS.join(", ")
            ));
        }

        for (target, level) in &self.logging.targets {
            if !VALID_LOG_LEVELS.contains(&level.as_str()) {
                return Err(anyhow::anyhow!(
                    "Invalid log level '{}' for target '{}'. Must be one of: {}",
                    level,
                    target,
                    VALID_LOG_LEVELS.join(", ")
                ));
            }
        }

        Ok(())
    }
}
