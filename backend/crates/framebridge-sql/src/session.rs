//! Ephemeral DataFusion store
//!
//! Every bridge call builds its own [`EphemeralStore`]: a fresh
//! `SessionContext` whose default catalog/schema is the configured database.
//! The context holds the in-memory tables of that call and nothing else, so two
//! concurrent calls never see each other's tables. Dropping the store drops
//! the session, its catalog and every table in it.

use crate::error::{BridgeError, Result};
use datafusion::datasource::TableProvider;
use datafusion::execution::context::SessionContext;
use datafusion::prelude::SessionConfig;
use datafusion::sql::TableReference;
use framebridge_configs::defaults::SUPPORTED_DIALECTS;
use framebridge_configs::EngineSettings;
use std::sync::Arc;

/// Per-call relational catalog backed by a private DataFusion session
pub struct EphemeralStore {
    ctx: SessionContext,
    normalize_identifiers: bool,
}

impl std::fmt::Debug for EphemeralStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EphemeralStore")
            .field("session_id", &self.ctx.session_id())
            .finish()
    }
}

impl EphemeralStore {
    /// Create an empty store with the given engine settings
    pub fn new(settings: &EngineSettings) -> Result<Self> {
        if !SUPPORTED_DIALECTS
            .iter()
            .any(|d| d.eq_ignore_ascii_case(&settings.dialect))
        {
            return Err(BridgeError::Configuration(format!(
                "Unsupported SQL dialect '{}'",
                settings.dialect
            )));
        }
        if settings.target_partitions == 0 || settings.batch_size == 0 {
            return Err(BridgeError::Configuration(
                "target_partitions and batch_size must be greater than 0".to_string(),
            ));
        }

        let mut config = SessionConfig::new()
            .with_default_catalog_and_schema(
                settings.catalog_name.as_str(),
                settings.database_name.as_str(),
            )
            .with_create_default_catalog_and_schema(true)
            .with_information_schema(false)
            .with_target_partitions(settings.target_partitions)
            .with_batch_size(settings.batch_size);

        let options = config.options_mut();
        options
            .set("datafusion.sql_parser.dialect", &settings.dialect)
            .map_err(|e| {
                BridgeError::Configuration(format!("Invalid SQL dialect '{}': {}", settings.dialect, e))
            })?;
        options
            .set(
                "datafusion.sql_parser.enable_ident_normalization",
                if settings.enable_ident_normalization { "true" } else { "false" },
            )
            .map_err(|e| BridgeError::Configuration(format!("Invalid identifier setting: {}", e)))?;

        let ctx = SessionContext::new_with_config(config);
        log::trace!("Created ephemeral store (session {})", ctx.session_id());

        Ok(Self {
            ctx,
            normalize_identifiers: settings.enable_ident_normalization,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.ctx
    }

    /// Reference a table in the current database the same way the SQL
    /// planner resolves an unquoted identifier.
    pub fn table_reference(&self, name: &str) -> TableReference {
        if self.normalize_identifiers {
            TableReference::bare(name.to_ascii_lowercase())
        } else {
            TableReference::bare(name)
        }
    }

    /// Register a table, replacing any table already registered under the
    /// same name. Returns true when a previous table was replaced.
    pub fn put_table(&self, name: &str, table: Arc<dyn TableProvider>) -> Result<bool> {
        let reference = self.table_reference(name);

        let replaced = self
            .ctx
            .deregister_table(reference.clone())
            .map_err(|e| BridgeError::Materialization(format!("Failed to replace table '{}': {}", name, e)))?
            .is_some();

        self.ctx
            .register_table(reference, table)
            .map_err(|e| BridgeError::Materialization(format!("Failed to register table '{}': {}", name, e)))?;

        Ok(replaced)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.ctx.table_exist(self.table_reference(name)).unwrap_or(false)
    }
}
