// Default value functions

pub fn default_catalog_name() -> String {
    "framebridge".to_string()
}

pub fn default_database_name() -> String {
    "mydb".to_string()
}

pub fn default_sql_dialect() -> String {
    "MySQL".to_string()
}

pub fn default_target_partitions() -> usize {
    1 // Single partition keeps result row order deterministic
}

pub fn default_batch_size() -> usize {
    8192
}

pub fn default_query_timeout_ms() -> Option<u64> {
    None // No limit unless the integrator sets one
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_format() -> String {
    "compact".to_string()
}

/// Dialect names accepted by `datafusion.sql_parser.dialect`
pub const SUPPORTED_DIALECTS: &[&str] = &[
    "Generic",
    "MySQL",
    "PostgreSQL",
    "Hive",
    "SQLite",
    "Snowflake",
    "Redshift",
    "MsSQL",
    "ClickHouse",
    "BigQuery",
    "Ansi",
    "DuckDB",
    "Databricks",
];
