// Logging setup for binaries and tests embedding the bridge.
//
// The library itself only emits `log::*` records. `init_logging` installs a
// tracing-subscriber registry; its default `tracing-log` bridge captures those
// records so they are filtered and formatted like native tracing events.

use std::collections::HashMap;

use framebridge_configs::LoggingSettings;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact text format: timestamp LEVEL target - message
    Compact,
    /// JSON Lines format for structured logging
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Build the `EnvFilter` from the base level, quieted engine crates and
/// per-target overrides from config.
pub fn build_env_filter(
    level: &str,
    target_levels: &HashMap<String, String>,
) -> anyhow::Result<EnvFilter> {
    let mut directives = vec![level.to_string()];

    let noisy: &[(&str, &str)] = &[
        ("sqlparser", "warn"),
        ("datafusion", "warn"),
        ("datafusion_optimizer", "warn"),
        ("datafusion_physical_plan", "warn"),
        ("datafusion_datasource", "warn"),
        ("arrow", "warn"),
        ("tracing", "warn"),
    ];
    for (target, lvl) in noisy {
        directives.push(format!("{}={}", target, lvl));
    }

    // Sorted so the resulting filter is stable across runs
    let mut overrides: Vec<_> = target_levels.iter().collect();
    overrides.sort();
    for (target, lvl) in overrides {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{}': {}", filter_str, e))
}

/// Install the global subscriber described by `settings`.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    let filter = build_env_filter(&settings.level, &settings.targets)?;

    let layer = match LogFormat::parse(&settings.format) {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter)
            .boxed(),
    };

    match tracing_subscriber::registry().with(layer).try_init() {
        Ok(()) => {
            tracing::trace!(
                "Logging initialized: level={}, format={}",
                settings.level,
                settings.format
            );
        },
        Err(e) => {
            log::debug!("Logging already initialized: {}", e);
        },
    }

    Ok(())
}
