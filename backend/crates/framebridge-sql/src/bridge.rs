//! SQL bridge orchestrator
//!
//! [`SqlBridge::evaluate`] is the single entry point of the crate: it builds a
//! fresh [`EphemeralStore`], loads every input frame as a table, runs the query
//! and decodes the result into one output frame. The store lives on the stack
//! of the call and is dropped on every exit path, so nothing outlives a call.

use crate::error::{BridgeError, EvaluationPhase, Result};
use crate::executor::QueryExecutor;
use crate::materializer::TableMaterializer;
use crate::result_builder::ResultFrameBuilder;
use crate::session::EphemeralStore;
use datafusion::sql::parser::DFParser;
use datafusion::sql::sqlparser::dialect::dialect_from_str;
use framebridge_commons::Frame;
use framebridge_configs::{BridgeConfig, EngineSettings};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

static NEXT_EVALUATION_ID: AtomicU64 = AtomicU64::new(1);

/// Tracks the phase of one `evaluate` call for logging
struct Evaluation<'a> {
    id: u64,
    output_name: &'a str,
    phase: EvaluationPhase,
    started: Instant,
}

impl<'a> Evaluation<'a> {
    fn new(output_name: &'a str) -> Self {
        Self {
            id: NEXT_EVALUATION_ID.fetch_add(1, Ordering::Relaxed),
            output_name,
            phase: EvaluationPhase::Created,
            started: Instant::now(),
        }
    }

    fn enter(&mut self, next: EvaluationPhase) {
        log::trace!(
            "Evaluation #{} '{}': {} -> {}",
            self.id,
            self.output_name,
            self.phase.as_str(),
            next.as_str()
        );
        self.phase = next;
    }

    fn finish(mut self, outcome: &Result<Frame>) {
        let elapsed = self.started.elapsed();
        match outcome {
            Ok(frame) => {
                self.enter(EvaluationPhase::Succeeded);
                log::debug!(
                    "Evaluation #{} '{}' succeeded in {:?} ({} rows, {} columns)",
                    self.id,
                    self.output_name,
                    elapsed,
                    frame.row_count(),
                    frame.column_count()
                );
            },
            Err(e) => {
                let failed_in = e.phase();
                self.enter(EvaluationPhase::Failed);
                log::debug!(
                    "Evaluation #{} '{}' failed while {} after {:?}: {}",
                    self.id,
                    self.output_name,
                    failed_in.as_str(),
                    elapsed,
                    e
                );
            },
        }
    }
}

/// Runs SQL over in-memory frames.
///
/// Holds only immutable settings; clones share them and concurrent calls on
/// the same bridge are fully isolated from each other.
#[derive(Debug, Clone)]
pub struct SqlBridge {
    settings: Arc<EngineSettings>,
}

impl Default for SqlBridge {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl SqlBridge {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.engine.clone())
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Run `query` against `input_frames` and return the result as a frame
    /// named `output_name`.
    ///
    /// Each input frame becomes a table named after the frame. When two frames
    /// share a name the later one wins. Any failure is terminal for the call
    /// and no partial frame is returned.
    pub async fn evaluate(
        &self,
        output_name: &str,
        query: &str,
        input_frames: &[Frame],
    ) -> Result<Frame> {
        let span = tracing::debug_span!(
            "sql_bridge.evaluate",
            output = output_name,
            inputs = input_frames.len()
        );

        async move {
            let mut evaluation = Evaluation::new(output_name);
            let outcome = self
                .run(&mut evaluation, output_name, query, input_frames)
                .await;
            evaluation.finish(&outcome);
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        evaluation: &mut Evaluation<'_>,
        output_name: &str,
        query: &str,
        input_frames: &[Frame],
    ) -> Result<Frame> {
        let store = EphemeralStore::new(&self.settings)?;

        evaluation.enter(EvaluationPhase::Materializing);
        let materializer = TableMaterializer::new(&store);
        for frame in input_frames {
            materializer.materialize(frame.name(), frame)?;
        }

        evaluation.enter(EvaluationPhase::Executing);
        let pending = async {
            let result = QueryExecutor::new(&store).execute(query).await?;
            evaluation.enter(EvaluationPhase::Decoding);
            ResultFrameBuilder::for_result(&result)?
                .build(output_name, result)
                .await
        };

        match self.settings.query_timeout() {
            Some(limit) => tokio::time::timeout(limit, pending).await.map_err(|_| {
                BridgeError::Execution(format!(
                    "Query did not complete within {} ms",
                    limit.as_millis()
                ))
            })?,
            None => pending.await,
        }
    }

    /// Names of the tables `query` reads, sorted and de-duplicated.
    ///
    /// Names bound by a `WITH` clause are not tables and are left out. The
    /// query is parsed with the configured dialect but never planned, so the
    /// tables do not need to exist.
    pub fn tables_list(&self, query: &str) -> Result<Vec<String>> {
        let dialect = dialect_from_str(&self.settings.dialect).ok_or_else(|| {
            BridgeError::Configuration(format!(
                "Unsupported SQL dialect '{}'",
                self.settings.dialect
            ))
        })?;

        let mut statements = DFParser::parse_sql_with_dialect(query, dialect.as_ref())
            .map_err(|e| BridgeError::Execution(format!("Failed to parse query: {}", e)))?;
        if statements.len() != 1 {
            return Err(BridgeError::Execution(format!(
                "Expected exactly one statement, found {}",
                statements.len()
            )));
        }
        let statement = statements.pop_front().ok_or_else(|| {
            BridgeError::Execution("Expected exactly one statement, found 0".to_string())
        })?;

        let store = EphemeralStore::new(&self.settings)?;
        let references = store
            .session()
            .state()
            .resolve_table_references(&statement)
            .map_err(|e| BridgeError::Execution(format!("Failed to resolve tables: {}", e)))?;

        let mut tables: Vec<String> = references
            .iter()
            .map(|reference| reference.table().to_string())
            .collect();
        tables.sort();
        tables.dedup();

        Ok(tables)
    }
}
