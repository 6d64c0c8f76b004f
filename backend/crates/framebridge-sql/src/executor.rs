//! Query executor
//!
//! Runs caller-supplied SQL verbatim against an [`EphemeralStore`]. Nothing is
//! validated, rewritten or allow-listed here; every planning or execution
//! failure reported by DataFusion becomes [`BridgeError::Execution`].

use crate::error::{BridgeError, Result};
use crate::session::EphemeralStore;
use datafusion::arrow::datatypes::SchemaRef;
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::physical_plan::{RecordBatchStream, SendableRecordBatchStream};
use futures_util::StreamExt;

/// Result schema plus a forward-only stream of record batches.
///
/// The stream can be consumed once. Dropping a `QueryResult` (or calling
/// [`QueryResult::close`]) releases the engine-side execution state, whether
/// or not every batch was read.
pub struct QueryResult {
    schema: SchemaRef,
    stream: SendableRecordBatchStream,
}

impl std::fmt::Debug for QueryResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryResult").field("schema", &self.schema).finish()
    }
}

impl QueryResult {
    /// Column names and types in the order the engine returns them
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    /// Next batch, `None` once the stream is exhausted
    pub async fn next_batch(&mut self) -> Option<Result<RecordBatch>> {
        self.stream.next().await.map(|batch| {
            batch.map_err(|e| BridgeError::Execution(format!("Failed to read result rows: {}", e)))
        })
    }

    /// Release the stream without reading the remaining batches
    pub fn close(self) {
        drop(self.stream);
    }
}

/// Executes SQL against a populated store
pub struct QueryExecutor<'a> {
    store: &'a EphemeralStore,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(store: &'a EphemeralStore) -> Self {
        Self { store }
    }

    /// Plan and start `sql`, returning its schema and a lazy batch stream
    pub async fn execute(&self, sql: &str) -> Result<QueryResult> {
        let df = self
            .store
            .session()
            .sql(sql)
            .await
            .map_err(|e| BridgeError::Execution(format!("Failed to plan query: {}", e)))?;

        let stream = df
            .execute_stream()
            .await
            .map_err(|e| BridgeError::Execution(format!("Failed to execute query: {}", e)))?;

        let schema = stream.schema();
        log::trace!("Query started with {} result columns", schema.fields().len());

        Ok(QueryResult { schema, stream })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materializer::TableMaterializer;
    use datafusion::arrow::datatypes::DataType;
    use framebridge_commons::{Field, Frame};
    use framebridge_configs::EngineSettings;

    fn store() -> EphemeralStore {
        EphemeralStore::new(&EngineSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_execute_literal_query() {
        let store = store();
        let mut result = QueryExecutor::new(&store)
            .execute("SELECT 'sam' AS name, 40 AS age;")
            .await
            .unwrap();

        let schema = result.schema();
        assert_eq!(schema.field(0).name(), "name");
        assert_eq!(schema.field(1).name(), "age");
        assert_eq!(schema.field(1).data_type(), &DataType::Int64);

        let mut rows = 0;
        while let Some(batch) = result.next_batch().await {
            rows += batch.unwrap().num_rows();
        }
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_execute_against_materialized_table() {
        let store = store();
        let frame = Frame::new("t", vec![Field::new("v", vec![1_i64, 2, 3])]);
        TableMaterializer::new(&store).materialize("t", &frame).unwrap();

        let mut result = QueryExecutor::new(&store)
            .execute("SELECT v FROM t WHERE v > 1")
            .await
            .unwrap();

        let mut rows = 0;
        while let Some(batch) = result.next_batch().await {
            rows += batch.unwrap().num_rows();
        }
        assert_eq!(rows, 2);
    }

    #[tokio::test]
    async fn test_missing_table_is_execution_error() {
        let store = store();
        let err = QueryExecutor::new(&store)
            .execute("SELECT * FROM nowhere")
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Execution(_)));
    }

    #[tokio::test]
    async fn test_syntax_error_is_execution_error() {
        let store = store();
        let err = QueryExecutor::new(&store)
            .execute("SELEC 1")
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Execution(_)));
    }

    #[tokio::test]
    async fn test_close_releases_unread_stream() {
        let store = store();
        let frame = Frame::new("t", vec![Field::new("v", vec![1_i64, 2, 3])]);
        TableMaterializer::new(&store).materialize("t", &frame).unwrap();

        let result = QueryExecutor::new(&store).execute("SELECT * FROM t").await.unwrap();
        result.close();

        // The store remains usable for another statement after an early close
        let again = QueryExecutor::new(&store).execute("SELECT * FROM t").await;
        assert!(again.is_ok());
    }
}
