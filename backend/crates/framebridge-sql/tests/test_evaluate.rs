//! End-to-end tests for SqlBridge::evaluate

use framebridge_commons::{Field, FieldType, FieldValue, Frame};
use framebridge_configs::{BridgeConfig, EngineSettings};
use framebridge_sql::{BridgeError, EvaluationPhase, SqlBridge};

fn values(frame: &Frame, field: &str) -> Vec<FieldValue> {
    let field = frame.field_by_name(field).expect("field present");
    (0..field.len()).filter_map(|i| field.at(i)).collect()
}

#[tokio::test]
async fn test_scenario_string_literal_without_inputs() {
    let bridge = SqlBridge::default();
    let out = bridge.evaluate("out", "SELECT '1' AS n;", &[]).await.unwrap();

    assert_eq!(out.name(), "out");
    assert_eq!(out.column_count(), 1);
    assert_eq!(out.fields()[0].name(), "n");
    assert_eq!(out.fields()[0].field_type(), FieldType::String);
    assert_eq!(values(&out, "n"), vec![FieldValue::String("1".to_string())]);
}

#[tokio::test]
async fn test_scenario_mixed_literals_without_inputs() {
    let bridge = SqlBridge::default();
    let out = bridge
        .evaluate("out", "SELECT 'sam' AS name, 40 AS age;", &[])
        .await
        .unwrap();

    assert_eq!(out.fields()[0].field_type(), FieldType::String);
    assert_eq!(out.fields()[1].field_type(), FieldType::Int64);
    assert_eq!(values(&out, "name"), vec![FieldValue::String("sam".to_string())]);
    assert_eq!(values(&out, "age"), vec![FieldValue::Int64(40)]);
}

#[tokio::test]
async fn test_scenario_limit_honors_insertion_order() {
    let t = Frame::new("t", vec![Field::new("label", vec!["Garfana", "Pormetheus"])]);

    let bridge = SqlBridge::default();
    let out = bridge
        .evaluate("out", "SELECT * FROM t LIMIT 1;", &[t])
        .await
        .unwrap();

    assert_eq!(out.row_count(), 1);
    assert_eq!(values(&out, "label"), vec![FieldValue::String("Garfana".to_string())]);
}

#[tokio::test]
async fn test_join_across_frames() {
    let hosts = Frame::new(
        "hosts",
        vec![
            Field::new("id", vec![1_i32, 2]),
            Field::new("name", vec!["web-1", "db-1"]),
        ],
    );
    let cpu = Frame::new(
        "cpu",
        vec![
            Field::new("host_id", vec![2_u8, 1, 2]),
            Field::new("load", vec![0.5_f64, 0.25, 0.75]),
        ],
    );

    let bridge = SqlBridge::default();
    let out = bridge
        .evaluate(
            "per_host",
            "SELECT h.name, MAX(c.load) AS peak FROM cpu c JOIN hosts h ON c.host_id = h.id \
             GROUP BY h.name ORDER BY h.name",
            &[hosts, cpu],
        )
        .await
        .unwrap();

    assert_eq!(
        values(&out, "name"),
        vec![
            FieldValue::String("db-1".to_string()),
            FieldValue::String("web-1".to_string())
        ]
    );
    assert_eq!(
        values(&out, "peak"),
        vec![FieldValue::Float64(0.75), FieldValue::Float64(0.25)]
    );
}

#[tokio::test]
async fn test_table_names_match_frame_names_exactly() {
    let frame = Frame::new("MyFrame", vec![Field::new("v", vec![7_i64])]);

    let bridge = SqlBridge::default();
    let out = bridge
        .evaluate("out", "SELECT v FROM MyFrame", &[frame.clone()])
        .await
        .unwrap();
    assert_eq!(values(&out, "v"), vec![FieldValue::Int64(7)]);

    let err = bridge
        .evaluate("out", "SELECT v FROM myframe", &[frame])
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Execution(_)));
}

#[tokio::test]
async fn test_identifier_normalization_lowercases_both_sides() {
    let frame = Frame::new("MyFrame", vec![Field::new("v", vec![7_i64])]);

    let bridge = SqlBridge::new(EngineSettings {
        enable_ident_normalization: true,
        ..EngineSettings::default()
    });
    let out = bridge
        .evaluate("out", "SELECT v FROM MYFRAME", &[frame])
        .await
        .unwrap();
    assert_eq!(values(&out, "v"), vec![FieldValue::Int64(7)]);
}

#[tokio::test]
async fn test_duplicate_frame_names_last_write_wins() {
    let first = Frame::new("A", vec![Field::new("v", vec![1_i64])]);
    let second = Frame::new("A", vec![Field::new("v", vec![2_i64])]);

    let bridge = SqlBridge::default();
    let out = bridge
        .evaluate("out", "SELECT v FROM A", &[first, second])
        .await
        .unwrap();

    assert_eq!(values(&out, "v"), vec![FieldValue::Int64(2)]);
}

#[tokio::test]
async fn test_empty_input_frame_is_queryable() {
    let empty = Frame::new("A", vec![Field::new("v", Vec::<i64>::new())]);

    let bridge = SqlBridge::default();
    let out = bridge.evaluate("out", "SELECT v FROM A", &[empty]).await.unwrap();

    assert_eq!(out.column_count(), 1);
    assert_eq!(out.row_count(), 0);
    assert_eq!(out.fields()[0].field_type(), FieldType::Int64);
}

#[tokio::test]
async fn test_evaluate_is_idempotent() {
    let frame = Frame::new(
        "A",
        vec![
            Field::new("host", vec![Some("a"), None, Some("c")]),
            Field::new("v", vec![Some(3.5_f64), Some(-1.0), None]),
        ],
    );
    let query = "SELECT host, v * 2 AS doubled FROM A";

    let bridge = SqlBridge::default();
    let first = bridge.evaluate("out", query, &[frame.clone()]).await.unwrap();
    let second = bridge.evaluate("out", query, &[frame]).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_are_isolated() {
    let bridge = SqlBridge::default();

    let mut handles = Vec::new();
    for i in 0..16_i64 {
        let bridge = bridge.clone();
        handles.push(tokio::spawn(async move {
            // Every call uses the same table name with different contents
            let frame = Frame::new("A", vec![Field::new("v", vec![i, i * 10])]);
            let out = bridge
                .evaluate("out", "SELECT SUM(v) AS total FROM A", &[frame])
                .await
                .unwrap();
            (i, out)
        }));
    }

    for handle in handles {
        let (i, out) = handle.await.unwrap();
        assert_eq!(values(&out, "total"), vec![FieldValue::Int64(i * 11)]);
    }
}

#[tokio::test]
async fn test_tables_do_not_leak_between_calls() {
    let bridge = SqlBridge::default();
    let frame = Frame::new("A", vec![Field::new("v", vec![1_i64])]);

    bridge.evaluate("out", "SELECT v FROM A", &[frame]).await.unwrap();

    let err = bridge.evaluate("out", "SELECT v FROM A", &[]).await.unwrap_err();
    assert!(matches!(err, BridgeError::Execution(_)));
}

#[tokio::test]
async fn test_unsupported_input_type_fails_before_execution() {
    let frame = Frame::new(
        "A",
        vec![Field::new("doc", vec![serde_json::json!({"k": "v"})])],
    );

    // The query references a missing table; materialization must fail first
    let bridge = SqlBridge::default();
    let err = bridge
        .evaluate("out", "SELECT * FROM nowhere", &[frame])
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Materialization(_)));
    assert_eq!(err.phase(), EvaluationPhase::Materializing);
    assert!(err.to_string().contains("doc"));
}

#[tokio::test]
async fn test_ragged_input_frame_fails_materialization() {
    let frame = Frame::new(
        "A",
        vec![Field::new("a", vec![1_i64, 2]), Field::new("b", vec!["x"])],
    );

    let bridge = SqlBridge::default();
    let err = bridge.evaluate("out", "SELECT 1", &[frame]).await.unwrap_err();
    assert!(matches!(err, BridgeError::Materialization(_)));
}

#[tokio::test]
async fn test_undecodable_result_value_is_decode_error() {
    let bridge = SqlBridge::default();
    let err = bridge
        .evaluate(
            "out",
            "SELECT arrow_cast(9223372036854775807, 'Timestamp(Second, None)') AS far",
            &[],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Decode(_)));
    assert!(err.to_string().contains("far"));
}

#[tokio::test]
async fn test_null_literal_column_decodes_as_absent_values() {
    let frame = Frame::new("A", vec![Field::new("v", vec![1_i64, 2])]);

    let bridge = SqlBridge::default();
    let out = bridge
        .evaluate("out", "SELECT v, NULL AS note FROM A", &[frame])
        .await
        .unwrap();

    assert_eq!(out.fields()[1].name(), "note");
    assert_eq!(out.fields()[1].field_type(), FieldType::String);
    assert_eq!(values(&out, "note"), vec![FieldValue::Null, FieldValue::Null]);
    assert_eq!(values(&out, "v"), vec![FieldValue::Int64(1), FieldValue::Int64(2)]);
}

#[tokio::test]
async fn test_unsupported_result_column_is_decode_error() {
    let bridge = SqlBridge::default();
    let err = bridge
        .evaluate("out", "SELECT CAST('2024-02-29' AS DATE) AS day", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Decode(_)));
    assert!(err.to_string().contains("day"));
}

#[tokio::test]
async fn test_query_errors_are_execution_errors() {
    let bridge = SqlBridge::default();
    let frame = Frame::new("A", vec![Field::new("v", vec![1_i64])]);

    for query in ["SELEC v FROM A", "SELECT * FROM B", "SELECT missing FROM A"] {
        let err = bridge
            .evaluate("out", query, &[frame.clone()])
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Execution(_)), "{}: {}", query, err);
    }
}

#[tokio::test]
async fn test_query_timeout_is_execution_error() {
    let bridge = SqlBridge::new(EngineSettings {
        query_timeout_ms: Some(10),
        ..EngineSettings::default()
    });

    let err = bridge
        .evaluate("out", "SELECT SUM(value) AS total FROM range(10000000000)", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, BridgeError::Execution(_)));
    assert!(err.to_string().contains("did not complete"), "{}", err);
}

#[tokio::test]
async fn test_bridge_from_toml_config() {
    let config = BridgeConfig::from_toml_str(
        r#"
        [engine]
        database_name = "frames"
        batch_size = 2
        "#,
    )
    .unwrap();
    let bridge = SqlBridge::from_config(&config);
    assert_eq!(bridge.settings().database_name, "frames");

    // Small batches still decode into a single frame in order
    let frame = Frame::new("A", vec![Field::new("v", vec![1_i64, 2, 3, 4, 5])]);
    let out = bridge.evaluate("out", "SELECT v FROM A", &[frame]).await.unwrap();
    assert_eq!(
        values(&out, "v"),
        (1..=5).map(FieldValue::Int64).collect::<Vec<_>>()
    );
}

#[test]
fn test_tables_list_reports_inputs_only() {
    let bridge = SqlBridge::default();

    let tables = bridge
        .tables_list(
            "WITH totals AS (SELECT host, SUM(v) AS s FROM metrics GROUP BY host) \
             SELECT * FROM totals JOIN hosts ON totals.host = hosts.name \
             WHERE hosts.name IN (SELECT name FROM allowed)",
        )
        .unwrap();

    assert_eq!(tables, vec!["allowed", "hosts", "metrics"]);
    assert!(bridge.tables_list("SELECT 1").unwrap().is_empty());
}
