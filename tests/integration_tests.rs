//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: Markdown document → parsed blocks → HTTP
//! requests → QueryResult

use docquery::config::{AuthType, ConnectionConfig};
use docquery::engine::QueryExecutor;
use docquery::parser::{parse_configuration_blocks, parse_document_with_overrides};
use docquery::transport::ReqwestTransport;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notebook(primary: &str, secondary: &str) -> String {
    format!(
        r#"# Cluster notebook

```sql
-- @description Row count
SELECT COUNT(*) FROM logs
```

```config
@endpoint = '{secondary}'
@auth_type = 'basic'
@username = 'admin'
@password = 'admin'
@timeout = '5s'
```

```api
POST /_bulk
{{"index":{{"_index":"logs"}}}}
{{"message":"hello"}}
```

```ppl
source=logs | where status = 500 | head 5
```

```opensearch-config
@endpoint = '{primary}'
```

```api GET /missing/_search
```
"#
    )
}

// ============================================================================
// Parse Integration Tests
// ============================================================================

#[test]
fn test_notebook_parses_in_document_order() {
    let doc = notebook("http://primary:9200", "http://secondary:9200");

    let configs = parse_configuration_blocks(&doc);
    assert_eq!(configs.len(), 2);
    assert_eq!(configs[0].config.timeout, Some(5_000));
    assert!(configs[0].range.start < configs[1].range.start);

    let blocks = parse_document_with_overrides(&doc);
    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[0].description.as_deref(), Some("Row count"));
    assert!(blocks[0].connection_overrides.is_none());

    let bulk = &blocks[1];
    assert_eq!(
        bulk.connection_overrides.as_ref().unwrap().endpoint.as_deref(),
        Some("http://secondary:9200")
    );
    assert_eq!(
        bulk.body,
        "{\"index\":{\"_index\":\"logs\"}}\n{\"message\":\"hello\"}"
    );
    assert_eq!(blocks[2].connection_overrides, bulk.connection_overrides);

    let last = blocks[3].connection_overrides.as_ref().unwrap();
    assert_eq!(last.endpoint.as_deref(), Some("http://primary:9200"));
    assert!(last.auth.is_none());
}

// ============================================================================
// Execution Integration Tests
// ============================================================================

#[tokio::test]
async fn test_notebook_runs_against_the_right_clusters() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_plugins/_sql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schema": [{"name": "COUNT(*)", "type": "integer"}],
            "datarows": [[42]],
            "total": 1,
            "size": 1
        })))
        .expect(1)
        .mount(&primary)
        .await;

    Mock::given(method("POST"))
        .and(path("/_bulk"))
        .and(header("Content-Type", "application/x-ndjson"))
        .and(header("Authorization", "Basic YWRtaW46YWRtaW4="))
        .and(body_string(
            "{\"index\":{\"_index\":\"logs\"}}\n{\"message\":\"hello\"}\n",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 2,
            "errors": false,
            "items": [{"index": {"_index": "logs", "result": "created", "status": 201}}]
        })))
        .expect(1)
        .mount(&secondary)
        .await;

    Mock::given(method("POST"))
        .and(path("/_plugins/_ppl"))
        .and(header("Authorization", "Basic YWRtaW46YWRtaW4="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schema": [{"name": "status", "type": "integer"}],
            "datarows": [],
            "total": 0,
            "size": 0
        })))
        .expect(1)
        .mount(&secondary)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing/_search"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "type": "index_not_found_exception",
                "reason": "no such index [missing]"
            },
            "status": 404
        })))
        .expect(1)
        .mount(&primary)
        .await;

    let doc = notebook(&primary.uri(), &secondary.uri());
    let blocks = parse_document_with_overrides(&doc);

    let config = ConnectionConfig::new(primary.uri());
    let executor = QueryExecutor::new(ReqwestTransport::new().unwrap());
    let results = executor.execute_all(&config, &blocks).await;

    assert_eq!(results.len(), 4);

    // SQL against the base config
    assert!(results[0].success, "{:?}", results[0].error);
    assert_eq!(results[0].raw_response.as_ref().unwrap()["datarows"][0][0], 42);
    assert_eq!(
        results[0].connection_info.as_ref().unwrap().auth_type,
        AuthType::None
    );

    // Bulk against the override
    assert!(results[1].success, "{:?}", results[1].error);
    let connection = results[1].connection_info.as_ref().unwrap();
    assert_eq!(connection.endpoint, secondary.uri());
    assert_eq!(connection.auth_type, AuthType::Basic);
    assert_eq!(
        results[1].request_info.as_ref().unwrap().content_type(),
        Some("application/x-ndjson")
    );

    // PPL inherits the same override
    assert!(results[2].success, "{:?}", results[2].error);

    // Remote failure keeps full diagnostics
    let failed = &results[3];
    assert!(!failed.success);
    assert_eq!(
        failed.error.as_deref(),
        Some("index_not_found_exception: no such index [missing]")
    );
    assert_eq!(failed.status(), Some(404));
    assert_eq!(failed.request_info.as_ref().unwrap().method, "GET");
    assert_eq!(
        failed.raw_response.as_ref().unwrap()["error"]["type"],
        "index_not_found_exception"
    );
}

#[tokio::test]
async fn test_explain_sql_block() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_plugins/_sql/_explain"))
        .and(body_string("{\n  \"query\": \"SELECT * FROM logs\"\n}"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "root": {"name": "ProjectOperator", "children": []}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let blocks = parse_document_with_overrides("```sql\nSELECT * FROM logs\n```\n");
    let executor = QueryExecutor::new(ReqwestTransport::new().unwrap());
    let result = executor
        .explain(&ConnectionConfig::new(mock_server.uri()), &blocks[0])
        .await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(
        result.raw_response.unwrap()["root"]["name"],
        "ProjectOperator"
    );
}

#[tokio::test]
async fn test_invalid_override_never_reaches_the_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let doc = "\
```config
@auth_type = 'basic'
@username = 'admin'
```

```sql
SELECT 1
```
";
    let blocks = parse_document_with_overrides(doc);
    let executor = QueryExecutor::new(ReqwestTransport::new().unwrap());
    let result = executor
        .execute(&ConnectionConfig::new(mock_server.uri()), &blocks[0])
        .await;

    assert!(!result.success);
    assert!(result
        .error
        .as_deref()
        .unwrap()
        .contains("username and password"));
    assert!(result.request_info.is_none());
}
