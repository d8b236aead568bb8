//! End-to-end tests against a mock registry.

use serde_json::{Map, Value, json};
use veritrust_registry::{
    Credentials, Error, InputItem, OperationKind, RegistryClient, SearchFilters, execute_items,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> RegistryClient {
    // Trailing slashes on the base URL must not leak into request paths.
    RegistryClient::new(Credentials::new(format!("{}//", server.uri())).api_key("secret"))
}

fn item(value: Value) -> InputItem {
    let Value::Object(map) = value else {
        panic!("test items must be objects");
    };
    InputItem::new(map)
}

#[tokio::test]
async fn list_sends_bearer_auth_and_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agents.php"))
        .and(header("authorization", "Bearer secret"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "a1" }])))
        .expect(1)
        .mount(&server)
        .await;

    let agents = client_for(&server).list(false).await.expect("list");
    assert_eq!(agents, json!([{ "id": "a1" }]));

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn list_verified_adds_query_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agents.php"))
        .and(query_param("verified", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).list(true).await.expect("list verified");
}

#[tokio::test]
async fn get_encodes_uuid_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agents.php"))
        .and(query_param("id", "abc 123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "abc 123" })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).get("abc 123").await.expect("get");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests[0].url.query(), Some("id=abc%20123"));
}

#[tokio::test]
async fn search_posts_filters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search.php"))
        .and(body_json(json!({
            "query": "weather",
            "verified": true,
            "skills": ["a", "b", "c"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let filters = SearchFilters {
        query: "weather".into(),
        verified: true,
        skills: veritrust_registry::csv_filter("a, b ,,c"),
        ..Default::default()
    };
    let result = client_for(&server).search(filters).await.expect("search");
    assert_eq!(result, json!({ "results": [] }));
}

#[tokio::test]
async fn register_and_reverify_post_expected_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register.php"))
        .and(body_json(json!({ "agent_card_url": "https://agent.test/agent.json" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "new" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/reverify.php"))
        .and(body_json(json!({ "id": "new" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "verified": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let registered = client
        .register("https://agent.test/agent.json")
        .await
        .expect("register");
    assert_eq!(registered, json!({ "id": "new" }));
    let reverified = client.reverify("new").await.expect("reverify");
    assert_eq!(reverified, json!({ "verified": true }));
}

#[tokio::test]
async fn raw_key_in_custom_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agents.php"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = RegistryClient::new(
        Credentials::new(server.uri())
            .api_key("secret")
            .custom_header("X-Api-Key")
            .use_bearer(false),
    );
    client.list(false).await.expect("list");

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn non_success_status_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agents.php"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":"not found"}"#))
        .mount(&server)
        .await;

    let err = client_for(&server).get("missing").await.unwrap_err();
    match err {
        Error::Api { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, r#"{"error":"not found"}"#);
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_is_an_http_error() {
    // Nothing listens on the discard port.
    let client = RegistryClient::new(Credentials::new("http://127.0.0.1:9"));
    let err = client.list(false).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)), "got {err:?}");
}

#[tokio::test]
async fn items_run_in_order_with_one_record_each() {
    let server = MockServer::start().await;
    for id in ["one", "two", "three"] {
        Mock::given(method("GET"))
            .and(path("/api/agents.php"))
            .and(query_param("id", id))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": id })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let items = vec![
        item(json!({ "uuid": "one" })),
        item(json!({ "uuid": "two" })),
        item(json!({ "uuid": "three" })),
    ];
    let records = execute_items(&client_for(&server), OperationKind::Get, &items)
        .await
        .expect("execute");

    let ids: Vec<_> = records.iter().map(|r| r.json["id"].clone()).collect();
    assert_eq!(ids, vec![json!("one"), json!("two"), json!("three")]);

    let requests = server.received_requests().await.expect("recording enabled");
    let queried: Vec<_> = requests
        .iter()
        .map(|r| r.url.query().unwrap_or_default().to_string())
        .collect();
    assert_eq!(queried, vec!["id=one", "id=two", "id=three"]);
}

#[tokio::test]
async fn first_failing_item_aborts_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/reverify.php"))
        .and(body_json(json!({ "id": "bad" })))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/reverify.php"))
        .and(body_json(json!({ "id": "ok" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let items = vec![
        item(json!({ "uuid": "ok" })),
        item(json!({ "uuid": "bad" })),
        item(json!({ "uuid": "ok" })),
    ];
    let err = execute_items(&client_for(&server), OperationKind::Reverify, &items)
        .await
        .unwrap_err();

    let Error::Item { index, source } = &err else {
        panic!("expected item error, got {err:?}");
    };
    assert_eq!(*index, 1);
    assert!(matches!(**source, Error::Api { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn missing_parameter_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let items = vec![InputItem::new(Map::new())];
    let err = execute_items(&client_for(&server), OperationKind::Register, &items)
        .await
        .unwrap_err();
    let Error::Item { source, .. } = err else {
        panic!("expected item error");
    };
    assert!(matches!(
        *source,
        Error::MissingParameter {
            operation: "register",
            parameter: "agentCardUrl"
        }
    ));
}

#[tokio::test]
async fn separator_only_csv_posts_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search.php"))
        .and(body_json(json!({ "skills": [] })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let records = execute_items(
        &client_for(&server),
        OperationKind::Search,
        &[item(json!({ "query": "", "skills": " , " }))],
    )
    .await
    .expect("search");
    assert_eq!(records[0].json, Value::Null);
}

#[tokio::test]
async fn empty_search_item_posts_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search.php"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let records = execute_items(
        &client_for(&server),
        OperationKind::Search,
        &[item(json!({ "query": "", "skills": "", "verifiedSearch": false }))],
    )
    .await
    .expect("search");
    assert_eq!(records[0].json, json!([]));
}

#[tokio::test]
async fn item_with_both_verified_flags_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search.php"))
        .and(body_json(json!({ "query": "x", "verified": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    execute_items(
        &client_for(&server),
        OperationKind::Search,
        &[item(json!({ "verified": false, "verifiedSearch": true, "query": "x" }))],
    )
    .await
    .expect("search");
}

#[tokio::test]
async fn direct_helpers_reject_empty_required_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.get("").await,
        Err(Error::MissingParameter {
            operation: "get",
            parameter: "uuid"
        })
    ));
    assert!(matches!(
        client.register("").await,
        Err(Error::MissingParameter {
            parameter: "agentCardUrl",
            ..
        })
    ));
    assert!(matches!(
        client.reverify("").await,
        Err(Error::MissingParameter {
            operation: "reverify",
            ..
        })
    ));
}
