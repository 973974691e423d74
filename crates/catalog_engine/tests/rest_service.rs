use std::time::Duration;

use catalog_core::{featured_journals_query, Filter, SortSpec};
use catalog_engine::{FailureKind, QueryService, RestQueryService, RestSettings};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(server: &MockServer) -> RestQueryService {
    RestQueryService::new(RestSettings {
        base_url: server.uri(),
        api_key: Some("anon-key".to_string()),
        ..RestSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn count_reads_total_from_content_range() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/rest/v1/editorial_board"))
        .and(query_param("role_type", "in.(chief,associate)"))
        .and(query_param("active", "eq.true"))
        .and(header("Prefer", "count=exact"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Range", "0-2/3"))
        .mount(&server)
        .await;

    let count = service(&server)
        .count(
            "editorial_board",
            &[
                Filter::one_of("role_type", ["chief", "associate"]),
                Filter::eq("active", true),
            ],
        )
        .await
        .expect("count ok");
    assert_eq!(count, Some(3));
}

#[tokio::test]
async fn count_without_total_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/rest/v1/journals"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let count = service(&server).count("journals", &[]).await.expect("count ok");
    assert_eq!(count, None);
}

#[tokio::test]
async fn select_sends_order_and_limit_and_keeps_row_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/journals"))
        .and(query_param("select", "*"))
        .and(query_param("featured", "eq.true"))
        .and(query_param("status", "eq.active"))
        .and(query_param("order", "views_count.desc"))
        .and(query_param("limit", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "views_count": 100 },
            { "id": 3, "views_count": 75 },
            { "id": 2, "views_count": 50 }
        ])))
        .mount(&server)
        .await;

    let query = featured_journals_query(6).unwrap();
    let rows = service(&server)
        .select(query.collection(), query.filters(), query.sort(), query.limit())
        .await
        .expect("select ok");
    let ids: Vec<_> = rows.iter().map(|row| row["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(3), json!(2)]);
}

#[tokio::test]
async fn http_error_carries_store_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/journals"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "42501",
            "message": "permission denied for table journals"
        })))
        .mount(&server)
        .await;

    let sort = SortSpec {
        field: "title".to_string(),
        ascending: true,
    };
    let err = service(&server)
        .select("journals", &[], &sort, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(401));
    assert_eq!(err.reason(), "permission denied for table journals");
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/journals"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let sort = SortSpec {
        field: "title".to_string(),
        ascending: true,
    };
    let err = service(&server)
        .select("journals", &[], &sort, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/rest/v1/journals"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(250)))
        .mount(&server)
        .await;

    let service = RestQueryService::new(RestSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..RestSettings::default()
    })
    .unwrap();
    let err = service.count("journals", &[]).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
    assert_eq!(err.reason(), "timeout");
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = RestQueryService::new(RestSettings {
        base_url: "not a url".to_string(),
        ..RestSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
