use std::time::Duration;

use serde_json::json;
use swu_card_browser::api::{CardApi, CardQuery};
use swu_card_browser::config::{ClientConfig, ResponseEnvelope};
use swu_card_browser::error::ErrorKind;
use swu_card_browser::filter::{RangeSpec, SortDirection, SortKey};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> CardApi {
    let config = ClientConfig::new(Url::parse(&server.uri()).unwrap())
        .with_timeout(Duration::from_secs(2));
    CardApi::new(config).unwrap()
}

fn card(set: &str, number: &str, name: &str, hp: &str) -> serde_json::Value {
    json!({"Set": set, "Number": number, "Name": name, "HP": hp, "Cost": "2", "Power": "3"})
}

#[tokio::test]
async fn fetch_catalog_returns_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog/hps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["H1", "H2"]})))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = api_for(&server).fetch_catalog().await.unwrap();
    assert_eq!(catalog, ["H1", "H2"]);
}

#[tokio::test]
async fn fetch_catalog_rejects_non_array_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog/hps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "not-an-array"})))
        .mount(&server)
        .await;

    let err = api_for(&server).fetch_catalog().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn fetch_catalog_rejects_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog/hps"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).fetch_catalog().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn server_error_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog/hps"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = api_for(&server).fetch_catalog().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
    assert!(err.is_retryable());
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn slow_upstream_times_out_as_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog/hps"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = ClientConfig::new(Url::parse(&server.uri()).unwrap())
        .with_timeout(Duration::from_millis(50));
    let err = CardApi::new(config).unwrap().fetch_catalog().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn unreachable_upstream_is_transport_failure() {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).unwrap();
    drop(server);

    let api = CardApi::new(ClientConfig::new(base).with_timeout(Duration::from_secs(1))).unwrap();
    let err = api.search_cards("5").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn blank_search_skips_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let api = api_for(&server);
    assert!(api.search_cards("").await.unwrap().is_empty());
    assert!(api.search_cards("   ").await.unwrap().is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn search_key_is_sent_as_given() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .and(query_param("q", " 5 "))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [card("SOR", "001", "Ahsoka", "5")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cards = api_for(&server).search_cards(" 5 ").await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].name, "Ahsoka");
}

#[tokio::test]
async fn search_normalizes_in_upstream_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .and(query_param("q", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                card("SOR", "002", "Zeb", "5"),
                {"Name": "Broken", "HP": "n/a", "Cost": null, "Aspects": "Heroism"},
                "garbage",
                card("SOR", "001", "Ahsoka", "5")
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cards = api_for(&server).search_cards("5").await.unwrap();
    assert_eq!(cards.len(), 4);
    assert_eq!(cards[0].id, "SOR-002");
    assert_eq!(cards[0].hp, 5);
    assert_eq!(cards[1].name, "Broken");
    assert_eq!((cards[1].hp, cards[1].cost), (0, 0));
    assert!(cards[1].aspects.contains("Heroism"));
    assert!(cards[1].traits.is_empty());
    assert_eq!(cards[2].name, "Unnamed Card 2");
    assert_eq!(cards[2].id, "unknown-set-unknown-number-2");
    assert_eq!(cards[3].name, "Ahsoka");
}

#[tokio::test]
async fn browse_filters_and_sorts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                card("SOR", "003", "C", "10"),
                card("SOR", "001", "B", "5"),
                card("SOR", "002", "A", "1"),
                card("SHD", "004", "A", "6")
            ]
        })))
        .mount(&server)
        .await;

    let query = CardQuery::new("any")
        .with_range(RangeSpec::parse("2-8").unwrap())
        .sorted_by(SortKey::Name, SortDirection::Ascending);
    let cards = api_for(&server).browse(&query).await.unwrap();
    let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["SHD-004", "SOR-001"]);
}

#[tokio::test]
async fn wrapped_envelope_goes_through_cors_proxy() {
    let server = MockServer::start().await;
    let inner = json!({"data": ["3", "4", "5"]}).to_string();
    Mock::given(method("GET"))
        .and(path("/get"))
        .and(query_param("url", "https://api.swu-db.com/catalog/hps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "contents": inner })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::default()
        .with_envelope(ResponseEnvelope::Wrapped)
        .with_cors_proxy(format!("{}/get?url=", server.uri()));
    let catalog = CardApi::new(config).unwrap().fetch_catalog().await.unwrap();
    assert_eq!(catalog, ["3", "4", "5"]);
}

#[tokio::test]
async fn wrapped_envelope_without_contents_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["3"]})))
        .mount(&server)
        .await;

    let config = ClientConfig::default()
        .with_envelope(ResponseEnvelope::Wrapped)
        .with_cors_proxy(format!("{}/get?url=", server.uri()));
    let err = CardApi::new(config).unwrap().fetch_catalog().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn catalog_and_search_can_run_concurrently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog/hps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["5"]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [card("SOR", "1", "A", "5")]})),
        )
        .mount(&server)
        .await;

    let api = api_for(&server);
    let (catalog, cards) = futures::join!(api.fetch_catalog(), api.search_cards("5"));
    assert_eq!(catalog.unwrap(), ["5"]);
    assert_eq!(cards.unwrap().len(), 1);
}
