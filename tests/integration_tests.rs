// Integration tests for Yelp Reco against a mocked Elasticsearch

use mockito::Matcher;
use serde_json::json;
use yelp_reco::core::Recommender;
use yelp_reco::models::{Coordinate, IndexDocument, UserQuery};
use yelp_reco::pipeline;
use yelp_reco::services::{ElasticClient, IndexSink, RecordSource};

fn client_for(server: &mockito::ServerGuard) -> ElasticClient {
    ElasticClient::new(
        server.url(),
        "yelpreco".to_string(),
        "restaurant".to_string(),
        "yelpraw/restaurant".to_string(),
    )
}

fn vegas_query(category: Option<&str>) -> UserQuery {
    UserQuery {
        origin: Coordinate::new(36.1027496, -115.1686673),
        category: category.map(str::to_string),
        max_distance_km: 5.0,
        top_n: 5,
    }
}

fn source_hit(id: &str, stars: &str, lat: &str, lon: &str) -> serde_json::Value {
    json!({
        "_source": {
            "business_id": id,
            "name": format!("Business {}", id),
            "full_address": "Las Vegas NV",
            "categories": "Restaurants, Mexican",
            "stars": stars,
            "latitude": lat,
            "longitude": lon,
        }
    })
}

#[tokio::test]
async fn test_ensure_index_creates_missing_index() {
    let mut server = mockito::Server::new_async().await;

    let head = server
        .mock("HEAD", "/yelpreco")
        .with_status(404)
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/yelpreco")
        .match_body(Matcher::PartialJson(json!({
            "mappings": {
                "restaurant": {
                    "properties": {
                        "location": { "type": "geo_point" }
                    }
                }
            }
        })))
        .with_status(200)
        .create_async()
        .await;

    client_for(&server).ensure_index().await.unwrap();

    head.assert_async().await;
    put.assert_async().await;
}

#[tokio::test]
async fn test_ensure_index_skips_existing_index() {
    let mut server = mockito::Server::new_async().await;

    let head = server
        .mock("HEAD", "/yelpreco")
        .with_status(200)
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/yelpreco")
        .expect(0)
        .create_async()
        .await;

    client_for(&server).ensure_index().await.unwrap();

    head.assert_async().await;
    put.assert_async().await;
}

#[tokio::test]
async fn test_fetch_all_unpacks_search_hits() {
    let mut server = mockito::Server::new_async().await;

    let search = server
        .mock("GET", "/yelpraw/restaurant/_search?scroll=1m&size=1000")
        .with_status(200)
        .with_body(
            json!({
                "_scroll_id": "cursor-1",
                "hits": {
                    "hits": [
                        source_hit("a", "4.5", "36.11", "-115.17"),
                        source_hit("b", "3.0", "36.10", "-115.16"),
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let scroll = server
        .mock("POST", "/_search/scroll")
        .match_body(Matcher::PartialJson(json!({ "scroll_id": "cursor-1" })))
        .with_status(200)
        .with_body(json!({ "_scroll_id": "cursor-1", "hits": { "hits": [] } }).to_string())
        .create_async()
        .await;

    let records = client_for(&server).fetch_all().await.unwrap();

    search.assert_async().await;
    scroll.assert_async().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].business_id.as_deref(), Some("a"));
    assert_eq!(records[1].stars.as_deref(), Some("3.0"));
}

#[tokio::test]
async fn test_fetch_all_scrolls_past_first_page() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/yelpraw/restaurant/_search?scroll=1m&size=1000")
        .with_status(200)
        .with_body(
            json!({
                "_scroll_id": "cursor-1",
                "hits": { "hits": [source_hit("a", "4.5", "36.11", "-115.17")] }
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("POST", "/_search/scroll")
        .match_body(Matcher::PartialJson(json!({ "scroll_id": "cursor-1" })))
        .with_status(200)
        .with_body(
            json!({
                "_scroll_id": "cursor-2",
                "hits": { "hits": [source_hit("b", "3.0", "36.10", "-115.16")] }
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("POST", "/_search/scroll")
        .match_body(Matcher::PartialJson(json!({ "scroll_id": "cursor-2" })))
        .with_status(200)
        .with_body(json!({ "_scroll_id": "cursor-2", "hits": { "hits": [] } }).to_string())
        .create_async()
        .await;

    let records = client_for(&server).fetch_all().await.unwrap();

    let ids: Vec<_> = records.iter().filter_map(|r| r.business_id.as_deref()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_fetch_all_keeps_numerically_typed_hits() {
    // Rows written by the direct JSON ingest path store numbers as numbers
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/yelpraw/restaurant/_search?scroll=1m&size=1000")
        .with_status(200)
        .with_body(
            json!({
                "hits": {
                    "hits": [{
                        "_id": "n1",
                        "_source": {
                            "business_id": "n1",
                            "name": "Numeric Diner",
                            "full_address": "Las Vegas NV",
                            "categories": ["Restaurants", "Diners"],
                            "stars": 4.5,
                            "latitude": 36.11,
                            "longitude": -115.17,
                        }
                    }]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let records = client_for(&server).fetch_all().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].stars.as_deref(), Some("4.5"));
    assert_eq!(records[0].categories.as_deref(), Some("Restaurants, Diners"));
}

#[tokio::test]
async fn test_fetch_all_surfaces_server_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", "/yelpraw/restaurant/_search?scroll=1m&size=1000")
        .with_status(500)
        .create_async()
        .await;

    let result = client_for(&server).fetch_all().await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_upsert_writes_document_under_business_id() {
    let mut server = mockito::Server::new_async().await;

    let put = server
        .mock("PUT", "/yelpreco/restaurant/a")
        .match_body(Matcher::PartialJson(json!({
            "businessId": "a",
            "stars": "4.5",
            "location": "36.11,-115.17",
        })))
        .with_status(201)
        .create_async()
        .await;

    let document = IndexDocument {
        business_id: "a".to_string(),
        name: "Business a".to_string(),
        full_address: "Las Vegas NV".to_string(),
        categories: "Restaurants".to_string(),
        stars: "4.5".to_string(),
        location: "36.11,-115.17".to_string(),
    };

    client_for(&server).upsert(&document).await.unwrap();
    put.assert_async().await;
}

#[tokio::test]
async fn test_end_to_end_run_over_mocked_index() {
    let mut server = mockito::Server::new_async().await;

    // Raw scan: one duplicate id, one out-of-range record, one malformed
    let mut hits = vec![
        source_hit("A", "4.5", "36.12", "-115.17"),
        source_hit("B", "4.8", "36.9", "-115.17"),
        source_hit("A", "4.5", "36.12", "-115.17"),
        source_hit("C", "4.0", "36.10", "-115.16"),
    ];
    hits.push(json!({ "_source": { "business_id": "broken", "stars": "oops" } }));

    server
        .mock("GET", "/yelpraw/restaurant/_search?scroll=1m&size=1000")
        .with_status(200)
        .with_body(json!({ "_scroll_id": "cursor-1", "hits": { "hits": hits } }).to_string())
        .create_async()
        .await;
    server
        .mock("POST", "/_search/scroll")
        .with_status(200)
        .with_body(json!({ "_scroll_id": "cursor-1", "hits": { "hits": [] } }).to_string())
        .create_async()
        .await;

    let upserts = server
        .mock("PUT", Matcher::Regex(r"^/yelpreco/restaurant/[AC]$".to_string()))
        .with_status(201)
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);
    let result = pipeline::run(
        &client,
        &client,
        &Recommender::default(),
        &vegas_query(Some("Restaurants")),
    )
    .await
    .unwrap();

    upserts.assert_async().await;
    assert_eq!(result.total_candidates, 5);
    assert_eq!(result.skipped_malformed, 1);

    let ids: Vec<&str> = result
        .records
        .iter()
        .map(|r| r.business_id.as_str())
        .collect();
    assert_eq!(ids, vec!["A", "C"]);
}
