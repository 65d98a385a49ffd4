//! End-to-end tests for the server stats endpoints

mod common;

use common::*;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_home_reports_load_stats() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_home().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["records"], KEPT_ROWS);
    assert_eq!(body["load_stats"]["total_rows"], TOTAL_ROWS);
    assert_eq!(body["load_stats"]["dropped_invalid_dates"], 1);
    assert_eq!(
        body["load_stats"]["invalid_vote_cells"],
        INVALID_VOTE_CELLS
    );
    assert!(body["source"]
        .as_str()
        .unwrap()
        .ends_with(SOURCE_FILE_NAME));
    assert!(body["uptime"].as_str().unwrap().starts_with("0d"));
}

#[tokio::test]
async fn test_stats_route_matches_home() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let home: Value = client.get_home().await.json().await.unwrap();
    let response = client.get_stats().await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats: Value = response.json().await.unwrap();

    assert_eq!(home["load_stats"], stats["load_stats"]);
    assert_eq!(home["hash"], stats["hash"]);
}
