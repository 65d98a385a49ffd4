//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per dashboard endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    pub async fn get_home(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Home request failed")
    }

    pub async fn get_stats(&self) -> Response {
        self.client
            .get(format!("{}/v1/stats", self.base_url))
            .send()
            .await
            .expect("Stats request failed")
    }

    pub async fn get_filters(&self) -> Response {
        self.client
            .get(format!("{}/v1/filters", self.base_url))
            .send()
            .await
            .expect("Get filters request failed")
    }

    pub async fn post_filters(&self, selection: &Value) -> Response {
        self.client
            .post(format!("{}/v1/filters", self.base_url))
            .json(selection)
            .send()
            .await
            .expect("Post filters request failed")
    }

    pub async fn get_report(&self) -> Response {
        self.client
            .get(format!("{}/v1/report", self.base_url))
            .send()
            .await
            .expect("Get report request failed")
    }

    pub async fn post_report(&self, selection: &Value) -> Response {
        self.client
            .post(format!("{}/v1/report", self.base_url))
            .json(selection)
            .send()
            .await
            .expect("Post report request failed")
    }

    /// Posts a raw body, for malformed payload tests
    pub async fn post_report_raw(&self, body: &str) -> Response {
        self.client
            .post(format!("{}/v1/report", self.base_url))
            .header("Content-Type", "application/json")
            .body(body.to_owned())
            .send()
            .await
            .expect("Post report request failed")
    }
}
