use serde::de::DeserializeOwned;

use ub_listing::{ClaimRecord, ListingSnapshot};

use crate::{ApiClient, ApiError, CreateClaimRequest, UserRecord};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// `reqwest`-backed [`ApiClient`] for the UniBite backend.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Base URL from `UNIBITE_API_URL`, defaulting to localhost.
    pub fn from_env() -> Self {
        let base_url = std::env::var("UNIBITE_API_URL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let text = self.send_text(req).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_text(&self, req: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: error_message(&text, status.as_u16()),
            });
        }

        Ok(text)
    }
}

/// Backend errors arrive either as a bare string body, a JSON string, or
/// something opaque; mirror that leniency and fall back to a generic line.
fn error_message(body: &str, status: u16) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::String(s)) if !s.is_empty() => s,
        Ok(_) => format!("request failed ({status})"),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!("request failed ({status})"),
    }
}

#[async_trait::async_trait]
impl ApiClient for HttpApiClient {
    async fn fetch_listings(&self) -> Result<Vec<ListingSnapshot>, ApiError> {
        self.send_json(self.http.get(self.url("/api/listings"))).await
    }

    async fn fetch_listings_by_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<ListingSnapshot>, ApiError> {
        let path = format!("/api/listings/restaurant/{restaurant_id}");
        self.send_json(self.http.get(self.url(&path))).await
    }

    async fn fetch_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        self.send_json(self.http.get(self.url("/api/users"))).await
    }

    async fn fetch_claims_by_listing(
        &self,
        listing_id: i64,
    ) -> Result<Vec<ClaimRecord>, ApiError> {
        let path = format!("/api/claims/listing/{listing_id}");
        self.send_json(self.http.get(self.url(&path))).await
    }

    async fn fetch_claims_by_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<ClaimRecord>, ApiError> {
        let path = format!("/api/claims/student/{student_id}");
        self.send_json(self.http.get(self.url(&path))).await
    }

    async fn create_claim(&self, req: CreateClaimRequest) -> Result<ClaimRecord, ApiError> {
        self.send_json(self.http.post(self.url("/api/claims")).json(&req))
            .await
    }

    async fn cancel_claim(&self, claim_id: i64) -> Result<(), ApiError> {
        let path = format!("/api/claims/{claim_id}/cancel");
        self.send_text(self.http.post(self.url(&path))).await?;
        Ok(())
    }

    async fn redeem_by_token(&self, token: &str) -> Result<ClaimRecord, ApiError> {
        self.send_json(
            self.http
                .post(self.url("/api/claims/redeem"))
                .query(&[("qrToken", token)]),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn url_joins_without_duplicate_slash() {
        let client = HttpApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("/api/listings"), "http://localhost:8080/api/listings");
    }

    #[test]
    fn error_message_prefers_string_bodies() {
        assert_eq!(error_message("\"Listing is sold out\"", 400), "Listing is sold out");
        assert_eq!(error_message("Not enough quantity remaining", 400), "Not enough quantity remaining");
        assert_eq!(error_message("{\"detail\":\"x\"}", 500), "request failed (500)");
        assert_eq!(error_message("", 502), "request failed (502)");
    }

    #[tokio::test]
    async fn fetch_listings_decodes_wire_payload() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/listings");
                then.status(200).json_body(serde_json::json!([{
                    "id": 7,
                    "title": "Veggie wraps",
                    "restaurantId": 3,
                    "totalQuantity": 20,
                    "remainingQuantity": 4,
                    "perPersonLimit": 2,
                    "availableUntil": "2026-08-25T18:00:00Z",
                    "pickupLocation": "North hall"
                }]));
            })
            .await;

        let client = HttpApiClient::new(server.base_url());
        let listings = client.fetch_listings().await.unwrap();

        mock.assert_async().await;
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, 7);
        assert_eq!(listings[0].remaining_quantity, 4);
    }

    #[tokio::test]
    async fn create_claim_posts_camel_case_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/claims")
                    .json_body(serde_json::json!({
                        "listingId": 7,
                        "studentId": 42,
                        "quantity": 2
                    }));
                then.status(200).json_body(serde_json::json!({
                    "id": 1,
                    "listingId": 7,
                    "studentId": 42,
                    "quantity": 2,
                    "status": "CLAIMED",
                    "qrToken": "tok-1"
                }));
            })
            .await;

        let client = HttpApiClient::new(server.base_url());
        let claim = client
            .create_claim(CreateClaimRequest {
                listing_id: 7,
                student_id: 42,
                quantity: 2,
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(claim.qr_token, "tok-1");
    }

    #[tokio::test]
    async fn redeem_sends_token_as_query_param() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/claims/redeem")
                    .query_param("qrToken", "tok-999");
                then.status(200).json_body(serde_json::json!({
                    "id": 12345,
                    "listingId": 7,
                    "studentId": 42,
                    "quantity": 1,
                    "status": "REDEEMED",
                    "qrToken": "tok-999",
                    "redeemedAt": "2026-08-25T12:00:00Z"
                }));
            })
            .await;

        let client = HttpApiClient::new(server.base_url());
        let claim = client.redeem_by_token("tok-999").await.unwrap();

        mock.assert_async().await;
        assert!(claim.redeemed_at.is_some());
    }

    #[tokio::test]
    async fn backend_error_body_becomes_api_error_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/claims");
                then.status(400).body("Quantity exceeds per-person limit");
            })
            .await;

        let client = HttpApiClient::new(server.base_url());
        let err = client
            .create_claim(CreateClaimRequest {
                listing_id: 7,
                student_id: 42,
                quantity: 99,
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApiError::Api {
                status: 400,
                message: "Quantity exceeds per-person limit".to_string()
            }
        );
    }

    #[tokio::test]
    async fn cancel_claim_succeeds_on_empty_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/claims/5/cancel");
                then.status(200);
            })
            .await;

        let client = HttpApiClient::new(server.base_url());
        client.cancel_claim(5).await.unwrap();
        mock.assert_async().await;
    }
}
