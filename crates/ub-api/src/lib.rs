//! ub-api
//!
//! Contract for the external UniBite backend. This crate owns:
//! - the [`ApiClient`] trait every consumer programs against
//! - the request/response record types not already part of the listing model
//! - the `reqwest`-backed HTTP implementation ([`HttpApiClient`])
//!
//! All payloads are JSON with camelCase field names. No retries, no
//! timeouts: transport policy belongs to the caller or the HTTP stack.

mod error;
mod http;

pub use error::ApiError;
pub use http::HttpApiClient;

use serde::{Deserialize, Serialize};

use ub_listing::{ClaimRecord, ListingSnapshot};

/// A user row as exposed by the external system. Restaurants and students
/// share this shape; only the display fields matter on this side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserRecord {
    /// Display name, falling back to email, falling back to `User {id}`.
    /// Empty strings count as absent.
    pub fn display_label(&self) -> String {
        non_empty(&self.display_name)
            .or_else(|| non_empty(&self.email))
            .unwrap_or_else(|| format!("User {}", self.id))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

/// Body for claim creation. Quantity must already be clamped by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaimRequest {
    pub listing_id: i64,
    pub student_id: i64,
    pub quantity: i64,
}

/// External collaborator contract, object-safe so callers can hold a
/// `Box<dyn ApiClient>` or stay generic over the implementation.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn fetch_listings(&self) -> Result<Vec<ListingSnapshot>, ApiError>;

    async fn fetch_listings_by_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<ListingSnapshot>, ApiError>;

    async fn fetch_users(&self) -> Result<Vec<UserRecord>, ApiError>;

    async fn fetch_claims_by_listing(&self, listing_id: i64)
        -> Result<Vec<ClaimRecord>, ApiError>;

    async fn fetch_claims_by_student(&self, student_id: i64)
        -> Result<Vec<ClaimRecord>, ApiError>;

    async fn create_claim(&self, req: CreateClaimRequest) -> Result<ClaimRecord, ApiError>;

    async fn cancel_claim(&self, claim_id: i64) -> Result<(), ApiError>;

    /// Redeem a claim by its canonical token; the claim comes back with
    /// status `REDEEMED`. Unknown tokens are an application-level error.
    async fn redeem_by_token(&self, token: &str) -> Result<ClaimRecord, ApiError>;
}
