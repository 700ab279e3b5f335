//! ub-api-mem
//!
//! In-memory [`ApiClient`] standing in for the UniBite backend in scenario
//! tests and demos. Mirrors the backend's observable behavior:
//! - claim creation validates quantity against stock and the per-person
//!   limit, decrements remaining stock, and assigns a unique token
//! - cancel restores stock; redeemed/canceled claims are terminal
//! - redemption looks a claim up by token and stamps `redeemed_at`
//!
//! Ids are deterministic (`BTreeMap` ordering, sequential claim ids).
//! Claim-fetch failures can be injected per listing to exercise the
//! facade's partial-failure isolation.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use ub_api::{ApiClient, ApiError, CreateClaimRequest, UserRecord};
use ub_listing::{ClaimRecord, ClaimStatus, ListingSnapshot};

#[derive(Debug, Default)]
struct Inner {
    listings: BTreeMap<i64, ListingSnapshot>,
    claims: BTreeMap<i64, ClaimRecord>,
    users: BTreeMap<i64, UserRecord>,
    /// Listing ids whose claims fetch fails (injected fault).
    failing_claim_fetches: BTreeSet<i64>,
    next_claim_id: i64,
}

#[derive(Debug, Default)]
pub struct MemApi {
    inner: Mutex<Inner>,
}

impl MemApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_listing(&self, listing: ListingSnapshot) {
        self.lock().listings.insert(listing.id, listing);
    }

    pub fn insert_user(&self, user: UserRecord) {
        self.lock().users.insert(user.id, user);
    }

    /// Seed a claim verbatim (token included). Keeps the claim-id sequence
    /// ahead of the seeded id.
    pub fn insert_claim(&self, claim: ClaimRecord) {
        let mut inner = self.lock();
        inner.next_claim_id = inner.next_claim_id.max(claim.id);
        inner.claims.insert(claim.id, claim);
    }

    /// Make `fetch_claims_by_listing` fail for this listing id.
    pub fn fail_claims_for(&self, listing_id: i64) {
        self.lock().failing_claim_fetches.insert(listing_id);
    }

    pub fn listing(&self, listing_id: i64) -> Option<ListingSnapshot> {
        self.lock().listings.get(&listing_id).cloned()
    }

    pub fn claim(&self, claim_id: i64) -> Option<ClaimRecord> {
        self.lock().claims.get(&claim_id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("MemApi lock poisoned")
    }
}

fn backend_error(message: &str) -> ApiError {
    ApiError::Api {
        status: 400,
        message: message.to_string(),
    }
}

#[async_trait::async_trait]
impl ApiClient for MemApi {
    async fn fetch_listings(&self) -> Result<Vec<ListingSnapshot>, ApiError> {
        Ok(self.lock().listings.values().cloned().collect())
    }

    async fn fetch_listings_by_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<ListingSnapshot>, ApiError> {
        Ok(self
            .lock()
            .listings
            .values()
            .filter(|l| l.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn fetch_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        Ok(self.lock().users.values().cloned().collect())
    }

    async fn fetch_claims_by_listing(
        &self,
        listing_id: i64,
    ) -> Result<Vec<ClaimRecord>, ApiError> {
        let inner = self.lock();
        if inner.failing_claim_fetches.contains(&listing_id) {
            return Err(ApiError::Transport(format!(
                "injected failure for listing {listing_id}"
            )));
        }
        Ok(inner
            .claims
            .values()
            .filter(|c| c.listing_id == listing_id)
            .cloned()
            .collect())
    }

    async fn fetch_claims_by_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<ClaimRecord>, ApiError> {
        Ok(self
            .lock()
            .claims
            .values()
            .filter(|c| c.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn create_claim(&self, req: CreateClaimRequest) -> Result<ClaimRecord, ApiError> {
        let mut inner = self.lock();

        if req.quantity <= 0 {
            return Err(backend_error("quantity must be > 0"));
        }

        let listing = inner
            .listings
            .get(&req.listing_id)
            .cloned()
            .ok_or_else(|| backend_error("Listing not found"))?;

        if listing.remaining_quantity <= 0 {
            return Err(backend_error("Listing is sold out"));
        }
        if req.quantity > listing.per_person_limit {
            return Err(backend_error("Quantity exceeds per-person limit"));
        }
        if req.quantity > listing.remaining_quantity {
            return Err(backend_error("Not enough quantity remaining"));
        }

        if let Some(stored) = inner.listings.get_mut(&req.listing_id) {
            stored.remaining_quantity -= req.quantity;
        }

        inner.next_claim_id += 1;
        let claim = ClaimRecord {
            id: inner.next_claim_id,
            listing_id: req.listing_id,
            student_id: req.student_id,
            quantity: req.quantity,
            status: ClaimStatus::Claimed,
            qr_token: Uuid::new_v4().to_string(),
            claimed_at: Some(Utc::now()),
            redeemed_at: None,
        };
        inner.claims.insert(claim.id, claim.clone());
        Ok(claim)
    }

    async fn cancel_claim(&self, claim_id: i64) -> Result<(), ApiError> {
        let mut inner = self.lock();

        let claim = inner
            .claims
            .get(&claim_id)
            .cloned()
            .ok_or_else(|| backend_error("Claim not found"))?;

        match claim.status {
            ClaimStatus::Redeemed => return Err(backend_error("Cannot cancel a redeemed claim")),
            ClaimStatus::Canceled => return Err(backend_error("Claim already canceled")),
            ClaimStatus::Claimed => {}
        }

        if let Some(listing) = inner.listings.get_mut(&claim.listing_id) {
            listing.remaining_quantity += claim.quantity;
        }
        if let Some(stored) = inner.claims.get_mut(&claim_id) {
            stored.status = ClaimStatus::Canceled;
        }
        Ok(())
    }

    async fn redeem_by_token(&self, token: &str) -> Result<ClaimRecord, ApiError> {
        let mut inner = self.lock();

        let claim_id = inner
            .claims
            .values()
            .find(|c| c.qr_token == token)
            .map(|c| c.id)
            .ok_or_else(|| backend_error("Invalid QR token"))?;

        let claim = inner.claims.get_mut(&claim_id).expect("claim just found");
        if claim.status == ClaimStatus::Redeemed {
            return Err(backend_error("Already redeemed"));
        }

        claim.status = ClaimStatus::Redeemed;
        claim.redeemed_at = Some(Utc::now());
        Ok(claim.clone())
    }
}
