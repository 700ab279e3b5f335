use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use futures_util::future::{join_all, try_join, try_join3};
use tracing::warn;

use ub_api::{ApiClient, CreateClaimRequest};
use ub_listing::{
    clamp_quantity, dedupe_listings, ClaimRecord, ListingSnapshot, ListingStatus,
    ListingViewModel,
};
use ub_token::resolve_redemption;

use crate::views::{display_names, restaurant_label};
use crate::{BrowseView, ClaimViewModel, DashboardSummary, DashboardView};

/// Outcome of a redemption attempt.
#[derive(Debug)]
pub enum RedeemOutcome {
    /// The scanned input normalized to nothing; no external call was made.
    NoToken,
    /// The claim was redeemed and a full dashboard reload completed.
    Redeemed {
        claim: ClaimRecord,
        dashboard: DashboardView,
    },
}

/// Orchestrates reconciliation passes against the external API.
///
/// Each `load_*` method is one complete pass: fetch, recompute, return
/// fresh view models. Holds no state between passes.
pub struct Reconciler<C> {
    api: C,
}

impl<C: ApiClient> Reconciler<C> {
    pub fn new(api: C) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &C {
        &self.api
    }

    /// Student browse pass: all listings joined with restaurant names,
    /// deduplicated per (restaurant, title).
    pub async fn load_browse(&self, now: DateTime<Utc>) -> Result<BrowseView> {
        let (listings, users) = try_join(self.api.fetch_listings(), self.api.fetch_users())
            .await
            .context("failed to load food listings")?;

        let names = display_names(&users);
        let view_models = listings
            .iter()
            .map(|l| {
                ListingViewModel::build(l, restaurant_label(&names, l.restaurant_id), 0, now)
            })
            .collect();
        let listings = dedupe_listings(view_models);

        let restaurants: BTreeSet<String> =
            listings.iter().map(|l| l.restaurant_name.clone()).collect();

        Ok(BrowseView {
            listings,
            restaurants: restaurants.into_iter().collect(),
        })
    }

    /// Restaurant dashboard pass. Claims are fetched per listing,
    /// concurrently; a failed fetch degrades that listing to zero known
    /// claims instead of failing the pass.
    pub async fn load_dashboard(
        &self,
        restaurant_id: i64,
        now: DateTime<Utc>,
    ) -> Result<DashboardView> {
        let (listings, users) = try_join(
            self.api.fetch_listings_by_restaurant(restaurant_id),
            self.api.fetch_users(),
        )
        .await
        .context("failed to load restaurant dashboard")?;

        let claims = self.fetch_claims_tolerant(&listings).await;

        let mut counts: BTreeMap<i64, u32> = BTreeMap::new();
        for claim in &claims {
            *counts.entry(claim.listing_id).or_insert(0) += 1;
        }

        let names = display_names(&users);
        let view_models = listings
            .iter()
            .map(|l| {
                ListingViewModel::build(
                    l,
                    restaurant_label(&names, l.restaurant_id),
                    counts.get(&l.id).copied().unwrap_or(0),
                    now,
                )
            })
            .collect();
        let listings = dedupe_listings(view_models);

        let summary = DashboardSummary {
            total_items: listings.len(),
            remaining_total: listings.iter().map(|l| l.remaining_quantity).sum(),
            total_claims: claims.len(),
        };

        Ok(DashboardView {
            listings,
            claims,
            summary,
        })
    }

    /// Student claims pass: the student's claims joined against listings
    /// and restaurant names.
    pub async fn load_student_claims(&self, student_id: i64) -> Result<Vec<ClaimViewModel>> {
        let (claims, listings, users) = try_join3(
            self.api.fetch_claims_by_student(student_id),
            self.api.fetch_listings(),
            self.api.fetch_users(),
        )
        .await
        .context("failed to load claims")?;

        let listing_by_id: BTreeMap<i64, &ListingSnapshot> =
            listings.iter().map(|l| (l.id, l)).collect();
        let names = display_names(&users);

        Ok(claims
            .iter()
            .map(|c| ClaimViewModel::build(c, listing_by_id.get(&c.listing_id).copied(), &names))
            .collect())
    }

    /// Create a claim against a listing from the current pass.
    ///
    /// The expired/exhausted refusal lives here, not in the quantity guard:
    /// the guard only clamps, so this check must run before the external
    /// call. The requested quantity is clamped against the per-person limit
    /// and remaining stock.
    pub async fn claim(
        &self,
        listing: &ListingViewModel,
        student_id: i64,
        requested: i64,
    ) -> Result<ClaimRecord> {
        if listing.status == ListingStatus::Expired {
            bail!("'{}' is expired or sold out and cannot be claimed", listing.title);
        }

        let quantity = clamp_quantity(requested, listing.per_person_limit, listing.remaining_quantity);
        self.api
            .create_claim(CreateClaimRequest {
                listing_id: listing.id,
                student_id,
                quantity,
            })
            .await
            .context("could not create claim")
    }

    pub async fn cancel(&self, claim_id: i64) -> Result<()> {
        self.api
            .cancel_claim(claim_id)
            .await
            .context("could not cancel claim")
    }

    /// Redeem scanned/typed input against the known claims of the current
    /// dashboard pass. On success the whole dashboard is reloaded — no
    /// incremental patching — and returned alongside the redeemed claim.
    pub async fn redeem(
        &self,
        raw: &str,
        known_claims: &[ClaimRecord],
        restaurant_id: i64,
        now: DateTime<Utc>,
    ) -> Result<RedeemOutcome> {
        let token = resolve_redemption(raw, known_claims);
        if token.is_empty() {
            return Ok(RedeemOutcome::NoToken);
        }

        let claim = self
            .api
            .redeem_by_token(&token)
            .await
            .context("could not redeem token")?;

        let dashboard = self.load_dashboard(restaurant_id, now).await?;
        Ok(RedeemOutcome::Redeemed { claim, dashboard })
    }

    async fn fetch_claims_tolerant(&self, listings: &[ListingSnapshot]) -> Vec<ClaimRecord> {
        let fetches = listings.iter().map(|listing| {
            let listing_id = listing.id;
            async move {
                match self.api.fetch_claims_by_listing(listing_id).await {
                    Ok(rows) => rows,
                    Err(err) => {
                        warn!(listing_id, error = %err, "claims fetch failed; assuming zero claims");
                        Vec::new()
                    }
                }
            }
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }
}
