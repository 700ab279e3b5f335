use std::collections::BTreeMap;

use ub_api::UserRecord;
use ub_listing::{format_instant, ClaimRecord, ClaimStatus, ListingSnapshot, ListingViewModel};

/// Output of one browse pass: deduplicated listings plus the distinct
/// restaurant names (sorted) for filter dropdowns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseView {
    pub listings: Vec<ListingViewModel>,
    pub restaurants: Vec<String>,
}

impl BrowseView {
    /// Listings for one restaurant name; an unfiltered view is just
    /// `listings` itself.
    pub fn for_restaurant(&self, restaurant_name: &str) -> Vec<&ListingViewModel> {
        self.listings
            .iter()
            .filter(|l| l.restaurant_name == restaurant_name)
            .collect()
    }
}

/// Output of one restaurant dashboard pass. `claims` is the flattened claim
/// set across the restaurant's listings, kept for redemption-token lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub listings: Vec<ListingViewModel>,
    pub claims: Vec<ClaimRecord>,
    pub summary: DashboardSummary,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_items: usize,
    pub remaining_total: i64,
    pub total_claims: usize,
}

/// Which tab a claim belongs to on the student claims screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimBucket {
    Active,
    History,
}

/// One claim joined against listing and user data for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimViewModel {
    pub id: i64,
    pub listing_id: i64,
    pub title: String,
    pub restaurant_name: String,
    pub quantity: i64,
    pub pickup_location: String,
    pub claimed_at_label: String,
    pub status: ClaimStatus,
    pub bucket: ClaimBucket,
}

impl ClaimViewModel {
    pub fn build(
        claim: &ClaimRecord,
        listing: Option<&ListingSnapshot>,
        names: &BTreeMap<i64, String>,
    ) -> Self {
        let title = listing
            .map(|l| l.title.clone())
            .unwrap_or_else(|| format!("Listing #{}", claim.listing_id));
        let restaurant_name = match listing {
            Some(l) => restaurant_label(names, l.restaurant_id),
            None => "Unknown restaurant".to_string(),
        };
        let pickup_location = listing
            .and_then(|l| l.pickup_location.clone())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "Campus pickup".to_string());

        Self {
            id: claim.id,
            listing_id: claim.listing_id,
            title,
            restaurant_name,
            quantity: claim.quantity,
            pickup_location,
            claimed_at_label: format_instant(claim.claimed_at),
            status: claim.status,
            bucket: if claim.status.is_active() {
                ClaimBucket::Active
            } else {
                ClaimBucket::History
            },
        }
    }
}

/// Resolve display names for a user set; lookups for unknown restaurant ids
/// fall back to `Restaurant {id}`.
pub(crate) fn display_names(users: &[UserRecord]) -> BTreeMap<i64, String> {
    users.iter().map(|u| (u.id, u.display_label())).collect()
}

pub(crate) fn restaurant_label(names: &BTreeMap<i64, String>, restaurant_id: i64) -> String {
    names
        .get(&restaurant_id)
        .cloned()
        .unwrap_or_else(|| format!("Restaurant {restaurant_id}"))
}
