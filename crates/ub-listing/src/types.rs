use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A restaurant-posted batch of surplus food, exactly as fetched from the
/// external system. Read-only on this side.
///
/// The external system promises `0 <= remaining_quantity <= total_quantity`,
/// but violations are tolerated here: downstream logic reads remaining via
/// [`ListingSnapshot::clamped_remaining`] rather than trusting the raw field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSnapshot {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub restaurant_id: i64,
    pub total_quantity: i64,
    pub remaining_quantity: i64,
    pub per_person_limit: i64,
    #[serde(default)]
    pub available_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pickup_location: Option<String>,
}

impl ListingSnapshot {
    /// Remaining quantity clamped into `[0, max(total, 0)]`.
    pub fn clamped_remaining(&self) -> i64 {
        self.remaining_quantity.clamp(0, self.total_quantity.max(0))
    }
}

/// Derived availability label for one listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    Available,
    LowStock,
    Expired,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Available => "Available",
            ListingStatus::LowStock => "Low Stock",
            ListingStatus::Expired => "Expired",
        }
    }
}

/// Lifecycle state of a claim. `Redeemed` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    #[serde(rename = "CLAIMED")]
    Claimed,
    #[serde(rename = "REDEEMED")]
    Redeemed,
    #[serde(rename = "CANCELED")]
    Canceled,
}

impl ClaimStatus {
    /// Active claims are the only ones that can still be redeemed or canceled.
    pub fn is_active(&self) -> bool {
        matches!(self, ClaimStatus::Claimed)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Claimed => "CLAIMED",
            ClaimStatus::Redeemed => "REDEEMED",
            ClaimStatus::Canceled => "CANCELED",
        }
    }
}

/// A student's reservation against a listing, as fetched from the external
/// system. This side only reads and indexes claim records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    pub id: i64,
    pub listing_id: i64,
    pub student_id: i64,
    pub quantity: i64,
    pub status: ClaimStatus,
    /// Opaque redemption credential assigned at claim creation, unique,
    /// consumed exactly once at pickup.
    pub qr_token: String,
    #[serde(default)]
    pub claimed_at: Option<DateTime<Utc>>,
    /// Present only once the claim has been redeemed.
    #[serde(default)]
    pub redeemed_at: Option<DateTime<Utc>>,
}
