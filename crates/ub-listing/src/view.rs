use chrono::{DateTime, Utc};

use crate::{derive_status, ListingSnapshot, ListingStatus};

/// One listing as presented to a UI surface: snapshot fields plus the
/// derived status, resolved restaurant name, display labels, and the claim
/// count attached during reconciliation.
///
/// View models are rebuilt from scratch on every reconciliation pass and
/// never patched field-by-field, so they cannot drift from external truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingViewModel {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub total_quantity: i64,
    /// Remaining stock clamped into `[0, total]` for display; the raw wire
    /// value is not trusted.
    pub remaining_quantity: i64,
    pub remaining_label: String,
    pub per_person_limit: i64,
    pub available_until: Option<DateTime<Utc>>,
    pub available_until_label: String,
    pub pickup_location: String,
    pub claim_count: u32,
    pub status: ListingStatus,
}

impl ListingViewModel {
    /// Build a view model from a snapshot at the instant `now`.
    pub fn build(
        snapshot: &ListingSnapshot,
        restaurant_name: String,
        claim_count: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let remaining = snapshot.clamped_remaining();
        Self {
            id: snapshot.id,
            title: snapshot.title.clone(),
            description: snapshot
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "No description".to_string()),
            restaurant_id: snapshot.restaurant_id,
            restaurant_name,
            total_quantity: snapshot.total_quantity,
            remaining_quantity: remaining,
            remaining_label: format!("{} / {}", remaining, snapshot.total_quantity),
            per_person_limit: snapshot.per_person_limit,
            available_until: snapshot.available_until,
            available_until_label: format_instant(snapshot.available_until),
            pickup_location: snapshot
                .pickup_location
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "Campus pickup".to_string()),
            claim_count,
            status: derive_status(snapshot, now),
        }
    }

    /// Deduplication key component: whitespace-trimmed, lowercased title.
    pub fn dedupe_title(&self) -> String {
        self.title.trim().to_lowercase()
    }
}

/// Human-readable label for an optional instant; `"N/A"` when absent.
pub fn format_instant(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        None => "N/A".to_string(),
    }
}
