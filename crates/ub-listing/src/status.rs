use chrono::{DateTime, Utc};

use crate::{ListingSnapshot, ListingStatus};

/// Derive a listing's availability status at the instant `now`.
///
/// Rules, in order:
/// - `Expired` when the deadline (if any) is in the past OR no stock remains.
///   Both conditions are equally terminal; a listing without a deadline never
///   expires by time.
/// - `LowStock` when remaining stock is at or below a quarter of the batch,
///   with a floor of one item so tiny batches still report low stock.
/// - `Available` otherwise.
///
/// `now` is passed in explicitly so one reconciliation pass evaluates every
/// listing against the same instant.
pub fn derive_status(listing: &ListingSnapshot, now: DateTime<Utc>) -> ListingStatus {
    let expired_by_time = listing.available_until.is_some_and(|until| until < now);

    if expired_by_time || listing.remaining_quantity <= 0 {
        return ListingStatus::Expired;
    }

    let low_stock_threshold = (listing.total_quantity / 4).max(1);
    if listing.remaining_quantity <= low_stock_threshold {
        return ListingStatus::LowStock;
    }

    ListingStatus::Available
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn snapshot(total: i64, remaining: i64, until: Option<DateTime<Utc>>) -> ListingSnapshot {
        ListingSnapshot {
            id: 1,
            title: "Pasta trays".to_string(),
            description: None,
            restaurant_id: 9,
            total_quantity: total,
            remaining_quantity: remaining,
            per_person_limit: 2,
            available_until: until,
            pickup_location: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap()
    }

    #[test]
    fn expired_when_deadline_passed() {
        let snap = snapshot(20, 10, Some(now() - Duration::minutes(1)));
        assert_eq!(derive_status(&snap, now()), ListingStatus::Expired);
    }

    #[test]
    fn expired_when_no_stock_even_with_future_deadline() {
        let snap = snapshot(20, 0, Some(now() + Duration::hours(2)));
        assert_eq!(derive_status(&snap, now()), ListingStatus::Expired);
    }

    #[test]
    fn expired_when_remaining_negative() {
        let snap = snapshot(20, -5, None);
        assert_eq!(derive_status(&snap, now()), ListingStatus::Expired);
    }

    #[test]
    fn no_deadline_never_expires_by_time() {
        let snap = snapshot(20, 10, None);
        assert_eq!(derive_status(&snap, now()), ListingStatus::Available);
    }

    #[test]
    fn low_stock_at_quarter_of_batch() {
        // floor(20 / 4) = 5; 4 <= 5 -> Low Stock
        let snap = snapshot(20, 4, Some(now() + Duration::hours(2)));
        assert_eq!(derive_status(&snap, now()), ListingStatus::LowStock);
    }

    #[test]
    fn low_stock_boundary_is_inclusive() {
        let snap = snapshot(20, 5, None);
        assert_eq!(derive_status(&snap, now()), ListingStatus::LowStock);
    }

    #[test]
    fn available_just_above_threshold() {
        let snap = snapshot(20, 6, Some(now() + Duration::hours(2)));
        assert_eq!(derive_status(&snap, now()), ListingStatus::Available);
    }

    #[test]
    fn threshold_floor_is_one_for_tiny_batches() {
        // floor(3 / 4) = 0, but the floor of 1 keeps a single remaining
        // item reported as low stock.
        let snap = snapshot(3, 1, None);
        assert_eq!(derive_status(&snap, now()), ListingStatus::LowStock);
        let snap = snapshot(3, 2, None);
        assert_eq!(derive_status(&snap, now()), ListingStatus::Available);
    }

    #[test]
    fn deadline_exactly_now_is_not_expired() {
        // Strictly-less-than comparison: a deadline equal to `now` still counts.
        let snap = snapshot(20, 10, Some(now()));
        assert_eq!(derive_status(&snap, now()), ListingStatus::Available);
    }
}
