use chrono::{DateTime, Duration, TimeZone, Utc};

use ub_api_mem::MemApi;
use ub_listing::{ListingSnapshot, ListingStatus};
use ub_reconcile::Reconciler;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap()
}

fn listing(id: i64, remaining: i64, until: Option<DateTime<Utc>>) -> ListingSnapshot {
    ListingSnapshot {
        id,
        title: format!("Listing {id}"),
        description: None,
        restaurant_id: 9,
        total_quantity: 20,
        remaining_quantity: remaining,
        per_person_limit: 3,
        available_until: until,
        pickup_location: None,
    }
}

#[tokio::test]
async fn scenario_oversized_request_is_clamped_before_the_claim_call() {
    let api = MemApi::new();
    api.insert_listing(listing(1, 2, None));

    let reconciler = Reconciler::new(api);
    let view = reconciler.load_browse(now()).await.unwrap();
    let target = &view.listings[0];

    // Requested 99; per-person limit 3, remaining 2 -> clamped to 2, which
    // the backend accepts.
    let claim = reconciler.claim(target, 42, 99).await.unwrap();
    assert_eq!(claim.quantity, 2);
    assert_eq!(reconciler.api().listing(1).unwrap().remaining_quantity, 0);
}

#[tokio::test]
async fn scenario_zero_request_is_raised_to_one() {
    let api = MemApi::new();
    api.insert_listing(listing(1, 5, None));

    let reconciler = Reconciler::new(api);
    let view = reconciler.load_browse(now()).await.unwrap();

    let claim = reconciler.claim(&view.listings[0], 42, 0).await.unwrap();
    assert_eq!(claim.quantity, 1);
}

#[tokio::test]
async fn scenario_expired_listing_is_refused_before_any_call() {
    let api = MemApi::new();
    api.insert_listing(listing(1, 5, Some(now() - Duration::hours(1))));

    let reconciler = Reconciler::new(api);
    let view = reconciler.load_browse(now()).await.unwrap();
    let target = &view.listings[0];
    assert_eq!(target.status, ListingStatus::Expired);

    let err = reconciler.claim(target, 42, 1).await.unwrap_err();
    assert!(err.to_string().contains("cannot be claimed"));

    // Stock untouched: the external call was never made.
    assert_eq!(reconciler.api().listing(1).unwrap().remaining_quantity, 5);
}

#[tokio::test]
async fn scenario_cancel_restores_stock_on_next_pass() {
    let api = MemApi::new();
    api.insert_listing(listing(1, 5, None));

    let reconciler = Reconciler::new(api);
    let view = reconciler.load_browse(now()).await.unwrap();
    let claim = reconciler.claim(&view.listings[0], 42, 2).await.unwrap();

    // Fresh pass reflects the decrement.
    let view = reconciler.load_browse(now()).await.unwrap();
    assert_eq!(view.listings[0].remaining_quantity, 3);

    reconciler.cancel(claim.id).await.unwrap();

    let view = reconciler.load_browse(now()).await.unwrap();
    assert_eq!(view.listings[0].remaining_quantity, 5);
}

#[tokio::test]
async fn scenario_student_claims_bucket_by_status() {
    let api = MemApi::new();
    api.insert_listing(listing(1, 5, None));

    let reconciler = Reconciler::new(api);
    let view = reconciler.load_browse(now()).await.unwrap();

    let kept = reconciler.claim(&view.listings[0], 42, 1).await.unwrap();
    let dropped = reconciler.claim(&view.listings[0], 42, 1).await.unwrap();
    reconciler.cancel(dropped.id).await.unwrap();

    let claims = reconciler.load_student_claims(42).await.unwrap();
    assert_eq!(claims.len(), 2);

    let active = claims
        .iter()
        .find(|c| c.id == kept.id)
        .unwrap();
    assert_eq!(active.bucket, ub_reconcile::ClaimBucket::Active);
    assert_eq!(active.title, "Listing 1");

    let history = claims.iter().find(|c| c.id == dropped.id).unwrap();
    assert_eq!(history.bucket, ub_reconcile::ClaimBucket::History);
}
