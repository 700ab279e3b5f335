//! ub-listing
//!
//! Listing data model and the pure decision logic shared by every surface
//! that shows or claims surplus-food listings:
//! - status derivation (Available / Low Stock / Expired)
//! - quantity clamping against the per-person limit and remaining stock
//! - near-duplicate listing collapse per (restaurant, title)
//!
//! Deterministic, pure logic. No IO. No clock reads: callers pass the
//! evaluation instant in so one reconciliation pass uses one `now`.

mod dedupe;
mod quantity;
mod status;
mod types;
mod view;

pub use dedupe::dedupe_listings;
pub use quantity::clamp_quantity;
pub use status::derive_status;
pub use types::*;
pub use view::{format_instant, ListingViewModel};
