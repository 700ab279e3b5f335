//! ub-reconcile
//!
//! Reconciliation facade: one full fetch-and-recompute cycle per call.
//!
//! Architectural decisions:
//! - Every pass builds fresh view models from external data; nothing is
//!   patched incrementally, so local state can never drift from the backend.
//! - Per-listing claims fetches run concurrently and are joined before
//!   aggregation; one failed fetch degrades that listing to "zero claims
//!   known" and never fails the pass.
//! - State-changing actions (claim, cancel, redeem) are followed by a full
//!   reload; callers trust only the most recent pass's output.
//! - No retries and no timeouts here; transport policy is external.

mod facade;
mod views;

pub use facade::{RedeemOutcome, Reconciler};
pub use views::{
    BrowseView, ClaimBucket, ClaimViewModel, DashboardSummary, DashboardView,
};
