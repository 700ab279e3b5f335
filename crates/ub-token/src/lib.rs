//! ub-token
//!
//! Redemption-token extraction for heterogeneous scanned/typed input.
//!
//! Two tiers:
//! - [`normalize_token`]: free-form string -> canonical token candidate via
//!   an ordered fallback chain (URL query param, labeled pattern, UUID
//!   substring, trimmed raw). Never fails.
//! - [`resolve_redemption`]: maps legacy `...pickup-<claimId>` display
//!   strings to the claim's real opaque token via an in-memory claim
//!   lookup. Never fabricates a token; unresolved values pass through
//!   verbatim and the external system stays the authority on validity.
//!
//! Deterministic, pure logic. No IO.

mod normalizer;
mod resolver;

pub use normalizer::normalize_token;
pub use resolver::resolve_redemption;
