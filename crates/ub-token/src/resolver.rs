use once_cell::sync::Lazy;
use regex::Regex;

use ub_listing::ClaimRecord;

use crate::normalize_token;

/// Legacy printed-QR convention: a display string ending in
/// `pickup-<claimId>` (e.g. `UniBite-Pickup-12345`).
static LEGACY_PICKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)pickup-(\d+)$").unwrap());

/// Resolve scanned/typed input to the token handed to the external
/// redemption call.
///
/// - Empty normalization result: returns empty; the caller must not attempt
///   redemption.
/// - Legacy `pickup-<claimId>` suffix: the claim id is looked up in
///   `known_claims` and, on a hit with a non-empty token, the claim's real
///   token is returned instead.
/// - Anything else (including a lookup miss or an id that does not parse):
///   the normalized value passes through verbatim. The external system
///   rejects unknown tokens; this resolver never invents one.
pub fn resolve_redemption(raw: &str, known_claims: &[ClaimRecord]) -> String {
    let normalized = normalize_token(raw);
    if normalized.is_empty() {
        return normalized;
    }

    if let Some(caps) = LEGACY_PICKUP.captures(&normalized) {
        if let Ok(claim_id) = caps[1].parse::<i64>() {
            let hit = known_claims.iter().find(|claim| claim.id == claim_id);
            if let Some(claim) = hit {
                if !claim.qr_token.is_empty() {
                    return claim.qr_token.clone();
                }
            }
        }
    }

    normalized
}
