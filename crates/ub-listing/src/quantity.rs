/// Clamp a requested claim quantity against the per-person limit and the
/// listing's remaining stock.
///
/// `max(1, min(requested, per_person_limit, remaining))` — the result is
/// always at least 1 and, whenever both bounds are >= 1, at most
/// `min(per_person_limit, remaining)`. Out-of-range input is clamped
/// silently rather than rejected (deliberate leniency).
///
/// The guard does NOT refuse claims on exhausted listings: with
/// `remaining = 0` it still returns 1. Refusing an expired/exhausted
/// listing is the caller's check, made before the external claim call.
pub fn clamp_quantity(requested: i64, per_person_limit: i64, remaining: i64) -> i64 {
    requested.min(per_person_limit).min(remaining).max(1)
}
