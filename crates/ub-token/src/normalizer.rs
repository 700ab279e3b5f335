use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// `qrToken: abc-123`, `token=abc`, etc. The captured run is limited to
/// alphanumerics and hyphens, matching the shape of issued tokens.
static LABELED_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:qrToken|token)\s*[:=]\s*([A-Za-z0-9-]+)").unwrap());

/// RFC-4122-shaped UUID: 8-4-4-4-12 hex groups, version nibble 1-5,
/// variant nibble 8/9/a/b.
static UUID_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}\b")
        .unwrap()
});

/// Normalize scanned or typed input into a canonical token candidate.
///
/// Ordered fallback chain; the first step that produces a value wins,
/// regardless of what later patterns might also match:
///
/// 1. Trim; empty input yields an empty string.
/// 2. Well-formed URL: query param `qrToken`, falling back to `token`.
/// 3. Labeled pattern `qrToken:`/`token=` followed by an alphanumeric run.
/// 4. UUID-shaped substring, returned verbatim.
/// 5. The trimmed raw input.
///
/// Never fails; worst case is the trimmed input unchanged.
pub fn normalize_token(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    if let Ok(parsed) = Url::parse(raw) {
        let from_query =
            query_param(&parsed, "qrToken").or_else(|| query_param(&parsed, "token"));
        if let Some(value) = from_query {
            let value = value.trim();
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }

    if let Some(caps) = LABELED_TOKEN.captures(raw) {
        return caps[1].to_string();
    }

    if let Some(found) = UUID_SHAPE.find(raw) {
        return found.as_str().to_string();
    }

    raw.to_string()
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
