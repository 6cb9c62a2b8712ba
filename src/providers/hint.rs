//! Retry hint extraction from failed upstream responses.
//!
//! Throttled APIs communicate wait times in two places: a `Retry-After`
//! header, or a google.rpc RetryInfo entry in the JSON error body
//! (`"retryDelay": "42.6s"`). The header wins when both are present.
//! Extraction never fails — a malformed body is simply "no hint", and the
//! caller falls back to a status-specific default.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde_json::Value;

use crate::MimirError;

static RETRY_DELAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:\.\d+)?s").expect("valid regex"));

/// Ceiling for extracted wait hints, one hour. A hint beyond this feeds
/// the backoff deadline and the client-facing `retryAfterSeconds`, so an
/// upstream sending nonsense must not take either out of range.
const MAX_RETRY_HINT_SECS: u64 = 3_600;

/// Map a non-success upstream status to the matching error, attaching the
/// extracted retry hint. Without a hint, 429 defaults to 60s and 503 to
/// 45s. The raw body travels along as `detail`.
pub fn classify_failure(status: u16, headers: &HeaderMap, body: String) -> MimirError {
    match status {
        429 => MimirError::RateLimited {
            retry_after_secs: extract_retry_after(headers, &body).unwrap_or(60),
            detail: body,
        },
        503 => MimirError::Overloaded {
            retry_after_secs: extract_retry_after(headers, &body).unwrap_or(45),
            detail: body,
        },
        code => MimirError::Api {
            status: code,
            detail: body,
        },
    }
}

/// Extract a wait hint in whole seconds from a failed response's headers
/// and raw body, clamped to [`MAX_RETRY_HINT_SECS`]. Returns `None` when
/// neither source yields one.
pub fn extract_retry_after(headers: &HeaderMap, body: &str) -> Option<u64> {
    header_seconds(headers)
        .or_else(|| retry_info_seconds(body))
        .map(|secs| secs.min(MAX_RETRY_HINT_SECS))
}

fn header_seconds(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Scan `error.details[]` (or top-level `details[]`) for a RetryInfo
/// entry and take the integer-second part of its `retryDelay`.
fn retry_info_seconds(body: &str) -> Option<u64> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let details = parsed
        .get("error")
        .and_then(|e| e.get("details"))
        .or_else(|| parsed.get("details"))?
        .as_array()?;

    details.iter().find_map(|detail| {
        let type_tag = detail.get("@type")?.as_str()?;
        if !type_tag.contains("RetryInfo") {
            return None;
        }
        let delay = detail.get("retryDelay")?.as_str()?;
        let caps = RETRY_DELAY_RE.captures(delay)?;
        caps[1].parse().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers_with_retry_after(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn header_integer_is_used() {
        let headers = headers_with_retry_after("30");
        assert_eq!(extract_retry_after(&headers, ""), Some(30));
    }

    #[test]
    fn header_takes_precedence_over_body() {
        let headers = headers_with_retry_after("30");
        let body = r#"{"error":{"details":[{"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"42.6s"}]}}"#;
        assert_eq!(extract_retry_after(&headers, body), Some(30));
    }

    #[test]
    fn non_integer_header_falls_through_to_body() {
        let headers = headers_with_retry_after("Wed, 21 Oct 2015 07:28:00 GMT");
        let body = r#"{"error":{"details":[{"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"42s"}]}}"#;
        assert_eq!(extract_retry_after(&headers, body), Some(42));
    }

    #[test]
    fn retry_info_fractional_delay_truncates() {
        let body = r#"{"error":{"details":[{"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"42.6s"}]}}"#;
        assert_eq!(extract_retry_after(&HeaderMap::new(), body), Some(42));
    }

    #[test]
    fn retry_info_at_top_level_details() {
        let body = r#"{"details":[{"@type":"google.rpc.RetryInfo","retryDelay":"7s"}]}"#;
        assert_eq!(extract_retry_after(&HeaderMap::new(), body), Some(7));
    }

    #[test]
    fn non_retry_info_details_are_skipped() {
        let body = r#"{"error":{"details":[
            {"@type":"type.googleapis.com/google.rpc.ErrorInfo","reason":"RATE_LIMIT_EXCEEDED"},
            {"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"9s"}
        ]}}"#;
        assert_eq!(extract_retry_after(&HeaderMap::new(), body), Some(9));
    }

    #[test]
    fn malformed_body_yields_no_hint() {
        assert_eq!(extract_retry_after(&HeaderMap::new(), "not json"), None);
        assert_eq!(extract_retry_after(&HeaderMap::new(), ""), None);
        assert_eq!(extract_retry_after(&HeaderMap::new(), r#"{"error":"quota"}"#), None);
    }

    #[test]
    fn retry_info_without_delay_yields_no_hint() {
        let body = r#"{"error":{"details":[{"@type":"google.rpc.RetryInfo"}]}}"#;
        assert_eq!(extract_retry_after(&HeaderMap::new(), body), None);
    }

    #[test]
    fn oversized_header_hint_is_clamped() {
        let headers = headers_with_retry_after("18446744073709551615");
        assert_eq!(
            extract_retry_after(&headers, ""),
            Some(MAX_RETRY_HINT_SECS)
        );
    }

    #[test]
    fn oversized_retry_info_hint_is_clamped() {
        let body = r#"{"error":{"details":[{"@type":"google.rpc.RetryInfo","retryDelay":"99999999s"}]}}"#;
        assert_eq!(
            extract_retry_after(&HeaderMap::new(), body),
            Some(MAX_RETRY_HINT_SECS)
        );
    }

    #[test]
    fn classify_429_without_hint_defaults_to_60() {
        let err = classify_failure(429, &HeaderMap::new(), "quota".to_string());
        match err {
            MimirError::RateLimited {
                retry_after_secs,
                detail,
            } => {
                assert_eq!(retry_after_secs, 60);
                assert_eq!(detail, "quota");
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn classify_503_without_hint_defaults_to_45() {
        let err = classify_failure(503, &HeaderMap::new(), String::new());
        match err {
            MimirError::Overloaded {
                retry_after_secs, ..
            } => assert_eq!(retry_after_secs, 45),
            other => panic!("expected Overloaded, got {other:?}"),
        }
    }

    #[test]
    fn classify_429_uses_extracted_hint() {
        let body = r#"{"error":{"details":[{"@type":"google.rpc.RetryInfo","retryDelay":"12s"}]}}"#;
        let err = classify_failure(429, &HeaderMap::new(), body.to_string());
        assert_eq!(err.retry_after_secs(), Some(12));
    }

    #[test]
    fn classify_other_status_is_api_error() {
        let err = classify_failure(404, &HeaderMap::new(), "missing".to_string());
        match err {
            MimirError::Api { status, detail } => {
                assert_eq!(status, 404);
                assert_eq!(detail, "missing");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }
}
