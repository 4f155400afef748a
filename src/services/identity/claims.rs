//! Best-effort identity extraction from an unverified JWT payload.
//!
//! NOT an authentication mechanism: the signature segment is never checked, so any
//! caller able to shape a three-segment token can claim any identity. Only use this
//! behind a perimeter that has already authenticated the credential.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Map, Value};

/// Claims searched in the unverified payload, highest priority first.
pub const UNVERIFIED_IDENTITY_CLAIMS: [&str; 3] = ["preferred_username", "email", "sub"];

/// Returns the first identity claim present in the payload, or `None` on any
/// structural or decoding problem.
pub fn extract_unverified_identity(token: &str) -> Option<String> {
    let payload = decode_payload(token)?;
    UNVERIFIED_IDENTITY_CLAIMS
        .iter()
        .find_map(|name| payload.get(*name).and_then(claim_as_string))
}

fn decode_payload(token: &str) -> Option<Map<String, Value>> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_header, payload, _signature] = segments.as_slice() else {
        return None;
    };

    // tolerate padded base64url as well
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;

    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Reads a claim value as an identity string.
///
/// Strings and numbers qualify; blank strings and every other JSON type count as absent.
pub fn claim_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
