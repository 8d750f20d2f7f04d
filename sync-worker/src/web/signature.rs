//! Svix webhook signature verification.
//!
//! Clerk delivers webhooks through Svix, which signs requests per the
//! Standard Webhooks scheme:
//! - the signed content is `{msg_id}.{timestamp}.{body}`
//! - signatures are base64-encoded HMAC-SHA256, prefixed with `v1,`
//! - the `svix-signature` header may carry several space-separated
//!   signatures (old and new secrets during rotation)
//! - secrets are base64-encoded and prefixed with `whsec_`
//!
//! Reference: https://www.standardwebhooks.com/

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Prefix for webhook signing secrets.
pub const SECRET_PREFIX: &str = "whsec_";

/// Extract the raw key bytes from a `whsec_` prefixed secret.
///
/// Returns `None` if the prefix is missing or the remainder is not
/// valid base64.
pub fn decode_secret(secret: &str) -> Option<Vec<u8>> {
    let encoded = secret.strip_prefix(SECRET_PREFIX)?;
    BASE64_STANDARD.decode(encoded).ok()
}

/// Verify a Svix webhook signature.
///
/// # Arguments
///
/// * `secret` - The `whsec_` prefixed signing secret
/// * `msg_id` - The `svix-id` header value
/// * `timestamp` - The `svix-timestamp` header value (Unix epoch seconds)
/// * `signature_header` - The `svix-signature` header value
/// * `payload` - The exact raw request body bytes
/// * `max_age_seconds` - Maximum allowed skew of the timestamp in either
///   direction (prevents replay attacks)
///
/// # Returns
///
/// `true` if the timestamp is within tolerance and any `v1` signature in
/// the header matches, `false` otherwise.
pub fn verify_webhook_signature(
    secret: &str,
    msg_id: &str,
    timestamp: &str,
    signature_header: &str,
    payload: &[u8],
    max_age_seconds: u64,
) -> bool {
    // Check for empty inputs
    if msg_id.is_empty() || timestamp.is_empty() || signature_header.is_empty() {
        warn!(
            has_msg_id = !msg_id.is_empty(),
            has_timestamp = !timestamp.is_empty(),
            has_signature = !signature_header.is_empty(),
            "webhook_signature_missing_fields"
        );
        return false;
    }

    let key = match decode_secret(secret) {
        Some(k) => k,
        None => {
            warn!("webhook_signature_invalid_secret");
            return false;
        }
    };

    // Verify timestamp is not stale (prevents replay attacks)
    let webhook_time: u64 = match timestamp.parse() {
        Ok(t) => t,
        Err(_) => {
            warn!(timestamp = %timestamp, "webhook_signature_invalid_timestamp");
            return false;
        }
    };

    let current_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let age = if current_time > webhook_time {
        current_time - webhook_time
    } else {
        webhook_time - current_time
    };

    if age > max_age_seconds {
        warn!(
            webhook_time = webhook_time,
            current_time = current_time,
            age_seconds = age,
            max_age_seconds = max_age_seconds,
            "webhook_signature_stale"
        );
        return false;
    }

    // Compute expected signature: HMAC-SHA256 over `{msg_id}.{timestamp}.{payload}`
    let mut mac = match HmacSha256::new_from_slice(&key) {
        Ok(m) => m,
        Err(_) => {
            warn!("webhook_signature_invalid_key");
            return false;
        }
    };

    mac.update(msg_id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    let expected = BASE64_STANDARD.encode(mac.finalize().into_bytes());

    // The header may list several versioned signatures; any v1 match wins.
    // Constant-time comparison to prevent timing attacks.
    let valid = signature_header
        .split_whitespace()
        .filter_map(|entry| entry.split_once(','))
        .filter(|(version, _)| *version == "v1")
        .any(|(_, candidate)| constant_time_compare(&expected, candidate));

    if !valid {
        warn!(
            msg_id = %msg_id,
            expected_length = expected.len(),
            "webhook_signature_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
