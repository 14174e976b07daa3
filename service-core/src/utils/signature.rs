use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header a receiver reads the payload signature from.
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Header a receiver reads the signing timestamp from.
pub const TIMESTAMP_HEADER: &str = "X-Webhook-Timestamp";

/// Generate an HMAC-SHA256 payload signature.
///
/// Format: HMAC-SHA256(timestamp|body_hash, secret), hex encoded.
pub fn generate_signature(secret: &str, timestamp: i64, body: &str) -> Result<String, anyhow::Error> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("Invalid key length: {}", e))?;

    let body_hash = hex::encode(Sha256::digest(body.as_bytes()));
    let payload = format!("{}|{}", timestamp, body_hash);

    mac.update(payload.as_bytes());
    let result = mac.finalize();

    Ok(hex::encode(result.into_bytes()))
}

/// Verify a payload signature using constant-time comparison.
pub fn verify_signature(
    secret: &str,
    timestamp: i64,
    body: &str,
    signature: &str,
) -> Result<bool, anyhow::Error> {
    let expected_signature = generate_signature(secret, timestamp, body)?;

    let expected_bytes = expected_signature.as_bytes();
    let signature_bytes = signature.as_bytes();

    if expected_bytes.len() != signature_bytes.len() {
        return Ok(false);
    }

    Ok(expected_bytes.ct_eq(signature_bytes).into())
}
