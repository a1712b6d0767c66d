//! Webhook signature verification
//!
//! Header format: `t=<unix-seconds>,v0=<hex hmac-sha256>`. The HMAC is
//! computed over the literal string `"<t>.<raw body>"` with the shared
//! secret. Verification runs against the exact bytes received; the payload
//! must not be re-serialized first.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::SignatureError;

type HmacSha256 = Hmac<Sha256>;

/// Replay tolerance window (30 minutes)
pub const SIGNATURE_TOLERANCE_SECS: i64 = 30 * 60;

/// Parsed `t=...,v0=...` signature header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Timestamp exactly as it appeared in the header; the HMAC input
    /// uses this literal string, not a re-rendered number
    pub timestamp_raw: String,
    /// Parsed unix-seconds timestamp
    pub timestamp: i64,
    /// Hex-encoded HMAC-SHA256 from the `v0` entry
    pub signature: String,
}

impl SignatureHeader {
    /// Parse a comma-separated `key=value` header
    pub fn parse(header: &str) -> Result<Self, SignatureError> {
        let mut timestamp_raw = None;
        let mut signature = None;

        for entry in header.split(',') {
            match entry.trim().split_once('=') {
                Some(("t", value)) => timestamp_raw = Some(value.to_string()),
                Some(("v0", value)) => signature = Some(value.to_string()),
                // Unknown keys are ignored for forward compatibility
                Some(_) => {}
                None => {
                    return Err(SignatureError::Malformed(format!(
                        "entry without '=': {entry}"
                    )));
                }
            }
        }

        let timestamp_raw =
            timestamp_raw.ok_or_else(|| SignatureError::Malformed("missing t entry".to_string()))?;
        let signature =
            signature.ok_or_else(|| SignatureError::Malformed("missing v0 entry".to_string()))?;
        let timestamp = timestamp_raw
            .parse()
            .map_err(|_| SignatureError::Malformed("t is not unix seconds".to_string()))?;

        Ok(Self {
            timestamp_raw,
            timestamp,
            signature,
        })
    }
}

/// Verify freshness and authenticity of a signed webhook request
pub fn verify_signature(
    raw_body: &[u8],
    header: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<(), SignatureError> {
    let parsed = SignatureHeader::parse(header)?;

    let age_secs = now.timestamp() - parsed.timestamp;
    if age_secs > SIGNATURE_TOLERANCE_SECS {
        return Err(SignatureError::Expired {
            age_secs,
            tolerance_secs: SIGNATURE_TOLERANCE_SECS,
        });
    }

    let presented =
        hex::decode(&parsed.signature).map_err(|_| SignatureError::Mismatch)?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::Malformed("invalid secret".to_string()))?;
    mac.update(parsed.timestamp_raw.as_bytes());
    mac.update(b".");
    mac.update(raw_body);

    mac.verify_slice(&presented)
        .map_err(|_| SignatureError::Mismatch)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;

    /// Produce a valid header for the given body, secret, and timestamp
    pub(crate) fn sign(body: &[u8], secret: &str, timestamp: i64) -> String {
        let t = timestamp.to_string();
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(t.as_bytes());
        mac.update(b".");
        mac.update(body);
        format!("t={t},v0={}", hex::encode(mac.finalize().into_bytes()))
    }

    const SECRET: &str = "whsec_abc123";
    const BODY: &[u8] = br#"{"data":{"conversation_id":"c1","status":"done"}}"#;

    #[test]
    fn correctly_signed_request_verifies() {
        let now = Utc::now();
        let header = sign(BODY, SECRET, now.timestamp());
        assert!(verify_signature(BODY, &header, SECRET, now).is_ok());
    }

    #[test]
    fn mutating_one_body_byte_fails_verification() {
        let now = Utc::now();
        let header = sign(BODY, SECRET, now.timestamp());

        let mut tampered = BODY.to_vec();
        tampered[10] ^= 0x01;
        assert_eq!(
            verify_signature(&tampered, &header, SECRET, now),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn mutating_the_header_signature_fails_verification() {
        let now = Utc::now();
        let header = sign(BODY, SECRET, now.timestamp());

        // Flip the last hex digit
        let mut chars: Vec<char> = header.chars().collect();
        let last = chars.last_mut().unwrap();
        *last = if *last == '0' { '1' } else { '0' };
        let tampered: String = chars.into_iter().collect();

        assert_eq!(
            verify_signature(BODY, &tampered, SECRET, now),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let now = Utc::now();
        let header = sign(BODY, "other-secret", now.timestamp());
        assert_eq!(
            verify_signature(BODY, &header, SECRET, now),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn twenty_nine_minutes_old_is_accepted() {
        let now = Utc::now();
        let signed_at = now - Duration::minutes(29);
        let header = sign(BODY, SECRET, signed_at.timestamp());
        assert!(verify_signature(BODY, &header, SECRET, now).is_ok());
    }

    #[test]
    fn thirty_one_minutes_old_is_rejected() {
        let now = Utc::now();
        let signed_at = now - Duration::minutes(31);
        let header = sign(BODY, SECRET, signed_at.timestamp());
        assert!(matches!(
            verify_signature(BODY, &header, SECRET, now),
            Err(SignatureError::Expired { .. })
        ));
    }

    #[test]
    fn missing_entries_are_malformed() {
        let now = Utc::now();
        assert!(matches!(
            verify_signature(BODY, "t=123", SECRET, now),
            Err(SignatureError::Malformed(_))
        ));
        assert!(matches!(
            verify_signature(BODY, "v0=abcd", SECRET, now),
            Err(SignatureError::Malformed(_))
        ));
        assert!(matches!(
            verify_signature(BODY, "t=notanumber,v0=abcd", SECRET, now),
            Err(SignatureError::Malformed(_))
        ));
    }

    #[test]
    fn non_hex_signature_is_a_mismatch() {
        let now = Utc::now();
        let header = format!("t={},v0=zzzz", now.timestamp());
        assert_eq!(
            verify_signature(BODY, &header, SECRET, now),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn unknown_header_entries_are_ignored() {
        let now = Utc::now();
        let header = format!("{},v1=ignored", sign(BODY, SECRET, now.timestamp()));
        assert!(verify_signature(BODY, &header, SECRET, now).is_ok());
    }
}
