//! Stripe webhook signature verification.
//!
//! The provider signs `"{timestamp}.{raw body}"` with HMAC-SHA256 and sends
//! `Stripe-Signature: t=<unix>,v1=<hex>[,v1=<hex>...]`.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::WebhookError;

/// Maximum allowed age for a signature (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for signatures from the future (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

type HmacSha256 = Hmac<Sha256>;

/// Parsed `Stripe-Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    /// Every `v1` entry; more than one appears while a secret is rolled.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses `t=<timestamp>,v1=<signature>`, ignoring unknown schemes.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .trim()
                .split_once('=')
                .ok_or_else(|| WebhookError::ParseError("invalid header format".to_string()))?;

            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        WebhookError::ParseError("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signatures.push(hex::decode(value).map_err(|_| {
                        WebhookError::ParseError("invalid v1 signature hex".to_string())
                    })?);
                }
                _ => {}
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| WebhookError::ParseError("missing timestamp".to_string()))?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::ParseError("missing v1 signature".to_string()));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

/// Checks webhook signatures against one signing secret.
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verifies `header` for `payload` against the current clock.
    pub fn verify(&self, payload: &[u8], header: &str) -> Result<(), WebhookError> {
        self.verify_at(payload, header, chrono::Utc::now().timestamp())
    }

    /// Verifies `header` for `payload` as of `now` (Unix seconds).
    pub fn verify_at(&self, payload: &[u8], header: &str, now: i64) -> Result<(), WebhookError> {
        let header = SignatureHeader::parse(header)?;

        let age = now - header.timestamp;
        if age > MAX_EVENT_AGE_SECS {
            return Err(WebhookError::TimestampOutOfRange);
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::InvalidTimestamp);
        }

        let expected = compute_signature(&self.secret, header.timestamp, payload)?;
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate));
        if matched {
            Ok(())
        } else {
            Err(WebhookError::InvalidSignature)
        }
    }
}

/// Builds a `Stripe-Signature` header value for `payload`.
///
/// Used to sign fixtures and local test deliveries.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, WebhookError> {
    let signature = compute_signature(secret, timestamp, payload)?;
    Ok(format!("t={},v1={}", timestamp, hex::encode(signature)))
}

fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| WebhookError::Internal(format!("HMAC key rejected: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret_12345";
    const NOW: i64 = 1_704_067_200;
    const PAYLOAD: &[u8] = br#"{"id":"evt_1","type":"invoice.payment_succeeded"}"#;

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(SECRET)
    }

    // ══════════════════════════════════════════════════════════════
    // Header parsing
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_header_with_single_v1() {
        let header = SignatureHeader::parse(&format!("t=1234567890,v1={}", "a".repeat(64))).unwrap();
        assert_eq!(header.timestamp, 1234567890);
        assert_eq!(header.v1_signatures.len(), 1);
        assert_eq!(header.v1_signatures[0].len(), 32);
    }

    #[test]
    fn parse_header_collects_every_v1() {
        let raw = format!("t=1,v1={},v1={},v0={}", "a".repeat(64), "b".repeat(64), "c".repeat(64));
        let header = SignatureHeader::parse(&raw).unwrap();
        assert_eq!(header.v1_signatures.len(), 2);
    }

    #[test]
    fn parse_header_missing_timestamp_fails() {
        let result = SignatureHeader::parse(&format!("v1={}", "a".repeat(64)));
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn parse_header_missing_v1_fails() {
        assert!(matches!(
            SignatureHeader::parse("t=1234567890"),
            Err(WebhookError::ParseError(_))
        ));
    }

    #[test]
    fn parse_header_rejects_bad_hex() {
        assert!(SignatureHeader::parse("t=1,v1=zz").is_err());
    }

    #[test]
    fn parse_header_rejects_garbage() {
        assert!(SignatureHeader::parse("present").is_err());
    }

    // ══════════════════════════════════════════════════════════════
    // Verification
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_accepts_valid_signature() {
        let header = sign_payload(SECRET, NOW, PAYLOAD).unwrap();
        assert_eq!(verifier().verify_at(PAYLOAD, &header, NOW + 10), Ok(()));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let header = sign_payload("whsec_other", NOW, PAYLOAD).unwrap();
        assert_eq!(
            verifier().verify_at(PAYLOAD, &header, NOW),
            Err(WebhookError::InvalidSignature)
        );
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let header = sign_payload(SECRET, NOW, PAYLOAD).unwrap();
        assert_eq!(
            verifier().verify_at(b"{\"id\":\"evt_2\"}", &header, NOW),
            Err(WebhookError::InvalidSignature)
        );
    }

    #[test]
    fn verify_rejects_stale_signature() {
        let header = sign_payload(SECRET, NOW, PAYLOAD).unwrap();
        assert_eq!(
            verifier().verify_at(PAYLOAD, &header, NOW + MAX_EVENT_AGE_SECS + 1),
            Err(WebhookError::TimestampOutOfRange)
        );
    }

    #[test]
    fn verify_allows_small_clock_skew() {
        let header = sign_payload(SECRET, NOW + 30, PAYLOAD).unwrap();
        assert!(verifier().verify_at(PAYLOAD, &header, NOW).is_ok());
    }

    #[test]
    fn verify_rejects_future_signature() {
        let header = sign_payload(SECRET, NOW + 120, PAYLOAD).unwrap();
        assert_eq!(
            verifier().verify_at(PAYLOAD, &header, NOW),
            Err(WebhookError::InvalidTimestamp)
        );
    }

    #[test]
    fn verify_accepts_when_any_v1_matches() {
        let good = sign_payload(SECRET, NOW, PAYLOAD).unwrap();
        let good_sig = good.split_once(",v1=").unwrap().1;
        let header = format!("t={},v1={},v1={}", NOW, "0".repeat(64), good_sig);
        assert!(verifier().verify_at(PAYLOAD, &header, NOW).is_ok());
    }
}
