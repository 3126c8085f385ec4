//! Webhook signature verification.

use std::time::Duration;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::error::{ConfettiError, ConfettiResult};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded HMAC-SHA256 of the raw body.
pub const SIGNATURE_HEADER: &str = "linear-signature";

/// Default allowed drift between `webhookTimestamp` and server time.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(60);

/// Authenticates inbound webhook calls.
pub trait SignatureVerifier: Send + Sync {
    /// Check `signature` against the raw request body.
    fn verify(&self, body: &[u8], signature: &str) -> ConfettiResult<()>;

    /// Reject replayed deliveries. Accepts everything unless overridden.
    fn verify_timestamp(&self, _webhook_timestamp_ms: i64) -> ConfettiResult<()> {
        Ok(())
    }
}

/// Verifier for Linear's `linear-signature` scheme.
#[derive(Clone)]
pub struct LinearSignatureVerifier {
    key: HmacSha256,
    tolerance: Duration,
}

impl std::fmt::Debug for LinearSignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearSignatureVerifier")
            .field("key", &"***")
            .field("tolerance", &self.tolerance)
            .finish()
    }
}

impl LinearSignatureVerifier {
    /// Creates a verifier for the shared webhook secret.
    ///
    /// # Errors
    ///
    /// Returns `ConfettiError::Config` if the secret is empty.
    pub fn new(secret: impl Into<String>) -> ConfettiResult<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfettiError::config("webhook secret must not be empty"));
        }
        let key = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| ConfettiError::config(format!("invalid webhook secret: {e}")))?;
        Ok(Self {
            key,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Hex-encoded signature for `body`, as the provider would send it.
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = self.key.clone();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Freshness check against an explicit clock.
    pub fn verify_timestamp_at(&self, webhook_timestamp_ms: i64, now_ms: i64) -> ConfettiResult<()> {
        let age_ms = now_ms.abs_diff(webhook_timestamp_ms);
        let tolerance_ms = u64::try_from(self.tolerance.as_millis()).unwrap_or(u64::MAX);
        if age_ms > tolerance_ms {
            return Err(ConfettiError::StaleTimestamp {
                age_ms,
                tolerance_ms,
            });
        }
        Ok(())
    }
}

impl SignatureVerifier for LinearSignatureVerifier {
    fn verify(&self, body: &[u8], signature: &str) -> ConfettiResult<()> {
        let expected = hex::decode(signature.trim()).map_err(|e| {
            debug!(error = %e, "Webhook signature is not valid hex");
            ConfettiError::InvalidSignature
        })?;

        let mut mac = self.key.clone();
        mac.update(body);
        mac.verify_slice(&expected)
            .map_err(|_| ConfettiError::InvalidSignature)
    }

    fn verify_timestamp(&self, webhook_timestamp_ms: i64) -> ConfettiResult<()> {
        self.verify_timestamp_at(webhook_timestamp_ms, chrono::Utc::now().timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let verifier = LinearSignatureVerifier::new("s3cret").unwrap();
        let body = br#"{"action":"update"}"#;
        let signature = verifier.sign(body);
        assert_eq!(signature.len(), 64);
        assert!(verifier.verify(body, &signature).is_ok());
    }

    #[test]
    fn test_tampered_body_rejected() {
        let verifier = LinearSignatureVerifier::new("s3cret").unwrap();
        let signature = verifier.sign(b"original");
        assert!(matches!(
            verifier.verify(b"tampered", &signature),
            Err(ConfettiError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = LinearSignatureVerifier::new("one").unwrap();
        let verifier = LinearSignatureVerifier::new("two").unwrap();
        let signature = signer.sign(b"body");
        assert!(verifier.verify(b"body", &signature).is_err());
    }

    #[test]
    fn test_non_hex_signature_rejected() {
        let verifier = LinearSignatureVerifier::new("s3cret").unwrap();
        assert!(matches!(
            verifier.verify(b"body", "zz-not-hex"),
            Err(ConfettiError::InvalidSignature)
        ));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            LinearSignatureVerifier::new("  "),
            Err(ConfettiError::Config(_))
        ));
    }

    #[test]
    fn test_timestamp_tolerance() {
        let verifier = LinearSignatureVerifier::new("s3cret").unwrap();
        let now = 1_700_000_000_000;
        assert!(verifier.verify_timestamp_at(now - 59_000, now).is_ok());
        assert!(verifier.verify_timestamp_at(now + 59_000, now).is_ok());

        let err = verifier.verify_timestamp_at(now - 61_000, now).unwrap_err();
        assert!(err.is_authentication());
        assert!(matches!(
            err,
            ConfettiError::StaleTimestamp { age_ms: 61_000, tolerance_ms: 60_000 }
        ));
    }

    #[test]
    fn test_extreme_timestamps_are_stale() {
        let verifier = LinearSignatureVerifier::new("s3cret").unwrap();
        let now = 1_700_000_000_000;
        for timestamp in [i64::MIN, i64::MIN + now, i64::MAX] {
            assert!(
                matches!(
                    verifier.verify_timestamp_at(timestamp, now),
                    Err(ConfettiError::StaleTimestamp { .. })
                ),
                "{timestamp}"
            );
        }
        assert!(matches!(
            verifier.verify_timestamp_at(now, i64::MIN),
            Err(ConfettiError::StaleTimestamp { .. })
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let verifier = LinearSignatureVerifier::new("s3cret").unwrap();
        assert!(!format!("{verifier:?}").contains("s3cret"));
    }
}
