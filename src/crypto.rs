use hmac::{Hmac, Mac};

use sha2::Sha256;

use secrecy::Secret;

use crate::error::{Error, Result};

/// Header carrying the hex encoded HMAC-SHA256 of the raw webhook body
pub const SIGNATURE_HEADER: &str = "ck-signature";

#[derive(Clone)]
pub struct WebhookSigningKey(Hmac<Sha256>);

impl WebhookSigningKey {
    pub fn new(key: &Secret<String>) -> anyhow::Result<Self> {
        use secrecy::ExposeSecret;

        let hmac = Hmac::new_from_slice(key.expose_secret().as_bytes())?;

        Ok(Self(hmac))
    }

    /// Hex encoded signature for a payload
    pub fn sign(&self, payload: &[u8]) -> String {
        let mut mac = self.0.clone();
        mac.update(payload);

        hex::encode(mac.finalize().into_bytes())
    }

    /// Check a hex encoded signature against a payload in constant time
    pub fn verify(&self, payload: &[u8], signature: &str) -> Result<()> {
        let signature = hex::decode(signature.trim())
            .map_err(|_| Error::InvalidSignature("Signature is not valid hex".into()))?;

        let mut mac = self.0.clone();
        mac.update(payload);
        mac.verify_slice(&signature)
            .map_err(|_| Error::InvalidSignature("Signature does not match payload".into()))
    }
}

impl std::fmt::Debug for WebhookSigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WebhookSigningKey([REDACTED])")
    }
}
