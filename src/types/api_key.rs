use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Shared-secret credential required on every non-health-check request.
///
/// Only the SHA-256 digest of the key is held after construction, and
/// presented keys are compared digest-to-digest so comparison time does not
/// depend on how much of the secret an attacker has guessed.
pub struct ApiKey {
    digest: [u8; 32],
}

impl ApiKey {
    pub fn new(secret: &str) -> Self {
        Self {
            digest: Sha256::digest(secret.as_bytes()).into(),
        }
    }

    /// Read the key from `API_KEY`, or generate a random one and surface it
    /// once in the startup log. The bridge never runs without a credential.
    pub fn from_env_or_generate() -> Self {
        match std::env::var("API_KEY") {
            Ok(secret) if !secret.is_empty() => Self::new(&secret),
            _ => {
                let secret = Self::generate();
                tracing::warn!(
                    "No API_KEY environment variable set! Generated temporary API key: {}",
                    secret
                );
                tracing::warn!("Set API_KEY=\"{}\" in your environment for persistence", secret);
                Self::new(&secret)
            }
        }
    }

    /// Generate a 32-byte random key, URL-safe base64 encoded.
    pub fn generate() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    }

    pub fn verify(&self, presented: &str) -> bool {
        let presented: [u8; 32] = Sha256::digest(presented.as_bytes()).into();
        presented == self.digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_matching_key() {
        let key = ApiKey::new("my-secret-key");
        assert!(key.verify("my-secret-key"));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let key = ApiKey::new("my-secret-key");
        assert!(!key.verify("my-secret-kez"));
        assert!(!key.verify(""));
        assert!(!key.verify("my-secret-key "));
    }

    #[test]
    fn test_generate_is_unique_and_urlsafe() {
        let a = ApiKey::generate();
        let b = ApiKey::generate();
        assert_ne!(a, b);
        // 32 bytes -> 43 base64 chars without padding
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_generated_key_verifies() {
        let secret = ApiKey::generate();
        let key = ApiKey::new(&secret);
        assert!(key.verify(&secret));
    }
}
