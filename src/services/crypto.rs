use std::fmt;

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use sha2::{Digest, Sha256};

use crate::{
    application::error::FileStoreError,
    domain::models::identity::{EncryptedIdentity, UserIdentity},
    services::error::TransportError,
};

const NONCE_LEN: usize = 12;

/// Seals user id and token under a key derived from the service secret.
///
/// Output is base64 of `nonce || ciphertext` (AES-256-GCM).
#[derive(Clone)]
pub struct IdentityCipher {
    cipher: Aes256Gcm,
}

impl IdentityCipher {
    pub fn new(service_secret: &str) -> Self {
        let key = Sha256::digest(service_secret.as_bytes());
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice())),
        }
    }

    pub fn encrypt_user_id_and_token(
        &self,
        user_id: &str,
        user_token: &str,
    ) -> Result<EncryptedIdentity, FileStoreError> {
        let identity = UserIdentity {
            user_id: user_id.to_string(),
            user_token: user_token.to_string(),
        };
        let plaintext = serde_json::to_vec(&identity)
            .map_err(|e| TransportError::Encryption(e.to_string()))?;

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_ref())
            .map_err(|e| TransportError::Encryption(e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        Ok(EncryptedIdentity::new(BASE64_STANDARD.encode(sealed)))
    }

    pub fn decrypt(&self, identity: &EncryptedIdentity) -> Result<UserIdentity, FileStoreError> {
        let sealed = BASE64_STANDARD
            .decode(identity.as_str())
            .map_err(|e| TransportError::Encryption(e.to_string()))?;

        if sealed.len() <= NONCE_LEN {
            return Err(TransportError::Encryption("ciphertext too short".to_string()).into());
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| TransportError::Encryption(e.to_string()))?;

        serde_json::from_slice(&plaintext)
            .map_err(|e| TransportError::Encryption(e.to_string()).into())
    }
}

impl fmt::Debug for IdentityCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_and_decrypt() {
        let cipher = IdentityCipher::new("service-secret");
        let sealed = cipher.encrypt_user_id_and_token("user-1", "token-1").unwrap();

        assert!(!sealed.as_str().contains("user-1"));

        let identity = cipher.decrypt(&sealed).unwrap();
        assert_eq!(identity.user_id, "user-1");
        assert_eq!(identity.user_token, "token-1");
    }

    #[test]
    fn test_nonce_differs_between_calls() {
        let cipher = IdentityCipher::new("service-secret");
        let first = cipher.encrypt_user_id_and_token("u", "t").unwrap();
        let second = cipher.encrypt_user_id_and_token("u", "t").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_secret_cannot_decrypt() {
        let sealed = IdentityCipher::new("service-secret")
            .encrypt_user_id_and_token("u", "t")
            .unwrap();
        let err = IdentityCipher::new("other-secret")
            .decrypt(&sealed)
            .unwrap_err();
        assert_eq!(err.message(), "EENCRYPTION");
    }

    #[test]
    fn test_truncated_ciphertext_rejected() {
        let cipher = IdentityCipher::new("service-secret");
        let short = EncryptedIdentity::new(BASE64_STANDARD.encode([0u8; 4]));
        assert!(cipher.decrypt(&short).is_err());
    }
}
