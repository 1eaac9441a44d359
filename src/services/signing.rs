use std::fmt;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::services::error::TransportError;

pub const ACCESS_TOKEN_HEADER: &str = "x-access-token-v2";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    pub iat: i64,
    pub checksum: String,
}

/// Hex SHA-256 of a request body, bound into the token.
pub fn checksum(body: &[u8]) -> String {
    format!("{:x}", Sha256::digest(body))
}

/// Issues HS256 access tokens on behalf of one service.
#[derive(Clone)]
pub struct AccessTokenSigner {
    issuer: String,
    key: EncodingKey,
}

impl AccessTokenSigner {
    pub fn new(service_slug: &str, service_token: &str) -> Self {
        Self {
            issuer: service_slug.to_string(),
            key: EncodingKey::from_secret(service_token.as_bytes()),
        }
    }

    pub fn generate_access_token(&self, body: &[u8]) -> Result<String, TransportError> {
        let claims = AccessTokenClaims {
            iss: self.issuer.clone(),
            iat: Utc::now().timestamp(),
            checksum: checksum(body),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| TransportError::Signing(e.to_string()))
    }
}

impl fmt::Debug for AccessTokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenSigner")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}
