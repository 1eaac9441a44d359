use std::fmt;

use serde::{Deserialize, Serialize};

use crate::application::error::{ConfigErrorCode, FileStoreError};

pub const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

pub const DEFAULT_EXPIRY_DAYS: u64 = 28;

/// Either a bare number of days or a duration string such as `"28d"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expiry {
    Days(u64),
    Duration(String),
}

impl Default for Expiry {
    fn default() -> Self {
        Expiry::Days(DEFAULT_EXPIRY_DAYS)
    }
}

impl From<u64> for Expiry {
    fn from(days: u64) -> Self {
        Expiry::Days(days)
    }
}

impl From<&str> for Expiry {
    fn from(value: &str) -> Self {
        Expiry::Duration(value.to_string())
    }
}

impl From<String> for Expiry {
    fn from(value: String) -> Self {
        Expiry::Duration(value)
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expiry::Days(days) => write!(f, "{}", days),
            Expiry::Duration(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub max_size: Option<u64>,
    pub expires: Option<Expiry>,
}

impl ClientOptions {
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn with_expires(mut self, expires: impl Into<Expiry>) -> Self {
        self.expires = Some(expires.into());
        self
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub service_secret: String,
    pub service_token: String,
    pub service_slug: String,
    pub base_url: String,
    pub max_size: u64,
    pub expires: Expiry,
}

impl ClientConfig {
    /// Reports only the first missing field. Empty strings count as missing.
    pub fn new(
        service_secret: &str,
        service_token: &str,
        service_slug: &str,
        base_url: &str,
        options: ClientOptions,
    ) -> Result<Self, FileStoreError> {
        let required = [
            (service_secret, ConfigErrorCode::NoServiceSecret),
            (service_token, ConfigErrorCode::NoServiceToken),
            (service_slug, ConfigErrorCode::NoServiceSlug),
            (base_url, ConfigErrorCode::NoMicroserviceUrl),
        ];

        if let Some((_, code)) = required.iter().find(|(value, _)| value.is_empty()) {
            return Err(FileStoreError::configuration(*code));
        }

        Ok(Self {
            service_secret: service_secret.to_string(),
            service_token: service_token.to_string(),
            service_slug: service_slug.to_string(),
            base_url: base_url.to_string(),
            max_size: options.max_size.unwrap_or(DEFAULT_MAX_SIZE),
            expires: options.expires.unwrap_or_default(),
        })
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("service_secret", &"<redacted>")
            .field("service_token", &"<redacted>")
            .field("service_slug", &self.service_slug)
            .field("base_url", &self.base_url)
            .field("max_size", &self.max_size)
            .field("expires", &self.expires)
            .finish()
    }
}
