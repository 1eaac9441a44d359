use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    application::error::{ConfigErrorCode, FileStoreError},
    domain::config::client::{ClientConfig, ClientOptions, Expiry},
};

pub const SERVICE_SECRET_VAR: &str = "SERVICE_SECRET";
pub const SERVICE_TOKEN_VAR: &str = "SERVICE_TOKEN";
pub const SERVICE_SLUG_VAR: &str = "SERVICE_SLUG";
pub const FILESTORE_URL_VAR: &str = "USER_FILESTORE_URL";
pub const MAX_SIZE_VAR: &str = "USER_FILESTORE_MAX_SIZE";
pub const EXPIRES_VAR: &str = "USER_FILESTORE_EXPIRES";
pub const OFFLINE_VAR: &str = "USER_FILESTORE_OFFLINE";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportMode {
    #[default]
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "offline")]
    Offline,
}

#[derive(Clone, Default)]
pub struct ClientSettings {
    pub service_secret: String,
    pub service_token: String,
    pub service_slug: String,
    pub base_url: String,
    pub options: ClientOptions,
    pub mode: TransportMode,
}

impl ClientSettings {
    pub fn from_env() -> Result<Self, FileStoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Missing required values are left empty so that building the client
    /// reports the usual configuration code for them.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FileStoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).unwrap_or_default();

        let max_size = match lookup(MAX_SIZE_VAR) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| {
                FileStoreError::configuration_with_message(
                    ConfigErrorCode::InvalidSetting,
                    format!("{} must be a number of bytes, got '{}'", MAX_SIZE_VAR, raw),
                )
            })?),
            None => None,
        };

        let expires = lookup(EXPIRES_VAR).map(|raw| parse_expiry(raw.trim()));

        let mode = match lookup(OFFLINE_VAR).as_deref().map(str::trim) {
            Some("1") | Some("true") | Some("yes") => TransportMode::Offline,
            Some("0") | Some("false") | Some("no") | Some("") | None => TransportMode::Http,
            Some(other) => {
                return Err(FileStoreError::configuration_with_message(
                    ConfigErrorCode::InvalidSetting,
                    format!("{} must be true or false, got '{}'", OFFLINE_VAR, other),
                ))
            }
        };

        Ok(Self {
            service_secret: required(SERVICE_SECRET_VAR),
            service_token: required(SERVICE_TOKEN_VAR),
            service_slug: required(SERVICE_SLUG_VAR),
            base_url: required(FILESTORE_URL_VAR),
            options: ClientOptions { max_size, expires },
            mode,
        })
    }

    pub fn to_config(&self) -> Result<ClientConfig, FileStoreError> {
        ClientConfig::new(
            &self.service_secret,
            &self.service_token,
            &self.service_slug,
            &self.base_url,
            self.options.clone(),
        )
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("service_secret", &"<redacted>")
            .field("service_token", &"<redacted>")
            .field("service_slug", &self.service_slug)
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .field("mode", &self.mode)
            .finish()
    }
}

fn parse_expiry(raw: &str) -> Expiry {
    match raw.parse::<u64>() {
        Ok(days) => Expiry::Days(days),
        Err(_) => Expiry::Duration(raw.to_string()),
    }
}
