use std::fmt;

use thiserror::Error;

/// Name reported for configuration and request failures.
pub const ERROR_NAME: &str = "FileStoreClientError";

/// Messages carried by request errors that are not plain HTTP statuses.
pub mod codes {
    pub const NO_FINGERPRINT: &str = "ENOFINGERPRINT";
    pub const INVALID_PAYLOAD: &str = "EINVALIDPAYLOAD";
    pub const CONNECTION_REFUSED: &str = "ECONNREFUSED";
    pub const HOST_NOT_FOUND: &str = "ENOTFOUND";
    pub const TIMED_OUT: &str = "ETIMEDOUT";
    pub const UNSPECIFIED: &str = "EUNSPECIFIED";
    pub const NO_ERROR: &str = "ENOERROR";
    pub const ENCRYPTION: &str = "EENCRYPTION";
    pub const SIGNING: &str = "ESIGNING";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    NoServiceSecret,
    NoServiceToken,
    NoServiceSlug,
    NoMicroserviceUrl,
    InvalidSetting,
}

impl ConfigErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigErrorCode::NoServiceSecret => "ENOSERVICESECRET",
            ConfigErrorCode::NoServiceToken => "ENOSERVICETOKEN",
            ConfigErrorCode::NoServiceSlug => "ENOSERVICESLUG",
            ConfigErrorCode::NoMicroserviceUrl => "ENOMICROSERVICEURL",
            ConfigErrorCode::InvalidSetting => "ECONFIGINVALID",
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ConfigErrorCode::NoServiceSecret => "No service secret passed to client",
            ConfigErrorCode::NoServiceToken => "No service token passed to client",
            ConfigErrorCode::NoServiceSlug => "No service slug passed to client",
            ConfigErrorCode::NoMicroserviceUrl => "No microservice url passed to client",
            ConfigErrorCode::InvalidSetting => "Invalid client setting",
        }
    }
}

impl fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every failure a client call can produce.
///
/// `Configuration` and `Request` share [`ERROR_NAME`] and are told apart by
/// their code. `Io` is kept separate so filesystem failures from
/// `store_from_path` reach the caller untouched.
#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("{message}")]
    Configuration {
        code: ConfigErrorCode,
        message: String,
    },

    #[error("Request failed with status {status}: {message}")]
    Request { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FileStoreError {
    pub fn configuration(code: ConfigErrorCode) -> Self {
        FileStoreError::Configuration {
            code,
            message: code.default_message().to_string(),
        }
    }

    pub fn configuration_with_message(code: ConfigErrorCode, message: impl Into<String>) -> Self {
        FileStoreError::Configuration {
            code,
            message: message.into(),
        }
    }

    pub fn request(status: u16, message: impl Into<String>) -> Self {
        FileStoreError::Request {
            status,
            message: message.into(),
        }
    }

    /// A request error whose message is just the status.
    pub fn from_status(status: u16) -> Self {
        Self::request(status, status.to_string())
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileStoreError::Configuration { .. } | FileStoreError::Request { .. } => ERROR_NAME,
            FileStoreError::Io(_) => "IoError",
        }
    }

    pub fn code(&self) -> String {
        match self {
            FileStoreError::Configuration { code, .. } => code.as_str().to_string(),
            FileStoreError::Request { status, .. } => status.to_string(),
            FileStoreError::Io(error) => format!("{:?}", error.kind()),
        }
    }

    pub fn message(&self) -> String {
        match self {
            FileStoreError::Configuration { message, .. }
            | FileStoreError::Request { message, .. } => message.clone(),
            FileStoreError::Io(error) => error.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FileStoreError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}
