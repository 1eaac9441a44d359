use std::{error::Error as StdError, io};

use thiserror::Error;

use crate::application::error::{codes, FileStoreError};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Filestore responded with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("Host lookup failed: {0}")]
    HostNotFound(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Network error ({code}): {detail}")]
    Network { code: &'static str, detail: String },

    #[error("Unspecified transport failure: {0}")]
    Unspecified(String),

    #[error("Transport failed without an error")]
    NoError,

    #[error("Invalid response payload: {0}")]
    InvalidPayload(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl From<TransportError> for FileStoreError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Status { status: 404, .. } => FileStoreError::from_status(404),
            TransportError::Status {
                status,
                message: Some(message),
            } => FileStoreError::request(status, message),
            TransportError::Status {
                status,
                message: None,
            } => FileStoreError::from_status(status),
            TransportError::ConnectionRefused(_) => {
                FileStoreError::request(503, codes::CONNECTION_REFUSED)
            }
            TransportError::HostNotFound(_) => FileStoreError::request(502, codes::HOST_NOT_FOUND),
            TransportError::Timeout => FileStoreError::request(500, codes::TIMED_OUT),
            TransportError::Network { code, .. } => FileStoreError::request(500, code),
            TransportError::Unspecified(_) => FileStoreError::request(500, codes::UNSPECIFIED),
            TransportError::NoError => FileStoreError::request(500, codes::NO_ERROR),
            TransportError::InvalidPayload(_) => {
                FileStoreError::request(500, codes::INVALID_PAYLOAD)
            }
            TransportError::Encryption(_) => FileStoreError::request(500, codes::ENCRYPTION),
            TransportError::Signing(_) => FileStoreError::request(500, codes::SIGNING),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout
        } else if let Some(status) = error.status() {
            TransportError::Status {
                status: status.as_u16(),
                message: None,
            }
        } else if error.is_connect() {
            classify_connect_failure(&error)
        } else if error.is_decode() {
            TransportError::InvalidPayload(error.to_string())
        } else {
            match io_kind(&error).and_then(errno_code) {
                Some(code) => TransportError::Network {
                    code,
                    detail: error.to_string(),
                },
                None => TransportError::Unspecified(error.to_string()),
            }
        }
    }
}

impl TransportError {
    /// Maps the outcome of a failed low-level call, where the failure may
    /// not have produced an error value at all.
    pub fn from_failure(error: Option<reqwest::Error>) -> Self {
        error.map_or(TransportError::NoError, TransportError::from)
    }
}

fn classify_connect_failure(error: &reqwest::Error) -> TransportError {
    let detail = error.to_string();
    if io_kind(error) == Some(io::ErrorKind::ConnectionRefused) {
        return TransportError::ConnectionRefused(detail);
    }
    if is_dns_failure(error) {
        return TransportError::HostNotFound(detail);
    }
    match io_kind(error).and_then(errno_code) {
        Some(code) => TransportError::Network { code, detail },
        None => TransportError::Unspecified(detail),
    }
}

fn sources<'a>(
    error: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(error), |err: &&'a (dyn StdError + 'static)| {
        (*err).source()
    })
}

fn io_kind(error: &reqwest::Error) -> Option<io::ErrorKind> {
    sources(error)
        .find_map(|err| err.downcast_ref::<io::Error>())
        .map(io::Error::kind)
}

// hyper-util's HttpConnector reports resolver failures as a ConnectError
// whose message is "dns error", wrapping the io::Error from getaddrinfo
// ("failed to lookup address information"). Neither carries a distinct
// io::ErrorKind, so the text is the only signal. Pinned by the
// unresolvable_host_maps_to_502 integration test.
fn is_dns_failure(error: &reqwest::Error) -> bool {
    sources(error).any(|err| {
        let text = err.to_string().to_lowercase();
        text.contains("dns error")
            || text.contains("failed to lookup address")
            || text.contains("name resolution")
    })
}

fn errno_code(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::ConnectionRefused => Some(codes::CONNECTION_REFUSED),
        io::ErrorKind::ConnectionReset => Some("ECONNRESET"),
        io::ErrorKind::ConnectionAborted => Some("ECONNABORTED"),
        io::ErrorKind::NotConnected => Some("ENOTCONN"),
        io::ErrorKind::AddrNotAvailable => Some("EADDRNOTAVAIL"),
        io::ErrorKind::BrokenPipe => Some("EPIPE"),
        io::ErrorKind::TimedOut => Some(codes::TIMED_OUT),
        io::ErrorKind::UnexpectedEof => Some("ECONNRESET"),
        _ => None,
    }
}
