pub mod crypto;
pub mod endpoint;
mod error;
mod http_transport;
mod offline_transport;
pub mod signing;

pub use crypto::IdentityCipher;
pub use endpoint::create_endpoint_url;
pub use error::TransportError;
pub use http_transport::{HttpTransport, PAYLOAD_QUERY_PARAM};
pub use offline_transport::OfflineTransport;
pub use signing::{AccessTokenSigner, ACCESS_TOKEN_HEADER};

use std::sync::Arc;

use crate::{
    application::services::Transport,
    domain::config::{client::ClientConfig, settings::TransportMode},
};

pub fn create_transport(mode: TransportMode, config: &ClientConfig) -> Arc<dyn Transport> {
    match mode {
        TransportMode::Http => Arc::new(HttpTransport::new(config)),
        TransportMode::Offline => {
            tracing::info!(
                "Using offline filestore transport for service {}",
                config.service_slug
            );
            Arc::new(OfflineTransport::new())
        }
    }
}
