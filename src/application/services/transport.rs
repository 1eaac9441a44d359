use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::Span;

use crate::{application::error::FileStoreError, domain::models::request::EndpointRequest};

/// Decoded JSON object returned by the filestore.
pub type TransportResponse = Map<String, Value>;

/// Signed request delivery to the filestore.
///
/// Implementations resolve the request's template, authenticate the call
/// and normalise failures into [`FileStoreError::Request`]. The caller's
/// span is passed through so transport logs nest under it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_get(
        &self,
        request: EndpointRequest,
        span: &Span,
    ) -> Result<TransportResponse, FileStoreError>;

    async fn send_post(
        &self,
        request: EndpointRequest,
        span: &Span,
    ) -> Result<TransportResponse, FileStoreError>;
}
