use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{info, Span};
use uuid::Uuid;

use crate::{
    application::{
        error::FileStoreError,
        services::{Transport, TransportResponse},
    },
    domain::models::request::EndpointRequest,
};

/// Stands in for the filestore during local development.
///
/// Uploads are acknowledged with a synthesised fingerprint and dropped;
/// nothing is kept, so every fetch is a 404.
#[derive(Debug, Default, Clone)]
pub struct OfflineTransport;

impl OfflineTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for OfflineTransport {
    async fn send_get(
        &self,
        request: EndpointRequest,
        span: &Span,
    ) -> Result<TransportResponse, FileStoreError> {
        info!(parent: span, template = %request.url, "Offline filestore has no stored files");
        Err(FileStoreError::from_status(404))
    }

    async fn send_post(
        &self,
        request: EndpointRequest,
        span: &Span,
    ) -> Result<TransportResponse, FileStoreError> {
        let now = Utc::now();
        let fingerprint = Uuid::new_v4().to_string();

        info!(
            parent: span,
            template = %request.url,
            fingerprint = %fingerprint,
            "Offline filestore acknowledged upload"
        );

        let mut response = TransportResponse::new();
        response.insert("fingerprint".to_string(), Value::from(fingerprint));
        response.insert("date".to_string(), Value::from(now.timestamp()));
        response.insert("timestamp".to_string(), Value::from(now.timestamp_millis()));
        Ok(response)
    }
}
