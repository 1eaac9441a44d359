use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use reqwest::{header::CONTENT_TYPE, Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, info_span, warn, Instrument, Span};

use crate::{
    application::{
        error::FileStoreError,
        services::{Transport, TransportResponse},
    },
    domain::{config::client::ClientConfig, models::request::EndpointRequest},
    services::{
        endpoint::create_endpoint_url,
        error::TransportError,
        signing::{AccessTokenSigner, ACCESS_TOKEN_HEADER},
    },
};

/// Query parameter carrying the base64 JSON payload of GET requests.
pub const PAYLOAD_QUERY_PARAM: &str = "payload";

/// Talks to the filestore over HTTP, signing every request.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    signer: AccessTokenSigner,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            signer: AccessTokenSigner::new(&config.service_slug, &config.service_token),
        }
    }

    async fn execute(
        &self,
        method: Method,
        request: EndpointRequest,
        span: &Span,
    ) -> Result<TransportResponse, FileStoreError> {
        let url = create_endpoint_url(&self.base_url, &request.url, &request.context);
        let request_span = info_span!(parent: span, "filestore_request", method = %method, url = %url);

        self.send(method, &url, &request.payload)
            .instrument(request_span.clone())
            .await
            .map_err(|error| {
                warn!(parent: &request_span, "Filestore request failed: {}", error);
                FileStoreError::from(error)
            })
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        payload: &Value,
    ) -> Result<TransportResponse, TransportError> {
        let body =
            serde_json::to_vec(payload).map_err(|e| TransportError::InvalidPayload(e.to_string()))?;
        let token = self.signer.generate_access_token(&body)?;

        let builder = if method == Method::GET {
            self.client
                .get(url)
                .query(&[(PAYLOAD_QUERY_PARAM, BASE64_STANDARD.encode(&body))])
        } else {
            self.client
                .request(method, url)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
        };

        debug!("Dispatching filestore request");
        self.dispatch(builder.header(ACCESS_TOKEN_HEADER, token))
            .await
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<TransportResponse, TransportError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: error_message(&error_text),
            });
        }

        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "Filestore responded");
        parse_body(&body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_get(
        &self,
        request: EndpointRequest,
        span: &Span,
    ) -> Result<TransportResponse, FileStoreError> {
        self.execute(Method::GET, request, span).await
    }

    async fn send_post(
        &self,
        request: EndpointRequest,
        span: &Span,
    ) -> Result<TransportResponse, FileStoreError> {
        self.execute(Method::POST, request, span).await
    }
}

/// An empty body is an empty object; anything else must be a JSON object.
fn parse_body(body: &[u8]) -> Result<TransportResponse, TransportError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(TransportResponse::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(TransportError::InvalidPayload(
            "expected a JSON object".to_string(),
        )),
        Err(e) => Err(TransportError::InvalidPayload(e.to_string())),
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_accepts_objects_and_empty() {
        assert!(parse_body(b"").unwrap().is_empty());
        assert!(parse_body(b"  \n").unwrap().is_empty());
        assert_eq!(
            parse_body(br#"{"fingerprint":"fp"}"#).unwrap()["fingerprint"],
            "fp"
        );
    }

    #[test]
    fn test_parse_body_rejects_non_objects() {
        assert!(matches!(
            parse_body(b"[1,2]"),
            Err(TransportError::InvalidPayload(_))
        ));
        assert!(matches!(
            parse_body(b"<html>"),
            Err(TransportError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_error_message_read_from_json_body() {
        assert_eq!(
            error_message(r#"{"code":403,"message":"EFORBIDDEN"}"#),
            Some("EFORBIDDEN".to_string())
        );
        assert_eq!(error_message("Forbidden"), None);
        assert_eq!(error_message(r#"{"message":""}"#), None);
    }
}
