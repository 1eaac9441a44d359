use std::{path::Path, sync::Arc};

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn, Span};

use crate::{
    application::{
        dto::file_dto::{FetchArgs, StoreArgs, StoreFromPathArgs},
        error::{codes, FileStoreError},
        services::{Transport, TransportResponse},
    },
    domain::{
        config::{
            client::{ClientConfig, ClientOptions, Expiry},
            settings::{ClientSettings, TransportMode},
        },
        models::{
            file::StoredFileResult,
            request::{EndpointRequest, RequestContext, FETCH_ENDPOINT, STORE_ENDPOINT},
        },
    },
    services::{create_endpoint_url, create_transport, IdentityCipher},
};

/// Cheap to clone; clones share configuration and transport.
#[derive(Clone)]
pub struct FileStoreClient {
    config: Arc<ClientConfig>,
    cipher: IdentityCipher,
    transport: Arc<dyn Transport>,
}

impl FileStoreClient {
    /// Fails with `ENOSERVICESECRET`, `ENOSERVICETOKEN`, `ENOSERVICESLUG`
    /// or `ENOMICROSERVICEURL` for the first missing argument, in that order.
    pub fn new(
        service_secret: &str,
        service_token: &str,
        service_slug: &str,
        base_url: &str,
        options: ClientOptions,
    ) -> Result<Self, FileStoreError> {
        let config =
            ClientConfig::new(service_secret, service_token, service_slug, base_url, options)?;
        Ok(Self::from_config(config, TransportMode::Http))
    }

    pub fn offline(
        service_secret: &str,
        service_token: &str,
        service_slug: &str,
        base_url: &str,
        options: ClientOptions,
    ) -> Result<Self, FileStoreError> {
        let config =
            ClientConfig::new(service_secret, service_token, service_slug, base_url, options)?;
        Ok(Self::from_config(config, TransportMode::Offline))
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, FileStoreError> {
        let config = settings.to_config()?;
        Ok(Self::from_config(config, settings.mode))
    }

    pub fn from_config(config: ClientConfig, mode: TransportMode) -> Self {
        let transport = create_transport(mode, &config);
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            cipher: IdentityCipher::new(&config.service_secret),
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn max_size(&self) -> u64 {
        self.config.max_size
    }

    pub fn expires(&self) -> &Expiry {
        &self.config.expires
    }

    pub fn get_fetch_url(&self, user_id: &str, fingerprint: &str) -> String {
        create_endpoint_url(
            &self.config.base_url,
            FETCH_ENDPOINT,
            &self.fetch_context(user_id, fingerprint),
        )
    }

    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub async fn fetch(&self, args: FetchArgs, span: &Span) -> Result<String, FileStoreError> {
        let content = self.fetch_bytes(args, span).await?;
        Ok(String::from_utf8_lossy(&content).into_owned())
    }

    pub async fn fetch_bytes(
        &self,
        args: FetchArgs,
        span: &Span,
    ) -> Result<Vec<u8>, FileStoreError> {
        let identity = self
            .cipher
            .encrypt_user_id_and_token(&args.user_id, &args.user_token)?;

        let request = EndpointRequest::new(
            FETCH_ENDPOINT,
            self.fetch_context(&args.user_id, &args.fingerprint),
            json!({ "encrypted_user_id_and_token": identity }),
        );

        let response = self.transport.send_get(request, span).await?;
        decode_file(&response)
    }

    /// Uploads a file. The returned result always has a fingerprint; a
    /// response without one fails with status 500 and `ENOFINGERPRINT`.
    pub async fn store(
        &self,
        args: StoreArgs,
        span: &Span,
    ) -> Result<StoredFileResult, FileStoreError> {
        let StoreArgs {
            user_id,
            user_token,
            file,
            policy,
        } = args;

        let encoded = file.to_base64();
        let policy = policy
            .unwrap_or_default()
            .resolve(self.config.max_size, &self.config.expires);
        let identity = self.cipher.encrypt_user_id_and_token(&user_id, &user_token)?;

        debug!(parent: span, bytes = file.size(), "Uploading user file");

        let request = EndpointRequest::new(
            STORE_ENDPOINT,
            self.store_context(&user_id),
            json!({
                "encrypted_user_id_and_token": identity,
                "file": encoded,
                "policy": policy,
            }),
        );

        let response = self.transport.send_post(request, span).await?;

        match StoredFileResult::from_response(response) {
            Some(result) => {
                info!(parent: span, fingerprint = %result.fingerprint(), "Stored user file");
                Ok(result)
            }
            None => {
                warn!(parent: span, "Filestore accepted upload but returned no fingerprint");
                Err(FileStoreError::request(500, codes::NO_FINGERPRINT))
            }
        }
    }

    /// Read failures are returned as [`FileStoreError::Io`].
    pub async fn store_from_path(
        &self,
        path: impl AsRef<Path>,
        args: StoreFromPathArgs,
        span: &Span,
    ) -> Result<StoredFileResult, FileStoreError> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;

        debug!(parent: span, path = %path.display(), "Read upload from disk");

        self.store(args.with_file(content), span).await
    }

    fn fetch_context(&self, user_id: &str, fingerprint: &str) -> RequestContext {
        let mut context = self.store_context(user_id);
        context.insert("fingerprint".to_string(), fingerprint.to_string());
        context
    }

    fn store_context(&self, user_id: &str) -> RequestContext {
        let mut context = RequestContext::new();
        context.insert("serviceSlug".to_string(), self.config.service_slug.clone());
        context.insert("userId".to_string(), user_id.to_string());
        context
    }
}

// Padding is optional and non-zero trailing bits are ignored.
const FILE_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

fn decode_file(response: &TransportResponse) -> Result<Vec<u8>, FileStoreError> {
    let encoded = response
        .get("file")
        .and_then(Value::as_str)
        .ok_or_else(|| FileStoreError::request(500, codes::INVALID_PAYLOAD))?;

    FILE_BASE64
        .decode(encoded)
        .or_else(|_| FILE_BASE64.decode(normalize_base64(encoded)))
        .map_err(|_| FileStoreError::request(500, codes::INVALID_PAYLOAD))
}

/// Keeps only alphabet characters up to the first `=`, reading the URL-safe
/// `-` and `_` as `+` and `/`. A lone trailing sextet carries no full byte
/// and is dropped.
fn normalize_base64(encoded: &str) -> String {
    let mut cleaned: String = encoded
        .chars()
        .take_while(|c| *c != '=')
        .filter_map(|c| match c {
            '-' => Some('+'),
            '_' => Some('/'),
            c if c.is_ascii_alphanumeric() || c == '+' || c == '/' => Some(c),
            _ => None,
        })
        .collect();
    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> FileStoreClient {
        FileStoreClient::offline(
            "secret",
            "token",
            "my-service",
            "http://filestore/",
            ClientOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_get_fetch_url() {
        assert_eq!(
            client().get_fetch_url("u", "f"),
            "http://filestore/service/my-service/user/u/f"
        );
    }

    #[test]
    fn test_new_reports_first_missing_argument() {
        let err = FileStoreClient::new("secret", "", "", "", ClientOptions::default())
            .err()
            .unwrap();
        assert_eq!(err.code(), "ENOSERVICETOKEN");
        assert_eq!(err.message(), "No service token passed to client");
    }

    #[test]
    fn test_decode_file_requires_file_field() {
        let err = decode_file(&TransportResponse::new()).unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.message(), "EINVALIDPAYLOAD");
    }

    fn response_with_file(file: Value) -> TransportResponse {
        let mut response = TransportResponse::new();
        response.insert("file".to_string(), file);
        response
    }

    #[test]
    fn test_decode_file_rejects_non_string_file() {
        let err = decode_file(&response_with_file(Value::from(42))).unwrap_err();
        assert_eq!(err.message(), "EINVALIDPAYLOAD");
    }

    #[test]
    fn test_decode_file_accepts_unpadded_and_wrapped_base64() {
        for encoded in ["aGVsbG8", "aGVsbG8=", "aGVs\nbG8=\n", " aGVsbG8 "] {
            assert_eq!(
                decode_file(&response_with_file(Value::from(encoded))).unwrap(),
                b"hello",
                "decoding {encoded:?}"
            );
        }
    }

    #[test]
    fn test_decode_file_reads_url_safe_alphabet() {
        assert_eq!(
            decode_file(&response_with_file(Value::from("-_8"))).unwrap(),
            vec![0xfb, 0xff]
        );
    }

    #[test]
    fn test_decode_file_skips_stray_characters() {
        assert_eq!(
            decode_file(&response_with_file(Value::from("aG!Vs*bG8"))).unwrap(),
            b"hello"
        );
    }

    #[tokio::test]
    async fn test_offline_store_yields_fingerprint() {
        let result = client()
            .store(StoreArgs::new("u", "t", "hello"), &Span::none())
            .await
            .unwrap();
        assert!(!result.fingerprint().is_empty());
        assert!(result.get("timestamp").is_some());
    }
}
