#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::Span;
use tracing_subscriber::EnvFilter;
use user_filestore_client::{
    ClientConfig, ClientOptions, EndpointRequest, FileStoreClient, FileStoreError, Transport,
    TransportResponse,
};

pub const SERVICE_SECRET: &str = "service-secret";
pub const SERVICE_TOKEN: &str = "service-token";
pub const SERVICE_SLUG: &str = "my-service";
pub const BASE_URL: &str = "http://filestore.test";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub request: EndpointRequest,
}

/// Canned transport outcome, rebuilt for every call.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Error { status: u16, message: String },
}

/// Transport double that records requests and answers with a fixed reply.
pub struct RecordingTransport {
    reply: Reply,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingTransport {
    pub fn replying(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn json(value: Value) -> Arc<Self> {
        Self::replying(Reply::Json(value))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn only_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }

    fn answer(
        &self,
        method: Method,
        request: EndpointRequest,
    ) -> Result<TransportResponse, FileStoreError> {
        self.requests
            .lock()
            .unwrap()
            .push(RecordedRequest { method, request });

        match &self.reply {
            Reply::Json(Value::Object(map)) => Ok(map.clone()),
            Reply::Json(_) => Ok(Map::new()),
            Reply::Error { status, message } => {
                Err(FileStoreError::request(*status, message.clone()))
            }
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_get(
        &self,
        request: EndpointRequest,
        _span: &Span,
    ) -> Result<TransportResponse, FileStoreError> {
        self.answer(Method::Get, request)
    }

    async fn send_post(
        &self,
        request: EndpointRequest,
        _span: &Span,
    ) -> Result<TransportResponse, FileStoreError> {
        self.answer(Method::Post, request)
    }
}

pub fn config(options: ClientOptions) -> ClientConfig {
    ClientConfig::new(SERVICE_SECRET, SERVICE_TOKEN, SERVICE_SLUG, BASE_URL, options).unwrap()
}

pub fn client_with(transport: Arc<RecordingTransport>) -> FileStoreClient {
    init_tracing();
    FileStoreClient::with_transport(config(ClientOptions::default()), transport)
}
