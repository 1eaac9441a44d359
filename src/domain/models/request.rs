use std::collections::BTreeMap;

use serde_json::Value;

pub const FETCH_ENDPOINT: &str = "/service/:serviceSlug/user/:userId/:fingerprint";

pub const STORE_ENDPOINT: &str = "/service/:serviceSlug/user/:userId";

/// Values substituted into the `:name` placeholders of a template.
pub type RequestContext = BTreeMap<String, String>;

/// A single call handed to a transport: template, its parameters and the
/// JSON payload to sign and send.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRequest {
    pub url: String,
    pub context: RequestContext,
    pub payload: Value,
}

impl EndpointRequest {
    pub fn new(url: impl Into<String>, context: RequestContext, payload: Value) -> Self {
        Self {
            url: url.into(),
            context,
            payload,
        }
    }
}
