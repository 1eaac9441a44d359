//! Client for the user filestore service.
//!
//! [`FileStoreClient`] uploads and downloads user files. User identity is
//! encrypted with the service secret before it is sent, and every request
//! carries an access token signed with the service token.

pub mod application;
pub mod domain;
pub mod services;

pub use application::{
    client::FileStoreClient,
    dto::file_dto::{FetchArgs, StoreArgs, StoreFromPathArgs},
    error::{codes, ConfigErrorCode, FileStoreError},
    services::{Transport, TransportResponse},
};
pub use domain::{
    config::{
        client::{ClientConfig, ClientOptions, Expiry, DEFAULT_EXPIRY_DAYS, DEFAULT_MAX_SIZE},
        settings::{ClientSettings, TransportMode},
    },
    models::{
        file::{FileContent, StoredFileResult},
        identity::{EncryptedIdentity, UserIdentity},
        policy::UploadPolicy,
        request::{EndpointRequest, RequestContext, FETCH_ENDPOINT, STORE_ENDPOINT},
    },
};
pub use services::{create_transport, HttpTransport, IdentityCipher, OfflineTransport};
