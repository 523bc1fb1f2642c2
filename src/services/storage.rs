//! Object storage backend.
//!
//! The proxy only ever reads: [`ObjectStore::get_object`] returns either a
//! chunked body stream or a [`StorageError`] from a closed set of failures.
//! [`S3Storage`] implements it against AWS S3 or any S3-compatible service
//! (MinIO, Huawei OBS, ...).

use std::io;

use actix_web::web::Bytes;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use secrecy::ExposeSecret;
use tokio_util::io::ReaderStream;
use tracing::info;

use crate::config::StorageSettings;

/// Chunk size used when adapting a backend body into a response stream.
const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// Object body as a stream of chunks.
pub type BodyStream = BoxStream<'static, io::Result<Bytes>>;

/// A successfully opened object.
pub struct ObjectBody {
    /// Length reported by the backend, if any
    pub content_length: Option<u64>,
    /// Object contents
    pub stream: BodyStream,
}

impl std::fmt::Debug for ObjectBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectBody")
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Backend failures, as seen by the proxy.
///
/// Each variant carries the full backend detail for server-side logging.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("no such key: {0}")]
    NoSuchKey(String),

    #[error("no such bucket: {0}")]
    NoSuchBucket(String),

    #[error("storage error: {0}")]
    Other(String),
}

impl StorageError {
    /// Classify a backend failure by its S3 error code.
    pub fn from_code(code: Option<&str>, detail: String) -> Self {
        match code {
            Some("AccessDenied") => Self::AccessDenied(detail),
            Some("NoSuchKey") => Self::NoSuchKey(detail),
            Some("NoSuchBucket") => Self::NoSuchBucket(detail),
            _ => Self::Other(detail),
        }
    }

    /// Full backend detail.
    pub fn detail(&self) -> &str {
        match self {
            Self::AccessDenied(d) | Self::NoSuchKey(d) | Self::NoSuchBucket(d) | Self::Other(d) => d,
        }
    }
}

/// Read access to an object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Open `key` in `bucket` for streaming.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, StorageError>;
}

/// S3 storage client wrapper.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    /// Create a new S3 storage client from configuration.
    pub fn new(config: &StorageSettings) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            config.secret_key.expose_secret(),
            None,
            None,
            "gardiyan",
        );

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);

        // Path style only matters for custom endpoints; AWS uses virtual hosts
        if let Some(endpoint) = config.endpoint_url() {
            s3_config_builder = s3_config_builder
                .endpoint_url(&endpoint)
                .force_path_style(config.force_path_style);
            info!(
                "Using S3-compatible endpoint: {} (PathStyle: {})",
                endpoint, config.force_path_style
            );
        } else {
            info!("Using AWS S3 (region: {})", config.region);
        }

        Self {
            client: Client::from_conf(s3_config_builder.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let detail = DisplayErrorContext(&e).to_string();
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    StorageError::NoSuchKey(detail)
                } else {
                    StorageError::from_code(service_error.code(), detail)
                }
            })?;

        Ok(object_body(response.body, response.content_length))
    }
}

/// Adapt an SDK body into a chunked stream without buffering it.
fn object_body(body: ByteStream, content_length: Option<i64>) -> ObjectBody {
    let reader = body.into_async_read();
    ObjectBody {
        content_length: content_length.and_then(|len| u64::try_from(len).ok()),
        stream: ReaderStream::with_capacity(reader, STREAM_CHUNK_SIZE).boxed(),
    }
}
