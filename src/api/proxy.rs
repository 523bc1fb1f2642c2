//! Object proxy handler.
//!
//! Maps `GET /{key}` onto the configured bucket and streams the object back
//! with a content type inferred from the key.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use actix_web::body::SizedStream;
use actix_web::http::header;
use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::{Stream, StreamExt};
use tracing::{debug, error, info, warn};

use crate::config::StorageSettings;
use crate::error::{
    BUCKET_NOT_DEFINED, FILE_PATH_NOT_SPECIFIED, INVALID_FILE_PATH, Outcome, ProxyError,
    ProxyResult,
};
use crate::middleware::client_identifier;
use crate::services::storage::BodyStream;
use crate::services::{ObjectBody, ObjectStore, infer_content_type};

/// One access log line: `<outcome> - <client> - <url>`.
#[derive(Debug)]
pub struct AccessRecord<'a> {
    pub outcome: Outcome,
    pub client: &'a str,
    pub url: &'a str,
}

impl fmt::Display for AccessRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.outcome, self.client, self.url)
    }
}

impl AccessRecord<'_> {
    fn log(&self) {
        if self.outcome == Outcome::Success {
            info!(target: "access", "{}", self);
        } else {
            warn!(target: "access", "{}", self);
        }
    }
}

/// Derive the object key from a request path.
///
/// The path is percent-decoded once and exactly one leading `/` is removed.
pub fn object_key(path: &str) -> ProxyResult<String> {
    let decoded =
        urlencoding::decode(path).map_err(|_| ProxyError::BadRequest(INVALID_FILE_PATH))?;
    let decoded: &str = &decoded;
    let key = decoded.strip_prefix('/').unwrap_or(decoded);

    if key.is_empty() {
        return Err(ProxyError::BadRequest(FILE_PATH_NOT_SPECIFIED));
    }

    Ok(key.to_string())
}

/// Resolve the object key and its diagnostic URL.
fn resolve_target(path: &str, settings: &StorageSettings) -> ProxyResult<(String, String)> {
    let key = object_key(path)?;

    if settings.bucket.is_empty() {
        return Err(ProxyError::BadRequest(BUCKET_NOT_DEFINED));
    }

    let url = settings.object_url(&key);
    Ok((key, url))
}

/// Serve an object from storage.
pub async fn serve_object(
    req: HttpRequest,
    storage: web::Data<dyn ObjectStore>,
    settings: web::Data<StorageSettings>,
) -> ProxyResult<HttpResponse> {
    let client = client_identifier(&req);

    let (key, url) = match resolve_target(req.path(), &settings) {
        Ok(target) => target,
        Err(err) => {
            debug!(path = %req.path(), error = %err, "Rejected request");
            AccessRecord {
                outcome: err.outcome(),
                client: &client,
                url: "",
            }
            .log();
            return Err(err);
        }
    };

    debug!("S3 URL: {}", url);
    debug!(
        "Guard checking storage cell for prisoner: {} in facility: {}",
        key, settings.bucket
    );

    match storage.get_object(&settings.bucket, &key).await {
        Ok(object) => Ok(object_response(&key, object, client, url)),
        Err(err) => {
            debug!("S3 file retrieval error: {}", err);
            debug!("Failed S3 URL would be: {}", url);

            let err = ProxyError::from(err);
            AccessRecord {
                outcome: err.outcome(),
                client: &client,
                url: &url,
            }
            .log();
            Err(err)
        }
    }
}

/// Response body that writes the access line when the transfer ends.
///
/// `Success` is logged once the backend stream is exhausted. A backend error,
/// or the body being dropped before completion (client gone), is logged as a
/// write error instead.
struct LoggedBody {
    stream: BodyStream,
    client: String,
    url: String,
    finished: bool,
}

impl LoggedBody {
    fn new(stream: BodyStream, client: String, url: String) -> Self {
        Self {
            stream,
            client,
            url,
            finished: false,
        }
    }
}

impl Stream for LoggedBody {
    type Item = io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let item = ready!(this.stream.poll_next_unpin(cx));

        match &item {
            None if !this.finished => {
                this.finished = true;
                AccessRecord {
                    outcome: Outcome::Success,
                    client: &this.client,
                    url: &this.url,
                }
                .log();
            }
            Some(Err(e)) => {
                this.finished = true;
                error!(client = %this.client, url = %this.url, "Response write error: {}", e);
            }
            _ => {}
        }

        Poll::Ready(item)
    }
}

impl Drop for LoggedBody {
    fn drop(&mut self) {
        if !self.finished {
            error!(
                client = %self.client,
                url = %self.url,
                "Response write error: connection closed before the body was sent"
            );
        }
    }
}

/// Build a streaming response for a fetched object.
fn object_response(key: &str, object: ObjectBody, client: String, url: String) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    response.content_type(infer_content_type(key));

    match object.content_length {
        // An empty sized body is never polled by the transport.
        Some(0) => {
            AccessRecord {
                outcome: Outcome::Success,
                client: &client,
                url: &url,
            }
            .log();
            response.insert_header((header::CONTENT_LENGTH, 0u64)).finish()
        }
        Some(len) => response
            .insert_header((header::CONTENT_LENGTH, len))
            .body(SizedStream::new(
                len,
                LoggedBody::new(object.stream, client, url),
            )),
        None => response.streaming(LoggedBody::new(object.stream, client, url)),
    }
}

/// Configure proxy routes. Register after every fixed route.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{key:.*}").route(web::get().to(serve_object)));
}
