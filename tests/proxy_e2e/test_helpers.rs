//! Shared test helpers for proxy E2E tests.

use std::io;
use std::sync::{Arc, Mutex};

use actix_web::{App, dev::ServiceResponse, test, web};
use gardiyan_lib::api;
use gardiyan_lib::config::StorageSettings;
use gardiyan_lib::middleware::RequestLogger;
use gardiyan_lib::services::ObjectStore;
use secrecy::SecretString;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// Storage settings for AWS S3 with the given bucket in us-east-1.
pub fn aws_settings(bucket: &str) -> StorageSettings {
    StorageSettings {
        endpoint: None,
        bucket: bucket.to_string(),
        region: "us-east-1".to_string(),
        access_key: "test-access-key".to_string(),
        secret_key: SecretString::from("test-secret-key".to_string()),
        force_path_style: false,
        disable_ssl: false,
    }
}

/// Build the app with all routes and middleware around the given store.
pub async fn create_test_app(
    store: Arc<dyn ObjectStore>,
    settings: StorageSettings,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .wrap(RequestLogger)
            .app_data(web::Data::from(store))
            .app_data(web::Data::new(settings))
            .configure(api::configure_health_routes)
            .configure(api::configure_proxy_routes),
    )
    .await
}

/// GET `uri` and return status, content type and body.
pub async fn get<S>(app: &S, uri: &str) -> (u16, Option<String>, Vec<u8>)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(app, req).await;

    let status = resp.status().as_u16();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = test::read_body(resp).await.to_vec();

    (status, content_type, body)
}

/// In-memory sink for formatted log output.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Everything logged so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Lines logged under the `access` target.
    pub fn access_lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains("access:"))
            .map(String::from)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Capture logs on the current thread until the guard is dropped.
pub fn capture_logs() -> (LogCapture, DefaultGuard) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}
