//! Health check endpoint.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};

/// Fixed body of the health check response.
pub const HEALTH_MESSAGE: &str = "🔒 Gardiyan is on duty and the prison is secure! 👮‍♂️";

/// Health check endpoint.
///
/// Returns 200 whenever the process is serving requests; storage is not checked.
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(HEALTH_MESSAGE)
}

/// Configure health routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}
