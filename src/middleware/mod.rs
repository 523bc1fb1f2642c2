//! HTTP middleware and request helpers.

pub mod client_ip;
pub mod request_logger;

pub use client_ip::client_identifier;
pub use request_logger::RequestLogger;
