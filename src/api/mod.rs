//! API endpoint modules.

pub mod health;
pub mod proxy;

pub use health::configure_health_routes;
pub use proxy::configure_routes as configure_proxy_routes;
