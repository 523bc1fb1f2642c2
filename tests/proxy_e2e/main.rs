//! Proxy E2E test suite.
//!
//! Drives the full actix app against an in-memory object store.
//!
//! Run with: cargo test --test proxy_e2e

mod test_helpers;

mod test_health;
mod test_success;
