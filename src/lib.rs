//! Gardiyan library.
//!
//! An HTTP proxy that serves objects from a single S3-compatible bucket:
//! `GET /path/to/object` streams `path/to/object` back to the client.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
