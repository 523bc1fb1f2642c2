//! Storage access and content type services.

pub mod content_type;
pub mod storage;

pub use content_type::infer_content_type;
pub use storage::{ObjectBody, ObjectStore, S3Storage, StorageError};
