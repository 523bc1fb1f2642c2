//! E2E tests: health endpoint.

use std::sync::Arc;

use gardiyan_lib::api::health::HEALTH_MESSAGE;
use gardiyan_lib::services::StorageError;

use super::mock_store::MockStore;
use super::test_helpers::*;

/// Health stays green even when storage is unreachable and misconfigured.
#[actix_rt::test]
async fn test_health_ignores_backend_state() {
    let store = Arc::new(MockStore::failing(|| {
        StorageError::Other("dispatch failure: connection refused".to_string())
    }));
    let app = create_test_app(store.clone(), aws_settings("")).await;

    let (status, content_type, body) = get(&app, "/health").await;

    assert_eq!(status, 200);
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
    assert_eq!(body, HEALTH_MESSAGE.as_bytes());
    assert!(store.requests().is_empty());
}
