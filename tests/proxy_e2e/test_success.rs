//! E2E tests: objects served from storage.

use std::sync::Arc;

use actix_web::test;

use super::mock_store::MockStore;
use super::test_helpers::*;

/// `GET /images/logo.png` streams the object with inferred type and declared length.
#[actix_rt::test]
async fn test_object_streamed_with_headers() {
    let data: Vec<u8> = (0..1234u32).map(|i| (i % 251) as u8).collect();
    let store = Arc::new(MockStore::empty().with_object(
        "assets",
        "images/logo.png",
        data.clone(),
        Some(1234),
    ));
    let app = create_test_app(store.clone(), aws_settings("assets")).await;

    let req = test::TestRequest::get()
        .uri("/images/logo.png")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");
    assert_eq!(resp.headers().get("content-length").unwrap(), "1234");

    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), data.as_slice());
    assert_eq!(
        store.requests(),
        vec![("assets".to_string(), "images/logo.png".to_string())]
    );
}

/// Without a declared length the body is still streamed in full.
#[actix_rt::test]
async fn test_object_without_length() {
    let data = b"{\"ok\":true}".to_vec();
    let store = Arc::new(MockStore::empty().with_object("files", "a/b.json", data.clone(), None));
    let app = create_test_app(store, aws_settings("files")).await;

    let req = test::TestRequest::get().uri("/a/b.json").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    assert!(resp.headers().get("content-length").is_none());

    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), data.as_slice());
}

/// Unknown extensions fall back to application/octet-stream.
#[actix_rt::test]
async fn test_unknown_extension_served_as_binary() {
    let store = Arc::new(MockStore::empty().with_object(
        "assets",
        "bin/tool.exe",
        vec![0x4d, 0x5a],
        Some(2),
    ));
    let app = create_test_app(store, aws_settings("assets")).await;

    let (status, content_type, body) = get(&app, "/bin/tool.exe").await;

    assert_eq!(status, 200);
    assert_eq!(content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(body, vec![0x4d, 0x5a]);
}

/// Upper-case extensions map the same as lower-case ones.
#[actix_rt::test]
async fn test_extension_case_insensitive() {
    let store = Arc::new(MockStore::empty().with_object(
        "assets",
        "IMAGE.PNG",
        vec![1, 2, 3],
        Some(3),
    ));
    let app = create_test_app(store, aws_settings("assets")).await;

    let (status, content_type, _) = get(&app, "/IMAGE.PNG").await;

    assert_eq!(status, 200);
    assert_eq!(content_type.as_deref(), Some("image/png"));
}

/// Percent-encoded paths reach storage decoded, with one leading slash removed.
#[actix_rt::test]
async fn test_key_is_decoded_path() {
    let store = Arc::new(MockStore::empty().with_object(
        "assets",
        "docs/annual report.pdf",
        b"%PDF".to_vec(),
        Some(4),
    ));
    let app = create_test_app(store.clone(), aws_settings("assets")).await;

    let (status, content_type, _) = get(&app, "/docs/annual%20report.pdf").await;

    assert_eq!(status, 200);
    assert_eq!(content_type.as_deref(), Some("application/pdf"));
    assert_eq!(
        store.requests(),
        vec![("assets".to_string(), "docs/annual report.pdf".to_string())]
    );
}
