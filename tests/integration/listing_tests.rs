//! Integration tests for the image listing and debug endpoints.
//!
//! Tests verify:
//! - Extension filtering and descriptor contents
//! - Graceful degradation to an empty listing with an error indicator
//! - The debug endpoint's gating and diagnostics payload

use axum::http::StatusCode;

use super::test_utils::{
    body_json, fixture_dir, get, router_for_base, router_for_data_dir, write_file, JPEG_BYTES,
    PNG_BYTES,
};

use annotation_server::server::{create_router, RouterConfig};
use annotation_server::store::ImageStore;

// =============================================================================
// Listing Contents
// =============================================================================

#[tokio::test]
async fn test_listing_filters_and_sizes() {
    let dir = fixture_dir();
    let router = router_for_data_dir(dir.path());

    let response = get(router, "/available-images/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let images = body["images"].as_array().unwrap();

    // a.png and b.jpg qualify; notes.txt is excluded
    assert_eq!(images.len(), 2);
    assert!(body.get("error").is_none());

    let mut names: Vec<&str> = images
        .iter()
        .map(|img| img["name"].as_str().unwrap())
        .collect();
    names.sort_unstable();
    assert_eq!(names, ["a.png", "b.jpg"]);

    for img in images {
        let expected = match img["name"].as_str().unwrap() {
            "a.png" => PNG_BYTES.len() as u64,
            "b.jpg" => JPEG_BYTES.len() as u64,
            other => panic!("unexpected image in listing: {}", other),
        };
        assert_eq!(img["size"].as_u64().unwrap(), expected);
        assert!(img["url"]
            .as_str()
            .unwrap()
            .starts_with("/annotation-image/"));
    }
}

#[tokio::test]
async fn test_listing_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "notes.txt", b"text only");

    let router = router_for_data_dir(dir.path());
    let response = get(router, "/available-images/").await;

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["images"].as_array().unwrap().len(), 0);
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_listing_percent_encodes_names() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "my photo.jpg", JPEG_BYTES);

    let router = router_for_data_dir(dir.path());
    let body = body_json(get(router, "/available-images/").await).await;

    let url = body["images"][0]["url"].as_str().unwrap();
    assert_eq!(url, "/annotation-image/my%20photo.jpg");

    // Decoding the URL recovers the original name
    let encoded = url.strip_prefix("/annotation-image/").unwrap();
    assert_eq!(urlencoding::decode(encoded).unwrap(), "my photo.jpg");
}

// =============================================================================
// Graceful Degradation
// =============================================================================

#[tokio::test]
async fn test_listing_degrades_when_directory_unresolved() {
    // No candidate directory exists: still 200, empty, with an error marker
    let base = tempfile::tempdir().unwrap();
    let router = router_for_base(base.path());

    let response = get(router, "/available-images/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["images"].as_array().unwrap().len(), 0);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_listing_via_candidate_discovery() {
    let base = tempfile::tempdir().unwrap();
    let data = base.path().join("backend").join("image_data");
    std::fs::create_dir_all(&data).unwrap();
    write_file(&data, "a.png", PNG_BYTES);

    let router = router_for_base(base.path());
    let body = body_json(get(router, "/available-images/").await).await;

    let images = body["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["name"], "a.png");
}

// =============================================================================
// Debug Endpoint
// =============================================================================

#[tokio::test]
async fn test_debug_endpoint_not_mounted_by_default() {
    let dir = fixture_dir();
    let router = router_for_data_dir(dir.path());

    let response = get(router, "/debug/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_debug_endpoint_reports_candidates() {
    let base = tempfile::tempdir().unwrap();
    let data = base.path().join("image_data");
    std::fs::create_dir(&data).unwrap();
    write_file(&data, "a.png", PNG_BYTES);

    let store = ImageStore::new(base.path());
    let router = create_router(
        store,
        RouterConfig::new()
            .with_tracing(false)
            .with_debug_endpoint(true),
    );

    let response = get(router, "/debug/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(
        body["base_dir"].as_str().unwrap(),
        base.path().display().to_string()
    );
    assert!(body["data_dir"].is_null());
    assert!(body["cwd"].is_string());

    let candidates = body["candidates"].as_array().unwrap();
    assert_eq!(candidates.len(), 4);

    // The base/image_data candidate exists and lists the fixture file
    let existing = candidates
        .iter()
        .find(|c| c["exists"].as_bool().unwrap())
        .expect("one candidate should exist");
    assert!(existing["is_dir"].as_bool().unwrap());
    assert_eq!(existing["files"].as_array().unwrap().len(), 1);
    assert_eq!(existing["files"][0], "a.png");
}
