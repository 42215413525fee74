// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /api/face/upload, including the round trip through the embeddings endpoint

use crate::common::{app, jpeg_bytes, padded_jpeg_bytes, StubEmbedder};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use face_embedding_service::api::face::MAX_UPLOAD_BODY_BYTES;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn upload(body: String) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/face/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_upload_then_fetch() {
    let root = tempfile::tempdir().unwrap();
    let image = format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg_bytes(96, 96, 4)));
    let body = json!({
        "companyId": 21,
        "employeeNumber": "E7",
        "imageBase64": image,
    });

    let (status, response) = send(app(root.path(), StubEmbedder), upload(body.to_string())).await;
    assert_eq!(status, StatusCode::OK, "{}", response);
    assert_eq!(response["success"], true);
    let file = response["file"].as_str().unwrap();
    assert!(file.starts_with("E7_") && file.ends_with(".jpg"));
    assert!(root.path().join("21").join(file).is_file());

    let fetch = Request::builder()
        .uri("/api/face/embeddings?companyId=21")
        .body(Body::empty())
        .unwrap();
    let (status, response) = send(app(root.path(), StubEmbedder), fetch).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"][0]["label"], "E7");
}

#[tokio::test]
async fn test_upload_validation_errors() {
    let root = tempfile::tempdir().unwrap();
    let good_image = STANDARD.encode(jpeg_bytes(16, 16, 1));

    let cases = [
        json!({ "employeeNumber": "E1", "imageBase64": good_image }),
        json!({ "companyId": "abc", "employeeNumber": "E1", "imageBase64": good_image }),
        json!({ "companyId": 1, "imageBase64": good_image }),
        json!({ "companyId": 1, "employeeNumber": "E_1", "imageBase64": good_image }),
        json!({ "companyId": 1, "employeeNumber": "E1" }),
        json!({ "companyId": 1, "employeeNumber": "E1", "imageBase64": "!!!" }),
        json!({ "companyId": 1, "employeeNumber": "E1", "imageBase64": STANDARD.encode(b"plain text") }),
    ];

    for case in cases {
        let (status, body) = send(app(root.path(), StubEmbedder), upload(case.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", case);
        assert_eq!(body["success"], false);
    }
    assert!(!root.path().join("1").exists());
}

#[tokio::test]
async fn test_upload_malformed_json() {
    let root = tempfile::tempdir().unwrap();
    let (status, body) = send(app(root.path(), StubEmbedder), upload("{not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorType"], "invalid_request");
}

#[tokio::test]
async fn test_upload_large_image() {
    let root = tempfile::tempdir().unwrap();
    let image = padded_jpeg_bytes(64, 64, 3 * 1024 * 1024);
    let body = json!({
        "companyId": 8,
        "employeeNumber": "E9",
        "imageBase64": STANDARD.encode(&image),
    })
    .to_string();
    assert!(body.len() > 4 * 1024 * 1024);

    let (status, response) = send(app(root.path(), StubEmbedder), upload(body)).await;
    assert_eq!(status, StatusCode::OK, "{}", response);
    let file = response["file"].as_str().unwrap();
    let stored = std::fs::metadata(root.path().join("8").join(file)).unwrap();
    assert!(stored.len() >= 3 * 1024 * 1024);
}

#[tokio::test]
async fn test_upload_body_over_limit() {
    let root = tempfile::tempdir().unwrap();
    let body = json!({
        "companyId": 8,
        "employeeNumber": "E9",
        "imageBase64": "A".repeat(MAX_UPLOAD_BODY_BYTES),
    })
    .to_string();

    let (status, response) = send(app(root.path(), StubEmbedder), upload(body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response["success"], false);
    assert_eq!(response["errorType"], "payload_too_large");
    assert_eq!(response["details"]["limit"], MAX_UPLOAD_BODY_BYTES);
    assert!(!root.path().join("8").exists());
}
