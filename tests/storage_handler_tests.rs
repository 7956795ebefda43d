mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use common::TestApp;
use content_portal::storage::MockStorageService;

const BOUNDARY: &str = "----portal-test-boundary";

/// One part of a hand-built multipart body: (field name, optional file content type, bytes).
type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, content_type, data) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match content_type {
            Some(ct) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload.bin\"\r\nContent-Type: {ct}\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(token: Option<&str>, parts: &[Part<'_>]) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/admin/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(multipart_body(parts))).unwrap()
}

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

#[tokio::test]
async fn test_upload_stores_file_under_folder() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let (status, body) = app
        .send(upload_request(
            Some(&token),
            &[
                ("folder", None, b"News".as_slice()),
                ("file", Some("image/png"), PNG_BYTES),
            ],
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "File uploaded");
    let data = &body["data"];
    let key = data["key"].as_str().unwrap();
    assert!(key.starts_with("uploads/news/"), "key was {key}");
    assert!(key.ends_with(".png"));
    assert!(data["url"].as_str().unwrap().ends_with(key));
    assert_eq!(data["size"], PNG_BYTES.len());
    assert_eq!(data["contentType"], "image/png");
}

#[tokio::test]
async fn test_upload_without_folder_uses_default() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let (status, body) = app
        .send(upload_request(
            Some(&token),
            &[("file", Some("application/pdf"), b"%PDF-1.7 body".as_slice())],
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let key = body["data"]["key"].as_str().unwrap();
    assert!(key.starts_with("uploads/misc/"));
    assert!(key.ends_with(".pdf"));
}

#[tokio::test]
async fn test_storage_failure_is_a_generic_500() {
    let app = TestApp::with_storage(MockStorageService::new_failing());
    let token = app.admin_token().await;

    let (status, body) = app
        .send(upload_request(
            Some(&token),
            &[("file", Some("image/png"), PNG_BYTES)],
        ))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "An internal server error occurred");
}

#[tokio::test]
async fn test_upload_rejects_bad_input() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let (status, body) = app
        .send(upload_request(
            Some(&token),
            &[("file", Some("application/x-msdownload"), b"MZ".as_slice())],
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unsupported file type: application/x-msdownload");

    let (status, body) = app
        .send(upload_request(Some(&token), &[("folder", None, b"news".as_slice())]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file provided");

    let (status, body) = app
        .send(upload_request(Some(&token), &[("file", Some("image/png"), b"".as_slice())]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Uploaded file is empty");
}

#[tokio::test]
async fn test_upload_is_admin_only() {
    let app = TestApp::new();
    let token = app.user_token().await;
    let parts: &[Part<'_>] = &[("file", Some("image/png"), PNG_BYTES)];

    let (status, _) = app.send(upload_request(Some(&token), parts)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(upload_request(None, parts)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
