mod helpers;

use filedrop_core::{ReceiptFormat, SizeLimits};
use helpers::{file_form, setup_test_app, setup_test_app_with};

fn jpg_png_with_image_limit(limit: u64) -> impl FnOnce(&mut filedrop_core::Config) {
    move |config| {
        config.allowed_extensions = vec![".jpg".to_string(), ".png".to_string()];
        config.size_limits = SizeLimits {
            image: Some(limit),
            ..Default::default()
        };
    }
}

#[tokio::test]
async fn accepted_upload_returns_a_public_url() {
    let app = setup_test_app_with(jpg_png_with_image_limit(1000)).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("photo.png", vec![0u8; 500]))
        .await;

    assert_eq!(response.status_code(), 200);
    let url = response.text();
    assert!(url.starts_with("https://localhost:8443/uploads/"));
    assert!(url.ends_with("-photo.png"));

    let stored = app.stored_names();
    assert_eq!(stored.len(), 1);
    assert!(url.ends_with(&stored[0]));
}

#[tokio::test]
async fn disallowed_extension_is_rejected_with_400() {
    let app = setup_test_app_with(jpg_png_with_image_limit(1000)).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("movie.exe", vec![0u8; 10]))
        .await;

    assert_eq!(response.status_code(), 400);
    let body = response.text();
    assert!(body.starts_with("File type not allowed"), "body: {body}");
    assert!(body.contains(".jpg"));
    assert!(app.stored_names().is_empty());
}

#[tokio::test]
async fn oversized_upload_is_rejected_with_400() {
    let app = setup_test_app_with(jpg_png_with_image_limit(1000)).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("big.jpg", vec![0u8; 2000]))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(response.text().contains("File too large"));
    assert!(app.stored_names().is_empty());
}

#[tokio::test]
async fn upload_exactly_at_the_limit_is_accepted() {
    let app = setup_test_app_with(jpg_png_with_image_limit(1000)).await;

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("edge.png", vec![0u8; 1000]))
        .await;

    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn empty_allow_list_accepts_any_extension() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("archive.zip", vec![0u8; 64]))
        .await;

    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn attachment_json_receipt_when_configured() {
    let app = setup_test_app_with(|config| {
        config.receipt_format = ReceiptFormat::AttachmentJson;
    })
    .await;

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("photo.png", vec![0u8; 32]))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    let attachment = &body["attachments"][0];
    let url = attachment["url"].as_str().unwrap();
    assert!(url.ends_with("-photo.png"));
    assert_eq!(attachment["proxy_url"], attachment["url"]);
}

#[tokio::test]
async fn multipart_without_a_file_is_rejected() {
    let app = setup_test_app().await;

    let form = axum_test::multipart::MultipartForm::new().add_text("note", "no file here");
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.text(), "No file provided");
}
