//! Test helpers: build the filedrop router against a temporary storage
//! directory and serve it through an in-process test server.

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use filedrop_api::setup::initialize_app;
use filedrop_core::{Config, ReceiptFormat, SizeLimits};
use tempfile::TempDir;

/// Domain the test configuration answers on. Kept at "localhost" so requests
/// from the in-process client never trip the main-domain redirect.
pub const TEST_DOMAIN: &str = "localhost";

/// Test application: server plus the owned storage directory.
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Names currently present in the storage directory.
    pub fn stored_names(&self) -> Vec<String> {
        if !self.upload_dir.exists() {
            return Vec::new();
        }
        std::fs::read_dir(&self.upload_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Build the app with the default test configuration, letting the caller
/// adjust it first.
pub async fn setup_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let upload_dir = temp_dir.path().join("uploads");

    let mut config = Config {
        domain: TEST_DOMAIN.to_string(),
        server_port: 8443,
        upload_dir: upload_dir.clone(),
        ssl_dir: temp_dir.path().join("ssl"),
        allowed_extensions: vec![],
        size_limits: SizeLimits::default(),
        retention_days: None,
        sweep_interval: Duration::from_secs(86_400),
        receipt_format: ReceiptFormat::BareUrl,
        cache_time_secs: 0,
    };
    configure(&mut config);

    let (_state, router) = initialize_app(config).await.expect("initialize app");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        upload_dir,
        _temp_dir: temp_dir,
    }
}

/// Multipart form carrying one file, the way uploader clients send it.
pub fn file_form(filename: &str, data: Vec<u8>) -> MultipartForm {
    let mime = mime_guess::from_path(filename).first_or_octet_stream();
    let part = Part::bytes(bytes::Bytes::from(data))
        .file_name(filename)
        .mime_type(mime.essence_str());
    MultipartForm::new().add_part("files[]", part)
}
