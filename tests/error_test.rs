//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use dazl_common::forms::AgentSignup;
use dazl_common::validation::FormValues;
use dazl_rust::commands::failure_notice;
use dazl_rust::error::DazlError;
use dazl_rust::project::LocalImage;
use std::path::Path;
use tempfile::tempdir;

/// 存在しない画像ファイル
#[test]
fn test_missing_image_file() {
    let result = LocalImage::from_path(Path::new("/nonexistent/path/12345.jpg"));
    assert!(matches!(result, Err(DazlError::FileNotFound(_))));
}

/// 画像でない拡張子
#[test]
fn test_unsupported_image_extension() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();

    let result = LocalImage::from_path(&path);
    assert!(matches!(result, Err(DazlError::UnsupportedImage(_))));
}

/// 画像ファイルのメタ情報
#[test]
fn test_local_image_meta() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("kitchen.png");
    std::fs::write(&path, [0u8; 64]).unwrap();

    let image = LocalImage::from_path(&path).unwrap();
    assert_eq!(image.meta.name, "kitchen.png");
    assert_eq!(image.meta.mime_type, "image/png");
    assert_eq!(image.meta.size, 64);
}

/// 入力エラーは最初のメッセージを通知に使う
#[test]
fn test_validation_error_notice() {
    let errors = AgentSignup::schema().validate(&FormValues::new()).unwrap_err();
    let err = DazlError::from(errors);

    let notice = failure_notice(&err);
    assert!(notice.is_error());
    assert_eq!(notice.message, "First Name is required");
    assert!(err.to_string().starts_with("入力エラー: firstName: First Name is required"));
}

/// APIエラーはサーバーのメッセージをそのまま通知する
#[test]
fn test_api_error_notice() {
    let err = DazlError::Api {
        status: 401,
        message: "Invalid credentials".into(),
    };
    assert_eq!(failure_notice(&err).message, "Invalid credentials");
    assert_eq!(err.to_string(), "APIエラー (401): Invalid credentials");
}

/// DazlErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        DazlError::Config("テスト設定エラー".to_string()),
        DazlError::NotLoggedIn,
        DazlError::FileNotFound("test.jpg".to_string()),
        DazlError::UnsupportedImage("a.txt".to_string()),
        DazlError::UploadPending("Please wait until all images finish uploading".to_string()),
        DazlError::Cancelled,
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "Error display should not be empty");
    }
}

/// 共通ライブラリのアップロード未完了はCLIのエラーに揃える
#[test]
fn test_common_upload_pending_maps_to_cli_error() {
    let err: DazlError = dazl_common::Error::UploadPending("Upload failed".to_string()).into();
    assert!(matches!(err, DazlError::UploadPending(ref m) if m == "Upload failed"));

    let err: DazlError = dazl_common::Error::Storage("quota".to_string()).into();
    assert!(matches!(err, DazlError::Common(_)));
}
