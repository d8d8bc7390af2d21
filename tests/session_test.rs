//! セッションファイルテスト
//!
//! ファイル保存のキー・バリューストアとSessionStoreの組み合わせを検証

use dazl_common::forms::ClientDetails;
use dazl_common::storage::{KeyValueStore, PriceBounds, SessionStore, UserType, TOKEN};
use dazl_rust::session::FileStore;
use tempfile::tempdir;

/// 存在しないファイルは空のセッション
#[test]
fn test_missing_file_is_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = FileStore::load(&dir.path().join("session.json"));
    assert!(store.is_empty());
    assert_eq!(store.get(TOKEN), None);
}

/// 書き込みはファイルに残り、再読み込みで復元される
#[test]
fn test_session_persists_across_loads() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("session.json");

    let mut session = SessionStore::new(FileStore::load(&path));
    session.start_session("tok-9", UserType::Customer, Some("31")).unwrap();
    session
        .save_client_details(&ClientDetails {
            first_name: "Ada".into(),
            last_name: "Lee".into(),
            email: "ada@example.com".into(),
            location: "12 Oak Ave".into(),
        })
        .unwrap();
    assert!(path.exists());

    let reloaded = SessionStore::new(FileStore::load(&path));
    assert_eq!(reloaded.token().as_deref(), Some("tok-9"));
    assert_eq!(reloaded.user_type(), Some(UserType::Customer));
    assert_eq!(reloaded.user_id().as_deref(), Some("31"));
    assert_eq!(reloaded.price_bounds(), Some(PriceBounds::default()));
    assert_eq!(reloaded.client_details().unwrap().unwrap().first_name, "Ada");
}

/// ログアウトで全キーが消える
#[test]
fn test_reset_clears_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("session.json");

    let mut session = SessionStore::new(FileStore::load(&path));
    session.start_session("tok", UserType::Agent, None).unwrap();
    session.select_room("4", "Garage").unwrap();
    session.reset().unwrap();

    let reloaded = FileStore::load(&path);
    assert!(reloaded.is_empty());
}

/// 壊れたファイルは空として扱う
#[test]
fn test_corrupt_file_starts_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = FileStore::load(&path);
    assert!(store.is_empty());
}

/// バージョン違いのファイルは破棄
#[test]
fn test_version_mismatch_starts_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("session.json");
    std::fs::write(&path, r#"{"version":99,"entries":{"token":"old"}}"#).unwrap();

    let store = FileStore::load(&path);
    assert_eq!(store.get(TOKEN), None);
}

/// セッションファイルの削除
#[test]
fn test_clear_session_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("session.json");

    let mut store = FileStore::load(&path);
    store.set(TOKEN, "x").unwrap();
    assert_eq!(store.len(), 1);

    assert!(FileStore::clear(&path).unwrap());
    assert!(!FileStore::clear(&path).unwrap());
}
