//! localStorage によるセッション保存

use dazl_common::storage::{KeyValueStore, SessionStore};
use gloo::storage::{LocalStorage, Storage};

/// ブラウザの localStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> dazl_common::Result<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| dazl_common::Error::Storage(format!("{:?}", e)))
    }

    fn remove(&mut self, key: &str) -> dazl_common::Result<()> {
        LocalStorage::raw()
            .remove_item(key)
            .map_err(|e| dazl_common::Error::Storage(format!("{:?}", e)))
    }
}

/// 現在のセッション
pub fn session() -> SessionStore<LocalStore> {
    SessionStore::new(LocalStore)
}
