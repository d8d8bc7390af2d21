//! セッションファイル
//!
//! ブラウザのlocalStorageに相当するキー・バリューをJSONファイルに保存する。
//! 書き込みのたびにファイルへ反映する。

use dazl_common::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionData {
    /// バージョン（互換性チェック用）
    version: u32,
    entries: BTreeMap<String, String>,
}

impl Default for SessionData {
    fn default() -> Self {
        Self {
            version: FileStore::CURRENT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// JSONファイルに保存するキー・バリューストア
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    data: SessionData,
}

impl FileStore {
    const CURRENT_VERSION: u32 = 1;

    /// セッションファイルを読み込み（壊れていれば空で開始）
    pub fn load(path: &Path) -> Self {
        let data = Self::read(path).unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            data,
        }
    }

    fn read(path: &Path) -> Option<SessionData> {
        if !path.exists() {
            return None;
        }
        let file = File::open(path).ok()?;
        match serde_json::from_reader::<_, SessionData>(BufReader::new(file)) {
            Ok(data) if data.version == Self::CURRENT_VERSION => Some(data),
            Ok(_) => {
                warn!("セッションファイルのバージョン不一致、破棄します: {}", path.display());
                None
            }
            Err(e) => {
                warn!("セッションファイルを読めません ({}): {}", path.display(), e);
                None
            }
        }
    }

    pub fn save(&self) -> dazl_common::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.data)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.data.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.entries.is_empty()
    }

    /// セッションファイルを削除
    pub fn clear(path: &Path) -> std::io::Result<bool> {
        if path.exists() {
            std::fs::remove_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> dazl_common::Result<()> {
        self.data.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> dazl_common::Result<()> {
        if self.data.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}
