//! クライアント側キー・バリューストアの型付きアクセサ
//!
//! 画面から直接キーを読み書きせず、`SessionStore` を通して扱う。
//! 実体はCLIではJSONファイル、WebではlocalStorage、テストではメモリ。

use crate::error::{Error, Result};
use crate::forms::{ClientDetails, PriceRange};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const TOKEN: &str = "token";
pub const USER_TYPE: &str = "userType";
pub const USER_ID: &str = "userId";
pub const PHD_USER_DETAIL: &str = "phdUserDetail";
pub const LOWEST_VALUE: &str = "lowestValue";
pub const MID_VALUE: &str = "midValue";
pub const MAX_VALUE: &str = "maxValue";
pub const SAVED_STEP: &str = "saved1";
pub const ROOM_ID: &str = "roomId";
pub const ROOM_SELECT: &str = "roomselect";
pub const SAVED_ROOMS: &str = "value";
pub const PROJECT_ITEM: &str = "projectItem";

/// 部屋選択に関わるキー（送信完了時に消去）
const ROOM_SELECTION_KEYS: &[&str] = &[ROOM_SELECT, ROOM_ID, SAVED_ROOMS, PROJECT_ITEM];

/// 文字列キー・バリューストア
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// テスト用のメモリストア
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// ユーザー種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Agent,
    Customer,
    Professional,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Agent => "agent",
            UserType::Customer => "customer",
            UserType::Professional => "professional",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "agent" => Some(UserType::Agent),
            "customer" => Some(UserType::Customer),
            "professional" => Some(UserType::Professional),
            _ => None,
        }
    }
}

/// 価格スライダーの既定値
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBounds {
    pub lowest: u32,
    pub mid: u32,
    pub max: u32,
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self {
            lowest: 500,
            mid: 750,
            max: 1000,
        }
    }
}

/// 型付きセッションストア
#[derive(Debug, Clone, Default)]
pub struct SessionStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    // --- 認証 ---

    /// ログイン・登録成功時に呼ぶ
    pub fn start_session(&mut self, token: &str, user_type: UserType, user_id: Option<&str>) -> Result<()> {
        self.store.set(TOKEN, token)?;
        self.store.set(USER_TYPE, user_type.as_str())?;
        match user_id {
            Some(id) => self.store.set(USER_ID, id),
            None => self.store.remove(USER_ID),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN).filter(|t| !t.is_empty())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn user_type(&self) -> Option<UserType> {
        self.store.get(USER_TYPE).as_deref().and_then(UserType::parse)
    }

    pub fn user_id(&self) -> Option<String> {
        self.store.get(USER_ID)
    }

    // --- PHD作成 ---

    /// ステップ1完了: 売主情報を保存し、スライダー既定値を初期化
    pub fn save_client_details(&mut self, details: &ClientDetails) -> Result<()> {
        let json = serde_json::to_string(details)?;
        self.store.set(PHD_USER_DETAIL, &json)?;
        self.set_price_bounds(PriceBounds::default())?;
        self.store.remove(SAVED_STEP)
    }

    pub fn client_details(&self) -> Result<Option<ClientDetails>> {
        self.read_json(PHD_USER_DETAIL)
    }

    pub fn set_price_bounds(&mut self, bounds: PriceBounds) -> Result<()> {
        self.store.set(LOWEST_VALUE, &bounds.lowest.to_string())?;
        self.store.set(MID_VALUE, &bounds.mid.to_string())?;
        self.store.set(MAX_VALUE, &bounds.max.to_string())
    }

    /// 確定した価格レンジをスライダー値として保存
    pub fn save_price_range(&mut self, range: &PriceRange) -> Result<()> {
        self.set_price_bounds(PriceBounds {
            lowest: range.low,
            mid: range.value,
            max: range.high,
        })
    }

    pub fn price_bounds(&self) -> Option<PriceBounds> {
        let read = |key: &str| self.store.get(key).and_then(|v| v.parse::<u32>().ok());
        Some(PriceBounds {
            lowest: read(LOWEST_VALUE)?,
            mid: read(MID_VALUE)?,
            max: read(MAX_VALUE)?,
        })
    }

    // --- 部屋選択 ---

    pub fn select_room(&mut self, room_id: &str, room_name: &str) -> Result<()> {
        self.store.set(ROOM_ID, room_id)?;
        self.store.set(ROOM_SELECT, room_name)
    }

    pub fn room_id(&self) -> Option<String> {
        self.store.get(ROOM_ID).filter(|id| !id.is_empty())
    }

    pub fn selected_room_name(&self) -> Option<String> {
        self.store.get(ROOM_SELECT)
    }

    /// 「Add another room」で保存済みの部屋
    pub fn saved_rooms(&self) -> Result<Vec<Value>> {
        Ok(self.read_json(SAVED_ROOMS)?.unwrap_or_default())
    }

    pub fn push_saved_rooms(&mut self, rooms: Vec<Value>) -> Result<()> {
        let mut saved = self.saved_rooms()?;
        saved.extend(rooms);
        let json = serde_json::to_string(&saved)?;
        self.store.set(SAVED_ROOMS, &json)
    }

    /// 送信完了後に部屋選択関連のキーを消去
    pub fn clear_room_selection(&mut self) -> Result<()> {
        for key in ROOM_SELECTION_KEYS {
            self.store.remove(key)?;
        }
        Ok(())
    }

    /// ログアウト: すべてのキーを消去
    pub fn reset(&mut self) -> Result<()> {
        for key in [
            TOKEN,
            USER_TYPE,
            USER_ID,
            PHD_USER_DETAIL,
            LOWEST_VALUE,
            MID_VALUE,
            MAX_VALUE,
            SAVED_STEP,
        ] {
            self.store.remove(key)?;
        }
        self.clear_room_selection()
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key) {
            Some(raw) if !raw.is_empty() && raw != "null" => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| Error::Storage(format!("{}: {}", key, e))),
            _ => Ok(None),
        }
    }
}
