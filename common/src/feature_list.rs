//! 部屋ごとの設備（フィーチャー）選択リスト
//!
//! チェック状態・メモ・写真スロットはすべて生成時に採番した安定IDで管理する。
//! 表示順はサーバーから受け取った順序のまま。

use crate::upload::UploadedImageRef;
use serde::{Deserialize, Serialize};

/// 一覧に表示しない設備名
const HIDDEN_FEATURES: &[&str] = &["Light Fixtures", "Plumbing Issues (Leaks)"];

/// フィーチャーの安定ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureKey(u64);

/// 写真スロットの安定ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(u64);

impl SlotId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl FeatureKey {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// サーバーが返す部屋の設備候補
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureOption {
    pub id: u64,
    pub name: String,
}

/// 写真スロット
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoSlot {
    pub id: SlotId,
    pub image: Option<UploadedImageRef>,
    pub description: String,
}

/// 1設備分の選択状態
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSelection {
    pub key: FeatureKey,
    pub feature_id: u64,
    pub name: String,
    pub checked: bool,
    pub note: String,
    pub slots: Vec<PhotoSlot>,
}

impl FeatureSelection {
    pub fn display_name(&self) -> &str {
        if self.name == "Plumbing Fixtures" {
            "Plumbing"
        } else {
            &self.name
        }
    }

    /// メモ欄と写真欄はチェック時のみ表示
    pub fn shows_details(&self) -> bool {
        self.checked
    }

    /// アップロード済み画像（スロット順）
    pub fn images(&self) -> impl Iterator<Item = &UploadedImageRef> {
        self.slots.iter().filter_map(|s| s.image.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureList {
    next_id: u64,
    features: Vec<FeatureSelection>,
}

impl FeatureList {
    pub fn from_options(options: &[FeatureOption]) -> Self {
        let mut list = Self::default();
        for option in options {
            if HIDDEN_FEATURES.contains(&option.name.as_str()) {
                continue;
            }
            let key = FeatureKey(list.allocate());
            let slot = list.new_slot();
            list.features.push(FeatureSelection {
                key,
                feature_id: option.id,
                name: option.name.clone(),
                checked: false,
                note: String::new(),
                slots: vec![slot],
            });
        }
        list
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn new_slot(&mut self) -> PhotoSlot {
        PhotoSlot {
            id: SlotId(self.allocate()),
            image: None,
            description: String::new(),
        }
    }

    pub fn features(&self) -> &[FeatureSelection] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, key: FeatureKey) -> Option<&FeatureSelection> {
        self.features.iter().find(|f| f.key == key)
    }

    fn get_mut(&mut self, key: FeatureKey) -> Option<&mut FeatureSelection> {
        self.features.iter_mut().find(|f| f.key == key)
    }

    /// 設備IDから検索
    pub fn find_by_feature_id(&self, feature_id: u64) -> Option<&FeatureSelection> {
        self.features.iter().find(|f| f.feature_id == feature_id)
    }

    /// チェックを反転し、新しい状態を返す
    pub fn toggle(&mut self, key: FeatureKey) -> Option<bool> {
        let feature = self.get_mut(key)?;
        feature.checked = !feature.checked;
        Some(feature.checked)
    }

    pub fn set_checked(&mut self, key: FeatureKey, checked: bool) -> bool {
        match self.get_mut(key) {
            Some(feature) => {
                feature.checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn set_note(&mut self, key: FeatureKey, note: impl Into<String>) -> bool {
        match self.get_mut(key) {
            Some(feature) => {
                feature.note = note.into();
                true
            }
            None => false,
        }
    }

    /// 写真スロットを末尾に追加
    pub fn append_slot(&mut self, key: FeatureKey) -> Option<SlotId> {
        let slot = self.new_slot();
        let id = slot.id;
        self.get_mut(key)?.slots.push(slot);
        Some(id)
    }

    /// 写真スロットを削除（各設備に最低1つは残す）
    pub fn remove_slot(&mut self, slot: SlotId) -> bool {
        for feature in &mut self.features {
            if let Some(pos) = feature.slots.iter().position(|s| s.id == slot) {
                if feature.slots.len() <= 1 {
                    return false;
                }
                feature.slots.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn slot(&self, slot: SlotId) -> Option<&PhotoSlot> {
        self.features
            .iter()
            .flat_map(|f| f.slots.iter())
            .find(|s| s.id == slot)
    }

    fn slot_mut(&mut self, slot: SlotId) -> Option<&mut PhotoSlot> {
        self.features
            .iter_mut()
            .flat_map(|f| f.slots.iter_mut())
            .find(|s| s.id == slot)
    }

    /// スロットが属する設備
    pub fn owner_of(&self, slot: SlotId) -> Option<FeatureKey> {
        self.features
            .iter()
            .find(|f| f.slots.iter().any(|s| s.id == slot))
            .map(|f| f.key)
    }

    pub fn has_slot(&self, slot: SlotId) -> bool {
        self.slot(slot).is_some()
    }

    pub fn set_slot_image(&mut self, slot: SlotId, image: UploadedImageRef) -> bool {
        match self.slot_mut(slot) {
            Some(s) => {
                s.image = Some(image);
                true
            }
            None => false,
        }
    }

    pub fn set_slot_description(&mut self, slot: SlotId, description: impl Into<String>) -> bool {
        match self.slot_mut(slot) {
            Some(s) => {
                s.description = description.into();
                true
            }
            None => false,
        }
    }

    /// チェック済みの設備（表示順）
    pub fn checked(&self) -> impl Iterator<Item = &FeatureSelection> {
        self.features.iter().filter(|f| f.checked)
    }

    pub fn any_checked(&self) -> bool {
        self.features.iter().any(|f| f.checked)
    }

    /// チェック済み設備にアップロード済みの画像数
    pub fn uploaded_image_count(&self) -> usize {
        self.checked().map(|f| f.images().count()).sum()
    }

    /// 送信後の初期化: チェック・メモ・写真をすべて消去
    pub fn reset(&mut self) {
        let keys: Vec<FeatureKey> = self.features.iter().map(|f| f.key).collect();
        for key in keys {
            let slot = self.new_slot();
            if let Some(feature) = self.get_mut(key) {
                feature.checked = false;
                feature.note.clear();
                feature.slots = vec![slot];
            }
        }
    }
}

/// お問い合わせフォームなどの単純な写真リスト
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoList {
    next_id: u64,
    slots: Vec<PhotoSlot>,
}

impl Default for PhotoList {
    fn default() -> Self {
        let mut list = Self {
            next_id: 0,
            slots: Vec::new(),
        };
        list.append();
        list
    }
}

impl PhotoList {
    pub fn slots(&self) -> &[PhotoSlot] {
        &self.slots
    }

    pub fn append(&mut self) -> SlotId {
        let id = SlotId(self.next_id);
        self.next_id += 1;
        self.slots.push(PhotoSlot {
            id,
            image: None,
            description: String::new(),
        });
        id
    }

    pub fn remove(&mut self, slot: SlotId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.id != slot);
        before != self.slots.len()
    }

    pub fn slot(&self, slot: SlotId) -> Option<&PhotoSlot> {
        self.slots.iter().find(|s| s.id == slot)
    }

    pub fn set_image(&mut self, slot: SlotId, image: UploadedImageRef) -> bool {
        match self.slots.iter_mut().find(|s| s.id == slot) {
            Some(s) => {
                s.image = Some(image);
                true
            }
            None => false,
        }
    }

    pub fn set_description(&mut self, slot: SlotId, description: impl Into<String>) -> bool {
        match self.slots.iter_mut().find(|s| s.id == slot) {
            Some(s) => {
                s.description = description.into();
                true
            }
            None => false,
        }
    }

    /// アップロード済みの (画像参照, 説明) を表示順で返す
    pub fn uploaded(&self) -> Vec<(String, String)> {
        self.slots
            .iter()
            .filter_map(|s| {
                s.image
                    .as_ref()
                    .map(|img| (img.as_str().to_string(), s.description.clone()))
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.slots.clear();
        self.append();
    }
}
