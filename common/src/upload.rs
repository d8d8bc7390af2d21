//! 画像アップロードのスロット状態
//!
//! ファイル選択 → MIME検査 → 送信 → 応答の反映、をスロットIDごとに追跡する。
//! 通信そのものはプラットフォーム側（CLI: reqwest / Web: gloo）が担当する。
//!
//! 同一スロットで複数のアップロードが競合した場合は「最後に開始したもの」が勝つ。
//! 古い世代の応答は破棄される。

use crate::feature_list::{FeatureList, PhotoList, SlotId};
use crate::validation::{validate_image_file, FileError, FileMeta};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// アップロードAPIが返す画像参照
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadedImageRef(String);

impl UploadedImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// アップロードAPIのレスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub image: String,
}

impl From<UploadResponse> for UploadedImageRef {
    fn from(response: UploadResponse) -> Self {
        Self(response.image)
    }
}

/// 画像を保持できるスロット集合
pub trait ImageSlots {
    fn has_slot(&self, slot: SlotId) -> bool;
    fn store_image(&mut self, slot: SlotId, image: UploadedImageRef) -> bool;
    /// 送信可否の判定対象となるスロット
    fn active_slots(&self) -> Vec<SlotId>;
}

impl ImageSlots for FeatureList {
    fn has_slot(&self, slot: SlotId) -> bool {
        FeatureList::has_slot(self, slot)
    }

    fn store_image(&mut self, slot: SlotId, image: UploadedImageRef) -> bool {
        self.set_slot_image(slot, image)
    }

    // 未チェックの設備は送信されないので対象外
    fn active_slots(&self) -> Vec<SlotId> {
        self.checked()
            .flat_map(|f| f.slots.iter().map(|s| s.id))
            .collect()
    }
}

impl ImageSlots for PhotoList {
    fn has_slot(&self, slot: SlotId) -> bool {
        self.slot(slot).is_some()
    }

    fn store_image(&mut self, slot: SlotId, image: UploadedImageRef) -> bool {
        self.set_image(slot, image)
    }

    fn active_slots(&self) -> Vec<SlotId> {
        self.slots().iter().map(|s| s.id).collect()
    }
}

/// 送信中アップロードの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    pub slot: SlotId,
    generation: u64,
}

/// 応答反映の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Stored(UploadedImageRef),
    Failed(String),
    /// 同じスロットで新しいアップロードが開始済み
    Superseded,
    /// スロットが削除済み
    SlotGone,
}

#[derive(Debug, Clone, Default)]
struct SlotState {
    generation: u64,
    in_flight: bool,
    error: Option<String>,
}

/// スロットごとのアップロード状態
#[derive(Debug, Clone, Default)]
pub struct UploadSlots {
    states: HashMap<SlotId, SlotState>,
}

impl UploadSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// アップロード開始。不正なファイルはここで弾かれ送信されない
    pub fn begin(&mut self, slot: SlotId, file: &FileMeta) -> Result<UploadTicket, FileError> {
        let state = self.states.entry(slot).or_default();
        // 不正なファイルの選択も最新の操作として先行アップロードを無効にする
        state.generation += 1;
        if let Err(err) = validate_image_file(file) {
            state.in_flight = false;
            state.error = Some(err.to_string());
            return Err(err);
        }
        state.in_flight = true;
        state.error = None;
        Ok(UploadTicket {
            slot,
            generation: state.generation,
        })
    }

    /// アップロード結果を反映する。失敗時は既存の画像参照を残す
    pub fn complete<T: ImageSlots>(
        &mut self,
        target: &mut T,
        ticket: UploadTicket,
        result: Result<UploadedImageRef, String>,
    ) -> UploadOutcome {
        if !target.has_slot(ticket.slot) {
            self.states.remove(&ticket.slot);
            return UploadOutcome::SlotGone;
        }
        let state = self.states.entry(ticket.slot).or_default();
        if state.generation != ticket.generation {
            return UploadOutcome::Superseded;
        }
        state.in_flight = false;
        match result {
            Ok(image) => {
                target.store_image(ticket.slot, image.clone());
                state.error = None;
                UploadOutcome::Stored(image)
            }
            Err(message) => {
                state.error = Some(message.clone());
                UploadOutcome::Failed(message)
            }
        }
    }

    pub fn error(&self, slot: SlotId) -> Option<&str> {
        self.states.get(&slot).and_then(|s| s.error.as_deref())
    }

    pub fn is_pending(&self, slot: SlotId) -> bool {
        self.states.get(&slot).map(|s| s.in_flight).unwrap_or(false)
    }

    pub fn pending(&self) -> usize {
        self.states.values().filter(|s| s.in_flight).count()
    }

    /// スロット削除時に状態を破棄
    pub fn forget(&mut self, slot: SlotId) {
        self.states.remove(&slot);
    }

    pub fn reset(&mut self) {
        self.states.clear();
    }

    /// 送信可能か判定（アップロード中・エラーありのスロットがあれば不可）
    pub fn ensure_ready<T: ImageSlots>(&self, target: &T) -> Result<(), String> {
        for slot in target.active_slots() {
            if self.is_pending(slot) {
                return Err("Please wait until all images finish uploading".to_string());
            }
            if let Some(error) = self.error(slot) {
                return Err(error.to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_list::FeatureOption;

    fn list() -> FeatureList {
        FeatureList::from_options(&[
            FeatureOption { id: 1, name: "Cabinets".into() },
            FeatureOption { id: 2, name: "Counters".into() },
        ])
    }

    fn jpeg() -> FileMeta {
        FileMeta::new("sink.jpg", "image/jpeg", 2048)
    }

    #[test]
    fn test_invalid_file_is_not_forwarded() {
        let list = list();
        let slot = list.features()[0].slots[0].id;
        let mut uploads = UploadSlots::new();

        let result = uploads.begin(slot, &FileMeta::new("doc.pdf", "application/pdf", 10));
        assert!(matches!(result, Err(FileError::InvalidType(_))));
        assert_eq!(
            uploads.error(slot),
            Some("Invalid file type. Please select a valid image.")
        );
        assert!(!uploads.is_pending(slot));
        assert_eq!(uploads.pending(), 0);
    }

    #[test]
    fn test_successful_upload_stores_reference() {
        let mut list = list();
        let slot = list.features()[0].slots[0].id;
        let mut uploads = UploadSlots::new();

        let ticket = uploads.begin(slot, &jpeg()).unwrap();
        assert!(uploads.is_pending(slot));
        assert!(list.slot(slot).unwrap().image.is_none());

        let outcome = uploads.complete(&mut list, ticket, Ok(UploadedImageRef::new("img/1.jpg")));
        assert_eq!(outcome, UploadOutcome::Stored(UploadedImageRef::new("img/1.jpg")));
        assert_eq!(list.slot(slot).unwrap().image, Some(UploadedImageRef::new("img/1.jpg")));
        assert!(!uploads.is_pending(slot));
    }

    #[test]
    fn test_failure_keeps_previous_reference() {
        let mut list = list();
        let slot = list.features()[0].slots[0].id;
        let mut uploads = UploadSlots::new();

        let ticket = uploads.begin(slot, &jpeg()).unwrap();
        uploads.complete(&mut list, ticket, Ok(UploadedImageRef::new("old.jpg")));

        let ticket = uploads.begin(slot, &jpeg()).unwrap();
        let outcome = uploads.complete(&mut list, ticket, Err("server error".into()));
        assert_eq!(outcome, UploadOutcome::Failed("server error".into()));
        assert_eq!(list.slot(slot).unwrap().image, Some(UploadedImageRef::new("old.jpg")));
        assert_eq!(uploads.error(slot), Some("server error"));
    }

    #[test]
    fn test_last_started_upload_wins() {
        let mut list = list();
        let slot = list.features()[0].slots[0].id;
        let mut uploads = UploadSlots::new();

        let first = uploads.begin(slot, &jpeg()).unwrap();
        let second = uploads.begin(slot, &jpeg()).unwrap();

        // 後発が先に返る
        let outcome = uploads.complete(&mut list, second, Ok(UploadedImageRef::new("new.jpg")));
        assert!(matches!(outcome, UploadOutcome::Stored(_)));
        let outcome = uploads.complete(&mut list, first, Ok(UploadedImageRef::new("stale.jpg")));
        assert_eq!(outcome, UploadOutcome::Superseded);
        assert_eq!(list.slot(slot).unwrap().image, Some(UploadedImageRef::new("new.jpg")));
    }

    #[test]
    fn test_rejected_file_supersedes_upload_in_flight() {
        let mut list = list();
        let slot = list.features()[0].slots[0].id;
        let mut uploads = UploadSlots::new();

        let ticket = uploads.begin(slot, &jpeg()).unwrap();
        assert!(uploads.begin(slot, &FileMeta::new("notes.txt", "text/plain", 5)).is_err());
        assert!(!uploads.is_pending(slot));

        let outcome = uploads.complete(&mut list, ticket, Ok(UploadedImageRef::new("late.jpg")));
        assert_eq!(outcome, UploadOutcome::Superseded);
        assert!(list.slot(slot).unwrap().image.is_none());
        assert_eq!(
            uploads.error(slot),
            Some("Invalid file type. Please select a valid image.")
        );
    }

    #[test]
    fn test_completion_for_removed_slot_is_dropped() {
        let mut list = list();
        let key = list.features()[1].key;
        let extra = list.append_slot(key).unwrap();
        let mut uploads = UploadSlots::new();

        let ticket = uploads.begin(extra, &jpeg()).unwrap();
        assert!(list.remove_slot(extra));
        let outcome = uploads.complete(&mut list, ticket, Ok(UploadedImageRef::new("x.jpg")));
        assert_eq!(outcome, UploadOutcome::SlotGone);
        assert_eq!(uploads.pending(), 0);
    }

    #[test]
    fn test_ensure_ready_only_considers_checked_features() {
        let mut list = list();
        let checked = list.features()[0].key;
        let checked_slot = list.features()[0].slots[0].id;
        let unchecked_slot = list.features()[1].slots[0].id;
        let mut uploads = UploadSlots::new();

        let _ = uploads.begin(unchecked_slot, &FileMeta::new("a.gif", "image/gif", 1));
        assert!(uploads.ensure_ready(&list).is_ok());

        list.set_checked(checked, true);
        let ticket = uploads.begin(checked_slot, &jpeg()).unwrap();
        assert!(uploads.ensure_ready(&list).is_err());

        uploads.complete(&mut list, ticket, Ok(UploadedImageRef::new("ok.jpg")));
        assert!(uploads.ensure_ready(&list).is_ok());
    }

    #[test]
    fn test_photo_list_slots() {
        let mut photos = PhotoList::default();
        let slot = photos.slots()[0].id;
        let mut uploads = UploadSlots::new();
        let ticket = uploads.begin(slot, &FileMeta::new("a.png", "image/png", 5)).unwrap();
        uploads.complete(&mut photos, ticket, Ok(UploadedImageRef::new("a.png")));
        assert_eq!(photos.uploaded(), vec![("a.png".to_string(), String::new())]);
    }
}
