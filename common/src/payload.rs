//! 部屋・設備の送信ペイロード
//!
//! 送信の種類ごとに `RoomSubmission` のバリアントを1つ割り当てる。
//! どのバリアントになるかは `SubmissionBuilder` が操作とウィザード状態から決める。

use crate::error::Result;
use crate::feature_list::{FeatureList, FeatureSelection};
use crate::routes::Route;
use crate::upload::UploadedImageRef;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// プロジェクトの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectKind {
    /// エージェントが作成する案件
    Realtor,
    /// ホームオーナーが作成する案件
    HomeOwner,
}

impl ProjectKind {
    /// 送信先コレクション名
    pub fn collection(&self) -> &'static str {
        match self {
            ProjectKind::Realtor => "realtorprojects",
            ProjectKind::HomeOwner => "projects",
        }
    }

    /// 送信完了後の遷移先
    pub fn results_route(&self) -> Route {
        match self {
            ProjectKind::Realtor => Route::AgentProjects,
            ProjectKind::HomeOwner => Route::HomeOwnerProjects,
        }
    }
}

/// 部屋IDのみのエントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRef {
    pub room_id: String,
}

/// チェック済み設備1件分のエントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureEntry {
    pub room_id: String,
    pub features: u64,
    pub inspection_notes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<UploadedImageRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_desc: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_option_issues: Vec<String>,
    #[serde(rename = "realtor_id", default, skip_serializing_if = "Option::is_none")]
    pub realtor_id: Option<String>,
}

impl FeatureEntry {
    fn from_selection(room_id: &str, realtor_id: Option<&str>, feature: &FeatureSelection) -> Self {
        // images[i] と image_desc[i] は同じスロット
        let (images, mut image_desc): (Vec<_>, Vec<String>) = feature
            .slots
            .iter()
            .filter_map(|s| s.image.clone().map(|image| (image, s.description.clone())))
            .unzip();
        if image_desc.iter().all(String::is_empty) {
            image_desc.clear();
        }
        Self {
            room_id: room_id.to_string(),
            features: feature.feature_id,
            inspection_notes: feature.note.clone(),
            images,
            image_desc,
            feature_option_issues: Vec::new(),
            realtor_id: realtor_id.map(str::to_string),
        }
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

/// 部屋追加APIに送る1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoomEntry {
    Feature(FeatureEntry),
    Room(RoomRef),
}

/// プロジェクト送信APIのボディ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectBody {
    pub data: Vec<Value>,
    pub name: String,
}

/// ユーザー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitAction {
    /// 「Add another room」
    AddAnother,
    /// 「Submit」
    Submit,
}

/// 送信の種類
#[derive(Debug, Clone, PartialEq)]
pub enum RoomSubmission {
    /// 最初の部屋、設備チェックなし
    NewRoom { room_id: String },
    /// 最初の部屋、チェック済み設備あり（画像は任意）
    NewRoomWithFeatures {
        room_id: String,
        features: Vec<FeatureEntry>,
    },
    /// 部屋を保存してウィザードを継続
    AddAnotherRoom {
        room_id: String,
        features: Vec<FeatureEntry>,
    },
    /// 保存済みの部屋に現在の部屋を加えて最終送信
    FinalSubmission {
        saved_rooms: Vec<Value>,
        room_id: String,
        features: Vec<FeatureEntry>,
    },
}

impl RoomSubmission {
    pub fn room_id(&self) -> &str {
        match self {
            RoomSubmission::NewRoom { room_id }
            | RoomSubmission::NewRoomWithFeatures { room_id, .. }
            | RoomSubmission::AddAnotherRoom { room_id, .. }
            | RoomSubmission::FinalSubmission { room_id, .. } => room_id,
        }
    }

    pub fn features(&self) -> &[FeatureEntry] {
        match self {
            RoomSubmission::NewRoom { .. } => &[],
            RoomSubmission::NewRoomWithFeatures { features, .. }
            | RoomSubmission::AddAnotherRoom { features, .. }
            | RoomSubmission::FinalSubmission { features, .. } => features,
        }
    }

    /// 送信完了でウィザードが終わるか
    pub fn finishes_wizard(&self) -> bool {
        !matches!(self, RoomSubmission::AddAnotherRoom { .. })
    }

    /// 部屋追加APIへ送るエントリ（設備ごとに1件、なければ部屋IDのみ1件）
    pub fn add_room_entries(&self) -> Vec<RoomEntry> {
        match self {
            RoomSubmission::NewRoom { .. } | RoomSubmission::NewRoomWithFeatures { .. } => Vec::new(),
            RoomSubmission::AddAnotherRoom { room_id, features }
            | RoomSubmission::FinalSubmission { room_id, features, .. } => {
                if features.is_empty() {
                    vec![RoomEntry::Room(RoomRef {
                        room_id: room_id.clone(),
                    })]
                } else {
                    features.iter().cloned().map(RoomEntry::Feature).collect()
                }
            }
        }
    }

    /// プロジェクト送信APIのボディ
    ///
    /// `added` は部屋追加APIの応答（FinalSubmissionのみ使用）。
    /// AddAnotherRoomはプロジェクト送信を行わないので `None`。
    pub fn project_body(&self, name: &str, added: Vec<Value>) -> Result<Option<ProjectBody>> {
        let data = match self {
            RoomSubmission::NewRoom { room_id } => vec![serde_json::to_value(RoomRef {
                room_id: room_id.clone(),
            })?],
            RoomSubmission::NewRoomWithFeatures { features, .. } => features
                .iter()
                .map(serde_json::to_value)
                .collect::<std::result::Result<Vec<_>, _>>()?,
            RoomSubmission::AddAnotherRoom { .. } => return Ok(None),
            RoomSubmission::FinalSubmission { saved_rooms, .. } => {
                let mut data = saved_rooms.clone();
                data.extend(added);
                data
            }
        };
        Ok(Some(ProjectBody {
            data,
            name: name.to_string(),
        }))
    }

    /// 部屋追加後に表示するメッセージ
    pub fn saved_message(&self) -> &'static str {
        let features = self.features();
        if features.iter().any(FeatureEntry::has_images) {
            "Your item is saved, now you can add more."
        } else if !features.is_empty() {
            "Room saved with selected checkboxes and descriptions. You can add more."
        } else {
            "Room saved without images or checkboxes. You can add more."
        }
    }
}

/// 送信ペイロードの組み立て
#[derive(Debug, Clone)]
pub struct SubmissionBuilder {
    kind: ProjectKind,
    room_id: String,
    realtor_id: Option<String>,
    saved_rooms: Vec<Value>,
}

impl SubmissionBuilder {
    pub fn new(kind: ProjectKind, room_id: impl Into<String>) -> Self {
        Self {
            kind,
            room_id: room_id.into(),
            realtor_id: None,
            saved_rooms: Vec::new(),
        }
    }

    /// エージェント案件のみ設備エントリに付与する
    pub fn realtor_id(mut self, realtor_id: Option<String>) -> Self {
        self.realtor_id = realtor_id;
        self
    }

    pub fn saved_rooms(mut self, saved_rooms: Vec<Value>) -> Self {
        self.saved_rooms = saved_rooms;
        self
    }

    pub fn build(&self, action: SubmitAction, list: &FeatureList) -> RoomSubmission {
        let realtor_id = match self.kind {
            ProjectKind::Realtor => self.realtor_id.as_deref(),
            ProjectKind::HomeOwner => None,
        };
        let features: Vec<FeatureEntry> = list
            .checked()
            .map(|f| FeatureEntry::from_selection(&self.room_id, realtor_id, f))
            .collect();
        let room_id = self.room_id.clone();

        match action {
            SubmitAction::AddAnother => RoomSubmission::AddAnotherRoom { room_id, features },
            SubmitAction::Submit if !self.saved_rooms.is_empty() => RoomSubmission::FinalSubmission {
                saved_rooms: self.saved_rooms.clone(),
                room_id,
                features,
            },
            SubmitAction::Submit if features.is_empty() => RoomSubmission::NewRoom { room_id },
            SubmitAction::Submit => RoomSubmission::NewRoomWithFeatures { room_id, features },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_list::FeatureOption;
    use serde_json::json;

    fn list() -> FeatureList {
        FeatureList::from_options(&[
            FeatureOption { id: 21, name: "Cabinets".into() },
            FeatureOption { id: 22, name: "Counters".into() },
            FeatureOption { id: 23, name: "Backsplash".into() },
        ])
    }

    #[test]
    fn test_minimal_payload_without_features() {
        let submission = SubmissionBuilder::new(ProjectKind::HomeOwner, "7")
            .build(SubmitAction::Submit, &list());
        assert_eq!(submission, RoomSubmission::NewRoom { room_id: "7".into() });

        let body = submission.project_body("Kitchen", Vec::new()).unwrap().unwrap();
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({
            "data": [{ "roomId": "7" }],
            "name": "Kitchen"
        }));
    }

    #[test]
    fn test_two_checked_features_with_images_in_display_order() {
        let mut list = list();
        let first = list.features()[0].clone();
        let third = list.features()[2].clone();
        list.set_checked(third.key, true);
        list.set_checked(first.key, true);
        list.set_note(first.key, "doors loose");
        list.set_note(third.key, "tiles cracked");
        list.set_slot_image(first.slots[0].id, UploadedImageRef::new("img/a.jpg"));
        list.set_slot_image(third.slots[0].id, UploadedImageRef::new("img/c.jpg"));

        let submission = SubmissionBuilder::new(ProjectKind::HomeOwner, "7")
            .build(SubmitAction::Submit, &list);
        assert!(matches!(submission, RoomSubmission::NewRoomWithFeatures { .. }));

        let body = submission.project_body("Kitchen", Vec::new()).unwrap().unwrap();
        assert_eq!(body.data.len(), 2);
        assert_eq!(body.data[0], json!({
            "roomId": "7",
            "features": 21,
            "inspectionNotes": "doors loose",
            "images": ["img/a.jpg"]
        }));
        assert_eq!(body.data[1]["features"], 23);
        assert_eq!(body.data[1]["images"], json!(["img/c.jpg"]));
        assert_eq!(body.data[1]["inspectionNotes"], "tiles cracked");
    }

    #[test]
    fn test_unchecked_feature_is_excluded() {
        let mut list = list();
        let key = list.features()[1].key;
        list.toggle(key);
        list.set_note(key, "scratched");
        list.toggle(key);

        let submission = SubmissionBuilder::new(ProjectKind::HomeOwner, "3")
            .build(SubmitAction::Submit, &list);
        assert!(submission.features().is_empty());
        assert!(matches!(submission, RoomSubmission::NewRoom { .. }));
    }

    #[test]
    fn test_add_another_room_entries() {
        let mut list = list();
        let submission = SubmissionBuilder::new(ProjectKind::Realtor, "9")
            .build(SubmitAction::AddAnother, &list);
        assert!(!submission.finishes_wizard());
        assert_eq!(
            submission.add_room_entries(),
            vec![RoomEntry::Room(RoomRef { room_id: "9".into() })]
        );
        assert_eq!(
            submission.saved_message(),
            "Room saved without images or checkboxes. You can add more."
        );
        assert!(submission.project_body("x", Vec::new()).unwrap().is_none());

        let key = list.features()[0].key;
        list.toggle(key);
        let submission = SubmissionBuilder::new(ProjectKind::Realtor, "9")
            .realtor_id(Some("42".into()))
            .build(SubmitAction::AddAnother, &list);
        let entries = submission.add_room_entries();
        assert_eq!(entries.len(), 1);
        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["realtor_id"], "42");
        assert_eq!(json["features"], 21);
        assert_eq!(
            submission.saved_message(),
            "Room saved with selected checkboxes and descriptions. You can add more."
        );
    }

    #[test]
    fn test_homeowner_entries_never_carry_realtor_id() {
        let mut list = list();
        let key = list.features()[0].key;
        list.toggle(key);
        let submission = SubmissionBuilder::new(ProjectKind::HomeOwner, "1")
            .realtor_id(Some("42".into()))
            .build(SubmitAction::Submit, &list);
        assert_eq!(submission.features()[0].realtor_id, None);
    }

    #[test]
    fn test_final_submission_merges_saved_rooms() {
        let mut list = list();
        let key = list.features()[1].key;
        let slot = list.features()[1].slots[0].id;
        list.toggle(key);
        list.set_slot_image(slot, UploadedImageRef::new("img/b.jpg"));
        list.set_slot_description(slot, "left corner");

        let saved = vec![json!({ "id": 1, "room_id": "4" })];
        let submission = SubmissionBuilder::new(ProjectKind::HomeOwner, "5")
            .saved_rooms(saved)
            .build(SubmitAction::Submit, &list);
        assert!(submission.finishes_wizard());
        assert_eq!(submission.saved_message(), "Your item is saved, now you can add more.");

        let entries = submission.add_room_entries();
        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["imageDesc"], json!(["left corner"]));

        let body = submission
            .project_body("Home", vec![json!({ "id": 2, "room_id": "5" })])
            .unwrap()
            .unwrap();
        assert_eq!(body.data, vec![
            json!({ "id": 1, "room_id": "4" }),
            json!({ "id": 2, "room_id": "5" }),
        ]);
    }

    #[test]
    fn test_image_descriptions_stay_paired_with_images() {
        let mut list = list();
        let key = list.features()[0].key;
        list.toggle(key);
        let first = list.features()[0].slots[0].id;
        let second = list.append_slot(key).unwrap();
        list.set_slot_image(first, UploadedImageRef::new("a.jpg"));
        list.set_slot_image(second, UploadedImageRef::new("b.jpg"));
        list.set_slot_description(second, "crack near window");

        let submission = SubmissionBuilder::new(ProjectKind::HomeOwner, "7")
            .build(SubmitAction::Submit, &list);
        let entry = &submission.features()[0];
        assert_eq!(entry.images, vec![UploadedImageRef::new("a.jpg"), UploadedImageRef::new("b.jpg")]);
        assert_eq!(entry.image_desc, vec![String::new(), "crack near window".to_string()]);
    }

    #[test]
    fn test_project_kind_routes() {
        assert_eq!(ProjectKind::Realtor.collection(), "realtorprojects");
        assert_eq!(ProjectKind::HomeOwner.collection(), "projects");
        assert_eq!(ProjectKind::Realtor.results_route().path(), "/agent/my-project");
        assert_eq!(ProjectKind::HomeOwner.results_route().path(), "/homeOwner/my-project");
    }
}
