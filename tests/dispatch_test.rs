//! 送信処理テスト
//!
//! モックAPIで部屋・設備の送信と送信後の後片付けを検証

use async_trait::async_trait;
use dazl_common::feature_list::{FeatureList, FeatureOption};
use dazl_common::payload::{ProjectBody, ProjectKind, RoomEntry, SubmissionBuilder, SubmitAction};
use dazl_common::routes::Route;
use dazl_common::storage::{KeyValueStore, MemoryStore, SessionStore, UserType, ROOM_ID, SAVED_ROOMS};
use dazl_common::upload::{UploadSlots, UploadedImageRef};
use dazl_common::validation::FileMeta;
use dazl_common::wizard::{Wizard, WizardEvent, WizardStep};
use dazl_rust::error::{DazlError, Result};
use dazl_rust::project::{upload_to_slot, LocalImage, ProjectApi, ProjectDispatcher, RoomState, RoomTransport};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct MockApi {
    uploads: AtomicU64,
    added: Mutex<Vec<RoomEntry>>,
    submitted: Mutex<Vec<(ProjectKind, ProjectBody)>>,
    fail_submit: bool,
    fail_upload: bool,
    /// 部屋追加が空応答を返す
    empty_add_room: bool,
}

#[async_trait]
impl ProjectApi for MockApi {
    async fn upload_image(&self, image: &LocalImage) -> Result<UploadedImageRef> {
        if self.fail_upload {
            return Err(DazlError::Api {
                status: 500,
                message: "Upload failed".into(),
            });
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(UploadedImageRef::new(format!("uploads/{}-{}", n, image.meta.name)))
    }
}

#[async_trait(?Send)]
impl RoomTransport for MockApi {
    type Error = DazlError;

    async fn add_room(&self, entry: &RoomEntry) -> Result<Value> {
        let mut added = self.added.lock().unwrap();
        added.push(entry.clone());
        if self.empty_add_room {
            return Ok(Value::Null);
        }
        Ok(json!({ "id": added.len(), "entry": entry }))
    }

    async fn submit_project(&self, kind: ProjectKind, body: &ProjectBody) -> Result<()> {
        if self.fail_submit {
            return Err(DazlError::Api {
                status: 422,
                message: "The data field is required.".into(),
            });
        }
        self.submitted.lock().unwrap().push((kind, body.clone()));
        Ok(())
    }
}

fn list() -> FeatureList {
    FeatureList::from_options(&[
        FeatureOption { id: 21, name: "Cabinets".into() },
        FeatureOption { id: 22, name: "Counters".into() },
        FeatureOption { id: 23, name: "Plumbing Fixtures".into() },
    ])
}

fn session() -> SessionStore<MemoryStore> {
    let mut session = SessionStore::new(MemoryStore::new());
    session.start_session("tok", UserType::Agent, Some("8")).unwrap();
    session.select_room("5", "Kitchen").unwrap();
    session
}

fn selected_wizard() -> Wizard {
    let mut wizard = Wizard::rooms_only();
    wizard.apply(WizardEvent::RoomSelected).unwrap();
    wizard
}

fn image(name: &str) -> LocalImage {
    LocalImage {
        path: PathBuf::from(name),
        meta: FileMeta::new(name, "image/jpeg", 1024),
    }
}

/// 設備チェックなしで送信すると部屋IDのみのペイロードになる
#[tokio::test]
async fn test_submit_without_features_sends_minimal_payload() {
    let api = MockApi::default();
    let mut session = session();
    let mut list = list();
    let mut uploads = UploadSlots::new();
    let mut wizard = selected_wizard();

    let submission = SubmissionBuilder::new(ProjectKind::HomeOwner, "5").build(SubmitAction::Submit, &list);
    let dispatched = ProjectDispatcher::new(&api, &mut session, ProjectKind::HomeOwner)
        .dispatch(
            &submission,
            "Kitchen",
            RoomState { list: &mut list, uploads: &mut uploads, wizard: &mut wizard },
        )
        .await
        .expect("dispatch failed");

    let submitted = api.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(
        serde_json::to_value(&submitted[0].1).unwrap(),
        json!({ "data": [{ "roomId": "5" }], "name": "Kitchen" })
    );
    assert_eq!(dispatched.route, Some(Route::HomeOwnerProjects));
    assert!(!dispatched.notice.is_error());
    assert_eq!(wizard.step(), WizardStep::Start);
    assert_eq!(session.room_id(), None);
    assert!(session.is_logged_in());
}

/// 2設備に画像1枚ずつ: 表示順に2件、それぞれ自分の画像とメモを持つ
#[tokio::test]
async fn test_two_features_with_images() {
    let api = MockApi::default();
    let mut session = session();
    let mut list = list();
    let mut uploads = UploadSlots::new();
    let mut wizard = selected_wizard();

    let cabinets = list.find_by_feature_id(21).unwrap().key;
    let plumbing = list.find_by_feature_id(23).unwrap().key;
    // 表示順とは逆にチェック
    for key in [plumbing, cabinets] {
        list.set_checked(key, true);
        wizard.apply(WizardEvent::FeatureToggled { any_checked: true }).unwrap();
    }
    list.set_note(cabinets, "Door loose");
    list.set_note(plumbing, "Slow drain");

    let cabinet_slot = list.get(cabinets).unwrap().slots[0].id;
    let plumbing_slot = list.get(plumbing).unwrap().slots[0].id;
    upload_to_slot(&api, &mut uploads, &mut list, plumbing_slot, &image("drain.jpg")).await.unwrap();
    upload_to_slot(&api, &mut uploads, &mut list, cabinet_slot, &image("door.jpg")).await.unwrap();

    let submission = SubmissionBuilder::new(ProjectKind::Realtor, "5")
        .realtor_id(session.user_id())
        .build(SubmitAction::Submit, &list);
    ProjectDispatcher::new(&api, &mut session, ProjectKind::Realtor)
        .dispatch(
            &submission,
            "Kitchen",
            RoomState { list: &mut list, uploads: &mut uploads, wizard: &mut wizard },
        )
        .await
        .unwrap();

    let submitted = api.submitted.lock().unwrap();
    let (kind, body) = &submitted[0];
    assert_eq!(*kind, ProjectKind::Realtor);
    assert_eq!(body.data.len(), 2);
    assert_eq!(body.data[0]["features"], json!(21));
    assert_eq!(body.data[0]["images"], json!(["uploads/2-door.jpg"]));
    assert_eq!(body.data[0]["inspectionNotes"], json!("Door loose"));
    assert_eq!(body.data[0]["realtor_id"], json!("8"));
    assert_eq!(body.data[1]["features"], json!(23));
    assert_eq!(body.data[1]["images"], json!(["uploads/1-drain.jpg"]));

    // 送信後は設備リストが初期化される
    assert!(!list.any_checked());
    assert_eq!(list.uploaded_image_count(), 0);
}

/// 部屋追加では送信せず、保存した部屋を最終送信に含める
#[tokio::test]
async fn test_add_another_room_then_final_submission() {
    let api = MockApi::default();
    let mut session = session();
    let mut list = list();
    let mut uploads = UploadSlots::new();
    let mut wizard = selected_wizard();

    let counters = list.find_by_feature_id(22).unwrap().key;
    list.set_checked(counters, true);
    wizard.apply(WizardEvent::FeatureToggled { any_checked: true }).unwrap();

    let first = SubmissionBuilder::new(ProjectKind::HomeOwner, "5").build(SubmitAction::AddAnother, &list);
    let dispatched = ProjectDispatcher::new(&api, &mut session, ProjectKind::HomeOwner)
        .dispatch(
            &first,
            "Kitchen",
            RoomState { list: &mut list, uploads: &mut uploads, wizard: &mut wizard },
        )
        .await
        .unwrap();
    assert_eq!(dispatched.route, None);
    assert_eq!(
        dispatched.notice.message,
        "Room saved with selected checkboxes and descriptions. You can add more."
    );
    assert!(api.submitted.lock().unwrap().is_empty());
    assert_eq!(wizard.saved_rooms(), 1);
    assert_eq!(session.saved_rooms().unwrap().len(), 1);
    assert!(list.is_empty());

    // 次の部屋（設備なし）で最終送信
    session.select_room("6", "Bath").unwrap();
    wizard.apply(WizardEvent::RoomSelected).unwrap();
    let last = SubmissionBuilder::new(ProjectKind::HomeOwner, "6")
        .saved_rooms(session.saved_rooms().unwrap())
        .build(SubmitAction::Submit, &list);
    let dispatched = ProjectDispatcher::new(&api, &mut session, ProjectKind::HomeOwner)
        .dispatch(
            &last,
            "Bath",
            RoomState { list: &mut list, uploads: &mut uploads, wizard: &mut wizard },
        )
        .await
        .unwrap();

    assert_eq!(dispatched.route, Some(Route::HomeOwnerProjects));
    let added = api.added.lock().unwrap();
    assert_eq!(added.len(), 2);
    assert!(matches!(&added[1], RoomEntry::Room(room) if room.room_id == "6"));
    let submitted = api.submitted.lock().unwrap();
    assert_eq!(submitted[0].1.data.len(), 2);
    assert_eq!(submitted[0].1.name, "Bath");
    assert_eq!(session.inner().get(SAVED_ROOMS), None);
    assert_eq!(session.inner().get(ROOM_ID), None);
}

/// 送信失敗時は状態を変えずにエラーを返す
#[tokio::test]
async fn test_failed_submission_keeps_state() {
    let api = MockApi {
        fail_submit: true,
        ..Default::default()
    };
    let mut session = session();
    let mut list = list();
    let mut uploads = UploadSlots::new();
    let mut wizard = selected_wizard();
    let key = list.find_by_feature_id(21).unwrap().key;
    list.set_checked(key, true);
    wizard.apply(WizardEvent::FeatureToggled { any_checked: true }).unwrap();

    let submission = SubmissionBuilder::new(ProjectKind::HomeOwner, "5").build(SubmitAction::Submit, &list);
    let err = ProjectDispatcher::new(&api, &mut session, ProjectKind::HomeOwner)
        .dispatch(
            &submission,
            "Kitchen",
            RoomState { list: &mut list, uploads: &mut uploads, wizard: &mut wizard },
        )
        .await
        .unwrap_err();

    assert_eq!(err.notice_message(), "The data field is required.");
    assert!(list.any_checked());
    assert_eq!(wizard.step(), WizardStep::FeaturesChecked);
    assert_eq!(session.room_id().as_deref(), Some("5"));
}

/// アップロード失敗が残っている間は送信できない
#[tokio::test]
async fn test_failed_upload_blocks_submission() {
    let api = MockApi {
        fail_upload: true,
        ..Default::default()
    };
    let mut session = session();
    let mut list = list();
    let mut uploads = UploadSlots::new();
    let mut wizard = selected_wizard();
    let key = list.find_by_feature_id(22).unwrap().key;
    list.set_checked(key, true);
    wizard.apply(WizardEvent::FeatureToggled { any_checked: true }).unwrap();
    let slot = list.get(key).unwrap().slots[0].id;

    upload_to_slot(&api, &mut uploads, &mut list, slot, &image("counter.jpg")).await.unwrap();
    assert_eq!(uploads.error(slot), Some("Upload failed"));

    let submission = SubmissionBuilder::new(ProjectKind::HomeOwner, "5").build(SubmitAction::Submit, &list);
    let err = ProjectDispatcher::new(&api, &mut session, ProjectKind::HomeOwner)
        .dispatch(
            &submission,
            "Kitchen",
            RoomState { list: &mut list, uploads: &mut uploads, wizard: &mut wizard },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DazlError::UploadPending(_)));
    assert!(api.submitted.lock().unwrap().is_empty());
}

/// 不正なファイルはアップロードAPIに送られない
#[tokio::test]
async fn test_invalid_file_never_reaches_api() {
    let api = MockApi::default();
    let mut list = list();
    let mut uploads = UploadSlots::new();
    let slot = list.features()[0].slots[0].id;
    let pdf = LocalImage {
        path: PathBuf::from("report.pdf"),
        meta: FileMeta::new("report.pdf", "application/pdf", 10),
    };

    let err = upload_to_slot(&api, &mut uploads, &mut list, slot, &pdf).await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid file type. Please select a valid image.");
    assert_eq!(api.uploads.load(Ordering::SeqCst), 0);
}

/// 部屋追加の応答が空でも、保存済みの部屋は最終送信に含まれる
#[tokio::test]
async fn test_empty_add_room_response_keeps_saved_room() {
    let api = MockApi {
        empty_add_room: true,
        ..Default::default()
    };
    let mut session = session();
    let mut list = list();
    let mut uploads = UploadSlots::new();
    let mut wizard = selected_wizard();

    let first = SubmissionBuilder::new(ProjectKind::HomeOwner, "5").build(SubmitAction::AddAnother, &list);
    ProjectDispatcher::new(&api, &mut session, ProjectKind::HomeOwner)
        .dispatch(
            &first,
            "Kitchen",
            RoomState { list: &mut list, uploads: &mut uploads, wizard: &mut wizard },
        )
        .await
        .unwrap();
    assert_eq!(wizard.saved_rooms(), 1);
    assert_eq!(session.saved_rooms().unwrap(), vec![json!({ "roomId": "5" })]);

    session.select_room("6", "Bath").unwrap();
    wizard.apply(WizardEvent::RoomSelected).unwrap();
    let last = SubmissionBuilder::new(ProjectKind::HomeOwner, "6")
        .saved_rooms(session.saved_rooms().unwrap())
        .build(SubmitAction::Submit, &list);
    ProjectDispatcher::new(&api, &mut session, ProjectKind::HomeOwner)
        .dispatch(
            &last,
            "Bath",
            RoomState { list: &mut list, uploads: &mut uploads, wizard: &mut wizard },
        )
        .await
        .unwrap();

    let submitted = api.submitted.lock().unwrap();
    assert_eq!(
        submitted[0].1.data,
        vec![json!({ "roomId": "5" }), json!({ "roomId": "6" })]
    );
}
