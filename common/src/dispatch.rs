//! 部屋・設備の送信手順
//!
//! `RoomSubmission` を部屋追加API・プロジェクト送信APIへ順に送り、
//! 成功したらローカル状態を片付けて遷移先を返す。
//! 通信は `RoomTransport` として呼び出し側（CLI / Web）が用意する。

use async_trait::async_trait;
use serde_json::Value;

use crate::feature_list::FeatureList;
use crate::notice::{Notice, PROJECT_SUBMITTED};
use crate::payload::{ProjectBody, ProjectKind, RoomEntry, RoomSubmission};
use crate::routes::Route;
use crate::storage::{KeyValueStore, SessionStore};
use crate::upload::UploadSlots;
use crate::wizard::{Wizard, WizardEvent};

/// 部屋追加・プロジェクト送信の通信
#[async_trait(?Send)]
pub trait RoomTransport {
    type Error: From<crate::Error>;

    /// 部屋追加。保存された部屋レコード（`data` を外したもの）を返す
    async fn add_room(&self, entry: &RoomEntry) -> Result<Value, Self::Error>;
    async fn submit_project(&self, kind: ProjectKind, body: &ProjectBody) -> Result<(), Self::Error>;
}

/// 送信結果
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub notice: Notice,
    /// ウィザード終了時の遷移先（部屋追加の場合は `None`）
    pub route: Option<Route>,
}

/// 送信中に触るクライアント側の状態
pub struct RoomState<'a> {
    pub list: &'a mut FeatureList,
    pub uploads: &'a mut UploadSlots,
    pub wizard: &'a mut Wizard,
}

/// 部屋を送信する。失敗時は状態を変えずにエラーを返す（再試行はしない）
pub async fn dispatch<T, S>(
    transport: &T,
    session: &mut SessionStore<S>,
    kind: ProjectKind,
    submission: &RoomSubmission,
    room_name: &str,
    state: RoomState<'_>,
) -> Result<Dispatched, T::Error>
where
    T: RoomTransport + ?Sized,
    S: KeyValueStore,
{
    state
        .uploads
        .ensure_ready(&*state.list)
        .map_err(crate::Error::UploadPending)?;

    // 送信前に遷移可能か確かめる
    let mut next = state.wizard.clone();
    let event = if submission.finishes_wizard() {
        WizardEvent::Submitted
    } else {
        WizardEvent::RoomSaved
    };
    next.apply(event).map_err(crate::Error::from)?;

    let added = add_rooms(transport, submission).await?;

    if !submission.finishes_wizard() {
        session.push_saved_rooms(added)?;
        *state.wizard = next;
        // 設備一覧は次の部屋を選ぶまで空
        *state.list = FeatureList::default();
        state.uploads.reset();
        return Ok(Dispatched {
            notice: Notice::success(submission.saved_message()),
            route: None,
        });
    }

    if let Some(body) = submission.project_body(room_name, added)? {
        transport.submit_project(kind, &body).await?;
    }

    state.list.reset();
    state.uploads.reset();
    session.clear_room_selection()?;
    next.apply(WizardEvent::Reset).map_err(crate::Error::from)?;
    *state.wizard = next;

    Ok(Dispatched {
        notice: Notice::success(PROJECT_SUBMITTED),
        route: Some(kind.results_route()),
    })
}

/// 部屋追加APIを1件ずつ呼ぶ。応答が空なら送ったエントリを記録として残す
async fn add_rooms<T>(transport: &T, submission: &RoomSubmission) -> Result<Vec<Value>, T::Error>
where
    T: RoomTransport + ?Sized,
{
    let mut added = Vec::new();
    for entry in submission.add_room_entries() {
        let saved = transport.add_room(&entry).await?;
        let record = if saved.is_null() {
            serde_json::to_value(&entry).map_err(crate::Error::from)?
        } else {
            saved
        };
        added.push(record);
    }
    Ok(added)
}
