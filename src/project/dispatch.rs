//! 部屋・設備の送信
//!
//! 送信手順は `dazl_common::dispatch`。ここではCLIのAPIを差し込み、ログを残す。

use crate::error::{DazlError, Result};
use crate::project::upload::LocalImage;
use async_trait::async_trait;
use dazl_common::dispatch;
use dazl_common::payload::{ProjectKind, RoomSubmission};
use dazl_common::storage::{KeyValueStore, SessionStore};
use dazl_common::upload::UploadedImageRef;
use tracing::info;

pub use dazl_common::dispatch::{Dispatched, RoomState, RoomTransport};
pub use dazl_common::notice::PROJECT_SUBMITTED;

/// 送信に使うAPI（テストではモックに差し替える）
#[async_trait]
pub trait ProjectApi: RoomTransport<Error = DazlError> + Send + Sync {
    async fn upload_image(&self, image: &LocalImage) -> Result<UploadedImageRef>;
}

pub struct ProjectDispatcher<'a, A: ProjectApi + ?Sized, S: KeyValueStore> {
    api: &'a A,
    session: &'a mut SessionStore<S>,
    kind: ProjectKind,
}

impl<'a, A: ProjectApi + ?Sized, S: KeyValueStore> ProjectDispatcher<'a, A, S> {
    pub fn new(api: &'a A, session: &'a mut SessionStore<S>, kind: ProjectKind) -> Self {
        Self { api, session, kind }
    }

    pub async fn dispatch(
        &mut self,
        submission: &RoomSubmission,
        room_name: &str,
        state: RoomState<'_>,
    ) -> Result<Dispatched> {
        let dispatched =
            dispatch::dispatch(self.api, self.session, self.kind, submission, room_name, state).await?;
        match &dispatched.route {
            Some(route) => info!(room = submission.room_id(), kind = ?self.kind, to = %route.path(), "project submitted"),
            None => info!(room = submission.room_id(), "room saved"),
        }
        Ok(dispatched)
    }
}
