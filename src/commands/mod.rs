//! サブコマンドの実装
//!
//! 各画面の送信処理に対応する。検証は `dazl_common` のスキーマで行い、
//! 結果はトースト相当のメッセージと遷移先として表示する。

pub mod account;
pub mod contact;
pub mod phd;
pub mod profile;
pub mod project;
pub mod report;

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{DazlError, Result};
use crate::session::FileStore;
pub use dazl_common::api::unwrap_data;
use dazl_common::notice::Notice;
use dazl_common::routes::Route;
use dazl_common::storage::SessionStore;
use dialoguer::{Confirm, Password};

/// コマンド実行中の共有状態
pub struct Context {
    pub config: Config,
    pub session: SessionStore<FileStore>,
}

impl Context {
    pub fn load(config: Config) -> Result<Self> {
        let path = config.session_path()?;
        Ok(Self {
            session: SessionStore::new(FileStore::load(&path)),
            config,
        })
    }

    /// 保存済みトークン付きのクライアント
    pub fn client(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(&self.config)?.with_token(self.session.token()))
    }

    pub fn require_login(&self) -> Result<()> {
        if self.session.is_logged_in() {
            Ok(())
        } else {
            Err(DazlError::NotLoggedIn)
        }
    }
}

pub fn print_notice(notice: &Notice) {
    if notice.is_error() {
        eprintln!("✖ {}", notice.message);
    } else {
        println!("✔ {}", notice.message);
    }
}

/// 失敗時の通知
pub fn failure_notice(err: &DazlError) -> Notice {
    Notice::error(err.notice_message())
}

pub fn print_route(route: &Route) {
    println!("→ {}", route.path());
}

/// パスワードと確認入力を対話で受け取る
pub fn prompt_password(with_confirmation: bool) -> Result<(String, String)> {
    let password = Password::new().with_prompt("Password").interact()?;
    let confirm = if with_confirmation {
        Password::new().with_prompt("Confirm password").interact()?
    } else {
        password.clone()
    };
    Ok((password, confirm))
}

/// 確認プロンプト（`--yes` 指定時は省略）
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
