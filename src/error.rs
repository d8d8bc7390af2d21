use dazl_common::validation::{FileError, ValidationErrors};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DazlError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ログインしていません。`dazl login` でログインしてください")]
    NotLoggedIn,

    #[error("入力エラー: {0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    InvalidImage(#[from] FileError),

    #[error("画像形式を判定できません: {0}")]
    UnsupportedImage(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("APIエラー ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力操作エラー: {0}")]
    Interaction(#[from] dialoguer::Error),

    #[error("{0}")]
    Common(dazl_common::Error),

    #[error("アップロード未完了: {0}")]
    UploadPending(String),

    #[error("中止しました")]
    Cancelled,
}

impl From<ValidationErrors> for DazlError {
    fn from(errors: ValidationErrors) -> Self {
        DazlError::Validation(errors)
    }
}

impl From<dazl_common::Error> for DazlError {
    fn from(err: dazl_common::Error) -> Self {
        match err {
            dazl_common::Error::UploadPending(message) => DazlError::UploadPending(message),
            other => DazlError::Common(other),
        }
    }
}

impl DazlError {
    /// 利用者向け通知に出す短いメッセージ
    pub fn notice_message(&self) -> String {
        match self {
            DazlError::Api { message, .. } => message.clone(),
            DazlError::Validation(errors) => errors
                .iter()
                .next()
                .map(|(_, message)| message.to_string())
                .unwrap_or_else(|| self.to_string()),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DazlError>;
