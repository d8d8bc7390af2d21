//! エラー型定義

use thiserror::Error;

use crate::validation::ValidationErrors;
use crate::wizard::WizardError;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Upload error: {0}")]
    Upload(String),

    /// アップロード中・失敗したスロットが残っている
    #[error("{0}")]
    UploadPending(String),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
