//! トースト通知

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

pub const PROJECT_SUBMITTED: &str = "Project submitted successfully";
pub const PROFILE_UPDATED: &str = "Profile updated successfully";
pub const CONTACT_SENT: &str = "Your message has been sent successfully";

/// 画面に一時表示するメッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// ログイン成功時の挨拶
    pub fn welcome(first_name: &str) -> Self {
        Self::success(format!("Welcome {}", first_name))
    }

    /// サーバーの message があればそれを、空なら既定の文言を使う
    pub fn server_success(message: &str, fallback: &str) -> Self {
        if message.trim().is_empty() {
            Self::success(fallback)
        } else {
            Self::success(message)
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_preferred() {
        let notice = Notice::server_success("Saved!", PROFILE_UPDATED);
        assert_eq!(notice.message, "Saved!");
        assert!(!notice.is_error());

        let notice = Notice::server_success("  ", CONTACT_SENT);
        assert_eq!(notice.message, CONTACT_SENT);
    }

    #[test]
    fn test_welcome() {
        assert_eq!(Notice::welcome("Ada").message, "Welcome Ada");
    }
}
