//! REST APIのエンドポイント定義
//!
//! 通信手段（reqwest / gloo）に依存しない部分だけをここに置く。

use crate::payload::ProjectKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.dazlpro.com/api";

/// 画像アップロードのmultipartフィールド名
pub const UPLOAD_FIELD: &str = "image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    AgentSignup,
    CustomerSignup,
    Login,
    UploadImage,
    PhdStepOne,
    RoomTypes,
    RoomFeatures(String),
    AddRoom,
    SubmitProject(ProjectKind),
    AgentProfile(String),
    UpdateAgentProfile,
    /// 未ログイン時のお問い合わせ
    ContactPublic,
    /// ログイン済みのお問い合わせ
    ContactDashboard,
    ViewPhd(String),
    BidStatus,
    MailPdf,
    ViewServicePhd(String),
    SendMailHomeOwner,
    DeleteProfessionalProject,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::RoomTypes
            | Endpoint::RoomFeatures(_)
            | Endpoint::AgentProfile(_)
            | Endpoint::ViewPhd(_)
            | Endpoint::ViewServicePhd(_) => Method::Get,
            _ => Method::Post,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::AgentSignup => "/agent/signup".into(),
            Endpoint::CustomerSignup => "/customer/signup".into(),
            Endpoint::Login => "/login".into(),
            Endpoint::UploadImage => "/upload-image".into(),
            Endpoint::PhdStepOne => "/phd/step-one".into(),
            Endpoint::RoomTypes => "/rooms".into(),
            Endpoint::RoomFeatures(room_id) => format!("/rooms/{}/features", room_id),
            Endpoint::AddRoom => "/rooms/add-another".into(),
            Endpoint::SubmitProject(kind) => format!("/{}/rooms", kind.collection()),
            Endpoint::AgentProfile(user_id) => format!("/agent/profile/{}", user_id),
            Endpoint::UpdateAgentProfile => "/agent/profile/update".into(),
            Endpoint::ContactPublic => "/contact-us".into(),
            Endpoint::ContactDashboard => "/dashboard/contact-us".into(),
            Endpoint::ViewPhd(id) => format!("/phd/{}?value=open", id),
            Endpoint::BidStatus => "/phd/bid-status".into(),
            Endpoint::MailPdf => "/phd/mail-pdf".into(),
            Endpoint::ViewServicePhd(id) => format!("/professional/projects/{}", id),
            Endpoint::SendMailHomeOwner => "/professional/send-mail".into(),
            Endpoint::DeleteProfessionalProject => "/professional/projects/delete".into(),
        }
    }

    /// トークンなしで呼べるか
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Endpoint::AgentSignup | Endpoint::CustomerSignup | Endpoint::Login | Endpoint::ContactPublic
        )
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }

    /// ログイン状態に応じたお問い合わせ先
    pub fn contact(logged_in: bool) -> Self {
        if logged_in {
            Endpoint::ContactDashboard
        } else {
            Endpoint::ContactPublic
        }
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// 登録・ログインAPIのレスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub data: AuthData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthData {
    pub token: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub user_type: Option<String>,
}

impl AuthData {
    /// 数値・文字列どちらのIDも文字列で扱う
    pub fn user_id(&self) -> Option<String> {
        match &self.id {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// `message` のみを持つ汎用レスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: String,
}

/// 部屋の種類
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: u64,
    pub name: String,
}

/// エラーレスポンスからメッセージを抜き出す
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// `{"data": ...}` で包まれていれば中身を取り出す
pub fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_data() {
        assert_eq!(unwrap_data(json!({"data": [1, 2]})), json!([1, 2]));
        assert_eq!(unwrap_data(json!({"message": "ok"})), json!({"message": "ok"}));
        assert_eq!(unwrap_data(json!([3])), json!([3]));
    }

    #[test]
    fn test_project_endpoint_uses_collection() {
        assert_eq!(
            Endpoint::SubmitProject(ProjectKind::Realtor).path(),
            "/realtorprojects/rooms"
        );
        assert_eq!(
            Endpoint::SubmitProject(ProjectKind::HomeOwner).url("https://api.dazlpro.com/api/"),
            "https://api.dazlpro.com/api/projects/rooms"
        );
    }

    #[test]
    fn test_methods_and_visibility() {
        assert_eq!(Endpoint::ViewPhd("3".into()).method(), Method::Get);
        assert_eq!(Endpoint::UploadImage.method(), Method::Post);
        assert!(Endpoint::Login.is_public());
        assert!(!Endpoint::UploadImage.is_public());
        assert_eq!(Endpoint::contact(true), Endpoint::ContactDashboard);
        assert_eq!(Endpoint::contact(false), Endpoint::ContactPublic);
    }

    #[test]
    fn test_auth_response() {
        let response: AuthResponse = serde_json::from_str(
            r#"{"data":{"token":"abc","first_name":"Jane","id":17}}"#,
        )
        .unwrap();
        assert_eq!(response.data.token, "abc");
        assert_eq!(response.data.user_id().as_deref(), Some("17"));
        assert_eq!(bearer(&response.data.token), "Bearer abc");
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"message":"Email already taken"}"#).as_deref(),
            Some("Email already taken")
        );
        assert_eq!(error_message(r#"{"error":"nope"}"#).as_deref(), Some("nope"));
        assert_eq!(error_message("<html>"), None);
    }
}
