//! エージェントプロフィール

use super::{print_notice, unwrap_data, Context};
use crate::error::{DazlError, Result};
use dazl_common::api::{ApiMessage, Endpoint};
use dazl_common::forms::{AgentProfile, AgentProfileRecord};
use dazl_common::notice::Notice;

pub use dazl_common::notice::PROFILE_UPDATED;

/// プロフィール更新の入力（未指定の項目は現在値のまま）
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub number: Option<String>,
}

async fn fetch(ctx: &Context) -> Result<AgentProfileRecord> {
    ctx.require_login()?;
    let user_id = ctx
        .session
        .user_id()
        .ok_or_else(|| DazlError::Config("ユーザーIDが保存されていません。再ログインしてください".into()))?;
    let value = ctx
        .client()?
        .get_json(&Endpoint::AgentProfile(user_id))
        .await?;
    Ok(serde_json::from_value(unwrap_data(value))?)
}

pub async fn show(ctx: &Context) -> Result<()> {
    let record = fetch(ctx).await?;
    let profile = AgentProfile::from_values(&AgentProfile::values_from_record(&record));
    println!("プロフィール:");
    println!("  氏名: {} {}", profile.first_name, profile.last_name);
    println!("  メール: {}", profile.email);
    println!("  会社: {}", profile.company_name);
    println!("  所在地: {} {} {}", profile.city, profile.state, profile.zip_code);
    println!("  電話: {}", profile.number);
    Ok(())
}

/// 現在値に変更を重ねて検証済みのフォームを作る
pub fn apply_changes(record: &AgentProfileRecord, changes: ProfileChanges) -> Result<AgentProfile> {
    let mut values = AgentProfile::values_from_record(record);
    let fields = [
        ("firstName", changes.first_name),
        ("lastName", changes.last_name),
        ("email", changes.email),
        ("companyName", changes.company_name),
        ("city", changes.city),
        ("state", changes.state),
        ("zipCode", changes.zip_code),
        ("number", changes.number),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            values.set_text(name, value);
        }
    }
    AgentProfile::schema().validate(&values)?;
    Ok(AgentProfile::from_values(&values))
}

pub async fn update(ctx: &Context, changes: ProfileChanges) -> Result<()> {
    let record = fetch(ctx).await?;
    let profile = apply_changes(&record, changes)?;
    let response: ApiMessage = ctx
        .client()?
        .post_json(&Endpoint::UpdateAgentProfile, &profile)
        .await?;
    print_notice(&Notice::server_success(&response.message, PROFILE_UPDATED));
    Ok(())
}
