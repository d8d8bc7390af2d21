//! PHD作成ウィザード（ステップ1・2）

use super::{print_notice, print_route, unwrap_data, Context};
use crate::error::{DazlError, Result};
use dazl_common::api::{Endpoint, RoomType};
use dazl_common::forms::{ClientDetails, PriceRange};
use dazl_common::notice::Notice;
use dazl_common::routes::Route;
use dazl_common::validation::{FormValues, ValidationErrors};
use serde_json::Value;
use tracing::debug;

pub async fn start(
    ctx: &mut Context,
    first_name: String,
    last_name: String,
    email: String,
    location: String,
) -> Result<()> {
    ctx.require_login()?;
    let values = FormValues::new()
        .with_text("firstName", first_name)
        .with_text("lastName", last_name)
        .with_text("email", email)
        .with_text("location", location);
    ClientDetails::schema().validate(&values)?;

    let details = ClientDetails::from_values(&values);
    let response: Value = ctx
        .client()?
        .post_json(&Endpoint::PhdStepOne, &details)
        .await?;
    debug!(?response, "step one saved");

    ctx.session.save_client_details(&details)?;
    print_notice(&Notice::success(format!("Client details saved for {}", details.full_name())));
    println!("  次のステップ: dazl phd price --low <LOW> --high <HIGH>");
    Ok(())
}

/// 入力値から価格レンジを組み立てる
pub fn price_range(low: &str, high: &str, value: Option<u32>) -> std::result::Result<PriceRange, String> {
    let mut range = PriceRange::default();
    // 既定の上限(600)より大きい下限で誤検知しないよう上限から入れる
    range.set_high(high);
    if let Some(error) = range.error() {
        return Err(error.to_string());
    }
    range.set_low(low);
    range.validate()?;
    range.set_value(value.unwrap_or((range.low + range.high) / 2));
    Ok(range)
}

pub fn price(ctx: &mut Context, low: String, high: String, value: Option<u32>) -> Result<()> {
    if ctx.session.client_details()?.is_none() {
        return Err(DazlError::Config(
            "先に売主情報を入力してください（dazl phd start）".into(),
        ));
    }
    let range = price_range(&low, &high, value).map_err(|message| {
        let mut errors = ValidationErrors::default();
        errors.insert("price", message);
        DazlError::Validation(errors)
    })?;
    ctx.session.save_price_range(&range)?;
    print_notice(&Notice::success(format!(
        "Price range saved: {} - {} ({})",
        range.low, range.high, range.value
    )));
    print_route(&Route::CreatePhdRooms);
    Ok(())
}

pub async fn rooms(ctx: &Context) -> Result<()> {
    let value: Value = ctx.client()?.get_json(&Endpoint::RoomTypes).await?;
    let rooms: Vec<RoomType> = serde_json::from_value(unwrap_data(value))?;
    println!("部屋一覧:");
    for room in rooms {
        println!("  {:>4}  {}", room.id, room.name);
    }
    Ok(())
}
