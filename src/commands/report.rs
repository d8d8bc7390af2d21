//! PHDレポート（エージェント）と案件（専門業者）

use super::{confirm, print_notice, print_route, Context};
use crate::error::{DazlError, Result};
use dazl_common::api::{ApiMessage, Endpoint};
use dazl_common::notice::Notice;
use dazl_common::report::{
    format_created_at, format_price, parse_reports, BidStatus, BidStatusRequest, DeleteProjectRequest, MailPdfRequest,
    OpportunityResponse, PhdReport, ResponseBlock, ServicePhd, PROJECT_DELETED, RESPONSE_SENT,
};
use dazl_common::routes::Route;
use serde_json::Value;

async fn fetch_report(ctx: &Context, id: &str) -> Result<PhdReport> {
    ctx.require_login()?;
    let value = ctx.client()?.get_json(&Endpoint::ViewPhd(id.to_string())).await?;
    parse_reports(value)?
        .into_iter()
        .next()
        .ok_or_else(|| DazlError::Api {
            status: 404,
            message: format!("PHD {} not found", id),
        })
}

pub async fn view(ctx: &Context, id: &str) -> Result<()> {
    let report = fetch_report(ctx, id).await?;
    println!("PHD {}", report.project_id());
    if let Some(date) = report.created_at.as_deref().and_then(format_created_at) {
        println!("  作成日: {}", date);
    }
    println!("  PHD価格: {}", format_price(report.phd_price));
    println!("  事前価格: {}", format_price(report.pre_price));
    println!("  部屋:");
    for room in &report.rooms {
        let status = room.bid_status().map(|s| s.label()).unwrap_or("-");
        println!("    {:>4}  {:<20} {:<6} 画像{}枚", room.id(), room.room_name, status, room.images.len());
    }
    Ok(())
}

pub async fn bid(ctx: &Context, id: &str, room: &str, status: BidStatus) -> Result<()> {
    let report = fetch_report(ctx, id).await?;
    let request = BidStatusRequest {
        id: id.to_string(),
        room_id: room.to_string(),
        status,
    };
    let _: Value = ctx.client()?.post_json(&Endpoint::BidStatus, &request).await?;
    print_notice(&Notice::success(format!("Status set to {}", status.label())));
    println!("  想定価格: {}", format_price(report.projected_price(status)));
    Ok(())
}

pub async fn mail(ctx: &Context, id: &str, email: &str) -> Result<()> {
    ctx.require_login()?;
    let request = MailPdfRequest {
        id: id.to_string(),
        email: email.trim().to_string(),
    };
    let response: ApiMessage = ctx.client()?.post_json(&Endpoint::MailPdf, &request).await?;
    let fallback = format!("Report sent to {}", request.email);
    print_notice(&Notice::server_success(&response.message, &fallback));
    Ok(())
}

// --- 専門業者 ---

async fn fetch_opportunity(ctx: &Context, id: &str) -> Result<ServicePhd> {
    ctx.require_login()?;
    let value: Value = ctx
        .client()?
        .get_json(&Endpoint::ViewServicePhd(id.to_string()))
        .await?;
    ServicePhd::from_response(&value).ok_or_else(|| DazlError::Api {
        status: 404,
        message: format!("Project {} not found", id),
    })
}

pub async fn view_opportunity(ctx: &Context, id: &str) -> Result<()> {
    let phd = fetch_opportunity(ctx, id).await?;
    println!("案件 {}", id);
    println!("  依頼者: {} <{}>", phd.customer.full_name(), phd.customer.email);
    println!("  住所: {}", phd.customer.house.address);
    if let Some(date) = phd.updated_on() {
        println!("  更新日: {}", date);
    }
    for room in &phd.roominfo {
        let status = room.status.as_deref().unwrap_or("-");
        println!("    {:<20} {:<6} 画像{}枚", room.room_name, status, room.images.len());
    }
    Ok(())
}

pub async fn respond(
    ctx: &Context,
    id: &str,
    interested: Option<bool>,
    message: String,
    assume_yes: bool,
) -> Result<()> {
    let phd = fetch_opportunity(ctx, id).await?;
    let mut response = OpportunityResponse::new();
    response.message = message;
    if let Some(interested) = interested {
        response.set_interested(interested);
    }

    let mail = match response.build(id, &phd.customer) {
        Ok(mail) => mail,
        Err(ResponseBlock::NeedsConfirmation) => {
            if !confirm(ResponseBlock::NeedsConfirmation.message(), assume_yes)? {
                return Err(DazlError::Cancelled);
            }
            response.confirm_decline();
            response
                .build(id, &phd.customer)
                .map_err(|block| DazlError::Config(block.message().into()))?
        }
        Err(block) => return Err(DazlError::Config(block.message().into())),
    };

    let _: Value = ctx
        .client()?
        .post_json(&Endpoint::SendMailHomeOwner, &mail)
        .await?;
    print_notice(&Notice::success(RESPONSE_SENT));
    print_route(&Route::ProjectOpportunities);
    Ok(())
}

pub async fn delete_opportunity(ctx: &Context, id: &str, assume_yes: bool) -> Result<()> {
    ctx.require_login()?;
    if !confirm("Are you sure you want to delete this project?", assume_yes)? {
        return Err(DazlError::Cancelled);
    }
    let request = DeleteProjectRequest {
        project_id: id.to_string(),
    };
    let _: Value = ctx
        .client()?
        .post_json(&Endpoint::DeleteProfessionalProject, &request)
        .await?;
    print_notice(&Notice::success(PROJECT_DELETED));
    print_route(&Route::ProjectOpportunities);
    Ok(())
}
