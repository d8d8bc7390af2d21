//! PHDレポートと専門業者向け案件
//!
//! - エージェント: レポート閲覧、入札ステータス選択、PDFメール送信
//! - 専門業者: 案件閲覧、興味あり/なしの返信、案件削除

use crate::api::unwrap_data;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 入札ステータスによる価格の増減
pub const BID_PRICE_STEP: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidStatus {
    Bid,
    #[serde(rename = "D.I.Y")]
    Diy,
    Pass,
}

impl BidStatus {
    pub const ALL: [BidStatus; 3] = [BidStatus::Bid, BidStatus::Diy, BidStatus::Pass];

    pub fn label(&self) -> &'static str {
        match self {
            BidStatus::Bid => "Bid",
            BidStatus::Diy => "D.I.Y",
            BidStatus::Pass => "Pass",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bid" => Some(BidStatus::Bid),
            "d.i.y" | "diy" => Some(BidStatus::Diy),
            "pass" => Some(BidStatus::Pass),
            _ => None,
        }
    }

    /// ステータス選択後の想定価格
    pub fn projected_price(&self, base: f64) -> f64 {
        match self {
            BidStatus::Bid => base + BID_PRICE_STEP,
            BidStatus::Diy => base,
            BidStatus::Pass => base - BID_PRICE_STEP,
        }
    }
}

/// 数値でも文字列でも受け付ける価格
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.replace(',', "").trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// レポート内の部屋
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReportRoom {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ReportRoom {
    pub fn id(&self) -> String {
        id_string(&self.id)
    }

    pub fn bid_status(&self) -> Option<BidStatus> {
        self.status.as_deref().and_then(BidStatus::parse)
    }
}

/// `GET /phd/{id}?value=open` の1件
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PhdReport {
    #[serde(default)]
    pub project_id: Value,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub phd_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pre_price: f64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, alias = "roominfo")]
    pub rooms: Vec<ReportRoom>,
}

impl PhdReport {
    pub fn project_id(&self) -> String {
        id_string(&self.project_id)
    }

    pub fn projected_price(&self, status: BidStatus) -> f64 {
        status.projected_price(self.phd_price)
    }
}

/// レポート一覧の応答（配列・単体・null のいずれも受け付ける）
pub fn parse_reports(value: Value) -> crate::Result<Vec<PhdReport>> {
    match unwrap_data(value) {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<_, _>>()?),
        Value::Null => Ok(Vec::new()),
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}

/// "$1,234,567" 形式
pub fn format_price(price: f64) -> String {
    let whole = price.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}${}", if whole < 0 { "-" } else { "" }, grouped)
}

/// `POST /phd/bid-status`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidStatusRequest {
    pub id: String,
    pub room_id: String,
    pub status: BidStatus,
}

/// `POST /phd/mail-pdf`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailPdfRequest {
    pub id: String,
    pub email: String,
}

/// "January 5, 2024" 形式の日付
pub fn format_created_at(timestamp: &str) -> Option<String> {
    const FORMAT: &str = "%B %-d, %Y";
    let timestamp = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(dt.format(FORMAT).to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.format(FORMAT).to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.format(FORMAT).to_string());
    }
    NaiveDate::parse_from_str(timestamp, "%Y-%m-%d")
        .ok()
        .map(|d| d.format(FORMAT).to_string())
}

// --- 専門業者向け ---

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct House {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Customer {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub house: House,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// 専門業者が閲覧する案件
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServicePhd {
    #[serde(default)]
    pub customer: Customer,
    #[serde(default)]
    pub roominfo: Vec<ReportRoom>,
}

impl ServicePhd {
    /// `reports.original.final` を取り出す
    pub fn from_response(body: &Value) -> Option<Self> {
        let report = body.pointer("/reports/original/final")?;
        serde_json::from_value(report.clone()).ok()
    }

    pub fn updated_on(&self) -> Option<String> {
        self.customer.updated_at.as_deref().and_then(format_created_at)
    }
}

/// 返信前に防ぐべき状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseBlock {
    /// 興味あり/なしが未選択
    NoChoice,
    /// 辞退には確認が必要
    NeedsConfirmation,
}

impl ResponseBlock {
    pub fn message(&self) -> &'static str {
        match self {
            ResponseBlock::NoChoice => "Please select whether you are interested",
            ResponseBlock::NeedsConfirmation => "Are you sure you want to decline this project?",
        }
    }
}

/// 専門業者の返信（入力中の状態）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpportunityResponse {
    pub message: String,
    pub interested: Option<bool>,
    decline_confirmed: bool,
}

impl OpportunityResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_interested(&mut self, interested: bool) {
        self.interested = Some(interested);
        if interested {
            self.decline_confirmed = false;
        }
    }

    /// 辞退確認モーダルで「はい」を押した
    pub fn confirm_decline(&mut self) {
        if self.interested == Some(false) {
            self.decline_confirmed = true;
        }
    }

    pub fn cancel_decline(&mut self) {
        self.decline_confirmed = false;
    }

    /// 送信用のメール本文を組み立てる
    pub fn build(&self, project_id: &str, customer: &Customer) -> Result<HomeOwnerMail, ResponseBlock> {
        let interested = self.interested.ok_or(ResponseBlock::NoChoice)?;
        if !interested && !self.decline_confirmed {
            return Err(ResponseBlock::NeedsConfirmation);
        }
        Ok(HomeOwnerMail {
            project_id: project_id.to_string(),
            message: self.message.trim().to_string(),
            is_interested: interested,
            home_owner_mail: customer.email.clone(),
            home_owner_name: customer.full_name(),
        })
    }
}

/// `POST /professional/send-mail`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeOwnerMail {
    pub project_id: String,
    pub message: String,
    pub is_interested: bool,
    pub home_owner_mail: String,
    pub home_owner_name: String,
}

/// `POST /professional/projects/delete`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteProjectRequest {
    pub project_id: String,
}

pub const RESPONSE_SENT: &str = "Response Sent successfully";
pub const PROJECT_DELETED: &str = "Project deleted successfully";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_reports_shapes() {
        let list = parse_reports(json!({"data": [{"project_id": 1, "phd_price": 10}]})).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].project_id(), "1");

        let single = parse_reports(json!({"project_id": "a", "phd_price": "5"})).unwrap();
        assert_eq!(single[0].phd_price, 5.0);

        assert!(parse_reports(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1_234_567.0), "$1,234,567");
        assert_eq!(format_price(500.0), "$500");
        assert_eq!(format_price(-100_000.0), "-$100,000");
    }

    #[test]
    fn test_bid_status_projection() {
        assert_eq!(BidStatus::Bid.projected_price(250_000.0), 350_000.0);
        assert_eq!(BidStatus::Diy.projected_price(250_000.0), 250_000.0);
        assert_eq!(BidStatus::Pass.projected_price(250_000.0), 150_000.0);
        assert_eq!(serde_json::to_value(BidStatus::Diy).unwrap(), json!("D.I.Y"));
        assert_eq!(BidStatus::parse("diy"), Some(BidStatus::Diy));
    }

    #[test]
    fn test_format_created_at() {
        assert_eq!(
            format_created_at("2024-01-05T10:30:00.000000Z").as_deref(),
            Some("January 5, 2024")
        );
        assert_eq!(
            format_created_at("2023-11-20 08:00:00").as_deref(),
            Some("November 20, 2023")
        );
        assert_eq!(format_created_at("2024-03-09").as_deref(), Some("March 9, 2024"));
        assert_eq!(format_created_at("yesterday"), None);
    }

    #[test]
    fn test_report_accepts_string_prices() {
        let report: PhdReport = serde_json::from_value(json!({
            "project_id": 12,
            "phd_price": "450,000",
            "pre_price": 400000,
            "rooms": [
                {"id": 1, "room_name": "Kitchen", "status": "Bid"},
                {"id": 2, "room_name": "Bath", "status": "Pass"}
            ]
        }))
        .unwrap();
        assert_eq!(report.project_id(), "12");
        assert_eq!(report.phd_price, 450_000.0);
        assert_eq!(report.pre_price, 400_000.0);
        assert_eq!(report.rooms[0].bid_status(), Some(BidStatus::Bid));
        assert_eq!(report.projected_price(BidStatus::Pass), 350_000.0);
    }

    #[test]
    fn test_service_phd_from_response() {
        let body = json!({
            "reports": {"original": {"final": {
                "customer": {
                    "first_name": "Sam",
                    "last_name": "Park",
                    "email": "sam@example.com",
                    "updated_at": "2024-01-05T00:00:00Z",
                    "house": {"address": "1 Elm St"}
                },
                "roominfo": [{"room_name": "Kitchen", "status": "Bid", "images": ["a.jpg"]}]
            }}}
        });
        let phd = ServicePhd::from_response(&body).unwrap();
        assert_eq!(phd.customer.full_name(), "Sam Park");
        assert_eq!(phd.customer.house.address, "1 Elm St");
        assert_eq!(phd.roominfo[0].images, vec!["a.jpg".to_string()]);
        assert_eq!(phd.updated_on().as_deref(), Some("January 5, 2024"));
        assert!(ServicePhd::from_response(&json!({})).is_none());
    }

    #[test]
    fn test_decline_requires_confirmation() {
        let customer = Customer {
            first_name: "Sam".into(),
            last_name: "Park".into(),
            email: "sam@example.com".into(),
            ..Default::default()
        };
        let mut response = OpportunityResponse::new();
        assert_eq!(response.build("9", &customer), Err(ResponseBlock::NoChoice));

        response.set_interested(false);
        assert_eq!(response.build("9", &customer), Err(ResponseBlock::NeedsConfirmation));

        response.confirm_decline();
        let mail = response.build("9", &customer).unwrap();
        assert!(!mail.is_interested);
        assert_eq!(
            serde_json::to_value(&mail).unwrap(),
            json!({
                "projectId": "9",
                "message": "",
                "isInterested": false,
                "homeOwnerMail": "sam@example.com",
                "homeOwnerName": "Sam Park"
            })
        );
    }

    #[test]
    fn test_interested_needs_no_confirmation() {
        let mut response = OpportunityResponse::new();
        response.message = "  Happy to help  ".into();
        response.set_interested(true);
        let mail = response.build("3", &Customer::default()).unwrap();
        assert!(mail.is_interested);
        assert_eq!(mail.message, "Happy to help");
    }
}
