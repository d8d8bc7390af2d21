//! 画面ごとのフォーム定義
//!
//! 各フォームは `schema()` で検証ルールを、`from_values()` で送信用の型を提供する。

use crate::validation::{FormValues, Schema};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref UPPERCASE_RE: Regex = Regex::new("[A-Z]").expect("uppercase pattern");
    static ref DIGIT_RE: Regex = Regex::new("[0-9]").expect("digit pattern");
    static ref DIGITS_ONLY_RE: Regex = Regex::new("^[0-9]+$").expect("digits pattern");
}

/// 価格レンジ入力の上限
pub const PRICE_LIMIT: u32 = 100_000;

/// エージェント登録フォーム
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSignup {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number: String,
    pub password: String,
    pub confirm_password: String,
    pub company_name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub agree_to_terms: bool,
    pub subscription: String,
}

impl AgentSignup {
    pub fn schema() -> Schema {
        Schema::new()
            .field("firstName", |f| f.required("First Name is required").trim())
            .field("lastName", |f| f.required("Last Name is required").trim())
            .field("email", |f| {
                f.required("Email is required")
                    .email("Please enter valid email address")
                    .trim()
            })
            .field("password", |f| {
                f.required("Password is required")
                    .matches(&UPPERCASE_RE, "Password must contain at least one uppercase letter")
                    .matches(&DIGIT_RE, "Password must contain at least one number")
                    .min_len(8, "Password must be atleast 8 characters long")
                    .trim()
            })
            .field("confirmPassword", |f| {
                f.required("Confirm password is required")
                    .equals_field("password", "Passwords do not match")
                    .trim()
            })
            .field("companyName", |f| f.required("companyName is required").trim())
            .field("city", |f| f.required("Location is required").trim())
            .field("state", |f| f.required("state is required").trim())
            .field("zip", |f| f.required("Zip Code is required").trim())
            .field("agreeToTerms", |f| {
                f.must_be_true("Please accept the terms and conditions")
            })
            .field("subscription", |f| {
                f.required("Please select a subscription option")
            })
    }

    pub fn from_values(values: &FormValues) -> Self {
        Self {
            first_name: values.trimmed("firstName"),
            last_name: values.trimmed("lastName"),
            email: values.trimmed("email"),
            number: values.trimmed("number"),
            password: values.trimmed("password"),
            confirm_password: values.trimmed("confirmPassword"),
            company_name: values.trimmed("companyName"),
            street_address: values.trimmed("streetAddress"),
            city: values.trimmed("city"),
            state: values.trimmed("state"),
            zip: values.trimmed("zip"),
            agree_to_terms: values.flag("agreeToTerms"),
            subscription: values.trimmed("subscription"),
        }
    }
}

/// 顧客（ホームオーナー）登録フォーム
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSignup {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub zip_code: String,
    pub number: String,
    pub agree_to_terms: bool,
}

impl CustomerSignup {
    pub fn schema() -> Schema {
        Schema::new()
            .field("firstName", |f| {
                f.required("First Name is required")
                    .min_len(1, "First Name have atleast 1 characters")
                    .trim()
            })
            .field("lastName", |f| {
                f.required("Last Name is required")
                    .min_len(2, "Last Name have atleast 2 characters")
                    .trim()
            })
            .field("email", |f| {
                f.required("Email is required")
                    .email("Please enter valid email address")
                    .trim()
            })
            .field("password", |f| {
                f.required("Password is required")
                    .min_len(6, "Password have atleast 6 characters long")
                    .max_len(15, "Password have atmost 15 characters long")
                    .trim()
            })
            .field("confirmPassword", |f| {
                f.required("Confirm password is required")
                    .equals_field("password", "Passwords do not match")
                    .trim()
            })
            .field("zipCode", |f| f.required("Zip Code is required").trim())
            .field("number", |f| {
                f.required("Number is required")
                    .matches(&DIGITS_ONLY_RE, "Phone number is required")
                    .trim()
            })
            .field("agreeToTerms", |f| {
                f.must_be_true("Please accept the terms and conditions")
            })
    }

    pub fn from_values(values: &FormValues) -> Self {
        Self {
            first_name: values.trimmed("firstName"),
            last_name: values.trimmed("lastName"),
            email: values.trimmed("email"),
            password: values.trimmed("password"),
            confirm_password: values.trimmed("confirmPassword"),
            zip_code: values.trimmed("zipCode"),
            number: values.trimmed("number"),
            agree_to_terms: values.flag("agreeToTerms"),
        }
    }
}

/// ログインフォーム
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

impl Login {
    pub fn schema() -> Schema {
        Schema::new()
            .field("email", |f| {
                f.required("Email is required")
                    .email("Please enter valid email address")
                    .trim()
            })
            .field("password", |f| f.required("Password is required"))
    }

    pub fn from_values(values: &FormValues) -> Self {
        Self {
            email: values.trimmed("email"),
            password: values.text("password").to_string(),
        }
    }
}

/// PHD作成ステップ1: 売主情報
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub location: String,
}

impl ClientDetails {
    pub fn schema() -> Schema {
        Schema::new()
            .field("firstName", |f| {
                f.required("First Name is required")
                    .min_len(1, "First Name have atleast 1 character")
                    .trim()
            })
            .field("lastName", |f| {
                f.required("Last Name is required")
                    .min_len(1, "Last Name have atleast 1 character")
                    .trim()
            })
            .field("email", |f| {
                f.required("Email is required")
                    .email("Please enter valid email address")
                    .trim()
            })
            .field("location", |f| {
                f.required("Location is required")
                    .min_len(1, "Location have atleast 1 character")
                    .trim()
            })
    }

    pub fn from_values(values: &FormValues) -> Self {
        Self {
            first_name: values.trimmed("firstName"),
            last_name: values.trimmed("lastName"),
            email: values.trimmed("email"),
            location: values.trimmed("location"),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// お問い合わせフォーム（送信形式はsnake_case）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub member_name: String,
    pub property_address: String,
    pub company_name: String,
    pub contact_name: String,
    pub issue_description: String,
    pub steps_resolve_issue: String,
    pub issue_solution: String,
    pub images: Vec<String>,
    pub images_description: Vec<String>,
}

impl ContactRequest {
    pub fn schema() -> Schema {
        Schema::new()
            .field("memberName", |f| f.required("memberName is required"))
            .field("propertyAddress", |f| f.required("propertyAddress is required"))
            .field("companyName", |f| f.required("companyName is required"))
            .field("contactName", |f| f.required("contactName is required"))
            .field("describeIssue", |f| f.required("describeIssue is required"))
            .field("stepsToResolve", |f| f.required("stepsToResolve is required"))
            .field("howIssueResolved", |f| f.required("howIssueResolved is required"))
    }

    /// 添付写真は (画像参照, 説明) の組で渡す
    pub fn from_values(values: &FormValues, photos: Vec<(String, String)>) -> Self {
        let (images, images_description) = photos.into_iter().unzip();
        Self {
            member_name: values.text("memberName").to_string(),
            property_address: values.text("propertyAddress").to_string(),
            company_name: values.text("companyName").to_string(),
            contact_name: values.text("contactName").to_string(),
            issue_description: values.text("describeIssue").to_string(),
            steps_resolve_issue: values.text("stepsToResolve").to_string(),
            issue_solution: values.text("howIssueResolved").to_string(),
            images,
            images_description,
        }
    }
}

/// サーバー側のエージェントプロフィール
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentProfileRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub real_state_agency_name: Option<String>,
    pub city_of_real_state_agency: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: String,
}

/// エージェントプロフィール編集フォーム
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company_name: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub number: String,
}

impl AgentProfile {
    pub fn schema() -> Schema {
        Schema::new()
            .field("firstName", |f| {
                f.required("First Name is required")
                    .min_len(3, "First Name must be atleast 3 charachters")
            })
            .field("lastName", |f| {
                f.required("Last Name is required")
                    .min_len(3, "Last Name must be atleast 3 charachters")
            })
            .field("email", |f| {
                f.required("Email is required")
                    .email("Please enter valid email address")
                    .trim()
            })
            .field("companyName", |f| {
                f.required("companyName is required")
                    .min_len(3, "companyName must be atleast 3 charachters")
                    .trim()
            })
            .field("city", |f| f.min_len(3, "City must be atleast 3 charachters").trim())
            .field("state", |f| f.min_len(3, "State must be atleast 3 charachters").trim())
            .field("number", |f| {
                f.required("Number is required")
                    .matches(&DIGITS_ONLY_RE, "Phone number is required")
                    .trim()
            })
    }

    /// 取得済みプロフィールからフォーム初期値を作る
    pub fn values_from_record(record: &AgentProfileRecord) -> FormValues {
        FormValues::new()
            .with_text("firstName", record.first_name.clone())
            .with_text("lastName", record.last_name.clone())
            .with_text("email", record.email.clone())
            .with_text("companyName", record.real_state_agency_name.clone().unwrap_or_default())
            .with_text("city", record.city_of_real_state_agency.clone().unwrap_or_default())
            .with_text("state", record.state.clone().unwrap_or_default())
            .with_text("zipCode", record.zip_code.clone().unwrap_or_default())
            .with_text("number", record.phone_number.clone())
    }

    pub fn from_values(values: &FormValues) -> Self {
        Self {
            first_name: values.text("firstName").to_string(),
            last_name: values.text("lastName").to_string(),
            email: values.trimmed("email"),
            company_name: values.trimmed("companyName"),
            city: values.trimmed("city"),
            state: values.trimmed("state"),
            zip_code: values.trimmed("zipCode"),
            number: values.trimmed("number"),
        }
    }
}

/// PHD作成ステップ2: 価格レンジ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: u32,
    pub high: u32,
    pub value: u32,
    #[serde(skip)]
    error: Option<String>,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            low: 0,
            high: 600,
            value: 300,
            error: None,
        }
    }
}

impl PriceRange {
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 下限を入力（不正値の場合は値を変えずにエラーを設定）
    pub fn set_low(&mut self, input: &str) {
        match parse_price(input) {
            Some(low) => {
                self.error = (low >= self.high)
                    .then(|| "Low value must be less than the high value.".to_string());
                self.low = low;
                self.clamp_value();
            }
            None => {
                self.error = Some("Enter a valid low value between 0 and 100000.".to_string());
            }
        }
    }

    pub fn set_high(&mut self, input: &str) {
        match parse_price(input) {
            Some(high) => {
                self.error = (high <= self.low)
                    .then(|| "High value must be greater than the low value.".to_string());
                self.high = high;
                self.clamp_value();
            }
            None => {
                self.error = Some("Enter a valid high value between 0 and 100000.".to_string());
            }
        }
    }

    /// スライダー値はレンジ内に収める
    pub fn set_value(&mut self, value: u32) {
        self.value = value;
        self.clamp_value();
    }

    /// レンジが逆転している間は値を動かさない
    fn clamp_value(&mut self) {
        if self.low <= self.high {
            self.value = self.value.clamp(self.low, self.high);
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if self.low >= self.high {
            return Err("Low value must be less than the high value.".to_string());
        }
        if !(self.low..=self.high).contains(&self.value) {
            return Err("Value must be between the low and high values.".to_string());
        }
        Ok(())
    }
}

fn parse_price(input: &str) -> Option<u32> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|v| *v <= PRICE_LIMIT)
}
