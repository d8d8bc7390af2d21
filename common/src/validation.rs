//! フォーム検証
//!
//! フィールド名 → 入力値のマップを宣言的なルールで検証する。
//! 1フィールドにつき最初に失敗したルールのメッセージのみを返す。

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern");
}

/// 受け付ける画像MIMEタイプ
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];

/// 添付画像の最大サイズ (5 MiB)
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// 入力値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

/// フォームの現在値
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormValues {
    fields: BTreeMap<String, FieldValue>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_text(name, value);
        self
    }

    pub fn with_bool(mut self, name: &str, value: bool) -> Self {
        self.set_bool(name, value);
        self
    }

    pub fn set_text(&mut self, name: &str, value: impl Into<String>) {
        self.fields
            .insert(name.to_string(), FieldValue::Text(value.into()));
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.fields.insert(name.to_string(), FieldValue::Bool(value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// テキスト値（未設定・真偽値は空文字）
    pub fn text(&self, name: &str) -> &str {
        match self.fields.get(name) {
            Some(FieldValue::Text(text)) => text.as_str(),
            _ => "",
        }
    }

    /// 前後の空白を除いたテキスト値
    pub fn trimmed(&self, name: &str) -> String {
        self.text(name).trim().to_string()
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.fields.get(name), Some(FieldValue::Bool(true)))
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

/// 検証ルール
#[derive(Debug, Clone)]
pub enum Rule {
    Required(String),
    MinLen(usize, String),
    MaxLen(usize, String),
    Matches(Regex, String),
    Email(String),
    EqualsField(String, String),
    MustBeTrue(String),
}

/// 1フィールド分のルール
#[derive(Debug, Clone)]
pub struct FieldRules {
    name: String,
    trim: bool,
    rules: Vec<Rule>,
}

impl FieldRules {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            trim: false,
            rules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn required(mut self, message: &str) -> Self {
        self.rules.push(Rule::Required(message.to_string()));
        self
    }

    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn min_len(mut self, len: usize, message: &str) -> Self {
        self.rules.push(Rule::MinLen(len, message.to_string()));
        self
    }

    pub fn max_len(mut self, len: usize, message: &str) -> Self {
        self.rules.push(Rule::MaxLen(len, message.to_string()));
        self
    }

    pub fn matches(mut self, pattern: &Regex, message: &str) -> Self {
        self.rules
            .push(Rule::Matches(pattern.clone(), message.to_string()));
        self
    }

    pub fn email(mut self, message: &str) -> Self {
        self.rules.push(Rule::Email(message.to_string()));
        self
    }

    pub fn equals_field(mut self, other: &str, message: &str) -> Self {
        self.rules
            .push(Rule::EqualsField(other.to_string(), message.to_string()));
        self
    }

    pub fn must_be_true(mut self, message: &str) -> Self {
        self.rules.push(Rule::MustBeTrue(message.to_string()));
        self
    }

    fn normalized<'a>(&self, values: &'a FormValues, name: &str) -> &'a str {
        let text = values.text(name);
        if self.trim {
            text.trim()
        } else {
            text
        }
    }

    fn check(&self, values: &FormValues) -> Option<String> {
        let text = self.normalized(values, &self.name);
        let is_bool = matches!(values.get(&self.name), Some(FieldValue::Bool(_)));

        for rule in &self.rules {
            let failed = match rule {
                Rule::Required(_) => !is_bool && text.is_empty(),
                Rule::MinLen(len, _) => text.chars().count() < *len,
                Rule::MaxLen(len, _) => text.chars().count() > *len,
                Rule::Matches(re, _) => !re.is_match(text),
                // 空文字はrequiredの担当
                Rule::Email(_) => !text.is_empty() && !EMAIL_RE.is_match(text),
                Rule::EqualsField(other, _) => text != self.normalized(values, other),
                Rule::MustBeTrue(_) => !values.flag(&self.name),
            };
            if failed {
                return Some(rule_message(rule).to_string());
            }
        }
        None
    }
}

fn rule_message(rule: &Rule) -> &str {
    match rule {
        Rule::Required(msg)
        | Rule::MinLen(_, msg)
        | Rule::MaxLen(_, msg)
        | Rule::Matches(_, msg)
        | Rule::Email(msg)
        | Rule::EqualsField(_, msg)
        | Rule::MustBeTrue(msg) => msg,
    }
}

/// フォームスキーマ
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldRules>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, build: impl FnOnce(FieldRules) -> FieldRules) -> Self {
        self.fields.push(build(FieldRules::new(name)));
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    /// 全フィールドを検証（送信時）
    pub fn validate(&self, values: &FormValues) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for field in &self.fields {
            if let Some(message) = field.check(values) {
                errors.insert(&field.name, message);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// 単一フィールドを検証（入力時）
    pub fn validate_field(&self, name: &str, values: &FormValues) -> Option<String> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.check(values))
    }
}

/// フィールドごとのエラーメッセージ（スキーマ順）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    entries: Vec<(String, String)>,
}

impl ValidationErrors {
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some(entry) => entry.1 = message,
            None => self.entries.push((field.to_string(), message)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, msg)| msg.as_str())
    }

    pub fn remove(&mut self, field: &str) {
        self.entries.retain(|(name, _)| name != field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .entries
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        write!(f, "{}", joined.join("; "))
    }
}

/// パスワード確認の一致状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordMatch {
    Matching,
    Mismatched,
}

pub fn password_confirmation(password: &str, confirm: &str) -> PasswordMatch {
    if password == confirm {
        PasswordMatch::Matching
    } else {
        PasswordMatch::Mismatched
    }
}

/// 選択されたファイルのメタ情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// 添付ファイルのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileError {
    #[error("Invalid file type. Please select a valid image.")]
    InvalidType(String),

    #[error("File size is too large")]
    TooLarge(u64),
}

/// 画像ファイルのMIMEタイプとサイズを検査
pub fn validate_image_file(file: &FileMeta) -> Result<(), FileError> {
    let mime = file.mime_type.to_ascii_lowercase();
    if !ACCEPTED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err(FileError::InvalidType(file.mime_type.clone()));
    }
    if file.size > MAX_IMAGE_BYTES {
        return Err(FileError::TooLarge(file.size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_schema() -> Schema {
        Schema::new()
            .field("firstName", |f| f.required("First Name is required").trim())
            .field("email", |f| {
                f.required("Email is required")
                    .email("Please enter valid email address")
                    .trim()
            })
    }

    #[test]
    fn test_required_fields_report_verbatim_messages() {
        let errors = name_schema().validate(&FormValues::new()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("firstName"), Some("First Name is required"));
        assert_eq!(errors.get("email"), Some("Email is required"));
    }

    #[test]
    fn test_trim_applies_before_required() {
        let values = FormValues::new()
            .with_text("firstName", "   ")
            .with_text("email", "a@b.co");
        let errors = name_schema().validate(&values).unwrap_err();
        assert_eq!(errors.get("firstName"), Some("First Name is required"));
        assert_eq!(errors.get("email"), None);
    }

    #[test]
    fn test_email_format() {
        let values = FormValues::new()
            .with_text("firstName", "Ann")
            .with_text("email", "not-an-email");
        let errors = name_schema().validate(&values).unwrap_err();
        assert_eq!(errors.get("email"), Some("Please enter valid email address"));
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let re = Regex::new("[0-9]").unwrap();
        let schema = Schema::new().field("password", |f| {
            f.required("Password is required")
                .matches(&re, "Password must contain at least one number")
                .min_len(8, "Password must be atleast 8 characters long")
        });
        let values = FormValues::new().with_text("password", "abc");
        assert_eq!(
            schema.validate_field("password", &values).as_deref(),
            Some("Password must contain at least one number")
        );
        let values = FormValues::new().with_text("password", "abc1");
        assert_eq!(
            schema.validate_field("password", &values).as_deref(),
            Some("Password must be atleast 8 characters long")
        );
    }

    #[test]
    fn test_max_len() {
        let schema = Schema::new().field("zip", |f| f.max_len(6, "too long"));
        let values = FormValues::new().with_text("zip", "1234567");
        assert_eq!(schema.validate_field("zip", &values).as_deref(), Some("too long"));
        let values = FormValues::new().with_text("zip", "123456");
        assert!(schema.validate(&values).is_ok());
    }

    #[test]
    fn test_equals_field() {
        let schema = Schema::new().field("confirmPassword", |f| {
            f.required("Confirm password is required")
                .equals_field("password", "Passwords do not match")
        });
        let values = FormValues::new()
            .with_text("password", "Secret123")
            .with_text("confirmPassword", "Secret124");
        let errors = schema.validate(&values).unwrap_err();
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));

        let values = FormValues::new()
            .with_text("password", "Secret123")
            .with_text("confirmPassword", "Secret123");
        assert!(schema.validate(&values).is_ok());
    }

    #[test]
    fn test_must_be_true() {
        let schema = Schema::new().field("agreeToTerms", |f| {
            f.must_be_true("Please accept the terms and conditions")
        });
        let values = FormValues::new().with_bool("agreeToTerms", false);
        assert!(schema.validate(&values).is_err());
        let values = FormValues::new().with_bool("agreeToTerms", true);
        assert!(schema.validate(&values).is_ok());
    }

    #[test]
    fn test_password_confirmation() {
        assert_eq!(password_confirmation("abc", "abd"), PasswordMatch::Mismatched);
        assert_eq!(password_confirmation("abc", ""), PasswordMatch::Mismatched);
        assert_eq!(password_confirmation("abc", "abc"), PasswordMatch::Matching);
    }

    #[test]
    fn test_validate_image_file() {
        assert!(validate_image_file(&FileMeta::new("a.jpg", "image/jpeg", 10)).is_ok());
        assert!(validate_image_file(&FileMeta::new("a.png", "image/png", 10)).is_ok());
        assert!(validate_image_file(&FileMeta::new("a.jpg", "image/jpg", 10)).is_ok());

        let err = validate_image_file(&FileMeta::new("a.gif", "image/gif", 10)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid file type. Please select a valid image.");

        let err = validate_image_file(&FileMeta::new("a.pdf", "application/pdf", 10)).unwrap_err();
        assert!(matches!(err, FileError::InvalidType(_)));

        let err = validate_image_file(&FileMeta::new("big.png", "image/png", MAX_IMAGE_BYTES + 1))
            .unwrap_err();
        assert_eq!(err, FileError::TooLarge(MAX_IMAGE_BYTES + 1));
    }

    #[test]
    fn test_errors_display_and_remove() {
        let mut errors = ValidationErrors::default();
        errors.insert("a", "A is required");
        errors.insert("b", "B is required");
        assert_eq!(errors.to_string(), "a: A is required; b: B is required");
        errors.remove("a");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.iter().next(), Some(("b", "B is required")));
    }
}
