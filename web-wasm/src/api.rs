//! Dazl API呼び出し
//!
//! fetch にトークンを付けて送り、`{"data": ...}` を外したJSONを返す。
//! エラーはサーバーの message をそのまま文字列で返す。
//! 部屋の送信手順は `dazl_common::dispatch` を使う。

use crate::storage;
use async_trait::async_trait;
use dazl_common::api::{bearer, error_message, unwrap_data, Endpoint, Method, DEFAULT_BASE_URL, UPLOAD_FIELD};
use dazl_common::dispatch::{dispatch, Dispatched, RoomState, RoomTransport};
use dazl_common::payload::{ProjectBody, ProjectKind, RoomEntry, RoomSubmission};
use dazl_common::upload::{UploadResponse, UploadedImageRef};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, RequestMode, Response};

fn js_error(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

async fn send(endpoint: &Endpoint, body: Option<JsValue>, json: bool) -> Result<Value, String> {
    let window = web_sys::window().ok_or("window is unavailable")?;
    let session = storage::session();
    let token = session.token();
    if token.is_none() && !endpoint.is_public() {
        return Err("Please log in first".to_string());
    }

    let opts = RequestInit::new();
    opts.set_method(match endpoint.method() {
        Method::Get => "GET",
        Method::Post => "POST",
    });
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = body.as_ref() {
        opts.set_body(body);
    }

    let request = Request::new_with_str_and_init(&endpoint.url(DEFAULT_BASE_URL), &opts).map_err(js_error)?;
    let headers = request.headers();
    headers.set("Accept", "application/json").map_err(js_error)?;
    if json {
        headers.set("Content-Type", "application/json").map_err(js_error)?;
    }
    if let Some(token) = token {
        headers.set("Authorization", &bearer(&token)).map_err(js_error)?;
    }

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let resp: Response = resp_value.dyn_into().map_err(js_error)?;
    let text = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .unwrap_or_default();

    if !resp.ok() {
        let message = error_message(&text).unwrap_or_else(|| format!("Request failed ({})", resp.status()));
        gloo::console::warn!(format!("{} {}: {}", resp.status(), endpoint.path(), message));
        return Err(message);
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| format!("JSON parse error: {}", e))
}

/// `{"data": ...}` を外した応答
pub async fn get(endpoint: &Endpoint) -> Result<Value, String> {
    send(endpoint, None, false).await.map(unwrap_data)
}

pub async fn post<B: Serialize>(endpoint: &Endpoint, body: &B) -> Result<Value, String> {
    let body = serde_json::to_string(body).map_err(|e| e.to_string())?;
    send(endpoint, Some(JsValue::from_str(&body)), true).await
}

/// 応答を型に読む
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    serde_json::from_value(value).map_err(|e| format!("JSON parse error: {}", e))
}

/// 画像アップロード（multipart の "image" フィールド）
pub async fn upload_image(file: &File) -> Result<UploadedImageRef, String> {
    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename(UPLOAD_FIELD, file, &file.name())
        .map_err(js_error)?;
    let value = send(&Endpoint::UploadImage, Some(form.into()), false).await?;
    let response: UploadResponse = decode(value)?;
    Ok(response.into())
}

/// fetch の失敗メッセージ
pub struct FetchError(pub String);

impl From<dazl_common::Error> for FetchError {
    fn from(err: dazl_common::Error) -> Self {
        FetchError(err.to_string())
    }
}

/// 部屋追加・プロジェクト送信を fetch で行う
struct FetchTransport;

#[async_trait(?Send)]
impl RoomTransport for FetchTransport {
    type Error = FetchError;

    async fn add_room(&self, entry: &RoomEntry) -> Result<Value, FetchError> {
        post(&Endpoint::AddRoom, entry).await.map(unwrap_data).map_err(FetchError)
    }

    async fn submit_project(&self, kind: ProjectKind, body: &ProjectBody) -> Result<(), FetchError> {
        post(&Endpoint::SubmitProject(kind), body).await.map(|_| ()).map_err(FetchError)
    }
}

/// 部屋・設備を送信し、成功したら状態を片付ける。失敗時は状態を変えない
pub async fn dispatch_room(
    kind: ProjectKind,
    submission: &RoomSubmission,
    room_name: &str,
    state: RoomState<'_>,
) -> Result<Dispatched, String> {
    let mut session = storage::session();
    dispatch(&FetchTransport, &mut session, kind, submission, room_name, state)
        .await
        .map_err(|e| e.0)
}
