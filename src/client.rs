//! Dazl REST APIクライアント（reqwest）

use crate::config::Config;
use crate::error::{DazlError, Result};
use crate::project::dispatch::{ProjectApi, RoomTransport};
use crate::project::upload::LocalImage;
use async_trait::async_trait;
use dazl_common::api::{bearer, error_message, unwrap_data, Endpoint, Method, UPLOAD_FIELD};
use dazl_common::payload::{ProjectBody, ProjectKind, RoomEntry};
use dazl_common::upload::{UploadResponse, UploadedImageRef};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, endpoint: &Endpoint) -> Result<RequestBuilder> {
        let url = endpoint.url(&self.base_url);
        debug!(?endpoint, %url, "request");
        let builder = match endpoint.method() {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };
        let builder = builder.header(ACCEPT, "application/json");
        match &self.token {
            Some(token) => Ok(builder.header(AUTHORIZATION, bearer(token))),
            None if endpoint.is_public() => Ok(builder),
            None => Err(DazlError::NotLoggedIn),
        }
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(DazlError::Api {
                status: status.as_u16(),
                message,
            });
        }
        // 空ボディは null として扱う
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let response = self.request(endpoint)?.send().await?;
        Self::read(response).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<T> {
        let response = self
            .request(endpoint)?
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;
        Self::read(response).await
    }
}

#[async_trait]
impl ProjectApi for ApiClient {
    async fn upload_image(&self, image: &LocalImage) -> Result<UploadedImageRef> {
        let bytes = tokio::fs::read(&image.path).await?;
        let part = Part::bytes(bytes)
            .file_name(image.meta.name.clone())
            .mime_str(&image.meta.mime_type)?;
        let form = Form::new().part(UPLOAD_FIELD, part);
        let response = self
            .request(&Endpoint::UploadImage)?
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = Self::read(response).await?;
        Ok(uploaded.into())
    }
}

#[async_trait(?Send)]
impl RoomTransport for ApiClient {
    type Error = DazlError;

    async fn add_room(&self, entry: &RoomEntry) -> Result<Value> {
        let saved: Value = self.post_json(&Endpoint::AddRoom, entry).await?;
        Ok(unwrap_data(saved))
    }

    async fn submit_project(&self, kind: ProjectKind, body: &ProjectBody) -> Result<()> {
        let _: Value = self.post_json(&Endpoint::SubmitProject(kind), body).await?;
        Ok(())
    }
}
