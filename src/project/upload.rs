//! ローカル画像のアップロード
//!
//! MIMEタイプはファイル拡張子から判定し、不正なファイルは送信前に弾く。

use crate::error::{DazlError, Result};
use crate::project::dispatch::ProjectApi;
use dazl_common::feature_list::SlotId;
use dazl_common::upload::{ImageSlots, UploadOutcome, UploadSlots};
use dazl_common::validation::FileMeta;
use image::ImageFormat;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// アップロード対象のローカル画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalImage {
    pub path: PathBuf,
    pub meta: FileMeta,
}

impl LocalImage {
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .map_err(|_| DazlError::FileNotFound(path.display().to_string()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            meta: FileMeta::new(name, mime_type_for(path)?, metadata.len()),
        })
    }
}

/// 拡張子からMIMEタイプを判定
pub fn mime_type_for(path: &Path) -> Result<String> {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .map_err(|_| DazlError::UnsupportedImage(path.display().to_string()))
}

/// 1スロット分をアップロードして結果を反映
pub async fn upload_to_slot<A, T>(
    api: &A,
    uploads: &mut UploadSlots,
    target: &mut T,
    slot: SlotId,
    image: &LocalImage,
) -> Result<UploadOutcome>
where
    A: ProjectApi + ?Sized,
    T: ImageSlots,
{
    let ticket = uploads.begin(slot, &image.meta)?;
    debug!(slot = slot.value(), file = %image.meta.name, "upload started");
    let result = api
        .upload_image(image)
        .await
        .map_err(|e| e.notice_message());
    let outcome = uploads.complete(target, ticket, result);
    if let UploadOutcome::Failed(message) = &outcome {
        warn!(slot = slot.value(), "upload failed: {}", message);
    }
    Ok(outcome)
}

/// 複数スロットを順にアップロード（スピナー表示付き）
pub async fn upload_all<A, T>(
    api: &A,
    uploads: &mut UploadSlots,
    target: &mut T,
    jobs: &[(SlotId, LocalImage)],
) -> Result<Vec<UploadOutcome>>
where
    A: ProjectApi + ?Sized,
    T: ImageSlots,
{
    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut outcomes = Vec::with_capacity(jobs.len());
    for (slot, image) in jobs {
        pb.set_message(image.meta.name.clone());
        outcomes.push(upload_to_slot(api, uploads, target, *slot, image).await?);
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(outcomes)
}
