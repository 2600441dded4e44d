//! 파일 기반 크롭/인코딩 명령.

use snipdoc_core::config::AppConfig;
use snipdoc_core::error::CoreError;
use snipdoc_core::models::geometry::PixelRect;
use snipdoc_core::models::image::{EncodedImage, ImageMimeType, ImageOptions};
use snipdoc_vision::crop::extract;
use snipdoc_vision::encoder::{to_data_url, ImageSource};
use snipdoc_vision::surface::Surface;
use std::path::Path;
use tracing::debug;

/// CLI 인자 > 설정값 순으로 인코딩 옵션 결정
pub fn resolve_options(
    config: &AppConfig,
    format: Option<ImageMimeType>,
    quality: Option<f32>,
) -> ImageOptions {
    let base = config.capture.image_options();
    ImageOptions::new(
        format.unwrap_or(base.mime_type),
        quality.unwrap_or(base.quality),
    )
}

/// 이미지 파일에서 `rect` 영역을 잘라 인코딩
pub async fn crop_file(
    path: &Path,
    rect: PixelRect,
    opts: ImageOptions,
) -> Result<EncodedImage, CoreError> {
    let bytes = tokio::fs::read(path).await?;
    debug!("입력 로드: {} ({} bytes)", path.display(), bytes.len());

    let surface = tokio::task::spawn_blocking(move || Surface::decode(&bytes))
        .await
        .map_err(|e| CoreError::Internal(format!("디코딩 작업 실패: {e}")))??;

    extract(Some(&surface), rect, opts).await
}

/// 이미지 파일을 재인코딩 없이 data URL로 변환
pub async fn file_data_url(path: &Path) -> Result<String, CoreError> {
    let bytes = tokio::fs::read(path).await?;
    to_data_url(ImageSource::Bytes(bytes), ImageOptions::default()).await
}

pub async fn write_encoded(path: &Path, encoded: &EncodedImage) -> Result<(), CoreError> {
    tokio::fs::write(path, &encoded.data).await?;
    Ok(())
}
