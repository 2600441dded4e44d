//! 서피스 인코더.
//!
//! 서피스를 PNG/JPEG/WebP 바이너리로 직렬화한다.
//! 직렬화는 블로킹 작업이므로 `spawn_blocking`에서 실행하며,
//! 실패한 작업은 재시도하지 않고 `CoreError::Encoding`으로 돌려준다.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, ImageReader};
use snipdoc_core::error::CoreError;
use snipdoc_core::models::image::{EncodedImage, ImageMimeType, ImageOptions};
use std::io::Cursor;
use tracing::debug;

use crate::surface::Surface;

/// 인코딩 입력
#[derive(Debug)]
pub enum ImageSource {
    /// 직렬화할 서피스
    Surface(Surface),
    /// 이미 인코딩된 바이트 (그대로 통과)
    Bytes(Vec<u8>),
}

impl From<Surface> for ImageSource {
    fn from(surface: Surface) -> Self {
        ImageSource::Surface(surface)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

/// 서피스 또는 인코딩된 바이트를 [`EncodedImage`]로 변환
///
/// 서피스는 `opts`의 MIME 타입/품질로 직렬화하고, 바이트는 헤더에서
/// 크기와 포맷만 읽어 그대로 통과시킨다.
pub async fn to_encoded(source: ImageSource, opts: ImageOptions) -> Result<EncodedImage, CoreError> {
    match source {
        ImageSource::Surface(surface) => {
            tokio::task::spawn_blocking(move || encode_surface(&surface, opts))
                .await
                .map_err(|e| CoreError::Encoding(format!("인코딩 작업 실패: {e}")))?
        }
        ImageSource::Bytes(bytes) => probe_encoded(bytes),
    }
}

/// [`to_encoded`] 결과를 data URL로 반환
pub async fn to_data_url(source: ImageSource, opts: ImageOptions) -> Result<String, CoreError> {
    let encoded = to_encoded(source, opts).await?;
    Ok(encoded.to_data_url())
}

/// 서피스 동기 직렬화
pub fn encode_surface(surface: &Surface, opts: ImageOptions) -> Result<EncodedImage, CoreError> {
    let (width, height) = (surface.width(), surface.height());
    if width == 0 || height == 0 {
        return Err(CoreError::Encoding(format!(
            "빈 서피스는 래스터화할 수 없음: {width}x{height}"
        )));
    }

    let data = match opts.mime_type {
        ImageMimeType::Png => encode_png(surface)?,
        ImageMimeType::Jpeg => encode_jpeg(surface, opts.quality)?,
        ImageMimeType::Webp => encode_webp(surface, opts.quality),
    };

    if data.is_empty() {
        return Err(CoreError::Encoding(format!(
            "{} 직렬화 결과 없음",
            opts.mime_type
        )));
    }

    debug!(
        "서피스 인코딩: {}x{} → {} bytes ({}, 품질 {:.2})",
        width,
        height,
        data.len(),
        opts.mime_type,
        opts.quality
    );

    Ok(EncodedImage {
        data,
        width,
        height,
        mime_type: opts.mime_type,
    })
}

/// 인코딩된 바이트의 헤더를 읽어 크기/포맷 확인
pub fn probe_encoded(bytes: Vec<u8>) -> Result<EncodedImage, CoreError> {
    let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| CoreError::Encoding(format!("이미지 헤더 읽기 실패: {e}")))?;

    let mime_type = match reader.format() {
        Some(ImageFormat::Png) => ImageMimeType::Png,
        Some(ImageFormat::Jpeg) => ImageMimeType::Jpeg,
        Some(ImageFormat::WebP) => ImageMimeType::Webp,
        Some(other) => {
            return Err(CoreError::Encoding(format!(
                "지원하지 않는 이미지 포맷: {other:?}"
            )))
        }
        None => return Err(CoreError::Encoding("알 수 없는 이미지 포맷".to_string())),
    };

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| CoreError::Encoding(format!("이미지 크기 읽기 실패: {e}")))?;

    Ok(EncodedImage {
        data: bytes,
        width,
        height,
        mime_type,
    })
}

fn encode_png(surface: &Surface) -> Result<Vec<u8>, CoreError> {
    let rgba = surface.as_rgba();
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            rgba.as_raw(),
            rgba.width(),
            rgba.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| CoreError::Encoding(format!("PNG 인코딩 실패: {e}")))?;
    Ok(buf)
}

fn encode_jpeg(surface: &Surface, quality: f32) -> Result<Vec<u8>, CoreError> {
    // JPEG은 알파 채널이 없다
    let rgb = DynamicImage::ImageRgba8(surface.as_rgba().clone()).to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, jpeg_quality(quality))
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| CoreError::Encoding(format!("JPEG 인코딩 실패: {e}")))?;
    Ok(buf)
}

fn encode_webp(surface: &Surface, quality: f32) -> Vec<u8> {
    let rgba = surface.as_rgba();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
    let encoded = if quality >= 1.0 {
        encoder.encode_lossless()
    } else {
        encoder.encode(quality * 100.0)
    };
    encoded.to_vec()
}

/// 0.0 ~ 1.0 품질을 JPEG 1 ~ 100으로 변환
fn jpeg_quality(quality: f32) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}
