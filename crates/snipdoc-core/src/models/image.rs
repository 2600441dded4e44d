//! 인코딩된 이미지 모델.
//!
//! 코덱 파이프라인의 출력 페이로드와 인코딩 옵션을 정의한다.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 기본 MIME 타입 (무손실 PNG)
pub const DEFAULT_MIME_TYPE: ImageMimeType = ImageMimeType::Png;

/// 기본 품질 (1.0 = 무손실)
pub const DEFAULT_QUALITY: f32 = 1.0;

/// 지원 이미지 MIME 타입
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageMimeType {
    /// 무손실 PNG
    #[default]
    #[serde(rename = "image/png")]
    Png,
    /// 손실 JPEG (알파 없음)
    #[serde(rename = "image/jpeg")]
    Jpeg,
    /// WebP (품질 1.0이면 무손실)
    #[serde(rename = "image/webp")]
    Webp,
}

impl ImageMimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMimeType::Png => "image/png",
            ImageMimeType::Jpeg => "image/jpeg",
            ImageMimeType::Webp => "image/webp",
        }
    }
}

impl fmt::Display for ImageMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageMimeType {
    type Err = String;

    /// MIME 문자열 또는 짧은 이름(`png`, `jpeg`, `jpg`, `webp`) 파싱
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image/png" | "png" => Ok(ImageMimeType::Png),
            "image/jpeg" | "image/jpg" | "jpeg" | "jpg" => Ok(ImageMimeType::Jpeg),
            "image/webp" | "webp" => Ok(ImageMimeType::Webp),
            other => Err(format!("지원하지 않는 이미지 타입: {other}")),
        }
    }
}

/// 인코딩 옵션
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageOptions {
    /// 출력 MIME 타입
    #[serde(default)]
    pub mime_type: ImageMimeType,
    /// 품질 (0.0 ~ 1.0, 손실 포맷에만 적용)
    #[serde(default = "default_quality")]
    pub quality: f32,
}

impl ImageOptions {
    pub fn new(mime_type: ImageMimeType, quality: f32) -> Self {
        Self {
            mime_type,
            quality: quality.clamp(0.0, 1.0),
        }
    }
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            mime_type: DEFAULT_MIME_TYPE,
            quality: DEFAULT_QUALITY,
        }
    }
}

fn default_quality() -> f32 {
    DEFAULT_QUALITY
}

/// 인코딩 완료된 이미지 (불변)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// 인코딩된 바이트
    pub data: Vec<u8>,
    /// 너비 (픽셀)
    pub width: u32,
    /// 높이 (픽셀)
    pub height: u32,
    /// MIME 타입
    pub mime_type: ImageMimeType,
}

impl EncodedImage {
    /// `data:<mime>;base64,<payload>` 형식 문자열
    ///
    /// 실제 주소로 전송되지 않으므로 URL 길이 제한이 없다.
    pub fn to_data_url(&self) -> String {
        let payload = B64.encode(&self.data);
        let mut url = String::with_capacity(payload.len() + 32);
        url.push_str("data:");
        url.push_str(self.mime_type.as_str());
        url.push_str(";base64,");
        url.push_str(&payload);
        url
    }
}
