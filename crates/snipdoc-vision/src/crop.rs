//! 픽셀 영역 추출 (크롭).
//!
//! 스크린샷 충실도를 위해 보간 없이 1:1 최근접 샘플링으로 복사한다.
//! 추출(`extract_surface`)과 직렬화(`encoder`)를 분리해 두어
//! 추출 로직은 인코딩 없이 픽셀 버퍼만으로 검증할 수 있다.

use snipdoc_core::error::CoreError;
use snipdoc_core::models::geometry::PixelRect;
use snipdoc_core::models::image::{EncodedImage, ImageOptions};
use tracing::debug;

use crate::data_url::decode_data_url;
use crate::encoder::{to_encoded, ImageSource};
use crate::surface::Surface;

/// 크롭 입력 (인코딩된 이미지 또는 data URL)
#[derive(Debug, Clone)]
pub enum EncodedSource {
    Image(EncodedImage),
    DataUrl(String),
}

impl From<EncodedImage> for EncodedSource {
    fn from(image: EncodedImage) -> Self {
        EncodedSource::Image(image)
    }
}

impl From<String> for EncodedSource {
    fn from(url: String) -> Self {
        EncodedSource::DataUrl(url)
    }
}

/// `rect` 영역을 정확히 `rect.width x rect.height` 크기의 새 불투명 서피스로 복사
///
/// - 소스 없음 → `SourceUnavailable`
/// - 영역이 소스를 벗어나거나 면적이 0 → `InvalidRegion` (잘라내서 맞추지 않는다)
pub fn extract_surface(source: Option<&Surface>, rect: PixelRect) -> Result<Surface, CoreError> {
    let source = source.ok_or(CoreError::SourceUnavailable)?;

    if rect.is_empty() || !rect.fits_within(source.width(), source.height()) {
        return Err(CoreError::InvalidRegion {
            rect,
            width: source.width(),
            height: source.height(),
        });
    }

    let mut target = Surface::new(rect.width, rect.height, false);
    target.copy_region(source, rect, 0, 0);

    debug!(
        "영역 추출: {}x{} 소스에서 {}",
        source.width(),
        source.height(),
        rect
    );

    Ok(target)
}

/// 영역 추출 후 인코딩
pub async fn extract(
    source: Option<&Surface>,
    rect: PixelRect,
    opts: ImageOptions,
) -> Result<EncodedImage, CoreError> {
    let target = extract_surface(source, rect)?;
    to_encoded(ImageSource::Surface(target), opts).await
}

/// 인코딩된 이미지를 디코딩한 뒤 [`extract`]
pub async fn crop_from_encoded(
    source: EncodedSource,
    rect: PixelRect,
    opts: ImageOptions,
) -> Result<EncodedImage, CoreError> {
    let encoded = match source {
        EncodedSource::Image(image) => image,
        EncodedSource::DataUrl(url) => decode_data_url(&url)?,
    };

    let surface = tokio::task::spawn_blocking(move || Surface::from_encoded(&encoded))
        .await
        .map_err(|e| CoreError::Encoding(format!("디코딩 작업 실패: {e}")))??;

    extract(Some(&surface), rect, opts).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use image::{Rgba, RgbaImage};
    use snipdoc_core::models::image::ImageMimeType;

    fn gradient_surface(w: u32, h: u32) -> Surface {
        let mut img = RgbaImage::new(w, h);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([x as u8, y as u8, (x ^ y) as u8, 255]);
        }
        Surface::from_rgba(img)
    }

    #[test]
    fn extract_surface_copies_exact_block() {
        let source = gradient_surface(100, 100);
        let out = extract_surface(Some(&source), PixelRect::new(10, 20, 30, 40)).unwrap();

        assert_eq!((out.width(), out.height()), (30, 40));
        assert_eq!(out.pixel(0, 0), source.pixel(10, 20));
        assert_eq!(out.pixel(29, 39), source.pixel(39, 59));
        assert!(!out.has_alpha());
    }

    #[tokio::test]
    async fn extract_encodes_target_size() {
        let source = gradient_surface(100, 100);
        let rect = PixelRect::new(10, 20, 30, 40);

        let encoded = extract(Some(&source), rect, ImageOptions::default())
            .await
            .unwrap();
        assert_eq!((encoded.width, encoded.height), (30, 40));
        assert_eq!(encoded.mime_type, ImageMimeType::Png);

        let decoded = Surface::decode(&encoded.data).unwrap();
        assert_eq!(decoded.pixel(0, 0), source.pixel(10, 20));
    }

    #[test]
    fn extract_rejects_out_of_bounds() {
        let source = gradient_surface(100, 100);

        let result = extract_surface(Some(&source), PixelRect::new(80, 0, 21, 10));
        assert_matches!(
            result,
            Err(CoreError::InvalidRegion {
                width: 100,
                height: 100,
                ..
            })
        );

        let result = extract_surface(Some(&source), PixelRect::new(0, 95, 10, 6));
        assert_matches!(result, Err(CoreError::InvalidRegion { .. }));
    }

    #[test]
    fn extract_full_surface_is_allowed() {
        let source = gradient_surface(16, 8);
        let out = extract_surface(Some(&source), PixelRect::new(0, 0, 16, 8)).unwrap();
        assert_eq!(out.as_rgba(), source.as_rgba());
    }

    #[test]
    fn extract_rejects_empty_rect() {
        let source = gradient_surface(10, 10);
        let result = extract_surface(Some(&source), PixelRect::new(0, 0, 0, 5));
        assert_matches!(result, Err(CoreError::InvalidRegion { .. }));
    }

    #[tokio::test]
    async fn extract_without_source() {
        let result = extract(None, PixelRect::new(0, 0, 1, 1), ImageOptions::default()).await;
        assert_matches!(result, Err(CoreError::SourceUnavailable));
    }

    #[tokio::test]
    async fn crop_from_data_url() {
        let source = gradient_surface(50, 50);
        let encoded = extract(Some(&source), PixelRect::new(0, 0, 50, 50), ImageOptions::default())
            .await
            .unwrap();

        let cropped = crop_from_encoded(
            EncodedSource::DataUrl(encoded.to_data_url()),
            PixelRect::new(5, 6, 7, 8),
            ImageOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!((cropped.width, cropped.height), (7, 8));
        let decoded = Surface::decode(&cropped.data).unwrap();
        assert_eq!(decoded.pixel(0, 0), source.pixel(5, 6));
    }

    #[tokio::test]
    async fn crop_from_encoded_checks_bounds_of_decoded_image() {
        let encoded = extract(
            Some(&gradient_surface(20, 20)),
            PixelRect::new(0, 0, 20, 20),
            ImageOptions::default(),
        )
        .await
        .unwrap();

        let result = crop_from_encoded(
            encoded.into(),
            PixelRect::new(15, 15, 10, 10),
            ImageOptions::default(),
        )
        .await;
        assert_matches!(result, Err(CoreError::InvalidRegion { .. }));
    }
}
