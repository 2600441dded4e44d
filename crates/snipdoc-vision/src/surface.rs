//! 픽셀 서피스.
//!
//! 생성 시 크기가 고정되는 RGBA8 버퍼. 서피스를 만든 연산이 독점 소유한다.

use image::{Rgba, RgbaImage};
use snipdoc_core::error::CoreError;
use snipdoc_core::models::geometry::PixelRect;
use snipdoc_core::models::image::EncodedImage;

/// 불투명 서피스의 배경색
const OPAQUE_BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// 2D 픽셀 버퍼
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pixels: RgbaImage,
    /// false면 불투명 서피스: 반투명 픽셀은 검은 배경 위에 합성된다
    alpha: bool,
}

impl Surface {
    /// 빈 서피스 생성
    ///
    /// 투명 서피스는 (0,0,0,0), 불투명 서피스는 (0,0,0,255)로 채운다.
    pub fn new(width: u32, height: u32, alpha: bool) -> Self {
        let fill = if alpha {
            Rgba([0, 0, 0, 0])
        } else {
            OPAQUE_BACKGROUND
        };
        Self {
            pixels: RgbaImage::from_pixel(width, height, fill),
            alpha,
        }
    }

    /// 기존 RGBA 버퍼로 투명 서피스 생성
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            alpha: true,
        }
    }

    /// 인코딩된 바이트를 디코딩하여 서피스 생성
    pub fn decode(bytes: &[u8]) -> Result<Self, CoreError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| CoreError::Encoding(format!("이미지 디코딩 실패: {e}")))?;
        Ok(Self::from_rgba(image.to_rgba8()))
    }

    /// 인코딩된 이미지로부터 서피스 생성
    pub fn from_encoded(encoded: &EncodedImage) -> Result<Self, CoreError> {
        let surface = Self::decode(&encoded.data)?;
        if surface.width() != encoded.width || surface.height() != encoded.height {
            return Err(CoreError::Encoding(format!(
                "이미지 크기 불일치: 선언 {}x{}, 실제 {}x{}",
                encoded.width,
                encoded.height,
                surface.width(),
                surface.height()
            )));
        }
        Ok(surface)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha
    }

    /// 픽셀 조회 (범위 밖이면 None)
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// `src`의 `region` 블록을 `(dest_x, dest_y)` 위치로 1:1 복사
    ///
    /// 최근접 샘플링만 사용하며 보간하지 않는다. 범위 검증은 호출자 몫이며,
    /// 대상 서피스를 벗어나는 픽셀은 버린다.
    pub(crate) fn copy_region(&mut self, src: &Surface, region: PixelRect, dest_x: u32, dest_y: u32) {
        for dy in 0..region.height {
            for dx in 0..region.width {
                let Some(pixel) = src.pixel(region.left + dx, region.top + dy) else {
                    continue;
                };
                let (tx, ty) = (dest_x + dx, dest_y + dy);
                if tx >= self.width() || ty >= self.height() {
                    continue;
                }
                let out = if self.alpha {
                    pixel
                } else {
                    flatten_over_black(pixel)
                };
                self.pixels.put_pixel(tx, ty, out);
            }
        }
    }
}

/// 반투명 픽셀을 검은 배경 위에 합성
fn flatten_over_black(pixel: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    if a == u8::MAX {
        return pixel;
    }
    let scale = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
    Rgba([scale(r), scale(g), scale(b), u8::MAX])
}
