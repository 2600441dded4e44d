//! data URL 디코딩.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use snipdoc_core::error::CoreError;
use snipdoc_core::models::image::{EncodedImage, ImageMimeType};

use crate::encoder::probe_encoded;

/// `data:<mime>;base64,<payload>` 문자열을 [`EncodedImage`]로 디코딩
///
/// 선언된 MIME 타입과 실제 헤더가 다르면 실제 포맷을 따른다.
pub fn decode_data_url(url: &str) -> Result<EncodedImage, CoreError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| CoreError::Encoding("data URL 접두사 없음".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CoreError::Encoding("data URL 페이로드 구분자 없음".to_string()))?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| CoreError::Encoding("base64 data URL만 지원".to_string()))?;

    mime.parse::<ImageMimeType>().map_err(CoreError::Encoding)?;

    let bytes = B64
        .decode(payload.trim())
        .map_err(|e| CoreError::Encoding(format!("base64 디코딩 실패: {e}")))?;

    probe_encoded(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_surface;
    use crate::surface::Surface;
    use snipdoc_core::models::image::ImageOptions;

    #[test]
    fn decode_roundtrip_of_encoded_image() {
        let encoded = encode_surface(&Surface::new(3, 5, false), ImageOptions::default()).unwrap();
        let decoded = decode_data_url(&encoded.to_data_url()).unwrap();
        assert_eq!(decoded, encoded);
    }

    #[test]
    fn rejects_malformed_urls() {
        for url in [
            "image/png;base64,AAAA",
            "data:image/png;base64",
            "data:image/png,AAAA",
            "data:text/plain;base64,AAAA",
            "data:image/png;base64,@@@",
        ] {
            assert!(
                matches!(decode_data_url(url), Err(CoreError::Encoding(_))),
                "{url}"
            );
        }
    }
}
