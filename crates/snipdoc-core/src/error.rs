//! snipdoc 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 에러를 그대로 반환하거나 경계에서 변환한다.

use thiserror::Error;

use crate::models::geometry::PixelRect;

/// 코어 레이어 에러.
/// 이미지 코덱, 페이지 해석, 캡처 요청 처리 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 서피스 직렬화 실패 (래스터화 불가, 빈 출력, 디코딩 실패)
    #[error("인코딩 에러: {0}")]
    Encoding(String),

    /// 크롭 영역이 소스 범위를 벗어남
    #[error("잘못된 영역: {rect} (소스 {width}x{height})")]
    InvalidRegion {
        /// 요청된 크롭 영역
        rect: PixelRect,
        /// 소스 너비
        width: u32,
        /// 소스 높이
        height: u32,
    },

    /// 픽셀 소스가 주어지지 않음
    #[error("픽셀 소스 없음")]
    SourceUnavailable,

    /// 선택 영역을 감싸는 페이지를 찾지 못함 (비치명적)
    #[error("페이지 해석 실패: {0}")]
    PageResolution(String),

    /// 캡처 요청자가 허가되지 않음
    #[error("권한 없음: {0}")]
    Unauthorized(String),

    /// 하위 캡처 호출 실패
    #[error("캡처 전송 실패: {0}")]
    Transport(String),

    /// 문서 트리에서 요소를 찾을 수 없음
    #[error("요소 미발견: {0}")]
    ElementNotFound(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_region_display_includes_bounds() {
        let err = CoreError::InvalidRegion {
            rect: PixelRect::new(90, 0, 20, 10),
            width: 100,
            height: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("90,0 20x10"));
        assert!(msg.contains("100x100"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
