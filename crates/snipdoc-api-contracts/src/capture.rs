//! 브라우저 스크린샷 요청/응답 계약.
//!
//! 요청: `{"type": "browser-screenshot", "rect"?: {left, top, width, height}}`
//! 응답: `{"success": true, "value": "<data URL>"}` 또는
//! `{"success": false, "error": "<message>"}`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use snipdoc_core::models::geometry::{PixelRect, Rect};

/// 스크린샷 요청 메시지 타입
pub const BROWSER_SCREENSHOT: &str = "browser-screenshot";

/// 요청 영역 (`x`/`y` 별칭 허용)
///
/// DOM 사각형에서 오므로 소수 좌표가 올 수 있다. 크롭 시 디바이스 픽셀로 반올림한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestRect {
    #[serde(alias = "x")]
    pub left: f64,
    #[serde(alias = "y")]
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl From<Rect> for RequestRect {
    fn from(r: Rect) -> Self {
        Self {
            left: r.left,
            top: r.top,
            width: r.width,
            height: r.height,
        }
    }
}

impl From<RequestRect> for PixelRect {
    fn from(r: RequestRect) -> Self {
        Rect::new(r.left, r.top, r.width, r.height).to_pixels()
    }
}

/// 스크린샷 요청
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotRequest {
    /// 메시지 타입 (항상 `browser-screenshot`)
    #[serde(rename = "type")]
    pub kind: String,
    /// 크롭 영역 (없으면 전체)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<RequestRect>,
}

impl ScreenshotRequest {
    pub fn new(rect: Option<Rect>) -> Self {
        Self {
            kind: BROWSER_SCREENSHOT.to_string(),
            rect: rect.map(RequestRect::from),
        }
    }

    /// 이 계약이 처리하는 메시지인지 확인
    pub fn is_handled(message: &Value) -> bool {
        message.get("type").and_then(Value::as_str) == Some(BROWSER_SCREENSHOT)
    }

    /// 메시지 파싱
    ///
    /// 타입이 다르면 `None`. 타입은 맞지만 형식이 틀리면 `Some(Err)`.
    pub fn parse(message: &Value) -> Option<Result<Self, serde_json::Error>> {
        if !Self::is_handled(message) {
            return None;
        }
        Some(serde_json::from_value(message.clone()))
    }

    pub fn pixel_rect(&self) -> Option<PixelRect> {
        self.rect.map(PixelRect::from)
    }
}

/// 캡처 응답
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResponse {
    /// 성공 여부
    pub success: bool,
    /// 성공 시 data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// 실패 시 메시지
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaptureResponse {
    pub fn ok(value: impl Into<String>) -> Self {
        Self {
            success: true,
            value: Some(value.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            value: None,
            error: Some(error.into()),
        }
    }
}
