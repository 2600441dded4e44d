//! 애플리케이션 설정 구조체.
//!
//! 캡처 인코딩 기본값, 오버레이 배치, 뷰어 모드 등 런타임 설정을 정의한다.
//! `ConfigManager`를 통해 JSON 파일에서 로드/저장한다.

use serde::{Deserialize, Serialize};

use crate::models::image::{ImageMimeType, ImageOptions, DEFAULT_QUALITY};

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 캡처/인코딩 설정
    #[serde(default)]
    pub capture: CaptureConfig,
    /// 오버레이 배치 설정
    #[serde(default)]
    pub overlay: OverlayConfig,
    /// 뷰어 설정
    #[serde(default)]
    pub viewer: ViewerConfig,
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }
}

// ============================================================
// 캡처 설정
// ============================================================

/// 캡처 설정: 인코딩 기본값, 허용 송신자
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// 출력 MIME 타입
    #[serde(default)]
    pub mime_type: ImageMimeType,
    /// 인코딩 품질 (0.0 ~ 1.0)
    #[serde(default = "default_quality")]
    pub quality: f32,
    /// 캡처 요청을 허용할 송신자 ID 목록
    #[serde(default)]
    pub allowed_senders: Vec<String>,
}

impl CaptureConfig {
    /// 인코딩 옵션으로 변환
    pub fn image_options(&self) -> ImageOptions {
        ImageOptions::new(self.mime_type, self.quality)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            mime_type: ImageMimeType::Png,
            quality: DEFAULT_QUALITY,
            allowed_senders: Vec::new(),
        }
    }
}

fn default_quality() -> f32 {
    DEFAULT_QUALITY
}

// ============================================================
// 오버레이 설정
// ============================================================

/// 오버레이 설정: 선택 영역 위 컨트롤 배치
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// 앵커 기준 수평 오프셋 (컨트롤 중앙 정렬용)
    #[serde(default = "default_offset_x")]
    pub offset_x: f64,
    /// 앵커 기준 수직 오프셋 (선택 영역 위로)
    #[serde(default = "default_offset_y")]
    pub offset_y: f64,
    /// 쌓임 순서
    #[serde(default = "default_z_index")]
    pub z_index: i32,
    /// 오버레이 노드 마커 클래스
    #[serde(default = "default_marker_class")]
    pub marker_class: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            offset_x: default_offset_x(),
            offset_y: default_offset_y(),
            z_index: default_z_index(),
            marker_class: default_marker_class(),
        }
    }
}

fn default_offset_x() -> f64 {
    -75.0
}

fn default_offset_y() -> f64 {
    -50.0
}

fn default_z_index() -> i32 {
    10_000
}

fn default_marker_class() -> String {
    "annotation-bar".to_string()
}

// ============================================================
// 뷰어 설정
// ============================================================

/// 뷰어 렌더링 모드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerMode {
    /// 페이지 단위 뷰어 (PDF 등)
    #[default]
    LegacyPaged,
    /// 단일 연속 흐름 (HTML 등, 중첩 프레임 포함)
    ContinuousFlow,
}

/// 뷰어 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// 렌더링 모드
    #[serde(default)]
    pub mode: ViewerMode,
    /// 페이지 뷰어 컨테이너 요소 id
    #[serde(default = "default_viewer_container_id")]
    pub viewer_container_id: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            mode: ViewerMode::LegacyPaged,
            viewer_container_id: default_viewer_container_id(),
        }
    }
}

fn default_viewer_container_id() -> String {
    "viewerContainer".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{"overlay": {"offset_y": -20.0}, "viewer": {"mode": "continuous_flow"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.overlay.offset_x, -75.0);
        assert_eq!(config.overlay.offset_y, -20.0);
        assert_eq!(config.overlay.marker_class, "annotation-bar");
        assert_eq!(config.viewer.mode, ViewerMode::ContinuousFlow);
        assert_eq!(config.viewer.viewer_container_id, "viewerContainer");
        assert_eq!(config.capture.mime_type, ImageMimeType::Png);
    }

    #[test]
    fn capture_options_from_config() {
        let capture = CaptureConfig {
            mime_type: ImageMimeType::Jpeg,
            quality: 0.8,
            allowed_senders: vec![],
        };
        let opts = capture.image_options();
        assert_eq!(opts.mime_type, ImageMimeType::Jpeg);
        assert!((opts.quality - 0.8).abs() < f32::EPSILON);
    }
}
