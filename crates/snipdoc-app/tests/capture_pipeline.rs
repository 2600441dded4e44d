//! 캡처 파이프라인 통합 테스트.
//!
//! 요청 계약 → 처리기 → 캡처 제공자 → 크롭 → data URL cross-crate 연동.

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use serde_json::json;
use snipdoc_api_contracts::capture::{CaptureResponse, ScreenshotRequest};
use snipdoc_core::config::AppConfig;
use snipdoc_core::error::CoreError;
use snipdoc_core::models::geometry::{PixelRect, Rect};
use snipdoc_core::models::image::{EncodedImage, ImageMimeType, ImageOptions};
use snipdoc_core::ports::capture::{CaptureProvider, SenderInfo};
use snipdoc_vision::capture_handler::{
    AllowListAuthorizer, ScreenshotHandler, CAPTURE_FAILED_MESSAGE, REJECTED_MESSAGE,
};
use snipdoc_vision::crop::{crop_from_encoded, extract};
use snipdoc_vision::data_url::decode_data_url;
use snipdoc_vision::encoder::encode_surface;
use snipdoc_vision::surface::Surface;
use std::sync::Arc;

/// 좌표를 색으로 인코딩한 100x100 화면
fn coordinate_surface() -> Surface {
    let mut img = RgbaImage::new(100, 100);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgba([x as u8, y as u8, 200, 255]);
    }
    Surface::from_rgba(img)
}

struct ScreenProvider {
    screen: EncodedImage,
}

#[async_trait]
impl CaptureProvider for ScreenProvider {
    async fn capture_visible(&self) -> Result<EncodedImage, CoreError> {
        Ok(self.screen.clone())
    }
}

struct BrokenProvider;

#[async_trait]
impl CaptureProvider for BrokenProvider {
    async fn capture_visible(&self) -> Result<EncodedImage, CoreError> {
        Err(CoreError::Internal("브리지 응답 없음".to_string()))
    }
}

fn handler_with(provider: Arc<dyn CaptureProvider>, config: &AppConfig) -> ScreenshotHandler {
    ScreenshotHandler::new(
        provider,
        Arc::new(AllowListAuthorizer::new(
            config.capture.allowed_senders.clone(),
        )),
        config.capture.image_options(),
    )
}

fn trusted_config() -> AppConfig {
    let mut config = AppConfig::default_config();
    config.capture.allowed_senders = vec!["viewer-extension".to_string()];
    config
}

/// 요청 rect → 크롭 → 픽셀 충실도
#[tokio::test]
async fn screenshot_request_crops_exact_pixels() {
    let screen = encode_surface(&coordinate_surface(), ImageOptions::default()).unwrap();
    let handler = handler_with(Arc::new(ScreenProvider { screen }), &trusted_config());

    let request = ScreenshotRequest::new(Some(Rect::new(10.0, 20.0, 30.0, 40.0)));
    let response = handler
        .handle(
            &serde_json::to_value(&request).unwrap(),
            &SenderInfo::with_id("viewer-extension"),
        )
        .await;

    assert!(response.success);
    let cropped = decode_data_url(&response.value.unwrap()).unwrap();
    assert_eq!((cropped.width, cropped.height), (30, 40));

    let surface = Surface::from_encoded(&cropped).unwrap();
    assert_eq!(surface.pixel(0, 0), Some(Rgba([10, 20, 200, 255])));
    assert_eq!(surface.pixel(29, 39), Some(Rgba([39, 59, 200, 255])));
}

/// x/y 별칭 rect도 같은 결과
#[tokio::test]
async fn rect_aliases_accepted() {
    let screen = encode_surface(&coordinate_surface(), ImageOptions::default()).unwrap();
    let handler = handler_with(Arc::new(ScreenProvider { screen }), &trusted_config());

    let response = handler
        .handle(
            &json!({"type": "browser-screenshot", "rect": {"x": 1, "y": 2, "width": 3, "height": 4}}),
            &SenderInfo::with_id("viewer-extension"),
        )
        .await;

    let cropped = decode_data_url(&response.value.unwrap()).unwrap();
    assert_eq!((cropped.width, cropped.height), (3, 4));
}

/// DOM 사각형의 소수 좌표는 디바이스 픽셀로 반올림
#[tokio::test]
async fn fractional_rect_is_cropped() {
    let screen = encode_surface(&coordinate_surface(), ImageOptions::default()).unwrap();
    let handler = handler_with(Arc::new(ScreenProvider { screen }), &trusted_config());

    let response = handler
        .handle(
            &json!({"type": "browser-screenshot", "rect": {"x": 5.5, "y": 5, "width": 10, "height": 4}}),
            &SenderInfo::with_id("viewer-extension"),
        )
        .await;

    assert!(response.success, "{response:?}");
    let cropped = decode_data_url(&response.value.unwrap()).unwrap();
    assert_eq!((cropped.width, cropped.height), (10, 4));

    let surface = Surface::from_encoded(&cropped).unwrap();
    assert_eq!(surface.pixel(0, 0), Some(Rgba([6, 5, 200, 255])));
}

/// 형식이 틀린 요청도 외부에는 일반 거부로 보임
#[tokio::test]
async fn malformed_request_gets_generic_rejection() {
    let screen = encode_surface(&coordinate_surface(), ImageOptions::default()).unwrap();
    let handler = handler_with(Arc::new(ScreenProvider { screen }), &trusted_config());

    let response = handler
        .handle(
            &json!({"type": "browser-screenshot", "rect": "everything"}),
            &SenderInfo::with_id("viewer-extension"),
        )
        .await;
    assert_eq!(response, CaptureResponse::failure(REJECTED_MESSAGE));
}

/// 응답 JSON 형태
#[tokio::test]
async fn response_wire_shape() {
    let screen = encode_surface(&coordinate_surface(), ImageOptions::default()).unwrap();
    let handler = handler_with(Arc::new(ScreenProvider { screen }), &trusted_config());

    let ok = handler
        .handle(
            &json!({"type": "browser-screenshot"}),
            &SenderInfo::with_id("viewer-extension"),
        )
        .await;
    let ok_json = serde_json::to_value(&ok).unwrap();
    assert_eq!(ok_json["success"], json!(true));
    assert!(ok_json["value"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    assert!(ok_json.get("error").is_none());

    let rejected = handler
        .handle(&json!({"type": "browser-screenshot"}), &SenderInfo::default())
        .await;
    assert_eq!(
        serde_json::to_value(&rejected).unwrap(),
        json!({"success": false, "error": REJECTED_MESSAGE})
    );
}

/// 기본 설정은 허용 송신자가 없으므로 전부 거부
#[tokio::test]
async fn default_config_rejects_everyone() {
    let screen = encode_surface(&coordinate_surface(), ImageOptions::default()).unwrap();
    let handler = handler_with(
        Arc::new(ScreenProvider { screen }),
        &AppConfig::default_config(),
    );

    let response = handler
        .handle(
            &json!({"type": "browser-screenshot"}),
            &SenderInfo::with_id("viewer-extension"),
        )
        .await;
    assert_eq!(response, CaptureResponse::failure(REJECTED_MESSAGE));
}

/// 제공자 에러는 종류와 관계없이 일반 실패로 응답
#[tokio::test]
async fn provider_error_is_generic() {
    let handler = handler_with(Arc::new(BrokenProvider), &trusted_config());

    let response = handler
        .handle(
            &json!({"type": "browser-screenshot"}),
            &SenderInfo::with_id("viewer-extension"),
        )
        .await;
    assert_eq!(response, CaptureResponse::failure(CAPTURE_FAILED_MESSAGE));
}

/// 같은 서피스의 PNG 인코딩은 바이트 단위로 동일
#[tokio::test]
async fn png_encoding_is_deterministic() {
    let surface = coordinate_surface();
    let rect = PixelRect::new(5, 5, 50, 50);

    let first = extract(Some(&surface), rect, ImageOptions::default())
        .await
        .unwrap();
    let second = extract(Some(&surface), rect, ImageOptions::default())
        .await
        .unwrap();
    assert_eq!(first.data, second.data);
}

/// data URL 입력 크롭 + 손실 포맷 출력
#[tokio::test]
async fn crop_data_url_to_jpeg() {
    let url = encode_surface(&coordinate_surface(), ImageOptions::default())
        .unwrap()
        .to_data_url();

    let cropped = crop_from_encoded(
        url.into(),
        PixelRect::new(0, 0, 16, 8),
        ImageOptions::new(ImageMimeType::Jpeg, 0.9),
    )
    .await
    .unwrap();

    assert_eq!(cropped.mime_type, ImageMimeType::Jpeg);
    assert_eq!((cropped.width, cropped.height), (16, 8));
    assert!(cropped.to_data_url().starts_with("data:image/jpeg;base64,"));
}
