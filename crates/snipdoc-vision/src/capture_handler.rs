//! 브라우저 스크린샷 요청 처리기.
//!
//! 확장 메시징 브리지에서 들어온 `browser-screenshot` 요청을 받아
//! 가시 영역을 캡처하고, 요청에 영역이 있으면 잘라서 data URL로 응답한다.
//!
//! 처리 대상이 아닌 메시지, 권한 없는 송신자, 형식이 틀린 요청은
//! 내부 로그만 다르고 외부에는 같은 일반 실패 응답을 돌려준다.

use serde_json::Value;
use snipdoc_api_contracts::capture::{CaptureResponse, ScreenshotRequest};
use snipdoc_core::error::CoreError;
use snipdoc_core::models::image::ImageOptions;
use snipdoc_core::ports::capture::{CaptureProvider, SenderAuthorizer, SenderInfo};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::crop::crop_from_encoded;

/// 거부된 요청에 대한 일반 응답 메시지
pub const REJECTED_MESSAGE: &str = "request rejected";

/// 캡처 실패에 대한 일반 응답 메시지
pub const CAPTURE_FAILED_MESSAGE: &str = "screenshot failed";

/// 설정된 송신자 ID만 허용하는 인가기
#[derive(Debug, Clone, Default)]
pub struct AllowListAuthorizer {
    allowed: HashSet<String>,
}

impl AllowListAuthorizer {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl SenderAuthorizer for AllowListAuthorizer {
    fn is_authorized(&self, sender: &SenderInfo) -> bool {
        sender
            .id
            .as_deref()
            .is_some_and(|id| self.allowed.contains(id))
    }
}

/// 스크린샷 요청 처리기
pub struct ScreenshotHandler {
    provider: Arc<dyn CaptureProvider>,
    authorizer: Arc<dyn SenderAuthorizer>,
    options: ImageOptions,
}

impl ScreenshotHandler {
    pub fn new(
        provider: Arc<dyn CaptureProvider>,
        authorizer: Arc<dyn SenderAuthorizer>,
        options: ImageOptions,
    ) -> Self {
        Self {
            provider,
            authorizer,
            options,
        }
    }

    /// 메시지 처리 후 응답 반환
    pub async fn handle(&self, message: &Value, sender: &SenderInfo) -> CaptureResponse {
        match self.admit(message, sender) {
            Ok(request) => self.respond(request).await,
            Err(_) => CaptureResponse::failure(REJECTED_MESSAGE),
        }
    }

    /// 메시지를 비동기로 처리하고 `reply`로 응답
    ///
    /// 캡처 작업을 띄워 응답을 지연시킨 경우 `true`. 거부된 요청은
    /// 즉시 일반 실패로 응답하고 `false`를 반환한다.
    pub fn dispatch(
        self: &Arc<Self>,
        message: Value,
        sender: SenderInfo,
        reply: oneshot::Sender<CaptureResponse>,
    ) -> bool {
        match self.admit(&message, &sender) {
            Ok(request) => {
                let handler = Arc::clone(self);
                tokio::spawn(async move {
                    let response = handler.respond(request).await;
                    if reply.send(response).is_err() {
                        debug!("응답 채널이 닫혀 스크린샷 응답 폐기");
                    }
                });
                true
            }
            Err(_) => {
                let _ = reply.send(CaptureResponse::failure(REJECTED_MESSAGE));
                false
            }
        }
    }

    /// 처리 대상 확인 + 송신자 인가 + 요청 형식 검증
    fn admit(&self, message: &Value, sender: &SenderInfo) -> Result<ScreenshotRequest, CoreError> {
        let Some(parsed) = ScreenshotRequest::parse(message) else {
            debug!("처리 대상 아님");
            return Err(CoreError::Unauthorized("처리 대상 아님".to_string()));
        };

        if !self.authorizer.is_authorized(sender) {
            debug!(sender = ?sender.id, "권한 없음");
            return Err(CoreError::Unauthorized(format!("{:?}", sender.id)));
        }

        parsed.map_err(|e| {
            debug!(error = %e, "요청 형식 오류");
            CoreError::from(e)
        })
    }

    async fn respond(&self, request: ScreenshotRequest) -> CaptureResponse {
        let request_id = Uuid::new_v4();
        let span = info_span!("screenshot", %request_id);

        async move {
            match self.capture(&request).await {
                Ok(data_url) => {
                    info!("스크린샷 응답 ({} bytes)", data_url.len());
                    CaptureResponse::ok(data_url)
                }
                Err(CoreError::Transport(cause)) => {
                    error!("스크린샷 캡처 실패: {cause}");
                    CaptureResponse::failure(CAPTURE_FAILED_MESSAGE)
                }
                Err(e) => {
                    error!("스크린샷 처리 실패: {e}");
                    CaptureResponse::failure(e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn capture(&self, request: &ScreenshotRequest) -> Result<String, CoreError> {
        let captured = self.provider.capture_visible().await.map_err(|e| match e {
            CoreError::Transport(_) => e,
            other => CoreError::Transport(other.to_string()),
        })?;

        debug!("가시 영역 캡처: {}x{}", captured.width, captured.height);

        match request.pixel_rect() {
            Some(rect) => {
                let cropped = crop_from_encoded(captured.into(), rect, self.options).await?;
                Ok(cropped.to_data_url())
            }
            None => Ok(captured.to_data_url()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode_surface;
    use assert_matches::assert_matches;
    use crate::surface::Surface;
    use async_trait::async_trait;
    use image::{Rgba, RgbaImage};
    use serde_json::json;
    use snipdoc_core::models::image::EncodedImage;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct MockProvider {
        calls: AtomicU32,
        image: EncodedImage,
    }

    impl MockProvider {
        fn new(w: u32, h: u32) -> Self {
            let surface = Surface::from_rgba(RgbaImage::from_pixel(w, h, Rgba([9, 8, 7, 255])));
            Self {
                calls: AtomicU32::new(0),
                image: encode_surface(&surface, ImageOptions::default()).unwrap(),
            }
        }
    }

    #[async_trait]
    impl CaptureProvider for MockProvider {
        async fn capture_visible(&self) -> Result<EncodedImage, CoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.image.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl CaptureProvider for FailingProvider {
        async fn capture_visible(&self) -> Result<EncodedImage, CoreError> {
            Err(CoreError::Transport("탭 캡처 거부됨".to_string()))
        }
    }

    fn handler(provider: Arc<dyn CaptureProvider>) -> ScreenshotHandler {
        ScreenshotHandler::new(
            provider,
            Arc::new(AllowListAuthorizer::new(["trusted"])),
            ImageOptions::default(),
        )
    }

    #[tokio::test]
    async fn authorized_request_returns_data_url() {
        let provider = Arc::new(MockProvider::new(40, 30));
        let handler = handler(provider.clone());

        let response = handler
            .handle(&json!({"type": "browser-screenshot"}), &SenderInfo::with_id("trusted"))
            .await;

        assert!(response.success);
        assert_eq!(response.value, Some(provider.image.to_data_url()));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rect_crops_capture() {
        let handler = handler(Arc::new(MockProvider::new(40, 30)));

        let response = handler
            .handle(
                &json!({"type": "browser-screenshot", "rect": {"left": 5, "top": 5, "width": 10, "height": 4}}),
                &SenderInfo::with_id("trusted"),
            )
            .await;

        let url = response.value.unwrap();
        let decoded = crate::data_url::decode_data_url(&url).unwrap();
        assert_eq!((decoded.width, decoded.height), (10, 4));
    }

    #[tokio::test]
    async fn unauthorized_and_unhandled_look_identical() {
        let provider = Arc::new(MockProvider::new(4, 4));
        let handler = handler(provider.clone());

        let unauthorized = handler
            .handle(&json!({"type": "browser-screenshot"}), &SenderInfo::with_id("stranger"))
            .await;
        let unhandled = handler
            .handle(&json!({"type": "something-else"}), &SenderInfo::with_id("trusted"))
            .await;

        assert_eq!(unauthorized, unhandled);
        assert_eq!(unauthorized, CaptureResponse::failure(REJECTED_MESSAGE));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fractional_rect_rounds_before_crop() {
        let provider = Arc::new(MockProvider::new(40, 30));
        let handler = handler(provider.clone());

        let response = handler
            .handle(
                &json!({"type": "browser-screenshot", "rect": {"x": 5.5, "y": 5, "width": 10, "height": 4}}),
                &SenderInfo::with_id("trusted"),
            )
            .await;

        assert!(response.success);
        let decoded = crate::data_url::decode_data_url(&response.value.unwrap()).unwrap();
        assert_eq!((decoded.width, decoded.height), (10, 4));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_request_rejected_without_capture() {
        let provider = Arc::new(MockProvider::new(8, 8));
        let handler = handler(provider.clone());

        let response = handler
            .handle(
                &json!({"type": "browser-screenshot", "rect": {"left": "top-left"}}),
                &SenderInfo::with_id("trusted"),
            )
            .await;

        assert_eq!(response, CaptureResponse::failure(REJECTED_MESSAGE));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn malformed_request_surfaces_parse_error() {
        let handler = handler(Arc::new(MockProvider::new(8, 8)));

        let result = handler.admit(
            &json!({"type": "browser-screenshot", "rect": {"left": "top-left"}}),
            &SenderInfo::with_id("trusted"),
        );
        assert_matches!(result, Err(CoreError::Serialization(_)));

        let unhandled = handler.admit(&json!({"type": "ping"}), &SenderInfo::with_id("trusted"));
        assert_matches!(unhandled, Err(CoreError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn transport_failure_is_generic() {
        let handler = handler(Arc::new(FailingProvider));

        let response = handler
            .handle(&json!({"type": "browser-screenshot"}), &SenderInfo::with_id("trusted"))
            .await;

        assert_eq!(response, CaptureResponse::failure(CAPTURE_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn out_of_bounds_rect_reports_region_error() {
        let handler = handler(Arc::new(MockProvider::new(10, 10)));

        let response = handler
            .handle(
                &json!({"type": "browser-screenshot", "rect": {"left": 5, "top": 5, "width": 10, "height": 10}}),
                &SenderInfo::with_id("trusted"),
            )
            .await;

        assert!(!response.success);
        assert!(response.error.unwrap().contains("잘못된 영역"));
    }

    #[tokio::test]
    async fn dispatch_defers_response() {
        let handler = Arc::new(handler(Arc::new(MockProvider::new(8, 8))));
        let (tx, rx) = oneshot::channel();

        let deferred = handler.dispatch(
            json!({"type": "browser-screenshot"}),
            SenderInfo::with_id("trusted"),
            tx,
        );

        assert!(deferred);
        let response = rx.await.unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn dispatch_rejects_immediately() {
        let handler = Arc::new(handler(Arc::new(MockProvider::new(8, 8))));
        let (tx, rx) = oneshot::channel();

        let deferred = handler.dispatch(
            json!({"type": "browser-screenshot"}),
            SenderInfo {
                id: None,
                origin: Some("https://evil.example".to_string()),
            },
            tx,
        );

        assert!(!deferred);
        assert_eq!(rx.await.unwrap(), CaptureResponse::failure(REJECTED_MESSAGE));
    }
}
