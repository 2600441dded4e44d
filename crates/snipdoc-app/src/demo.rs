//! 인메모리 오버레이 데모.
//!
//! 두 페이지짜리 가짜 문서에 오버레이 엔진을 등록하고 선택 생성/해제를
//! 흘려보낸다. 오버레이가 캡처 동작으로 완료되면 선택 영역을 잘라낸
//! 스크린샷 요청을 처리기로 보낸다.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use snipdoc_api_contracts::capture::ScreenshotRequest;
use snipdoc_core::config::AppConfig;
use snipdoc_core::error::CoreError;
use snipdoc_core::models::document::ElementId;
use snipdoc_core::models::geometry::Rect;
use snipdoc_core::models::image::{EncodedImage, ImageOptions};
use snipdoc_core::models::selection::{OverlayAction, OverlayResolution, SelectionEvent};
use snipdoc_core::ports::capture::{CaptureProvider, SenderInfo};
use snipdoc_core::ports::overlay_renderer::{OverlayCompletion, OverlayProps, OverlayRenderer};
use snipdoc_overlay::controller::OverlayPorts;
use snipdoc_overlay::memory_tree::MemoryDocument;
use snipdoc_overlay::registry::AnnotationBars;
use snipdoc_overlay::selection_bus::SelectionBus;
use snipdoc_vision::capture_handler::{AllowListAuthorizer, ScreenshotHandler};
use snipdoc_vision::encoder::encode_surface;
use snipdoc_vision::surface::Surface;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::info;

const DEMO_SENDER: &str = "snipdoc-demo";
const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;

/// 렌더 호출을 로그로 남기고 완료 콜백을 보관하는 렌더러
#[derive(Default)]
struct LoggingRenderer {
    pending: Mutex<Vec<(ElementId, OverlayCompletion)>>,
}

impl LoggingRenderer {
    fn take_latest(&self) -> Option<(ElementId, OverlayCompletion)> {
        self.pending.lock().pop()
    }
}

impl OverlayRenderer for LoggingRenderer {
    fn render(&self, target: ElementId, props: OverlayProps, completion: OverlayCompletion) {
        info!(
            "오버레이 렌더: {target} (페이지 {}, 선택 {:?})",
            props.page_number, props.selection_event.bounding_box
        );
        self.pending.lock().push((target, completion));
    }

    fn unmount(&self, target: ElementId) {
        info!("오버레이 언마운트: {target}");
        self.pending.lock().retain(|(element, _)| *element != target);
    }
}

/// 페이지 두 장 크기의 합성 화면을 돌려주는 캡처 제공자
struct SyntheticCapture {
    width: u32,
    height: u32,
}

#[async_trait]
impl CaptureProvider for SyntheticCapture {
    async fn capture_visible(&self) -> Result<EncodedImage, CoreError> {
        let mut pixels = RgbaImage::new(self.width, self.height);
        for (x, y, pixel) in pixels.enumerate_pixels_mut() {
            *pixel = Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]);
        }
        encode_surface(&Surface::from_rgba(pixels), ImageOptions::default())
    }
}

struct DemoDocument {
    doc: Arc<MemoryDocument>,
    text: ElementId,
}

fn build_document(config: &AppConfig) -> Result<DemoDocument> {
    let doc = Arc::new(MemoryDocument::new());
    let container = doc.append_element(doc.root_element())?;
    doc.set_dom_id(container, config.viewer.viewer_container_id.clone())?;

    let mut first_text = None;
    for page_number in 1..=2u32 {
        let top = f64::from(page_number - 1) * PAGE_HEIGHT;
        let page = doc.add_page(
            container,
            page_number,
            Rect::new(0.0, top, PAGE_WIDTH, PAGE_HEIGHT),
        )?;
        let text = doc.append_element(page)?;
        first_text.get_or_insert(text);
    }

    let text = first_text.ok_or_else(|| anyhow!("데모 페이지 생성 실패"))?;
    Ok(DemoDocument { doc, text })
}

/// 데모 실행
pub async fn run(config: &AppConfig) -> Result<()> {
    let DemoDocument { doc, text } = build_document(config)?;
    let bus = SelectionBus::new();
    let renderer = Arc::new(LoggingRenderer::default());
    let (resolved_tx, mut resolved_rx) = mpsc::unbounded_channel::<OverlayResolution>();

    let bars = AnnotationBars::register(
        doc.as_ref(),
        &bus,
        OverlayPorts {
            host: doc.clone(),
            locator: doc.clone(),
            renderer: renderer.clone(),
        },
        config,
        Arc::new(move |resolution: OverlayResolution| {
            let _ = resolved_tx.send(resolution);
        }),
    )?;

    let root = bars
        .roots()
        .first()
        .copied()
        .ok_or_else(|| anyhow!("등록된 루트 없음"))?;

    // 1) 선택 생성 → 오버레이 표시
    let selection = Rect::new(72.0, 144.0, 240.0, 48.0);
    bus.emit(root, &SelectionEvent::created(selection, text));
    info!("활성 오버레이: {}", bars.active_count());

    // 2) 같은 루트에 다시 생성 → 기존 오버레이 교체
    bus.emit(root, &SelectionEvent::created(selection, text));
    info!(
        "교체 후 마커 노드 수: {}",
        doc.find_by_class(&config.overlay.marker_class).len()
    );

    // 3) 사용자가 캡처 동작 선택 → 완료 콜백
    let (overlay, completion) = renderer
        .take_latest()
        .ok_or_else(|| anyhow!("렌더된 오버레이 없음"))?;
    completion.resolve(OverlayResolution {
        page_number: 1,
        selection,
        action: OverlayAction::Capture,
    });
    info!("완료 후 {overlay} 연결 상태: {}", doc.is_attached(overlay));

    if let Some(resolution) = resolved_rx.recv().await {
        capture_selection(config, &resolution).await?;
    }

    // 4) 선택 생성 후 해제
    bus.emit(root, &SelectionEvent::created(selection, text));
    bus.emit(root, &SelectionEvent::destroyed(selection, text));
    info!("해제 후 활성 오버레이: {}", bars.active_count());

    bars.unregister();
    info!("데모 종료, 리스너 {}개 남음", bus.listener_count(root));
    Ok(())
}

async fn capture_selection(config: &AppConfig, resolution: &OverlayResolution) -> Result<()> {
    let allowed = config
        .capture
        .allowed_senders
        .iter()
        .cloned()
        .chain(std::iter::once(DEMO_SENDER.to_string()));
    let handler = Arc::new(ScreenshotHandler::new(
        Arc::new(SyntheticCapture {
            width: PAGE_WIDTH as u32,
            height: (PAGE_HEIGHT * 2.0) as u32,
        }),
        Arc::new(AllowListAuthorizer::new(allowed)),
        config.capture.image_options(),
    ));

    let request = ScreenshotRequest::new(Some(resolution.selection));
    let message = serde_json::to_value(&request)?;

    let (tx, rx) = oneshot::channel();
    let deferred = handler.dispatch(message, SenderInfo::with_id(DEMO_SENDER), tx);
    let response = rx.await?;

    match (response.success, response.value, response.error) {
        (true, Some(url), _) => info!(
            "페이지 {} 선택 캡처 완료 (지연 응답: {deferred}, data URL {} bytes)",
            resolution.page_number,
            url.len()
        ),
        (_, _, error) => info!("캡처 실패: {}", error.unwrap_or_default()),
    }
    Ok(())
}
