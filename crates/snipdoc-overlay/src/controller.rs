//! 루트별 오버레이 상태 머신.
//!
//! 루트 하나당 컨트롤러 하나. 상태는 `Idle`(오버레이 없음)과
//! `Active`(오버레이 하나) 두 가지이며 동시에 살아있는 오버레이는 최대 하나다.
//!
//! - `Created` → 기존 오버레이 제거 후 새 오버레이 삽입 및 렌더링
//! - `Destroyed` → 오버레이 제거 (`Idle`이면 아무것도 안 함)
//! - 렌더러 완료 콜백 → `on_resolved` 1회 호출 후, 아직 현재 오버레이면 제거

use parking_lot::Mutex;
use snipdoc_core::config::{OverlayConfig, ViewerMode};
use snipdoc_core::error::CoreError;
use snipdoc_core::models::document::{ElementId, OverlayHandle, OverlayNode};
use snipdoc_core::models::geometry::Point;
use snipdoc_core::models::selection::{OverlayResolution, SelectionEvent, SelectionEventKind};
use snipdoc_core::ports::overlay_renderer::{OverlayCompletion, OverlayProps, OverlayRenderer};
use snipdoc_core::ports::render_tree::{OverlayHost, PageLocator};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

use crate::positioning::{overlay_position, page_origin, resolve_page};

/// 완료 통지 콜백
pub type ResolvedCallback = Arc<dyn Fn(OverlayResolution) + Send + Sync>;

/// 컨트롤러가 사용하는 렌더링 환경 포트 묶음
#[derive(Clone)]
pub struct OverlayPorts {
    pub host: Arc<dyn OverlayHost>,
    pub locator: Arc<dyn PageLocator>,
    pub renderer: Arc<dyn OverlayRenderer>,
}

/// 오버레이 배치 설정
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    pub mode: ViewerMode,
    pub marker_class: String,
    pub offset: Point,
    pub z_index: i32,
}

impl OverlaySettings {
    pub fn from_config(config: &OverlayConfig, mode: ViewerMode) -> Self {
        Self {
            mode,
            marker_class: config.marker_class.clone(),
            offset: Point::new(config.offset_x, config.offset_y),
            z_index: config.z_index,
        }
    }
}

/// 루트 하나의 오버레이 컨트롤러
pub struct OverlayController {
    root: ElementId,
    settings: OverlaySettings,
    ports: OverlayPorts,
    on_resolved: ResolvedCallback,
    current: Mutex<Option<OverlayHandle>>,
    weak_self: Weak<OverlayController>,
}

impl OverlayController {
    pub fn new(
        root: ElementId,
        settings: OverlaySettings,
        ports: OverlayPorts,
        on_resolved: ResolvedCallback,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            root,
            settings,
            ports,
            on_resolved,
            current: Mutex::new(None),
            weak_self: weak_self.clone(),
        })
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    /// 현재 오버레이 노드 (`Idle`이면 `None`)
    pub fn current_overlay(&self) -> Option<ElementId> {
        self.current.lock().as_ref().map(OverlayHandle::element)
    }

    pub fn is_active(&self) -> bool {
        self.current.lock().is_some()
    }

    /// 선택 이벤트 처리
    pub fn handle_event(&self, event: &SelectionEvent) {
        match &event.kind {
            SelectionEventKind::Created => {
                if let Err(e) = self.show(event) {
                    warn!("오버레이 표시 실패 ({}): {e}", self.root);
                }
            }
            SelectionEventKind::Destroyed => {
                if self.dismiss() {
                    debug!("선택 해제로 오버레이 제거 ({})", self.root);
                }
            }
            SelectionEventKind::Other(kind) => {
                debug!("무시하는 선택 이벤트: {kind}");
            }
        }
    }

    /// 살아있는 오버레이 제거. 여러 번 호출해도 안전
    pub fn teardown(&self) {
        if self.dismiss() {
            debug!("컨트롤러 정리 ({})", self.root);
        }
    }

    fn show(&self, event: &SelectionEvent) -> Result<(), CoreError> {
        let mode = self.settings.mode;
        let page = resolve_page(
            self.ports.locator.as_ref(),
            self.root,
            event.source_element,
            mode,
        )?;

        let origin = page_origin(self.ports.locator.as_ref(), page.page_element, mode);
        let position = overlay_position(origin, &event.bounding_box, self.settings.offset);

        // 기존 오버레이는 새 노드 삽입 전에 제거
        self.dismiss();

        let node = OverlayNode::new(
            self.settings.marker_class.as_str(),
            position,
            self.settings.z_index,
        );
        let handle = self.ports.host.insert_overlay(page.page_element, node)?;
        let element = handle.element();
        *self.current.lock() = Some(handle);

        info!(
            "오버레이 표시: {} 페이지 {} ({}, {})",
            element, page.page_number, position.x, position.y
        );

        let props = OverlayProps {
            selection_event: event.clone(),
            page_number: page.page_number,
        };
        self.ports
            .renderer
            .render(element, props, self.completion_for(element));
        Ok(())
    }

    fn completion_for(&self, element: ElementId) -> OverlayCompletion {
        let controller = self.weak_self.clone();
        let on_resolved = Arc::clone(&self.on_resolved);
        OverlayCompletion::new(move |payload| {
            on_resolved(payload);
            if let Some(controller) = controller.upgrade() {
                controller.dismiss_if_current(element);
            }
        })
    }

    /// 현재 오버레이가 `element`일 때만 제거
    fn dismiss_if_current(&self, element: ElementId) {
        let handle = {
            let mut current = self.current.lock();
            if current.as_ref().map(OverlayHandle::element) != Some(element) {
                debug!("이미 교체된 오버레이 완료: {element}");
                return;
            }
            current.take()
        };
        if let Some(handle) = handle {
            self.detach(handle);
        }
    }

    /// 현재 오버레이 제거. 제거했으면 `true`
    fn dismiss(&self) -> bool {
        let handle = self.current.lock().take();
        match handle {
            Some(handle) => {
                self.detach(handle);
                true
            }
            None => false,
        }
    }

    fn detach(&self, handle: OverlayHandle) {
        let element = handle.element();
        self.ports.renderer.unmount(element);
        if !self.ports.host.remove_overlay(handle) {
            debug!("이미 분리된 오버레이: {element}");
        }
    }
}

impl std::fmt::Debug for OverlayController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayController")
            .field("root", &self.root)
            .field("settings", &self.settings)
            .field("current", &self.current_overlay())
            .finish()
    }
}
