//! 오버레이 렌더링 포트.
//!
//! UI 바인딩 협력자가 삽입된 오버레이 노드 안에 인터랙티브 컨트롤을 그린다.
//! 사용자가 동작을 마치면 [`OverlayCompletion::resolve`]를 정확히 한 번 호출한다.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::models::document::ElementId;
use crate::models::selection::{OverlayResolution, SelectionEvent};

/// 오버레이 렌더링 입력
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayProps {
    /// 오버레이를 만든 선택 이벤트
    pub selection_event: SelectionEvent,
    /// 선택이 속한 페이지 번호
    pub page_number: u32,
}

type CompletionFn = Box<dyn FnOnce(OverlayResolution) + Send>;

/// 오버레이 완료 콜백 (1회용)
///
/// 복제해서 여러 곳에 넘겨도 실제 콜백은 최초 한 번만 실행된다.
#[derive(Clone)]
pub struct OverlayCompletion {
    inner: Arc<Mutex<Option<CompletionFn>>>,
}

impl OverlayCompletion {
    pub fn new(callback: impl FnOnce(OverlayResolution) + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(Box::new(callback)))),
        }
    }

    /// 완료 처리. 이미 완료됐으면 `false`.
    pub fn resolve(&self, payload: OverlayResolution) -> bool {
        // 콜백 실행 중 재진입을 허용하기 위해 락을 먼저 푼다
        let callback = self.inner.lock().take();
        match callback {
            Some(callback) => {
                callback(payload);
                true
            }
            None => false,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.lock().is_none()
    }
}

impl std::fmt::Debug for OverlayCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayCompletion")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// 오버레이 UI 렌더러
pub trait OverlayRenderer: Send + Sync {
    /// `target` 노드 안에 컨트롤 렌더링
    fn render(&self, target: ElementId, props: OverlayProps, completion: OverlayCompletion);

    /// `target` 노드가 트리에서 제거되기 직전 호출
    fn unmount(&self, _target: ElementId) {}
}
