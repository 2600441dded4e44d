//! 페이지 해석 및 좌표 변환.
//!
//! 선택 이벤트의 바운딩 박스는 뷰포트 기준이고 오버레이는 페이지 요소 안에
//! 절대 위치로 삽입되므로, 페이지 원점을 빼서 페이지 기준 좌표로 바꾼다.

use snipdoc_core::config::ViewerMode;
use snipdoc_core::error::CoreError;
use snipdoc_core::models::document::{ElementId, PageContext};
use snipdoc_core::models::geometry::{relative_to, Point, Rect};
use snipdoc_core::ports::render_tree::PageLocator;
use tracing::warn;

/// 페이지 요소의 원점 (뷰포트 기준 좌상단)
///
/// 연속 흐름 모드에서는 항상 `(0, 0)`.
pub fn page_origin(locator: &dyn PageLocator, page_element: ElementId, mode: ViewerMode) -> Point {
    if mode == ViewerMode::ContinuousFlow {
        return Point::ORIGIN;
    }

    match locator.bounding_rect(page_element) {
        Some(rect) => rect.origin(),
        None => {
            warn!("레이아웃 없는 페이지 요소: {page_element}");
            Point::ORIGIN
        }
    }
}

/// 선택을 감싸는 페이지 해석
///
/// 페이지 모드는 선택 시작 요소의 가장 가까운 페이지, 연속 흐름 모드는
/// 루트 자체를 1페이지로 본다.
pub fn resolve_page(
    locator: &dyn PageLocator,
    root: ElementId,
    source_element: ElementId,
    mode: ViewerMode,
) -> Result<PageContext, CoreError> {
    match mode {
        ViewerMode::LegacyPaged => locator.closest_page(source_element).ok_or_else(|| {
            CoreError::PageResolution(format!("{source_element}을 감싸는 페이지 없음"))
        }),
        ViewerMode::ContinuousFlow => Ok(PageContext {
            page_number: 1,
            page_element: root,
        }),
    }
}

/// 오버레이 위치 (페이지 기준)
///
/// 앵커는 선택 영역 윗변 중앙.
pub fn overlay_position(page_origin: Point, selection: &Rect, offset: Point) -> Point {
    relative_to(page_origin, selection.top_center()) + offset
}
