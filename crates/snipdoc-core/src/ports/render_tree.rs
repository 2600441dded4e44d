//! 렌더링 트리 포트.
//!
//! 살아있는 렌더링 트리에 대한 최소 기능 인터페이스.
//! 위치 계산 상태 머신은 이 trait들만 사용하므로
//! 실제 렌더링 환경 없이 가짜 트리로 테스트할 수 있다.

use crate::error::CoreError;
use crate::models::document::{
    DocumentId, ElementId, FrameRef, OverlayHandle, OverlayNode, PageContext,
};
use crate::models::geometry::Rect;

/// 오버레이 노드 삽입/제거
pub trait OverlayHost: Send + Sync {
    /// `parent`의 첫 번째 자식으로 오버레이 노드 삽입
    fn insert_overlay(
        &self,
        parent: ElementId,
        node: OverlayNode,
    ) -> Result<OverlayHandle, CoreError>;

    /// 오버레이 노드를 부모에서 제거
    ///
    /// 이미 분리된 노드면 `false` (에러 아님).
    fn remove_overlay(&self, handle: OverlayHandle) -> bool;
}

/// 페이지 요소 탐색 및 레이아웃 조회
pub trait PageLocator: Send + Sync {
    /// `element`에서 루트 방향으로 가장 가까운 페이지 요소
    fn closest_page(&self, element: ElementId) -> Option<PageContext>;

    /// 요소의 바운딩 박스 (선택 이벤트와 같은 뷰포트 좌표계)
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;
}

/// 중첩 문서 구조 조회
pub trait DocumentTree: Send + Sync {
    /// 최상위 문서
    fn main_document(&self) -> DocumentId;

    /// 문서의 루트 요소
    fn document_element(&self, document: DocumentId) -> Option<ElementId>;

    /// `element` 하위의 임베디드 프레임 목록
    fn embedded_frames(&self, element: ElementId) -> Vec<FrameRef>;

    /// 프레임의 콘텐츠 문서
    ///
    /// 아직 로드되지 않았거나 교차 출처로 막힌 경우 `None`.
    fn content_document(&self, frame: FrameRef) -> Option<DocumentId>;

    /// id 속성으로 요소 조회
    fn element_by_id(&self, id: &str) -> Option<ElementId>;
}
