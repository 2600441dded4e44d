//! 렌더링 트리 참조 모델.
//!
//! 문서 트리는 외부(렌더링 환경)가 소유한다. 여기 정의된 타입은
//! 모두 비소유 식별자이며 트리 상태를 직접 들고 있지 않다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::geometry::Point;

/// 렌더링 트리 요소 식별자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// 문서(메인 문서 또는 임베디드 하위 문서) 식별자
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// 임베디드 프레임 요소 참조 (iframe 등)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRef {
    /// 프레임 요소
    pub element: ElementId,
}

/// 선택 영역을 감싸는 페이지 정보
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageContext {
    /// 페이지 번호 (1부터)
    pub page_number: u32,
    /// 페이지 요소 (비소유 참조)
    pub page_element: ElementId,
}

/// 포인터 이벤트 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PointerEventKind {
    /// 누름 (mousedown)
    Press,
    /// 뗌 (mouseup)
    Release,
    /// 이동
    Move,
}

/// 트리에 삽입할 오버레이 노드 명세
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayNode {
    /// 나중에 찾기 위한 고정 마커 클래스
    pub marker_class: String,
    /// 페이지 기준 절대 위치
    pub position: Point,
    /// 쌓임 순서
    pub z_index: i32,
    /// 조상으로의 전파를 막을 포인터 이벤트
    pub stop_propagation: BTreeSet<PointerEventKind>,
}

impl OverlayNode {
    /// 누름/뗌 전파를 막는 오버레이 노드
    pub fn new(marker_class: impl Into<String>, position: Point, z_index: i32) -> Self {
        Self {
            marker_class: marker_class.into(),
            position,
            z_index,
            stop_propagation: [PointerEventKind::Press, PointerEventKind::Release]
                .into_iter()
                .collect(),
        }
    }

    /// 인라인 스타일 문자열
    pub fn style(&self) -> String {
        format!(
            "position: absolute; top: {}px; left: {}px; z-index: {};",
            self.position.y, self.position.x, self.z_index
        )
    }
}

/// 삽입된 오버레이 노드 핸들
///
/// 복제할 수 없으며 제거 시 소비된다.
#[derive(Debug, PartialEq, Eq)]
pub struct OverlayHandle {
    element: ElementId,
}

impl OverlayHandle {
    pub fn new(element: ElementId) -> Self {
        Self { element }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_node_blocks_press_and_release() {
        let node = OverlayNode::new("annotation-bar", Point::new(1.0, 2.0), 10000);
        assert!(node.stop_propagation.contains(&PointerEventKind::Press));
        assert!(node.stop_propagation.contains(&PointerEventKind::Release));
        assert!(!node.stop_propagation.contains(&PointerEventKind::Move));
    }

    #[test]
    fn overlay_node_style() {
        let node = OverlayNode::new("annotation-bar", Point::new(25.0, -40.5), 10000);
        assert_eq!(
            node.style(),
            "position: absolute; top: -40.5px; left: 25px; z-index: 10000;"
        );
    }
}
