//! 선택 이벤트 모델.

use serde::{Deserialize, Serialize};

use super::document::ElementId;
use super::geometry::Rect;

/// 선택 이벤트 종류
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionEventKind {
    /// 선택 영역 생성
    Created,
    /// 선택 영역 해제
    Destroyed,
    /// 그 외 (무시 대상)
    Other(String),
}

/// 선택 이벤트
///
/// 리스너 콜백 동안에만 유효하며 트리 상태를 소유하지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEvent {
    /// 이벤트 종류
    pub kind: SelectionEventKind,
    /// 선택 영역 바운딩 박스 (뷰포트 기준)
    pub bounding_box: Rect,
    /// 선택이 시작된 요소
    pub source_element: ElementId,
}

impl SelectionEvent {
    pub fn created(bounding_box: Rect, source_element: ElementId) -> Self {
        Self {
            kind: SelectionEventKind::Created,
            bounding_box,
            source_element,
        }
    }

    pub fn destroyed(bounding_box: Rect, source_element: ElementId) -> Self {
        Self {
            kind: SelectionEventKind::Destroyed,
            bounding_box,
            source_element,
        }
    }
}

/// 오버레이 사용자 동작
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverlayAction {
    /// 하이라이트 생성
    Highlight {
        /// 하이라이트 색상
        color: String,
    },
    /// 코멘트 작성
    Comment {
        /// 코멘트 본문
        body: String,
    },
    /// 선택 영역 캡처
    Capture,
}

/// 오버레이 완료 페이로드 (`on_resolved`로 전달)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayResolution {
    /// 선택이 속한 페이지 번호
    pub page_number: u32,
    /// 선택 영역 (뷰포트 기준)
    pub selection: Rect,
    /// 사용자 동작
    pub action: OverlayAction,
}
