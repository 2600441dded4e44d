//! 선택 리스너를 붙일 루트 탐색.
//!
//! 페이지 뷰어는 컨테이너 요소 하나, 연속 흐름 뷰어는 메인 문서와
//! 해석 가능한 모든 임베디드 하위 문서(깊이 무관)의 루트 요소를 반환한다.

use snipdoc_core::config::ViewerMode;
use snipdoc_core::error::CoreError;
use snipdoc_core::models::document::{DocumentId, ElementId};
use snipdoc_core::ports::render_tree::DocumentTree;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// 모드별 루트 요소 목록
pub fn enumerate_roots(
    tree: &dyn DocumentTree,
    mode: ViewerMode,
    viewer_container_id: &str,
) -> Result<Vec<ElementId>, CoreError> {
    match mode {
        ViewerMode::LegacyPaged => tree
            .element_by_id(viewer_container_id)
            .map(|container| vec![container])
            .ok_or_else(|| CoreError::ElementNotFound(viewer_container_id.to_string())),
        ViewerMode::ContinuousFlow => Ok(document_roots(tree)),
    }
}

/// 메인 문서부터 프레임을 따라 도달 가능한 문서 루트 전부
///
/// 같은 문서는 한 번만 방문한다 (자기 자신을 임베드해도 종료).
fn document_roots(tree: &dyn DocumentTree) -> Vec<ElementId> {
    let main = tree.main_document();
    let mut visited: HashSet<DocumentId> = HashSet::from([main]);
    let mut worklist = VecDeque::from([main]);
    let mut roots = Vec::new();

    while let Some(document) = worklist.pop_front() {
        let Some(root) = tree.document_element(document) else {
            debug!("루트 요소 없는 문서 건너뜀: {document}");
            continue;
        };
        roots.push(root);

        for frame in tree.embedded_frames(root) {
            match tree.content_document(frame) {
                Some(sub) if visited.insert(sub) => worklist.push_back(sub),
                Some(sub) => debug!("이미 방문한 문서: {sub}"),
                None => debug!("해석 불가 프레임 건너뜀: {}", frame.element),
            }
        }
    }

    debug!("선택 루트 {}개 탐색", roots.len());
    roots
}
