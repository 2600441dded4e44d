//! 인메모리 렌더링 트리.
//!
//! 실제 렌더링 환경 없이 오버레이 엔진을 돌리기 위한 가짜 문서 트리.
//! 페이지 요소, 임베디드 프레임, 오버레이 노드 삽입/제거,
//! 포인터 이벤트 버블링을 지원한다.

use parking_lot::RwLock;
use snipdoc_core::error::CoreError;
use snipdoc_core::models::document::{
    DocumentId, ElementId, FrameRef, OverlayHandle, OverlayNode, PageContext, PointerEventKind,
};
use snipdoc_core::models::geometry::Rect;
use snipdoc_core::ports::render_tree::{DocumentTree, OverlayHost, PageLocator};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
struct Node {
    document: DocumentId,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    dom_id: Option<String>,
    classes: Vec<String>,
    page_number: Option<u32>,
    rect: Option<Rect>,
    /// 프레임 요소일 때 `Some`. 내부 값이 `None`이면 미로드/교차 출처
    frame_content: Option<Option<DocumentId>>,
    overlay: Option<OverlayNode>,
}

#[derive(Debug)]
struct TreeState {
    next_element: u64,
    next_document: u64,
    main: DocumentId,
    main_root: ElementId,
    documents: HashMap<DocumentId, ElementId>,
    nodes: HashMap<ElementId, Node>,
}

impl TreeState {
    fn alloc_element(&mut self, node: Node) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element += 1;
        self.nodes.insert(id, node);
        id
    }

    fn alloc_document(&mut self) -> (DocumentId, ElementId) {
        let document = DocumentId(self.next_document);
        self.next_document += 1;
        let root = self.alloc_element(Node {
            document,
            ..Node::default()
        });
        self.documents.insert(document, root);
        (document, root)
    }

    fn node(&self, element: ElementId) -> Result<&Node, CoreError> {
        self.nodes
            .get(&element)
            .ok_or_else(|| CoreError::ElementNotFound(element.to_string()))
    }

    fn append(&mut self, parent: ElementId, mut node: Node) -> Result<ElementId, CoreError> {
        node.document = self.node(parent)?.document;
        node.parent = Some(parent);
        let id = self.alloc_element(node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    fn remove_subtree(&mut self, element: ElementId) -> Option<Node> {
        let node = self.nodes.remove(&element)?;
        for child in &node.children {
            self.remove_subtree(*child);
        }
        Some(node)
    }

    fn ancestors(&self, element: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut cursor = Some(element);
        while let Some(id) = cursor {
            let Some(node) = self.nodes.get(&id) else {
                break;
            };
            path.push(id);
            cursor = node.parent;
        }
        path
    }
}

/// 인메모리 문서 트리
#[derive(Debug)]
pub struct MemoryDocument {
    state: RwLock<TreeState>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// 루트 요소 하나를 가진 메인 문서 생성
    pub fn new() -> Self {
        let mut state = TreeState {
            next_element: 1,
            next_document: 1,
            main: DocumentId(0),
            main_root: ElementId(0),
            documents: HashMap::new(),
            nodes: HashMap::new(),
        };
        let (main, main_root) = state.alloc_document();
        state.main = main;
        state.main_root = main_root;
        Self {
            state: RwLock::new(state),
        }
    }

    /// 메인 문서의 루트 요소
    pub fn root_element(&self) -> ElementId {
        self.state.read().main_root
    }

    /// 빈 하위 문서 생성 (프레임 콘텐츠용)
    pub fn add_document(&self) -> (DocumentId, ElementId) {
        self.state.write().alloc_document()
    }

    /// 일반 요소 추가
    pub fn append_element(&self, parent: ElementId) -> Result<ElementId, CoreError> {
        self.state.write().append(parent, Node::default())
    }

    /// 페이지 요소 추가. 페이지 번호는 1부터
    pub fn add_page(
        &self,
        parent: ElementId,
        page_number: u32,
        rect: Rect,
    ) -> Result<ElementId, CoreError> {
        if page_number == 0 {
            return Err(CoreError::Internal("페이지 번호는 1 이상이어야 함".to_string()));
        }
        self.state.write().append(
            parent,
            Node {
                page_number: Some(page_number),
                rect: Some(rect),
                classes: vec!["page".to_string()],
                ..Node::default()
            },
        )
    }

    /// 프레임 요소 추가. `content`가 `None`이면 해석 불가 프레임
    pub fn add_frame(
        &self,
        parent: ElementId,
        content: Option<DocumentId>,
    ) -> Result<ElementId, CoreError> {
        self.state.write().append(
            parent,
            Node {
                frame_content: Some(content),
                ..Node::default()
            },
        )
    }

    /// 요소 id 속성 지정
    pub fn set_dom_id(&self, element: ElementId, id: impl Into<String>) -> Result<(), CoreError> {
        let mut state = self.state.write();
        let node = state
            .nodes
            .get_mut(&element)
            .ok_or_else(|| CoreError::ElementNotFound(element.to_string()))?;
        node.dom_id = Some(id.into());
        Ok(())
    }

    /// 자식 목록 (문서 순서)
    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.state
            .read()
            .nodes
            .get(&element)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// 요소가 트리에 남아있는지
    pub fn is_attached(&self, element: ElementId) -> bool {
        self.state.read().nodes.contains_key(&element)
    }

    /// 삽입된 오버레이 노드 명세
    pub fn overlay(&self, element: ElementId) -> Option<OverlayNode> {
        self.state
            .read()
            .nodes
            .get(&element)
            .and_then(|n| n.overlay.clone())
    }

    /// 클래스가 붙은 요소 전체 (id 순)
    pub fn find_by_class(&self, class: &str) -> Vec<ElementId> {
        let state = self.state.read();
        let mut found: Vec<ElementId> = state
            .nodes
            .iter()
            .filter(|(_, n)| n.classes.iter().any(|c| c == class))
            .map(|(id, _)| *id)
            .collect();
        found.sort();
        found
    }

    /// 포인터 이벤트 디스패치
    ///
    /// `target`에서 루트 방향으로 버블링하며 이벤트를 받은 요소를 순서대로 반환한다.
    /// 해당 종류의 전파를 막는 오버레이 노드에서 멈춘다.
    pub fn dispatch_pointer(&self, target: ElementId, kind: PointerEventKind) -> Vec<ElementId> {
        let state = self.state.read();
        let mut delivered = Vec::new();
        for id in state.ancestors(target) {
            delivered.push(id);
            let stops = state
                .nodes
                .get(&id)
                .and_then(|n| n.overlay.as_ref())
                .is_some_and(|o| o.stop_propagation.contains(&kind));
            if stops {
                debug!("{kind:?} 전파 차단: {id}");
                break;
            }
        }
        delivered
    }

    fn collect_frames(state: &TreeState, element: ElementId, out: &mut Vec<FrameRef>) {
        let Some(node) = state.nodes.get(&element) else {
            return;
        };
        for child in &node.children {
            if state
                .nodes
                .get(child)
                .is_some_and(|c| c.frame_content.is_some())
            {
                out.push(FrameRef { element: *child });
            }
            Self::collect_frames(state, *child, out);
        }
    }
}

impl OverlayHost for MemoryDocument {
    fn insert_overlay(
        &self,
        parent: ElementId,
        node: OverlayNode,
    ) -> Result<OverlayHandle, CoreError> {
        let mut state = self.state.write();
        let document = state.node(parent)?.document;
        let id = state.alloc_element(Node {
            document,
            parent: Some(parent),
            classes: vec![node.marker_class.clone()],
            overlay: Some(node),
            ..Node::default()
        });
        if let Some(p) = state.nodes.get_mut(&parent) {
            p.children.insert(0, id);
        }
        Ok(OverlayHandle::new(id))
    }

    fn remove_overlay(&self, handle: OverlayHandle) -> bool {
        let element = handle.element();
        let mut state = self.state.write();
        let Some(node) = state.remove_subtree(element) else {
            return false;
        };
        if let Some(parent) = node.parent.and_then(|p| state.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != element);
        }
        true
    }
}

impl PageLocator for MemoryDocument {
    fn closest_page(&self, element: ElementId) -> Option<PageContext> {
        let state = self.state.read();
        state.ancestors(element).into_iter().find_map(|id| {
            state.nodes.get(&id)?.page_number.map(|page_number| PageContext {
                page_number,
                page_element: id,
            })
        })
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self.state.read().nodes.get(&element)?.rect
    }
}

impl DocumentTree for MemoryDocument {
    fn main_document(&self) -> DocumentId {
        self.state.read().main
    }

    fn document_element(&self, document: DocumentId) -> Option<ElementId> {
        self.state.read().documents.get(&document).copied()
    }

    fn embedded_frames(&self, element: ElementId) -> Vec<FrameRef> {
        let state = self.state.read();
        let mut frames = Vec::new();
        Self::collect_frames(&state, element, &mut frames);
        frames
    }

    fn content_document(&self, frame: FrameRef) -> Option<DocumentId> {
        self.state
            .read()
            .nodes
            .get(&frame.element)?
            .frame_content
            .flatten()
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        let state = self.state.read();
        let mut matches: Vec<ElementId> = state
            .nodes
            .iter()
            .filter(|(_, n)| n.dom_id.as_deref() == Some(id))
            .map(|(eid, _)| *eid)
            .collect();
        matches.sort();
        matches.first().copied()
    }
}
