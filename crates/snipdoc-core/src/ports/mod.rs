//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 렌더링 환경(문서 트리, 선택 이벤트, UI 바인딩)과 캡처 브리지는
//! 모두 외부 협력자이며, 각 어댑터가 이 trait들을 구현한다.
//! 테스트에서는 인메모리 구현(`snipdoc-overlay::memory_tree`)으로 대체한다.

pub mod capture;
pub mod overlay_renderer;
pub mod render_tree;
pub mod selection_source;
