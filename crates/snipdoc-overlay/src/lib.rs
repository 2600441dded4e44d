//! # snipdoc-overlay
//!
//! 선택 영역 → 오버레이 위치 계산 엔진.
//!
//! ## 구조
//!
//! - [`frame_tree`]: 중첩 문서에서 선택 리스너를 붙일 루트 탐색
//! - [`positioning`]: 페이지 해석 및 페이지 기준 좌표 변환
//! - [`controller`]: 루트별 오버레이 상태 머신 (Idle ↔ Active)
//! - [`selection_bus`]: 인메모리 선택 이벤트 소스
//! - [`registry`]: 루트 탐색 + 컨트롤러/구독 일괄 등록
//! - [`memory_tree`]: 인메모리 렌더링 트리 (테스트/데모용)

pub mod controller;
pub mod frame_tree;
pub mod memory_tree;
pub mod positioning;
pub mod registry;
pub mod selection_bus;
