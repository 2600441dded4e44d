//! snipdoc 도메인 모델.
//!
//! 좌표계, 이미지 페이로드, 선택 이벤트, 문서 트리 참조 등
//! 크레이트 간에 공유하는 값 타입을 정의한다.

pub mod document;
pub mod geometry;
pub mod image;
pub mod selection;
