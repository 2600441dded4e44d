//! # snipdoc-vision
//!
//! 이미지 코덱 크레이트.
//! 렌더링 서피스를 전송 가능한 인코딩 바이트/data URL로 변환하고,
//! 픽셀 정확도로 사각 영역을 잘라낸다. 확장 브리지의 스크린샷 요청 처리도 담당한다.

pub mod capture_handler;
pub mod crop;
pub mod data_url;
pub mod encoder;
pub mod surface;
