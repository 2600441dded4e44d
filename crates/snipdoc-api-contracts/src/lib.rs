//! snipdoc 전송 계약.
//!
//! 확장 메시징 브리지와 주고받는 요청/응답의 JSON 형태를 정의한다.

pub mod capture;
