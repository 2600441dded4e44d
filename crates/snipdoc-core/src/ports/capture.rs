//! 캡처 브리지 포트.
//!
//! 전체 뷰포트 캡처는 외부 협력자(브라우저 확장 등)가 수행한다.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::image::EncodedImage;

/// 메시지 송신자 정보
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderInfo {
    /// 송신자 식별자 (확장 ID 등)
    pub id: Option<String>,
    /// 송신 출처 URL
    pub origin: Option<String>,
}

impl SenderInfo {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            origin: None,
        }
    }
}

/// 가시 영역 캡처 제공자
#[async_trait]
pub trait CaptureProvider: Send + Sync {
    /// 현재 보이는 뷰포트 전체 캡처
    ///
    /// 실패 시 `CoreError::Transport`. 재시도는 호출자 몫이다.
    async fn capture_visible(&self) -> Result<EncodedImage, CoreError>;
}

/// 캡처 요청 송신자 인가
pub trait SenderAuthorizer: Send + Sync {
    fn is_authorized(&self, sender: &SenderInfo) -> bool;
}
