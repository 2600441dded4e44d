//! 선택 이벤트 소스 포트.
//!
//! 리스너는 스코프 루트마다 독립적으로 등록되며, 등록 결과로
//! 해제자([`Subscription`])를 돌려받는다. 전역 싱글턴 버스는 가정하지 않는다.

use std::sync::Arc;

use crate::models::document::ElementId;
use crate::models::selection::SelectionEvent;

/// 선택 이벤트 리스너
pub type SelectionListener = Arc<dyn Fn(&SelectionEvent) + Send + Sync>;

/// 선택 이벤트 소스
///
/// 구현체: `snipdoc-overlay::selection_bus::SelectionBus`
pub trait SelectionSource: Send + Sync {
    /// `scope_root` 범위의 선택 이벤트 리스너 등록
    ///
    /// 발생한 이벤트마다 콜백이 한 번씩 호출된다 (중복 제거 없음).
    fn add_listener(&self, listener: SelectionListener, scope_root: ElementId) -> Subscription;
}

/// 리스너 등록 해제자
///
/// `dispose()` 호출 또는 drop 시 정확히 한 번 해제된다.
pub struct Subscription {
    disposer: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(disposer: impl FnOnce() + Send + 'static) -> Self {
        Self {
            disposer: Some(Box::new(disposer)),
        }
    }

    /// 명시적 해제
    pub fn dispose(mut self) {
        self.run_disposer();
    }

    fn run_disposer(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_disposer();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.disposer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn dispose_runs_once() {
        let count = Arc::new(AtomicU32::new(0));
        let c = count.clone();
        let sub = Subscription::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        sub.dispose();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_disposes() {
        let count = Arc::new(AtomicU32::new(0));
        {
            let c = count.clone();
            let _sub = Subscription::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
