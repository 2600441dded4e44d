//! 인메모리 선택 이벤트 소스.
//!
//! 루트별로 리스너를 보관하고 방출 순서대로 전달한다.
//! 전역 싱글턴이 아니며 같은 리스너를 두 번 등록하면 두 번 호출된다.

use parking_lot::Mutex;
use snipdoc_core::models::document::ElementId;
use snipdoc_core::models::selection::SelectionEvent;
use snipdoc_core::ports::selection_source::{SelectionListener, SelectionSource, Subscription};
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use tracing::debug;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: BTreeMap<u64, (ElementId, SelectionListener)>,
}

/// 선택 이벤트 버스
#[derive(Default, Clone)]
pub struct SelectionBus {
    listeners: Arc<Mutex<Listeners>>,
}

impl SelectionBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// `root`에 등록된 리스너에게 이벤트 전달
    ///
    /// 전달한 리스너 수 반환.
    pub fn emit(&self, root: ElementId, event: &SelectionEvent) -> usize {
        // 리스너 안에서 구독/해제할 수 있도록 락 밖에서 호출
        let targets: Vec<SelectionListener> = self
            .listeners
            .lock()
            .entries
            .values()
            .filter(|(scope, _)| *scope == root)
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in &targets {
            listener(event);
        }
        debug!("선택 이벤트 {:?} → {root} ({}개)", event.kind, targets.len());
        targets.len()
    }

    /// `root`에 등록된 리스너 수
    pub fn listener_count(&self, root: ElementId) -> usize {
        self.listeners
            .lock()
            .entries
            .values()
            .filter(|(scope, _)| *scope == root)
            .count()
    }
}

impl SelectionSource for SelectionBus {
    fn add_listener(&self, listener: SelectionListener, scope_root: ElementId) -> Subscription {
        let id = {
            let mut listeners = self.listeners.lock();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.insert(id, (scope_root, listener));
            id
        };

        let weak: Weak<Mutex<Listeners>> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                listeners.lock().entries.remove(&id);
            }
        })
    }
}
