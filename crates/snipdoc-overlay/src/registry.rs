//! 오버레이 엔진 등록.
//!
//! 루트를 탐색해 루트마다 컨트롤러 하나와 선택 리스너 구독 하나를 만든다.
//! 등록을 drop하면 구독을 해제하고 살아있는 오버레이를 정리한다.

use snipdoc_core::config::AppConfig;
use snipdoc_core::error::CoreError;
use snipdoc_core::models::document::ElementId;
use snipdoc_core::models::selection::SelectionEvent;
use snipdoc_core::ports::render_tree::DocumentTree;
use snipdoc_core::ports::selection_source::{SelectionSource, Subscription};
use std::sync::Arc;
use tracing::info;

use crate::controller::{OverlayController, OverlayPorts, OverlaySettings, ResolvedCallback};
use crate::frame_tree::enumerate_roots;

/// 등록된 오버레이 엔진
#[derive(Debug)]
pub struct AnnotationBars {
    controllers: Vec<Arc<OverlayController>>,
    subscriptions: Vec<Subscription>,
}

impl AnnotationBars {
    /// 모든 루트에 컨트롤러 등록
    pub fn register(
        tree: &dyn DocumentTree,
        source: &dyn SelectionSource,
        ports: OverlayPorts,
        config: &AppConfig,
        on_resolved: ResolvedCallback,
    ) -> Result<Self, CoreError> {
        let mode = config.viewer.mode;
        let roots = enumerate_roots(tree, mode, &config.viewer.viewer_container_id)?;
        let settings = OverlaySettings::from_config(&config.overlay, mode);

        let mut controllers = Vec::with_capacity(roots.len());
        let mut subscriptions = Vec::with_capacity(roots.len());

        for root in roots {
            let controller = OverlayController::new(
                root,
                settings.clone(),
                ports.clone(),
                Arc::clone(&on_resolved),
            );
            let listener = Arc::clone(&controller);
            subscriptions.push(source.add_listener(
                Arc::new(move |event: &SelectionEvent| listener.handle_event(event)),
                root,
            ));
            controllers.push(controller);
        }

        info!("오버레이 엔진 등록: {:?} 모드, 루트 {}개", mode, controllers.len());
        Ok(Self {
            controllers,
            subscriptions,
        })
    }

    /// 등록된 루트 목록
    pub fn roots(&self) -> Vec<ElementId> {
        self.controllers.iter().map(|c| c.root()).collect()
    }

    pub fn controller(&self, root: ElementId) -> Option<&Arc<OverlayController>> {
        self.controllers.iter().find(|c| c.root() == root)
    }

    /// 살아있는 오버레이 수 (루트당 최대 1)
    pub fn active_count(&self) -> usize {
        self.controllers.iter().filter(|c| c.is_active()).count()
    }

    /// 구독 해제 및 오버레이 정리
    pub fn unregister(self) {
        drop(self);
    }
}

impl Drop for AnnotationBars {
    fn drop(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
        for controller in &self.controllers {
            controller.teardown();
        }
    }
}
