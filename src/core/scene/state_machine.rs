//=========================================================================
// Scene State Machine
//=========================================================================
//
// Drives the handler lifecycle from the detected scene kind.
//
// Handler failures never escape `update`: they are logged with the kind
// and phase that failed, and the next frame runs normally. A panicking
// callback counts as a failure, so a handler swap always completes.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use super::detector::SceneDetector;
use super::handlers::{
    ActionHandler, CustomHandler, InteractionHandler, NightMenuHandler, OtherHandler, TalkHandler,
};
use super::{FrameContext, SceneHandler, SceneKind};
use crate::core::error::{catch_panic, BridgeResult};

//=== SceneStateMachine ===================================================

/// Owns the current scene handler and swaps it on mode changes.
pub struct SceneStateMachine {
    detector: SceneDetector,
    current: SceneKind,
    handler: Box<dyn SceneHandler>,
}

impl SceneStateMachine {
    /// Starts in [`SceneKind::Other`].
    pub fn new() -> Self {
        Self {
            detector: SceneDetector::new(),
            current: SceneKind::Other,
            handler: Box::new(OtherHandler),
        }
    }

    pub fn current_kind(&self) -> SceneKind {
        self.current
    }

    /// Runs one frame. Returns the new kind if the scene changed.
    pub fn update(&mut self, cx: &mut FrameContext<'_>) -> Option<SceneKind> {
        let detected = self.detector.detect(&*cx.host);
        let changed = detected != self.current;

        if changed {
            info!("Scene changed: {:?} -> {:?}", self.current, detected);
            self.transition_to(detected, cx);
        }

        let handler = &mut self.handler;
        let result = catch_panic(|| handler.on_update(cx));
        report(self.current, "update", result);

        changed.then_some(detected)
    }

    /// Disables the current handler and falls back to [`SceneKind::Other`].
    ///
    /// Used when the embedding host shuts the core down.
    pub fn shutdown(&mut self, cx: &mut FrameContext<'_>) {
        if self.current != SceneKind::Other {
            self.transition_to(SceneKind::Other, cx);
        }
        self.detector.invalidate();
    }

    fn transition_to(&mut self, kind: SceneKind, cx: &mut FrameContext<'_>) {
        let handler = &mut self.handler;
        let result = catch_panic(|| handler.on_disable(cx));
        report(self.current, "disable", result);

        self.handler = create_handler_for(kind);
        self.current = kind;

        let handler = &mut self.handler;
        let result = catch_panic(|| handler.on_start(cx));
        report(kind, "start", result);
    }
}

impl Default for SceneStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SceneStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneStateMachine")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

/// A fresh handler for `kind`.
pub fn create_handler_for(kind: SceneKind) -> Box<dyn SceneHandler> {
    match kind {
        SceneKind::Other => Box::new(OtherHandler),
        SceneKind::Action => Box::new(ActionHandler::new()),
        SceneKind::Talk => Box::new(TalkHandler::new()),
        SceneKind::Interaction => Box::new(InteractionHandler::new()),
        SceneKind::NightMenu => Box::new(NightMenuHandler),
        SceneKind::Custom => Box::new(CustomHandler),
    }
}

fn report(kind: SceneKind, phase: &'static str, result: BridgeResult<()>) {
    if let Err(err) = result {
        let err = err.in_handler(kind, phase);
        if err.is_transient() {
            warn!("{}", err);
        } else {
            error!("{}", err);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
