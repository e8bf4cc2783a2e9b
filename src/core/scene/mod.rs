//=========================================================================
// Scene System
//=========================================================================
//
// Classifies the host's gameplay mode every frame and runs the matching
// handler.
//
// Architecture:
//   SceneStateMachine
//     ├─ detector: SceneDetector   (marker search + one-slot cache)
//     ├─ current:  SceneKind
//     └─ handler:  Box<dyn SceneHandler>
//
// Flow:
//   update() → detect() → [on_disable() → create → on_start()] → on_update()
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::camera::CameraPlacementEngine;
use crate::core::error::BridgeResult;
use crate::core::host::GameHost;
use crate::core::input::InputSink;
use crate::core::settings::Settings;

//=== Module Declarations =================================================

mod detector;
pub mod handlers;
mod state_machine;

#[cfg(test)]
mod testing;

//=== Public API ==========================================================

pub use detector::SceneDetector;
pub use state_machine::{create_handler_for, SceneStateMachine};

//=== SceneKind ===========================================================

/// Gameplay mode of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneKind {
    #[default]
    Other,
    /// Free roaming on a map.
    Action,
    /// Conversation with a single character.
    Talk,
    /// Close-contact interaction scene.
    Interaction,
    NightMenu,
    /// Character editor.
    Custom,
}

impl SceneKind {
    /// Detection order; the first kind whose marker is found wins.
    pub const DETECTION_ORDER: [SceneKind; 5] = [
        SceneKind::Interaction,
        SceneKind::Action,
        SceneKind::Talk,
        SceneKind::NightMenu,
        SceneKind::Custom,
    ];

    /// Name of the host object whose presence marks this mode.
    pub fn marker_name(self) -> Option<&'static str> {
        match self {
            Self::Other => None,
            Self::Action => Some("ActionScene"),
            Self::Talk => Some("TalkScene"),
            Self::Interaction => Some("HScene"),
            Self::NightMenu => Some("NightMenuScene"),
            Self::Custom => Some("CustomScene"),
        }
    }
}

//=== FrameContext ========================================================

/// Everything a handler may touch during one frame.
pub struct FrameContext<'a> {
    pub frame: u64,
    pub settings: &'a Settings,
    pub camera: &'a mut CameraPlacementEngine,
    pub input: &'a mut InputSink,
    pub host: &'a mut dyn GameHost,
}

//=== SceneHandler Trait ==================================================

/// Mode-specific behavior, owned by [`SceneStateMachine`].
///
/// A handler is created on entry into its mode and dropped after
/// `on_disable`. Only `on_update` is required:
///
/// ```rust
/// # use vr_scene_sync::core::scene::{FrameContext, SceneHandler, SceneKind};
/// # use vr_scene_sync::core::BridgeResult;
/// struct Idle;
///
/// impl SceneHandler for Idle {
///     fn kind(&self) -> SceneKind {
///         SceneKind::Other
///     }
///
///     fn on_update(&mut self, _cx: &mut FrameContext<'_>) -> BridgeResult<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait SceneHandler {
    fn kind(&self) -> SceneKind;

    /// Runs once, right after the handler becomes current.
    fn on_start(&mut self, _cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        Ok(())
    }

    /// Runs every frame while current, including the frame it started.
    fn on_update(&mut self, cx: &mut FrameContext<'_>) -> BridgeResult<()>;

    /// Runs exactly once before the handler is replaced.
    ///
    /// Must release everything the handler holds outside itself.
    fn on_disable(&mut self, _cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        Ok(())
    }
}
