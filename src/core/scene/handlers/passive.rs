//=========================================================================
// Passive Handlers
//=========================================================================
//
// Modes the core does not steer: menus, the character editor, and
// everything it does not recognize. They only report their lifecycle.
//
//=========================================================================

use log::info;

use crate::core::error::BridgeResult;
use crate::core::scene::{FrameContext, SceneHandler, SceneKind};

/// Fallback for unrecognized modes.
#[derive(Debug, Default)]
pub struct OtherHandler;

impl SceneHandler for OtherHandler {
    fn kind(&self) -> SceneKind {
        SceneKind::Other
    }

    fn on_update(&mut self, _cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NightMenuHandler;

impl SceneHandler for NightMenuHandler {
    fn kind(&self) -> SceneKind {
        SceneKind::NightMenu
    }

    fn on_start(&mut self, _cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        info!("Night menu started");
        Ok(())
    }

    fn on_update(&mut self, _cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        Ok(())
    }

    fn on_disable(&mut self, _cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        info!("Night menu closed");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CustomHandler;

impl SceneHandler for CustomHandler {
    fn kind(&self) -> SceneKind {
        SceneKind::Custom
    }

    fn on_start(&mut self, _cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        info!("Character editor started");
        Ok(())
    }

    fn on_update(&mut self, _cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        Ok(())
    }

    fn on_disable(&mut self, _cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        info!("Character editor closed");
        Ok(())
    }
}
