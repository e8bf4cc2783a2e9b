//=========================================================================
// Talk Handler
//=========================================================================
//
// One-on-one conversation. The host's own camera sits too far away for a
// friendly chat, so the viewpoint is moved to conversational distance in
// front of the partner whenever she appears.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;
use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::error::BridgeResult;
use crate::core::math::{yaw_rotation, Pose};
use crate::core::scene::{FrameContext, SceneHandler, SceneKind};

//=== TalkHandler =========================================================

#[derive(Debug, Default)]
pub struct TalkHandler {
    /// Partner pose the viewpoint was last placed for.
    placed_for: Option<Pose>,
}

impl TalkHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn adjust_position(&mut self, partner: Pose, cx: &mut FrameContext<'_>) {
        let local = Vec3::new(0.0, cx.settings.standing_camera_height, cx.settings.talk_distance);
        cx.camera.move_to(
            partner.transform_point(local),
            partner.rotation * yaw_rotation(180.0),
            false,
        );
        self.placed_for = Some(partner);
    }
}

impl SceneHandler for TalkHandler {
    fn kind(&self) -> SceneKind {
        SceneKind::Talk
    }

    fn on_start(&mut self, cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        info!("Conversation started");
        match cx.host.talk_partner() {
            Some(partner) => self.adjust_position(partner, cx),
            None => warn!("Talk partner not loaded yet"),
        }
        Ok(())
    }

    fn on_update(&mut self, cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        match cx.host.talk_partner() {
            Some(partner) if self.placed_for.is_none() => self.adjust_position(partner, cx),
            Some(_) => {}
            None => self.placed_for = None,
        }
        Ok(())
    }

    fn on_disable(&mut self, _cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        info!("Conversation ended");
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
