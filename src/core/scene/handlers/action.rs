//=========================================================================
// Action Handler
//=========================================================================
//
// Free roaming. The viewpoint rides along with the player character and
// the headset height drives crouching.
//
// Per frame:
//   map changed?     → stand up, schedule a camera reset
//   player walking?  → follow position, keep headset yaw (quiet)
//   reset pending?   → move behind the player's eyes
//   headset height   → crouch / stand up with hysteresis
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;
use log::info;

//=== Internal Dependencies ===============================================

use crate::core::error::{BridgeError, BridgeResult};
use crate::core::host::PlayerSnapshot;
use crate::core::input::LogicalButton;
use crate::core::math::{flat_direction, flatten_yaw, Pose};
use crate::core::scene::{FrameContext, SceneHandler, SceneKind};

/// Keeps the player's own neck out of view.
const FORWARD_OFFSET: f32 = 0.23;

/// How far behind the viewpoint a relocated player stands.
const PLAYER_BACK_OFFSET: f32 = 0.1;

//=== ActionHandler =======================================================

#[derive(Debug)]
pub struct ActionHandler {
    /// `None` until the first frame has seen a map.
    map_id: Option<Option<u64>>,
    needs_camera_reset: bool,
    standing: bool,
}

impl ActionHandler {
    pub fn new() -> Self {
        Self {
            map_id: None,
            needs_camera_reset: false,
            standing: true,
        }
    }

    pub fn is_standing(&self) -> bool {
        self.standing
    }

    //--- Crouching --------------------------------------------------------

    fn update_crouch(&mut self, player: &PlayerSnapshot, cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        if !cx.settings.crouch_by_hmd_pos {
            return Ok(());
        }

        let delta_y = cx.host.head_pose().position.y - player.pose.position.y;
        if self.standing && delta_y < cx.settings.crouch_threshold {
            self.crouch(cx)
        } else if !self.standing && delta_y > cx.settings.stand_up_threshold {
            self.stand_up(cx)
        } else {
            Ok(())
        }
    }

    fn crouch(&mut self, cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        if self.standing {
            cx.input.press(LogicalButton::Crouch)?;
            self.standing = false;
        }
        Ok(())
    }

    /// Always ends standing; a failed release is reported, not retried.
    fn stand_up(&mut self, cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        if self.standing {
            return Ok(());
        }
        self.standing = true;
        cx.input.release(LogicalButton::Crouch).map(|_| ())
    }

    //--- Camera -----------------------------------------------------------

    /// Places the viewpoint at the player's eyes, slightly forward.
    ///
    /// With `only_position` the headset keeps its own yaw.
    fn move_camera_to_player(
        &self,
        player: &PlayerSnapshot,
        only_position: bool,
        quiet: bool,
        cx: &mut FrameContext<'_>,
    ) -> BridgeResult<()> {
        let eye = if cx.settings.using_head_pos {
            player
                .head
                .ok_or_else(|| BridgeError::MissingObject("player head".to_string()))?
                .position
        } else {
            player.pose.position + Vec3::Y * cx.settings.camera_height(self.standing)
        };

        let forward = flat_direction(player.pose.forward());
        let position = eye + forward * FORWARD_OFFSET;
        let rotation = if only_position {
            cx.host.head_pose().rotation
        } else {
            player.pose.rotation
        };

        if quiet {
            cx.camera.move_to_quiet(position, rotation, false);
        } else {
            cx.camera.move_to(position, rotation, false);
        }
        Ok(())
    }
}

//=== Player Placement ====================================================

/// Player pose whose eyes line up with `viewpoint`.
///
/// The player takes the viewpoint's yaw and stands slightly behind it.
/// Without a head bone the eyes sit `fallback_eye_height` above the feet.
pub(crate) fn player_pose_at(viewpoint: Pose, player: &PlayerSnapshot, fallback_eye_height: f32) -> Pose {
    let eye_height = player
        .head
        .map_or(fallback_eye_height, |head| head.position.y - player.pose.position.y);
    let forward = flat_direction(viewpoint.forward());

    let mut position = viewpoint.position - forward * PLAYER_BACK_OFFSET;
    position.y -= eye_height;
    Pose::new(position, flatten_yaw(viewpoint.rotation))
}

impl Default for ActionHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneHandler for ActionHandler {
    fn kind(&self) -> SceneKind {
        SceneKind::Action
    }

    fn on_start(&mut self, _cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        info!("Roaming started");
        Ok(())
    }

    fn on_update(&mut self, cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        let player = cx
            .host
            .player()
            .ok_or_else(|| BridgeError::MissingObject("player".to_string()))?;

        if self.map_id != Some(player.map_id) {
            info!("Map changed to {:?}", player.map_id);
            self.stand_up(cx)?;
            self.map_id = Some(player.map_id);
            self.needs_camera_reset = true;
        }

        if player.walking {
            self.move_camera_to_player(&player, true, true, cx)?;
        }

        if self.needs_camera_reset {
            self.move_camera_to_player(&player, false, false, cx)?;
            self.needs_camera_reset = false;
        }

        self.update_crouch(&player, cx)
    }

    fn on_disable(&mut self, cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        info!("Roaming ended");
        self.needs_camera_reset = false;
        self.stand_up(cx)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
