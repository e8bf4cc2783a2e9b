//=========================================================================
// Camera Placement Engine
//=========================================================================
//
// Owns the last commanded viewpoint pose and decides whether a requested
// move is worth the visible jump.
//
// Flow:
//   host camera intent → maybe_move_*() → move_with_heuristics()
//                                           ├─ far / fading → move_to()
//                                           └─ otherwise    → suppressed
//
//   move_to() → ViewpointRig → last_pose ← listeners notified
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};
use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::host::{SceneFade, ViewpointRig};
use crate::core::math::{delta_angle, flatten_yaw, yaw_degrees, Pose};

/// Callback run after every committed move.
pub type MoveListener = Box<dyn FnMut(&Pose)>;

//=== CameraPlacementEngine ===============================================

/// Single writer of the viewpoint pose.
///
/// Everything else may only request moves through this API.
pub struct CameraPlacementEngine {
    rig: Box<dyn ViewpointRig>,
    fade: Box<dyn SceneFade>,
    last_pose: Pose,
    listeners: Vec<MoveListener>,
}

impl CameraPlacementEngine {
    pub fn new(rig: Box<dyn ViewpointRig>, fade: Box<dyn SceneFade>) -> Self {
        Self {
            rig,
            fade,
            last_pose: Pose::IDENTITY,
            listeners: Vec::new(),
        }
    }

    //--- Unconditional Moves ----------------------------------------------

    /// Moves the viewpoint to the given pose.
    ///
    /// Pitch and roll are dropped; only yaw reaches the rig.
    pub fn move_to(&mut self, position: Vec3, rotation: Quat, keep_height: bool) {
        debug!(
            "Moving camera to {:?} (yaw {:.1})",
            position,
            yaw_degrees(rotation)
        );
        self.move_to_quiet(position, rotation, keep_height);
    }

    /// [`move_to`](Self::move_to) without the diagnostic; for per-frame follow.
    pub fn move_to_quiet(&mut self, position: Vec3, rotation: Quat, keep_height: bool) {
        let rotation = flatten_yaw(rotation);
        self.rig.move_to_position(position, rotation, keep_height);
        self.last_pose = Pose::new(position, rotation);

        for listener in self.listeners.iter_mut() {
            listener(&self.last_pose);
        }
    }

    //--- Heuristic Moves --------------------------------------------------

    /// Moves only if the scene fade hides the jump or the destination is far.
    pub fn maybe_move_to(&mut self, position: Vec3, rotation: Quat, keep_height: bool) -> bool {
        self.move_with_heuristics(position, rotation, keep_height, false)
    }

    /// Like [`maybe_move_to`](Self::maybe_move_to), but a running scenario
    /// fade counts as cover for the move.
    pub fn maybe_move_adv(
        &mut self,
        scenario_fade_complete: bool,
        position: Vec3,
        rotation: Quat,
        keep_height: bool,
    ) -> bool {
        self.move_with_heuristics(position, rotation, keep_height, !scenario_fade_complete)
    }

    /// Returns whether the move was committed.
    pub fn move_with_heuristics(
        &mut self,
        position: Vec3,
        rotation: Quat,
        keep_height: bool,
        pretend_fading: bool,
    ) -> bool {
        if pretend_fading || self.fade.is_complete() || self.is_destination_far(position, rotation) {
            self.move_to(position, rotation, keep_height);
            true
        } else {
            debug!("Not moving because heuristic conditions are not met");
            false
        }
    }

    /// `distance / 2 + yaw delta / 90 > 1`, measured from the last pose.
    ///
    /// The yaw delta is signed, so turning one way counts against the
    /// distance term.
    pub fn is_destination_far(&self, position: Vec3, rotation: Quat) -> bool {
        let distance = position.distance(self.last_pose.position);
        let angle = delta_angle(yaw_degrees(rotation), self.last_pose.yaw());
        1.0 < distance / 2.0 + angle / 90.0
    }

    //--- Listeners & State -------------------------------------------------

    /// Registers a callback run after every committed move.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Pose) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn last_pose(&self) -> Pose {
        self.last_pose
    }

    pub fn is_fade_complete(&self) -> bool {
        self.fade.is_complete()
    }
}

impl std::fmt::Debug for CameraPlacementEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraPlacementEngine")
            .field("last_pose", &self.last_pose)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
