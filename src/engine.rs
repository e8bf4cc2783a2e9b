//=========================================================================
// VR Scene Sync Engine
//
// Bootstrap facade the host's per-frame hook talks to.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  (Engine, HostInputEnd)
//         │                          │
//         ├─ with_rig()              ├─ tick(host) once per frame
//         ├─ with_fade()             ├─ snap_turn(host, clockwise)
//         ├─ with_settings()         └─ handle_teleport(host, shift)
//         └─ with_channel_capacity()
// ```
//
// Frame order inside `tick`:
//   1. collect input acknowledgements
//   2. detect scene → handler lifecycle → handler update
//   3. resume a due impersonation, unless the scene just changed
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use glam::Vec3;
use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use crate::core::camera::{CameraPlacementEngine, CharacterSnapshot, ScenarioDirector, ScenarioMove, ScenarioSnapshot};
use crate::core::error::{panic_message, BridgeError, BridgeResult};
use crate::core::host::{GameHost, SceneFade, ViewpointRig};
use crate::core::input::{input_channel, HostInputEnd, InputSink};
use crate::core::math::{yaw_rotation, Pose};
use crate::core::scene::handlers::player_pose_at;
use crate::core::scene::{FrameContext, SceneKind, SceneStateMachine};
use crate::core::settings::Settings;

/// Origin shifts shorter than this leave the player where it is.
const TELEPORT_FOLLOW_DISTANCE: f32 = 0.2;

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// The viewpoint rig and the scene fade are required.
///
/// # Default Values
///
/// - **Settings**: [`Settings::default`]
/// - **Channel capacity**: 128 synthetic input signals
///
/// # Examples
///
/// ```no_run
/// # use vr_scene_sync::EngineBuilder;
/// # use vr_scene_sync::core::{BridgeResult, Settings};
/// # fn rig() -> Box<dyn vr_scene_sync::core::host::ViewpointRig> { unimplemented!() }
/// # fn fade() -> Box<dyn vr_scene_sync::core::host::SceneFade> { unimplemented!() }
/// # fn main() -> BridgeResult<()> {
/// let (engine, host_input) = EngineBuilder::new()
///     .with_rig(rig())
///     .with_fade(fade())
///     .with_settings(Settings::builder().with_automatic_touching(true).build())
///     .with_channel_capacity(256)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct EngineBuilder {
    settings: Settings,
    channel_capacity: usize,
    rig: Option<Box<dyn ViewpointRig>>,
    fade: Option<Box<dyn SceneFade>>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            channel_capacity: 128,
            rig: None,
            fade: None,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the capacity of the synthetic input channel.
    ///
    /// Signals sent while the host is not draining the channel fail once
    /// it is full.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// The host's viewpoint rig every camera move goes through.
    pub fn with_rig(mut self, rig: Box<dyn ViewpointRig>) -> Self {
        self.rig = Some(rig);
        self
    }

    pub fn with_fade(mut self, fade: Box<dyn SceneFade>) -> Self {
        self.fade = Some(fade);
        self
    }

    /// Builds the engine and the host's end of the synthetic input channel.
    ///
    /// # Errors
    ///
    /// [`BridgeError::MissingDependency`] if the rig or the fade was not
    /// provided.
    pub fn build(self) -> BridgeResult<(Engine, HostInputEnd)> {
        let rig = self.rig.ok_or(BridgeError::MissingDependency("viewpoint rig"))?;
        let fade = self.fade.ok_or(BridgeError::MissingDependency("scene fade"))?;
        info!("Building engine (channel: {})", self.channel_capacity);

        let (input, host_input) = input_channel(self.channel_capacity);
        let engine = Engine {
            settings: self.settings,
            frame: 0,
            camera: CameraPlacementEngine::new(rig, fade),
            input,
            scenes: SceneStateMachine::new(),
            director: ScenarioDirector::new(),
        };
        Ok((engine, host_input))
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("settings", &self.settings)
            .field("channel_capacity", &self.channel_capacity)
            .field("has_rig", &self.rig.is_some())
            .field("has_fade", &self.fade.is_some())
            .finish()
    }
}

//=== Engine ==============================================================

/// Owns one instance of every core component and drives them per frame.
#[derive(Debug)]
pub struct Engine {
    settings: Settings,
    frame: u64,
    camera: CameraPlacementEngine,
    input: InputSink,
    scenes: SceneStateMachine,
    director: ScenarioDirector,
}

impl Engine {
    //--- Frame Loop -------------------------------------------------------

    /// Runs one frame. Call once from the host's per-frame hook.
    ///
    /// Never panics: a panic inside the frame is caught and logged, and the
    /// next call runs normally.
    pub fn tick(&mut self, host: &mut dyn GameHost) {
        self.frame += 1;
        let frame = self.frame;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run_frame(host)));
        if let Err(payload) = outcome {
            error!("Frame {} panicked: {}", frame, panic_message(payload.as_ref()));
        }
    }

    fn run_frame(&mut self, host: &mut dyn GameHost) {
        self.input.collect_acks();

        let mut cx = FrameContext {
            frame: self.frame,
            settings: &self.settings,
            camera: &mut self.camera,
            input: &mut self.input,
            host: &mut *host,
        };
        if self.scenes.update(&mut cx).is_some() {
            self.director.cancel();
        }

        self.director.poll(self.frame, &*host, &mut self.camera);
    }

    /// Disables the current scene handler, releasing everything it holds.
    pub fn shutdown(&mut self, host: &mut dyn GameHost) {
        info!("Shutting down engine at frame {}", self.frame);
        self.director.cancel();

        let mut cx = FrameContext {
            frame: self.frame,
            settings: &self.settings,
            camera: &mut self.camera,
            input: &mut self.input,
            host,
        };
        self.scenes.shutdown(&mut cx);
    }

    //--- Host Camera Hooks ------------------------------------------------

    /// Call after each batch of scripted dialogue commands.
    pub fn handle_scenario_progress(
        &mut self,
        scenario: &ScenarioSnapshot,
        roster: &[CharacterSnapshot],
    ) -> ScenarioMove {
        self.director
            .handle_progress(scenario, roster, &mut self.camera, &self.settings, self.frame)
    }

    /// Turns the viewpoint in place by the configured rotation angle.
    ///
    /// While roaming, the player character turns with it.
    pub fn snap_turn(&mut self, host: &mut dyn GameHost, clockwise: bool) -> BridgeResult<()> {
        let degrees = if clockwise {
            self.settings.rotation_angle
        } else {
            -self.settings.rotation_angle
        };
        let head = host.head_pose();
        self.camera.move_to(head.position, yaw_rotation(degrees) * head.rotation, false);

        if self.current_scene() == SceneKind::Action {
            self.move_player_to(self.camera.last_pose(), host)?;
        }
        Ok(())
    }

    /// Call after the user teleported the headset origin by `origin_shift`.
    ///
    /// While roaming, a long enough jump brings the player character along
    /// unless `teleport_with_protagonist` is off.
    pub fn handle_teleport(&mut self, host: &mut dyn GameHost, origin_shift: Vec3) -> BridgeResult<()> {
        let follow = self.settings.teleport_with_protagonist
            && self.current_scene() == SceneKind::Action
            && origin_shift.length_squared() > TELEPORT_FOLLOW_DISTANCE * TELEPORT_FOLLOW_DISTANCE;
        if !follow {
            return Ok(());
        }
        self.move_player_to(host.head_pose(), host)
    }

    fn move_player_to(&self, viewpoint: Pose, host: &mut dyn GameHost) -> BridgeResult<()> {
        let player = host
            .player()
            .ok_or_else(|| BridgeError::MissingObject("player".to_string()))?;
        let pose = player_pose_at(viewpoint, &player, self.settings.camera_height(true));
        debug!("Moving player to {:?}", pose.position);
        host.set_player_pose(pose);
        Ok(())
    }

    pub fn camera(&self) -> &CameraPlacementEngine {
        &self.camera
    }

    /// For host hooks that request viewpoint moves directly.
    pub fn camera_mut(&mut self) -> &mut CameraPlacementEngine {
        &mut self.camera
    }

    //--- State ------------------------------------------------------------

    pub fn current_scene(&self) -> SceneKind {
        self.scenes.current_kind()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
