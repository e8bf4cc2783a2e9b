//=========================================================================
// Core Systems
//
// Everything the engine runs on the host's frame thread.
//
// Responsibilities:
// - Detect the host's gameplay mode and drive per-mode handlers
// - Track interaction volumes touched by controllers and the headset
// - Arbitrate exclusive controller focus and inject synthetic clicks
// - Place the VR viewpoint with distance/angle heuristics
//
// Notes:
// All host access goes through the traits in `host`. The core holds no
// global state; every component is owned by the `Engine` facade and
// borrowed into handlers through `FrameContext`.
//
//=========================================================================

pub mod camera;
pub mod error;
pub mod host;
pub mod input;
pub mod interaction;
pub mod math;
pub mod scene;
pub mod schedule;
pub mod settings;

//=== Public API ==========================================================
pub use error::{BridgeError, BridgeResult};
pub use math::Pose;
pub use settings::{Settings, SettingsBuilder};
