//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use vr_scene_sync::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder};

// Configuration and errors
pub use crate::core::{BridgeError, BridgeResult, Pose, Settings};

// Host contract
pub use crate::core::host::{
    CharacterId, ControllerDevice, ControllerEdges, FocusLock, GameHost, Hand, InteractionHost,
    MarkerHandle, PlayerSnapshot, Probe, SceneFade, SessionId, TaggedVolume, ViewpointRig,
    VolumeEvent, VolumeId,
};

// Host-side input
pub use crate::core::input::{HostInputEnd, InjectionRouter, LogicalButton, NativeButtons};

// Scenario camera
pub use crate::core::camera::{CharacterSnapshot, FadeLayer, ScenarioMove, ScenarioSnapshot};

// Scene system
pub use crate::core::scene::SceneKind;
