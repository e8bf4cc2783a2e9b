//=========================================================================
// VR Scene Sync - Library Root
//
// Scene-aware viewpoint and interaction bridge for playing a desktop
// game in VR.
//
// Responsibilities:
// - Expose the engine facade (`Engine`, `EngineBuilder`)
// - Expose the host traits the embedding game implements
// - Keep per-frame orchestration behind a single `tick` call
//
// Typical usage:
// ```no_run
// use vr_scene_sync::EngineBuilder;
//
// let (mut engine, host_input) = EngineBuilder::new()
//     .with_rig(rig)
//     .with_fade(fade)
//     .build()?;
// // every frame:
// engine.tick(&mut host);
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the scene, interaction, camera and input subsystems, plus
// the host traits. Most embedders only need the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` wires the subsystems together and owns the frame order.
//
mod engine;

//--- Public Exports ------------------------------------------------------
pub use engine::{Engine, EngineBuilder};
