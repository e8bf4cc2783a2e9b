//=========================================================================
// Host Integration
//
// Abstract view of the game the core is embedded in: its scene graph,
// characters, trigger volumes, controllers and viewpoint.
//
// Responsibilities:
// - Name host objects with plain copyable identities
// - Expose per-frame snapshots instead of live host references
// - Carry every side effect back to the host through traits
//
//=========================================================================

//=== Submodules ==========================================================
mod interface;

#[cfg(test)]
pub(crate) mod mock;

//=== Public API ==========================================================
pub use interface::*;
