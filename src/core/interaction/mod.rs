//=========================================================================
// Proximity Interaction
//
// Turns physical overlap between the user's probes (controllers, head)
// and character interaction volumes into routed clicks on the host's
// interaction layer.
//
// Responsibilities:
// - Classify interaction volumes by tag
// - Track active intersections and pick the addressed target
// - Own and release controller focus around touches
// - Drive the automatic kiss gesture from head movement
//
//=========================================================================

//=== Submodules ==========================================================
mod kind;
mod lock;
mod mouth;
mod tracker;

//=== Public API ==========================================================
pub use kind::{candidate_kinds, InteractionKind, InteractionTarget, VOLUME_TAG_PREFIX};
pub use lock::{route_target, DeviceContext, InteractionLockController, LockState};
pub use mouth::{KissPhase, MouthContext, MouthController};
pub use tracker::ColliderPriorityTracker;
