//=========================================================================
// Camera Placement
//
// Keeps the VR viewpoint in sync with where the host game would put its
// flat-screen camera, without snapping on every small drift.
//
// Responsibilities:
// - Commit viewpoint moves and remember the last commanded pose
// - Gate requested moves behind the distance/angle/fade heuristic
// - Place the viewpoint for scripted dialogue (impersonate, approach)
//
//=========================================================================

//=== Submodules ==========================================================
mod placement;
mod scenario;

//=== Public API ==========================================================
pub use placement::{CameraPlacementEngine, MoveListener};
pub use scenario::{CharacterSnapshot, FadeLayer, ScenarioDirector, ScenarioMove, ScenarioSnapshot};
