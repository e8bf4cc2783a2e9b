//=========================================================================
// Scene Handlers
//
// One handler per gameplay mode. Each keeps the viewpoint and the
// synthetic input consistent with what that mode expects.
//
//=========================================================================

//=== Submodules ==========================================================
mod action;
mod interaction;
mod passive;
mod talk;

//=== Public API ==========================================================
pub use action::ActionHandler;
pub(crate) use action::player_pose_at;
pub use interaction::InteractionHandler;
pub use passive::{CustomHandler, NightMenuHandler, OtherHandler};
pub use talk::TalkHandler;
