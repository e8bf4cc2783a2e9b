//=========================================================================
// Synthetic Input Events
//=========================================================================
//
// Messages the core sends to the host input layer, and the identities
// used to acknowledge that the host actually consumed them.
//
//=========================================================================

//=== LogicalButton =======================================================

/// Host-side logical button a synthetic signal is tagged with.
///
/// The host maps these onto whatever its own input layer understands
/// (mouse buttons, keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalButton {
    /// Main action button; drives touches and kisses.
    Primary,
    /// Held while the player crouches in roaming scenes.
    Crouch,
}

//=== InjectionId =========================================================

/// Identity of one injected button signal.
///
/// Ids are unique per [`InputSink`](super::InputSink) and increase
/// monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InjectionId(pub u64);

//=== SyntheticInput ======================================================

/// One synthetic signal for the host input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntheticInput {
    ButtonDown { button: LogicalButton, id: InjectionId },
    ButtonUp { button: LogicalButton, id: InjectionId },
    /// Scroll wheel delta; positive values scroll forward.
    Scroll(f32),
}
