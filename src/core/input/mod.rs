//=========================================================================
// Synthetic Input
//
// Injects button presses, releases and scroll deltas into the host's
// input layer, and reports back when the host has consumed them.
//
// Responsibilities:
// - Allocate identities for injected button signals
// - Carry signals to the host over a bounded channel
// - Collect consumption acknowledgements for multi-step gestures
// - Offer a host-side router that merges synthetic and native input
//
//=========================================================================

//=== Submodules ==========================================================
mod event;
mod router;
mod sink;

//=== Public API ==========================================================
pub use event::{InjectionId, LogicalButton, SyntheticInput};
pub use router::{InjectionRouter, NativeButtons};
pub use sink::{input_channel, HostInputEnd, InputSink};
