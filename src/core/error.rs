//=========================================================================
// Bridge Errors
//=========================================================================
//
// Error taxonomy shared by every subsystem.
//
//   MissingObject          → warn, treat the frame as a no-op
//   InputSinkDisconnected  → warn, the host input layer went away
//   InputBacklog           → warn, the host is not draining input
//   MissingDependency      → programmer error, logged as error
//   Panicked               → a callback panicked; caught, logged as error
//   Handler                → wraps a failing scene handler callback
//
// Only the per-frame dispatcher catches these. Lower layers return
// sentinel values for expected absence of data instead.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneKind;

//=== BridgeError =========================================================

#[derive(Debug, Error)]
pub enum BridgeError {
    /// A scene object the handler expects is not loaded yet.
    #[error("scene object `{0}` is not loaded")]
    MissingObject(String),

    /// The host dropped the receiving end of the synthetic input channel.
    #[error("synthetic input channel is disconnected")]
    InputSinkDisconnected,

    /// The synthetic input channel is full; the host stopped draining it.
    #[error("synthetic input channel is full")]
    InputBacklog,

    /// A collaborator that must always be present was not provided.
    #[error("required collaborator `{0}` is missing")]
    MissingDependency(&'static str),

    /// A callback panicked; the payload message is kept.
    #[error("callback panicked: {0}")]
    Panicked(String),

    /// A scene handler callback failed.
    #[error("{kind:?} handler failed during {phase}: {source}")]
    Handler {
        kind: SceneKind,
        phase: &'static str,
        #[source]
        source: Box<BridgeError>,
    },
}

impl BridgeError {
    /// Whether this error is expected to clear up on its own in a later frame.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::MissingObject(_) | Self::InputSinkDisconnected | Self::InputBacklog => true,
            Self::MissingDependency(_) | Self::Panicked(_) => false,
            Self::Handler { source, .. } => source.is_transient(),
        }
    }

    pub(crate) fn in_handler(self, kind: SceneKind, phase: &'static str) -> Self {
        Self::Handler {
            kind,
            phase,
            source: Box::new(self),
        }
    }
}

/// Crate-wide result alias.
pub type BridgeResult<T> = Result<T, BridgeError>;

//=== Panic Containment ===================================================

/// Runs `f`, turning a panic into [`BridgeError::Panicked`].
///
/// Cleanup steps run under this guard so that one failing step cannot
/// skip the ones after it.
pub(crate) fn catch_panic<T>(f: impl FnOnce() -> BridgeResult<T>) -> BridgeResult<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(BridgeError::Panicked(panic_message(payload.as_ref()).to_string())),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_object_is_transient() {
        assert!(BridgeError::MissingObject("TalkScene".into()).is_transient());
    }

    #[test]
    fn missing_dependency_is_not_transient() {
        assert!(!BridgeError::MissingDependency("viewpoint rig").is_transient());
    }

    #[test]
    fn caught_panic_becomes_error() {
        let err = catch_panic::<()>(|| panic!("device gone")).unwrap_err();
        assert!(matches!(&err, BridgeError::Panicked(msg) if msg == "device gone"));
        assert!(!err.is_transient());
    }

    #[test]
    fn catch_panic_passes_results_through() {
        assert_eq!(catch_panic(|| Ok(7)).unwrap(), 7);
        assert!(catch_panic::<()>(|| Err(BridgeError::InputBacklog)).unwrap_err().is_transient());
    }

    #[test]
    fn handler_wrapper_inherits_transience() {
        let err = BridgeError::InputSinkDisconnected.in_handler(SceneKind::Action, "update");
        assert!(err.is_transient());
        let msg = err.to_string();
        assert!(msg.contains("Action"));
        assert!(msg.contains("update"));
    }
}
