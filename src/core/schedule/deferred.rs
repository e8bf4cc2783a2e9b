//=========================================================================
// Deferred Continuation
//=========================================================================
//
// Single-slot "resume later" state machine, checked once per tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Resume ==============================================================

/// When a deferred continuation becomes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume<C> {
    /// Due on the first poll at or after this frame.
    AtFrame(u64),

    /// Due on the first poll where the owner's predicate accepts `C`.
    When(C),
}

impl<C> Resume<C> {
    /// Due on the frame after `now`.
    pub fn next_frame(now: u64) -> Self {
        Self::AtFrame(now + 1)
    }
}

//=== Deferred ============================================================

/// One outstanding continuation of a given purpose.
///
/// `C` is the condition payload for [`Resume::When`], `T` is the state
/// carried to the resumed step.
#[derive(Debug)]
pub struct Deferred<C, T> {
    label: &'static str,
    pending: Option<(Resume<C>, T)>,
}

impl<C, T> Deferred<C, T> {
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            pending: None,
        }
    }

    /// Schedules a continuation.
    ///
    /// Returns the payload of a continuation that was still outstanding;
    /// it will never be resumed.
    pub fn schedule(&mut self, resume: Resume<C>, payload: T) -> Option<T> {
        let replaced = self.cancel();
        if replaced.is_some() {
            debug!("{}: replacing outstanding continuation", self.label);
        }
        self.pending = Some((resume, payload));
        replaced
    }

    /// Takes the payload if the continuation is due this frame.
    ///
    /// `is_met` is only consulted for [`Resume::When`].
    pub fn poll(&mut self, frame: u64, is_met: impl FnOnce(&C) -> bool) -> Option<T> {
        let due = match self.pending.as_ref()? {
            (Resume::AtFrame(at), _) => frame >= *at,
            (Resume::When(condition), _) => is_met(condition),
        };

        if due {
            self.pending.take().map(|(_, payload)| payload)
        } else {
            None
        }
    }

    /// Drops the outstanding continuation, returning its payload.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<C, T> Default for Deferred<C, T> {
    fn default() -> Self {
        Self::new("deferred")
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_resume_waits_for_frame() {
        let mut slot: Deferred<(), &str> = Deferred::new("test");
        slot.schedule(Resume::next_frame(10), "go");

        assert_eq!(slot.poll(10, |_| true), None);
        assert!(slot.is_pending());
        assert_eq!(slot.poll(11, |_| false), Some("go"));
        assert!(!slot.is_pending());
    }

    #[test]
    fn predicate_resume_consults_condition() {
        let mut slot: Deferred<u64, ()> = Deferred::new("test");
        slot.schedule(Resume::When(7), ());

        assert_eq!(slot.poll(0, |id| *id == 3), None);
        assert_eq!(slot.poll(0, |id| *id == 7), Some(()));
    }

    #[test]
    fn scheduling_over_pending_returns_old_payload() {
        let mut slot: Deferred<(), u32> = Deferred::new("test");
        assert_eq!(slot.schedule(Resume::AtFrame(5), 1), None);
        assert_eq!(slot.schedule(Resume::AtFrame(6), 2), Some(1));
        assert_eq!(slot.poll(6, |_| true), Some(2));
    }

    #[test]
    fn cancel_clears_slot() {
        let mut slot: Deferred<(), u32> = Deferred::new("test");
        slot.schedule(Resume::AtFrame(0), 9);
        assert_eq!(slot.cancel(), Some(9));
        assert_eq!(slot.poll(100, |_| true), None);
    }

    #[test]
    fn empty_slot_never_calls_predicate() {
        let mut slot: Deferred<u8, ()> = Deferred::new("test");
        assert_eq!(slot.poll(0, |_| panic!("predicate called")), None);
    }
}
