//=========================================================================
// Input Sink
//=========================================================================
//
// Core-side end of the synthetic input channel.
//
// Architecture:
//   InputSink ──SyntheticInput──> [bounded channel] ──> host input layer
//   InputSink <──InjectionId───── [acks channel]   <── host input layer
//
// Only ids registered through the `*_tracked` calls keep their
// acknowledgements; everything else is discarded on collection.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::event::{InjectionId, LogicalButton, SyntheticInput};
use crate::core::error::{BridgeError, BridgeResult};

//=== HostInputEnd ========================================================

/// The host's half of the synthetic input channel pair.
///
/// Hand this to the host input layer, or wrap it in an
/// [`InjectionRouter`](super::InjectionRouter).
#[derive(Debug, Clone)]
pub struct HostInputEnd {
    pub inputs: Receiver<SyntheticInput>,
    pub acks: Sender<InjectionId>,
}

/// Creates a connected sink and host end.
///
/// # Panics
///
/// Panics if `capacity == 0`.
pub fn input_channel(capacity: usize) -> (InputSink, HostInputEnd) {
    assert!(capacity > 0, "Channel capacity must be positive");

    let (input_tx, input_rx) = bounded(capacity);
    let (ack_tx, ack_rx) = unbounded();

    let sink = InputSink {
        sender: input_tx,
        acks: ack_rx,
        next_id: 0,
        awaited: HashSet::new(),
        consumed: HashSet::new(),
    };
    let host = HostInputEnd {
        inputs: input_rx,
        acks: ack_tx,
    };
    (sink, host)
}

//=== InputSink ===========================================================

/// Enqueues synthetic button and scroll signals for the host.
#[derive(Debug)]
pub struct InputSink {
    sender: Sender<SyntheticInput>,
    acks: Receiver<InjectionId>,
    next_id: u64,
    awaited: HashSet<InjectionId>,
    consumed: HashSet<InjectionId>,
}

impl InputSink {
    //--- Injection --------------------------------------------------------

    /// Enqueues a button-down signal.
    pub fn press(&mut self, button: LogicalButton) -> BridgeResult<InjectionId> {
        let id = self.allocate_id();
        self.send(SyntheticInput::ButtonDown { button, id })?;
        Ok(id)
    }

    /// Enqueues a button-up signal.
    pub fn release(&mut self, button: LogicalButton) -> BridgeResult<InjectionId> {
        let id = self.allocate_id();
        self.send(SyntheticInput::ButtonUp { button, id })?;
        Ok(id)
    }

    /// Like [`press`](Self::press), but remembers the id so
    /// [`take_consumed`](Self::take_consumed) can report its consumption.
    pub fn press_tracked(&mut self, button: LogicalButton) -> BridgeResult<InjectionId> {
        let id = self.press(button)?;
        self.awaited.insert(id);
        Ok(id)
    }

    /// Enqueues a scroll wheel delta.
    pub fn scroll(&mut self, amount: f32) -> BridgeResult<()> {
        self.send(SyntheticInput::Scroll(amount))
    }

    //--- Acknowledgements -------------------------------------------------

    /// Drains acknowledgements sent back by the host.
    pub fn collect_acks(&mut self) {
        for id in self.acks.try_iter() {
            if self.awaited.contains(&id) {
                self.consumed.insert(id);
            }
        }
    }

    /// Returns `true` once if the host has consumed the tracked signal `id`.
    ///
    /// A consumed id is forgotten after it has been reported.
    pub fn take_consumed(&mut self, id: InjectionId) -> bool {
        self.collect_acks();
        if self.consumed.remove(&id) {
            self.awaited.remove(&id);
            true
        } else {
            false
        }
    }

    /// Stops waiting for `id`.
    pub fn forget(&mut self, id: InjectionId) {
        self.awaited.remove(&id);
        self.consumed.remove(&id);
    }

    /// Number of tracked signals still awaiting consumption.
    pub fn awaited_len(&self) -> usize {
        self.awaited.len() - self.consumed.len()
    }

    //--- Internal Helpers -------------------------------------------------

    fn allocate_id(&mut self) -> InjectionId {
        let id = InjectionId(self.next_id);
        self.next_id += 1;
        id
    }

    fn send(&self, input: SyntheticInput) -> BridgeResult<()> {
        match self.sender.try_send(input) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(input)) => {
                warn!("Synthetic input backlog, dropping {:?}", input);
                Err(BridgeError::InputBacklog)
            }
            Err(TrySendError::Disconnected(_)) => Err(BridgeError::InputSinkDisconnected),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_reach_host_in_order() {
        let (mut sink, host) = input_channel(8);
        let down = sink.press(LogicalButton::Primary).unwrap();
        let up = sink.release(LogicalButton::Primary).unwrap();

        let received: Vec<_> = host.inputs.try_iter().collect();
        assert_eq!(
            received,
            vec![
                SyntheticInput::ButtonDown { button: LogicalButton::Primary, id: down },
                SyntheticInput::ButtonUp { button: LogicalButton::Primary, id: up },
            ]
        );
        assert!(down < up);
    }

    #[test]
    fn tracked_press_reports_consumption_once() {
        let (mut sink, host) = input_channel(8);
        let id = sink.press_tracked(LogicalButton::Primary).unwrap();
        assert!(!sink.take_consumed(id));

        host.acks.send(id).unwrap();
        assert!(sink.take_consumed(id));
        assert!(!sink.take_consumed(id));
        assert_eq!(sink.awaited_len(), 0);
    }

    #[test]
    fn untracked_acks_are_discarded() {
        let (mut sink, host) = input_channel(8);
        let id = sink.press(LogicalButton::Primary).unwrap();
        host.acks.send(id).unwrap();
        sink.collect_acks();
        assert!(!sink.take_consumed(id));
    }

    #[test]
    fn full_channel_is_a_backlog_error() {
        let (mut sink, _host) = input_channel(1);
        sink.scroll(1.0).unwrap();
        assert!(matches!(sink.scroll(1.0), Err(BridgeError::InputBacklog)));
    }

    #[test]
    fn dropped_host_disconnects_sink() {
        let (mut sink, host) = input_channel(4);
        drop(host);
        assert!(matches!(
            sink.press(LogicalButton::Primary),
            Err(BridgeError::InputSinkDisconnected)
        ));
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn zero_capacity_panics() {
        input_channel(0);
    }
}
