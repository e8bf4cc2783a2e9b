//=========================================================================
// Injection Router
//=========================================================================
//
// Host-side consumer of the synthetic input channel. Merges synthetic
// button signals with native ones so the host's action code sees a
// single per-frame button state.
//
// Architecture:
//   HostInputEnd.inputs → update(native) → per-button queues → query
//                                        ↘ acks (on delivery)
//
// Frame lifecycle: update() once → is_pressed()/is_down()/is_released()
//
// Native edges always win. Otherwise at most one synthetic edge per
// button is delivered per frame: a queued down while not self-pressed,
// or a queued up while self-pressed.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet, VecDeque};

use crossbeam_channel::{Receiver, Sender};
use log::debug;

//=== Internal Dependencies ===============================================

use super::event::{InjectionId, LogicalButton, SyntheticInput};
use super::sink::HostInputEnd;

//=== NativeButtons =======================================================

/// Snapshot of the host's real input for one frame.
#[derive(Debug, Clone, Default)]
pub struct NativeButtons {
    held: HashSet<LogicalButton>,
    pressed: HashSet<LogicalButton>,
    released: HashSet<LogicalButton>,
    scroll: f32,
}

impl NativeButtons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `button` as held this frame.
    pub fn hold(mut self, button: LogicalButton) -> Self {
        self.held.insert(button);
        self
    }

    /// Marks `button` as transitioned UP → DOWN this frame (implies held).
    pub fn press(mut self, button: LogicalButton) -> Self {
        self.pressed.insert(button);
        self.held.insert(button);
        self
    }

    /// Marks `button` as transitioned DOWN → UP this frame.
    pub fn release(mut self, button: LogicalButton) -> Self {
        self.released.insert(button);
        self.held.remove(&button);
        self
    }

    pub fn with_scroll(mut self, amount: f32) -> Self {
        self.scroll = amount;
        self
    }

    fn buttons(&self) -> impl Iterator<Item = &LogicalButton> {
        self.held.iter().chain(&self.pressed).chain(&self.released)
    }
}

//=== ButtonChannel =======================================================

#[derive(Debug, Default)]
struct ButtonChannel {
    //--- Queued synthetic signals ----------------------------------------
    downs: VecDeque<InjectionId>,
    ups: VecDeque<InjectionId>,

    //--- Persistent State (survives frame boundary) ----------------------
    pressed_self: bool,

    //--- Frame State (recomputed every update) ---------------------------
    held: bool,
    down: bool,
    up: bool,
}

impl ButtonChannel {
    /// Recomputes the frame state; returns the id delivered this frame.
    fn update(&mut self, native_held: bool, native_down: bool, native_up: bool) -> Option<InjectionId> {
        let mut delivered = None;

        if native_down || native_up {
            self.down = native_down;
            self.up = native_up;
        } else if !self.pressed_self && !self.downs.is_empty() {
            delivered = self.downs.pop_front();
            self.pressed_self = true;
            self.down = true;
            self.up = false;
        } else if self.pressed_self && !self.ups.is_empty() {
            delivered = self.ups.pop_front();
            self.pressed_self = false;
            self.down = false;
            self.up = true;
        } else {
            self.down = false;
            self.up = false;
        }

        self.held = self.pressed_self || native_held;
        delivered
    }
}

//=== InjectionRouter =====================================================

/// Merges native and synthetic button state for the host's action layer.
pub struct InjectionRouter {
    inputs: Receiver<SyntheticInput>,
    acks: Sender<InjectionId>,
    buttons: HashMap<LogicalButton, ButtonChannel>,
    scroll_request: f32,
    scroll_delta: f32,
}

impl InjectionRouter {
    pub fn new(end: HostInputEnd) -> Self {
        Self {
            inputs: end.inputs,
            acks: end.acks,
            buttons: HashMap::new(),
            scroll_request: 0.0,
            scroll_delta: 0.0,
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Advances one frame. Call exactly once per host frame, before queries.
    pub fn update(&mut self, native: &NativeButtons) {
        self.drain_inputs();

        for button in native.buttons() {
            self.buttons.entry(*button).or_default();
        }

        for (button, channel) in self.buttons.iter_mut() {
            let delivered = channel.update(
                native.held.contains(button),
                native.pressed.contains(button),
                native.released.contains(button),
            );

            if let Some(id) = delivered {
                debug!("Delivered synthetic {:?} edge {:?}", button, id);
                // The core may already be gone during shutdown.
                let _ = self.acks.send(id);
            }
        }

        self.scroll_delta = native.scroll + std::mem::take(&mut self.scroll_request);
    }

    fn drain_inputs(&mut self) {
        for input in self.inputs.try_iter() {
            match input {
                SyntheticInput::ButtonDown { button, id } => {
                    self.buttons.entry(button).or_default().downs.push_back(id);
                }
                SyntheticInput::ButtonUp { button, id } => {
                    self.buttons.entry(button).or_default().ups.push_back(id);
                }
                SyntheticInput::Scroll(amount) => self.scroll_request += amount,
            }
        }
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// Returns `true` if `button` transitioned UP → DOWN this frame.
    pub fn is_pressed(&self, button: LogicalButton) -> bool {
        self.buttons.get(&button).map_or(false, |c| c.down)
    }

    /// Returns `true` while `button` is held, natively or synthetically.
    pub fn is_down(&self, button: LogicalButton) -> bool {
        self.buttons.get(&button).map_or(false, |c| c.held)
    }

    /// Returns `true` if `button` transitioned DOWN → UP this frame.
    pub fn is_released(&self, button: LogicalButton) -> bool {
        self.buttons.get(&button).map_or(false, |c| c.up)
    }

    /// Native plus synthetic scroll for this frame.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
