//=========================================================================
// Interaction Lock Controller
//=========================================================================
//
// Decides when a controller takes exclusive ownership of the user's
// action button, and turns trigger pulls into synthetic clicks aimed at
// the volume the controller is touching.
//
// States:
//   Idle ──(intersecting)──> Locked ──(trigger down)──> Pressing
//     ^                        │  ^                        │
//     └──(not intersecting)────┘  └────(trigger up)────────┘
//
// The lock is never released while the trigger is held; release waits
// for the trigger-up edge so an in-progress action is not cut short.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;
use log::debug;

//=== Internal Dependencies ===============================================

use super::kind::{InteractionKind, InteractionTarget};
use super::tracker::ColliderPriorityTracker;
use crate::core::error::BridgeResult;
use crate::core::host::{
    ControllerDevice, ControllerEdges, FocusLock, Hand, InteractionHost, VolumeEvent,
};
use crate::core::input::{InjectionId, InputSink, LogicalButton};
use crate::core::schedule::{Deferred, Resume};
use crate::core::settings::Settings;

const RUMBLE_MICROS: u16 = 1000;

//=== LockState ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// No lock held.
    Idle,
    /// Lock held, trigger up.
    Locked,
    /// Lock held, trigger down.
    Pressing,
}

//=== DeviceContext =======================================================

/// Everything one controller event needs from the outside world.
pub struct DeviceContext<'a> {
    pub world: &'a mut dyn InteractionHost,
    pub device: &'a mut dyn ControllerDevice,
    pub input: &'a mut InputSink,
    pub settings: &'a Settings,
    /// World position of the controller's reference point.
    pub reference: Vec3,
    /// The host is in its point-move sub-mode, where touches are disabled.
    pub point_move: bool,
}

//=== InteractionLockController ===========================================

/// Per-controller lock and click routing for one interaction session.
#[derive(Debug)]
pub struct InteractionLockController {
    hand: Hand,
    tracker: ColliderPriorityTracker,
    /// May be absent, but never stale.
    lock: Option<FocusLock>,
    /// Always false while `lock` is absent.
    trigger_pressed: bool,
    /// Auto-touch click waiting for its press to be consumed.
    click: Deferred<InjectionId, InjectionId>,
}

impl InteractionLockController {
    pub fn new(hand: Hand) -> Self {
        Self {
            hand,
            tracker: ColliderPriorityTracker::new(),
            lock: None,
            trigger_pressed: false,
            click: Deferred::new("auto-touch click"),
        }
    }

    /// Registers the session's interaction volumes with this controller's
    /// tracker.
    pub fn register(&mut self, world: &dyn InteractionHost) {
        self.tracker.register_known_colliders(world);
    }

    //--- Queries ----------------------------------------------------------

    pub fn hand(&self) -> Hand {
        self.hand
    }

    pub fn state(&self) -> LockState {
        match (&self.lock, self.trigger_pressed) {
            (None, _) => LockState::Idle,
            (Some(_), false) => LockState::Locked,
            (Some(_), true) => LockState::Pressing,
        }
    }

    pub fn has_lock(&self) -> bool {
        self.lock.is_some()
    }

    pub fn tracker(&self) -> &ColliderPriorityTracker {
        &self.tracker
    }

    pub fn has_pending_click(&self) -> bool {
        self.click.is_pending()
    }

    //--- Volume Events ----------------------------------------------------

    /// Applies one overlap event, then re-evaluates the lock.
    pub fn on_volume_event(&mut self, event: VolumeEvent, cx: &mut DeviceContext<'_>) -> BridgeResult<()> {
        match event {
            VolumeEvent::Entered(volume) => {
                if cx.point_move {
                    return Ok(());
                }

                let was_intersecting = self.tracker.is_intersecting();
                if !self.tracker.add_if_relevant(volume, &*cx.world) {
                    return Ok(());
                }

                self.update_lock(cx)?;

                if self.lock.is_some() && cx.settings.automatic_touching {
                    let target = self.tracker.current_collider_kind(&*cx.world, cx.reference);
                    if target.kind.is_reaction() {
                        route_target(cx.world, target);
                        self.start_click(cx.input)?;
                    }
                }

                if !was_intersecting && self.tracker.is_intersecting() {
                    cx.device.rumble(RUMBLE_MICROS);
                }
                Ok(())
            }
            VolumeEvent::Exited(volume) => {
                if self.tracker.remove_if_relevant(volume) {
                    self.update_lock(cx)?;
                }
                Ok(())
            }
        }
    }

    //--- Frame Update -----------------------------------------------------

    /// Processes this frame's button edges while holding a lock.
    pub fn update(&mut self, edges: ControllerEdges, cx: &mut DeviceContext<'_>) -> BridgeResult<()> {
        self.resume_click(cx.input)?;

        if self.lock.is_some() && cx.point_move {
            self.release_lock_in(cx)?;
        }

        if self.lock.is_some() {
            self.handle_trigger(edges, cx)?;
            self.handle_tool_change(edges, cx)?;
        }
        Ok(())
    }

    /// Force-releases everything this controller holds.
    ///
    /// Used when the session ends; ignores the trigger-held rule. `world`
    /// may already be gone, in which case nothing is re-routed.
    pub fn teardown(
        &mut self,
        world: Option<&mut dyn InteractionHost>,
        device: &mut dyn ControllerDevice,
        input: &mut InputSink,
    ) -> BridgeResult<()> {
        let click = self.cancel_click(input);
        let lock = if self.lock.is_some() {
            self.release_lock(world, device, input)
        } else {
            Ok(())
        };
        self.tracker.clear();
        click.and(lock)
    }

    //--- Internal Helpers -------------------------------------------------

    fn update_lock(&mut self, cx: &mut DeviceContext<'_>) -> BridgeResult<()> {
        let should_have_lock = self.tracker.is_intersecting();

        if should_have_lock && self.lock.is_none() {
            self.lock = cx.device.try_acquire_focus();
            match &self.lock {
                Some(lock) => debug!("{:?} controller acquired focus ({})", self.hand, lock.token()),
                None => debug!("{:?} controller focus is taken elsewhere", self.hand),
            }
        } else if !should_have_lock && self.lock.is_some() && !self.trigger_pressed {
            self.release_lock_in(cx)?;
        }
        Ok(())
    }

    fn handle_trigger(&mut self, edges: ControllerEdges, cx: &mut DeviceContext<'_>) -> BridgeResult<()> {
        if !self.trigger_pressed && edges.trigger_pressed {
            self.update_selected_kind(cx);
            cx.input.press(LogicalButton::Primary)?;
            cx.device.rumble(RUMBLE_MICROS);
            self.trigger_pressed = true;
        } else if self.trigger_pressed && edges.trigger_released {
            cx.input.release(LogicalButton::Primary)?;
            self.trigger_pressed = false;
            if !self.tracker.is_intersecting() {
                self.release_lock_in(cx)?;
            }
        }
        Ok(())
    }

    fn handle_tool_change(&mut self, edges: ControllerEdges, cx: &mut DeviceContext<'_>) -> BridgeResult<()> {
        if edges.menu_released {
            self.update_selected_kind(cx);
            cx.input.scroll(1.0)?;
        }
        Ok(())
    }

    fn release_lock_in(&mut self, cx: &mut DeviceContext<'_>) -> BridgeResult<()> {
        let world: &mut dyn InteractionHost = &mut *cx.world;
        self.release_lock(Some(world), &mut *cx.device, &mut *cx.input)
    }

    /// Gives the lock back to the device. The lock is always released,
    /// even if winding down the synthetic press fails.
    fn release_lock(
        &mut self,
        world: Option<&mut dyn InteractionHost>,
        device: &mut dyn ControllerDevice,
        input: &mut InputSink,
    ) -> BridgeResult<()> {
        if let Some(world) = world {
            route_target(world, InteractionTarget::NONE);
        }

        let result = if self.trigger_pressed {
            input.release(LogicalButton::Primary).map(|_| ())
        } else {
            Ok(())
        };
        self.trigger_pressed = false;

        if let Some(lock) = self.lock.take() {
            debug!("{:?} controller released focus ({})", self.hand, lock.token());
            device.release_focus(lock);
        }
        result
    }

    fn update_selected_kind(&self, cx: &mut DeviceContext<'_>) {
        let target = self.tracker.current_collider_kind(&*cx.world, cx.reference);
        route_target(cx.world, target);
    }

    fn start_click(&mut self, input: &mut InputSink) -> BridgeResult<()> {
        self.cancel_click(input)?;
        let id = input.press_tracked(LogicalButton::Primary)?;
        self.click.schedule(Resume::When(id), id);
        Ok(())
    }

    fn resume_click(&mut self, input: &mut InputSink) -> BridgeResult<()> {
        if self.click.poll(0, |id| input.take_consumed(*id)).is_some() {
            input.release(LogicalButton::Primary)?;
        }
        Ok(())
    }

    /// Winds down an outstanding click by queueing its release right away.
    fn cancel_click(&mut self, input: &mut InputSink) -> BridgeResult<()> {
        match self.click.cancel() {
            Some(id) => {
                input.forget(id);
                input.release(LogicalButton::Primary).map(|_| ())
            }
            None => Ok(()),
        }
    }
}

//=== Routing =============================================================

/// Points subsequent clicks at `target`, clearing every other owner.
pub fn route_target(world: &mut dyn InteractionHost, target: InteractionTarget) {
    for owner in 0..world.owner_count() {
        let kind = if owner == target.owner {
            target.kind
        } else {
            InteractionKind::None
        };
        world.set_selected_kind(owner, kind);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
