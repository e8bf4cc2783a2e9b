//=========================================================================
// Interaction Handler
//=========================================================================
//
// Close-contact interaction scenes. While the host runs an interaction
// session, each controller gets its own tracker and lock, and the
// headset gets a mouth controller.
//
// Per frame:
//   session changed? → tear down old controllers, build new ones
//   each hand        → volume events (delivery order), then button edges
//   headset          → volume events, then kiss gesture
//
// A new session always starts from fresh registrations; nothing from the
// previous session survives its teardown.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::error::{catch_panic, BridgeError, BridgeResult};
use crate::core::host::{Hand, Probe, SessionId};
use crate::core::interaction::{
    DeviceContext, InteractionLockController, MouthContext, MouthController,
};
use crate::core::scene::{FrameContext, SceneHandler, SceneKind};

/// Host sub-scene in which the user picks a new position; touches are off.
const POINT_MOVE_SCENE: &str = "HPointMove";

//=== ActiveSession =======================================================

#[derive(Debug)]
struct ActiveSession {
    id: SessionId,
    hands: [InteractionLockController; 2],
    mouth: MouthController,
}

//=== InteractionHandler ==================================================

#[derive(Debug, Default)]
pub struct InteractionHandler {
    session: Option<ActiveSession>,
}

impl InteractionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn controller(&self, hand: Hand) -> Option<&InteractionLockController> {
        self.session
            .as_ref()
            .and_then(|s| s.hands.iter().find(|c| c.hand() == hand))
    }

    pub fn mouth(&self) -> Option<&MouthController> {
        self.session.as_ref().map(|s| &s.mouth)
    }

    //--- Session Lifecycle ------------------------------------------------

    fn activate(&mut self, id: SessionId, cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        let world = cx
            .host
            .interaction_world()
            .ok_or_else(|| BridgeError::MissingObject("interaction world".to_string()))?;

        let mut hands = Hand::ALL.map(InteractionLockController::new);
        for controller in hands.iter_mut() {
            controller.register(&*world);
        }
        let mut mouth = MouthController::new();
        mouth.register(&*world);

        info!("Interaction session {:?} started", id);
        self.session = Some(ActiveSession { id, hands, mouth });
        Ok(())
    }

    /// Force-releases locks, gestures and intersections of the session.
    ///
    /// Each hand is torn down under its own panic guard; a host failure on
    /// one hand still releases the other.
    fn deactivate(&mut self, cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };

        let mut result = Ok(());
        for controller in session.hands.iter_mut() {
            let host = &mut *cx.host;
            let input = &mut *cx.input;
            let torn_down = catch_panic(|| {
                let (device, world) = host.device_and_world(controller.hand());
                controller.teardown(world, device, input)
            });
            keep_first(&mut result, torn_down);
        }
        keep_first(&mut result, session.mouth.teardown(&mut *cx.input));

        info!("Interaction session {:?} ended", session.id);
        result
    }
}

impl SceneHandler for InteractionHandler {
    fn kind(&self) -> SceneKind {
        SceneKind::Interaction
    }

    fn on_start(&mut self, _cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        info!("Interaction scene started");
        Ok(())
    }

    fn on_update(&mut self, cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        let current = cx.host.interaction_session();

        if let Some(active) = &self.session {
            if current != Some(active.id) {
                self.deactivate(cx)?;
            }
        }

        if self.session.is_none() {
            if let Some(id) = current {
                self.activate(id, cx)?;
            }
        }

        match self.session.as_mut() {
            Some(session) => process_frame(session, cx),
            None => Ok(()),
        }
    }

    fn on_disable(&mut self, cx: &mut FrameContext<'_>) -> BridgeResult<()> {
        self.deactivate(cx)
    }
}

//=== Frame Processing ====================================================

fn process_frame(session: &mut ActiveSession, cx: &mut FrameContext<'_>) -> BridgeResult<()> {
    // Events stay queued on the host until a frame can apply them.
    if cx.host.interaction_world().is_none() {
        return Err(BridgeError::MissingObject("interaction world".to_string()));
    }

    let point_move = cx.host.top_scene_name().as_deref() == Some(POINT_MOVE_SCENE);
    let mut result = Ok(());

    for controller in session.hands.iter_mut() {
        let hand = controller.hand();
        let probe = Probe::Hand(hand);
        let events = cx.host.take_volume_events(probe);
        let reference = cx.host.probe_position(probe);
        let edges = cx.host.controller_edges(hand);

        let (device, world) = cx.host.device_and_world(hand);
        let world = world.ok_or_else(|| BridgeError::MissingObject("interaction world".to_string()))?;
        let mut dcx = DeviceContext {
            world,
            device,
            input: &mut *cx.input,
            settings: cx.settings,
            reference,
            point_move,
        };

        // Later events still run if one fails; each must update the lock.
        for event in events {
            keep_first(&mut result, controller.on_volume_event(event, &mut dcx));
        }
        keep_first(&mut result, controller.update(edges, &mut dcx));
    }

    let events = cx.host.take_volume_events(Probe::Mouth);
    let reference = cx.host.probe_position(Probe::Mouth);
    let frame = cx.frame;
    let world = cx
        .host
        .interaction_world()
        .ok_or_else(|| BridgeError::MissingObject("interaction world".to_string()))?;
    let mut mcx = MouthContext {
        world,
        input: &mut *cx.input,
        settings: cx.settings,
        frame,
        reference,
    };
    for event in events {
        keep_first(&mut result, session.mouth.on_volume_event(event, &mut mcx));
    }
    keep_first(&mut result, session.mouth.update(&mut mcx));

    result
}

fn keep_first(acc: &mut BridgeResult<()>, next: BridgeResult<()>) {
    if acc.is_ok() {
        *acc = next;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
