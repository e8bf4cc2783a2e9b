//=========================================================================
// Mouth Controller
//=========================================================================
//
// Lets the user start a kiss by moving their head into a character's
// mouth volume.
//
// Kiss gesture:
//   Idle ─(mouth target)─> AwaitPress ─(press consumed)─> Settle
//                                                           │ next frame
//   Idle <─(end requested or host stopped kissing)── Holding <┘
//
// At most one gesture runs at a time. Leaving the volume only asks the
// gesture to end; the release is injected by the gesture itself.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;
use log::debug;

//=== Internal Dependencies ===============================================

use super::kind::InteractionKind;
use super::tracker::ColliderPriorityTracker;
use crate::core::error::BridgeResult;
use crate::core::host::{InteractionHost, VolumeEvent};
use crate::core::input::{InjectionId, InputSink, LogicalButton};
use crate::core::settings::Settings;

//=== MouthContext ========================================================

pub struct MouthContext<'a> {
    pub world: &'a mut dyn InteractionHost,
    pub input: &'a mut InputSink,
    pub settings: &'a Settings,
    pub frame: u64,
    /// World position of the mouth volumes.
    pub reference: Vec3,
}

//=== KissPhase ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KissPhase {
    Idle,
    /// Press injected, waiting for the host to consume it.
    AwaitPress {
        id: InjectionId,
        owner: usize,
        previous: InteractionKind,
    },
    /// Press consumed; the selected kind is restored on `at`.
    Settle {
        at: u64,
        owner: usize,
        previous: InteractionKind,
    },
    /// Kiss running; button held.
    Holding,
}

//=== MouthController =====================================================

#[derive(Debug)]
pub struct MouthController {
    tracker: ColliderPriorityTracker,
    phase: KissPhase,
    end_requested: bool,
}

impl MouthController {
    pub fn new() -> Self {
        Self {
            tracker: ColliderPriorityTracker::new(),
            phase: KissPhase::Idle,
            end_requested: false,
        }
    }

    pub fn register(&mut self, world: &dyn InteractionHost) {
        self.tracker.register_known_colliders(world);
    }

    pub fn phase(&self) -> KissPhase {
        self.phase
    }

    pub fn is_end_requested(&self) -> bool {
        self.end_requested
    }

    pub fn tracker(&self) -> &ColliderPriorityTracker {
        &self.tracker
    }

    //--- Events -----------------------------------------------------------

    pub fn on_volume_event(&mut self, event: VolumeEvent, cx: &mut MouthContext<'_>) -> BridgeResult<()> {
        let changed = match event {
            VolumeEvent::Entered(volume) => self.tracker.add_if_relevant(volume, &*cx.world),
            VolumeEvent::Exited(volume) => self.tracker.remove_if_relevant(volume),
        };

        if !changed {
            return Ok(());
        }

        let target = self.tracker.current_collider_kind(&*cx.world, cx.reference);
        if target.kind == InteractionKind::Mouth && cx.settings.automatic_kissing {
            self.start_kiss(target.owner, cx)
        } else {
            self.finish_kiss();
            Ok(())
        }
    }

    //--- Gesture ----------------------------------------------------------

    /// Advances the kiss gesture by one frame.
    pub fn update(&mut self, cx: &mut MouthContext<'_>) -> BridgeResult<()> {
        match self.phase {
            KissPhase::Idle => {}
            KissPhase::AwaitPress { id, owner, previous } => {
                if cx.input.take_consumed(id) {
                    self.phase = KissPhase::Settle {
                        at: cx.frame + 1,
                        owner,
                        previous,
                    };
                }
            }
            KissPhase::Settle { at, owner, previous } => {
                if cx.frame >= at {
                    // Only restore if nothing else re-routed in between.
                    if cx.world.selected_kind(owner) == InteractionKind::Mouth {
                        cx.world.set_selected_kind(owner, previous);
                    }
                    self.phase = KissPhase::Holding;
                }
            }
            KissPhase::Holding => {
                if self.end_requested || !cx.world.is_kissing() {
                    self.end_gesture(cx.input)?;
                }
            }
        }
        Ok(())
    }

    /// Stops any running gesture right away and forgets intersections.
    pub fn teardown(&mut self, input: &mut InputSink) -> BridgeResult<()> {
        self.tracker.clear();
        match self.phase {
            KissPhase::Idle => Ok(()),
            KissPhase::AwaitPress { id, .. } => {
                input.forget(id);
                self.end_gesture(input)
            }
            _ => self.end_gesture(input),
        }
    }

    fn start_kiss(&mut self, owner: usize, cx: &mut MouthContext<'_>) -> BridgeResult<()> {
        if self.phase != KissPhase::Idle || cx.world.is_kissing() {
            return Ok(());
        }

        cx.world.stop_licking();
        let previous = cx.world.selected_kind(owner);
        cx.world.set_selected_kind(owner, InteractionKind::Mouth);

        let id = cx.input.press_tracked(LogicalButton::Primary)?;
        debug!("Kiss gesture started on owner {}", owner);
        self.end_requested = false;
        self.phase = KissPhase::AwaitPress { id, owner, previous };
        Ok(())
    }

    fn finish_kiss(&mut self) {
        if self.phase != KissPhase::Idle {
            self.end_requested = true;
        }
    }

    fn end_gesture(&mut self, input: &mut InputSink) -> BridgeResult<()> {
        self.phase = KissPhase::Idle;
        self.end_requested = false;
        debug!("Kiss gesture finished");
        input.release(LogicalButton::Primary).map(|_| ())
    }
}

impl Default for MouthController {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::mock::MockWorld;
    use crate::core::host::VolumeId;
    use crate::core::input::{input_channel, HostInputEnd, SyntheticInput};

    struct Rig {
        world: MockWorld,
        input: InputSink,
        host: HostInputEnd,
        settings: Settings,
        frame: u64,
    }

    impl Rig {
        fn new() -> Self {
            let mut world = MockWorld::new(1);
            world.add_volume(0, 1, "H/Aibu/Hit/mouth", Vec3::new(0.0, 0.0, 0.1));
            world.add_volume(0, 2, "H/Aibu/Hit/muneL", Vec3::new(0.0, -0.3, 0.1));
            world.allow_all();
            world.selected[0] = InteractionKind::ChestLeft;
            let (input, host) = input_channel(16);
            Self {
                world,
                input,
                host,
                settings: Settings::default(),
                frame: 0,
            }
        }

        fn cx(&mut self) -> MouthContext<'_> {
            MouthContext {
                world: &mut self.world,
                input: &mut self.input,
                settings: &self.settings,
                frame: self.frame,
                reference: Vec3::ZERO,
            }
        }

        fn sent(&self) -> Vec<SyntheticInput> {
            self.host.inputs.try_iter().collect()
        }

        fn step(&mut self, mouth: &mut MouthController) {
            self.frame += 1;
            mouth.update(&mut self.cx()).unwrap();
        }
    }

    fn mouth(rig: &Rig) -> MouthController {
        let mut mouth = MouthController::new();
        mouth.register(&rig.world);
        mouth
    }

    fn press_id(sent: &[SyntheticInput]) -> InjectionId {
        match sent {
            [SyntheticInput::ButtonDown { id, .. }] => *id,
            other => panic!("unexpected inputs {:?}", other),
        }
    }

    #[test]
    fn full_kiss_gesture() {
        let mut rig = Rig::new();
        let mut mouth = mouth(&rig);

        mouth.on_volume_event(VolumeEvent::Entered(VolumeId(1)), &mut rig.cx()).unwrap();
        assert_eq!(rig.world.stop_licking_calls, 1);
        assert_eq!(rig.world.selected[0], InteractionKind::Mouth);
        let id = press_id(&rig.sent());

        rig.step(&mut mouth);
        assert!(matches!(mouth.phase(), KissPhase::AwaitPress { .. }));

        rig.host.acks.send(id).unwrap();
        rig.world.kissing = true;
        rig.step(&mut mouth);
        assert!(matches!(mouth.phase(), KissPhase::Settle { .. }));
        assert_eq!(rig.world.selected[0], InteractionKind::Mouth);

        rig.step(&mut mouth);
        assert_eq!(mouth.phase(), KissPhase::Holding);
        assert_eq!(rig.world.selected[0], InteractionKind::ChestLeft);

        rig.step(&mut mouth);
        assert_eq!(mouth.phase(), KissPhase::Holding);
        assert!(rig.sent().is_empty());

        mouth.on_volume_event(VolumeEvent::Exited(VolumeId(1)), &mut rig.cx()).unwrap();
        assert!(mouth.is_end_requested());
        rig.step(&mut mouth);
        assert_eq!(mouth.phase(), KissPhase::Idle);
        assert!(matches!(rig.sent().as_slice(), [SyntheticInput::ButtonUp { .. }]));
    }

    #[test]
    fn host_ending_kiss_releases_button() {
        let mut rig = Rig::new();
        let mut mouth = mouth(&rig);
        mouth.on_volume_event(VolumeEvent::Entered(VolumeId(1)), &mut rig.cx()).unwrap();
        let id = press_id(&rig.sent());
        rig.host.acks.send(id).unwrap();

        rig.step(&mut mouth);
        rig.step(&mut mouth);
        assert_eq!(mouth.phase(), KissPhase::Holding);

        // Host never reports kissing.
        rig.step(&mut mouth);
        assert_eq!(mouth.phase(), KissPhase::Idle);
        assert!(matches!(rig.sent().as_slice(), [SyntheticInput::ButtonUp { .. }]));
    }

    #[test]
    fn rerouted_kind_is_not_overwritten() {
        let mut rig = Rig::new();
        let mut mouth = mouth(&rig);
        mouth.on_volume_event(VolumeEvent::Entered(VolumeId(1)), &mut rig.cx()).unwrap();
        let id = press_id(&rig.sent());
        rig.host.acks.send(id).unwrap();
        rig.step(&mut mouth);

        rig.world.selected[0] = InteractionKind::Genital;
        rig.step(&mut mouth);
        assert_eq!(rig.world.selected[0], InteractionKind::Genital);
    }

    #[test]
    fn no_gesture_while_host_already_kissing() {
        let mut rig = Rig::new();
        rig.world.kissing = true;
        let mut mouth = mouth(&rig);
        mouth.on_volume_event(VolumeEvent::Entered(VolumeId(1)), &mut rig.cx()).unwrap();
        assert_eq!(mouth.phase(), KissPhase::Idle);
        assert!(rig.sent().is_empty());
    }

    #[test]
    fn disabled_automatic_kissing_only_tracks() {
        let mut rig = Rig::new();
        rig.settings.automatic_kissing = false;
        let mut mouth = mouth(&rig);
        mouth.on_volume_event(VolumeEvent::Entered(VolumeId(1)), &mut rig.cx()).unwrap();
        assert!(mouth.tracker().is_intersecting());
        assert_eq!(mouth.phase(), KissPhase::Idle);
    }

    #[test]
    fn second_entry_does_not_restart_gesture() {
        let mut rig = Rig::new();
        let mut mouth = mouth(&rig);
        mouth.on_volume_event(VolumeEvent::Entered(VolumeId(1)), &mut rig.cx()).unwrap();
        rig.sent();
        mouth.on_volume_event(VolumeEvent::Entered(VolumeId(2)), &mut rig.cx()).unwrap();
        assert!(rig.sent().is_empty());
        assert_eq!(rig.world.stop_licking_calls, 1);
    }

    #[test]
    fn teardown_releases_pending_press() {
        let mut rig = Rig::new();
        let mut mouth = mouth(&rig);
        mouth.on_volume_event(VolumeEvent::Entered(VolumeId(1)), &mut rig.cx()).unwrap();
        rig.sent();

        mouth.teardown(&mut rig.input).unwrap();
        assert_eq!(mouth.phase(), KissPhase::Idle);
        assert!(!mouth.tracker().is_intersecting());
        assert_eq!(rig.input.awaited_len(), 0);
        assert!(matches!(rig.sent().as_slice(), [SyntheticInput::ButtonUp { .. }]));
    }
}
