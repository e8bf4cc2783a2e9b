//=========================================================================
// Host Test Doubles
//=========================================================================
//
// In-memory host used by unit tests across the crate.
//
//=========================================================================

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use glam::{Quat, Vec3};

use super::interface::*;
use crate::core::interaction::InteractionKind;
use crate::core::math::Pose;

//=== MockWorld ===========================================================

#[derive(Debug, Default)]
pub struct MockWorld {
    volumes: Vec<(usize, TaggedVolume)>,
    positions: HashMap<VolumeId, Vec3>,
    allowed: HashSet<(usize, InteractionKind)>,
    pub selected: Vec<InteractionKind>,
    pub kissing: bool,
    pub stop_licking_calls: u32,
}

impl MockWorld {
    pub fn new(owner_count: usize) -> Self {
        Self {
            selected: vec![InteractionKind::None; owner_count],
            ..Self::default()
        }
    }

    pub fn add_volume(&mut self, owner: usize, id: u64, tag: &str, position: Vec3) {
        let volume = TaggedVolume {
            id: VolumeId(id),
            tag: tag.to_string(),
        };
        self.volumes.push((owner, volume));
        self.positions.insert(VolumeId(id), position);
    }

    pub fn allow_all(&mut self) {
        for owner in 0..self.selected.len() {
            for kind in ALL_KINDS {
                self.allowed.insert((owner, kind));
            }
        }
    }

    pub fn deny(&mut self, owner: usize, kind: InteractionKind) {
        self.allowed.remove(&(owner, kind));
    }

    pub fn destroy_volume(&mut self, id: u64) {
        self.positions.remove(&VolumeId(id));
    }
}

const ALL_KINDS: [InteractionKind; 14] = {
    use InteractionKind::*;
    [
        Mouth, ChestLeft, ChestRight, Genital, Anal, RearLeft, RearRight, ReactHead,
        ReactUpperBody, ReactLowerBody, ReactArmLeft, ReactArmRight, ReactLegLeft, ReactLegRight,
    ]
};

impl InteractionHost for MockWorld {
    fn owner_count(&self) -> usize {
        self.selected.len()
    }

    fn tagged_volumes(&self, owner: usize) -> Vec<TaggedVolume> {
        self.volumes
            .iter()
            .filter(|(o, _)| *o == owner)
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn volume_position(&self, volume: VolumeId) -> Option<Vec3> {
        self.positions.get(&volume).copied()
    }

    fn is_kind_allowed(&self, owner: usize, kind: InteractionKind) -> bool {
        self.allowed.contains(&(owner, kind))
    }

    fn selected_kind(&self, owner: usize) -> InteractionKind {
        self.selected.get(owner).copied().unwrap_or_default()
    }

    fn set_selected_kind(&mut self, owner: usize, kind: InteractionKind) {
        if let Some(slot) = self.selected.get_mut(owner) {
            *slot = kind;
        }
    }

    fn is_kissing(&self) -> bool {
        self.kissing
    }

    fn stop_licking(&mut self) {
        self.stop_licking_calls += 1;
    }
}

//=== MockDevice ==========================================================

#[derive(Debug)]
pub struct MockDevice {
    hand: Hand,
    next_token: u64,
    pub grant_focus: bool,
    pub acquired: u32,
    pub released: u32,
    pub rumbles: u32,
}

impl MockDevice {
    pub fn new(hand: Hand) -> Self {
        Self {
            hand,
            next_token: 1,
            grant_focus: true,
            acquired: 0,
            released: 0,
            rumbles: 0,
        }
    }

    pub fn holds_focus(&self) -> bool {
        self.acquired > self.released
    }
}

impl ControllerDevice for MockDevice {
    fn try_acquire_focus(&mut self) -> Option<FocusLock> {
        if !self.grant_focus || self.holds_focus() {
            return None;
        }
        self.acquired += 1;
        self.next_token += 1;
        Some(FocusLock::new(self.hand, self.next_token))
    }

    fn release_focus(&mut self, lock: FocusLock) {
        assert_eq!(lock.hand(), self.hand);
        self.released += 1;
    }

    fn rumble(&mut self, _micros: u16) {
        self.rumbles += 1;
    }
}

//=== MockRig / MockFade ==================================================

/// Recorded `move_to_position` calls, shared with the test.
pub type MoveLog = Rc<RefCell<Vec<(Vec3, Quat, bool)>>>;

#[derive(Debug, Default)]
pub struct MockRig {
    pub moves: MoveLog,
}

impl ViewpointRig for MockRig {
    fn move_to_position(&mut self, position: Vec3, rotation: Quat, keep_height: bool) {
        self.moves.borrow_mut().push((position, rotation, keep_height));
    }
}

#[derive(Debug, Default)]
pub struct MockFade {
    pub complete: Rc<Cell<bool>>,
}

impl SceneFade for MockFade {
    fn is_complete(&self) -> bool {
        self.complete.get()
    }
}

//=== MockHost ============================================================

#[derive(Debug)]
pub struct MockHost {
    pub generation: u64,
    pub markers: HashMap<String, MarkerHandle>,
    pub dead_markers: HashSet<MarkerHandle>,
    pub find_calls: Cell<u32>,
    pub top_scene: Option<String>,
    pub head: Pose,
    pub player: Option<PlayerSnapshot>,
    pub player_moves: Vec<Pose>,
    pub partner: Option<Pose>,
    pub heads: HashMap<CharacterId, Pose>,
    pub session: Option<SessionId>,
    pub events: HashMap<Probe, Vec<VolumeEvent>>,
    pub edges: HashMap<Hand, ControllerEdges>,
    pub probes: HashMap<Probe, Vec3>,
    pub world: Option<MockWorld>,
    pub left: MockDevice,
    pub right: MockDevice,
    /// Upcoming `device_and_world` calls that panic.
    pub device_panics: u32,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            generation: 0,
            markers: HashMap::new(),
            dead_markers: HashSet::new(),
            find_calls: Cell::new(0),
            top_scene: None,
            head: Pose::IDENTITY,
            player: None,
            player_moves: Vec::new(),
            partner: None,
            heads: HashMap::new(),
            session: None,
            events: HashMap::new(),
            edges: HashMap::new(),
            probes: HashMap::new(),
            world: None,
            left: MockDevice::new(Hand::Left),
            right: MockDevice::new(Hand::Right),
            device_panics: 0,
        }
    }

    /// Places a scene marker and bumps the scene generation.
    pub fn load_marker(&mut self, name: &str, handle: u64) {
        self.markers.insert(name.to_string(), MarkerHandle(handle));
        self.generation += 1;
    }

    /// Destroys a scene marker and bumps the scene generation.
    pub fn unload_marker(&mut self, name: &str) {
        if let Some(handle) = self.markers.remove(name) {
            self.dead_markers.insert(handle);
        }
        self.generation += 1;
    }

    pub fn push_event(&mut self, probe: Probe, event: VolumeEvent) {
        self.events.entry(probe).or_default().push(event);
    }

    pub fn device(&self, hand: Hand) -> &MockDevice {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }
}

impl GameHost for MockHost {
    fn scene_generation(&self) -> u64 {
        self.generation
    }

    fn find_marker(&self, name: &str) -> Option<MarkerHandle> {
        self.find_calls.set(self.find_calls.get() + 1);
        self.markers.get(name).copied()
    }

    fn is_marker_alive(&self, marker: MarkerHandle) -> bool {
        !self.dead_markers.contains(&marker)
    }

    fn top_scene_name(&self) -> Option<String> {
        self.top_scene.clone()
    }

    fn head_pose(&self) -> Pose {
        self.head
    }

    fn player(&self) -> Option<PlayerSnapshot> {
        self.player
    }

    fn set_player_pose(&mut self, pose: Pose) {
        self.player_moves.push(pose);
        if let Some(player) = self.player.as_mut() {
            player.pose = pose;
        }
    }

    fn talk_partner(&self) -> Option<Pose> {
        self.partner
    }

    fn character_head(&self, character: CharacterId) -> Option<Pose> {
        self.heads.get(&character).copied()
    }

    fn interaction_session(&self) -> Option<SessionId> {
        self.session
    }

    fn take_volume_events(&mut self, probe: Probe) -> Vec<VolumeEvent> {
        self.events.remove(&probe).unwrap_or_default()
    }

    fn controller_edges(&self, hand: Hand) -> ControllerEdges {
        self.edges.get(&hand).copied().unwrap_or_default()
    }

    fn probe_position(&self, probe: Probe) -> Vec3 {
        self.probes.get(&probe).copied().unwrap_or(Vec3::ZERO)
    }

    fn interaction_world(&mut self) -> Option<&mut dyn InteractionHost> {
        self.world.as_mut().map(|w| w as &mut dyn InteractionHost)
    }

    fn device_and_world(
        &mut self,
        hand: Hand,
    ) -> (&mut dyn ControllerDevice, Option<&mut dyn InteractionHost>) {
        if self.device_panics > 0 {
            self.device_panics -= 1;
            panic!("controller device unavailable");
        }
        let device: &mut dyn ControllerDevice = match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        };
        let world = self.world.as_mut().map(|w| w as &mut dyn InteractionHost);
        (device, world)
    }
}
