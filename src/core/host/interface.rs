//=========================================================================
// Host Interface
//=========================================================================
//
// Contract between the core and the host game it is embedded in.
//
// The core never reaches into host internals. Everything it needs is
// pulled through these traits and snapshots, and everything it does to
// the host goes back through them.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::interaction::InteractionKind;
use crate::core::math::Pose;

//=== Identities ==========================================================

/// Host handle for a scene marker object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// Identity of one trigger volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VolumeId(pub u64);

/// Identity of one interaction session (one run of the interaction
/// scene's controller object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

/// Identity of a game character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacterId(pub u32);

/// A tracked motion controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const ALL: [Hand; 2] = [Hand::Left, Hand::Right];
}

/// Something carrying trigger volumes that can touch interaction volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Probe {
    Hand(Hand),
    /// Volumes attached in front of the headset.
    Mouth,
}

//=== Events & Samples ====================================================

/// Trigger overlap change for one probe, in host delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeEvent {
    Entered(VolumeId),
    Exited(VolumeId),
}

/// Per-frame button edges of one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerEdges {
    pub trigger_pressed: bool,
    pub trigger_released: bool,
    pub menu_released: bool,
}

/// An interaction volume found while scanning a character hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedVolume {
    pub id: VolumeId,
    pub tag: String,
}

/// The roaming player's state this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub pose: Pose,
    pub head: Option<Pose>,
    pub walking: bool,
    /// Identity of the loaded map; changes on map transitions.
    pub map_id: Option<u64>,
}

//=== FocusLock ===========================================================

/// Exclusivity token: while held, the device routes its input to us.
///
/// Deliberately neither `Clone` nor `Copy`; the only way to give it up is
/// [`ControllerDevice::release_focus`].
#[derive(Debug, PartialEq, Eq)]
pub struct FocusLock {
    hand: Hand,
    token: u64,
}

impl FocusLock {
    /// Minted by the host when it grants focus.
    pub fn new(hand: Hand, token: u64) -> Self {
        Self { hand, token }
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    pub fn token(&self) -> u64 {
        self.token
    }
}

//=== Traits ==============================================================

/// Relocates the stereoscopic viewpoint.
pub trait ViewpointRig {
    /// Places the headset origin so the viewer ends up at the given pose.
    ///
    /// `rotation` is already yaw-only.
    fn move_to_position(&mut self, position: Vec3, rotation: Quat, keep_height: bool);
}

/// Host scene-wide fade.
pub trait SceneFade {
    /// `true` once the fade is fully opaque or finished.
    fn is_complete(&self) -> bool;
}

/// Controller capabilities used by the interaction lock.
pub trait ControllerDevice {
    /// Tries to take exclusive ownership of the controller's input.
    fn try_acquire_focus(&mut self) -> Option<FocusLock>;

    fn release_focus(&mut self, lock: FocusLock);

    fn rumble(&mut self, micros: u16);
}

/// Live state of the interaction scene's characters.
pub trait InteractionHost {
    /// Number of characters that can own interaction volumes.
    fn owner_count(&self) -> usize;

    /// Every tagged trigger volume in the hierarchy of `owner`.
    fn tagged_volumes(&self, owner: usize) -> Vec<TaggedVolume>;

    /// Current world position of a volume; `None` if it was destroyed.
    fn volume_position(&self, volume: VolumeId) -> Option<Vec3>;

    /// Interaction precondition gate for `kind` on `owner`.
    fn is_kind_allowed(&self, owner: usize, kind: InteractionKind) -> bool;

    /// Kind that subsequent clicks on `owner` will address.
    fn selected_kind(&self, owner: usize) -> InteractionKind;

    fn set_selected_kind(&mut self, owner: usize, kind: InteractionKind);

    /// Whether a kiss is currently playing.
    fn is_kissing(&self) -> bool;

    /// Detaches any mouth-held item before a kiss.
    fn stop_licking(&mut self);
}

/// Per-frame view of the host game.
pub trait GameHost {
    //--- Scene Graph -------------------------------------------------------

    /// Bumps whenever the host loads or unloads a scene.
    fn scene_generation(&self) -> u64;

    /// Full-hierarchy search for a marker object by name.
    fn find_marker(&self, name: &str) -> Option<MarkerHandle>;

    fn is_marker_alive(&self, marker: MarkerHandle) -> bool;

    /// Name of the host's topmost loaded scene.
    fn top_scene_name(&self) -> Option<String>;

    //--- Characters & Viewpoint --------------------------------------------

    /// Headset pose in world space.
    fn head_pose(&self) -> Pose;

    fn player(&self) -> Option<PlayerSnapshot>;

    /// Relocates the player character; only called while roaming.
    fn set_player_pose(&mut self, pose: Pose);

    /// Conversation partner during talk scenes.
    fn talk_partner(&self) -> Option<Pose>;

    /// Current head pose of a character.
    fn character_head(&self, character: CharacterId) -> Option<Pose>;

    //--- Interaction --------------------------------------------------------

    /// Active interaction session, if the interaction controller runs.
    fn interaction_session(&self) -> Option<SessionId>;

    /// Drains overlap events recorded for `probe` since the last call.
    fn take_volume_events(&mut self, probe: Probe) -> Vec<VolumeEvent>;

    fn controller_edges(&self, hand: Hand) -> ControllerEdges;

    /// World position of a probe's reference point.
    fn probe_position(&self, probe: Probe) -> Vec3;

    fn interaction_world(&mut self) -> Option<&mut dyn InteractionHost>;

    /// One controller, together with the interaction world if it is loaded.
    fn device_and_world(
        &mut self,
        hand: Hand,
    ) -> (&mut dyn ControllerDevice, Option<&mut dyn InteractionHost>);
}
