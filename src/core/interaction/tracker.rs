//=========================================================================
// Collider Priority Tracker
//=========================================================================
//
// Tracks which interaction volumes a probe currently overlaps and picks
// the one it is addressing.
//
// Architecture:
//   register_known_colliders() → known: VolumeId → (owner, candidates)
//   Entered/Exited events      → active: VolumeId → (owner, kind)
//   current_collider_kind()    → max class, then nearest volume
//
// One tracker lives for exactly one interaction session. The kind of an
// active entry is resolved once at enter time and is not re-validated
// by later queries.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{BTreeMap, HashMap};

use glam::Vec3;
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::kind::{candidate_kinds, InteractionKind, InteractionTarget};
use crate::core::host::{InteractionHost, VolumeId};

//=== Registration ========================================================

#[derive(Debug, Clone, Copy)]
struct Registration {
    owner: usize,
    candidates: &'static [InteractionKind],
}

//=== ColliderPriorityTracker =============================================

/// Active-intersection bookkeeping for one probe.
#[derive(Debug, Default)]
pub struct ColliderPriorityTracker {
    known: HashMap<VolumeId, Registration>,
    /// Ordered so ties on distance resolve deterministically.
    active: BTreeMap<VolumeId, InteractionTarget>,
    registered: bool,
}

impl ColliderPriorityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Scans every owner's hierarchy for tagged interaction volumes.
    ///
    /// Runs once per tracker; later calls are ignored. Returns the number
    /// of volumes registered by this call.
    pub fn register_known_colliders(&mut self, world: &dyn InteractionHost) -> usize {
        if self.registered {
            warn!("Interaction volumes already registered for this session, ignoring rescan");
            return 0;
        }
        self.registered = true;

        for owner in 0..world.owner_count() {
            for volume in world.tagged_volumes(owner) {
                if let Some(candidates) = candidate_kinds(&volume.tag) {
                    self.known.insert(volume.id, Registration { owner, candidates });
                }
            }
        }

        debug!("Registered {} interaction volumes", self.known.len());
        self.known.len()
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn knows(&self, volume: VolumeId) -> bool {
        self.known.contains_key(&volume)
    }

    //--- Event Handling ---------------------------------------------------

    /// Starts tracking `volume` if it is an interaction volume whose gate
    /// currently passes for at least one candidate kind.
    ///
    /// The first passing candidate in declaration order wins. Returns
    /// whether the active set changed.
    pub fn add_if_relevant(&mut self, volume: VolumeId, world: &dyn InteractionHost) -> bool {
        let Some(registration) = self.known.get(&volume) else {
            return false;
        };

        let owner = registration.owner;
        let kind = registration
            .candidates
            .iter()
            .copied()
            .find(|kind| world.is_kind_allowed(owner, *kind));

        match kind {
            Some(kind) => {
                self.active.insert(volume, InteractionTarget::new(owner, kind));
                true
            }
            None => false,
        }
    }

    /// Stops tracking `volume`. Returns whether it was tracked.
    pub fn remove_if_relevant(&mut self, volume: VolumeId) -> bool {
        self.active.remove(&volume).is_some()
    }

    //--- Queries ----------------------------------------------------------

    /// The target the probe at `reference` is addressing.
    ///
    /// Entries of the highest priority class win regardless of distance;
    /// within that class the volume nearest to `reference` wins. Returns
    /// [`InteractionTarget::NONE`] when nothing is active.
    pub fn current_collider_kind(
        &self,
        world: &dyn InteractionHost,
        reference: Vec3,
    ) -> InteractionTarget {
        let Some(top_class) = self.active.values().map(|t| t.kind.priority_class()).max() else {
            return InteractionTarget::NONE;
        };

        self.active
            .iter()
            .filter(|(_, target)| target.kind.priority_class() == top_class)
            .map(|(volume, target)| {
                // A destroyed volume still counts, it just never wins on distance.
                let distance = world
                    .volume_position(*volume)
                    .map_or(f32::INFINITY, |p| p.distance_squared(reference));
                (distance, *target)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map_or(InteractionTarget::NONE, |(_, target)| target)
    }

    /// Whether any volume is active. Constant time.
    pub fn is_intersecting(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Forgets every active intersection; registrations stay.
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::host::mock::MockWorld;
    use InteractionKind::*;

    fn world() -> MockWorld {
        let mut world = MockWorld::new(2);
        world.add_volume(0, 1, "H/Aibu/Hit/mouth", Vec3::new(0.0, 0.0, 1.0));
        world.add_volume(0, 2, "H/Aibu/Hit/Reaction/head", Vec3::new(0.0, 0.0, 0.01));
        world.add_volume(0, 3, "H/Aibu/Hit/muneL", Vec3::new(0.5, 0.0, 0.0));
        world.add_volume(1, 4, "H/Aibu/Hit/muneR", Vec3::new(0.1, 0.0, 0.0));
        world.add_volume(1, 5, "Untagged", Vec3::ZERO);
        world.allow_all();
        world
    }

    fn tracker(world: &MockWorld) -> ColliderPriorityTracker {
        let mut tracker = ColliderPriorityTracker::new();
        tracker.register_known_colliders(world);
        tracker
    }

    #[test]
    fn registration_skips_untagged_volumes() {
        let world = world();
        let mut tracker = ColliderPriorityTracker::new();
        assert_eq!(tracker.register_known_colliders(&world), 4);
        assert!(tracker.knows(VolumeId(4)));
        assert!(!tracker.knows(VolumeId(5)));
    }

    #[test]
    fn registration_runs_once() {
        let mut world = world();
        let mut tracker = tracker(&world);
        world.add_volume(0, 9, "H/Aibu/Hit/anal", Vec3::ZERO);
        assert_eq!(tracker.register_known_colliders(&world), 0);
        assert!(!tracker.knows(VolumeId(9)));
    }

    #[test]
    fn empty_tracker_reports_none() {
        let world = world();
        let tracker = tracker(&world);
        assert_eq!(tracker.current_collider_kind(&world, Vec3::ZERO), InteractionTarget::NONE);
        assert!(!tracker.is_intersecting());
    }

    #[test]
    fn class_beats_distance() {
        let world = world();
        let mut tracker = tracker(&world);
        assert!(tracker.add_if_relevant(VolumeId(1), &world));
        assert!(tracker.add_if_relevant(VolumeId(2), &world));

        let target = tracker.current_collider_kind(&world, Vec3::ZERO);
        assert_eq!(target, InteractionTarget::new(0, Mouth));
    }

    #[test]
    fn nearest_wins_within_class() {
        let world = world();
        let mut tracker = tracker(&world);
        tracker.add_if_relevant(VolumeId(3), &world);
        tracker.add_if_relevant(VolumeId(4), &world);

        let target = tracker.current_collider_kind(&world, Vec3::ZERO);
        assert_eq!(target, InteractionTarget::new(1, ChestRight));
    }

    #[test]
    fn first_passing_candidate_is_recorded() {
        let mut world = world();
        world.deny(0, Mouth);
        let mut tracker = tracker(&world);

        assert!(tracker.add_if_relevant(VolumeId(1), &world));
        let target = tracker.current_collider_kind(&world, Vec3::ZERO);
        assert_eq!(target.kind, ReactHead);
    }

    #[test]
    fn gated_volume_is_not_added() {
        let mut world = world();
        world.deny(0, Mouth);
        world.deny(0, ReactHead);
        let mut tracker = tracker(&world);

        assert!(!tracker.add_if_relevant(VolumeId(1), &world));
        assert!(!tracker.is_intersecting());
    }

    #[test]
    fn unregistered_volume_is_ignored() {
        let world = world();
        let mut tracker = tracker(&world);
        assert!(!tracker.add_if_relevant(VolumeId(5), &world));
        assert!(!tracker.add_if_relevant(VolumeId(77), &world));
        assert!(!tracker.remove_if_relevant(VolumeId(77)));
    }

    #[test]
    fn add_then_remove_restores_state() {
        let world = world();
        let mut tracker = tracker(&world);
        tracker.add_if_relevant(VolumeId(3), &world);
        let before = (tracker.is_intersecting(), tracker.active_len());

        assert!(tracker.add_if_relevant(VolumeId(4), &world));
        assert!(tracker.remove_if_relevant(VolumeId(4)));

        assert_eq!((tracker.is_intersecting(), tracker.active_len()), before);
    }

    #[test]
    fn kind_is_not_revalidated_after_enter() {
        let mut world = world();
        let mut tracker = tracker(&world);
        tracker.add_if_relevant(VolumeId(1), &world);

        world.deny(0, Mouth);
        let target = tracker.current_collider_kind(&world, Vec3::ZERO);
        assert_eq!(target.kind, Mouth);
    }

    #[test]
    fn destroyed_volume_loses_on_distance() {
        let mut world = world();
        let mut tracker = tracker(&world);
        tracker.add_if_relevant(VolumeId(3), &world);
        tracker.add_if_relevant(VolumeId(4), &world);

        world.destroy_volume(4);
        let target = tracker.current_collider_kind(&world, Vec3::ZERO);
        assert_eq!(target, InteractionTarget::new(0, ChestLeft));
    }
}
