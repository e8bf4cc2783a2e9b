//=========================================================================
// Scenario Director
//=========================================================================
//
// Places the viewpoint after each batch of scripted-dialogue (ADV)
// commands, choosing one of three strategies:
//
//   1. Impersonate  - exactly one eligible male: look through his eyes,
//                     one frame later once the host has posed him
//   2. Approach     - a character is speaking in view: stand at
//                     conversational distance in front of her
//   3. Follow       - otherwise take the scenario camera target as is
//
// Every strategy goes through the placement heuristics; a fade-out in
// progress always lets the move through.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::placement::CameraPlacementEngine;
use crate::core::host::{CharacterId, GameHost};
use crate::core::math::{yaw_rotation, Pose};
use crate::core::schedule::{Deferred, Resume};
use crate::core::settings::Settings;

//=== Constants ===========================================================

/// Eye point relative to the impersonated head.
const IMPERSONATION_OFFSET: Vec3 = Vec3::new(0.0, 0.15, 0.15);
const CAFE_DISTANCE: f32 = 0.95;
const APPROACH_DISTANCE: f32 = 0.7;
/// Eye height above the character's feet in interaction scenes.
const INTERACTION_EYE_HEIGHT: f32 = 1.3;

//=== Snapshots ===========================================================

/// One layer of the scenario fade.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FadeLayer {
    pub initial_alpha: f32,
    pub finished: bool,
}

impl FadeLayer {
    pub fn is_fading_out(&self) -> bool {
        self.initial_alpha > 0.5 && !self.finished
    }
}

/// Scripted dialogue state after a batch of commands ran.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScenarioSnapshot {
    /// The scenario's own fade has ended.
    pub fade_complete: bool,
    pub front_fade: FadeLayer,
    pub back_fade: FadeLayer,
    /// Where the flat-screen camera would go.
    pub camera_target: Pose,
    /// Root pose of the character currently speaking.
    pub current_character: Option<Pose>,
    pub background_visible: bool,
    pub in_cafe: bool,
    /// The host's top scene is the interaction scene.
    pub interaction_scene: bool,
}

impl ScenarioSnapshot {
    pub fn is_fading_out(&self) -> bool {
        self.front_fade.is_fading_out() || self.back_fade.is_fading_out()
    }
}

/// A loaded character, as far as impersonation cares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterSnapshot {
    pub id: CharacterId,
    pub is_male: bool,
    pub active: bool,
    pub top_active: bool,
    pub visible: bool,
    pub head: Option<Pose>,
}

impl CharacterSnapshot {
    fn is_impersonation_candidate(&self) -> bool {
        self.is_male && self.active && self.top_active && self.visible
    }
}

//=== ScenarioMove ========================================================

/// Strategy picked by [`ScenarioDirector::handle_progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioMove {
    /// Deferred to the next frame.
    Impersonate(CharacterId),
    /// `true` if the viewpoint moved.
    Approach(bool),
    Follow(bool),
}

#[derive(Debug, Clone, Copy)]
struct Impersonation {
    character: CharacterId,
    fading_out: bool,
}

//=== ScenarioDirector ====================================================

#[derive(Debug)]
pub struct ScenarioDirector {
    impersonation: Deferred<(), Impersonation>,
}

impl ScenarioDirector {
    pub fn new() -> Self {
        Self {
            impersonation: Deferred::new("impersonation"),
        }
    }

    /// Reacts to one batch of scenario commands.
    pub fn handle_progress(
        &mut self,
        scenario: &ScenarioSnapshot,
        roster: &[CharacterSnapshot],
        camera: &mut CameraPlacementEngine,
        settings: &Settings,
        frame: u64,
    ) -> ScenarioMove {
        let fading_out = scenario.is_fading_out();
        debug!("Scenario progress (fading out: {})", fading_out);

        if settings.first_person_adv {
            if let Some(male) = find_male_to_impersonate(roster) {
                debug!("Maybe impersonating {:?}", male.id);
                let pending = Impersonation {
                    character: male.id,
                    fading_out,
                };
                self.impersonation.schedule(Resume::next_frame(frame), pending);
                return ScenarioMove::Impersonate(male.id);
            }
        }

        if let Some(character) = approach_target(scenario) {
            let distance = if scenario.in_cafe {
                CAFE_DISTANCE
            } else {
                APPROACH_DISTANCE
            };

            let (height, rotation) = if scenario.interaction_scene {
                (
                    character.position.y + INTERACTION_EYE_HEIGHT,
                    character.rotation * yaw_rotation(180.0),
                )
            } else {
                (scenario.camera_target.position.y, scenario.camera_target.rotation)
            };

            let camera_xz = character.position - rotation * (distance * Vec3::Z);
            let moved = camera.move_with_heuristics(
                Vec3::new(camera_xz.x, height, camera_xz.z),
                rotation,
                false,
                fading_out,
            );
            return ScenarioMove::Approach(moved);
        }

        let target = scenario.camera_target;
        ScenarioMove::Follow(camera.move_with_heuristics(
            target.position,
            target.rotation,
            false,
            fading_out,
        ))
    }

    /// Runs a due impersonation. Call once per frame.
    pub fn poll(&mut self, frame: u64, host: &dyn GameHost, camera: &mut CameraPlacementEngine) {
        let Some(pending) = self.impersonation.poll(frame, |_| true) else {
            return;
        };

        match host.character_head(pending.character) {
            Some(head) => {
                camera.move_with_heuristics(
                    head.transform_point(IMPERSONATION_OFFSET),
                    head.rotation,
                    false,
                    pending.fading_out,
                );
            }
            None => warn!("Head of {:?} vanished before impersonation", pending.character),
        }
    }

    pub fn has_pending(&self) -> bool {
        self.impersonation.is_pending()
    }

    /// Drops a pending impersonation; used on scene teardown.
    pub fn cancel(&mut self) {
        if self.impersonation.cancel().is_some() {
            debug!("Pending impersonation cancelled");
        }
    }
}

impl Default for ScenarioDirector {
    fn default() -> Self {
        Self::new()
    }
}

fn find_male_to_impersonate(roster: &[CharacterSnapshot]) -> Option<&CharacterSnapshot> {
    let mut candidates = roster.iter().filter(|c| c.is_impersonation_candidate());
    match (candidates.next(), candidates.next()) {
        (Some(male), None) if male.head.is_some() => Some(male),
        _ => None,
    }
}

fn approach_target(scenario: &ScenarioSnapshot) -> Option<Pose> {
    if scenario.interaction_scene || scenario.background_visible {
        scenario.current_character
    } else {
        None
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
