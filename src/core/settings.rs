//=========================================================================
// Settings
//=========================================================================
//
// User-tunable behavior switches read by the scene handlers, the camera
// heuristics and the interaction controllers.
//
// Settings are plain data. Loading and saving them is the host's concern;
// the builder only validates ranges.
//
//=========================================================================

//=== Settings ============================================================

/// Runtime settings consumed by the core.
///
/// # Default Values
///
/// | Field                      | Default |
/// |----------------------------|---------|
/// | `automatic_touching`       | false   |
/// | `automatic_kissing`        | true    |
/// | `first_person_adv`         | true    |
/// | `rotation_angle`           | 45.0    |
/// | `teleport_with_protagonist`| true    |
/// | `using_head_pos`           | false   |
/// | `standing_camera_height`   | 1.5     |
/// | `crouching_camera_height`  | 0.7     |
/// | `crouch_by_hmd_pos`        | true    |
/// | `crouch_threshold`         | 0.9     |
/// | `stand_up_threshold`       | 1.0     |
/// | `talk_distance`            | 0.65    |
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Touching a reaction zone with a controller triggers it without a click.
    pub automatic_touching: bool,

    /// Moving the headset onto a mouth zone starts a kiss.
    pub automatic_kissing: bool,

    /// Prefer viewing event scenes through the protagonist's eyes.
    pub first_person_adv: bool,

    /// Snap-turn angle in degrees.
    pub rotation_angle: f32,

    /// Teleporting also moves the protagonist.
    pub teleport_with_protagonist: bool,

    /// Place the roaming camera exactly at the protagonist's head.
    pub using_head_pos: bool,

    /// Roaming camera height above the player's feet while standing.
    pub standing_camera_height: f32,

    /// Roaming camera height above the player's feet while crouching.
    pub crouching_camera_height: f32,

    /// Crouch when the headset drops below `crouch_threshold`.
    pub crouch_by_hmd_pos: bool,

    pub crouch_threshold: f32,
    pub stand_up_threshold: f32,

    /// Distance kept from a conversation partner in talk scenes.
    pub talk_distance: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            automatic_touching: false,
            automatic_kissing: true,
            first_person_adv: true,
            rotation_angle: 45.0,
            teleport_with_protagonist: true,
            using_head_pos: false,
            standing_camera_height: 1.5,
            crouching_camera_height: 0.7,
            crouch_by_hmd_pos: true,
            crouch_threshold: 0.9,
            stand_up_threshold: 1.0,
            talk_distance: 0.65,
        }
    }
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Camera height for the current stance when not using the head position.
    pub fn camera_height(&self, standing: bool) -> f32 {
        if standing {
            self.standing_camera_height
        } else {
            self.crouching_camera_height
        }
    }
}

//=== SettingsBuilder =====================================================

/// Fluent, range-checked construction of [`Settings`].
///
/// ```
/// use vr_scene_sync::core::Settings;
///
/// let settings = Settings::builder()
///     .with_automatic_touching(true)
///     .with_rotation_angle(30.0)
///     .build();
/// assert!(settings.automatic_touching);
/// ```
#[derive(Debug, Clone)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
        }
    }

    pub fn with_automatic_touching(mut self, enabled: bool) -> Self {
        self.settings.automatic_touching = enabled;
        self
    }

    pub fn with_automatic_kissing(mut self, enabled: bool) -> Self {
        self.settings.automatic_kissing = enabled;
        self
    }

    pub fn with_first_person_adv(mut self, enabled: bool) -> Self {
        self.settings.first_person_adv = enabled;
        self
    }

    /// # Panics
    ///
    /// Panics unless `0.0 <= degrees <= 180.0`.
    pub fn with_rotation_angle(mut self, degrees: f32) -> Self {
        assert!(
            (0.0..=180.0).contains(&degrees),
            "Rotation angle must be within 0..=180, got {}",
            degrees
        );
        self.settings.rotation_angle = degrees;
        self
    }

    pub fn with_teleport_with_protagonist(mut self, enabled: bool) -> Self {
        self.settings.teleport_with_protagonist = enabled;
        self
    }

    pub fn with_using_head_pos(mut self, enabled: bool) -> Self {
        self.settings.using_head_pos = enabled;
        self
    }

    /// # Panics
    ///
    /// Panics unless both heights are within 0.2..=3.0.
    pub fn with_camera_heights(mut self, standing: f32, crouching: f32) -> Self {
        for height in [standing, crouching] {
            assert!(
                (0.2..=3.0).contains(&height),
                "Camera height must be within 0.2..=3.0, got {}",
                height
            );
        }
        self.settings.standing_camera_height = standing;
        self.settings.crouching_camera_height = crouching;
        self
    }

    pub fn with_crouch_by_hmd_pos(mut self, enabled: bool) -> Self {
        self.settings.crouch_by_hmd_pos = enabled;
        self
    }

    /// # Panics
    ///
    /// Panics unless both thresholds are within 0.05..=3.0.
    pub fn with_crouch_thresholds(mut self, crouch: f32, stand_up: f32) -> Self {
        for threshold in [crouch, stand_up] {
            assert!(
                (0.05..=3.0).contains(&threshold),
                "Crouch threshold must be within 0.05..=3.0, got {}",
                threshold
            );
        }
        self.settings.crouch_threshold = crouch;
        self.settings.stand_up_threshold = stand_up;
        self
    }

    /// # Panics
    ///
    /// Panics if `distance <= 0.0`.
    pub fn with_talk_distance(mut self, distance: f32) -> Self {
        assert!(distance > 0.0, "Talk distance must be positive, got {}", distance);
        self.settings.talk_distance = distance;
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}

impl Default for SettingsBuilder {
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

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert!(!s.automatic_touching);
        assert!(s.automatic_kissing);
        assert!(s.first_person_adv);
        assert_eq!(s.rotation_angle, 45.0);
        assert_eq!(s.crouch_threshold, 0.9);
        assert_eq!(s.stand_up_threshold, 1.0);
    }

    #[test]
    fn camera_height_follows_stance() {
        let s = Settings::default();
        assert_eq!(s.camera_height(true), 1.5);
        assert_eq!(s.camera_height(false), 0.7);
    }

    #[test]
    fn builder_chains() {
        let s = Settings::builder()
            .with_automatic_touching(true)
            .with_camera_heights(1.6, 0.8)
            .with_talk_distance(0.8)
            .build();
        assert!(s.automatic_touching);
        assert_eq!(s.standing_camera_height, 1.6);
        assert_eq!(s.talk_distance, 0.8);
    }

    #[test]
    #[should_panic(expected = "Rotation angle must be within")]
    fn builder_rejects_wide_rotation() {
        Settings::builder().with_rotation_angle(270.0);
    }

    #[test]
    #[should_panic(expected = "Crouch threshold must be within")]
    fn builder_rejects_tiny_threshold() {
        Settings::builder().with_crouch_thresholds(0.01, 1.0);
    }
}
