//=========================================================================
// Pose Math
//=========================================================================
//
// Small helpers layered over `glam` for the conventions the host game
// uses: +Y up, +Z forward, Euler angles in degrees with yaw in [0, 360).
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{EulerRot, Quat, Vec3};

//=== Pose ================================================================

/// Position plus orientation in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    /// Origin, no rotation. This is the viewpoint's rest pose.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Maps a point from this pose's local space into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Local +Z expressed in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Yaw of this pose in degrees, [0, 360).
    pub fn yaw(&self) -> f32 {
        yaw_degrees(self.rotation)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

//=== Angle Helpers =======================================================

/// Euler Y component of `rotation` in degrees, normalized to [0, 360).
pub fn yaw_degrees(rotation: Quat) -> f32 {
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    yaw.to_degrees().rem_euclid(360.0)
}

/// Shortest signed difference from `current` to `target`, in degrees.
///
/// The result lies in (-180, 180]. Mirrors the host engine's own
/// `DeltaAngle`, including its sign convention.
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Drops pitch and roll, keeping only the yaw component.
pub fn flatten_yaw(rotation: Quat) -> Quat {
    Quat::from_rotation_y(yaw_degrees(rotation).to_radians())
}

/// Rotation about +Y by `degrees`.
pub fn yaw_rotation(degrees: f32) -> Quat {
    Quat::from_rotation_y(degrees.to_radians())
}

/// Projects `v` onto the XZ plane and normalizes it.
///
/// Returns `Vec3::Z` when the projection is degenerate.
pub fn flat_direction(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).try_normalize().unwrap_or(Vec3::Z)
}

//=========================================================================
// Unit Tests
//=========================================================================
