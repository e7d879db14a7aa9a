//! Camera placement and the inverted view transform.
//!
//! View space has +X right, +Y down and +Z into the screen, matching the
//! screen-space orientation of the display processor.

use glam::Vec3;

use crate::math::{FixVec3, Mat43};

/// Supplies the inverted camera transform once per pass.
pub trait ViewSource {
    /// Transform from world space into view space.
    fn view_inverse(&self) -> Mat43;
}

/// Camera described by its world-space placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Camera {
    world: Mat43,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            world: Mat43::IDENTITY,
        }
    }
}

impl Camera {
    /// Camera with an explicit world transform (orthonormal basis + position).
    pub fn from_world(world: Mat43) -> Self {
        Self { world }
    }

    /// Camera at `eye` looking at `target`. `up` is the world-space up
    /// direction; with +Y down that is usually `Vec3::NEG_Y`.
    ///
    /// Falls back to the identity orientation when `eye == target` or `up`
    /// is parallel to the view direction.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - eye).normalize_or_zero();
        let right = (-up).cross(forward).normalize_or_zero();
        if forward == Vec3::ZERO || right == Vec3::ZERO {
            return Self::from_world(Mat43::from_translation(to_fix(eye)));
        }
        let down = forward.cross(right);

        Self::from_world(Mat43::from_basis(
            to_fix(right),
            to_fix(down),
            to_fix(forward),
            to_fix(eye),
        ))
    }

    pub fn world(&self) -> &Mat43 {
        &self.world
    }
}

impl ViewSource for Camera {
    fn view_inverse(&self) -> Mat43 {
        self.world.inverse_rigid()
    }
}

impl ViewSource for Mat43 {
    fn view_inverse(&self) -> Mat43 {
        *self
    }
}

fn to_fix(v: Vec3) -> FixVec3 {
    FixVec3::from_f32(v.x, v.y, v.z)
}
