//! Projection configuration: view distance, near/far planes and the depth
//! sort scale.
//!
//! All inputs are clamped into range rather than rejected.

use crate::math::{fix16, Angle, Fix16};

/// Display width in pixels.
pub const SCREEN_WIDTH: i16 = 352;
/// Display height in pixels.
pub const SCREEN_HEIGHT: i16 = 224;

pub const SCREEN_CLIP_LEFT: i16 = -SCREEN_WIDTH / 2;
pub const SCREEN_CLIP_RIGHT: i16 = SCREEN_WIDTH / 2;
pub const SCREEN_CLIP_TOP: i16 = -SCREEN_HEIGHT / 2;
pub const SCREEN_CLIP_BOTTOM: i16 = SCREEN_HEIGHT / 2;

pub const MIN_FOV: Angle = Angle::from_degrees(20);
pub const MAX_FOV: Angle = Angle::from_degrees(120);

pub const NEAR_LEVEL_MIN: u32 = 1;
pub const NEAR_LEVEL_MAX: u32 = 8;

/// Upper bound of the far plane.
pub const FAR_MAX: Fix16 = fix16(2048);

/// Number of depth-sort buckets.
pub const SORT_DEPTH: usize = 512;

pub const DEFAULT_FOV: Angle = Angle::from_degrees(90);
pub const DEFAULT_NEAR_LEVEL: u32 = 7;
pub const DEFAULT_FAR: Fix16 = fix16(1024);

/// `0.5 * (SCREEN_WIDTH - 1)`: focal scale that puts projected points in
/// pixel units.
const SCREEN_SCALE: Fix16 = Fix16::from_bits(((SCREEN_WIDTH - 1) as i32) << 15);

const SORT_DEPTH_LAST: Fix16 = fix16((SORT_DEPTH - 1) as i16);

/// Frustum parameters read by every pass.
///
/// Setters are order dependent: `near` derives from the current view
/// distance and `far` is clamped against the current `near`. Changing the
/// field of view does not recompute either; re-apply the setters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Projection {
    view_distance: Fix16,
    near: Fix16,
    far: Fix16,
    sort_scale: Fix16,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection {
    /// Projection with a 90° field of view, near level 7 and far 1024.
    pub fn new() -> Self {
        let mut projection = Self {
            view_distance: Fix16::ZERO,
            near: Fix16::ZERO,
            far: Fix16::ZERO,
            sort_scale: Fix16::ZERO,
        };
        projection.set_field_of_view(DEFAULT_FOV);
        projection.set_near_level(DEFAULT_NEAR_LEVEL);
        projection.set_far(DEFAULT_FAR);
        projection
    }

    /// Derive the view distance from a horizontal field of view, clamped to
    /// 20°..=120°.
    pub fn set_field_of_view(&mut self, fov: Angle) {
        let fov = fov.clamp(MIN_FOV, MAX_FOV);
        let tan = fov.half().tan();

        self.view_distance = SCREEN_SCALE.saturating_mul(tan);

        log::trace!(
            "fov {}° -> view distance {}",
            fov.degrees(),
            self.view_distance
        );
    }

    /// Place the near plane at `view_distance >> (level + 1)`, with `level`
    /// clamped to 1..=8.
    pub fn set_near_level(&mut self, level: u32) {
        let level = level.clamp(NEAR_LEVEL_MIN, NEAR_LEVEL_MAX);

        self.near = self.view_distance >> (level + 1);

        log::trace!("near level {} -> near {}", level, self.near);
    }

    /// Set the far plane, clamped to `near..=2048`, and derive the depth
    /// sort scale from it.
    pub fn set_far(&mut self, far: Fix16) {
        self.far = if far < self.near {
            self.near
        } else if far > FAR_MAX {
            FAR_MAX
        } else {
            far
        };
        self.sort_scale = SORT_DEPTH_LAST.saturating_div(self.far);

        log::trace!("far {} -> sort scale {}", self.far, self.sort_scale);
    }

    pub fn view_distance(&self) -> Fix16 {
        self.view_distance
    }

    pub fn near(&self) -> Fix16 {
        self.near
    }

    pub fn far(&self) -> Fix16 {
        self.far
    }

    pub fn sort_scale(&self) -> Fix16 {
        self.sort_scale
    }
}
