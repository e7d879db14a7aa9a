//! Per-polygon working state.

use super::cull::ClipFlags;
use super::mesh::{Control, DrawMode, Polygon};
use crate::math::{Fix16, ScreenPoint};

/// Scratch state for the polygon currently being processed.
///
/// Overwritten for every polygon; each pipeline step receives it by `&mut`.
/// Holds mutable copies of the indices and of the control/draw-mode words so
/// orientation and pre-clip changes never touch the mesh's attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PolygonState {
    pub screen_points: [ScreenPoint; 4],
    pub z_values: [Fix16; 4],
    pub clip_flags: [ClipFlags; 4],
    pub and_flags: ClipFlags,
    pub or_flags: ClipFlags,
    pub indices: [u16; 4],
    pub control: Control,
    pub draw_mode: DrawMode,
    pub shading_slot: u16,
}

impl PolygonState {
    /// Gather the polygon's projected corners.
    pub fn load_screen_points(&mut self, polygon: &Polygon, screen_points: &[ScreenPoint]) {
        for (dst, &index) in self.screen_points.iter_mut().zip(&polygon.indices) {
            *dst = screen_points[index as usize];
        }
    }

    /// Gather the polygon's unclamped view-space depths.
    pub fn load_z_values(&mut self, polygon: &Polygon, z_values: &[Fix16]) {
        for (dst, &index) in self.z_values.iter_mut().zip(&polygon.indices) {
            *dst = z_values[index as usize];
        }
    }

    pub fn swap_corners(&mut self, i: usize, j: usize) {
        self.indices.swap(i, j);
        self.screen_points.swap(i, j);
    }
}
