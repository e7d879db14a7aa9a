//! Vertex re-orientation for polygons that straddle a screen edge.
//!
//! Hardware pre-clipping needs corner A (slot 0) on screen. Rather than
//! recomputing geometry the corners are permuted and the matching flip bit
//! is toggled so textures still map the same way.

use super::mesh::{Control, DrawMode};
use super::polygon::PolygonState;
use crate::render::cull::ClipFlags;

/// Disable pre-clipping for fully on-screen polygons, otherwise orient them.
pub fn prepare_clipping(polygon: &mut PolygonState) {
    if polygon.or_flags.is_empty() {
        polygon.draw_mode.set(DrawMode::PRE_CLIPPING_DISABLE, true);
    } else {
        orient(polygon);
    }
}

/// Permute corners so that corner A moves off the edge it was found beyond.
///
/// The clip flags are not permuted along with the corners, so a second call
/// on the same state swaps and toggles again.
pub fn orient(polygon: &mut PolygonState) {
    let a = polygon.clip_flags[0];

    if a.intersects(ClipFlags::LR) {
        // B-|-A
        // | | |   swap A/B and D/C
        // C-|-D
        //   | outside
        polygon.swap_corners(0, 1);
        polygon.swap_corners(3, 2);
        polygon.control.toggle(Control::FLIP_H);
    }

    if a.intersects(ClipFlags::TB) {
        //   B---A   outside
        // --|---|-- swap A/D and B/C
        //   C---D
        polygon.swap_corners(0, 3);
        polygon.swap_corners(1, 2);
        polygon.control.toggle(Control::FLIP_V);
    }
}
