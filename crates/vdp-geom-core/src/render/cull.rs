//! Backface test and screen-bound clip flags.

use core::ops::{BitAnd, BitOr};

use super::polygon::PolygonState;
use crate::config::{SCREEN_CLIP_BOTTOM, SCREEN_CLIP_LEFT, SCREEN_CLIP_RIGHT, SCREEN_CLIP_TOP};
use crate::math::ScreenPoint;

/// 4-bit mask of the screen edges a vertex lies beyond.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClipFlags(u8);

impl ClipFlags {
    pub const NONE: Self = Self(0);
    pub const LEFT: Self = Self(1 << 0);
    pub const RIGHT: Self = Self(1 << 1);
    pub const TOP: Self = Self(1 << 2);
    pub const BOTTOM: Self = Self(1 << 3);
    pub const LR: Self = Self(Self::LEFT.0 | Self::RIGHT.0);
    pub const TB: Self = Self(Self::TOP.0 | Self::BOTTOM.0);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Mask for a single projected vertex.
    pub fn for_point(p: ScreenPoint) -> Self {
        let mut flags = Self::NONE;
        if p.x < SCREEN_CLIP_LEFT {
            flags.0 |= Self::LEFT.0;
        }
        if p.x > SCREEN_CLIP_RIGHT {
            flags.0 |= Self::RIGHT.0;
        }
        // -Y is up on screen, so the top edge is the negative bound.
        if p.y < SCREEN_CLIP_TOP {
            flags.0 |= Self::TOP.0;
        }
        if p.y > SCREEN_CLIP_BOTTOM {
            flags.0 |= Self::BOTTOM.0;
        }
        flags
    }
}

impl BitAnd for ClipFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for ClipFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Fill in per-vertex clip flags and their AND / OR aggregates.
///
/// A non-empty AND means every corner lies past the same edge. An empty OR
/// means the polygon is entirely on screen.
pub fn compute_clip_flags(polygon: &mut PolygonState) {
    for (flags, &point) in polygon.clip_flags.iter_mut().zip(&polygon.screen_points) {
        *flags = ClipFlags::for_point(point);
    }

    let [c0, c1, c2, c3] = polygon.clip_flags;
    polygon.and_flags = c0 & c1 & c2 & c3;
    polygon.or_flags = c0 | c1 | c2 | c3;
}

/// Sign test of the screen-space cross product `(p2 - p0) x (p1 - p0)`.
/// Returns true when the polygon faces away and should be culled.
pub fn is_backfacing(points: &[ScreenPoint; 4]) -> bool {
    let (ax, ay) = points[2].delta(points[0]);
    let (bx, by) = points[1].delta(points[0]);

    let z = ax as i64 * by as i64 - ay as i64 * bx as i64;

    z < 0
}
