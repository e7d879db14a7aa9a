//! Depth metric: reduces four corner depths to one sort key.

use super::mesh::SortType;
use crate::math::Fix16;

pub fn depth_metric(sort: SortType, z: &[Fix16; 4]) -> Fix16 {
    match sort {
        SortType::Center => depth_center(z),
        SortType::Min => z[0].min(z[1]).min(z[2].min(z[3])),
        SortType::Max => z[0].max(z[1]).max(z[2].max(z[3])),
    }
}

/// Midpoint of the A-C diagonal. Corners B and D are ignored.
fn depth_center(z: &[Fix16; 4]) -> Fix16 {
    let sum = z[0].to_bits() as i64 + z[2].to_bits() as i64;
    Fix16::from_bits((sum >> 1) as i32)
}
