//! Vertex transform: view space, near clamp and perspective divide.

use vdp_geom_hal::DivisionUnit;

use crate::config::Projection;
use crate::math::{fix16_int32_mul, saturate_i16, Fix16, FixVec3, Mat43, ScreenPoint};

/// Project `points` through `view` into `screen_points`, writing each
/// point's unclamped view-space depth to `z_values`.
///
/// Only the divide uses the near-clamped depth; culling and sorting see the
/// true value. The x/y dot products run between issuing the divide and
/// collecting it so a pipelined divider overlaps them.
///
/// The output slices must be at least as long as `points`.
pub fn transform_points<D: DivisionUnit + ?Sized>(
    points: &[FixVec3],
    view: &Mat43,
    projection: &Projection,
    divider: &mut D,
    screen_points: &mut [ScreenPoint],
    z_values: &mut [Fix16],
) {
    let view_distance = projection.view_distance().to_bits();
    let near = projection.near();

    for ((point, screen), z_out) in points
        .iter()
        .zip(screen_points.iter_mut())
        .zip(z_values.iter_mut())
    {
        let z = view.row_dot(2, point);
        let clamped_z = z.max(near);

        divider.issue(view_distance, clamped_z.to_bits());

        let x = view.row_dot(0, point);
        let y = view.row_dot(1, point);

        let depth_factor = Fix16::from_bits(divider.retrieve());

        *screen = ScreenPoint::new(
            saturate_i16(fix16_int32_mul(depth_factor, x)),
            saturate_i16(fix16_int32_mul(depth_factor, y)),
        );
        *z_out = z;
    }
}
