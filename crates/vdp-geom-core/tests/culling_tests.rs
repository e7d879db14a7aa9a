//! Tests for the per-polygon steps: backface test, depth metric, clip flags
//! and corner orientation.

use vdp_geom_core::math::{fix16, Fix16, ScreenPoint};
use vdp_geom_core::render::cull::{compute_clip_flags, is_backfacing, ClipFlags};
use vdp_geom_core::render::depth::depth_metric;
use vdp_geom_core::render::mesh::{Control, DrawMode, SortType};
use vdp_geom_core::render::orient::{orient, prepare_clipping};
use vdp_geom_core::render::polygon::PolygonState;

fn state(points: [(i16, i16); 4]) -> PolygonState {
    let mut polygon = PolygonState {
        indices: [10, 11, 12, 13],
        ..Default::default()
    };
    for (dst, (x, y)) in polygon.screen_points.iter_mut().zip(points) {
        *dst = ScreenPoint::new(x, y);
    }
    compute_clip_flags(&mut polygon);
    polygon
}

/// Square of half-size `h` around `(cx, cy)`, wound so it faces the viewer.
fn square(cx: i16, cy: i16, h: i16) -> [(i16, i16); 4] {
    [
        (cx - h, cy - h),
        (cx - h, cy + h),
        (cx + h, cy + h),
        (cx + h, cy - h),
    ]
}

mod depth {
    use super::*;

    const Z: [Fix16; 4] = [fix16(10), fix16(20), fix16(30), fix16(40)];

    #[test]
    fn center_averages_first_and_third_corner() {
        assert_eq!(depth_metric(SortType::Center, &Z), fix16(20));
    }

    #[test]
    fn min_and_max_scan_all_corners() {
        assert_eq!(depth_metric(SortType::Min, &Z), fix16(10));
        assert_eq!(depth_metric(SortType::Max, &Z), fix16(40));

        let shuffled = [fix16(30), fix16(-5), fix16(70), fix16(0)];
        assert_eq!(depth_metric(SortType::Min, &shuffled), fix16(-5));
        assert_eq!(depth_metric(SortType::Max, &shuffled), fix16(70));
    }

    #[test]
    fn center_does_not_overflow_near_the_range_limit() {
        let z = [Fix16::MAX, Fix16::ZERO, Fix16::MAX, Fix16::ZERO];
        assert_eq!(depth_metric(SortType::Center, &z), Fix16::MAX);
    }

    #[test]
    fn center_rounds_toward_minus_infinity() {
        let z = [Fix16::from_bits(-3), Fix16::ZERO, Fix16::ZERO, Fix16::ZERO];
        assert_eq!(depth_metric(SortType::Center, &z), Fix16::from_bits(-2));
    }
}

mod backface {
    use super::*;

    fn points(p: [(i16, i16); 4]) -> [ScreenPoint; 4] {
        p.map(|(x, y)| ScreenPoint::new(x, y))
    }

    #[test]
    fn front_facing_square_is_kept() {
        assert!(!is_backfacing(&points(square(0, 0, 10))));
    }

    #[test]
    fn reversed_winding_is_culled() {
        let [a, b, c, d] = square(0, 0, 10);
        assert!(is_backfacing(&points([a, d, c, b])));
    }

    #[test]
    fn degenerate_polygon_is_kept() {
        assert!(!is_backfacing(&points([(5, 5); 4])));
    }

    #[test]
    fn large_coordinates_do_not_overflow() {
        let p = points([
            (i16::MIN, i16::MIN),
            (i16::MIN, i16::MAX),
            (i16::MAX, i16::MAX),
            (i16::MAX, i16::MIN),
        ]);
        assert!(!is_backfacing(&p));
    }
}

mod clip_flags {
    use super::*;

    #[test]
    fn on_screen_square_has_no_flags() {
        let polygon = state(square(0, 0, 50));
        assert!(polygon.and_flags.is_empty());
        assert!(polygon.or_flags.is_empty());
    }

    #[test]
    fn screen_edges_are_inclusive() {
        assert_eq!(ClipFlags::for_point(ScreenPoint::new(-176, -112)), ClipFlags::NONE);
        assert_eq!(ClipFlags::for_point(ScreenPoint::new(176, 112)), ClipFlags::NONE);
        assert_eq!(ClipFlags::for_point(ScreenPoint::new(-177, 0)), ClipFlags::LEFT);
        assert_eq!(ClipFlags::for_point(ScreenPoint::new(177, 0)), ClipFlags::RIGHT);
        assert_eq!(ClipFlags::for_point(ScreenPoint::new(0, -113)), ClipFlags::TOP);
        assert_eq!(ClipFlags::for_point(ScreenPoint::new(0, 113)), ClipFlags::BOTTOM);
    }

    #[test]
    fn every_shared_bound_combination_rejects() {
        let cases = [
            (-400, 0, ClipFlags::LEFT),
            (400, 0, ClipFlags::RIGHT),
            (0, -300, ClipFlags::TOP),
            (0, 300, ClipFlags::BOTTOM),
            (-400, -300, ClipFlags::LEFT | ClipFlags::TOP),
            (-400, 300, ClipFlags::LEFT | ClipFlags::BOTTOM),
            (400, -300, ClipFlags::RIGHT | ClipFlags::TOP),
            (400, 300, ClipFlags::RIGHT | ClipFlags::BOTTOM),
        ];

        for (cx, cy, expected) in cases {
            let polygon = state(square(cx, cy, 20));
            assert_eq!(polygon.and_flags, expected, "square at ({cx}, {cy})");
            assert_eq!(polygon.or_flags, expected, "square at ({cx}, {cy})");
        }
    }

    #[test]
    fn polygon_spanning_the_screen_is_not_rejected() {
        let polygon = state(square(0, 0, 500));
        assert!(polygon.and_flags.is_empty());
        assert_eq!(polygon.or_flags, ClipFlags::LR | ClipFlags::TB);
    }

    #[test]
    fn straddling_polygon_has_empty_and_but_some_or() {
        let polygon = state(square(-176, 0, 20));
        assert!(polygon.and_flags.is_empty());
        assert_eq!(polygon.or_flags, ClipFlags::LEFT);
    }
}

mod orientation {
    use super::*;

    #[test]
    fn on_screen_polygon_disables_preclip_and_keeps_order() {
        let mut polygon = state(square(0, 0, 20));
        let before = polygon;

        prepare_clipping(&mut polygon);

        assert!(polygon.draw_mode.contains(DrawMode::PRE_CLIPPING_DISABLE));
        assert_eq!(polygon.indices, before.indices);
        assert_eq!(polygon.screen_points, before.screen_points);
        assert_eq!(polygon.control, before.control);
    }

    #[test]
    fn straddling_polygon_keeps_preclip_enabled() {
        let mut polygon = state(square(-176, 0, 20));
        prepare_clipping(&mut polygon);
        assert!(!polygon.draw_mode.contains(DrawMode::PRE_CLIPPING_DISABLE));
    }

    #[test]
    fn corner_a_left_of_screen_swaps_horizontally() {
        // A and B sit past the left edge, C and D inside.
        let mut polygon = state([(-200, -10), (-200, 10), (-150, 10), (-150, -10)]);
        assert_eq!(polygon.clip_flags[0], ClipFlags::LEFT);
        let before = polygon;

        orient(&mut polygon);

        assert_eq!(polygon.indices, [11, 10, 13, 12]);
        assert_eq!(
            polygon.screen_points,
            [
                before.screen_points[1],
                before.screen_points[0],
                before.screen_points[3],
                before.screen_points[2],
            ]
        );
        assert!(polygon.control.flip_h());
        assert!(!polygon.control.flip_v());
    }

    #[test]
    fn corner_a_above_screen_swaps_vertically() {
        let mut polygon = state([(-10, -150), (-10, -100), (10, -100), (10, -150)]);
        assert_eq!(polygon.clip_flags[0], ClipFlags::TOP);

        orient(&mut polygon);

        assert_eq!(polygon.indices, [13, 12, 11, 10]);
        assert!(polygon.control.flip_v());
        assert!(!polygon.control.flip_h());
    }

    #[test]
    fn corner_a_past_two_edges_applies_both_swaps() {
        let mut polygon = state([(-200, 150), (-200, 100), (-100, 100), (-100, 150)]);
        assert_eq!(polygon.clip_flags[0], ClipFlags::LEFT | ClipFlags::BOTTOM);

        orient(&mut polygon);

        // (0,1)(3,2) then (0,3)(1,2)
        assert_eq!(polygon.indices, [12, 13, 10, 11]);
        assert!(polygon.control.flip_h());
        assert!(polygon.control.flip_v());
    }

    #[test]
    fn corner_a_on_screen_leaves_polygon_alone() {
        let mut polygon = state([(-100, -10), (-100, 10), (-200, 10), (-200, -10)]);
        assert!(polygon.clip_flags[0].is_empty());
        assert!(!polygon.or_flags.is_empty());
        let before = polygon;

        orient(&mut polygon);

        assert_eq!(polygon, before);
    }

    #[test]
    fn orienting_twice_toggles_back() {
        let mut polygon = state([(-200, -10), (-200, 10), (-150, 10), (-150, -10)]);
        let original = polygon;

        orient(&mut polygon);
        let once = polygon;
        orient(&mut polygon);

        assert_ne!(polygon, once);
        assert_eq!(polygon.indices, original.indices);
        assert_eq!(polygon.control, original.control);
    }

    #[test]
    fn flip_bits_toggle_rather_than_set() {
        let mut polygon = state([(-200, -10), (-200, 10), (-150, 10), (-150, -10)]);
        polygon.control = Control::from_raw(Control::FLIP_H);

        orient(&mut polygon);

        assert!(!polygon.control.flip_h());
    }
}
