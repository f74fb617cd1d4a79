use std::f64::consts::{FRAC_PI_2, PI};

use super::*;
use crate::{
    buffer::pixel::PixelBuffer,
    warp::falloff::{Constant, FalloffKind, Linear},
};

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const SENTINEL: [u8; 4] = [9, 9, 9, 9];

/// Source whose pixels encode their own coordinates.
fn coord_image(w: u32, h: u32) -> PixelBuffer {
    let mut b = PixelBuffer::new(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            b.set_pixel(x, y, [x as u8, y as u8, 0, 255]).unwrap();
        }
    }
    b
}

fn noise_image(w: u32, h: u32, seed: u32) -> PixelBuffer {
    let mut b = PixelBuffer::new(w, h).unwrap();
    let mut s = seed;
    for px in b.as_bytes_mut().iter_mut() {
        s = s.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        *px = (s >> 24) as u8;
    }
    b
}

#[test]
fn center_samples_itself_for_any_angle_and_falloff() {
    let c = Point::new(7.5, 3.25);
    for angle in [0.0, 1.0, -PI, 42.0] {
        let cfg = WarpConfig::new(c, angle, 4.0);
        assert_eq!(sample_position(c, &cfg), Some(c));
        let cfg = cfg.with_falloff(|d: f64| 10.0 - d);
        assert_eq!(sample_position(c, &cfg), Some(c));
    }
}

#[test]
fn samples_keep_their_distance_from_center() {
    let c = Point::new(10.0, 10.0);
    let cfg = WarpConfig::new(c, 2.3, 8.0).with_falloff(FalloffKind::Quadratic);
    for p in [
        Point::new(12.0, 10.0),
        Point::new(5.0, 13.0),
        Point::new(10.5, 4.5),
    ] {
        let s = sample_position(p, &cfg).unwrap();
        let before = distance_to_center(p, c);
        let after = distance_to_center(s, c);
        assert!((before - after).abs() < 1e-9, "{p:?} -> {s:?}");
    }
}

#[test]
fn rotation_direction_follows_angle_sign() {
    let c = Point::ORIGIN;
    let p = Point::new(1.0, 0.0);
    let cfg = WarpConfig::new(c, FRAC_PI_2, 10.0).with_falloff(Constant(1.0));
    let s = sample_position(p, &cfg).unwrap();
    assert!(s.x.abs() < 1e-12 && (s.y - 1.0).abs() < 1e-12);

    let cfg = WarpConfig::new(c, -FRAC_PI_2, 10.0).with_falloff(Constant(1.0));
    let s = sample_position(p, &cfg).unwrap();
    assert!(s.x.abs() < 1e-12 && (s.y + 1.0).abs() < 1e-12);
}

#[test]
fn only_points_strictly_inside_radius_are_sampled() {
    let cfg = WarpConfig::new(Point::new(0.0, 0.0), 1.0, 5.0);
    assert!(sample_position(Point::new(3.0, 4.0), &cfg).is_none());
    assert!(sample_position(Point::new(3.0, 3.9), &cfg).is_some());
    assert!(sample_position(Point::new(100.0, 0.0), &cfg).is_none());
}

#[test]
fn near_the_edge_linear_falloff_barely_rotates() {
    let c = Point::ORIGIN;
    let cfg = WarpConfig::new(c, PI, 100.0);
    let p = Point::new(99.99, 0.0);
    let s = sample_position(p, &cfg).unwrap();
    assert!((s.x - p.x).abs() < 0.01);
    assert!(s.y.abs() < 0.05);
}

#[test]
fn zero_angle_reproduces_source_inside_disc() {
    let src = coord_image(6, 6);
    let mut dst = PixelBuffer::filled(3, 3, SENTINEL).unwrap();
    let cfg = WarpConfig::new(Point::new(3.0, 3.0), 0.0, 10.0);
    let offset = ViewportOffset::new(2, 2);

    let stats = apply(src.view(), dst.view_mut(), offset, &cfg);
    assert_eq!(stats.pixels_written, 9);
    // Polar round trip may land a hair under an integer; truncation then
    // picks the neighbor.
    for y in 0..3 {
        for x in 0..3 {
            let [r, g, ..] = dst.pixel(x, y).unwrap();
            assert!(i64::from(r).abs_diff(i64::from(x + 2)) <= 1, "({x}, {y}) r={r}");
            assert!(i64::from(g).abs_diff(i64::from(y + 2)) <= 1, "({x}, {y}) g={g}");
        }
    }
}

/// Sample pixel computed directly from the polar form: angle of the point
/// around the center plus the falloff-scaled rotation, truncated toward zero.
fn polar_sample(
    x: u32,
    y: u32,
    offset: ViewportOffset,
    c: Point,
    angle: f64,
    r: f64,
) -> (i64, i64) {
    let sx = f64::from(x) + f64::from(offset.left);
    let sy = f64::from(y) + f64::from(offset.top);
    let (dx, dy) = (c.x - sx, c.y - sy);
    let dist = (dx * dx + dy * dy).sqrt();
    let a = (sy - c.y).atan2(sx - c.x) + angle * (1.0 - dist / r);
    (
        (c.x + a.cos() * dist).trunc() as i64,
        (c.y + a.sin() * dist).trunc() as i64,
    )
}

#[test]
fn sample_positions_follow_the_polar_angle_formula() {
    let offset = ViewportOffset::new(-5, 3);
    let cases = [
        (Point::new(64.0, 64.0), 0.0, 60.0),
        (Point::new(64.0, 64.0), FRAC_PI_2, 60.0),
        (Point::new(40.5, 70.25), PI, 45.0),
        (Point::new(64.0, 64.0), -2.0, 2.0),
    ];
    let mut checked = 0;
    for (c, angle, r) in cases {
        let cfg = WarpConfig::new(c, angle, r);
        for y in 0..128 {
            for x in 0..128 {
                let p = to_source_space(x, y, offset);
                let Some(s) = sample_position(p, &cfg) else {
                    assert!(distance_to_center(p, c) >= r);
                    continue;
                };
                assert_eq!(
                    (s.x.trunc() as i64, s.y.trunc() as i64),
                    polar_sample(x, y, offset, c, angle, r),
                    "dst ({x}, {y}) center {c:?} angle {angle} radius {r}"
                );
                checked += 1;
            }
        }
    }
    assert!(checked > 10_000);
}

#[test]
fn written_pixels_match_the_polar_sample() {
    let src = coord_image(40, 40);
    let offset = ViewportOffset::new(2, 1);
    let (c, angle, r) = (Point::new(19.0, 21.0), 1.7, 16.0);
    let cfg = WarpConfig::new(c, angle, r);

    let mut dst = PixelBuffer::filled(36, 36, SENTINEL).unwrap();
    apply(src.view(), dst.view_mut(), offset, &cfg);
    for y in 0..36 {
        for x in 0..36 {
            let p = to_source_space(x, y, offset);
            if distance_to_center(p, c) >= r {
                assert_eq!(dst.pixel(x, y), Some(SENTINEL));
                continue;
            }
            let (sx, sy) = polar_sample(x, y, offset, c, angle, r);
            let expected = match (u32::try_from(sx), u32::try_from(sy)) {
                (Ok(sx), Ok(sy)) if sx < 40 && sy < 40 => Some([sx as u8, sy as u8, 0, 255]),
                _ => Some(SENTINEL),
            };
            assert_eq!(dst.pixel(x, y), expected, "({x}, {y})");
        }
    }
}

#[test]
fn four_by_four_half_turn_keeps_single_green_center() {
    let mut src = PixelBuffer::filled(4, 4, RED).unwrap();
    src.set_pixel(2, 2, GREEN).unwrap();
    let cfg = WarpConfig::new(Point::new(2.0, 2.0), PI, 2.0).with_copy_input_first(true);

    let mut dst = PixelBuffer::new(4, 4).unwrap();
    let stats = apply(src.view(), dst.view_mut(), ViewportOffset::ZERO, &cfg);

    let greens: Vec<(u32, u32)> = (0..4)
        .flat_map(|y| (0..4).map(move |x| (x, y)))
        .filter(|&(x, y)| dst.pixel(x, y) == Some(GREEN))
        .collect();
    assert_eq!(greens, vec![(2, 2)]);
    assert!(
        dst.as_bytes()
            .chunks_exact(4)
            .all(|px| px == RED || px == GREEN)
    );
    // Center, four neighbors at distance 1 and four diagonals at sqrt(2).
    assert_eq!(stats.pixels_written, 9);
    assert_eq!(stats.pixels_out_of_radius, 7);
}

#[test]
fn zero_radius_is_a_plain_offset_copy() {
    let src = noise_image(8, 5, 7);
    let offset = ViewportOffset::new(3, -1);

    let mut expected = PixelBuffer::filled(6, 6, SENTINEL).unwrap();
    seed_from_source(src.view(), &mut expected.view_mut(), offset);

    let mut dst = PixelBuffer::filled(6, 6, SENTINEL).unwrap();
    let cfg = WarpConfig::new(Point::new(4.0, 2.0), 1.0, 0.0).with_copy_input_first(true);
    let stats = apply(src.view(), dst.view_mut(), offset, &cfg);

    assert_eq!(dst, expected);
    assert_eq!(stats.pixels_total, 36);
    assert_eq!(stats.pixels_out_of_radius, 36);
}

#[test]
fn pixels_outside_radius_keep_their_previous_value() {
    let src = PixelBuffer::filled(10, 10, RED).unwrap();
    let mut dst = PixelBuffer::filled(10, 10, SENTINEL).unwrap();
    let c = Point::new(5.0, 5.0);
    let cfg = WarpConfig::new(c, 1.3, 3.0);

    let stats = apply(src.view(), dst.view_mut(), ViewportOffset::ZERO, &cfg);
    for y in 0..10 {
        for x in 0..10 {
            let d = distance_to_center(Point::new(f64::from(x), f64::from(y)), c);
            if d >= 3.0 {
                assert_eq!(dst.pixel(x, y), Some(SENTINEL), "({x}, {y})");
            } else {
                assert_eq!(dst.pixel(x, y), Some(RED), "({x}, {y})");
            }
        }
    }
    assert_eq!(stats.pixels_out_of_bounds, 0);
}

#[test]
fn samples_outside_source_leave_destination_untouched() {
    let src = coord_image(4, 4);
    let mut dst = PixelBuffer::filled(4, 4, SENTINEL).unwrap();
    // Half turn around the top-left corner sends everything but the corner to negative coordinates.
    let cfg = WarpConfig::new(Point::ORIGIN, PI, 10.0).with_falloff(Constant(1.0));

    let stats = apply(src.view(), dst.view_mut(), ViewportOffset::ZERO, &cfg);
    assert_eq!(dst.pixel(0, 0), Some([0, 0, 0, 255]));
    // (1, 1) lands on (-1, -1) give or take an ulp, so it may truncate onto the corner.
    assert!(matches!(stats.pixels_written, 1 | 2));
    assert_eq!(stats.pixels_written + stats.pixels_out_of_bounds, 16);
    for y in 0..4u32 {
        for x in 0..4u32 {
            if (x, y) != (0, 0) && (x, y) != (1, 1) {
                assert_eq!(dst.pixel(x, y), Some(SENTINEL), "({x}, {y})");
            }
        }
    }
}

#[test]
fn non_finite_angle_writes_nothing() {
    let src = PixelBuffer::filled(3, 3, RED).unwrap();
    let mut dst = PixelBuffer::filled(3, 3, SENTINEL).unwrap();
    let cfg = WarpConfig::new(Point::new(1.0, 1.0), f64::NAN, 5.0);

    let stats = apply(src.view(), dst.view_mut(), ViewportOffset::ZERO, &cfg);
    assert_eq!(stats.pixels_written, 0);
    assert_eq!(stats.pixels_out_of_bounds, 9);
    assert_eq!(dst, PixelBuffer::filled(3, 3, SENTINEL).unwrap());
}

#[test]
fn stats_partition_every_destination_pixel() {
    let src = noise_image(20, 12, 3);
    let mut dst = PixelBuffer::new(16, 16).unwrap();
    let cfg = WarpConfig::new(Point::new(12.0, 6.0), 4.0, 9.0);
    let s = apply(src.view(), dst.view_mut(), ViewportOffset::new(2, -3), &cfg);
    assert_eq!(s.pixels_total, 256);
    assert_eq!(
        s.pixels_written + s.pixels_out_of_radius + s.pixels_out_of_bounds,
        s.pixels_total
    );
    assert!(s.pixels_written > 0);
    assert!(s.pixels_out_of_bounds > 0);
}

#[test]
fn seed_handles_partial_and_disjoint_overlap() {
    let src = coord_image(2, 2);

    let mut dst = PixelBuffer::filled(3, 3, SENTINEL).unwrap();
    seed_from_source(src.view(), &mut dst.view_mut(), ViewportOffset::new(-1, -1));
    assert_eq!(dst.pixel(0, 0), Some(SENTINEL));
    assert_eq!(dst.pixel(0, 2), Some(SENTINEL));
    assert_eq!(dst.pixel(1, 1), Some([0, 0, 0, 255]));
    assert_eq!(dst.pixel(2, 2), Some([1, 1, 0, 255]));

    let mut dst = PixelBuffer::filled(3, 3, SENTINEL).unwrap();
    seed_from_source(src.view(), &mut dst.view_mut(), ViewportOffset::new(1, 0));
    assert_eq!(dst.pixel(0, 0), Some([1, 0, 0, 255]));
    assert_eq!(dst.pixel(0, 1), Some([1, 1, 0, 255]));
    assert_eq!(dst.pixel(1, 0), Some(SENTINEL));
    assert_eq!(dst.pixel(0, 2), Some(SENTINEL));

    let mut dst = PixelBuffer::filled(3, 3, SENTINEL).unwrap();
    seed_from_source(src.view(), &mut dst.view_mut(), ViewportOffset::new(5, 0));
    assert_eq!(dst, PixelBuffer::filled(3, 3, SENTINEL).unwrap());
}

#[test]
fn empty_destination_is_a_no_op() {
    let src = noise_image(4, 4, 1);
    let mut dst = PixelBuffer::new(0, 3).unwrap();
    let cfg = WarpConfig::new(Point::new(1.0, 1.0), 1.0, 3.0).with_copy_input_first(true);
    let stats = apply(src.view(), dst.view_mut(), ViewportOffset::ZERO, &cfg);
    assert_eq!(stats, WarpStats::default());
}

#[test]
fn parallel_pass_matches_sequential_pass() {
    let src = noise_image(37, 23, 11);
    let offset = ViewportOffset::new(3, -2);
    let cfg = WarpConfig::new(Point::new(20.5, 10.25), 2.5, 15.0)
        .with_falloff(FalloffKind::Smooth)
        .with_copy_input_first(true);

    let mut seq = PixelBuffer::filled(31, 29, SENTINEL).unwrap();
    let seq_stats = apply(src.view(), seq.view_mut(), offset, &cfg);

    for threading in [WarpThreading::default(), WarpThreading::with_threads(3)] {
        let mut par = PixelBuffer::filled(31, 29, SENTINEL).unwrap();
        let par_stats =
            apply_parallel(src.view(), par.view_mut(), offset, &cfg, &threading).unwrap();
        assert_eq!(par, seq);
        assert_eq!(par_stats, seq_stats);
    }
}

#[test]
fn parallel_pass_rejects_zero_threads_before_touching_pixels() {
    let src = noise_image(4, 4, 5);
    let mut dst = PixelBuffer::filled(4, 4, SENTINEL).unwrap();
    let cfg = WarpConfig::new(Point::new(2.0, 2.0), 1.0, 3.0).with_copy_input_first(true);
    let err = apply_parallel(
        src.view(),
        dst.view_mut(),
        ViewportOffset::ZERO,
        &cfg,
        &WarpThreading::with_threads(0),
    )
    .unwrap_err();
    assert!(err.to_string().contains("threads"));
    assert_eq!(dst, PixelBuffer::filled(4, 4, SENTINEL).unwrap());
}

#[test]
fn warp_accepts_any_pixel_provider() {
    let src = image::RgbaImage::from_pixel(5, 5, image::Rgba(RED));
    let mut dst = PixelBuffer::new(5, 5).unwrap();
    let cfg = WarpConfig::new(Point::new(2.0, 2.0), 0.7, 2.5).with_falloff(Linear);
    let stats = warp(&src, &mut dst, ViewportOffset::ZERO, &cfg).unwrap();
    assert!(stats.pixels_written > 0);
    assert_eq!(dst.pixel(2, 2), Some(RED));
    assert_eq!(dst.pixel(0, 0), Some([0, 0, 0, 0]));
}
