//! Radial remap kernel.
//!
//! Every destination pixel is mapped into source space through the viewport
//! offset. When it lies strictly inside the swirl radius, it is replaced by the
//! source pixel found at the same distance from the center but rotated by
//! `angle * falloff(dist / radius)`. Sampling truncates toward zero
//! (nearest-neighbor, no blending).
//!
//! Destination pixels depend only on the read-only source, so rows are
//! independent and [`apply_parallel`] splits them across rayon workers.

use rayon::prelude::*;

use crate::{
    buffer::pixel::{PixelSource, PixelTarget, PixelView, PixelViewMut},
    foundation::{
        core::{BYTES_PER_PIXEL, Point, ViewportOffset},
        error::WarpResult,
        math::{distance_to_center, to_source_space, trunc_to_index},
    },
    warp::{
        config::{WarpConfig, WarpThreading},
        falloff::Falloff,
        sample::copy_sample,
    },
};

/// What happened to one destination pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelOutcome {
    Written,
    /// Not strictly inside the radius; left as seeded.
    OutOfRadius,
    /// Rotated sample fell outside the source; left as seeded.
    OutOfBounds,
}

/// Per-pass pixel counters. The three outcomes always sum to `pixels_total`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WarpStats {
    pub pixels_total: u64,
    pub pixels_written: u64,
    pub pixels_out_of_radius: u64,
    pub pixels_out_of_bounds: u64,
}

impl WarpStats {
    fn record(&mut self, outcome: PixelOutcome) {
        self.pixels_total += 1;
        match outcome {
            PixelOutcome::Written => self.pixels_written += 1,
            PixelOutcome::OutOfRadius => self.pixels_out_of_radius += 1,
            PixelOutcome::OutOfBounds => self.pixels_out_of_bounds += 1,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            pixels_total: self.pixels_total + other.pixels_total,
            pixels_written: self.pixels_written + other.pixels_written,
            pixels_out_of_radius: self.pixels_out_of_radius + other.pixels_out_of_radius,
            pixels_out_of_bounds: self.pixels_out_of_bounds + other.pixels_out_of_bounds,
        }
    }

    fn all_out_of_radius(pixels: u64) -> Self {
        Self {
            pixels_total: pixels,
            pixels_out_of_radius: pixels,
            ..Self::default()
        }
    }
}

/// Fractional source position sampled for source-space point `p`.
///
/// `None` unless `p` is strictly inside the radius. The sample sits at the
/// same distance from the center, at `p`'s polar angle plus the rotation.
pub fn sample_position<F: Falloff>(p: Point, config: &WarpConfig<F>) -> Option<Point> {
    let c = config.center;
    let dist = distance_to_center(p, c);
    if !(dist < config.radius_px) {
        return None;
    }

    let base = (p.y - c.y).atan2(p.x - c.x);
    let (sin_a, cos_a) = (base + config.rotation_at(dist)).sin_cos();
    Some(Point::new(c.x + cos_a * dist, c.y + sin_a * dist))
}

/// Copy the source into the destination at the same viewport offset.
///
/// Destination pixels with no source counterpart are left untouched.
pub fn seed_from_source(
    source: PixelView<'_>,
    destination: &mut PixelViewMut<'_>,
    offset: ViewportOffset,
) {
    let (dw, dh) = (
        i64::from(destination.width()),
        i64::from(destination.height()),
    );
    let (sw, sh) = (i64::from(source.width()), i64::from(source.height()));
    let (left, top) = (i64::from(offset.left), i64::from(offset.top));

    // Destination columns whose source column lands in [0, sw).
    let x0 = (-left).clamp(0, dw);
    let x1 = (sw - left).clamp(0, dw);
    if x0 >= x1 {
        return;
    }
    let y0 = (-top).clamp(0, dh);
    let y1 = (sh - top).clamp(0, dh);

    let row_bytes = destination.row_bytes();
    let span = (x1 - x0) as usize * BYTES_PER_PIXEL;
    let src_x0 = (x0 + left) as usize * BYTES_PER_PIXEL;
    let dst_x0 = x0 as usize * BYTES_PER_PIXEL;
    let dst = destination.bytes_mut();
    for y in y0..y1 {
        let src_row = source.row((y + top) as u32);
        let dst_start = y as usize * row_bytes + dst_x0;
        dst[dst_start..dst_start + span].copy_from_slice(&src_row[src_x0..src_x0 + span]);
    }
}

fn warp_pixel<F: Falloff>(
    source: &PixelView<'_>,
    p: Point,
    config: &WarpConfig<F>,
    dst_px: &mut [u8],
) -> PixelOutcome {
    let Some(s) = sample_position(p, config) else {
        return PixelOutcome::OutOfRadius;
    };
    let (Some(src_x), Some(src_y)) = (trunc_to_index(s.x), trunc_to_index(s.y)) else {
        return PixelOutcome::OutOfBounds;
    };
    if copy_sample(source, src_x, src_y, dst_px) {
        PixelOutcome::Written
    } else {
        PixelOutcome::OutOfBounds
    }
}

fn warp_row<F: Falloff>(
    source: &PixelView<'_>,
    row: &mut [u8],
    y: u32,
    offset: ViewportOffset,
    config: &WarpConfig<F>,
) -> WarpStats {
    let mut stats = WarpStats::default();
    for (x, px) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
        let p = to_source_space(x as u32, y, offset);
        stats.record(warp_pixel(source, p, config, px));
    }
    stats
}

fn warp_rows_par<F: Falloff + Sync>(
    source: &PixelView<'_>,
    rows: &mut [u8],
    row_bytes: usize,
    offset: ViewportOffset,
    config: &WarpConfig<F>,
) -> WarpStats {
    rows.par_chunks_mut(row_bytes)
        .enumerate()
        .map(|(y, row)| warp_row(source, row, y as u32, offset, config))
        .reduce(WarpStats::default, WarpStats::merge)
}

/// Seed (if configured) and decide whether the main loop has anything to do.
fn begin_pass<F>(
    source: PixelView<'_>,
    destination: &mut PixelViewMut<'_>,
    offset: ViewportOffset,
    config: &WarpConfig<F>,
) -> Option<WarpStats> {
    if config.copy_input_first {
        seed_from_source(source, destination, offset);
    }

    let pixels = u64::from(destination.width()) * u64::from(destination.height());
    if config.is_degenerate() {
        tracing::warn!(
            radius_px = config.radius_px,
            "swirl radius is not positive; pass leaves every pixel as seeded"
        );
        return Some(WarpStats::all_out_of_radius(pixels));
    }
    if !config.angle_radians.is_finite() {
        tracing::warn!(
            angle_radians = config.angle_radians,
            "swirl angle is not finite; rotated samples will all miss"
        );
    }
    if pixels == 0 {
        return Some(WarpStats::default());
    }
    None
}

fn log_stats(stats: &WarpStats) {
    tracing::debug!(
        total = stats.pixels_total,
        written = stats.pixels_written,
        out_of_radius = stats.pixels_out_of_radius,
        out_of_bounds = stats.pixels_out_of_bounds,
        "swirl pass finished"
    );
}

/// Run one swirl pass on the calling thread, mutating `destination` in place.
#[tracing::instrument(
    level = "debug",
    skip(source, destination, config),
    fields(
        src_width = source.width(),
        src_height = source.height(),
        dst_width = destination.width(),
        dst_height = destination.height(),
        radius_px = config.radius_px,
        angle_radians = config.angle_radians,
    )
)]
pub fn apply<F: Falloff>(
    source: PixelView<'_>,
    mut destination: PixelViewMut<'_>,
    offset: ViewportOffset,
    config: &WarpConfig<F>,
) -> WarpStats {
    if let Some(stats) = begin_pass(source, &mut destination, offset, config) {
        return stats;
    }

    let row_bytes = destination.row_bytes();
    let stats = destination
        .bytes_mut()
        .chunks_exact_mut(row_bytes)
        .enumerate()
        .map(|(y, row)| warp_row(&source, row, y as u32, offset, config))
        .fold(WarpStats::default(), WarpStats::merge);
    log_stats(&stats);
    stats
}

/// Same pass as [`apply`], with destination rows spread over rayon workers.
///
/// Output is byte-identical to [`apply`].
#[tracing::instrument(
    level = "debug",
    skip(source, destination, config),
    fields(
        src_width = source.width(),
        src_height = source.height(),
        dst_width = destination.width(),
        dst_height = destination.height(),
        radius_px = config.radius_px,
        angle_radians = config.angle_radians,
    )
)]
pub fn apply_parallel<F: Falloff + Sync>(
    source: PixelView<'_>,
    mut destination: PixelViewMut<'_>,
    offset: ViewportOffset,
    config: &WarpConfig<F>,
    threading: &WarpThreading,
) -> WarpResult<WarpStats> {
    let pool = threading.build_pool()?;
    if let Some(stats) = begin_pass(source, &mut destination, offset, config) {
        return Ok(stats);
    }

    let row_bytes = destination.row_bytes();
    let rows = destination.bytes_mut();
    let stats = match pool {
        Some(pool) => pool.install(|| warp_rows_par(&source, rows, row_bytes, offset, config)),
        None => warp_rows_par(&source, rows, row_bytes, offset, config),
    };
    log_stats(&stats);
    Ok(stats)
}

/// Borrow views from any pixel provider and run [`apply`].
///
/// Buffer shapes are validated once here, before any pixel is touched.
pub fn warp<S, D, F>(
    source: &S,
    destination: &mut D,
    offset: ViewportOffset,
    config: &WarpConfig<F>,
) -> WarpResult<WarpStats>
where
    S: PixelSource + ?Sized,
    D: PixelTarget + ?Sized,
    F: Falloff,
{
    let src = source.pixel_view()?;
    let dst = destination.pixel_view_mut()?;
    Ok(apply(src, dst, offset, config))
}

#[cfg(test)]
#[path = "../../tests/unit/warp/kernel.rs"]
mod tests;
