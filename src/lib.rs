//! radial-warp applies a radial "swirl" deformation to RGBA8 pixel buffers.
//!
//! Pixels strictly inside a circle around a center point are replaced by the
//! source pixel found at the same distance from the center, rotated by an angle
//! that decays with distance. A pluggable [`Falloff`] decides how much of the
//! angle applies at each normalized distance.
//!
//! # Pass overview
//!
//! 1. **Seed** (optional): copy the source into the destination at the viewport offset.
//! 2. **Map**: destination `(x, y)` becomes source-space `(x + left, y + top)`.
//! 3. **Rotate**: inside the radius, rotate around the center by `angle * falloff(dist / radius)`.
//! 4. **Sample**: truncate to a source pixel and copy it if it lies inside the source.
//!
//! Per-pixel misses are never errors; a pass only fails up front on malformed
//! buffers or configuration.
//!
//! # Example
//!
//! ```
//! use radial_warp::{PixelBuffer, Point, ViewportOffset, WarpConfig, apply};
//!
//! let src = PixelBuffer::filled(64, 64, [200, 40, 40, 255]).unwrap();
//! let mut dst = PixelBuffer::new(64, 64).unwrap();
//! let cfg = WarpConfig::from_degrees(Point::new(32.0, 32.0), 120.0, 24.0)
//!     .with_copy_input_first(true);
//!
//! let stats = apply(src.view(), dst.view_mut(), ViewportOffset::ZERO, &cfg);
//! assert_eq!(stats.pixels_total, 64 * 64);
//! ```
#![forbid(unsafe_code)]

mod buffer;
mod foundation;
mod warp;

pub use buffer::image_io::{decode_image, load_image, save_png};
pub use buffer::pixel::{
    PixelBuffer, PixelSource, PixelTarget, PixelView, PixelViewMut, expected_len,
};
pub use foundation::core::{BYTES_PER_PIXEL, Point, Rgba8, ViewportOffset};
pub use foundation::error::{WarpError, WarpResult};
pub use foundation::math::{distance_to_center, to_source_space};
pub use warp::config::{WarpConfig, WarpThreading};
pub use warp::falloff::{Constant, Falloff, FalloffKind, Linear, Quadratic, Smooth};
pub use warp::kernel::{
    PixelOutcome, WarpStats, apply, apply_parallel, sample_position, seed_from_source, warp,
};
pub use warp::sample::source_index;
pub use warp::spec::{WarpSpec, parse_warp_spec};
