use crate::{
    foundation::{
        core::Point,
        error::{WarpError, WarpResult},
    },
    warp::falloff::{Falloff, Linear},
};

/// Parameters of one swirl pass.
///
/// Built per invocation and only ever borrowed by the kernel, so a pass sees
/// a single consistent configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct WarpConfig<F = Linear> {
    /// Swirl center in source-space pixels (may be fractional).
    pub center: Point,
    /// Rotation at full falloff scale. Negative swirls the other way.
    pub angle_radians: f64,
    /// Pixels strictly closer than this to `center` are remapped.
    /// Non-positive radii remap nothing.
    pub radius_px: f64,
    pub falloff: F,
    /// Seed the destination with an offset copy of the source before warping.
    pub copy_input_first: bool,
}

impl WarpConfig<Linear> {
    pub fn new(center: Point, angle_radians: f64, radius_px: f64) -> Self {
        Self {
            center,
            angle_radians,
            radius_px,
            falloff: Linear,
            copy_input_first: false,
        }
    }

    pub fn from_degrees(center: Point, angle_degrees: f64, radius_px: f64) -> Self {
        Self::new(center, angle_degrees.to_radians(), radius_px)
    }
}

impl<F> WarpConfig<F> {
    pub fn with_falloff<G: Falloff>(self, falloff: G) -> WarpConfig<G> {
        WarpConfig {
            center: self.center,
            angle_radians: self.angle_radians,
            radius_px: self.radius_px,
            falloff,
            copy_input_first: self.copy_input_first,
        }
    }

    pub fn with_copy_input_first(mut self, copy: bool) -> Self {
        self.copy_input_first = copy;
        self
    }

    /// True when no pixel can fall strictly inside the radius.
    pub fn is_degenerate(&self) -> bool {
        !(self.radius_px > 0.0)
    }
}

impl<F: Falloff> WarpConfig<F> {
    /// Rotation applied to a pixel `dist` away from the center.
    #[inline]
    pub fn rotation_at(&self, dist: f64) -> f64 {
        self.angle_radians * self.falloff.scale(dist / self.radius_px)
    }
}

/// Worker settings for the row-parallel pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WarpThreading {
    /// Dedicated pool size; `None` runs on rayon's global pool.
    pub threads: Option<usize>,
}

impl WarpThreading {
    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads: Some(threads),
        }
    }

    pub(crate) fn build_pool(&self) -> WarpResult<Option<rayon::ThreadPool>> {
        let Some(n) = self.threads else {
            return Ok(None);
        };
        if n == 0 {
            return Err(WarpError::validation(
                "warp threading 'threads' must be >= 1 when set",
            ));
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .map(Some)
            .map_err(|e| WarpError::validation(format!("failed to build rayon thread pool: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/warp/config.rs"]
mod tests;
