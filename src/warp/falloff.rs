//! Rotation falloff: how much of the swirl angle applies at a given distance.
//!
//! A falloff receives the normalized distance `d = dist / radius` (0 at the
//! center, approaching 1 at the edge of the disc) and returns a scale factor
//! that multiplies the configured angle. Output is not clamped: values above 1
//! over-rotate and negative values reverse direction.

use std::str::FromStr;

use crate::foundation::error::{WarpError, WarpResult};

/// Maps normalized distance from the center to a rotation scale factor.
pub trait Falloff {
    fn scale(&self, normalized_distance: f64) -> f64;
}

impl<F> Falloff for F
where
    F: Fn(f64) -> f64,
{
    fn scale(&self, normalized_distance: f64) -> f64 {
        self(normalized_distance)
    }
}

/// `1 - d`: full rotation at the center, none at the edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Linear;

impl Falloff for Linear {
    #[inline]
    fn scale(&self, d: f64) -> f64 {
        1.0 - d
    }
}

/// `1 - d^2`: keeps the core twisted longer before easing off.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Quadratic;

impl Falloff for Quadratic {
    #[inline]
    fn scale(&self, d: f64) -> f64 {
        1.0 - d * d
    }
}

/// Inverted smoothstep; flat at both the center and the edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Smooth;

impl Falloff for Smooth {
    #[inline]
    fn scale(&self, d: f64) -> f64 {
        1.0 - d * d * (3.0 - 2.0 * d)
    }
}

/// Same scale everywhere inside the disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constant(pub f64);

impl Falloff for Constant {
    #[inline]
    fn scale(&self, _d: f64) -> f64 {
        self.0
    }
}

/// Named falloff, used where the curve comes from a spec file or the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FalloffKind {
    #[default]
    Linear,
    Quadratic,
    Smooth,
    /// Full angle across the whole disc (`Constant(1.0)`).
    Uniform,
}

impl FalloffKind {
    pub const ALL: [FalloffKind; 4] = [
        FalloffKind::Linear,
        FalloffKind::Quadratic,
        FalloffKind::Smooth,
        FalloffKind::Uniform,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FalloffKind::Linear => "linear",
            FalloffKind::Quadratic => "quadratic",
            FalloffKind::Smooth => "smooth",
            FalloffKind::Uniform => "uniform",
        }
    }
}

impl Falloff for FalloffKind {
    #[inline]
    fn scale(&self, d: f64) -> f64 {
        match self {
            FalloffKind::Linear => Linear.scale(d),
            FalloffKind::Quadratic => Quadratic.scale(d),
            FalloffKind::Smooth => Smooth.scale(d),
            FalloffKind::Uniform => Constant(1.0).scale(d),
        }
    }
}

impl FromStr for FalloffKind {
    type Err = WarpError;

    fn from_str(s: &str) -> WarpResult<Self> {
        let key = s.trim().to_ascii_lowercase();
        FalloffKind::ALL
            .into_iter()
            .find(|k| k.name() == key)
            .ok_or_else(|| {
                WarpError::validation(format!(
                    "unknown falloff '{key}' (expected linear, quadratic, smooth or uniform)"
                ))
            })
    }
}

impl std::fmt::Display for FalloffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/warp/falloff.rs"]
mod tests;
