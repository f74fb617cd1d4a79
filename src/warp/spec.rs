//! JSON description of a swirl pass.
//!
//! ```json
//! {
//!   "center": { "x": 120.0, "y": 80.0 },
//!   "angle_deg": 90.0,
//!   "radius_px": 64.0,
//!   "falloff": "linear",
//!   "copy_input": true,
//!   "offset": { "left": 0, "top": 0 }
//! }
//! ```
//!
//! Exactly one of `angle_deg` / `angle_rad` must be present.

use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::{
        core::{Point, ViewportOffset},
        error::{WarpError, WarpResult},
    },
    warp::{config::WarpConfig, falloff::FalloffKind},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarpSpec {
    pub center: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_deg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_rad: Option<f64>,
    pub radius_px: f64,
    #[serde(default)]
    pub falloff: FalloffKind,
    #[serde(default)]
    pub copy_input: bool,
    #[serde(default)]
    pub offset: ViewportOffset,
}

impl WarpSpec {
    pub fn from_path(path: &Path) -> WarpResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read warp spec '{}'", path.display()))?;
        parse_warp_spec(&text)
    }

    pub fn validate(&self) -> WarpResult<()> {
        if !self.center.x.is_finite() || !self.center.y.is_finite() {
            return Err(WarpError::validation("warp center must be finite"));
        }
        if !self.radius_px.is_finite() {
            return Err(WarpError::validation("warp radius_px must be finite"));
        }
        self.angle_radians().map(|_| ())
    }

    /// Angle in radians, whichever unit the document used.
    pub fn angle_radians(&self) -> WarpResult<f64> {
        let angle = match (self.angle_deg, self.angle_rad) {
            (Some(deg), None) => deg.to_radians(),
            (None, Some(rad)) => rad,
            (Some(_), Some(_)) => {
                return Err(WarpError::validation(
                    "warp spec sets both angle_deg and angle_rad",
                ));
            }
            (None, None) => {
                return Err(WarpError::validation(
                    "warp spec needs angle_deg or angle_rad",
                ));
            }
        };
        if !angle.is_finite() {
            return Err(WarpError::validation("warp angle must be finite"));
        }
        Ok(angle)
    }

    pub fn to_config(&self) -> WarpResult<WarpConfig<FalloffKind>> {
        self.validate()?;
        Ok(WarpConfig::new(self.center, self.angle_radians()?, self.radius_px)
            .with_falloff(self.falloff)
            .with_copy_input_first(self.copy_input))
    }
}

/// Parse and validate a JSON warp spec.
pub fn parse_warp_spec(json: &str) -> WarpResult<WarpSpec> {
    let spec: WarpSpec =
        serde_json::from_str(json).map_err(|e| WarpError::serde(e.to_string()))?;
    spec.validate()?;
    Ok(spec)
}

#[cfg(test)]
#[path = "../../tests/unit/warp/spec.rs"]
mod tests;
