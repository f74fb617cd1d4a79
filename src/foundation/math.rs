use crate::foundation::core::{Point, ViewportOffset};

/// Map a destination pixel coordinate into source space.
#[inline]
pub fn to_source_space(x: u32, y: u32, offset: ViewportOffset) -> Point {
    Point::new(
        f64::from(x) + f64::from(offset.left),
        f64::from(y) + f64::from(offset.top),
    )
}

/// Euclidean distance from `p` to `center`.
#[inline]
pub fn distance_to_center(p: Point, center: Point) -> f64 {
    let dx = center.x - p.x;
    let dy = center.y - p.y;
    (dx * dx + dy * dy).sqrt()
}

/// Truncate toward zero into an integer pixel index.
///
/// Non-finite input maps to `None`; values beyond `i64` saturate, which the
/// bounds check rejects anyway.
#[inline]
pub(crate) fn trunc_to_index(v: f64) -> Option<i64> {
    if v.is_finite() {
        Some(v.trunc() as i64)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
