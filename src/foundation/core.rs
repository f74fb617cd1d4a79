pub use kurbo::Point;

/// One RGBA8 pixel, channels in `R, G, B, A` order.
pub type Rgba8 = [u8; 4];

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Translation from destination-buffer coordinates into source-buffer coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ViewportOffset {
    pub left: i32,
    pub top: i32,
}

impl ViewportOffset {
    pub const ZERO: Self = Self { left: 0, top: 0 };

    pub fn new(left: i32, top: i32) -> Self {
        Self { left, top }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
