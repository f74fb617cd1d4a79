//! Source bounds policy for nearest-neighbor sampling.

use crate::{buffer::pixel::PixelView, foundation::core::BYTES_PER_PIXEL};

/// Byte offset of source pixel `(src_x, src_y)`.
///
/// Both axes are checked on their own, so a negative row can never alias into
/// a valid flat index.
#[inline]
pub fn source_index(source: &PixelView<'_>, src_x: i64, src_y: i64) -> Option<usize> {
    let x = usize::try_from(src_x).ok()?;
    let y = usize::try_from(src_y).ok()?;
    let width = source.width() as usize;
    if x >= width || y >= source.height() as usize {
        return None;
    }
    Some((y * width + x) * BYTES_PER_PIXEL)
}

/// Copy the source pixel at `(src_x, src_y)` into `dst_px`; false when it misses the source.
#[inline]
pub(crate) fn copy_sample(
    source: &PixelView<'_>,
    src_x: i64,
    src_y: i64,
    dst_px: &mut [u8],
) -> bool {
    match source_index(source, src_x, src_y) {
        Some(i) => {
            dst_px.copy_from_slice(&source.bytes()[i..i + BYTES_PER_PIXEL]);
            true
        }
        None => false,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/warp/sample.rs"]
mod tests;
