//! Conversions between [`PixelBuffer`] and the `image` crate.
//!
//! Pixels stay straight (non-premultiplied) RGBA8; the warp only moves
//! whole pixels around, so no alpha math is involved.

use std::path::Path;

use anyhow::Context;

use crate::{
    buffer::pixel::{PixelBuffer, PixelSource, PixelTarget, PixelView, PixelViewMut, expected_len},
    foundation::error::{WarpError, WarpResult},
};

impl PixelBuffer {
    pub fn from_rgba_image(img: image::RgbaImage) -> WarpResult<Self> {
        let (width, height) = img.dimensions();
        let mut data = img.into_raw();
        data.truncate(expected_len(width, height)?);
        Self::from_raw(width, height, data)
    }

    pub fn into_rgba_image(self) -> WarpResult<image::RgbaImage> {
        let (width, height) = (self.width(), self.height());
        image::RgbaImage::from_raw(width, height, self.into_raw())
            .ok_or_else(|| WarpError::invalid_buffer("rgba image buffer too small"))
    }
}

/// Decode encoded image bytes into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> WarpResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    PixelBuffer::from_rgba_image(dyn_img.to_rgba8())
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> WarpResult<PixelBuffer> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

/// Encode `buffer` as PNG at `path`.
pub fn save_png(buffer: &PixelBuffer, path: &Path) -> WarpResult<()> {
    image::save_buffer_with_format(
        path,
        buffer.as_bytes(),
        buffer.width(),
        buffer.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

impl PixelSource for image::RgbaImage {
    fn pixel_view(&self) -> WarpResult<PixelView<'_>> {
        let (width, height) = self.dimensions();
        let len = expected_len(width, height)?;
        PixelView::new(width, height, &self.as_raw()[..len])
    }
}

impl PixelTarget for image::RgbaImage {
    fn pixel_view_mut(&mut self) -> WarpResult<PixelViewMut<'_>> {
        let (width, height) = self.dimensions();
        let len = expected_len(width, height)?;
        let data: &mut [u8] = self;
        PixelViewMut::new(width, height, &mut data[..len])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/image_io.rs"]
mod tests;
