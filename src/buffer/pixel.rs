//! RGBA8 pixel buffers and shape-validated views over caller-owned bytes.
//!
//! Layout is row-major, rows top-to-bottom:
//!
//! ```text
//! data[(y * width + x) * 4 + c]    c in R, G, B, A
//! ```

use crate::foundation::{
    core::{BYTES_PER_PIXEL, Rgba8},
    error::{WarpError, WarpResult},
};

/// Byte length required for a `width x height` RGBA8 buffer.
pub fn expected_len(width: u32, height: u32) -> WarpResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| {
            WarpError::invalid_buffer(format!("{width}x{height} buffer size overflow"))
        })
}

fn check_len(width: u32, height: u32, len: usize) -> WarpResult<()> {
    let expected = expected_len(width, height)?;
    if len != expected {
        return Err(WarpError::invalid_buffer(format!(
            "{width}x{height} rgba8 buffer needs {expected} bytes, got {len}"
        )));
    }
    Ok(())
}

/// Owned RGBA8 pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> WarpResult<Self> {
        let len = expected_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Buffer with every pixel set to `px`.
    pub fn filled(width: u32, height: u32, px: Rgba8) -> WarpResult<Self> {
        let len = expected_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: px.repeat(len / BYTES_PER_PIXEL),
        })
    }

    /// Wrap existing bytes; fails unless `data.len() == width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> WarpResult<Self> {
        check_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.view().pixel(x, y)
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8) -> WarpResult<()> {
        if x >= self.width || y >= self.height {
            return Err(WarpError::validation(format!(
                "pixel ({x}, {y}) outside {}x{} buffer",
                self.width, self.height
            )));
        }
        let i = pixel_offset(self.width, x, y);
        self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&px);
        Ok(())
    }

    pub fn view(&self) -> PixelView<'_> {
        PixelView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    pub fn view_mut(&mut self) -> PixelViewMut<'_> {
        PixelViewMut {
            width: self.width,
            height: self.height,
            data: &mut self.data,
        }
    }
}

#[inline]
fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * BYTES_PER_PIXEL
}

/// Read-only RGBA8 view whose length has been checked against its dimensions.
#[derive(Clone, Copy, Debug)]
pub struct PixelView<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> PixelView<'a> {
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> WarpResult<Self> {
        check_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = pixel_offset(self.width, x, y);
        let px = &self.data[i..i + BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// One row of bytes; `y` must be `< height`.
    pub(crate) fn row(&self, y: u32) -> &'a [u8] {
        let row_bytes = self.width as usize * BYTES_PER_PIXEL;
        let start = y as usize * row_bytes;
        &self.data[start..start + row_bytes]
    }
}

/// Writable RGBA8 view whose length has been checked against its dimensions.
#[derive(Debug)]
pub struct PixelViewMut<'a> {
    width: u32,
    height: u32,
    data: &'a mut [u8],
}

impl<'a> PixelViewMut<'a> {
    pub fn new(width: u32, height: u32, data: &'a mut [u8]) -> WarpResult<Self> {
        check_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.data
    }

    pub fn as_view(&self) -> PixelView<'_> {
        PixelView {
            width: self.width,
            height: self.height,
            data: &*self.data,
        }
    }

    pub(crate) fn row_bytes(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }
}

/// Anything that can lend a read-only RGBA8 view for the duration of a pass.
pub trait PixelSource {
    fn pixel_view(&self) -> WarpResult<PixelView<'_>>;
}

/// Anything that can lend a writable RGBA8 view for the duration of a pass.
pub trait PixelTarget {
    fn pixel_view_mut(&mut self) -> WarpResult<PixelViewMut<'_>>;
}

impl PixelSource for PixelBuffer {
    fn pixel_view(&self) -> WarpResult<PixelView<'_>> {
        Ok(self.view())
    }
}

impl PixelTarget for PixelBuffer {
    fn pixel_view_mut(&mut self) -> WarpResult<PixelViewMut<'_>> {
        Ok(self.view_mut())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/pixel.rs"]
mod tests;
