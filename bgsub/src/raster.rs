//! # Fixed size RGB raster

use anyhow::{anyhow, Result};
use bytemuck::{Pod, Zeroable};

/// RGB colour structure.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Grey value with all channels set to `v`.
    pub fn splat(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }
}

/// Fixed size RGB pixel raster.
///
/// Pixels are stored in row-major order. The raster is mutated in place and owned
/// exclusively by whichever component currently holds it.
#[derive(Clone)]
pub struct Raster {
    pixels: Vec<Rgb>,
    width: usize,
}

impl Raster {
    /// Create a new zeroed raster.
    ///
    /// # Arguments
    ///
    /// * `width` - width of the raster.
    /// * `height` - height of the raster.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(anyhow!("invalid raster dimensions {}x{}", width, height));
        }

        Ok(Self {
            pixels: vec![Rgb::default(); width * height],
            width,
        })
    }

    /// Create a raster from existing pixels.
    ///
    /// # Arguments
    ///
    /// * `width` - width of the raster.
    /// * `pixels` - row-major pixel data. Its length must be a non-zero multiple of `width`.
    pub fn from_pixels(width: usize, pixels: Vec<Rgb>) -> Result<Self> {
        if width == 0 || pixels.is_empty() || pixels.len() % width != 0 {
            return Err(anyhow!(
                "pixel data of length {} does not form a {} wide raster",
                pixels.len(),
                width
            ));
        }

        Ok(Self { pixels, width })
    }

    /// Get width and height of the raster.
    pub fn dim(&self) -> (usize, usize) {
        (self.width, self.pixels.len() / self.width)
    }

    /// Get the pixel at given coordinates.
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels[self.width * y + x]
    }

    /// Set the pixel at given coordinates.
    pub fn set(&mut self, x: usize, y: usize, px: Rgb) {
        self.pixels[self.width * y + x] = px;
    }

    /// Get the pixels in row-major order.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Get mutable access to the pixels in row-major order.
    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    /// Set every pixel to `px`.
    pub fn fill(&mut self, px: Rgb) {
        self.pixels.fill(px);
    }

    /// Blend `frame` into this raster in place.
    ///
    /// Each channel becomes `round((frame * alpha + self * (256 - alpha)) / 256)`, so
    /// `alpha == 256` replaces this raster with the frame and `alpha == 0` leaves it
    /// untouched.
    ///
    /// # Arguments
    ///
    /// * `frame` - raster to blend in. Must match this raster's dimensions.
    /// * `alpha` - blend weight on a 0-256 scale.
    pub fn blend_from(&mut self, frame: &Raster, alpha: u16) -> Result<()> {
        if alpha > 256 {
            return Err(anyhow!("blend alpha {} out of 0-256 range", alpha));
        }

        if self.dim() != frame.dim() {
            return Err(anyhow!(
                "dimension mismatch: {:?} vs {:?}",
                self.dim(),
                frame.dim()
            ));
        }

        let alpha = alpha as u32;

        for (dst, src) in self.pixels.iter_mut().zip(frame.pixels.iter()) {
            dst.r = blend_channel(src.r, dst.r, alpha);
            dst.g = blend_channel(src.g, dst.g, alpha);
            dst.b = blend_channel(src.b, dst.b, alpha);
        }

        Ok(())
    }

    /// Fill this raster with the per-channel absolute difference of `a` and `b`.
    ///
    /// Symmetric in its arguments. All three rasters must share dimensions.
    pub fn absdiff_from(&mut self, a: &Raster, b: &Raster) -> Result<()> {
        if self.dim() != a.dim() || a.dim() != b.dim() {
            return Err(anyhow!(
                "dimension mismatch: {:?} vs {:?} vs {:?}",
                self.dim(),
                a.dim(),
                b.dim()
            ));
        }

        for ((dst, a), b) in self
            .pixels
            .iter_mut()
            .zip(a.pixels.iter())
            .zip(b.pixels.iter())
        {
            dst.r = a.r.abs_diff(b.r);
            dst.g = a.g.abs_diff(b.g);
            dst.b = a.b.abs_diff(b.b);
        }

        Ok(())
    }
}

// Adding 128 before the shift rounds half-values up, matching a float round of the
// weighted average.
fn blend_channel(new: u8, old: u8, alpha: u32) -> u8 {
    ((new as u32 * alpha + old as u32 * (256 - alpha) + 128) >> 8) as u8
}
