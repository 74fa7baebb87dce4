//! # Blob detection interface

use crate::raster::Raster;
use anyhow::Result;
use nalgebra as na;

/// Axis-aligned bounding rectangle in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    /// Check whether two rectangles overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let x2 = (self.x + self.w).max(other.x + other.w);
        let y2 = (self.y + self.h).max(other.y + other.h);

        Rect {
            x,
            y,
            w: x2 - x,
            h: y2 - y,
        }
    }
}

/// Connected foreground region in a difference raster.
///
/// Blobs are transient values produced once per decision tick and not persisted
/// across cycles.
#[derive(Clone, Debug)]
pub struct Blob {
    /// Pixel-mean centre of the region.
    pub centroid: na::Point2<f32>,
    /// Number of foreground pixels.
    pub pixels: usize,
    /// Bounding rectangle.
    pub rect: Rect,
}

/// Inclusive per-channel difference band.
///
/// `lo` rejects sensor noise, `hi` rejects saturated artefacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Band {
    pub lo: u8,
    pub hi: u8,
}

/// Parameters consumed by a [`BlobDetector`].
#[derive(Clone, Copy, Debug)]
pub struct BlobParams {
    /// Per-channel foreground bands. A pixel counts as foreground when any channel
    /// difference falls within its band.
    pub bands: [Band; 3],
    /// Minimum pixel count for a blob to be kept.
    pub area_threshold: usize,
    /// Coalesce overlapping candidate regions into one.
    pub merge: bool,
}

impl Default for BlobParams {
    fn default() -> Self {
        Self {
            bands: [Band { lo: 10, hi: 200 }; 3],
            area_threshold: 2000,
            merge: true,
        }
    }
}

/// Connected-region detector over a thresholded difference raster.
///
/// The core pipeline only consumes this contract; connected-component labeling itself
/// is left to implementations.
pub trait BlobDetector {
    /// Find foreground blobs in `diff`.
    ///
    /// `out` is cleared and filled with the detected blobs. Output order is
    /// implementation-defined and authoritative for downstream tie-breaking.
    fn find_blobs(&mut self, diff: &Raster, params: &BlobParams, out: &mut Vec<Blob>)
        -> Result<()>;
}
