//! # Frame differencing

use crate::raster::Raster;
use anyhow::Result;

/// Per-channel absolute difference between a frame and the background.
///
/// The scratch raster is allocated once at startup and reused every frame.
pub struct DifferenceExtractor {
    scratch: Raster,
}

impl DifferenceExtractor {
    /// Pre-allocate the scratch raster.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Ok(Self {
            scratch: Raster::new(width, height)?,
        })
    }

    /// Fill the scratch raster with `|frame - background|` per channel.
    ///
    /// The returned borrow belongs to the caller for the remainder of the cycle.
    pub fn compute(&mut self, frame: &Raster, background: &Raster) -> Result<&Raster> {
        self.scratch.absdiff_from(frame, background)?;
        Ok(&self.scratch)
    }

    /// Get the most recently computed difference raster.
    pub fn get(&self) -> &Raster {
        &self.scratch
    }
}
