//! # Background reference model

use crate::raster::Raster;
use anyhow::{anyhow, Result};
use log::trace;

/// Slowly adapting background reference.
///
/// The model owns a background raster seeded from the first captured frame. Every
/// `update_interval` frames the current frame is blended in with `blend_weight` on a
/// 0-256 scale, low-pass filtering the reference so it tracks slow illumination and
/// scene drift.
pub struct BackgroundModel {
    background: Raster,
    update_interval: usize,
    blend_weight: u16,
    frames_since_update: usize,
}

impl BackgroundModel {
    /// Capture the starting background.
    ///
    /// # Arguments
    ///
    /// * `first_frame` - initial captured frame, copied into the model.
    /// * `update_interval` - frames between blends.
    /// * `blend_weight` - per-update blend weight on a 0-256 scale.
    pub fn new(first_frame: &Raster, update_interval: usize, blend_weight: u16) -> Result<Self> {
        if update_interval == 0 {
            return Err(anyhow!("background update interval must be non-zero"));
        }

        if blend_weight > 256 {
            return Err(anyhow!("blend weight {} out of 0-256 range", blend_weight));
        }

        Ok(Self {
            background: first_frame.clone(),
            update_interval,
            blend_weight,
            frames_since_update: 0,
        })
    }

    /// Advance the frame counter, blending `frame` in once the update interval is reached.
    ///
    /// Below the interval the background raster is left untouched and `Ok(false)` is
    /// returned. On a blend the counter resets and `Ok(true)` is returned. A frame with
    /// mismatched dimensions is a fatal error.
    pub fn maybe_update(&mut self, frame: &Raster) -> Result<bool> {
        self.frames_since_update += 1;

        if self.frames_since_update < self.update_interval {
            return Ok(false);
        }

        self.frames_since_update = 0;
        self.background.blend_from(frame, self.blend_weight)?;

        trace!("blended frame into background (alpha {})", self.blend_weight);

        Ok(true)
    }

    /// Get read-only access to the current background raster.
    pub fn get(&self) -> &Raster {
        &self.background
    }
}
