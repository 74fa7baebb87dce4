//! # Detector configuration

use crate::detector::{Band, BlobParams};
use crate::zones::Zone;
use anyhow::{anyhow, Result};

/// Startup configuration for the motion pipeline.
///
/// All values are fixed at construction; there is no dynamic reload.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct DetectorConfig {
    /// Frames between background blends.
    pub update_interval: usize,
    /// Background blend weight on a 0-256 scale (128 is an even split).
    pub blend_weight: u16,
    /// Frames between classification decisions.
    pub decision_interval: usize,
    /// Per-channel foreground difference bands.
    pub bands: [Band; 3],
    /// Minimum pixel count for a blob to count as motion.
    pub area_threshold: usize,
    /// Coalesce overlapping blobs into one.
    pub merge: bool,
    /// Horizontal displacement below which the target counts as stopped.
    pub move_tolerance: f32,
    /// Maximum distance between a stop position and a zone centre.
    pub location_tolerance: f32,
    /// Named stop zones, in match priority order.
    pub zones: Vec<Zone>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            update_interval: 20,
            blend_weight: 128,
            decision_interval: 5,
            bands: [Band { lo: 10, hi: 200 }; 3],
            area_threshold: 2000,
            merge: true,
            move_tolerance: 80.0,
            location_tolerance: 5.0,
            zones: vec![
                Zone::new(48.0, "cupboard"),
                Zone::new(187.0, "kettle"),
                Zone::new(271.0, "sink"),
            ],
        }
    }
}

impl DetectorConfig {
    /// Reject invalid values before any buffers are allocated.
    pub fn validate(&self) -> Result<()> {
        if self.update_interval == 0 {
            return Err(anyhow!("update interval must be non-zero"));
        }

        if self.decision_interval == 0 {
            return Err(anyhow!("decision interval must be non-zero"));
        }

        if self.blend_weight > 256 {
            return Err(anyhow!(
                "blend weight {} out of 0-256 range",
                self.blend_weight
            ));
        }

        for band in &self.bands {
            if band.lo > band.hi {
                return Err(anyhow!("inverted difference band {}-{}", band.lo, band.hi));
            }
        }

        Ok(())
    }

    /// Blob detector parameters derived from this configuration.
    pub fn blob_params(&self) -> BlobParams {
        BlobParams {
            bands: self.bands,
            area_threshold: self.area_threshold,
            merge: self.merge,
        }
    }
}
