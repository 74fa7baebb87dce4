//! # Motion detection pipeline

use crate::background::BackgroundModel;
use crate::classifier::{Direction, MotionClassifier, MotionState};
use crate::config::DetectorConfig;
use crate::detector::{Blob, BlobDetector, BlobParams};
use crate::diff::DifferenceExtractor;
use crate::raster::Raster;
use crate::zones::ZoneMatcher;
use anyhow::Result;
use log::{debug, info};

/// Discrete event produced by the pipeline, at most once per state transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MotionEvent {
    /// The target started moving in the given direction.
    MotionChanged(Direction),
    /// The target stopped, optionally within a configured zone.
    Stopped(Option<String>),
}

/// Drives the detection stages once per incoming frame.
///
/// Background blending and frame differencing run on every frame; blob detection,
/// classification and zone matching only on decision ticks, every `decision_interval`
/// frames. All buffers are allocated at construction and reused across cycles.
pub struct MotionPipeline<D> {
    background: BackgroundModel,
    diff: DifferenceExtractor,
    detector: D,
    classifier: MotionClassifier,
    zones: ZoneMatcher,
    params: BlobParams,
    decision_interval: usize,
    ticks: usize,
    frames: u64,
    blobs: Vec<Blob>,
}

impl<D: BlobDetector> MotionPipeline<D> {
    /// Create a pipeline seeded with the first captured frame.
    ///
    /// # Arguments
    ///
    /// * `config` - tunable thresholds and intervals, validated here.
    /// * `detector` - blob detector implementation to run on decision ticks.
    /// * `first_frame` - initial frame; becomes the starting background and fixes the
    ///   frame dimensions for the lifetime of the pipeline.
    pub fn new(config: DetectorConfig, detector: D, first_frame: &Raster) -> Result<Self> {
        config.validate()?;

        let (width, height) = first_frame.dim();

        Ok(Self {
            background: BackgroundModel::new(
                first_frame,
                config.update_interval,
                config.blend_weight,
            )?,
            diff: DifferenceExtractor::new(width, height)?,
            detector,
            classifier: MotionClassifier::new(config.move_tolerance),
            params: config.blob_params(),
            zones: ZoneMatcher::new(config.zones, config.location_tolerance),
            decision_interval: config.decision_interval,
            ticks: 0,
            frames: 0,
            blobs: Vec::new(),
        })
    }

    /// Process a single frame.
    ///
    /// Returns the event produced by this frame's decision, if the frame landed on a
    /// decision tick and the classification changed. A frame with mismatched
    /// dimensions is a fatal error.
    pub fn process_frame(&mut self, frame: &Raster) -> Result<Option<MotionEvent>> {
        self.frames += 1;

        self.background.maybe_update(frame)?;
        let diff = self.diff.compute(frame, self.background.get())?;

        // Throttle the decision cadence only. Background adaptation and differencing
        // above have already run for this frame.
        self.ticks += 1;
        if self.ticks < self.decision_interval {
            return Ok(None);
        }
        self.ticks = 0;

        self.detector.find_blobs(diff, &self.params, &mut self.blobs)?;

        let classification = self.classifier.classify(&self.blobs);

        debug!(
            "decision at frame {}: {} blobs, state {:?}",
            self.frames,
            self.blobs.len(),
            classification.state
        );

        if !classification.transition {
            return Ok(None);
        }

        let event = match classification.state {
            MotionState::Moving(dir) => {
                info!("moving {}", dir);
                Some(MotionEvent::MotionChanged(dir))
            }
            MotionState::Stopped => {
                let zone = classification
                    .blob
                    .as_ref()
                    .and_then(|blob| self.zones.match_x(blob.centroid.x))
                    .map(str::to_owned);

                match &zone {
                    Some(name) => info!("stopped at {}", name),
                    None => info!("stopped"),
                }

                Some(MotionEvent::Stopped(zone))
            }
            // An empty tick never announces.
            MotionState::Starting => None,
        };

        Ok(event)
    }

    /// Get the current background raster.
    pub fn background(&self) -> &Raster {
        self.background.get()
    }

    /// Get the most recent difference raster.
    pub fn difference(&self) -> &Raster {
        self.diff.get()
    }

    /// State set by the most recent announcement.
    pub fn state(&self) -> MotionState {
        self.classifier.last_announced()
    }

    /// Total frames processed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
