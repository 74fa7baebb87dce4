//! # Background Subtraction Motion Detection
//!
//! This library maintains a slowly adapting background reference over a stream of camera
//! frames, extracts the dominant moving region from per-frame differences, and classifies
//! its motion with once-per-transition announcement debouncing. Stopped positions can be
//! matched against a small set of named calibration zones.
//!
//! The easiest way to use the library is to import its prelude:
//!
//! ```
//! use bgsub::prelude::v1::*;
//! ```

pub mod background;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod diff;
pub mod pipeline;
pub mod raster;
pub mod source;
pub mod zones;

pub mod prelude {
    pub mod v1 {
        pub use crate::{
            background::BackgroundModel,
            classifier::{Classification, Direction, MotionClassifier, MotionState},
            config::DetectorConfig,
            detector::{Band, Blob, BlobDetector, BlobParams, Rect},
            diff::DifferenceExtractor,
            pipeline::{MotionEvent, MotionPipeline},
            raster::{Raster, Rgb},
            source::FrameSource,
            zones::{Zone, ZoneMatcher},
        };
        pub use anyhow::{anyhow, Error, Result};
    }
}
