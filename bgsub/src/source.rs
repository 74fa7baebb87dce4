//! # Frame acquisition

use crate::raster::Raster;
use anyhow::Result;

/// Raster frame source.
///
/// Pixel format and resolution are established once at startup and stay fixed for the
/// lifetime of the source.
pub trait FrameSource {
    /// Capture the next frame in the stream.
    ///
    /// This function fills `frame` with the next captured raster. If a frame was
    /// written, `Ok(true)` is returned. At the end of the stream `Ok(false)` is
    /// returned, and if the source cannot honour the frame dimensions or capture
    /// fails, `Err` is returned.
    fn next_frame(&mut self, frame: &mut Raster) -> Result<bool>;

    /// Get width and height of produced frames.
    fn dim(&self) -> (usize, usize);

    /// Get the framerate of the stream.
    ///
    /// This will return `Some(framerate)` if it is known. On realtime sources it may
    /// not always be known. In such cases, `None` is returned.
    fn framerate(&self) -> Option<f64> {
        None
    }
}
