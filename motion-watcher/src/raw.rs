//! Raw RGB24 frame input

use bgsub::prelude::v1::*;
use std::fs::File;
use std::io::{self, BufReader, Read};

/// Reads packed RGB24 frames of fixed dimensions from a file or standard input.
///
/// Pass `-` as the path to read from standard input. A truncated trailing frame is
/// treated as end of stream.
pub struct RawFrameSource {
    reader: Box<dyn Read>,
    width: usize,
    height: usize,
}

impl RawFrameSource {
    pub fn open(path: &str, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(anyhow!("invalid frame dimensions {}x{}", width, height));
        }

        let reader: Box<dyn Read> = if path == "-" {
            Box::new(io::stdin())
        } else {
            Box::new(BufReader::new(File::open(path)?))
        };

        Ok(Self {
            reader,
            width,
            height,
        })
    }
}

impl FrameSource for RawFrameSource {
    fn next_frame(&mut self, frame: &mut Raster) -> Result<bool> {
        if frame.dim() != (self.width, self.height) {
            return Err(anyhow!(
                "frame buffer is {:?}, but the source produces {}x{}",
                frame.dim(),
                self.width,
                self.height
            ));
        }

        match self.reader.read_exact(bytemuck::cast_slice_mut(frame.pixels_mut())) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn dim(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}
