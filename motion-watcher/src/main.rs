//! Watch a raw frame stream for motion events

use bgsub::prelude::v1::*;
use clap::*;
use connected_blob_detector::ConnectedBlobDetector;
use log::debug;

mod raw;

use raw::RawFrameSource;

fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("motion-watcher")
        .version(crate_version!())
        .arg(
            Arg::new("width")
                .long("width")
                .short('w')
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .short('h')
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::new("warmup")
                .long("warmup")
                .takes_value(true)
                .default_value("10"),
        )
        .arg(Arg::new("config").long("config").short('c').takes_value(true))
        .arg(Arg::new("input").takes_value(true).required(true))
        .get_matches();

    let width: usize = matches.value_of("width").unwrap().parse()?;
    let height: usize = matches.value_of("height").unwrap().parse()?;
    let warmup: usize = matches.value_of("warmup").unwrap().parse()?;
    let input = matches.value_of("input").unwrap();

    let config: DetectorConfig = match matches.value_of("config") {
        Some(path) => serde_json::from_reader(std::fs::File::open(path)?)?,
        None => DetectorConfig::default(),
    };

    let mut source = RawFrameSource::open(input, width, height)?;
    let mut frame = Raster::new(width, height)?;

    // Let exposure and white balance settle before seeding the background.
    for _ in 0..warmup {
        if !source.next_frame(&mut frame)? {
            return Err(anyhow!("stream ended during warm-up"));
        }
    }

    if !source.next_frame(&mut frame)? {
        return Err(anyhow!("stream ended before a background frame was captured"));
    }

    let mut pipeline = MotionPipeline::new(config, ConnectedBlobDetector::new(), &frame)?;

    println!("Saved background image - watching for motion");

    while source.next_frame(&mut frame)? {
        if let Some(event) = pipeline.process_frame(&frame)? {
            match event {
                MotionEvent::MotionChanged(dir) => println!("moving {}", dir),
                MotionEvent::Stopped(Some(zone)) => println!("stopped at {}", zone),
                MotionEvent::Stopped(None) => println!("stopped"),
            }
        }
    }

    debug!("end of stream");
    println!("Processed {} frames", pipeline.frames());

    Ok(())
}
