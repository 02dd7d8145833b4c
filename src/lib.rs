use bitmap::BmpImage;
use colorings::ColorInfo;
use config::RenderConfig;
use log::{debug, info};
use mandel_image::RenderReq;
use progress::{join_reporter, spawn_reporter, Progress};
use std::time::{Duration, Instant};

pub mod bitmap;
pub mod colorings;
pub mod config;
pub mod error;
pub mod mandel_image;
pub mod progress;

pub use error::{MandelError, Result};

const BACKGROUND: image::Rgb<u8> = image::Rgb([0, 0, 0]);
// Number of progress updates shown while rendering
const PROGRESS_UPDATES: usize = 20;

/// Render the image described by `config` and write it to its output file.
/// Returns the time spent rendering.
pub fn run(config: &RenderConfig) -> Result<Duration> {
    let mapping = config.mapping()?;
    let threads = config.threads()?;
    let color_info = ColorInfo::new();
    debug!(
        "{}x{} pixels, {} iterations, {:?}, {} coloring",
        mapping.width,
        mapping.height,
        mapping.iteration_depth,
        mapping.viewport,
        color_info.name(config.color_mode)
    );
    let coloring = color_info.scheme(config.color_mode, mapping.iteration_depth);
    let request = RenderReq::new(mapping, coloring);

    let start = Instant::now();
    let raster = if config.show_progress {
        let total = request.mapping.height;
        let (progress, receiver) = Progress::new(total, PROGRESS_UPDATES);
        let reporter = spawn_reporter(receiver, total);
        let raster = request.render(threads, Some(&progress));
        // Closes the channel, which ends the reporter.
        drop(progress);
        join_reporter(reporter);
        raster?
    } else {
        request.render(threads, None)?
    };
    let elapsed = start.elapsed();
    info!("rendered in {:?} with {} threads", elapsed, threads);

    let mut image = BmpImage::new(
        raster.width() as u32,
        raster.height() as u32,
        &config.output,
        BACKGROUND,
    );
    raster.write_to(&mut image);
    image.write()?;
    info!("wrote {}", image.path().display());
    Ok(elapsed)
}
