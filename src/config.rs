use crate::colorings::ColorMode;
use crate::error::{MandelError, Result};
use crate::mandel_image::{Mapping, Viewport};
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_WIDTH: i64 = 1024;
pub const DEFAULT_HEIGHT: i64 = 720;
pub const DEFAULT_ITERATIONS: i64 = 60;
pub const DEFAULT_OUTPUT: &str = "mandelbrot.bmp";

/// Render the Mandelbrot set into a bitmap file.
#[derive(Parser, Debug)]
#[command(name = "mandelbrot", disable_help_flag = true)]
pub struct Args {
    /// Generate the image (without it, only this help is shown)
    #[arg(short = 'g')]
    pub generate: bool,
    /// Use a colored ramp instead of grayscale
    #[arg(short = 'c')]
    pub color: bool,
    /// Image width in pixels
    #[arg(short = 'w', value_name = "WIDTH", allow_hyphen_values = true)]
    pub width: Option<i64>,
    /// Image height in pixels
    #[arg(short = 'h', value_name = "HEIGHT", allow_hyphen_values = true)]
    pub height: Option<i64>,
    /// Multiply width and height by this factor
    #[arg(short = 'm', value_name = "FACTOR", allow_hyphen_values = true)]
    pub multiplier: Option<i64>,
    /// Maximum number of iterations per pixel
    #[arg(short = 'i', value_name = "ITERATIONS", allow_hyphen_values = true)]
    pub iterations: Option<i64>,
    /// Output file
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Number of worker threads (1 renders on the main thread)
    #[arg(short = 't', value_name = "THREADS", allow_hyphen_values = true)]
    pub threads: Option<i64>,
    /// Do not show progress
    #[arg(short = 'q')]
    pub quiet: bool,
}

/// What the command line asks for
#[derive(Debug)]
pub enum Command {
    Usage,
    Generate(RenderConfig),
}

pub fn parse_args<I, T>(args: I) -> std::result::Result<Command, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = Args::try_parse_from(args)?;
    if !args.generate {
        return Ok(Command::Usage);
    }
    Ok(Command::Generate(RenderConfig::from_args(&args)))
}

/// The first line of a parse error, without clap's own usage hint.
pub fn error_summary(e: &clap::Error) -> String {
    let message = e.to_string();
    match message.lines().next() {
        Some(line) => line.to_string(),
        None => message,
    }
}

pub fn usage() -> String {
    Args::command().render_help().to_string()
}

/// Settings for one run. Values are kept as given and checked when the
/// mapping is built, so a bad width is reported before anything is rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub viewport: Viewport,
    pub width: i64,
    pub height: i64,
    pub iteration_depth: i64,
    pub color_mode: ColorMode,
    pub output: PathBuf,
    pub threads: i64,
    pub show_progress: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            viewport: Viewport::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            iteration_depth: DEFAULT_ITERATIONS,
            color_mode: ColorMode::Grayscale,
            output: PathBuf::from(DEFAULT_OUTPUT),
            threads: num_cpus::get() as i64,
            show_progress: true,
        }
    }
}

impl RenderConfig {
    pub fn from_args(args: &Args) -> RenderConfig {
        let mut config = RenderConfig::default();
        if args.color {
            config.color_mode = ColorMode::Indexed;
        }
        if let Some(width) = args.width {
            config.width = width;
        }
        if let Some(height) = args.height {
            config.height = height;
        }
        if let Some(factor) = args.multiplier {
            config.width = config.width.saturating_mul(factor);
            config.height = config.height.saturating_mul(factor);
        }
        if let Some(iterations) = args.iterations {
            config.iteration_depth = iterations;
        }
        if let Some(output) = &args.output {
            config.output = output.clone();
        }
        if let Some(threads) = args.threads {
            config.threads = threads;
        }
        config.show_progress = !args.quiet;
        config
    }

    pub fn mapping(&self) -> Result<Mapping> {
        let invalid = || MandelError::InvalidDimensions {
            width: self.width,
            height: self.height,
        };
        let width = usize::try_from(self.width).map_err(|_| invalid())?;
        let height = usize::try_from(self.height).map_err(|_| invalid())?;
        let iteration_depth =
            u32::try_from(self.iteration_depth).map_err(|_| MandelError::InvalidIterations)?;
        let mapping = Mapping::new(self.viewport, width, height, iteration_depth);
        mapping.validate()?;
        Ok(mapping)
    }

    pub fn threads(&self) -> Result<usize> {
        match usize::try_from(self.threads) {
            Ok(threads) if threads > 0 => Ok(threads),
            _ => Err(MandelError::InvalidThreads),
        }
    }
}
