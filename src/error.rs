use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MandelError {
    /// Width or height is not a positive number of pixels that fits an image
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("the iteration budget must be positive")]
    InvalidIterations,

    /// The viewport bounds are not finite or not increasing
    #[error("invalid viewport re=[{re_start}, {re_end}] im=[{im_start}, {im_end}]")]
    InvalidViewport {
        re_start: f64,
        re_end: f64,
        im_start: f64,
        im_end: f64,
    },

    #[error("the number of worker threads must be positive")]
    InvalidThreads,

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, MandelError>;
