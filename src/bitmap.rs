use crate::error::{MandelError, Result};
use image::{ImageFormat, Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// An RGB picture that is stored as an uncompressed 24-bit bitmap.
pub struct BmpImage {
    path: PathBuf,
    pixels: RgbImage,
}

impl BmpImage {
    pub fn new(
        width: u32,
        height: u32,
        path: impl Into<PathBuf>,
        background: Rgb<u8>,
    ) -> BmpImage {
        BmpImage {
            path: path.into(),
            pixels: RgbImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pixels outside the image are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb<u8>) {
        if x < self.width() && y < self.height() {
            self.pixels.put_pixel(x, y, color);
        }
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    pub fn write(&self) -> Result<()> {
        self.pixels
            .save_with_format(&self.path, ImageFormat::Bmp)
            .map_err(|source| MandelError::Write {
                path: self.path.clone(),
                source,
            })
    }
}
