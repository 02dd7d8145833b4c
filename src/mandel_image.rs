use crate::bitmap::BmpImage;
use crate::colorings::Coloring;
use crate::error::{MandelError, Result};
use crate::progress::Progress;
use image::Rgb;
use log::debug;
use num_complex::Complex64;
use scoped_threadpool::Pool;

/// The rectangle of the complex plane that is mapped onto the image
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub re_start: f64,
    pub re_end: f64,
    pub im_start: f64,
    pub im_end: f64,
}

impl Viewport {
    pub fn is_valid(&self) -> bool {
        [self.re_start, self.re_end, self.im_start, self.im_end]
            .iter()
            .all(|v| v.is_finite())
            && self.re_start < self.re_end
            && self.im_start < self.im_end
    }
    fn invalid(&self) -> MandelError {
        MandelError::InvalidViewport {
            re_start: self.re_start,
            re_end: self.re_end,
            im_start: self.im_start,
            im_end: self.im_end,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            re_start: -2.0,
            re_end: 1.0,
            im_start: -1.0,
            im_end: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Parameters for mapping from the image to mandelbrot space
pub struct Mapping {
    pub viewport: Viewport,
    /// The maximum number of iterations used in the computation of the
    /// mandelbrot value. So, also the maximum mandelbrot value.
    pub iteration_depth: u32,
    /// The width of the image in pixels
    pub width: usize,
    /// The height of the image in pixels
    pub height: usize,
}

impl Mapping {
    pub fn new(viewport: Viewport, width: usize, height: usize, iteration_depth: u32) -> Mapping {
        Mapping {
            viewport,
            iteration_depth,
            width,
            height,
        }
    }
    pub fn validate(&self) -> Result<()> {
        let max = i32::MAX as usize;
        if self.width == 0
            || self.width > max
            || self.height == 0
            || self.height > max
            || self.width.checked_mul(self.height).is_none()
        {
            return Err(MandelError::InvalidDimensions {
                width: self.width as i64,
                height: self.height as i64,
            });
        }
        if self.iteration_depth == 0 {
            return Err(MandelError::InvalidIterations);
        }
        if !self.viewport.is_valid() {
            return Err(self.viewport.invalid());
        }
        Ok(())
    }
}

/*
Pixel (x, y) is mapped to the point
re(x) = re_start + x * (re_end - re_start) / width
im(y) = im_start + y * (im_end - im_start) / height
so pixel (0, 0) lands on (re_start, im_start) and the last pixel stays
strictly below (re_end, im_end).
 */
pub struct PixelToPlane {
    re_start: f64,
    re_span: f64,
    im_start: f64,
    im_span: f64,
    width: f64,
    height: f64,
}

impl PixelToPlane {
    pub fn from_mapping(mapping: &Mapping) -> PixelToPlane {
        let v = &mapping.viewport;
        PixelToPlane {
            re_start: v.re_start,
            re_span: v.re_end - v.re_start,
            im_start: v.im_start,
            im_span: v.im_end - v.im_start,
            width: mapping.width as f64,
            height: mapping.height as f64,
        }
    }
    pub fn cvt(&self, x: usize, y: usize) -> Complex64 {
        Complex64::new(self.cvt_x(x), self.cvt_y(y))
    }
    pub fn cvt_x(&self, x: usize) -> f64 {
        self.re_start + x as f64 * self.re_span / self.width
    }
    pub fn cvt_y(&self, y: usize) -> f64 {
        self.im_start + y as f64 * self.im_span / self.height
    }
}

/// Return the number of iterations before the orbit of `c` escapes.
///
/// Starting from `z = 0`, `z` is replaced by `z * z + c` until `|z| > 2`.
/// The result counts the iterates that stayed inside the circle, so a point
/// with `|c| > 2` has value 0 and a point that never escapes has `max_iter`.
pub fn mandel_value(c: Complex64, max_iter: u32) -> u32 {
    let mut iter = 0;
    let mut z = Complex64::new(0.0, 0.0);
    while iter < max_iter {
        z = z * z + c;
        // |z|^2 > 4, no square root needed
        if z.norm_sqr() > 4.0 {
            break;
        }
        iter += 1;
    }
    iter
}

/// The colors of a rendered image, row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Rgb<u8>>,
}

impl Raster {
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }
    pub fn pixels(&self) -> &[Rgb<u8>] {
        self.pixels.as_slice()
    }
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb<u8>> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }
    pub fn write_to(&self, image: &mut BmpImage) {
        for (y, row) in self.pixels.chunks(self.width).enumerate() {
            for (x, color) in row.iter().enumerate() {
                image.set_pixel(x as u32, y as u32, *color);
            }
        }
    }

    fn blank(mapping: &Mapping) -> Raster {
        Raster {
            width: mapping.width,
            height: mapping.height,
            pixels: vec![Rgb([0, 0, 0]); mapping.width * mapping.height],
        }
    }
}

// Fill one row of the image with the colors of the mandelbrot values.
fn fill_row(
    line: &mut [Rgb<u8>],
    wy: usize,
    converter: &PixelToPlane,
    max: u32,
    coloring: &dyn Coloring,
) {
    let y = converter.cvt_y(wy);
    for (wx, pixel) in line.iter_mut().enumerate() {
        let c = Complex64::new(converter.cvt_x(wx), y);
        let mv = mandel_value(c, max);
        *pixel = coloring.get_color(mv, max);
    }
}

/// Render the image on the calling thread.
pub fn render_sequential(
    mapping: &Mapping,
    coloring: &dyn Coloring,
    progress: Option<&Progress>,
) -> Result<Raster> {
    mapping.validate()?;
    let mut raster = Raster::blank(mapping);
    let converter = PixelToPlane::from_mapping(mapping);
    let max = mapping.iteration_depth;
    for (wy, line) in raster.pixels.chunks_mut(mapping.width).enumerate() {
        fill_row(line, wy, &converter, max, coloring);
        if let Some(progress) = progress {
            progress.row_done();
        }
    }
    Ok(raster)
}

/// Render the image with a pool of `threads` workers, one task per row.
/// Rows are disjoint slices of the buffer, so the result is identical to
/// `render_sequential`.
pub fn render_parallel(
    mapping: &Mapping,
    coloring: &dyn Coloring,
    threads: usize,
    progress: Option<&Progress>,
) -> Result<Raster> {
    mapping.validate()?;
    if threads == 0 {
        return Err(MandelError::InvalidThreads);
    }
    let mut raster = Raster::blank(mapping);
    let converter = PixelToPlane::from_mapping(mapping);
    let converter = &converter;
    let max = mapping.iteration_depth;
    // A row is the smallest unit of work.
    let threads = threads.min(mapping.height).min(u32::MAX as usize) as u32;
    debug!("rendering {} rows with {} threads", mapping.height, threads);
    let mut pool = Pool::new(threads);
    pool.scoped(|scope| {
        for (wy, line) in raster.pixels.chunks_mut(mapping.width).enumerate() {
            scope.execute(move || {
                fill_row(line, wy, converter, max, coloring);
                if let Some(progress) = progress {
                    progress.row_done();
                }
            });
        }
    });
    Ok(raster)
}

/// Everything needed to render one image
#[derive(Clone)]
pub struct RenderReq {
    pub mapping: Mapping,
    pub coloring: Box<dyn Coloring>,
}

impl RenderReq {
    pub fn new(mapping: Mapping, coloring: Box<dyn Coloring>) -> RenderReq {
        RenderReq { mapping, coloring }
    }
    /// One thread renders in place, more threads use a worker pool.
    pub fn render(&self, threads: usize, progress: Option<&Progress>) -> Result<Raster> {
        if threads == 1 {
            render_sequential(&self.mapping, self.coloring.as_ref(), progress)
        } else {
            render_parallel(&self.mapping, self.coloring.as_ref(), threads, progress)
        }
    }
}
