use dyn_clone::DynClone;
use image::Rgb;

pub trait Coloring: DynClone + Sync + Send {
    /// Get the color of a pixel, given its mandelbrot value
    /// and the maximum mandelbrot value
    fn get_color(&self, v: u32, max: u32) -> Rgb<u8>;
}

dyn_clone::clone_trait_object!(Coloring);

#[derive(Clone)]
pub struct Grayscale {}

/// A budget of 0 gives black rather than dividing by zero.
impl Coloring for Grayscale {
    fn get_color(&self, v: u32, max: u32) -> Rgb<u8> {
        if max == 0 {
            return Rgb([0, 0, 0]);
        }
        let v = v.min(max) as u64;
        let gray = 255 - (v * 255 / max as u64) as u8;
        Rgb([gray, gray, gray])
    }
}

/// A cheap hue ramp, precomputed for every value in `0..=max_iter`.
#[derive(Clone)]
pub struct IndexedRamp {
    table: Vec<Rgb<u8>>,
}

impl IndexedRamp {
    pub fn new(max_iter: u32) -> IndexedRamp {
        let table = (0..=max_iter as u64)
            .map(|i| {
                // Channels above 255 wrap to their low byte.
                let g = ((i << 8) - i) / (i + 8);
                Rgb([i as u8, g as u8, 255])
            })
            .collect();
        IndexedRamp { table }
    }
    pub fn table(&self) -> &[Rgb<u8>] {
        self.table.as_slice()
    }
}

/// Values past the end of the table are black.
impl Coloring for IndexedRamp {
    fn get_color(&self, v: u32, _max: u32) -> Rgb<u8> {
        match self.table.get(v as usize) {
            Some(color) => *color,
            None => Rgb([0, 0, 0]),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Grayscale,
    Indexed,
}

pub struct ColorInfo {
    names: [&'static str; 2],
    modes: [ColorMode; 2],
}

impl ColorInfo {
    pub fn new() -> ColorInfo {
        ColorInfo {
            names: ["grayscale", "indexed"],
            modes: [ColorMode::Grayscale, ColorMode::Indexed],
        }
    }
    pub fn name(&self, mode: ColorMode) -> &'static str {
        let i = self
            .modes
            .iter()
            .position(|m| *m == mode)
            .unwrap_or_default();
        self.names[i]
    }
    /// Build the coloring for a mode. The indexed ramp is computed here, once,
    /// before any pixel is rendered.
    pub fn scheme(&self, mode: ColorMode, max_iter: u32) -> Box<dyn Coloring> {
        match mode {
            ColorMode::Grayscale => Box::new(Grayscale {}),
            ColorMode::Indexed => Box::new(IndexedRamp::new(max_iter)),
        }
    }
}

impl Default for ColorInfo {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(v: u32, max: u32) -> u8 {
        Grayscale {}.get_color(v, max).0[0]
    }

    #[test]
    fn grayscale_samples() {
        for max in [10u32, 60, 80, 255, 1000] {
            for v in [0, 1, max / 2, max] {
                let expected = 255 - (v as u64 * 255 / max as u64) as u8;
                assert_eq!(gray(v, max), expected, "v={v} max={max}");
            }
        }
        assert_eq!(gray(0, 60), 255);
        assert_eq!(gray(60, 60), 0);
        assert_eq!(gray(30, 60), 128);
        assert_eq!(gray(1, 60), 251);
    }

    #[test]
    fn grayscale_has_equal_channels() {
        let Rgb([r, g, b]) = Grayscale {}.get_color(7, 13);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn out_of_range_values_are_black() {
        assert_eq!(Grayscale {}.get_color(3, 0), Rgb([0, 0, 0]));
        assert_eq!(IndexedRamp::new(5).get_color(6, 5), Rgb([0, 0, 0]));
    }

    #[test]
    fn ramp_size_and_first_entry() {
        for max in [1u32, 10, 60, 300] {
            let ramp = IndexedRamp::new(max);
            assert_eq!(ramp.table().len(), max as usize + 1);
            assert_eq!(ramp.table()[0], Rgb([0, 0, 255]));
        }
    }

    #[test]
    fn ramp_entries() {
        let ramp = IndexedRamp::new(60);
        // (8 * 255) / 16
        assert_eq!(ramp.table()[8], Rgb([8, 127, 255]));
        // (60 * 255) / 68
        assert_eq!(ramp.get_color(60, 60), Rgb([60, 225, 255]));
    }

    #[test]
    fn ramp_wraps_large_counts() {
        let ramp = IndexedRamp::new(300);
        assert_eq!(ramp.table()[256].0[0], 0);
        assert_eq!(ramp.table()[300].0[0], 44);
    }

    #[test]
    fn scheme_by_mode() {
        let info = ColorInfo::new();
        assert_eq!(info.name(ColorMode::Grayscale), "grayscale");
        assert_eq!(info.name(ColorMode::Indexed), "indexed");
        let indexed = info.scheme(ColorMode::Indexed, 20);
        assert_eq!(indexed.get_color(0, 20), Rgb([0, 0, 255]));
        let cloned = dyn_clone::clone_box(&*indexed);
        assert_eq!(cloned.get_color(20, 20), indexed.get_color(20, 20));
        let gray = info.scheme(ColorMode::Grayscale, 20);
        assert_eq!(gray.get_color(20, 20), Rgb([0, 0, 0]));
    }
}
