use super::color::Color;
use super::error::PaletteError;
use super::image::{self, Image};

/// Largest number of colors a generated palette may hold.
pub const MAX_COLORS: usize = 1 << 16;

/// Accepts a requested color count if it was computed without overflow and
/// stays within `MAX_COLORS`.
pub(crate) fn checked_color_count(count: Option<usize>) -> Result<usize, PaletteError> {
    count
        .filter(|count| *count <= MAX_COLORS)
        .ok_or(PaletteError::TooManyColors { max: MAX_COLORS })
}

/// An ordered list of colors. Order is meaningful: nearest-color lookups favor
/// the earliest entry on ties, and palette maps pair colors by position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Palette {
        Palette { colors }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn contains(&self, color: &Color) -> bool {
        self.colors.contains(color)
    }

    /// Closest palette entry by squared RGB distance. The first color wins ties.
    pub fn nearest(&self, color: &Color) -> Option<Color> {
        let mut best: Option<(i64, Color)> = None;
        for candidate in &self.colors {
            let dist = color.sq_dist(candidate);
            match best {
                Some((min, _)) if dist >= min => {}
                _ => best = Some((dist, *candidate)),
            }
        }
        best.map(|(_, c)| c)
    }

    /// Replaces every pixel with its nearest palette color.
    pub fn apply(&self, image: &Image) -> Result<Image, PaletteError> {
        if self.is_empty() {
            return Err(PaletteError::Empty);
        }
        image.try_map(|c| self.nearest(&c).ok_or(PaletteError::Empty))
    }

    /// Copy sorted by descending luminosity. The sort is stable.
    pub fn sorted_by_luminosity(&self) -> Palette {
        let mut colors = self.colors.clone();
        colors.sort_by(|a, b| b.luminosity().cmp(&a.luminosity()));
        Palette { colors }
    }

    pub fn invert(&self) -> Palette {
        Palette {
            colors: self.colors.iter().map(|c| c.invert()).collect(),
        }
    }

    /// Renders the palette as a grid of square swatches, `swatch_pixels` wide,
    /// filled left to right, then top to bottom.
    pub fn make_image(&self, swatch_pixels: usize) -> Result<Image, PaletteError> {
        let (cols, rows) = swatch_grid(self.len()).ok_or(PaletteError::Empty)?;
        // A saturated side always fails the area check.
        let (width, height) = (cols.saturating_mul(swatch_pixels), rows.saturating_mul(swatch_pixels));
        image::checked_area(width, height)?;

        let colors = &self.colors;
        Ok(Image::from_fn(
            width,
            height,
            |x, y| {
                let col = x / swatch_pixels;
                let row = y / swatch_pixels;
                colors[row * cols + col]
            },
        ))
    }
}

impl From<Vec<Color>> for Palette {
    fn from(colors: Vec<Color>) -> Self {
        Palette::new(colors)
    }
}

/// Grid dimensions `(columns, rows)` for `n` swatches, with `columns * rows == n`.
/// Columns is the largest divisor of `n` not above its square root, so a prime
/// count lays out as a single column.
pub fn swatch_grid(n: usize) -> Option<(usize, usize)> {
    if n == 0 {
        return None;
    }
    let mut cols = 1;
    let mut candidate = 1;
    while candidate * candidate <= n {
        if n % candidate == 0 {
            cols = candidate;
        }
        candidate += 1;
    }
    Some((cols, n / cols))
}
