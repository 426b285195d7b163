//! Palette generators. Each one is a pure function of a seed color (or two)
//! and a few numeric settings.

use super::color::{Color, BLACK};
use super::error::PaletteError;
use super::gradient::{self, GradientDirection};
use super::palette::{checked_color_count, Palette};
use strum_macros::{Display, EnumIter, EnumString};

/// Ramps from black through `from` to white along luminosity in `steps` colors. Disabling
/// `include_black`/`include_white` drops that end of the ramp while still
/// returning `steps` colors.
pub fn monochrome(
    from: &Color,
    steps: usize,
    include_black: bool,
    include_white: bool,
) -> Result<Palette, PaletteError> {
    match checked_color_count(Some(steps))? {
        0 => return Ok(Palette::default()),
        1 => return Ok(Palette::new(vec![from.with_alpha(255)])),
        _ => {}
    }

    let skip_start = usize::from(!include_black);
    let skip_end = usize::from(!include_white);
    let total = steps + skip_start + skip_end;

    let base = from.luminosity() as f64;
    let right_span = 255.0 - base;
    let channels = [from.r as f64, from.g as f64, from.b as f64];
    let scaled = |amount: f64, channel: f64, span: f64| {
        if span > 0.0 {
            amount * channel / span
        } else {
            0.0
        }
    };

    let colors = (0..total)
        .map(|i| {
            let luminosity = i as f64 * 255.0 / (total - 1) as f64;
            let [r, g, b] = if luminosity < base {
                channels.map(|c| scaled(luminosity, c, base))
            } else {
                let adj = luminosity - base;
                channels.map(|c| c + scaled(adj, 255.0 - c, right_span))
            };
            Color::clamped(r.floor() as i64, g.floor() as i64, b.floor() as i64, 255)
        })
        .skip(skip_start)
        .take(steps)
        .collect();
    Ok(Palette::new(colors))
}

/// `steps` colors evenly spaced from `color1` to `color2`, both included.
pub fn duotone(color1: &Color, color2: &Color, steps: usize) -> Result<Palette, PaletteError> {
    let palette = match checked_color_count(Some(steps))? {
        0 => Palette::default(),
        1 => Palette::new(vec![*color1]),
        _ => Palette::new(
            (0..steps)
                .map(|i| gradient::interpolate(color1, color2, (steps - 1) as f64, i as f64))
                .collect(),
        ),
    };
    Ok(palette)
}

/// A `steps` x `steps` grid, row-major, spanning `color1` and `color2` along the
/// top edge and black and white along the bottom.
pub fn duotone_square(color1: &Color, color2: &Color, steps: usize) -> Result<Palette, PaletteError> {
    let mut colors = Vec::with_capacity(checked_color_count(steps.checked_mul(steps))?);
    for y in 0..steps {
        for x in 0..steps {
            colors.push(gradient::sample(
                GradientDirection::TwoColorBw,
                color1,
                color2,
                x,
                y,
                steps,
                steps,
            ));
        }
    }
    Ok(Palette::new(colors))
}

/// Splits the RGB cube `divisions` times along each axis, giving `divisions³`
/// colors ordered by red, then green, then blue.
pub fn subdivide(divisions: usize) -> Result<Palette, PaletteError> {
    let count = checked_color_count(divisions.checked_pow(3))?;
    match divisions {
        0 => return Ok(Palette::default()),
        1 => return Ok(Palette::new(vec![BLACK])),
        _ => {}
    }
    let scale = 255 / (divisions as i64 - 1);
    let mut colors = Vec::with_capacity(count);
    for r in 0..divisions as i64 {
        for g in 0..divisions as i64 {
            for b in 0..divisions as i64 {
                colors.push(Color::clamped(r * scale, g * scale, b * scale, 255));
            }
        }
    }
    Ok(Palette::new(colors))
}

/// Classic color-wheel harmonies, built by rotating the seed's HSL hue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ColorScheme {
    Analogous,
    Diad,
    Complementary,
    SplitComplementary,
    Triadic,
}

impl ColorScheme {
    /// Hue offsets in degrees; the seed itself is always one of them.
    pub fn rotations(&self) -> &'static [f64] {
        match self {
            ColorScheme::Analogous => &[-30.0, 0.0, 30.0],
            ColorScheme::Diad => &[0.0, 60.0],
            ColorScheme::Complementary => &[0.0, 180.0],
            ColorScheme::SplitComplementary => &[0.0, 150.0, 210.0],
            ColorScheme::Triadic => &[0.0, 120.0, 240.0],
        }
    }

    pub fn generate(&self, seed: &Color) -> Palette {
        Palette::new(
            self.rotations()
                .iter()
                .map(|&degrees| {
                    if degrees == 0.0 {
                        *seed
                    } else {
                        seed.rotate_hue(degrees)
                    }
                })
                .collect(),
        )
    }
}
