use super::error::ColorError;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// An RGBA color with 8 bits per channel. Channels are stored as `u8`, so every
/// constructor that accepts wider or fractional input clamps into [0, 255].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const WHITE: Color = Color::rgb(255, 255, 255);

fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

fn unit_to_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    clamp_channel((value * 255.0).round() as i64)
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 255 }
    }

    /// Builds a color from out-of-range channel values by clamping each one.
    pub fn clamped(r: i64, g: i64, b: i64, a: i64) -> Color {
        Color {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_channel(a),
        }
    }

    /// Opaque color from channels in the unit range.
    pub fn from_unit_rgb(r: f64, g: f64, b: f64) -> Color {
        Color::rgb(unit_to_channel(r), unit_to_channel(g), unit_to_channel(b))
    }

    pub fn grey(level: u8) -> Color {
        Color::rgb(level, level, level)
    }

    pub fn with_alpha(self, a: u8) -> Color {
        Color { a, ..self }
    }

    pub fn from_hex(hex: &str) -> Result<Color, ColorError> {
        let invalid = || ColorError::InvalidHex(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Perceptual luminosity, `0.3r + 0.59g + 0.11b` rounded.
    pub fn luminosity(&self) -> u8 {
        let l = 0.3 * self.r as f64 + 0.59 * self.g as f64 + 0.11 * self.b as f64;
        clamp_channel(l.round() as i64)
    }

    /// Squared Euclidean distance over the RGB channels. Alpha is ignored.
    pub fn sq_dist(&self, other: &Color) -> i64 {
        let dr = other.r as i64 - self.r as i64;
        let dg = other.g as i64 - self.g as i64;
        let db = other.b as i64 - self.b as i64;
        dr * dr + dg * dg + db * db
    }

    pub fn invert(&self) -> Color {
        Color::new(255 - self.r, 255 - self.g, 255 - self.b, self.a)
    }

    pub fn greyscale(&self) -> Color {
        Color::grey(self.luminosity()).with_alpha(self.a)
    }

    pub fn sepia(&self) -> Color {
        let (r, g, b) = (self.r as f64, self.g as f64, self.b as f64);
        Color::clamped(
            (0.393 * r + 0.769 * g + 0.189 * b).round() as i64,
            (0.349 * r + 0.686 * g + 0.168 * b).round() as i64,
            (0.272 * r + 0.534 * g + 0.131 * b).round() as i64,
            self.a as i64,
        )
    }

    /// Mixes `percent` (0 to 100) of `other` into this color, all four channels.
    pub fn blend(&self, other: &Color, percent: f64) -> Color {
        let p = (percent / 100.0).clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 * (1.0 - p) + b as f64 * p).round() as i64;
        Color::clamped(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    /// Channels are truncated, so the midpoint of 0 and 255 is 127.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).floor() as i64;
        Color::clamped(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    fn unit_rgb(&self) -> (f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        )
    }

    fn hue(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
        if delta == 0.0 {
            return 0.0;
        }
        let h = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        h / 6.0
    }

    /// Hue, saturation and lightness, each in [0, 1].
    pub fn hsl(&self) -> (f64, f64, f64) {
        let (r, g, b) = self.unit_rgb();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let delta = max - min;
        if delta == 0.0 {
            return (0.0, 0.0, l);
        }
        let s = if l > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };
        (Color::hue(r, g, b, max, delta), s, l)
    }

    pub fn from_hsl(h: f64, s: f64, l: f64) -> Color {
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);
        if s == 0.0 {
            return Color::from_unit_rgb(l, l, l);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Color::from_unit_rgb(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    }

    /// Hue, saturation and value, each in [0, 1].
    pub fn hsv(&self) -> (f64, f64, f64) {
        let (r, g, b) = self.unit_rgb();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let s = if max == 0.0 { 0.0 } else { delta / max };
        (Color::hue(r, g, b, max, delta), s, max)
    }

    pub fn from_hsv(h: f64, s: f64, v: f64) -> Color {
        let h = h.rem_euclid(1.0) * 6.0;
        let s = s.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - f * s);
        let t = v * (1.0 - (1.0 - f) * s);
        match sector as u8 {
            0 => Color::from_unit_rgb(v, t, p),
            1 => Color::from_unit_rgb(q, v, p),
            2 => Color::from_unit_rgb(p, v, t),
            3 => Color::from_unit_rgb(p, q, v),
            4 => Color::from_unit_rgb(t, p, v),
            _ => Color::from_unit_rgb(v, p, q),
        }
    }

    /// Hue, saturation and intensity, each in [0, 1].
    pub fn hsi(&self) -> (f64, f64, f64) {
        let (r, g, b) = self.unit_rgb();
        let i = (r + g + b) / 3.0;
        if i == 0.0 {
            return (0.0, 0.0, 0.0);
        }
        let s = 1.0 - r.min(g).min(b) / i;
        let num = ((r - g) + (r - b)) / 2.0;
        let den = ((r - g) * (r - g) + (r - b) * (g - b)).sqrt();
        if den == 0.0 {
            return (0.0, s, i);
        }
        let theta = (num / den).clamp(-1.0, 1.0).acos();
        let h = if b > g { 2.0 * PI - theta } else { theta };
        (h / (2.0 * PI), s, i)
    }

    pub fn from_hsi(h: f64, s: f64, i: f64) -> Color {
        let s = s.clamp(0.0, 1.0);
        let i = i.clamp(0.0, 1.0);
        let third = 2.0 * PI / 3.0;
        let mut h = h.rem_euclid(1.0) * 2.0 * PI;
        let lift = |h: f64| i * (1.0 + s * h.cos() / (PI / 3.0 - h).cos());
        if h < third {
            let b = i * (1.0 - s);
            let r = lift(h);
            Color::from_unit_rgb(r, 3.0 * i - (r + b), b)
        } else if h < 2.0 * third {
            h -= third;
            let r = i * (1.0 - s);
            let g = lift(h);
            Color::from_unit_rgb(r, g, 3.0 * i - (r + g))
        } else {
            h -= 2.0 * third;
            let g = i * (1.0 - s);
            let b = lift(h);
            Color::from_unit_rgb(3.0 * i - (g + b), g, b)
        }
    }

    /// Rotates the HSL hue by `degrees`, keeping saturation, lightness and alpha.
    pub fn rotate_hue(&self, degrees: f64) -> Color {
        let (h, s, l) = self.hsl();
        Color::from_hsl(h + degrees / 360.0, s, l).with_alpha(self.a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}
