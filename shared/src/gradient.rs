use super::color::{Color, BLACK, WHITE};
use super::error::ImageError;
use super::image::{self, Image};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum GradientDirection {
    /// Top to bottom.
    Vertical,
    /// Left to right.
    Horizontal,
    /// Top left to bottom right.
    DiagonalDown,
    /// Top right to bottom left.
    DiagonalUp,
    /// Both colors along the top edge, black and white along the bottom.
    TwoColorBw,
}

/// `color1` at `t = 0`, `color2` at `t = t_max`.
pub fn interpolate(color1: &Color, color2: &Color, t_max: f64, t: f64) -> Color {
    if t_max <= 0.0 {
        return *color1;
    }
    color1.lerp(color2, t / t_max)
}

/// Distance covered by pixel coordinates along an axis of `n` pixels.
fn span(n: usize) -> f64 {
    n.saturating_sub(1).max(1) as f64
}

/// Color of pixel `(x, y)` in a `width` x `height` gradient.
pub fn sample(
    direction: GradientDirection,
    color1: &Color,
    color2: &Color,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> Color {
    let (x, y) = (x as f64, y as f64);
    let (w, h) = (span(width), span(height));
    match direction {
        GradientDirection::Vertical => interpolate(color1, color2, h, y),
        GradientDirection::Horizontal => interpolate(color1, color2, w, x),
        GradientDirection::DiagonalDown => interpolate(color1, color2, 2.0, x / w + y / h),
        GradientDirection::DiagonalUp => interpolate(color1, color2, 2.0, (w - x) / w + y / h),
        GradientDirection::TwoColorBw => {
            let top = interpolate(color1, color2, w, x);
            let bottom = interpolate(&BLACK, &WHITE, w, x);
            interpolate(&top, &bottom, h, y)
        }
    }
}

pub fn render(
    direction: GradientDirection,
    color1: &Color,
    color2: &Color,
    width: usize,
    height: usize,
) -> Result<Image, ImageError> {
    image::checked_area(width, height)?;
    Ok(Image::from_fn(width, height, |x, y| {
        sample(direction, color1, color2, x, y, width, height)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    #[test]
    fn vertical_reaches_both_ends() {
        let image = render(GradientDirection::Vertical, &RED, &BLUE, 2, 3).unwrap();
        assert_eq!(image.get(1, 0).unwrap(), RED);
        assert_eq!(image.get(0, 1).unwrap(), Color::rgb(127, 0, 127));
        assert_eq!(image.get(1, 2).unwrap(), BLUE);
    }

    #[test]
    fn horizontal_varies_along_x() {
        let image = render(GradientDirection::Horizontal, &BLACK, &WHITE, 3, 1).unwrap();
        assert_eq!(image.pixels(), &[BLACK, Color::grey(127), WHITE]);
    }

    #[test]
    fn diagonals_run_corner_to_corner() {
        let down = render(GradientDirection::DiagonalDown, &BLACK, &WHITE, 3, 3).unwrap();
        assert_eq!(down.get(0, 0).unwrap(), BLACK);
        assert_eq!(down.get(2, 2).unwrap(), WHITE);
        assert_eq!(down.get(2, 0).unwrap(), Color::grey(127));
        let up = render(GradientDirection::DiagonalUp, &BLACK, &WHITE, 3, 3).unwrap();
        assert_eq!(up.get(2, 0).unwrap(), BLACK);
        assert_eq!(up.get(0, 2).unwrap(), WHITE);
    }

    #[test]
    fn two_color_bw_has_four_corners() {
        let image = render(GradientDirection::TwoColorBw, &RED, &BLUE, 4, 4).unwrap();
        assert_eq!(image.get(0, 0).unwrap(), RED);
        assert_eq!(image.get(3, 0).unwrap(), BLUE);
        assert_eq!(image.get(0, 3).unwrap(), BLACK);
        assert_eq!(image.get(3, 3).unwrap(), WHITE);
    }

    #[test]
    fn renders_degenerate_sizes() {
        for direction in GradientDirection::iter() {
            let image = render(direction, &RED, &BLUE, 1, 1).unwrap();
            assert_eq!((image.width(), image.height()), (1, 1), "{}", direction);
            assert!(render(direction, &RED, &BLUE, 0, 5).unwrap().pixels().is_empty());
        }
        assert_eq!(render(GradientDirection::Vertical, &RED, &BLUE, 1, 1).unwrap().get(0, 0).unwrap(), RED);
    }

    #[test]
    fn refuses_oversized_gradients() {
        assert!(matches!(
            render(GradientDirection::Vertical, &RED, &BLUE, usize::MAX, 2),
            Err(ImageError::TooLarge { .. })
        ));
        assert!(render(GradientDirection::Vertical, &RED, &BLUE, 1 << 20, 1 << 20).is_err());
    }

    #[test]
    fn parses_direction_names() {
        assert_eq!("diagonal_up".parse::<GradientDirection>().unwrap(), GradientDirection::DiagonalUp);
        assert_eq!(GradientDirection::TwoColorBw.to_string(), "two_color_bw");
    }
}
