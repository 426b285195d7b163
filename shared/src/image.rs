use super::color::Color;
use super::error::ImageError;

/// Largest number of pixels an image may hold.
pub const MAX_PIXELS: usize = 1 << 26;

/// Pixel count of a `width` x `height` image, or `TooLarge` past `MAX_PIXELS`.
pub fn checked_area(width: usize, height: usize) -> Result<usize, ImageError> {
    width
        .checked_mul(height)
        .filter(|area| *area <= MAX_PIXELS)
        .ok_or(ImageError::TooLarge {
            width,
            height,
            max: MAX_PIXELS,
        })
}

/// Decoded RGBA pixels as exchanged with whatever reads and writes image files.
/// Rows are stored top to bottom, four bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

/// A 2-dimensional grid of colors. Pixels are stored and always traversed in
/// row-major order: `y` outer, `x` inner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Image {
    /// A transparent black image.
    pub fn new(width: usize, height: usize) -> Image {
        Image::filled(width, height, Color::default())
    }

    pub fn filled(width: usize, height: usize, color: Color) -> Image {
        Image {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Image
    where
        F: FnMut(usize, usize) -> Color,
    {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Image {
            width,
            height,
            pixels,
        }
    }

    /// Builds an image from row-major pixels. Fails if the count doesn't match.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> Result<Image, ImageError> {
        let expected = checked_area(width, height)?;
        if pixels.len() != expected {
            return Err(ImageError::BufferLength {
                width,
                height,
                expected,
                found: pixels.len(),
            });
        }
        Ok(Image {
            width,
            height,
            pixels,
        })
    }

    pub fn from_rgba(width: usize, height: usize, data: &[u8]) -> Result<Image, ImageError> {
        let expected = checked_area(width, height)? * 4;
        if data.len() != expected {
            return Err(ImageError::BufferLength {
                width,
                height,
                expected,
                found: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(4)
            .map(|px| Color::new(px[0], px[1], px[2], px[3]))
            .collect();
        Ok(Image {
            width,
            height,
            pixels,
        })
    }

    pub fn from_buffer(buffer: &PixelBuffer) -> Result<Image, ImageError> {
        Image::from_rgba(buffer.width, buffer.height, &buffer.data)
    }

    pub fn to_rgba(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixels.len() * 4);
        for c in &self.pixels {
            data.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        data
    }

    pub fn to_buffer(&self) -> PixelBuffer {
        PixelBuffer {
            width: self.width,
            height: self.height,
            data: self.to_rgba(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, ImageError> {
        if x >= self.width || y >= self.height {
            return Err(ImageError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Result<Color, ImageError> {
        let idx = self.index(x, y)?;
        Ok(self.pixels[idx])
    }

    pub fn set(&mut self, x: usize, y: usize, color: Color) -> Result<(), ImageError> {
        let idx = self.index(x, y)?;
        self.pixels[idx] = color;
        Ok(())
    }

    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Color, usize, usize),
    {
        for (idx, color) in self.pixels.iter().enumerate() {
            f(*color, idx % self.width, idx / self.width);
        }
    }

    /// Returns a new image of the same size with `f` applied to every pixel.
    pub fn map<F>(&self, mut f: F) -> Image
    where
        F: FnMut(Color, usize, usize) -> Color,
    {
        let width = self.width;
        let pixels = self
            .pixels
            .iter()
            .enumerate()
            .map(|(idx, color)| f(*color, idx % width, idx / width))
            .collect();
        Image {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    pub fn try_map<F, E>(&self, mut f: F) -> Result<Image, E>
    where
        F: FnMut(Color) -> Result<Color, E>,
    {
        let pixels = self
            .pixels
            .iter()
            .map(|color| f(*color))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Image {
            width: self.width,
            height: self.height,
            pixels,
        })
    }
}
