use super::color::Color;
use super::combinatorics::{n_choose_k, permute};
use super::error::PaletteError;
use super::image::Image;
use super::palette::Palette;

/// Largest destination palette `nearest_brute_force` will search.
pub const BRUTE_FORCE_MAX_COLORS: usize = 8;

/// A positional correspondence between two equal-length palettes: `from[i]`
/// maps to `to[i]`. Mapping a whole palette (instead of taking each pixel's
/// nearest color) keeps distinct source colors from collapsing onto one
/// destination color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteMap {
    from: Vec<Color>,
    to: Vec<Color>,
}

impl PaletteMap {
    /// Pairs the palettes exactly as given.
    pub fn direct(from: &Palette, to: &Palette) -> Result<PaletteMap, PaletteError> {
        if from.len() != to.len() {
            return Err(PaletteError::LengthMismatch {
                from: from.len(),
                to: to.len(),
            });
        }
        Ok(PaletteMap {
            from: from.colors().to_vec(),
            to: to.colors().to_vec(),
        })
    }

    /// Sorts both palettes by descending luminosity and pairs them up.
    pub fn by_luminosity(from: &Palette, to: &Palette) -> Result<PaletteMap, PaletteError> {
        PaletteMap::direct(&from.sorted_by_luminosity(), &to.sorted_by_luminosity())
    }

    /// Repeatedly pairs the closest remaining source and destination colors.
    /// `to` may hold more colors than `from`; the extras go unused.
    pub fn nearest_greedy(from: &Palette, to: &Palette) -> Result<PaletteMap, PaletteError> {
        check_sizes(from, to)?;
        let mut src: Vec<usize> = (0..from.len()).collect();
        let mut dst: Vec<usize> = (0..to.len()).collect();
        let mut chosen = vec![Color::default(); from.len()];
        while !src.is_empty() {
            let mut best: Option<(i64, usize, usize)> = None;
            for (si, &s) in src.iter().enumerate() {
                for (di, &d) in dst.iter().enumerate() {
                    let dist = from.colors()[s].sq_dist(&to.colors()[d]);
                    if best.map_or(true, |(min, _, _)| dist < min) {
                        best = Some((dist, si, di));
                    }
                }
            }
            let (_, si, di) = match best {
                Some(pick) => pick,
                None => break,
            };
            chosen[src.remove(si)] = to.colors()[dst.remove(di)];
        }
        Ok(PaletteMap {
            from: from.colors().to_vec(),
            to: chosen,
        })
    }

    /// Tries every subset of `to` against every ordering of `from` and keeps the
    /// pairing with the least total error. Factorial in the palette size, so
    /// `to` may hold at most `BRUTE_FORCE_MAX_COLORS` colors.
    pub fn nearest_brute_force(from: &Palette, to: &Palette) -> Result<PaletteMap, PaletteError> {
        check_sizes(from, to)?;
        if to.len() > BRUTE_FORCE_MAX_COLORS {
            return Err(PaletteError::TooManyColors {
                max: BRUTE_FORCE_MAX_COLORS,
            });
        }
        let mut best: Option<(i64, PaletteMap)> = None;
        let orderings = permute(from.len());
        for subset in n_choose_k(to.len(), from.len()) {
            for ordering in &orderings {
                let candidate = PaletteMap {
                    from: ordering.iter().map(|&i| from.colors()[i]).collect(),
                    to: subset.iter().map(|&i| to.colors()[i]).collect(),
                };
                let error = candidate.compute_error();
                if best.as_ref().map_or(true, |(min, _)| error < *min) {
                    best = Some((error, candidate));
                }
            }
        }
        Ok(best.map(|(_, m)| m).unwrap_or(PaletteMap {
            from: Vec::new(),
            to: Vec::new(),
        }))
    }

    pub fn from_colors(&self) -> &[Color] {
        &self.from
    }

    pub fn to_colors(&self) -> &[Color] {
        &self.to
    }

    pub fn len(&self) -> usize {
        self.from.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_empty()
    }

    /// Destination for an exact source color.
    pub fn get(&self, color: &Color) -> Result<Color, PaletteError> {
        self.from
            .iter()
            .position(|c| c == color)
            .map(|idx| self.to[idx])
            .ok_or(PaletteError::MissingColor(*color))
    }

    /// Maps every pixel. Fails on the first pixel whose color isn't a source color.
    pub fn apply(&self, image: &Image) -> Result<Image, PaletteError> {
        image.try_map(|c| self.get(&c))
    }

    /// Total squared RGB distance between paired colors.
    pub fn compute_error(&self) -> i64 {
        self.from
            .iter()
            .zip(self.to.iter())
            .map(|(a, b)| a.sq_dist(b))
            .sum()
    }
}

fn check_sizes(from: &Palette, to: &Palette) -> Result<(), PaletteError> {
    if to.len() < from.len() {
        return Err(PaletteError::NotEnoughColors {
            from: from.len(),
            to: to.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, WHITE};

    fn greys(levels: &[u8]) -> Palette {
        Palette::new(levels.iter().map(|l| Color::grey(*l)).collect())
    }

    #[test]
    fn by_luminosity_pairs_sorted_palettes() {
        let from = greys(&[10, 200, 90]);
        let to = Palette::new(vec![Color::rgb(255, 0, 0), WHITE, BLACK]);
        let m = PaletteMap::by_luminosity(&from, &to).unwrap();
        assert_eq!(m.get(&Color::grey(200)).unwrap(), WHITE);
        assert_eq!(m.get(&Color::grey(90)).unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(m.get(&Color::grey(10)).unwrap(), BLACK);
    }

    #[test]
    fn by_luminosity_is_a_bijection_on_source_colors() {
        let from = greys(&[0, 50, 100, 150]);
        let to = greys(&[1, 2, 3, 4]);
        let m = PaletteMap::by_luminosity(&from, &to).unwrap();
        let mut targets: Vec<Color> = from.colors().iter().map(|c| m.get(c).unwrap()).collect();
        targets.sort_by_key(|c| c.r);
        assert_eq!(targets, to.colors().to_vec());
    }

    #[test]
    fn rejects_length_mismatch() {
        assert_eq!(
            PaletteMap::by_luminosity(&greys(&[1, 2]), &greys(&[1])),
            Err(PaletteError::LengthMismatch { from: 2, to: 1 })
        );
    }

    #[test]
    fn missing_colors_fail_lookup() {
        let m = PaletteMap::direct(&greys(&[1]), &greys(&[2])).unwrap();
        assert_eq!(m.get(&BLACK), Err(PaletteError::MissingColor(BLACK)));
        let image = Image::filled(2, 2, Color::grey(1));
        assert_eq!(m.apply(&image).unwrap(), Image::filled(2, 2, Color::grey(2)));
        assert!(m.apply(&Image::filled(1, 1, WHITE)).is_err());
    }

    #[test]
    fn greedy_and_brute_force_pick_closest_pairs() {
        let from = greys(&[0, 100]);
        let to = greys(&[95, 250, 5]);
        let greedy = PaletteMap::nearest_greedy(&from, &to).unwrap();
        assert_eq!(greedy.get(&Color::grey(0)).unwrap(), Color::grey(5));
        assert_eq!(greedy.get(&Color::grey(100)).unwrap(), Color::grey(95));
        let brute = PaletteMap::nearest_brute_force(&from, &to).unwrap();
        assert_eq!(brute.compute_error(), greedy.compute_error());
        assert_eq!(brute.get(&Color::grey(100)).unwrap(), Color::grey(95));
        assert!(PaletteMap::nearest_greedy(&to, &from).is_err());
    }

    #[test]
    fn brute_force_refuses_large_palettes() {
        let from = greys(&[0, 100]);
        let to = greys(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(
            PaletteMap::nearest_brute_force(&from, &to),
            Err(PaletteError::TooManyColors {
                max: BRUTE_FORCE_MAX_COLORS
            })
        );
    }
}
