use super::color::Color;
use super::error::ClusterError;
use super::image::Image;
use super::palette::{Palette, MAX_COLORS};
use log::{debug, trace};
use rand::Rng;

/// Naive k-means over the RGB channels of `points` (alpha is ignored).
///
/// Initial centroids are drawn uniformly, with replacement, from `points`. Each
/// iteration assigns every point to its nearest centroid (the lowest index wins
/// ties), then moves each centroid to the rounded mean of its points. A centroid
/// that attracts no points stays where it is. Iteration stops once an update
/// leaves every centroid unchanged, or after `max_iterations` updates.
///
/// Returns exactly `k` opaque colors in centroid order.
pub fn cluster<R: Rng + ?Sized>(
    points: &[Color],
    k: usize,
    max_iterations: usize,
    rng: &mut R,
) -> Result<Palette, ClusterError> {
    if points.is_empty() {
        return Err(ClusterError::NoPoints);
    }
    if k == 0 {
        return Err(ClusterError::NoClusters);
    }
    if k > MAX_COLORS {
        return Err(ClusterError::TooManyClusters { k, max: MAX_COLORS });
    }

    let mut centroids: Vec<Color> = (0..k)
        .map(|_| points[rng.gen_range(0..points.len())].with_alpha(255))
        .collect();

    for iteration in 0..max_iterations {
        let nearest = closest_centroids(points, &centroids);
        let updated = compute_new_centroids(points, &nearest, &centroids);
        trace!("k-means iteration {}: {:?}", iteration, updated);
        if updated == centroids {
            debug!("k-means converged after {} iterations", iteration + 1);
            return Ok(Palette::new(updated));
        }
        centroids = updated;
    }
    debug!("k-means stopped at the {} iteration cap", max_iterations);
    Ok(Palette::new(centroids))
}

/// Clusters the pixels of `image`, visited in row-major order.
pub fn cluster_image<R: Rng + ?Sized>(
    image: &Image,
    k: usize,
    max_iterations: usize,
    rng: &mut R,
) -> Result<Palette, ClusterError> {
    cluster(image.pixels(), k, max_iterations, rng)
}

fn closest_centroid(point: &Color, centroids: &[Color]) -> usize {
    let mut min_dist = i64::MAX;
    let mut closest = 0;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = point.sq_dist(centroid);
        if dist < min_dist {
            min_dist = dist;
            closest = idx;
        }
    }
    closest
}

fn closest_centroids(points: &[Color], centroids: &[Color]) -> Vec<usize> {
    points
        .iter()
        .map(|p| closest_centroid(p, centroids))
        .collect()
}

fn compute_new_centroids(points: &[Color], nearest: &[usize], centroids: &[Color]) -> Vec<Color> {
    let mut sums = vec![[0u64; 3]; centroids.len()];
    let mut counts = vec![0u64; centroids.len()];
    for (point, &idx) in points.iter().zip(nearest.iter()) {
        sums[idx][0] += point.r as u64;
        sums[idx][1] += point.g as u64;
        sums[idx][2] += point.b as u64;
        counts[idx] += 1;
    }

    let mean = |sum: u64, count: u64| (sum as f64 / count as f64).round() as i64;
    centroids
        .iter()
        .zip(sums.iter().zip(counts.iter()))
        .map(|(previous, (sum, &count))| {
            if count == 0 {
                *previous
            } else {
                Color::clamped(mean(sum[0], count), mean(sum[1], count), mean(sum[2], count), 255)
            }
        })
        .collect()
}
