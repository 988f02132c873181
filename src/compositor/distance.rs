//! Euclidean distance maps over occupancy masks.

use image::GrayImage;
use imageproc::distance_transform::euclidean_squared_distance_transform;
use ndarray::Array2;

use crate::image::{DistanceMap, OccupancyMask};

/// Compute each cell's Euclidean distance to the nearest empty (zero) cell
/// of the mask.
///
/// Empty cells map to exactly 0 and cells 4-adjacent to an empty cell to
/// exactly 1; interior values come from an exact squared distance transform
/// (Felzenszwalb-Huttenlocher) of the mask complement.
///
/// A mask with no empty cell at all has no finite true distance anywhere;
/// every cell then saturates to `hypot(width, height)` so that downstream
/// weight arithmetic stays finite.
#[allow(clippy::cast_possible_truncation)]
pub fn distance_to_background(mask: &OccupancyMask) -> DistanceMap {
    let (height, width) = mask.dim();
    if height == 0 || width == 0 {
        return Array2::zeros((height, width));
    }

    // The transform measures distance to the nearest nonzero pixel, so the
    // complement puts the mask's empty cells in the foreground.
    let mut complement = GrayImage::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            if mask[[y, x]] == 0 {
                complement.put_pixel(x as u32, y as u32, image::Luma([255]));
            }
        }
    }

    let squared = euclidean_squared_distance_transform(&complement);
    let cap = (width as f32).hypot(height as f32);

    let mut distances = Array2::<f32>::zeros((height, width));
    for y in 0..height {
        for x in 0..width {
            let d = squared.get_pixel(x as u32, y as u32)[0].sqrt() as f32;
            distances[[y, x]] = if d.is_finite() { d.min(cap) } else { cap };
        }
    }

    distances
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_empty_mask_is_zero_everywhere() {
        let mask = Array2::<u8>::zeros((3, 3));
        let dist = distance_to_background(&mask);
        assert!(dist.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn test_isolated_cell_has_unit_distance() {
        let mut mask = Array2::<u8>::zeros((3, 3));
        mask[[1, 1]] = 1;
        let dist = distance_to_background(&mask);

        assert!((dist[[1, 1]] - 1.0).abs() < 1e-6);
        assert_eq!(dist[[0, 0]], 0.0);
        assert_eq!(dist[[2, 2]], 0.0);
    }

    #[test]
    fn test_exact_values_against_hand_computed_grid() {
        // Single empty cell in the corner of a lit 3x3 grid.
        let mut mask = Array2::<u8>::from_elem((3, 3), 1);
        mask[[0, 0]] = 0;
        let dist = distance_to_background(&mask);

        assert_eq!(dist[[0, 0]], 0.0);
        assert!((dist[[0, 1]] - 1.0).abs() < 1e-6);
        assert!((dist[[1, 0]] - 1.0).abs() < 1e-6);
        assert!((dist[[1, 1]] - 2.0_f32.sqrt()).abs() < 1e-6);
        assert!((dist[[2, 2]] - 8.0_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_fully_lit_mask_saturates_finite() {
        let mask = Array2::<u8>::from_elem((4, 4), 1);
        let dist = distance_to_background(&mask);
        let cap = 4.0_f32.hypot(4.0);

        assert!(dist.iter().all(|&d| d.is_finite()));
        assert!(dist.iter().all(|&d| (d - cap).abs() < 1e-4));
    }

    #[test]
    fn test_distance_grows_away_from_border() {
        // Empty first row, lit everywhere else: distance equals the row index.
        let mut mask = Array2::<u8>::from_elem((5, 3), 1);
        for x in 0..3 {
            mask[[0, x]] = 0;
        }
        let dist = distance_to_background(&mask);

        for y in 0..5 {
            for x in 0..3 {
                assert!((dist[[y, x]] - y as f32).abs() < 1e-6);
            }
        }
    }
}
