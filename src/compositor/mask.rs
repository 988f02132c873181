//! Occupancy masks and bounding boxes over byte rasters.

use ndarray::Array2;

use crate::image::{OccupancyMask, Raster};

/// Minimal rectangle enclosing all nonzero pixels of a raster.
///
/// Half-open on the max side: `row_max` is one past the last nonzero row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

/// Compute the 0/1 occupancy mask of a raster: 1 where the per-pixel
/// channel sum is positive.
///
/// An all-zero raster yields an all-zero mask.
pub fn occupancy_mask(raster: &Raster) -> OccupancyMask {
    let (height, width, channels) = raster.dim();

    let mut mask = Array2::<u8>::zeros((height, width));
    for y in 0..height {
        for x in 0..width {
            let sum: u32 = (0..channels).map(|c| u32::from(raster[[y, x, c]])).sum();
            if sum > 0 {
                mask[[y, x]] = 1;
            }
        }
    }

    mask
}

/// Bounding box of the nonzero pixels of a raster, or `None` if the raster
/// is entirely zero.
pub fn bounding_box(raster: &Raster) -> Option<BoundingBox> {
    let (height, width, channels) = raster.dim();

    let mut bbox: Option<BoundingBox> = None;
    for y in 0..height {
        for x in 0..width {
            if (0..channels).all(|c| raster[[y, x, c]] == 0) {
                continue;
            }
            bbox = Some(match bbox {
                None => BoundingBox {
                    row_min: y,
                    row_max: y + 1,
                    col_min: x,
                    col_max: x + 1,
                },
                Some(b) => BoundingBox {
                    row_min: b.row_min.min(y),
                    row_max: b.row_max.max(y + 1),
                    col_min: b.col_min.min(x),
                    col_max: b.col_max.max(x + 1),
                },
            });
        }
    }

    bbox
}
