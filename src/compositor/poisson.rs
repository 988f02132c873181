//! Gradient-domain (Poisson) compositing, an alternate blend strategy.

use ndarray::Array3;

use crate::error::{Error, Result};
use crate::image::{ImageData, Raster};

use super::mask::{bounding_box, occupancy_mask};

/// Jacobi relaxation steps. Enough for the small frames this pipeline
/// trains on; the solve is O(iterations x bbox area x channels).
const JACOBI_ITERATIONS: usize = 300;

/// Composite `fill` into `img` by solving the Poisson equation over the
/// fill's occupied region with Jacobi relaxation.
///
/// The fill contributes its gradients, the base image the Dirichlet boundary,
/// so the seam is absorbed into low-frequency shifts instead of a hard edge.
/// Frame-border pixels of the region keep their base values. Deterministic:
/// a fixed iteration count, no randomness.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the two rasters' dimensions differ.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn poisson_blend(img: &ImageData, fill: &ImageData) -> Result<Raster> {
    let img = img.to_raster();
    let fill = fill.to_raster();

    if img.dim() != fill.dim() {
        return Err(Error::ShapeMismatch {
            expected: format!("{:?}", img.dim()),
            actual: format!("{:?}", fill.dim()),
        });
    }

    let (height, width, channels) = img.dim();
    let Some(bbox) = bounding_box(&fill) else {
        return Ok(img.clone());
    };
    let region = occupancy_mask(&fill);

    let fill_f = fill.mapv(f32::from);
    let mut current: Array3<f32> = img.mapv(f32::from);
    let mut next = current.clone();

    let interior = |i: usize, j: usize| {
        i > 0 && i + 1 < height && j > 0 && j + 1 < width && region[[i, j]] == 1
    };

    for _ in 0..JACOBI_ITERATIONS {
        for i in bbox.row_min..bbox.row_max {
            for j in bbox.col_min..bbox.col_max {
                if !interior(i, j) {
                    continue;
                }
                for c in 0..channels {
                    let neighbor_sum = current[[i - 1, j, c]]
                        + current[[i + 1, j, c]]
                        + current[[i, j - 1, c]]
                        + current[[i, j + 1, c]];
                    let guidance = 4.0 * fill_f[[i, j, c]]
                        - fill_f[[i - 1, j, c]]
                        - fill_f[[i + 1, j, c]]
                        - fill_f[[i, j - 1, c]]
                        - fill_f[[i, j + 1, c]];
                    next[[i, j, c]] = 0.25 * (neighbor_sum + guidance);
                }
            }
        }
        std::mem::swap(&mut current, &mut next);
    }

    let mut blended = img.clone();
    for i in bbox.row_min..bbox.row_max {
        for j in bbox.col_min..bbox.col_max {
            if !interior(i, j) {
                continue;
            }
            for c in 0..channels {
                // Safe: clamped to [0, 255] before casting
                blended[[i, j, c]] = current[[i, j, c]].round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Ok(blended)
}
