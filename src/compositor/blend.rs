//! Distance-weighted alpha blending of a fill image into a base image.

use ndarray::Array4;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::image::{stack_rasters, ImageData, Raster};

use super::distance::distance_to_background;
use super::mask::{bounding_box, occupancy_mask};

/// Alpha blend `fill` into `img` using Euclidean distance maps as weights.
///
/// `fill` is expected to have color where `img` doesn't, and vice versa.
/// Each pixel inside the fill's bounding box becomes the weighted average of
/// the two source pixels, where each image's weight is its own pixel's
/// distance from that image's hole boundary: the side with more real context
/// around the pixel wins. Pixels outside the bounding box are copied from
/// `img` verbatim.
///
/// Where both weights are zero, both images sit on their own hole boundary
/// and the pixel is rendered black. A fill with no lit pixels at all leaves
/// `img` unchanged.
///
/// All masks, distance maps, and the bounding box are derived from the
/// converted byte rasters so every quantity lives on one value scale.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the two rasters' dimensions differ.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn alpha_blend(img: &ImageData, fill: &ImageData) -> Result<Raster> {
    let img = img.to_raster();
    let fill = fill.to_raster();

    if img.dim() != fill.dim() {
        return Err(Error::ShapeMismatch {
            expected: format!("{:?}", img.dim()),
            actual: format!("{:?}", fill.dim()),
        });
    }

    let bin_img = occupancy_mask(&img);
    let bin_fill = occupancy_mask(&fill);
    let edt1 = distance_to_background(&bin_img);
    let edt2 = distance_to_background(&bin_fill);

    let mut blended = img.clone();
    let Some(bbox) = bounding_box(&fill) else {
        tracing::debug!("fill has no lit pixels, returning base image unchanged");
        return Ok(blended);
    };

    let channels = img.dim().2;
    for i in bbox.row_min..bbox.row_max {
        for j in bbox.col_min..bbox.col_max {
            let w1 = edt1[[i, j]];
            let w2 = edt2[[i, j]];
            if w1 + w2 == 0.0 {
                // Neither image has a claim here; render black.
                for c in 0..channels {
                    blended[[i, j, c]] = 0;
                }
            } else {
                for c in 0..channels {
                    let value = (w1 * f32::from(img[[i, j, c]])
                        + w2 * f32::from(fill[[i, j, c]]))
                        / (w1 + w2);
                    // Safe: a weighted average of byte values stays in [0, 255]
                    blended[[i, j, c]] = value.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }

    Ok(blended)
}

/// Apply [`alpha_blend`] element-wise over two equal-length batches.
///
/// Pairs are independent, so the map runs in parallel; output order matches
/// input order.
///
/// # Errors
///
/// Returns [`Error::LengthMismatch`] if the batches differ in length, or a
/// per-pair blend error otherwise.
pub fn blend_batch(masked_imgs: &[ImageData], generated_fills: &[ImageData]) -> Result<Vec<Raster>> {
    if masked_imgs.len() != generated_fills.len() {
        return Err(Error::LengthMismatch {
            left: masked_imgs.len(),
            right: generated_fills.len(),
        });
    }

    masked_imgs
        .par_iter()
        .zip(generated_fills.par_iter())
        .map(|(img, fill)| alpha_blend(img, fill))
        .collect()
}

/// [`blend_batch`], then stack the results into one NCHW float batch for the
/// training loop.
///
/// # Errors
///
/// As [`blend_batch`], plus [`Error::ShapeMismatch`] if blended frames do
/// not all share one shape.
pub fn blend_batch_stacked(
    masked_imgs: &[ImageData],
    generated_fills: &[ImageData],
) -> Result<Array4<f32>> {
    let blended = blend_batch(masked_imgs, generated_fills)?;
    stack_rasters(&blended)
}
