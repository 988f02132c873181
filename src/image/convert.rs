//! Conversions between normalized float tensors and byte rasters.

use ndarray::{Array3, Array4};

use crate::error::{Error, Result};

use super::{NormalizedImage, Raster, NORM_EPS};

/// Convert a normalized CHW float image to an 8-bit HWC raster.
///
/// The image is:
/// 1. Min/max scanned over all elements, channels included
/// 2. Clamped to [min, max] and rescaled to [0, 1] with an epsilon guard
/// 3. Scaled to [0, 255] and truncated to u8
/// 4. Transposed from channel-first to channel-last
///
/// A constant image rescales to all zeros (the epsilon keeps the divisor
/// positive). Pure function; the input is never mutated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_raster(image: &NormalizedImage) -> Raster {
    let (channels, height, width) = image.dim();

    let lo = image.iter().copied().fold(f32::INFINITY, f32::min);
    let hi = image.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = hi - lo + NORM_EPS;

    let mut raster = Array3::<u8>::zeros((height, width, channels));
    for c in 0..channels {
        for y in 0..height {
            for x in 0..width {
                let v = image[[c, y, x]].clamp(lo, hi);
                let scaled = ((v - lo) / range * 255.0).clamp(0.0, 255.0);
                // Safe: clamped to [0, 255] before casting
                raster[[y, x, c]] = scaled as u8;
            }
        }
    }

    raster
}

/// Convert an 8-bit HWC raster to a CHW float image.
///
/// Values are cast, not rescaled: the training loop consumes blended frames
/// as 0-255 floats and applies its own normalization downstream.
pub fn to_normalized(raster: &Raster) -> NormalizedImage {
    let (height, width, channels) = raster.dim();

    let mut tensor = Array3::<f32>::zeros((channels, height, width));
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                tensor[[c, y, x]] = f32::from(raster[[y, x, c]]);
            }
        }
    }

    tensor
}

/// Stack a sequence of equal-shaped rasters into one NCHW float batch.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if any raster's dimensions differ from
/// the first one's.
pub fn stack_rasters(rasters: &[Raster]) -> Result<Array4<f32>> {
    let Some(first) = rasters.first() else {
        return Ok(Array4::zeros((0, 0, 0, 0)));
    };

    let (height, width, channels) = first.dim();
    let mut batch = Array4::<f32>::zeros((rasters.len(), channels, height, width));

    for (n, raster) in rasters.iter().enumerate() {
        if raster.dim() != first.dim() {
            return Err(Error::ShapeMismatch {
                expected: format!("{:?}", first.dim()),
                actual: format!("{:?}", raster.dim()),
            });
        }
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    batch[[n, c, y, x]] = f32::from(raster[[y, x, c]]);
                }
            }
        }
    }

    Ok(batch)
}
