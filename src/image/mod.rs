//! Image representations, conversions, and disk I/O.

mod convert;
mod load;
mod save;

pub use convert::{stack_rasters, to_normalized, to_raster};
pub use load::{load_raster, open_image};
pub use save::save_raster;

use ndarray::{Array2, Array3};

/// 8-bit raster in HWC (height, width, channels) layout.
pub type Raster = Array3<u8>;

/// Normalized floating-point image in CHW (channels, height, width) layout.
///
/// The value range is implementation-defined (training pipelines here use
/// [-1, 1]); [`to_raster`] rescales whatever range is present to 0-255.
pub type NormalizedImage = Array3<f32>;

/// Single-channel 0/1 grid marking pixels that have content.
pub type OccupancyMask = Array2<u8>;

/// Per-cell Euclidean distance to the nearest empty pixel.
pub type DistanceMap = Array2<f32>;

/// Epsilon guard used when rescaling a constant image.
pub const NORM_EPS: f32 = 1e-5;

/// An image in either of the two representations used by the pipeline.
///
/// Training code hands around normalized CHW float tensors; all pixel
/// arithmetic happens on byte rasters. Keeping the two as a tagged variant
/// with total conversions avoids ad hoc layout branching at call sites.
#[derive(Debug, Clone)]
pub enum ImageData {
    /// Normalized CHW float image.
    Normalized(NormalizedImage),
    /// 8-bit HWC raster.
    Raster(Raster),
}

impl ImageData {
    /// Convert to a byte raster, copying in either case.
    pub fn to_raster(&self) -> Raster {
        match self {
            ImageData::Normalized(tensor) => to_raster(tensor),
            ImageData::Raster(raster) => raster.clone(),
        }
    }

    /// Raster-layout dimensions (height, width, channels).
    pub fn raster_dim(&self) -> (usize, usize, usize) {
        match self {
            ImageData::Normalized(tensor) => {
                let (c, h, w) = tensor.dim();
                (h, w, c)
            }
            ImageData::Raster(raster) => raster.dim(),
        }
    }
}

impl From<NormalizedImage> for ImageData {
    fn from(tensor: NormalizedImage) -> Self {
        ImageData::Normalized(tensor)
    }
}

impl From<Raster> for ImageData {
    fn from(raster: Raster) -> Self {
        ImageData::Raster(raster)
    }
}
