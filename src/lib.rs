//! # patchblend
//!
//! Helpers for generative image-inpainting training pipelines: loading image
//! datasets, compositing a generated fill patch into a masked original, and a
//! classical hole-filling baseline.
//!
//! The core is the distance-weighted compositor: each pixel inside the fill's
//! bounding box becomes a weighted average of the two source images, where
//! each image's weight is its pixel's Euclidean distance from that image's
//! own hole boundary. The side with more real context around a pixel wins.
//!
//! ## Example
//!
//! ```no_run
//! use patchblend::{alpha_blend, ImageData};
//! use patchblend::image::load_raster;
//!
//! # fn main() -> patchblend::Result<()> {
//! let img = ImageData::Raster(load_raster("masked.png")?);
//! let fill = ImageData::Raster(load_raster("fill.png")?);
//! let blended = alpha_blend(&img, &fill)?;
//! # let _ = blended;
//! # Ok(())
//! # }
//! ```

pub mod compositor;
pub mod dataset;
pub mod error;
pub mod image;
pub mod logger;

pub use compositor::{
    alpha_blend, blend, blend_batch, blend_batch_stacked, poisson_blend, BlendStrategy,
    BoundingBox, ClassicalInpainter,
};
pub use dataset::{load_dataset, BatchStream, DatasetKey};
pub use error::{Error, Result};
pub use image::{ImageData, NormalizedImage, Raster};
pub use logger::PlotLogger;
