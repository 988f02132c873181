//! Image loading utilities.

use std::path::Path;

use image::DynamicImage;
use ndarray::Array3;

use crate::error::{Error, Result};

use super::Raster;

/// Open an image file, mapping decode failures to [`Error::ImageLoad`].
pub fn open_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();

    image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Load an image from disk as an RGB byte raster in HWC layout.
///
/// # Errors
///
/// Returns an error if the image cannot be loaded or decoded.
pub fn load_raster<P: AsRef<Path>>(path: P) -> Result<Raster> {
    let img = open_image(path)?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut raster = Array3::<u8>::zeros((height as usize, width as usize, 3));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            raster[[y as usize, x as usize, c]] = pixel[c];
        }
    }

    Ok(raster)
}
