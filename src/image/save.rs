//! Image saving utilities.

use std::path::Path;

use image::{GrayImage, RgbImage};

use crate::error::{Error, Result};

use super::Raster;

/// Save a byte raster to disk, format inferred from the extension.
///
/// Single-channel rasters are written as grayscale, three-channel as RGB.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] for other channel counts and
/// [`Error::ImageSave`] if encoding fails.
#[allow(clippy::cast_possible_truncation)]
pub fn save_raster<P: AsRef<Path>>(raster: &Raster, path: P) -> Result<()> {
    let path = path.as_ref();
    let (height, width, channels) = raster.dim();

    let save_err = |source| Error::ImageSave {
        path: path.to_path_buf(),
        source,
    };

    match channels {
        1 => {
            let mut img = GrayImage::new(width as u32, height as u32);
            for y in 0..height {
                for x in 0..width {
                    img.put_pixel(x as u32, y as u32, image::Luma([raster[[y, x, 0]]]));
                }
            }
            img.save(path).map_err(save_err)
        }
        3 => {
            let mut img = RgbImage::new(width as u32, height as u32);
            for y in 0..height {
                for x in 0..width {
                    let pixel = image::Rgb([
                        raster[[y, x, 0]],
                        raster[[y, x, 1]],
                        raster[[y, x, 2]],
                    ]);
                    img.put_pixel(x as u32, y as u32, pixel);
                }
            }
            img.save(path).map_err(save_err)
        }
        other => Err(Error::InvalidParameter {
            name: "channels".to_string(),
            reason: format!("cannot encode {other}-channel raster"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_rejects_unsupported_channel_count() {
        let raster = Array3::<u8>::zeros((2, 2, 5));
        let err = save_raster(&raster, "unused.png").expect_err("must fail");
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_round_trips_rgb_raster() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.png");

        let mut raster = Array3::<u8>::zeros((3, 2, 3));
        raster[[1, 0, 0]] = 200;
        raster[[2, 1, 2]] = 40;
        save_raster(&raster, &path).expect("save");

        let loaded = crate::image::load_raster(&path).expect("load");
        assert_eq!(loaded, raster);
    }
}
