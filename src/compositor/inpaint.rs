//! Classical (non-learned) hole filling, used as a baseline against the
//! generative path.

use std::path::PathBuf;

use ndarray::{Array2, Array4};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::image::{save_raster, stack_rasters, ImageData, Raster};

use super::distance::distance_to_background;

/// Default neighborhood radius, matching the usual fast-marching setting.
const DEFAULT_RADIUS: u32 = 3;

/// Fast-marching-style inpainter: hole pixels are visited in increasing
/// distance from the known region and filled from already-known neighbors.
#[derive(Debug, Clone)]
pub struct ClassicalInpainter {
    /// Neighborhood radius used when averaging known pixels.
    pub radius: u32,
    /// When set, the masked input and hole mask are written here as PNGs
    /// before filling. Disabled by default.
    pub debug_dir: Option<PathBuf>,
}

impl Default for ClassicalInpainter {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            debug_dir: None,
        }
    }
}

impl ClassicalInpainter {
    /// Fill the hole region of `masked_img`.
    ///
    /// `keep_mask` is nonzero where the image content is known; zero cells
    /// mark the hole. Multi-channel masks are reduced to their first channel.
    /// The fill is deterministic: pixels are visited in increasing distance
    /// from the known region (ties broken by position) and each becomes the
    /// inverse-square-distance weighted average of known neighbors within
    /// `radius`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the mask's height/width differ
    /// from the image's, and [`Error::InvalidParameter`] for a zero radius.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    pub fn inpaint(&self, masked_img: &ImageData, keep_mask: &ImageData) -> Result<Raster> {
        if self.radius == 0 {
            return Err(Error::InvalidParameter {
                name: "radius".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let img = masked_img.to_raster();
        let mask = keep_mask.to_raster();
        let (height, width, channels) = img.dim();
        let (mask_h, mask_w, _) = mask.dim();
        if (mask_h, mask_w) != (height, width) {
            return Err(Error::ShapeMismatch {
                expected: format!("{height}x{width}"),
                actual: format!("{mask_h}x{mask_w}"),
            });
        }

        // Invert: 1 marks the hole. Only channel 0 of the mask is consulted.
        let mut hole = Array2::<u8>::zeros((height, width));
        for y in 0..height {
            for x in 0..width {
                if mask[[y, x, 0]] == 0 {
                    hole[[y, x]] = 1;
                }
            }
        }

        self.write_debug_artifacts(&img, &hole)?;

        // Distance from each hole pixel to the nearest known pixel gives the
        // marching order.
        let depth = distance_to_background(&hole);
        let mut order: Vec<(usize, usize)> = (0..height)
            .flat_map(|y| (0..width).map(move |x| (y, x)))
            .filter(|&(y, x)| hole[[y, x]] == 1)
            .collect();
        order.sort_by(|&(ai, aj), &(bi, bj)| {
            depth[[ai, aj]]
                .total_cmp(&depth[[bi, bj]])
                .then(ai.cmp(&bi))
                .then(aj.cmp(&bj))
        });

        let mut known = hole.mapv(|h| h == 0);
        let mut out = img.mapv(f32::from);
        let radius = self.radius as isize;

        let mut acc = vec![0.0f32; channels];
        for (i, j) in order {
            acc.fill(0.0);
            let mut weight_sum = 0.0f32;
            for di in -radius..=radius {
                for dj in -radius..=radius {
                    if di == 0 && dj == 0 {
                        continue;
                    }
                    let ni = i as isize + di;
                    let nj = j as isize + dj;
                    if ni < 0 || nj < 0 || ni as usize >= height || nj as usize >= width {
                        continue;
                    }
                    let (ni, nj) = (ni as usize, nj as usize);
                    if !known[[ni, nj]] {
                        continue;
                    }
                    let w = 1.0 / ((di * di + dj * dj) as f32);
                    weight_sum += w;
                    for c in 0..channels {
                        acc[c] += w * out[[ni, nj, c]];
                    }
                }
            }
            if weight_sum > 0.0 {
                for c in 0..channels {
                    out[[i, j, c]] = acc[c] / weight_sum;
                }
            }
            known[[i, j]] = true;
        }

        // Safe: source values are averages of byte values
        Ok(out.mapv(|v| v.round().clamp(0.0, 255.0) as u8))
    }

    /// Apply [`ClassicalInpainter::inpaint`] to every image of a batch with
    /// one shared mask, preserving order.
    ///
    /// # Errors
    ///
    /// Returns a per-image error if any image fails.
    pub fn inpaint_batch(
        &self,
        masked_imgs: &[ImageData],
        keep_mask: &ImageData,
    ) -> Result<Vec<Raster>> {
        masked_imgs
            .par_iter()
            .map(|img| self.inpaint(img, keep_mask))
            .collect()
    }

    /// [`ClassicalInpainter::inpaint_batch`], stacked into one NCHW float
    /// batch.
    ///
    /// # Errors
    ///
    /// As [`ClassicalInpainter::inpaint_batch`], plus
    /// [`Error::ShapeMismatch`] on mixed output shapes.
    pub fn inpaint_batch_stacked(
        &self,
        masked_imgs: &[ImageData],
        keep_mask: &ImageData,
    ) -> Result<Array4<f32>> {
        let filled = self.inpaint_batch(masked_imgs, keep_mask)?;
        stack_rasters(&filled)
    }

    fn write_debug_artifacts(&self, img: &Raster, hole: &Array2<u8>) -> Result<()> {
        let Some(dir) = &self.debug_dir else {
            return Ok(());
        };
        std::fs::create_dir_all(dir)?;

        save_raster(img, dir.join("masked.png"))?;

        let (height, width) = hole.dim();
        let mut mask_raster = Raster::zeros((height, width, 1));
        for y in 0..height {
            for x in 0..width {
                if hole[[y, x]] == 1 {
                    mask_raster[[y, x, 0]] = 255;
                }
            }
        }
        save_raster(&mask_raster, dir.join("hole_mask.png"))
    }
}
