//! Per-dataset crop/resize steps applied before normalization.

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use rand::rngs::StdRng;
use rand::Rng;

/// A single preprocessing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Resize the shorter side to the given size, preserving aspect ratio.
    Resize(u32),
    /// Crop a centered square of the given size.
    ///
    /// Images smaller than the requested size are clamped to their own
    /// extent rather than padded, so the output is never larger than the
    /// input. The stream's final resize guard restores the target size.
    CenterCrop(u32),
    /// Crop a random square of the given size (clamped to the image).
    RandomCrop(u32),
}

/// Apply one transform, consuming the image.
pub fn apply(img: DynamicImage, transform: Transform, rng: &mut StdRng) -> DynamicImage {
    match transform {
        Transform::Resize(size) => {
            let (width, height) = img.dimensions();
            let shorter = width.min(height).max(1);
            let scale = f64::from(size) / f64::from(shorter);
            let new_w = (f64::from(width) * scale).round().max(1.0) as u32;
            let new_h = (f64::from(height) * scale).round().max(1.0) as u32;
            img.resize_exact(new_w, new_h, FilterType::Lanczos3)
        }
        Transform::CenterCrop(size) => {
            let (width, height) = img.dimensions();
            let size = size.min(width).min(height);
            let x0 = (width - size) / 2;
            let y0 = (height - size) / 2;
            img.crop_imm(x0, y0, size, size)
        }
        Transform::RandomCrop(size) => {
            let (width, height) = img.dimensions();
            let size = size.min(width).min(height);
            let x0 = rng.random_range(0..=width - size);
            let y0 = rng.random_range(0..=height - size);
            img.crop_imm(x0, y0, size, size)
        }
    }
}
