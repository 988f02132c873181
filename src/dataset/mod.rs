//! ImageFolder-style dataset loading with per-dataset transform plans.
//!
//! Each dataset key maps to a fixed sequence of crop/resize steps followed by
//! mean 0.5 / std 0.5 normalization, producing shuffled NCHW float batches in
//! [-1, 1]. Dataset acquisition is out of scope: the images are expected on
//! disk under `root/<dataset dir>`.

mod transform;

pub use transform::Transform;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::GenericImageView;
use ndarray::Array4;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};

/// One NCHW float batch in [-1, 1].
pub type Batch = Array4<f32>;

const NORMAL_MEAN: f32 = 0.5;
const NORMAL_STD: f32 = 0.5;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// The fixed set of dataset identifiers the loader recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKey {
    Mnist,
    Celeba,
    CelebaRandomCrop,
    CelebaTest,
    Lfw,
    Custom,
    LsunTowerTrain,
    LsunTowerTest,
}

impl FromStr for DatasetKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mnist" => Ok(Self::Mnist),
            "celeba" => Ok(Self::Celeba),
            "celeba_random_crop" => Ok(Self::CelebaRandomCrop),
            "celeba_test" => Ok(Self::CelebaTest),
            "lfw" => Ok(Self::Lfw),
            "custom" => Ok(Self::Custom),
            "lsun_tower_train" => Ok(Self::LsunTowerTrain),
            "lsun_tower_test" => Ok(Self::LsunTowerTest),
            other => Err(Error::UnknownDataset {
                name: other.to_string(),
            }),
        }
    }
}

impl DatasetKey {
    /// Canonical key string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mnist => "mnist",
            Self::Celeba => "celeba",
            Self::CelebaRandomCrop => "celeba_random_crop",
            Self::CelebaTest => "celeba_test",
            Self::Lfw => "lfw",
            Self::Custom => "custom",
            Self::LsunTowerTrain => "lsun_tower_train",
            Self::LsunTowerTest => "lsun_tower_test",
        }
    }

    /// Directory under the data root holding this dataset's images.
    /// The random-crop variant reads the plain celeba directory.
    pub fn data_dir(&self, root: &Path) -> PathBuf {
        match self {
            Self::CelebaRandomCrop => root.join("celeba"),
            other => root.join(other.as_str()),
        }
    }

    /// Number of channels in the output batches.
    pub fn channels(&self) -> usize {
        match self {
            Self::Mnist => 1,
            _ => 3,
        }
    }

    /// The crop/resize plan applied before normalization.
    pub fn transforms(&self, image_size: u32) -> Vec<Transform> {
        match self {
            Self::Mnist => vec![Transform::Resize(image_size)],
            Self::Celeba | Self::CelebaTest | Self::Lfw => {
                vec![Transform::CenterCrop(128), Transform::Resize(image_size)]
            }
            Self::CelebaRandomCrop => {
                vec![Transform::RandomCrop(150), Transform::Resize(image_size)]
            }
            Self::Custom | Self::LsunTowerTrain | Self::LsunTowerTest => vec![
                Transform::Resize(image_size),
                Transform::CenterCrop(image_size),
            ],
        }
    }
}

/// A shuffled, batched stream of normalized images from one dataset.
#[derive(Debug)]
pub struct BatchStream {
    paths: Vec<PathBuf>,
    transforms: Vec<Transform>,
    channels: usize,
    image_size: u32,
    batch_size: usize,
    rng: StdRng,
    cursor: usize,
}

impl BatchStream {
    /// Scan the dataset directory, shuffle the file list, and prepare a
    /// batch stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for a zero batch size or image
    /// size, [`Error::DatasetScan`] if the directory cannot be walked, and
    /// [`Error::EmptyDataset`] if no image files are found.
    pub fn new(
        root: &Path,
        key: DatasetKey,
        image_size: u32,
        batch_size: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidParameter {
                name: "batch_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if image_size == 0 {
            return Err(Error::InvalidParameter {
                name: "image_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let dir = key.data_dir(root);
        let mut paths = Vec::new();
        collect_image_paths(&dir, &mut paths)?;
        if paths.is_empty() {
            return Err(Error::EmptyDataset { path: dir });
        }

        // Sort before shuffling so a fixed seed gives a fixed order
        // regardless of directory iteration order.
        paths.sort();
        let mut rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        paths.shuffle(&mut rng);

        tracing::info!(
            dataset = key.as_str(),
            images = paths.len(),
            batch_size,
            "dataset stream ready"
        );

        Ok(Self {
            paths,
            transforms: key.transforms(image_size),
            channels: key.channels(),
            image_size,
            batch_size,
            rng,
            cursor: 0,
        })
    }

    /// Total number of images in the stream.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when the stream holds no images.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn load_one(&mut self, path: &Path) -> Result<Array4<f32>> {
        let mut img = crate::image::open_image(path)?;
        let transforms = self.transforms.clone();
        for &t in &transforms {
            img = transform::apply(img, t, &mut self.rng);
        }

        // Transform plans end square at image_size for square sources; the
        // resize guard keeps non-square strays from breaking batch shapes.
        let size = self.image_size;
        if img.width() != size || img.height() != size {
            img = img.resize_exact(size, size, image::imageops::FilterType::Lanczos3);
        }

        let side = size as usize;
        let mut tensor = Array4::<f32>::zeros((1, self.channels, side, side));
        if self.channels == 1 {
            let gray = img.to_luma8();
            for (x, y, pixel) in gray.enumerate_pixels() {
                tensor[[0, 0, y as usize, x as usize]] =
                    (f32::from(pixel[0]) / 255.0 - NORMAL_MEAN) / NORMAL_STD;
            }
        } else {
            let rgb = img.to_rgb8();
            for (x, y, pixel) in rgb.enumerate_pixels() {
                for c in 0..3 {
                    tensor[[0, c, y as usize, x as usize]] =
                        (f32::from(pixel[c]) / 255.0 - NORMAL_MEAN) / NORMAL_STD;
                }
            }
        }

        Ok(tensor)
    }
}

impl Iterator for BatchStream {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.paths.len() {
            return None;
        }
        let end = (self.cursor + self.batch_size).min(self.paths.len());
        let chunk: Vec<PathBuf> = self.paths[self.cursor..end].to_vec();
        self.cursor = end;

        let side = self.image_size as usize;
        let mut batch = Array4::<f32>::zeros((chunk.len(), self.channels, side, side));
        for (n, path) in chunk.iter().enumerate() {
            let tensor = match self.load_one(path) {
                Ok(t) => t,
                Err(err) => return Some(Err(err)),
            };
            batch
                .index_axis_mut(ndarray::Axis(0), n)
                .assign(&tensor.index_axis(ndarray::Axis(0), 0));
        }

        Some(Ok(batch))
    }
}

/// Open a shuffled batch stream for a named dataset.
///
/// # Errors
///
/// See [`BatchStream::new`].
pub fn load_dataset(
    root: &Path,
    key: DatasetKey,
    image_size: u32,
    batch_size: usize,
) -> Result<BatchStream> {
    BatchStream::new(root, key, image_size, batch_size, None)
}

fn collect_image_paths(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|source| Error::DatasetScan {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| Error::DatasetScan {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_image_paths(&path, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        {
            out.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_test_images(dir: &Path, count: usize) {
        fs::create_dir_all(dir).expect("create dataset dir");
        for n in 0..count {
            let mut img = RgbImage::new(32, 32);
            for pixel in img.pixels_mut() {
                *pixel = Rgb([n as u8 * 10, 100, 200]);
            }
            img.save(dir.join(format!("img_{n:03}.png"))).expect("save");
        }
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let err = DatasetKey::from_str("imagenet").expect_err("must fail");
        assert!(matches!(err, Error::UnknownDataset { name } if name == "imagenet"));
    }

    #[test]
    fn test_all_known_keys_round_trip() {
        for name in [
            "mnist",
            "celeba",
            "celeba_random_crop",
            "celeba_test",
            "lfw",
            "custom",
            "lsun_tower_train",
            "lsun_tower_test",
        ] {
            let key = DatasetKey::from_str(name).expect("known key");
            assert_eq!(key.as_str(), name);
        }
    }

    #[test]
    fn test_random_crop_variant_reads_celeba_dir() {
        let root = Path::new("data");
        assert_eq!(
            DatasetKey::CelebaRandomCrop.data_dir(root),
            root.join("celeba")
        );
        assert_eq!(DatasetKey::Lfw.data_dir(root), root.join("lfw"));
    }

    #[test]
    fn test_stream_yields_fixed_shape_batches() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_test_images(&tmp.path().join("custom"), 5);

        let stream =
            BatchStream::new(tmp.path(), DatasetKey::Custom, 16, 2, Some(1)).expect("stream");
        assert_eq!(stream.len(), 5);

        let batches: Vec<Batch> = stream.map(|b| b.expect("batch")).collect();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].dim(), (2, 3, 16, 16));
        assert_eq!(batches[1].dim(), (2, 3, 16, 16));
        // Last partial batch is yielded, not dropped.
        assert_eq!(batches[2].dim(), (1, 3, 16, 16));
    }

    #[test]
    fn test_batches_are_normalized_to_unit_range() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_test_images(&tmp.path().join("custom"), 2);

        let stream =
            BatchStream::new(tmp.path(), DatasetKey::Custom, 8, 2, Some(3)).expect("stream");
        for batch in stream {
            let batch = batch.expect("batch");
            assert!(batch.iter().all(|&v| (-1.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_test_images(&tmp.path().join("custom"), 6);

        let collect = || -> Vec<Batch> {
            BatchStream::new(tmp.path(), DatasetKey::Custom, 8, 3, Some(42))
                .expect("stream")
                .map(|b| b.expect("batch"))
                .collect()
        };
        let a = collect();
        let b = collect();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x, y);
        }
    }

    #[test]
    fn test_missing_directory_is_a_scan_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let err = load_dataset(tmp.path(), DatasetKey::Mnist, 16, 4).expect_err("must fail");
        assert!(matches!(err, Error::DatasetScan { .. }));
    }

    #[test]
    fn test_empty_directory_is_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(tmp.path().join("lfw")).expect("mkdir");
        let err = load_dataset(tmp.path(), DatasetKey::Lfw, 16, 4).expect_err("must fail");
        assert!(matches!(err, Error::EmptyDataset { .. }));
    }

    #[test]
    fn test_small_images_still_batch_at_target_size() {
        // 32x32 sources are smaller than celeba's 128 center crop; the crop
        // clamps and the resize guard restores the target size.
        let tmp = tempfile::tempdir().expect("tempdir");
        write_test_images(&tmp.path().join("celeba"), 2);

        let mut stream =
            BatchStream::new(tmp.path(), DatasetKey::Celeba, 16, 2, Some(0)).expect("stream");
        let batch = stream.next().expect("one batch").expect("batch");
        assert_eq!(batch.dim(), (2, 3, 16, 16));
    }

    #[test]
    fn test_mnist_batches_are_single_channel() {
        let tmp = tempfile::tempdir().expect("tempdir");
        write_test_images(&tmp.path().join("mnist"), 2);

        let mut stream =
            BatchStream::new(tmp.path(), DatasetKey::Mnist, 16, 2, Some(0)).expect("stream");
        let batch = stream.next().expect("one batch").expect("batch");
        assert_eq!(batch.dim(), (2, 1, 16, 16));
    }
}
