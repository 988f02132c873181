use ndarray::Array3;

use patchblend::{
    alpha_blend, blend, blend_batch_stacked, BlendStrategy, ClassicalInpainter, ImageData,
};

/// The scenario from the training pipeline: a fully lit base frame and a
/// generated fill lit only in the top-left 2x2 block.
fn base_and_fill() -> (ImageData, ImageData) {
    let img = Array3::<u8>::from_elem((4, 4, 1), 255);
    let mut fill = Array3::<u8>::zeros((4, 4, 1));
    for y in 0..2 {
        for x in 0..2 {
            fill[[y, x, 0]] = 255;
        }
    }
    (ImageData::Raster(img), ImageData::Raster(fill))
}

#[test]
fn alpha_blend_keeps_base_outside_fill_extent() {
    let (img, fill) = base_and_fill();
    let blended = alpha_blend(&img, &fill).expect("blend");

    assert_eq!(blended.dim(), (4, 4, 1));
    // Inside the 2x2 extent both sources are 255, so any weighting gives 255;
    // outside it the base frame must be copied verbatim.
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(blended[[y, x, 0]], 255, "pixel ({y},{x})");
        }
    }
}

#[test]
fn every_strategy_produces_a_full_frame() {
    let (img, fill) = base_and_fill();
    for strategy in [
        BlendStrategy::Alpha,
        BlendStrategy::Poisson,
        BlendStrategy::ClassicalInpaint,
    ] {
        let out = blend(&img, &fill, strategy).expect("blend");
        assert_eq!(out.dim(), (4, 4, 1), "{strategy:?}");
    }
}

#[test]
fn stacked_batch_feeds_back_channel_first() {
    let (img, fill) = base_and_fill();
    let batch = blend_batch_stacked(&[img.clone(), img], &[fill.clone(), fill]).expect("batch");

    assert_eq!(batch.dim(), (2, 1, 4, 4));
    // Values are 0-255 floats, the representation the training loop consumes.
    assert!((batch[[0, 0, 3, 3]] - 255.0).abs() < f32::EPSILON);
    assert!((batch[[1, 0, 3, 3]] - 255.0).abs() < f32::EPSILON);
}

#[test]
fn classical_baseline_reconstructs_a_flat_region() {
    // Constant frame with a punched-out square; the baseline must restore it.
    let mut img = Array3::<u8>::from_elem((8, 8, 3), 140);
    let mut keep = Array3::<u8>::from_elem((8, 8, 1), 1);
    for y in 3..5 {
        for x in 3..5 {
            for c in 0..3 {
                img[[y, x, c]] = 0;
            }
            keep[[y, x, 0]] = 0;
        }
    }

    let filled = ClassicalInpainter::default()
        .inpaint(&ImageData::Raster(img), &ImageData::Raster(keep))
        .expect("inpaint");

    for y in 3..5 {
        for x in 3..5 {
            for c in 0..3 {
                assert_eq!(filled[[y, x, c]], 140);
            }
        }
    }
}
