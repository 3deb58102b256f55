use tsample::imgproc::interpolation::InterpolationMode;
use tsample::imgproc::warp::{AffineTransform2d, AffineTransform3d, RotationAxis};
use tsample::io::{load_transform, save_transform};
use tsample::tensor::{CpuAllocator, Tensor1, Tensor3, Tensor4};
use tsample::tensor_ops::{allclose, c_flatten, corrcoef, random_choice, RandomChoiceParams};

#[test]
fn saved_transform_warps_like_the_original() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let file_path = tmp_dir.path().join("augment.bin");

    let image = Tensor3::<f32, _>::from_shape_fn([3, 16, 16], CpuAllocator, |[c, i, j]| {
        ((c + 1) * (i * 16 + j)) as f32
    })?;

    let transform = AffineTransform2d::rotation(20.0)
        .compose(&AffineTransform2d::zoom([0.9, 0.9]))
        .compose(&AffineTransform2d::translation([1.0, -2.0]));
    save_transform(&file_path, &transform)?;
    let loaded: AffineTransform2d = load_transform(&file_path)?;

    let a = transform.apply(&image)?;
    let b = loaded.apply(&image)?;
    assert!(allclose(&a, &b)?);
    Ok(())
}

#[test]
fn warped_channels_stay_correlated() -> Result<(), Box<dyn std::error::Error>> {
    // every channel is a scaled copy of the first one
    let volume = Tensor4::<f64, _>::from_shape_fn([3, 6, 6, 6], CpuAllocator, |[c, d, h, w]| {
        (c + 1) as f64 * (d * 36 + h * 6 + w) as f64
    })?;

    let warped = AffineTransform3d::rotation(RotationAxis::Height, 10.0)
        .with_mode(InterpolationMode::Bilinear)
        .apply(&volume)?;
    assert_eq!(warped.shape, volume.shape);

    let flat = c_flatten(&warped)?.as_contiguous()?;
    let corr = corrcoef(&flat)?;
    for v in corr.iter() {
        approx::assert_relative_eq!(*v, 1.0, epsilon = 1e-9);
    }
    Ok(())
}

#[test]
fn random_choice_picks_identity_or_rotation() -> Result<(), Box<dyn std::error::Error>> {
    let angles = Tensor1::<f32, _>::from_shape_vec([2], vec![0.0, 90.0], CpuAllocator)?;
    let params = RandomChoiceParams {
        size: 8,
        p: Some(vec![0.5, 0.5]),
        random_seed: Some(11),
        ..Default::default()
    };
    let picked = random_choice(&angles, &params)?;

    let image = Tensor3::<f32, _>::from_shape_val([1, 5, 5], 2.0, CpuAllocator)?;
    for &angle in picked.iter() {
        let warped = AffineTransform2d::rotation(angle)
            .with_mode(InterpolationMode::Nearest)
            .apply(&image)?;
        // a constant image is invariant under any warp
        assert!(allclose(&warped, &image)?);
    }
    Ok(())
}
