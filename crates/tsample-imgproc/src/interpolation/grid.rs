use tsample_tensor::{CpuTensor2, Tensor, Tensor2, Tensor3, TensorAllocator};
use tsample_tensor_ops::iterproduct_dims;

use crate::error::ImgprocError;

/// Create the grid of integer sample positions of a D-dimensional volume.
///
/// # Arguments
///
/// * `dims` - The spatial size of each axis.
///
/// # Returns
///
/// A tensor of shape (∏ dims, D) holding one row per position, in row-major
/// order, as `f32` so that it can be transformed directly.
///
/// # Example
///
/// ```
/// use tsample_imgproc::interpolation::grid::coordinate_grid;
///
/// let grid = coordinate_grid([2, 2]).unwrap();
/// assert_eq!(grid.shape, [4, 2]);
/// assert_eq!(grid.as_slice(), &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0]);
/// ```
pub fn coordinate_grid<const D: usize>(dims: [usize; D]) -> Result<CpuTensor2<f32>, ImgprocError> {
    let grid = iterproduct_dims(&dims)?;
    Ok(grid.cast::<f32>()?)
}

/// Repeat a (P, D) coordinate set once per channel, giving shape (C, P, D).
///
/// # Example
///
/// ```
/// use tsample_imgproc::interpolation::grid::{coordinate_grid, repeat_channels};
///
/// let grid = coordinate_grid([3, 4]).unwrap();
/// let coords = repeat_channels(&grid, 2).unwrap();
/// assert_eq!(coords.shape, [2, 12, 2]);
/// ```
pub fn repeat_channels<A: TensorAllocator>(
    coords: &Tensor2<f32, A>,
    channels: usize,
) -> Result<Tensor3<f32, A>, ImgprocError> {
    let [num_points, num_dims] = coords.shape;
    Ok(Tensor::from_shape_vec(
        [channels, num_points, num_dims],
        coords.as_slice().repeat(channels),
        coords.storage.alloc().clone(),
    )?)
}

/// Split a (C, spatial...) shape into the channel count and the spatial dims.
pub(crate) fn split_channels<const N: usize, const D: usize>(
    shape: [usize; N],
) -> Result<(usize, [usize; D]), ImgprocError> {
    if N != D + 1 {
        return Err(tsample_tensor::TensorError::dimension_mismatch(
            "expected a channel axis followed by the spatial axes",
            &[D + 1],
            &[N],
        )
        .into());
    }
    let mut spatial = [0; D];
    spatial.copy_from_slice(&shape[1..]);
    Ok((shape[0], spatial))
}

/// Check that `coords` holds one (P, D) coordinate set per channel.
pub(crate) fn check_coords<const D: usize, B: TensorAllocator>(
    coords: &Tensor3<f32, B>,
    channels: usize,
    spatial: [usize; D],
) -> Result<(), ImgprocError> {
    if coords.shape[0] != channels {
        return Err(ImgprocError::ChannelMismatch {
            expected: channels,
            actual: coords.shape[0],
        });
    }
    let expected = [channels, spatial.iter().product(), D];
    if coords.shape != expected {
        return Err(ImgprocError::InvalidCoordinatesShape(
            expected.to_vec(),
            coords.shape.to_vec(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsample_tensor::CpuAllocator;

    #[test]
    fn test_coordinate_grid_3d() -> Result<(), ImgprocError> {
        let grid = coordinate_grid([2, 3, 4])?;
        assert_eq!(grid.shape, [24, 3]);
        assert_eq!(grid.get([23, 0]), Some(&1.0));
        assert_eq!(grid.get([23, 1]), Some(&2.0));
        assert_eq!(grid.get([23, 2]), Some(&3.0));
        assert_eq!(grid.get([5, 2]), Some(&1.0));
        Ok(())
    }

    #[test]
    fn test_repeat_channels() -> Result<(), ImgprocError> {
        let coords = Tensor2::from_shape_vec([2, 2], vec![0.5, 1.0, 1.5, 2.0], CpuAllocator)?;
        let repeated = repeat_channels(&coords, 3)?;
        assert_eq!(repeated.shape, [3, 2, 2]);
        assert_eq!(&repeated.as_slice()[8..], coords.as_slice());
        Ok(())
    }

    #[test]
    fn test_check_coords() -> Result<(), ImgprocError> {
        let coords = Tensor3::<f32, _>::zeros([2, 6, 2], CpuAllocator)?;
        assert!(check_coords(&coords, 2, [2, 3]).is_ok());
        assert_eq!(
            check_coords(&coords, 3, [2, 3]),
            Err(ImgprocError::ChannelMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert!(matches!(
            check_coords(&coords, 2, [3, 3]),
            Err(ImgprocError::InvalidCoordinatesShape(_, _))
        ));
        Ok(())
    }
}
