use tsample_tensor::{CpuAllocator, Tensor, Tensor2, Tensor3, Tensor4, TensorAllocator};
use tsample_tensor_ops::gather_nd;

use super::grid::{check_coords, split_channels};
use crate::error::ImgprocError;
use crate::parallel;

/// Nearest neighbor interpolation of a (C, spatial...) tensor.
///
/// Every coordinate is clamped to `[0, dim - 1]` of its axis, rounded to the
/// closest integer (ties away from zero) and gathered from the channel it
/// belongs to.
pub(crate) fn nearest_interp<T, const N: usize, const D: usize, A, B>(
    x: &Tensor<T, N, A>,
    coords: &Tensor3<f32, B>,
) -> Result<Tensor<T, N, A>, ImgprocError>
where
    T: Clone + Send + Sync,
    A: TensorAllocator,
    B: TensorAllocator,
{
    let (channels, spatial) = split_channels::<N, D>(x.shape)?;
    check_coords(coords, channels, spatial)?;
    let num_points = coords.shape[1];

    let values = parallel::par_channels(channels, |c| {
        let plane = x.select_outer::<D>(c)?;
        let points = coords.select_outer::<2>(c)?;

        let index = points
            .as_slice()
            .chunks_exact(D)
            .flat_map(|point| {
                point.iter().zip(spatial).map(|(&v, dim)| {
                    let upper = dim.saturating_sub(1) as f32;
                    v.max(0.0).min(upper).round() as i64
                })
            })
            .collect::<Vec<_>>();
        let index = Tensor2::from_shape_vec([num_points, D], index, CpuAllocator)?;

        Ok(gather_nd(&plane, &index)?.into_vec())
    })?;

    Ok(Tensor::from_shape_vec(
        x.shape,
        values,
        x.storage.alloc().clone(),
    )?)
}

/// Nearest neighbor interpolation of a (C, H, W) image.
///
/// # Arguments
///
/// * `x` - The image with shape (C, H, W).
/// * `coords` - The sample positions with shape (C, H·W, 2), one (row, col)
///   pair per output pixel and channel.
///
/// # Returns
///
/// The sampled image with the shape of `x`.
///
/// # Example
///
/// ```
/// use tsample_tensor::{CpuAllocator, Tensor3};
/// use tsample_imgproc::interpolation::{grid, nearest_interp_2d};
///
/// let x = Tensor3::<f32, _>::from_shape_vec([1, 2, 2], vec![1.0, 2.0, 3.0, 4.0], CpuAllocator)
///     .unwrap();
/// let coords = grid::repeat_channels(&grid::coordinate_grid([2, 2]).unwrap(), 1).unwrap();
/// let y = nearest_interp_2d(&x, &coords).unwrap();
/// assert_eq!(y.as_slice(), x.as_slice());
/// ```
pub fn nearest_interp_2d<T, A, B>(
    x: &Tensor3<T, A>,
    coords: &Tensor3<f32, B>,
) -> Result<Tensor3<T, A>, ImgprocError>
where
    T: Clone + Send + Sync,
    A: TensorAllocator,
    B: TensorAllocator,
{
    nearest_interp::<T, 3, 2, A, B>(x, coords)
}

/// Nearest neighbor interpolation of a (C, D, H, W) volume.
///
/// `coords` has shape (C, D·H·W, 3).
pub fn nearest_interp_3d<T, A, B>(
    x: &Tensor4<T, A>,
    coords: &Tensor3<f32, B>,
) -> Result<Tensor4<T, A>, ImgprocError>
where
    T: Clone + Send + Sync,
    A: TensorAllocator,
    B: TensorAllocator,
{
    nearest_interp::<T, 4, 3, A, B>(x, coords)
}
