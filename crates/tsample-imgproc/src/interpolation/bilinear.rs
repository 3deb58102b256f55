use num_traits::Float;
use tsample_tensor::{CpuAllocator, Tensor, Tensor2, Tensor3, Tensor4, TensorAllocator, TensorError};
use tsample_tensor_ops::gather_nd;

use super::grid::{check_coords, split_channels};
use super::interpolate::TRILINEAR_EPSILON;
use crate::error::ImgprocError;
use crate::parallel;

/// Multilinear interpolation of a (C, spatial...) tensor.
///
/// Each coordinate is clamped to `[0, dim - 1 - epsilon]`. The lower corner
/// is `floor(coord)` and the upper corner `min(lower + 1, dim - 1)`. The
/// 2^D corners are gathered and blended with the products of the per-axis
/// weights `d` and `1 - d`, where `d = coord - lower`.
pub(crate) fn multilinear_interp<T, const N: usize, const D: usize, A, B>(
    x: &Tensor<T, N, A>,
    coords: &Tensor3<f32, B>,
    epsilon: f32,
) -> Result<Tensor<T, N, A>, ImgprocError>
where
    T: Float + Send + Sync,
    A: TensorAllocator,
    B: TensorAllocator,
{
    let (channels, spatial) = split_channels::<N, D>(x.shape)?;
    check_coords(coords, channels, spatial)?;
    let num_points = coords.shape[1];

    let values = parallel::par_channels(channels, |c| {
        let plane = x.select_outer::<D>(c)?;
        let points = coords.select_outer::<2>(c)?;

        let mut lower = Vec::with_capacity(num_points * D);
        let mut upper = Vec::with_capacity(num_points * D);
        let mut frac = Vec::with_capacity(num_points * D);
        for point in points.as_slice().chunks_exact(D) {
            for (&v, dim) in point.iter().zip(spatial) {
                let last = dim.saturating_sub(1);
                let v = v.max(0.0).min((last as f32 - epsilon).max(0.0));
                let c0 = v.floor();
                lower.push(c0 as i64);
                upper.push((c0 as i64 + 1).min(last as i64));
                frac.push(v - c0);
            }
        }

        let mut out = vec![T::zero(); num_points];
        for corner in 0..1usize << D {
            // bit (D - 1 - axis) of `corner` selects the upper index of `axis`
            let is_upper = |axis: usize| (corner >> (D - 1 - axis)) & 1 == 1;

            let index = (0..num_points * D)
                .map(|k| if is_upper(k % D) { upper[k] } else { lower[k] })
                .collect::<Vec<_>>();
            let index = Tensor2::from_shape_vec([num_points, D], index, CpuAllocator)?;
            let corner_values = gather_nd(&plane, &index)?;

            for (p, (acc, &value)) in out.iter_mut().zip(corner_values.iter()).enumerate() {
                let weight = (0..D).fold(1.0f32, |w, axis| {
                    let d = frac[p * D + axis];
                    if is_upper(axis) {
                        w * d
                    } else {
                        w * (1.0 - d)
                    }
                });
                *acc = *acc + value * T::from(weight).ok_or(TensorError::CastError)?;
            }
        }

        Ok(out)
    })?;

    Ok(Tensor::from_shape_vec(
        x.shape,
        values,
        x.storage.alloc().clone(),
    )?)
}

/// Bilinear interpolation of a (C, H, W) image.
///
/// # Arguments
///
/// * `x` - The image with shape (C, H, W).
/// * `coords` - The sample positions with shape (C, H·W, 2).
///
/// # Returns
///
/// The sampled image with the shape of `x`. Coordinates outside the image
/// are clamped to its border.
pub fn bilinear_interp_2d<T, A, B>(
    x: &Tensor3<T, A>,
    coords: &Tensor3<f32, B>,
) -> Result<Tensor3<T, A>, ImgprocError>
where
    T: Float + Send + Sync,
    A: TensorAllocator,
    B: TensorAllocator,
{
    multilinear_interp::<T, 3, 2, A, B>(x, coords, 0.0)
}

/// Trilinear interpolation of a (C, D, H, W) volume.
///
/// `coords` has shape (C, D·H·W, 3). Coordinates are clamped slightly inside
/// the last sample of each axis.
///
/// # Example
///
/// ```
/// use tsample_tensor::{CpuAllocator, Tensor3, Tensor4};
/// use tsample_imgproc::interpolation::bilinear_interp_3d;
///
/// let x = Tensor4::<f32, _>::from_shape_fn([1, 2, 2, 2], CpuAllocator, |[_, d, _, _]| d as f32)
///     .unwrap();
/// let coords = Tensor3::from_shape_vec([1, 8, 3], [[0.25f32, 0.0, 0.0]; 8].concat(), CpuAllocator)
///     .unwrap();
/// let y = bilinear_interp_3d(&x, &coords).unwrap();
/// assert!(y.iter().all(|v| (v - 0.25).abs() < 1e-6));
/// ```
pub fn bilinear_interp_3d<T, A, B>(
    x: &Tensor4<T, A>,
    coords: &Tensor3<f32, B>,
) -> Result<Tensor4<T, A>, ImgprocError>
where
    T: Float + Send + Sync,
    A: TensorAllocator,
    B: TensorAllocator,
{
    multilinear_interp::<T, 4, 3, A, B>(x, coords, TRILINEAR_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bilinear_interp_2d_blend() -> Result<(), ImgprocError> {
        let x = Tensor3::<f32, _>::from_shape_vec(
            [1, 2, 2],
            vec![0.0, 1.0, 2.0, 3.0],
            CpuAllocator,
        )?;
        let coords = Tensor3::from_shape_vec(
            [1, 4, 2],
            vec![0.5, 0.5, 0.0, 0.25, 1.0, 0.75, 5.0, 5.0],
            CpuAllocator,
        )?;
        let y = bilinear_interp_2d(&x, &coords)?;
        assert_relative_eq!(y.as_slice()[0], 1.5);
        assert_relative_eq!(y.as_slice()[1], 0.25);
        assert_relative_eq!(y.as_slice()[2], 2.75);
        // clamped to the bottom right corner
        assert_relative_eq!(y.as_slice()[3], 3.0);
        Ok(())
    }

    #[test]
    fn test_bilinear_interp_2d_integer_coords() -> Result<(), ImgprocError> {
        let x = Tensor3::<f64, _>::from_shape_fn([2, 3, 3], CpuAllocator, |[c, i, j]| {
            (c * 9 + i * 3 + j) as f64
        })?;
        let grid = super::super::grid::coordinate_grid([3, 3])?;
        let coords = super::super::grid::repeat_channels(&grid, 2)?;
        let y = bilinear_interp_2d(&x, &coords)?;
        for (a, b) in y.iter().zip(x.iter()) {
            assert_relative_eq!(*a, *b);
        }
        Ok(())
    }

    #[test]
    fn test_trilinear_size_one_axis() -> Result<(), ImgprocError> {
        let x = Tensor4::<f32, _>::from_shape_vec([1, 1, 1, 2], vec![2.0, 4.0], CpuAllocator)?;
        let coords = Tensor3::from_shape_vec(
            [1, 2, 3],
            vec![0.7, -1.0, 0.5, 3.0, 3.0, 3.0],
            CpuAllocator,
        )?;
        let y = bilinear_interp_3d(&x, &coords)?;
        assert_relative_eq!(y.as_slice()[0], 3.0, epsilon = 1e-5);
        assert_relative_eq!(y.as_slice()[1], 4.0, epsilon = 1e-4);
        Ok(())
    }
}
