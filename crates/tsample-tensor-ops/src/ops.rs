use num_traits::Float;
use tsample_tensor::{Tensor, Tensor1, Tensor2, TensorAllocator, TensorError, TensorView};

use crate::error::TensorOpsError;

/// Summed absolute difference below which two tensors are considered equal.
pub const ALLCLOSE_TOLERANCE: f64 = 1e-5;

/// Determine whether two tensors hold the same values.
///
/// The tensors are close when the sum of the absolute element differences is
/// below [`ALLCLOSE_TOLERANCE`].
///
/// # Errors
///
/// If the shapes of the tensors don't match, an error is returned.
///
/// # Example
///
/// ```
/// use tsample_tensor::{CpuAllocator, Tensor};
/// use tsample_tensor_ops::allclose;
///
/// let a = Tensor::<f32, 1, _>::from_shape_slice([3], &[1.0, 2.0, 3.0], CpuAllocator).unwrap();
/// let b = Tensor::<f32, 1, _>::from_shape_slice([3], &[1.0, 2.0, 3.000001], CpuAllocator).unwrap();
/// assert!(allclose(&a, &b).unwrap());
/// ```
pub fn allclose<T, const N: usize, A>(
    a: &Tensor<T, N, A>,
    b: &Tensor<T, N, A>,
) -> Result<bool, TensorOpsError>
where
    T: Float,
    A: TensorAllocator,
{
    if a.shape != b.shape {
        return Err(TensorOpsError::ShapeMismatch(
            a.shape.to_vec(),
            b.shape.to_vec(),
        ));
    }

    let tolerance = T::from(ALLCLOSE_TOLERANCE).ok_or(TensorError::CastError)?;
    let diff = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .fold(T::zero(), |acc, (&x, &y)| acc + (x - y).abs());

    Ok(diff < tolerance)
}

/// Gather elements of a tensor at integer N-dimensional coordinates.
///
/// Each row of `coords` is converted to a flat offset with the row-major
/// strides of `x` (`offset = Σ coord_i · stride_i`) and the element at that
/// offset is selected.
///
/// # Arguments
///
/// * `x` - The tensor (or a view of one sample of a batch) to gather from.
/// * `coords` - The coordinates with shape (P, N).
///
/// # Returns
///
/// A 1-D tensor with the P gathered values.
///
/// # Errors
///
/// * `coords` must have exactly N columns.
/// * Every coordinate must satisfy `0 <= coord_i < x.shape[i]`; an
///   out-of-range coordinate is reported as [`TensorError::IndexOutOfBounds`].
///
/// # Example
///
/// ```
/// use tsample_tensor::{CpuAllocator, Tensor};
/// use tsample_tensor_ops::gather_nd;
///
/// let x = Tensor::<f32, 2, _>::from_shape_vec([2, 3], vec![0., 1., 2., 3., 4., 5.], CpuAllocator)
///     .unwrap();
/// let coords = Tensor::<i64, 2, _>::from_shape_vec([2, 2], vec![1, 2, 0, 1], CpuAllocator)
///     .unwrap();
/// let values = gather_nd(&x.view(), &coords).unwrap();
/// assert_eq!(values.as_slice(), &[5.0, 1.0]);
/// ```
pub fn gather_nd<T, const N: usize, A, B>(
    x: &TensorView<'_, T, N, A>,
    coords: &Tensor2<i64, B>,
) -> Result<Tensor1<T, A>, TensorOpsError>
where
    T: Clone,
    A: TensorAllocator,
    B: TensorAllocator,
{
    if coords.shape[1] != N {
        return Err(TensorOpsError::ShapeMismatch(
            vec![coords.shape[0], N],
            coords.shape.to_vec(),
        ));
    }

    let data = x.as_slice();
    let num_points = coords.shape[0];

    let values = if N == 0 {
        // a 0-d tensor holds a single element every empty coordinate points at
        vec![data[0].clone(); num_points]
    } else {
        coords
            .as_slice()
            .chunks_exact(N)
            .map(|coord| {
                let mut offset = 0;
                for ((&c, &dim), &stride) in coord.iter().zip(&x.shape).zip(&x.strides) {
                    if c < 0 || c as usize >= dim {
                        return Err(TensorError::index_out_of_bounds(c, dim));
                    }
                    offset += c as usize * stride;
                }
                Ok(data[offset].clone())
            })
            .collect::<Result<Vec<T>, TensorError>>()?
    };

    Ok(Tensor::from_shape_vec(
        [num_points],
        values,
        x.storage.alloc().clone(),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsample_tensor::CpuAllocator;

    #[test]
    fn test_allclose() -> Result<(), TensorOpsError> {
        let a = Tensor::<f64, 2, _>::from_shape_vec([2, 2], vec![1.0, 2.0, 3.0, 4.0], CpuAllocator)?;
        let b = a.map(|x| x + 1e-7)?;
        let c = a.map(|x| x + 1e-3)?;
        assert!(allclose(&a, &b)?);
        assert!(!allclose(&a, &c)?);
        Ok(())
    }

    #[test]
    fn test_allclose_shape_mismatch() -> Result<(), TensorOpsError> {
        let a = Tensor::<f32, 2, _>::zeros([2, 2], CpuAllocator)?;
        let b = Tensor::<f32, 2, _>::zeros([4, 1], CpuAllocator)?;
        assert_eq!(
            allclose(&a, &b),
            Err(TensorOpsError::ShapeMismatch(vec![2, 2], vec![4, 1]))
        );
        Ok(())
    }

    #[test]
    fn test_gather_nd_3d() -> Result<(), TensorOpsError> {
        let x = Tensor::<i32, 3, _>::from_shape_fn([2, 3, 4], CpuAllocator, |[i, j, k]| {
            (i * 100 + j * 10 + k) as i32
        })?;
        let coords = Tensor::<i64, 2, _>::from_shape_vec(
            [3, 3],
            vec![0, 0, 0, 1, 2, 3, 1, 0, 2],
            CpuAllocator,
        )?;
        let values = gather_nd(&x.view(), &coords)?;
        assert_eq!(values.shape, [3]);
        assert_eq!(values.as_slice(), &[0, 123, 102]);
        Ok(())
    }

    #[test]
    fn test_gather_nd_channel_view() -> Result<(), TensorOpsError> {
        let x = Tensor::<f32, 3, _>::from_shape_fn([2, 2, 2], CpuAllocator, |[c, i, j]| {
            (c * 4 + i * 2 + j) as f32
        })?;
        let coords = Tensor::<i64, 2, _>::from_shape_vec([2, 2], vec![0, 0, 1, 1], CpuAllocator)?;
        let plane = x.select_outer::<2>(1)?;
        let values = gather_nd(&plane, &coords)?;
        assert_eq!(values.as_slice(), &[4.0, 7.0]);
        Ok(())
    }

    #[test]
    fn test_gather_nd_out_of_range() -> Result<(), TensorOpsError> {
        let x = Tensor::<f32, 2, _>::zeros([2, 3], CpuAllocator)?;

        let too_far = Tensor::<i64, 2, _>::from_shape_vec([1, 2], vec![0, 3], CpuAllocator)?;
        assert_eq!(
            gather_nd(&x.view(), &too_far).err(),
            Some(TensorOpsError::TensorError(TensorError::IndexOutOfBounds {
                index: 3,
                size: 3
            }))
        );

        let negative = Tensor::<i64, 2, _>::from_shape_vec([1, 2], vec![-1, 0], CpuAllocator)?;
        assert!(gather_nd(&x.view(), &negative).is_err());
        Ok(())
    }

    #[test]
    fn test_gather_nd_wrong_rank() -> Result<(), TensorOpsError> {
        let x = Tensor::<f32, 2, _>::zeros([2, 3], CpuAllocator)?;
        let coords = Tensor::<i64, 2, _>::from_shape_vec([1, 3], vec![0, 0, 0], CpuAllocator)?;
        assert!(matches!(
            gather_nd(&x.view(), &coords),
            Err(TensorOpsError::ShapeMismatch(_, _))
        ));
        Ok(())
    }
}
