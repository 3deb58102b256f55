use tsample_tensor::{Tensor, TensorAllocator, TensorError, TensorView};

use crate::error::TensorOpsError;

/// Flatten a tensor into a single axis.
///
/// The returned view shares the storage of `x`.
pub fn flatten<T, const N: usize, A: TensorAllocator>(
    x: &Tensor<T, N, A>,
) -> Result<TensorView<'_, T, 1, A>, TensorOpsError> {
    Ok(x.reshape([x.numel()])?)
}

/// Flatten all axes but the leading channel axis: (C, ...) -> (C, ∏ rest).
///
/// # Errors
///
/// Returns an error if `x` has no axes.
pub fn c_flatten<T, const N: usize, A: TensorAllocator>(
    x: &Tensor<T, N, A>,
) -> Result<TensorView<'_, T, 2, A>, TensorOpsError> {
    if N < 1 {
        return Err(TensorError::dimension_mismatch(
            "channel flatten needs at least one axis",
            &[1],
            &[N],
        )
        .into());
    }
    let rest = x.shape[1..].iter().product();
    Ok(x.reshape([x.shape[0], rest])?)
}

/// Flatten all axes but the batch and channel axes: (B, C, ...) -> (B, C, ∏ rest).
///
/// # Errors
///
/// Returns an error if `x` has fewer than two axes.
///
/// # Example
///
/// ```
/// use tsample_tensor::{CpuAllocator, Tensor};
/// use tsample_tensor_ops::bc_flatten;
///
/// let x = Tensor::<u8, 4, _>::zeros([2, 3, 4, 5], CpuAllocator).unwrap();
/// assert_eq!(bc_flatten(&x).unwrap().shape, [2, 3, 20]);
/// ```
pub fn bc_flatten<T, const N: usize, A: TensorAllocator>(
    x: &Tensor<T, N, A>,
) -> Result<TensorView<'_, T, 3, A>, TensorOpsError> {
    if N < 2 {
        return Err(TensorError::dimension_mismatch(
            "batch-channel flatten needs at least two axes",
            &[2],
            &[N],
        )
        .into());
    }
    let rest = x.shape[2..].iter().product();
    Ok(x.reshape([x.shape[0], x.shape[1], rest])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsample_tensor::CpuAllocator;

    #[test]
    fn test_flatten() -> Result<(), TensorOpsError> {
        let x = Tensor::<u8, 3, _>::from_shape_fn([2, 3, 4], CpuAllocator, |[c, i, j]| {
            (c * 12 + i * 4 + j) as u8
        })?;
        let flat = flatten(&x)?;
        assert_eq!(flat.shape, [24]);
        assert_eq!(flat.as_slice(), x.as_slice());
        Ok(())
    }

    #[test]
    fn test_c_flatten() -> Result<(), TensorOpsError> {
        let x = Tensor::<f32, 3, _>::zeros([3, 4, 5], CpuAllocator)?;
        let flat = c_flatten(&x)?;
        assert_eq!(flat.shape, [3, 20]);
        assert_eq!(flat.strides, [20, 1]);

        let empty = Tensor::<f32, 3, _>::zeros([0, 4, 5], CpuAllocator)?;
        assert_eq!(c_flatten(&empty)?.shape, [0, 20]);
        Ok(())
    }

    #[test]
    fn test_flatten_too_few_axes() -> Result<(), TensorOpsError> {
        let scalar = Tensor::<f32, 0, _>::from_shape_vec([], vec![1.0], CpuAllocator)?;
        assert!(c_flatten(&scalar).is_err());
        assert_eq!(flatten(&scalar)?.shape, [1]);

        let row = Tensor::<f32, 1, _>::zeros([4], CpuAllocator)?;
        assert!(matches!(
            bc_flatten(&row),
            Err(TensorOpsError::TensorError(TensorError::DimensionMismatch { .. }))
        ));
        Ok(())
    }
}
