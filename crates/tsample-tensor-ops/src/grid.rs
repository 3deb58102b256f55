use tsample_tensor::{CpuAllocator, CpuTensor2, Tensor, TensorAllocator};

use crate::error::TensorOpsError;

/// Compute the cartesian product of a list of pools as a 2-D tensor.
///
/// Row `r` holds one combination, with one column per pool. The last pool
/// varies fastest, so the rows come out in lexicographic order of their pool
/// indices.
///
/// With zero pools the result is a single empty combination of shape (1, 0).
/// If any pool is empty the result has shape (0, D).
///
/// # Example
///
/// ```
/// use tsample_tensor_ops::iterproduct;
///
/// let product = iterproduct(&[&[1, 2][..], &[7, 8, 9][..]]).unwrap();
/// assert_eq!(product.shape, [6, 2]);
/// assert_eq!(product.as_slice(), &[1, 7, 1, 8, 1, 9, 2, 7, 2, 8, 2, 9]);
/// ```
pub fn iterproduct<T: Clone>(pools: &[&[T]]) -> Result<CpuTensor2<T>, TensorOpsError> {
    let num_cols = pools.len();

    let mut rows: Vec<Vec<T>> = vec![Vec::with_capacity(num_cols)];
    for pool in pools {
        rows = rows
            .iter()
            .flat_map(|row| {
                pool.iter().map(move |value| {
                    let mut next = row.clone();
                    next.push(value.clone());
                    next
                })
            })
            .collect();
    }

    let num_rows = rows.len();
    let data = rows.into_iter().flatten().collect();

    Ok(Tensor::from_shape_vec([num_rows, num_cols], data, CpuAllocator)?)
}

/// Enumerate every integer coordinate of a grid with the given dimensions.
///
/// Each dimension `d` contributes the pool `0..d`; the result has shape
/// (∏ dims, dims.len()).
pub fn iterproduct_dims(dims: &[usize]) -> Result<CpuTensor2<i64>, TensorOpsError> {
    let ranges = dims
        .iter()
        .map(|&d| (0..d as i64).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let pools = ranges.iter().map(Vec::as_slice).collect::<Vec<_>>();
    iterproduct(&pools)
}

/// Enumerate every integer coordinate of a tensor in row-major order.
///
/// # Example
///
/// ```
/// use tsample_tensor::{CpuAllocator, Tensor};
/// use tsample_tensor_ops::iterproduct_like;
///
/// let x = Tensor::<f32, 2, _>::zeros([2, 2], CpuAllocator).unwrap();
/// let coords = iterproduct_like(&x).unwrap();
/// assert_eq!(coords.as_slice(), &[0, 0, 0, 1, 1, 0, 1, 1]);
/// ```
pub fn iterproduct_like<T, const N: usize, A: TensorAllocator>(
    x: &Tensor<T, N, A>,
) -> Result<CpuTensor2<i64>, TensorOpsError> {
    iterproduct_dims(&x.shape)
}
