use num_traits::Float;
use tsample_tensor::{Tensor, Tensor1, Tensor2, TensorAllocator, TensorError};

use crate::error::TensorOpsError;

fn cast<T: Float>(value: usize) -> Result<T, TensorError> {
    T::from(value).ok_or(TensorError::CastError)
}

fn mean<T: Float>(values: impl Iterator<Item = T>, count: usize) -> Result<T, TensorError> {
    Ok(values.fold(T::zero(), |acc, v| acc + v) / cast(count)?)
}

// clamp keeping NaN as NaN
fn clamp_unit<T: Float>(value: T) -> T {
    if value > T::one() {
        T::one()
    } else if value < -T::one() {
        -T::one()
    } else {
        value
    }
}

/// Pearson correlation coefficient between two 1-D tensors.
///
/// `r = Σ(x-x̄)(y-ȳ) / (‖x-x̄‖ · ‖y-ȳ‖)`. A constant input has zero norm and
/// yields NaN.
///
/// # Errors
///
/// Returns an error if the tensors have different lengths.
///
/// # Example
///
/// ```
/// use tsample_tensor::{CpuAllocator, Tensor1};
/// use tsample_tensor_ops::pearsonr;
///
/// let x = Tensor1::<f64, _>::from_shape_vec([3], vec![1.0, 2.0, 3.0], CpuAllocator).unwrap();
/// let y = Tensor1::<f64, _>::from_shape_vec([3], vec![6.0, 4.0, 2.0], CpuAllocator).unwrap();
/// assert!((pearsonr(&x, &y).unwrap() + 1.0).abs() < 1e-12);
/// ```
pub fn pearsonr<T, A>(x: &Tensor1<T, A>, y: &Tensor1<T, A>) -> Result<T, TensorOpsError>
where
    T: Float,
    A: TensorAllocator,
{
    if x.shape != y.shape {
        return Err(TensorOpsError::ShapeMismatch(
            x.shape.to_vec(),
            y.shape.to_vec(),
        ));
    }

    let n = x.numel();
    let mean_x = mean(x.iter().copied(), n)?;
    let mean_y = mean(y.iter().copied(), n)?;

    let (r_num, sq_x, sq_y) = x.iter().zip(y.iter()).fold(
        (T::zero(), T::zero(), T::zero()),
        |(num, sx, sy), (&a, &b)| {
            let xm = a - mean_x;
            let ym = b - mean_y;
            (num + xm * ym, sx + xm * xm, sy + ym * ym)
        },
    );

    Ok(r_num / (sq_x.sqrt() * sq_y.sqrt()))
}

/// Correlation matrix between the rows of a 2-D tensor.
///
/// For `x` of shape (R, N) the result has shape (R, R), where entry (i, j)
/// is the covariance of rows i and j (normalized by N - 1) divided by the
/// standard deviations of both rows. Values are clamped to [-1, 1].
///
/// # Example
///
/// ```
/// use tsample_tensor::{CpuAllocator, Tensor2};
/// use tsample_tensor_ops::corrcoef;
///
/// let x = Tensor2::<f32, _>::from_shape_vec([2, 3], vec![1.0, 2.0, 3.0, 3.0, 2.0, 1.0], CpuAllocator)
///     .unwrap();
/// let c = corrcoef(&x).unwrap();
/// assert_eq!(c.shape, [2, 2]);
/// assert!((c.get_unchecked([0, 1]) + 1.0).abs() < 1e-6);
/// ```
pub fn corrcoef<T, A>(x: &Tensor2<T, A>) -> Result<Tensor2<T, A>, TensorOpsError>
where
    T: Float,
    A: TensorAllocator,
{
    let [num_rows, num_cols] = x.shape;

    let data = x.as_slice();

    let centered = (0..num_rows)
        .map(|i| &data[i * num_cols..(i + 1) * num_cols])
        .map(|row| {
            let m = mean(row.iter().copied(), num_cols)?;
            Ok(row.iter().map(|&v| v - m).collect::<Vec<_>>())
        })
        .collect::<Result<Vec<_>, TensorError>>()?;

    let divisor = cast::<T>(num_cols)? - T::one();
    let cov = |i: usize, j: usize| {
        centered[i]
            .iter()
            .zip(&centered[j])
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
            / divisor
    };

    let stddev = (0..num_rows).map(|i| cov(i, i).sqrt()).collect::<Vec<_>>();

    let data = (0..num_rows * num_rows)
        .map(|k| {
            let (i, j) = (k / num_rows, k % num_rows);
            clamp_unit(cov(i, j) / stddev[j] / stddev[i])
        })
        .collect();

    Ok(Tensor::from_shape_vec(
        [num_rows, num_rows],
        data,
        x.storage.alloc().clone(),
    )?)
}

/// Pearson correlation between every column of `x` and every column of `y`.
///
/// For `x` of shape (N, P) and `y` of shape (N, Q) the result has shape
/// (P, Q).
///
/// # Errors
///
/// Returns an error if `x` and `y` have a different number of rows.
pub fn matrixcorr<T, A>(x: &Tensor2<T, A>, y: &Tensor2<T, A>) -> Result<Tensor2<T, A>, TensorOpsError>
where
    T: Float,
    A: TensorAllocator,
{
    if x.shape[0] != y.shape[0] {
        return Err(TensorOpsError::ShapeMismatch(
            x.shape.to_vec(),
            y.shape.to_vec(),
        ));
    }

    let xm = center_columns(x)?;
    let ym = center_columns(y)?;
    let [num_rows, p] = x.shape;
    let q = y.shape[1];

    let column_norm = |m: &[T], cols: usize, j: usize| {
        (0..num_rows)
            .fold(T::zero(), |acc, r| acc + m[r * cols + j] * m[r * cols + j])
            .sqrt()
    };
    let norm_x = (0..p).map(|j| column_norm(&xm, p, j)).collect::<Vec<_>>();
    let norm_y = (0..q).map(|j| column_norm(&ym, q, j)).collect::<Vec<_>>();

    let data = (0..p * q)
        .map(|k| {
            let (i, j) = (k / q, k % q);
            let r_num = (0..num_rows).fold(T::zero(), |acc, r| acc + xm[r * p + i] * ym[r * q + j]);
            r_num / (norm_x[i] * norm_y[j])
        })
        .collect();

    Ok(Tensor::from_shape_vec([p, q], data, x.storage.alloc().clone())?)
}

// subtract the mean of each column, row-major output
fn center_columns<T: Float, A: TensorAllocator>(x: &Tensor2<T, A>) -> Result<Vec<T>, TensorError> {
    let [num_rows, num_cols] = x.shape;
    let data = x.as_slice();
    let means = (0..num_cols)
        .map(|j| mean((0..num_rows).map(|r| data[r * num_cols + j]), num_rows))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(data
        .iter()
        .enumerate()
        .map(|(k, &v)| v - means[k % num_cols])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tsample_tensor::CpuAllocator;

    #[test]
    fn test_pearsonr() -> Result<(), TensorOpsError> {
        let x = Tensor1::<f64, _>::from_shape_vec([5], vec![1.0, 2.0, 3.0, 4.0, 5.0], CpuAllocator)?;
        let y = Tensor1::<f64, _>::from_shape_vec([5], vec![2.0, 4.0, 5.0, 4.0, 5.0], CpuAllocator)?;
        // r = 6 / sqrt(10 * 6)
        assert_relative_eq!(pearsonr(&x, &y)?, 0.7745966692414834, epsilon = 1e-12);
        assert_relative_eq!(pearsonr(&x, &x)?, 1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_pearsonr_constant_is_nan() -> Result<(), TensorOpsError> {
        let x = Tensor1::<f32, _>::from_shape_vec([3], vec![1.0, 2.0, 3.0], CpuAllocator)?;
        let y = Tensor1::<f32, _>::from_shape_val([3], 4.0, CpuAllocator)?;
        assert!(pearsonr(&x, &y)?.is_nan());
        Ok(())
    }

    #[test]
    fn test_pearsonr_length_mismatch() -> Result<(), TensorOpsError> {
        let x = Tensor1::<f32, _>::zeros([3], CpuAllocator)?;
        let y = Tensor1::<f32, _>::zeros([4], CpuAllocator)?;
        assert_eq!(
            pearsonr(&x, &y),
            Err(TensorOpsError::ShapeMismatch(vec![3], vec![4]))
        );
        Ok(())
    }

    #[test]
    fn test_corrcoef() -> Result<(), TensorOpsError> {
        let x = Tensor2::<f64, _>::from_shape_vec(
            [3, 4],
            vec![
                1.0, 2.0, 3.0, 4.0, //
                2.0, 4.0, 6.0, 8.5, //
                4.0, 3.0, 2.0, 1.0,
            ],
            CpuAllocator,
        )?;
        let c = corrcoef(&x)?;
        assert_eq!(c.shape, [3, 3]);
        for i in 0..3 {
            assert_relative_eq!(*c.get_unchecked([i, i]), 1.0, epsilon = 1e-12);
            for j in 0..3 {
                assert_relative_eq!(
                    *c.get_unchecked([i, j]),
                    *c.get_unchecked([j, i]),
                    epsilon = 1e-12
                );
                assert!(c.get_unchecked([i, j]).abs() <= 1.0);
            }
        }
        assert_relative_eq!(*c.get_unchecked([0, 2]), -1.0, epsilon = 1e-12);

        let row0 = Tensor1::from_shape_slice([4], &x.as_slice()[0..4], CpuAllocator)?;
        let row1 = Tensor1::from_shape_slice([4], &x.as_slice()[4..8], CpuAllocator)?;
        assert_relative_eq!(
            *c.get_unchecked([0, 1]),
            pearsonr(&row0, &row1)?,
            epsilon = 1e-12
        );
        Ok(())
    }

    #[test]
    fn test_matrixcorr() -> Result<(), TensorOpsError> {
        let x = Tensor2::<f64, _>::from_shape_vec(
            [4, 2],
            vec![1.0, 4.0, 2.0, 3.0, 3.0, 2.0, 4.0, 1.0],
            CpuAllocator,
        )?;
        let y = Tensor2::<f64, _>::from_shape_vec(
            [4, 3],
            vec![
                2.0, 1.0, 0.0, //
                4.0, 3.0, 1.0, //
                6.0, 2.0, 0.0, //
                8.0, 5.0, 1.0,
            ],
            CpuAllocator,
        )?;
        let r = matrixcorr(&x, &y)?;
        assert_eq!(r.shape, [2, 3]);
        assert_relative_eq!(*r.get_unchecked([0, 0]), 1.0, epsilon = 1e-12);
        assert_relative_eq!(*r.get_unchecked([1, 0]), -1.0, epsilon = 1e-12);

        let col0 = Tensor1::from_shape_vec([4], vec![1.0, 2.0, 3.0, 4.0], CpuAllocator)?;
        let col1 = Tensor1::from_shape_vec([4], vec![1.0, 3.0, 2.0, 5.0], CpuAllocator)?;
        assert_relative_eq!(
            *r.get_unchecked([0, 1]),
            pearsonr(&col0, &col1)?,
            epsilon = 1e-12
        );
        Ok(())
    }

    #[test]
    fn test_matrixcorr_row_mismatch() -> Result<(), TensorOpsError> {
        let x = Tensor2::<f32, _>::zeros([4, 2], CpuAllocator)?;
        let y = Tensor2::<f32, _>::zeros([3, 2], CpuAllocator)?;
        assert!(matches!(
            matrixcorr(&x, &y),
            Err(TensorOpsError::ShapeMismatch(_, _))
        ));
        Ok(())
    }
}
