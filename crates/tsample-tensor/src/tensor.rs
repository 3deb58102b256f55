use num_traits::NumCast;
use thiserror::Error;

use super::{
    allocator::{TensorAllocator, TensorAllocatorError},
    storage::TensorStorage,
    view::TensorView,
};

/// Error type for tensor creation, indexing and conversion.
#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    /// Type casting operation failed.
    ///
    /// This occurs when a value cannot be represented in the target type,
    /// e.g. casting a negative integer to `usize` or a NaN to an integer.
    #[error("Type cast failed: source data cannot be safely converted to target type. Check value ranges.")]
    CastError,

    /// Tensor shape does not match the provided data.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// Index exceeds tensor bounds.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: i64,
        /// The size of the dimension being indexed
        size: usize,
    },

    /// Underlying storage operation failed.
    #[error("Storage error: {0}")]
    StorageError(#[from] TensorAllocatorError),

    /// Tensor dimensions incompatible for the requested operation.
    #[error("Dimension mismatch: {message}. Expected shape: {expected}, got: {actual}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
        /// Expected shape description
        expected: String,
        /// Actual shape description
        actual: String,
    },
}

impl TensorError {
    /// Creates an InvalidShape error.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Creates an IndexOutOfBounds error.
    pub fn index_out_of_bounds(index: i64, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }

    /// Creates a DimensionMismatch error with formatted shapes.
    pub fn dimension_mismatch(
        message: impl Into<String>,
        expected: &[usize],
        actual: &[usize],
    ) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

/// Computes the strides for a row-major (C-contiguous) tensor layout.
///
/// The rightmost dimension has stride 1, and each dimension's stride is the
/// product of all dimensions to its right.
///
/// # Examples
///
/// ```rust
/// use tsample_tensor::tensor::get_strides_from_shape;
///
/// assert_eq!(get_strides_from_shape([2, 3]), [3, 1]);
/// assert_eq!(get_strides_from_shape([2, 3, 4]), [12, 4, 1]);
/// ```
pub fn get_strides_from_shape<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides: [usize; N] = [0; N];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// A multi-dimensional array (tensor) with owned data.
///
/// # Type Parameters
///
/// * `T` - The element type stored in the tensor
/// * `N` - The number of dimensions (const generic, checked at compile time)
/// * `A` - The allocator providing the memory
///
/// Tensors are always stored in row-major (C-contiguous) layout where the
/// rightmost dimension varies fastest.
///
/// # Example
///
/// ```rust
/// use tsample_tensor::{CpuAllocator, Tensor2};
///
/// let data: Vec<u8> = vec![1, 2, 3, 4];
/// let t = Tensor2::<u8, _>::from_shape_vec([2, 2], data, CpuAllocator).unwrap();
/// assert_eq!(t.shape, [2, 2]);
/// ```
pub struct Tensor<T, const N: usize, A: TensorAllocator> {
    /// The storage of the tensor.
    pub storage: TensorStorage<T, A>,
    /// The shape of the tensor.
    pub shape: [usize; N],
    /// The strides of the tensor data in memory.
    pub strides: [usize; N],
}

impl<T, const N: usize, A: TensorAllocator> Tensor<T, N, A> {
    /// Get the data of the tensor as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// Get the data of the tensor as a mutable slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    /// Get the data of the tensor as a pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Consumes the tensor and returns the underlying vector.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.storage.into_vec()
    }

    /// Returns an iterator over the elements of the tensor in row-major order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Creates a new `Tensor` with the given shape and data.
    ///
    /// # Arguments
    ///
    /// * `shape` - An array containing the shape of the tensor.
    /// * `data` - A vector containing the data of the tensor.
    /// * `alloc` - The allocator to use.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape of the tensor, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use tsample_tensor::{CpuAllocator, Tensor2};
    ///
    /// let t = Tensor2::<u8, _>::from_shape_vec([2, 2], vec![1, 2, 3, 4], CpuAllocator).unwrap();
    /// assert_eq!(t.shape, [2, 2]);
    /// assert_eq!(t.strides, [2, 1]);
    /// ```
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>, alloc: A) -> Result<Self, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(TensorError::invalid_shape(numel, data.len()));
        }
        let storage = TensorStorage::from_vec(data, alloc)?;
        let strides = get_strides_from_shape(shape);
        Ok(Self {
            storage,
            shape,
            strides,
        })
    }

    /// Creates a new `Tensor` with the given shape and slice of data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape of the tensor, an error is returned.
    pub fn from_shape_slice(shape: [usize; N], data: &[T], alloc: A) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        Self::from_shape_vec(shape, data.to_vec(), alloc)
    }

    /// Creates a new `Tensor` with the given shape filled with `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use tsample_tensor::{CpuAllocator, Tensor3};
    ///
    /// let t = Tensor3::<u8, _>::from_shape_val([2, 1, 3], 2, CpuAllocator).unwrap();
    /// assert_eq!(t.as_slice(), vec![2, 2, 2, 2, 2, 2]);
    /// ```
    pub fn from_shape_val(shape: [usize; N], value: T, alloc: A) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        let numel = shape.iter().product::<usize>();
        Self::from_shape_vec(shape, vec![value; numel], alloc)
    }

    /// Create a new `Tensor` with the given shape and a function to generate the data.
    ///
    /// The function `f` is called with the index of each element in row-major order.
    ///
    /// # Example
    ///
    /// ```
    /// use tsample_tensor::{CpuAllocator, Tensor2};
    ///
    /// let t = Tensor2::<u8, _>::from_shape_fn([2, 2], CpuAllocator, |[i, j]| (i * 2 + j) as u8)
    ///     .unwrap();
    /// assert_eq!(t.as_slice(), vec![0, 1, 2, 3]);
    /// ```
    pub fn from_shape_fn<F>(shape: [usize; N], alloc: A, f: F) -> Result<Self, TensorError>
    where
        F: Fn([usize; N]) -> T,
    {
        let numel = shape.iter().product::<usize>();
        let data: Vec<T> = (0..numel)
            .map(|i| {
                let mut index = [0; N];
                let mut j = i;
                for k in (0..N).rev() {
                    index[k] = j % shape[k];
                    j /= shape[k];
                }
                f(index)
            })
            .collect();
        Self::from_shape_vec(shape, data, alloc)
    }

    /// Create a new tensor with all elements set to zero.
    pub fn zeros(shape: [usize; N], alloc: A) -> Result<Self, TensorError>
    where
        T: Clone + num_traits::Zero,
    {
        Self::from_shape_val(shape, T::zero(), alloc)
    }

    /// Returns the number of elements in the tensor.
    #[inline]
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Get the offset of the element at the given index, or `None` if any
    /// component is out of bounds.
    pub fn get_iter_offset(&self, index: [usize; N]) -> Option<usize> {
        let mut offset = 0;
        for ((&idx, dim_size), stride) in index.iter().zip(self.shape).zip(self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }

    /// Get the element at the given index without checking if the index is out of bounds.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset lies outside the storage.
    pub fn get_unchecked(&self, index: [usize; N]) -> &T {
        let offset = index
            .iter()
            .zip(self.strides)
            .fold(0, |acc, (&idx, stride)| acc + idx * stride);
        &self.as_slice()[offset]
    }

    /// Get the element at the given index, checking if the index is out of bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use tsample_tensor::{CpuAllocator, Tensor2};
    ///
    /// let t = Tensor2::<u8, _>::from_shape_vec([2, 2], vec![1, 2, 3, 4], CpuAllocator).unwrap();
    /// assert_eq!(t.get([1, 0]), Some(&3));
    /// assert!(t.get([2, 0]).is_none());
    /// ```
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        self.get_iter_offset(index)
            .and_then(|i| self.as_slice().get(i))
    }

    /// Reshape the tensor to a new shape without copying.
    ///
    /// # Errors
    ///
    /// If the number of elements in the new shape does not match the number of elements in the tensor, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use tsample_tensor::{CpuAllocator, Tensor1};
    ///
    /// let t = Tensor1::<u8, _>::from_shape_vec([4], vec![1, 2, 3, 4], CpuAllocator).unwrap();
    /// let t2 = t.reshape([2, 2]).unwrap();
    /// assert_eq!(t2.shape, [2, 2]);
    /// assert_eq!(t2.strides, [2, 1]);
    /// assert_eq!(t2.as_slice(), &[1, 2, 3, 4]);
    /// ```
    pub fn reshape<const M: usize>(
        &self,
        shape: [usize; M],
    ) -> Result<TensorView<'_, T, M, A>, TensorError> {
        self.view().reshape(shape)
    }

    /// Return a view over the whole tensor.
    pub fn view(&self) -> TensorView<'_, T, N, A> {
        TensorView {
            storage: &self.storage,
            offset: 0,
            shape: self.shape,
            strides: self.strides,
        }
    }

    /// Select one index along the leading axis, dropping that axis.
    ///
    /// For a (C, H, W) tensor `select_outer::<2>(c)` is the (H, W) plane of
    /// channel `c`. `M` must be `N - 1`.
    ///
    /// # Errors
    ///
    /// Returns an error if `M + 1 != N` or `index >= shape[0]`.
    ///
    /// # Example
    ///
    /// ```
    /// use tsample_tensor::{CpuAllocator, Tensor3};
    ///
    /// let t = Tensor3::<u8, _>::from_shape_fn([2, 2, 2], CpuAllocator, |[c, i, j]| {
    ///     (c * 4 + i * 2 + j) as u8
    /// })
    /// .unwrap();
    /// let plane = t.select_outer::<2>(1).unwrap();
    /// assert_eq!(plane.shape, [2, 2]);
    /// assert_eq!(plane.as_slice(), &[4, 5, 6, 7]);
    /// ```
    pub fn select_outer<const M: usize>(
        &self,
        index: usize,
    ) -> Result<TensorView<'_, T, M, A>, TensorError> {
        self.view().select_outer(index)
    }

    /// Apply a function to each element of the tensor.
    ///
    /// # Example
    ///
    /// ```
    /// use tsample_tensor::{CpuAllocator, Tensor1};
    ///
    /// let t = Tensor1::<u8, _>::from_shape_vec([4], vec![1, 2, 3, 4], CpuAllocator).unwrap();
    /// let t2 = t.map(|x| *x + 1).unwrap();
    /// assert_eq!(t2.as_slice(), vec![2, 3, 4, 5]);
    /// ```
    pub fn map<U, F>(&self, f: F) -> Result<Tensor<U, N, A>, TensorError>
    where
        F: Fn(&T) -> U,
    {
        let data: Vec<U> = self.as_slice().iter().map(f).collect();
        Tensor::from_shape_vec(self.shape, data, self.storage.alloc().clone())
    }

    /// Cast the tensor to a new numeric type.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::CastError`] if any value cannot be represented in `U`.
    ///
    /// # Example
    ///
    /// ```
    /// use tsample_tensor::{CpuAllocator, Tensor1};
    ///
    /// let t = Tensor1::<i64, _>::from_shape_vec([4], vec![1, 2, 3, 4], CpuAllocator).unwrap();
    /// let t2 = t.cast::<f32>().unwrap();
    /// assert_eq!(t2.as_slice(), vec![1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn cast<U>(&self) -> Result<Tensor<U, N, A>, TensorError>
    where
        T: NumCast + Copy,
        U: NumCast,
    {
        let data = self
            .as_slice()
            .iter()
            .map(|&x| U::from(x).ok_or(TensorError::CastError))
            .collect::<Result<Vec<U>, _>>()?;
        Tensor::from_shape_vec(self.shape, data, self.storage.alloc().clone())
    }

    /// Perform an element-wise operation on two tensors of the same shape.
    ///
    /// # Example
    ///
    /// ```
    /// use tsample_tensor::{CpuAllocator, Tensor1};
    ///
    /// let t1 = Tensor1::<u8, _>::from_shape_vec([4], vec![1, 2, 3, 4], CpuAllocator).unwrap();
    /// let t2 = Tensor1::<u8, _>::from_shape_vec([4], vec![1, 2, 3, 4], CpuAllocator).unwrap();
    /// let t3 = t1.element_wise_op(&t2, |a, b| *a + *b).unwrap();
    /// assert_eq!(t3.as_slice(), vec![2, 4, 6, 8]);
    /// ```
    pub fn element_wise_op<F>(&self, other: &Tensor<T, N, A>, op: F) -> Result<Self, TensorError>
    where
        F: Fn(&T, &T) -> T,
    {
        if self.shape != other.shape {
            return Err(TensorError::dimension_mismatch(
                "Element-wise operations require identical shapes",
                &self.shape,
                &other.shape,
            ));
        }

        let data = self
            .as_slice()
            .iter()
            .zip(other.as_slice().iter())
            .map(|(a, b)| op(a, b))
            .collect();

        Tensor::from_shape_vec(self.shape, data, self.storage.alloc().clone())
    }
}

impl<T: Clone, const N: usize, A: TensorAllocator> Clone for Tensor<T, N, A> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            shape: self.shape,
            strides: self.strides,
        }
    }
}

impl<T: std::fmt::Debug, const N: usize, A: TensorAllocator> std::fmt::Debug for Tensor<T, N, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .field("data", &self.as_slice())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::allocator::CpuAllocator;
    use crate::{Tensor, TensorError};

    #[test]
    fn constructor_1d() -> Result<(), TensorError> {
        let data: Vec<u8> = vec![1];
        let t = Tensor::<u8, 1, _>::from_shape_vec([1], data, CpuAllocator)?;
        assert_eq!(t.shape, [1]);
        assert_eq!(t.as_slice(), vec![1]);
        assert_eq!(t.strides, [1]);
        assert_eq!(t.numel(), 1);
        Ok(())
    }

    #[test]
    fn constructor_3d() -> Result<(), TensorError> {
        let data: Vec<u8> = vec![1, 2, 3, 4, 5, 6];
        let t = Tensor::<u8, 3, _>::from_shape_vec([2, 1, 3], data, CpuAllocator)?;
        assert_eq!(t.shape, [2, 1, 3]);
        assert_eq!(t.strides, [3, 3, 1]);
        assert_eq!(t.numel(), 6);
        Ok(())
    }

    #[test]
    fn constructor_invalid_shape() {
        let res = Tensor::<u8, 2, _>::from_shape_vec([2, 2], vec![1, 2, 3], CpuAllocator);
        assert!(matches!(
            res,
            Err(TensorError::InvalidShape {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn get_3d() -> Result<(), TensorError> {
        let data: Vec<u8> = vec![1, 2, 3, 4, 5, 6];
        let t = Tensor::<u8, 3, _>::from_shape_vec([2, 1, 3], data, CpuAllocator)?;
        assert_eq!(t.get([0, 0, 0]), Some(&1));
        assert_eq!(t.get([0, 0, 2]), Some(&3));
        assert_eq!(t.get([1, 0, 1]), Some(&5));
        assert_eq!(*t.get_unchecked([1, 0, 2]), 6);
        assert!(t.get([1, 1, 0]).is_none());
        Ok(())
    }

    #[test]
    fn from_shape_fn_row_major() -> Result<(), TensorError> {
        let t = Tensor::<usize, 3, _>::from_shape_fn([2, 3, 4], CpuAllocator, |[i, j, k]| {
            i * 12 + j * 4 + k
        })?;
        assert_eq!(t.as_slice(), (0..24).collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn reshape_mismatch() -> Result<(), TensorError> {
        let t = Tensor::<u8, 1, _>::from_shape_vec([4], vec![1, 2, 3, 4], CpuAllocator)?;
        assert!(matches!(
            t.reshape([3, 2]),
            Err(TensorError::DimensionMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn select_outer_errors() -> Result<(), TensorError> {
        let t = Tensor::<u8, 3, _>::zeros([2, 2, 2], CpuAllocator)?;
        assert!(matches!(
            t.select_outer::<2>(2),
            Err(TensorError::IndexOutOfBounds { index: 2, size: 2 })
        ));
        assert!(matches!(
            t.select_outer::<1>(0),
            Err(TensorError::DimensionMismatch { .. })
        ));
        Ok(())
    }

    #[test]
    fn cast_out_of_range() -> Result<(), TensorError> {
        let t = Tensor::<i64, 1, _>::from_shape_vec([2], vec![-1, 2], CpuAllocator)?;
        assert_eq!(t.cast::<u8>().err(), Some(TensorError::CastError));
        assert_eq!(t.cast::<f64>()?.as_slice(), &[-1.0, 2.0]);
        Ok(())
    }

    #[test]
    fn element_wise_op_shape_mismatch() -> Result<(), TensorError> {
        let a = Tensor::<f32, 1, _>::zeros([3], CpuAllocator)?;
        let b = Tensor::<f32, 1, _>::zeros([4], CpuAllocator)?;
        assert!(a.element_wise_op(&b, |x, y| x + y).is_err());
        Ok(())
    }

    #[test]
    fn clone_is_deep() -> Result<(), TensorError> {
        let mut a = Tensor::<f32, 2, _>::from_shape_val([2, 2], 1.0, CpuAllocator)?;
        let b = a.clone();
        a.as_slice_mut()[0] = 5.0;
        assert_eq!(b.as_slice(), &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(a.into_vec(), vec![5.0, 1.0, 1.0, 1.0]);
        Ok(())
    }
}
