use crate::{get_strides_from_shape, storage::TensorStorage, Tensor, TensorAllocator, TensorError};

/// A non-owning view into tensor data.
///
/// `TensorView` borrows the storage of a [`Tensor`] and describes a
/// contiguous row-major window of it: `offset` is the element index where the
/// window starts, `shape` and `strides` describe how it is indexed. Views are
/// produced by [`Tensor::view`], [`Tensor::reshape`] and
/// [`Tensor::select_outer`] and never copy data.
///
/// # Examples
///
/// ```rust
/// use tsample_tensor::{CpuAllocator, Tensor};
///
/// let tensor = Tensor::<i32, 1, _>::from_shape_vec([6], vec![1, 2, 3, 4, 5, 6], CpuAllocator)
///     .unwrap();
///
/// let view = tensor.reshape([2, 3]).unwrap();
/// assert_eq!(view.shape, [2, 3]);
/// assert_eq!(*view.get_unchecked([1, 2]), 6);
/// ```
pub struct TensorView<'a, T, const N: usize, A: TensorAllocator> {
    /// Reference to the storage held by another tensor.
    pub storage: &'a TensorStorage<T, A>,

    /// The element offset of the view inside the storage.
    pub offset: usize,

    /// The shape of the tensor view.
    pub shape: [usize; N],

    /// The strides for accessing elements in the view.
    pub strides: [usize; N],
}

impl<'a, T, const N: usize, A: TensorAllocator> TensorView<'a, T, N, A> {
    /// Returns the elements covered by the view in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        &self.storage.as_slice()[self.offset..self.offset + self.numel()]
    }

    /// Returns the number of elements in the view.
    #[inline]
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Get the offset of the element at the given index relative to the start
    /// of the view, or `None` if any component is out of bounds.
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

    /// Gets the element at the given index without bounds checking the
    /// individual components.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset lies outside the view.
    pub fn get_unchecked(&self, index: [usize; N]) -> &'a T {
        let offset = index
            .iter()
            .zip(self.strides)
            .fold(0, |acc, (&idx, stride)| acc + idx * stride);
        &self.as_slice()[offset]
    }

    /// Gets the element at the given index, or `None` if out of bounds.
    pub fn get(&self, index: [usize; N]) -> Option<&'a T> {
        self.get_iter_offset(index)
            .and_then(|i| self.as_slice().get(i))
    }

    /// Reshape the view without copying.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of elements differs.
    pub fn reshape<const M: usize>(
        &self,
        shape: [usize; M],
    ) -> Result<TensorView<'a, T, M, A>, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != self.numel() {
            return Err(TensorError::DimensionMismatch {
                message: "Reshape operation requires same number of elements".to_string(),
                expected: format!("{:?} ({} elements)", shape, numel),
                actual: format!("{:?} ({} elements)", self.shape, self.numel()),
            });
        }

        Ok(TensorView {
            storage: self.storage,
            offset: self.offset,
            shape,
            strides: get_strides_from_shape(shape),
        })
    }

    /// Select one index along the leading axis, dropping that axis.
    ///
    /// # Errors
    ///
    /// Returns an error if `M + 1 != N` or `index >= shape[0]`.
    pub fn select_outer<const M: usize>(
        &self,
        index: usize,
    ) -> Result<TensorView<'a, T, M, A>, TensorError> {
        if N == 0 || M + 1 != N {
            return Err(TensorError::dimension_mismatch(
                format!(
                    "select_outer into {} dimensions needs a {}-dimensional tensor",
                    M,
                    M + 1
                ),
                &[M + 1],
                &[N],
            ));
        }
        if index >= self.shape[0] {
            return Err(TensorError::index_out_of_bounds(
                index as i64,
                self.shape[0],
            ));
        }

        let mut shape = [0; M];
        let mut strides = [0; M];
        shape.copy_from_slice(&self.shape[1..]);
        strides.copy_from_slice(&self.strides[1..]);

        Ok(TensorView {
            storage: self.storage,
            offset: self.offset + index * self.strides[0],
            shape,
            strides,
        })
    }

    /// Copies the view into a new owned tensor.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tsample_tensor::{CpuAllocator, Tensor};
    ///
    /// let tensor = Tensor::<i32, 2, _>::from_shape_vec([2, 2], vec![1, 2, 3, 4], CpuAllocator)
    ///     .unwrap();
    /// let row = tensor.select_outer::<1>(1).unwrap().as_contiguous().unwrap();
    /// assert_eq!(row.as_slice(), &[3, 4]);
    /// ```
    pub fn as_contiguous(&self) -> Result<Tensor<T, N, A>, TensorError>
    where
        T: Clone,
    {
        Tensor::from_shape_slice(self.shape, self.as_slice(), self.storage.alloc().clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::{CpuAllocator, Tensor, TensorError};

    #[test]
    fn reshape_view() -> Result<(), TensorError> {
        let tensor = Tensor::<u8, 1, _>::from_shape_vec([4], vec![1, 2, 3, 4], CpuAllocator)?;
        let view = tensor.reshape([2, 2])?;
        assert_eq!(view.shape, [2, 2]);
        assert_eq!(view.strides, [2, 1]);
        assert_eq!(view.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(view.get([1, 1]), Some(&4));
        assert!(view.get([2, 0]).is_none());
        Ok(())
    }

    #[test]
    fn select_outer_nested() -> Result<(), TensorError> {
        let tensor = Tensor::<usize, 3, _>::from_shape_fn([2, 3, 4], CpuAllocator, |[c, i, j]| {
            c * 100 + i * 10 + j
        })?;
        let plane = tensor.select_outer::<2>(1)?;
        assert_eq!(plane.offset, 12);
        assert_eq!(plane.shape, [3, 4]);
        assert_eq!(*plane.get_unchecked([2, 3]), 123);

        let row = plane.select_outer::<1>(2)?;
        assert_eq!(row.as_slice(), &[120, 121, 122, 123]);

        let flat = plane.reshape([12])?;
        assert_eq!(flat.offset, 12);
        assert_eq!(flat.as_slice()[0], 100);
        Ok(())
    }
}
