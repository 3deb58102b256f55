use std::{alloc::Layout, mem::ManuallyDrop, ptr::NonNull};

use crate::allocator::{TensorAllocator, TensorAllocatorError};

/// Owned, contiguous memory region backing a tensor.
///
/// The buffer is requested from the tensor allocator `A` and released through
/// the same allocator when the storage is dropped.
///
/// # Safety
///
/// `ptr` is valid for `len` initialized elements of `T` and was produced by
/// `alloc` with `layout`, unless `layout` has size zero in which case `ptr`
/// is dangling and nothing was allocated.
pub struct TensorStorage<T, A: TensorAllocator> {
    /// The pointer to the tensor memory which must be non-null.
    ptr: NonNull<T>,
    /// The number of elements in the storage.
    len: usize,
    /// The memory layout used for allocation.
    layout: Layout,
    /// The allocator owning the memory.
    alloc: A,
}

impl<T, A: TensorAllocator> TensorStorage<T, A> {
    /// Creates a new tensor storage by moving the elements of a vector into
    /// memory obtained from `alloc`.
    ///
    /// # Arguments
    ///
    /// * `vec` - The elements to move into the storage.
    /// * `alloc` - The allocator used to allocate the tensor storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is invalid or the allocation fails.
    pub fn from_vec(vec: Vec<T>, alloc: A) -> Result<Self, TensorAllocatorError> {
        let len = vec.len();
        let layout = Layout::array::<T>(len).map_err(TensorAllocatorError::LayoutError)?;

        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            let raw = alloc.alloc(layout)? as *mut T;
            NonNull::new(raw).ok_or(TensorAllocatorError::NullPointer)?
        };

        let mut vec = vec;
        // SAFETY: the destination holds `len` elements and cannot overlap the vec buffer.
        // The elements are moved out, so the vec must not drop them again.
        unsafe {
            std::ptr::copy_nonoverlapping(vec.as_ptr(), ptr.as_ptr(), len);
            vec.set_len(0);
        }

        Ok(Self {
            ptr,
            len,
            layout,
            alloc,
        })
    }

    /// Returns the allocator used to allocate the tensor storage.
    #[inline]
    pub fn alloc(&self) -> &A {
        &self.alloc
    }

    /// Returns the number of elements in the storage.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the tensor storage is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the memory layout of the storage.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the data pointer.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns the storage data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid for len initialized elements.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Returns the storage data as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: ptr is valid for len initialized elements and we hold &mut self.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Consumes the storage and moves its elements into a vector.
    pub fn into_vec(self) -> Vec<T> {
        let this = ManuallyDrop::new(self);
        let mut vec = Vec::with_capacity(this.len);
        // SAFETY: the elements are moved into the vec and the storage memory is
        // released below without dropping them a second time.
        unsafe {
            std::ptr::copy_nonoverlapping(this.ptr.as_ptr(), vec.as_mut_ptr(), this.len);
            vec.set_len(this.len);
            if this.layout.size() != 0 {
                this.alloc
                    .dealloc(this.ptr.as_ptr() as *mut u8, this.layout);
            }
            drop(std::ptr::read(&this.alloc));
        }
        vec
    }
}

// SAFETY: the storage uniquely owns its buffer, and the allocator is Send + Sync.
unsafe impl<T: Send, A: TensorAllocator> Send for TensorStorage<T, A> {}

// SAFETY: shared access only hands out `&[T]`.
unsafe impl<T: Sync, A: TensorAllocator> Sync for TensorStorage<T, A> {}

impl<T, A: TensorAllocator> Drop for TensorStorage<T, A> {
    fn drop(&mut self) {
        // SAFETY: ptr holds len initialized elements allocated with layout.
        unsafe {
            std::ptr::drop_in_place(std::ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.len,
            ));
        }
        if self.layout.size() != 0 {
            self.alloc
                .dealloc(self.ptr.as_ptr() as *mut u8, self.layout);
        }
    }
}

impl<T: Clone, A: TensorAllocator> Clone for TensorStorage<T, A> {
    fn clone(&self) -> Self {
        match Self::from_vec(self.as_slice().to_vec(), self.alloc.clone()) {
            Ok(storage) => storage,
            Err(_) => std::alloc::handle_alloc_error(self.layout),
        }
    }
}

impl<T, A: TensorAllocator> std::fmt::Debug for TensorStorage<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TensorStorage")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("layout", &self.layout)
            .finish()
    }
}
