#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `tsample-tensor` is the small tensor engine the augmentation utilities are
//! written against: row-major N-dimensional arrays with const-generic rank,
//! allocator-backed storage and zero-copy views.
//!
//! - **Tensor**: owned data with shape and stride information
//! - **TensorStorage**: the memory buffer, obtained from a [`TensorAllocator`]
//! - **TensorView**: non-owning windows into a tensor (reshapes, channel planes)
//!
//! # Quick Start
//!
//! ```rust
//! use tsample_tensor::{CpuAllocator, Tensor};
//!
//! let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let tensor = Tensor::<f32, 2, _>::from_shape_vec([2, 3], data, CpuAllocator).unwrap();
//!
//! assert_eq!(tensor.get([1, 2]), Some(&6.0));
//!
//! let reshaped = tensor.reshape([3, 2]).unwrap();
//! assert_eq!(reshaped.shape, [3, 2]);
//! ```

/// Allocator module containing memory management utilities.
pub mod allocator;

/// Bincode module for binary serialization and deserialization.
#[cfg(feature = "bincode")]
pub mod bincode;

/// Serde module for JSON/other format serialization and deserialization.
#[cfg(feature = "serde")]
pub mod serde;

/// Storage module containing the memory buffer implementation.
pub mod storage;

/// Tensor module containing the main tensor implementation and error types.
pub mod tensor;

/// View module containing non-owning tensor view implementations.
pub mod view;

pub use crate::allocator::{CpuAllocator, TensorAllocator};
pub(crate) use crate::tensor::get_strides_from_shape;
pub use crate::tensor::{Tensor, TensorError};
pub use crate::view::TensorView;

/// Type alias for a 1-dimensional tensor.
pub type Tensor1<T, A> = Tensor<T, 1, A>;

/// Type alias for a 2-dimensional tensor.
pub type Tensor2<T, A> = Tensor<T, 2, A>;

/// Type alias for a 3-dimensional tensor.
pub type Tensor3<T, A> = Tensor<T, 3, A>;

/// Type alias for a 4-dimensional tensor.
pub type Tensor4<T, A> = Tensor<T, 4, A>;

/// Type alias for a 2-dimensional tensor with CPU allocator.
pub type CpuTensor2<T> = Tensor2<T, CpuAllocator>;
