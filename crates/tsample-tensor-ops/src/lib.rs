#![deny(missing_docs)]
//! Tensor operations used by the augmentation transforms.

/// Error types for the tensor-ops module.
pub mod error;

/// Reshaping helpers that collapse trailing axes.
pub mod flatten;

/// Cartesian products and coordinate grids.
pub mod grid;

/// Element-wise comparisons and N-dimensional gathers.
pub mod ops;

/// Random sampling from tensors.
pub mod random;

/// Correlation statistics.
pub mod stats;

pub use crate::error::TensorOpsError;
pub use crate::flatten::{bc_flatten, c_flatten, flatten};
pub use crate::grid::{iterproduct, iterproduct_dims, iterproduct_like};
pub use crate::ops::{allclose, gather_nd, ALLCLOSE_TOLERANCE};
pub use crate::random::{random_choice, random_choice_range, RandomChoiceParams};
pub use crate::stats::{corrcoef, matrixcorr, pearsonr};
