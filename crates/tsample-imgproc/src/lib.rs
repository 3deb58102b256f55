#![deny(missing_docs)]
//! Affine warps and coordinate interpolation for image and volume tensors.

/// Error types for the warp and interpolation operations.
pub mod error;

/// Interpolation of tensors at arbitrary coordinates.
pub mod interpolation;

/// Per-channel parallel execution.
mod parallel;

/// Affine warps and transform objects.
pub mod warp;

pub use crate::error::ImgprocError;
