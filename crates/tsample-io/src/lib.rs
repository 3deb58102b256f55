#![deny(missing_docs)]
//! Saving and loading of transforms.

/// Error types for the io module.
pub mod error;

/// Bincode persistence of transforms.
pub mod transform;

pub use crate::error::TransformIoError;
pub use crate::transform::{load_transform, save_transform};
