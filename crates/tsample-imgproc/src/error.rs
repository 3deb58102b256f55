use thiserror::Error;
use tsample_tensor::TensorError;
use tsample_tensor_ops::TensorOpsError;

/// An error type for the warp and interpolation operations.
#[derive(Error, Debug, PartialEq)]
pub enum ImgprocError {
    /// The interpolation mode string is not recognized.
    #[error("Unsupported interpolation mode: {0}")]
    UnsupportedMode(String),

    /// The affine matrix does not fit the number of spatial axes.
    #[error("Invalid affine matrix shape {shape:?} for {spatial_dims} spatial dimensions")]
    InvalidMatrixShape {
        /// Shape of the offending matrix
        shape: Vec<usize>,
        /// Number of spatial axes of the input
        spatial_dims: usize,
    },

    /// The number of matrices or coordinate sets differs from the channel count.
    #[error("Expected {expected} channels, got {actual}")]
    ChannelMismatch {
        /// Number of channels of the input
        expected: usize,
        /// Number of channels provided
        actual: usize,
    },

    /// The coordinates do not cover the spatial positions of the input.
    #[error("Invalid coordinates shape: expected {0:?}, got {1:?}")]
    InvalidCoordinatesShape(Vec<usize>, Vec<usize>),

    /// Tensor error
    #[error(transparent)]
    TensorError(#[from] TensorError),

    /// Tensor operation error
    #[error(transparent)]
    TensorOpsError(#[from] TensorOpsError),
}
