use thiserror::Error;
use tsample_tensor::TensorError;

/// An error type for tensor operations.
#[derive(Error, Debug, PartialEq)]
pub enum TensorOpsError {
    /// Tensor error
    #[error("Error with the tensor: {0}")]
    TensorError(#[from] TensorError),

    /// Shape mismatch
    #[error("Shape mismatch: {0:?} != {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// The sampling probabilities do not sum to one.
    #[error("p must sum to 1.0, got {0}")]
    InvalidProbabilities(f64),

    /// Weighted sampling was requested without replacement.
    #[error("replace must equal true if probabilities given")]
    ReplaceRequired,

    /// More samples were requested without replacement than the population holds.
    #[error("Cannot take {size} samples without replacement from a population of {population}")]
    SampleSizeTooLarge {
        /// Requested number of samples
        size: usize,
        /// Number of elements available
        population: usize,
    },

    /// The source to sample from has no elements.
    #[error("Cannot sample from an empty population")]
    EmptyPopulation,
}
