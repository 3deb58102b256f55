use std::str::FromStr;

use num_traits::Float;
use tsample_tensor::{Tensor, Tensor3, TensorAllocator};

use super::bilinear::multilinear_interp;
use super::nearest::nearest_interp;
use crate::error::ImgprocError;

/// Interpolation mode for the affine warps.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub enum InterpolationMode {
    /// Round every coordinate to the closest sample.
    Nearest,
    /// Bilinear interpolation in 2D, trilinear interpolation in 3D.
    #[default]
    Bilinear,
}

impl FromStr for InterpolationMode {
    type Err = ImgprocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" => Ok(Self::Nearest),
            "bilinear" | "trilinear" => Ok(Self::Bilinear),
            other => Err(ImgprocError::UnsupportedMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Bilinear => write!(f, "bilinear"),
        }
    }
}

/// Upper clamp margin of the trilinear interpolation.
pub(crate) const TRILINEAR_EPSILON: f32 = 1e-5;

/// Sample `x` at the given coordinates with the requested mode.
///
/// `coords` has shape (C, P, D) where D is the number of spatial axes of `x`
/// (`N - 1`) and P the number of spatial positions. The output has the shape
/// of `x`.
pub(crate) fn interpolate<T, const N: usize, const D: usize, A, B>(
    x: &Tensor<T, N, A>,
    coords: &Tensor3<f32, B>,
    mode: InterpolationMode,
) -> Result<Tensor<T, N, A>, ImgprocError>
where
    T: Float + Send + Sync,
    A: TensorAllocator,
    B: TensorAllocator,
{
    match mode {
        InterpolationMode::Nearest => nearest_interp::<T, N, D, A, B>(x, coords),
        InterpolationMode::Bilinear => {
            let epsilon = if D == 3 { TRILINEAR_EPSILON } else { 0.0 };
            multilinear_interp::<T, N, D, A, B>(x, coords, epsilon)
        }
    }
}
