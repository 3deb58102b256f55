//! Sampling of image and volume tensors at arbitrary coordinates.
//!
//! Coordinates are given per channel as a (C, P, D) tensor, one row of D
//! spatial coordinates per output position. Out-of-range coordinates are
//! clamped to the border of the input.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: rounds to the closest sample
//! - **Bilinear**: blends the 2^D surrounding samples (trilinear for volumes)

mod bilinear;

/// Coordinate grid utilities.
pub mod grid;

pub(crate) mod interpolate;
mod nearest;

pub use bilinear::{bilinear_interp_2d, bilinear_interp_3d};
pub use interpolate::InterpolationMode;
pub use nearest::{nearest_interp_2d, nearest_interp_3d};

pub(crate) use interpolate::interpolate;
