//! Affine warps of images and volumes.
//!
//! - [`affine_2d`] / [`affine_3d`] resample a tensor through an [`AffineMatrix`]
//! - [`AffineTransform2d`] / [`AffineTransform3d`] bundle a matrix with its
//!   interpolation settings and can be built, composed and persisted
//!
//! # Examples
//!
//! Rotating an image by 30 degrees about its center:
//!
//! ```
//! use tsample_tensor::{CpuAllocator, Tensor3};
//! use tsample_imgproc::warp::AffineTransform2d;
//!
//! let image = Tensor3::<f32, _>::zeros([3, 32, 32], CpuAllocator).unwrap();
//! let rotated = AffineTransform2d::rotation(30.0).apply(&image).unwrap();
//! assert_eq!(rotated.shape, [3, 32, 32]);
//! ```

mod affine;
mod transform;

pub use affine::{affine_2d, affine_3d, AffineMatrix};
pub use transform::{AffineTransform2d, AffineTransform3d, RotationAxis};
