use num_traits::Float;
use tsample_tensor::{CpuAllocator, CpuTensor2, Tensor, Tensor3, Tensor4, TensorAllocator};

use super::affine::{affine_2d, affine_3d};
use crate::error::ImgprocError;
use crate::interpolation::InterpolationMode;

/// Product of two affine matrices in (D, D + 1) form: `outer · inner`.
fn compose_affine<const D: usize, const K: usize>(
    outer: &[[f32; K]; D],
    inner: &[[f32; K]; D],
) -> [[f32; K]; D] {
    let mut out = [[0.0; K]; D];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            let bias = if j == D { outer[i][D] } else { 0.0 };
            *value = (0..D).fold(bias, |acc, k| acc + outer[i][k] * inner[k][j]);
        }
    }
    out
}

fn matrix_tensor<const D: usize, const K: usize>(
    matrix: &[[f32; K]; D],
) -> Result<CpuTensor2<f32>, ImgprocError> {
    Ok(Tensor::from_shape_vec(
        [D, K],
        matrix.concat(),
        CpuAllocator,
    )?)
}

/// A 2D affine transform with its interpolation settings.
///
/// The matrix maps output grid positions to input positions, see
/// [`affine_2d`](super::affine_2d).
///
/// # Example
///
/// ```
/// use tsample_imgproc::warp::AffineTransform2d;
///
/// let transform = AffineTransform2d::rotation(90.0).compose(&AffineTransform2d::translation([2.0, 0.0]));
/// assert!((transform.matrix[0][2] - 2.0).abs() < 1e-6);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    serde::Serialize,
    serde::Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct AffineTransform2d {
    /// The (2, 3) affine matrix.
    pub matrix: [[f32; 3]; 2],
    /// The interpolation mode.
    pub mode: InterpolationMode,
    /// Whether the transform is applied about the image center.
    pub center: bool,
}

impl Default for AffineTransform2d {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform2d {
    /// The identity transform, bilinear and centered.
    pub fn identity() -> Self {
        Self::from_matrix([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])
    }

    /// Create a transform from a (2, 3) matrix, bilinear and centered.
    pub fn from_matrix(matrix: [[f32; 3]; 2]) -> Self {
        Self {
            matrix,
            mode: InterpolationMode::default(),
            center: true,
        }
    }

    /// Shift the sampled positions by `shift` pixels along (rows, cols).
    pub fn translation(shift: [f32; 2]) -> Self {
        Self::from_matrix([[1.0, 0.0, shift[0]], [0.0, 1.0, shift[1]]])
    }

    /// Scale the sampled positions by `factors` along (rows, cols).
    ///
    /// Factors above one zoom out, below one zoom in.
    pub fn zoom(factors: [f32; 2]) -> Self {
        Self::from_matrix([[factors[0], 0.0, 0.0], [0.0, factors[1], 0.0]])
    }

    /// Rotate by `degrees`.
    pub fn rotation(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::from_matrix([[cos, -sin, 0.0], [sin, cos, 0.0]])
    }

    /// Shear by `degrees`.
    pub fn shear(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::from_matrix([[1.0, -sin, 0.0], [0.0, cos, 0.0]])
    }

    /// Set the interpolation mode.
    pub fn with_mode(mut self, mode: InterpolationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set whether the transform is applied about the image center.
    pub fn with_center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Chain `other` after `self`, keeping the settings of `self`.
    ///
    /// The resulting matrix is `other · self` in homogeneous form.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            matrix: compose_affine(&other.matrix, &self.matrix),
            ..*self
        }
    }

    /// The matrix as a (2, 3) tensor.
    pub fn matrix_tensor(&self) -> Result<CpuTensor2<f32>, ImgprocError> {
        matrix_tensor(&self.matrix)
    }

    /// Warp a (C, H, W) image.
    pub fn apply<T, A>(&self, x: &Tensor3<T, A>) -> Result<Tensor3<T, A>, ImgprocError>
    where
        T: Float + Send + Sync,
        A: TensorAllocator,
    {
        affine_2d(x, &self.matrix_tensor()?.into(), self.mode, self.center)
    }
}

/// Axis of a 3D rotation, in (depth, height, width) order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub enum RotationAxis {
    /// Rotate within the (height, width) plane.
    Depth,
    /// Rotate within the (depth, width) plane.
    Height,
    /// Rotate within the (depth, height) plane.
    Width,
}

/// A 3D affine transform with its interpolation settings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    serde::Serialize,
    serde::Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct AffineTransform3d {
    /// The (3, 4) affine matrix.
    pub matrix: [[f32; 4]; 3],
    /// The interpolation mode, trilinear when bilinear.
    pub mode: InterpolationMode,
    /// Whether the transform is applied about the volume center.
    pub center: bool,
}

impl Default for AffineTransform3d {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform3d {
    /// The identity transform, trilinear and centered.
    pub fn identity() -> Self {
        Self::from_matrix([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Create a transform from a (3, 4) matrix, trilinear and centered.
    pub fn from_matrix(matrix: [[f32; 4]; 3]) -> Self {
        Self {
            matrix,
            mode: InterpolationMode::default(),
            center: true,
        }
    }

    /// Shift the sampled positions by `shift` voxels along (depth, rows, cols).
    pub fn translation(shift: [f32; 3]) -> Self {
        let mut transform = Self::identity();
        for (row, s) in transform.matrix.iter_mut().zip(shift) {
            row[3] = s;
        }
        transform
    }

    /// Scale the sampled positions by `factors` along (depth, rows, cols).
    pub fn zoom(factors: [f32; 3]) -> Self {
        let mut transform = Self::identity();
        for (i, f) in factors.into_iter().enumerate() {
            transform.matrix[i][i] = f;
        }
        transform
    }

    /// Rotate by `degrees` about `axis`.
    pub fn rotation(axis: RotationAxis, degrees: f32) -> Self {
        let (p, q) = match axis {
            RotationAxis::Depth => (1, 2),
            RotationAxis::Height => (0, 2),
            RotationAxis::Width => (0, 1),
        };
        let (sin, cos) = degrees.to_radians().sin_cos();

        let mut transform = Self::identity();
        transform.matrix[p][p] = cos;
        transform.matrix[p][q] = -sin;
        transform.matrix[q][p] = sin;
        transform.matrix[q][q] = cos;
        transform
    }

    /// Set the interpolation mode.
    pub fn with_mode(mut self, mode: InterpolationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set whether the transform is applied about the volume center.
    pub fn with_center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Chain `other` after `self`, keeping the settings of `self`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            matrix: compose_affine(&other.matrix, &self.matrix),
            ..*self
        }
    }

    /// The matrix as a (3, 4) tensor.
    pub fn matrix_tensor(&self) -> Result<CpuTensor2<f32>, ImgprocError> {
        matrix_tensor(&self.matrix)
    }

    /// Warp a (C, D, H, W) volume.
    pub fn apply<T, A>(&self, x: &Tensor4<T, A>) -> Result<Tensor4<T, A>, ImgprocError>
    where
        T: Float + Send + Sync,
        A: TensorAllocator,
    {
        affine_3d(x, &self.matrix_tensor()?.into(), self.mode, self.center)
    }
}
