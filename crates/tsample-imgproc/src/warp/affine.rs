use num_traits::Float;
use tsample_tensor::{CpuAllocator, CpuTensor2, Tensor, Tensor3, Tensor4, TensorAllocator};

use crate::error::ImgprocError;
use crate::interpolation::grid::{coordinate_grid, split_channels};
use crate::interpolation::{interpolate, InterpolationMode};

/// The affine matrix of a warp, shared by all channels or given per channel.
///
/// A matrix has shape (R, D + 1) with R >= D: the leading (D, D) block is the
/// linear part and the first D rows of the last column the translation. Extra
/// rows, such as the homogeneous row of a (3, 3) matrix in 2D, are ignored.
#[derive(Debug, Clone)]
pub enum AffineMatrix {
    /// One (R, D + 1) matrix broadcast to every channel.
    Shared(CpuTensor2<f32>),
    /// A (C, R, D + 1) stack with one matrix per channel.
    PerChannel(Tensor3<f32, CpuAllocator>),
}

impl From<CpuTensor2<f32>> for AffineMatrix {
    fn from(matrix: CpuTensor2<f32>) -> Self {
        Self::Shared(matrix)
    }
}

impl From<Tensor3<f32, CpuAllocator>> for AffineMatrix {
    fn from(matrices: Tensor3<f32, CpuAllocator>) -> Self {
        Self::PerChannel(matrices)
    }
}

// linear part and translation of one channel
type ChannelAffine<const D: usize> = ([[f32; D]; D], [f32; D]);

impl AffineMatrix {
    /// The shape of the underlying tensor.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Shared(m) => m.shape.to_vec(),
            Self::PerChannel(m) => m.shape.to_vec(),
        }
    }

    fn per_channel<const D: usize>(
        &self,
        channels: usize,
    ) -> Result<Vec<ChannelAffine<D>>, ImgprocError> {
        let (batch, rows, cols, data) = match self {
            Self::Shared(m) => (None, m.shape[0], m.shape[1], m.as_slice()),
            Self::PerChannel(m) => (Some(m.shape[0]), m.shape[1], m.shape[2], m.as_slice()),
        };

        if rows < D || cols != D + 1 {
            return Err(ImgprocError::InvalidMatrixShape {
                shape: self.shape(),
                spatial_dims: D,
            });
        }
        if let Some(batch) = batch {
            if batch != channels {
                return Err(ImgprocError::ChannelMismatch {
                    expected: channels,
                    actual: batch,
                });
            }
        }

        let split = |base: usize| {
            let mut linear = [[0.0; D]; D];
            let mut shift = [0.0; D];
            for i in 0..D {
                for j in 0..D {
                    linear[i][j] = data[base + i * cols + j];
                }
                shift[i] = data[base + i * cols + D];
            }
            (linear, shift)
        };

        Ok(match batch {
            Some(_) => (0..channels).map(|c| split(c * rows * cols)).collect(),
            None => vec![split(0); channels],
        })
    }
}

fn affine_nd<T, const N: usize, const D: usize, A>(
    x: &Tensor<T, N, A>,
    matrix: &AffineMatrix,
    mode: InterpolationMode,
    center: bool,
) -> Result<Tensor<T, N, A>, ImgprocError>
where
    T: Float + Send + Sync,
    A: TensorAllocator,
{
    let (channels, spatial) = split_channels::<N, D>(x.shape)?;
    let params = matrix.per_channel::<D>(channels)?;

    log::debug!(
        "affine warp of {:?} with {} interpolation (center: {})",
        x.shape,
        mode,
        center
    );

    let grid = coordinate_grid(spatial)?;
    let num_points = grid.shape[0];

    // the center offset is applied to the transformed copy, never to the grid
    let origin = spatial.map(|dim| if center { dim as f32 / 2.0 + 0.5 } else { 0.0 });

    let mut coords = Vec::with_capacity(channels * num_points * D);
    for (linear, shift) in &params {
        for point in grid.as_slice().chunks_exact(D) {
            for i in 0..D {
                let moved = (0..D).fold(shift[i], |acc, j| {
                    acc + linear[i][j] * (point[j] - origin[j])
                });
                coords.push(moved + origin[i]);
            }
        }
    }
    let coords = Tensor::from_shape_vec([channels, num_points, D], coords, CpuAllocator)?;

    interpolate::<T, N, D, A, CpuAllocator>(x, &coords, mode)
}

/// Apply an affine transformation to a (C, H, W) image.
///
/// The output pixel at grid position `p` takes the input value at
/// `A · p + b` (sampling from output to input). With `center` set the
/// transformation is applied about the image center instead of the origin.
/// Positions that fall outside the input replicate its border.
///
/// # Arguments
///
/// * `x` - The image with shape (C, H, W).
/// * `matrix` - A (2, 3) or (3, 3) matrix, or a (C, 2 or 3, 3) stack.
/// * `mode` - The interpolation mode.
/// * `center` - Whether to transform about the image center.
///
/// # Errors
///
/// Returns an error if the matrix shape does not fit a 2D transform or the
/// number of stacked matrices differs from the channel count.
///
/// # Example
///
/// ```
/// use tsample_tensor::{CpuAllocator, Tensor2, Tensor3};
/// use tsample_imgproc::interpolation::InterpolationMode;
/// use tsample_imgproc::warp::affine_2d;
///
/// let x = Tensor3::<f32, _>::from_shape_fn([3, 20, 20], CpuAllocator, |[_, i, j]| {
///     if (5..15).contains(&i) && (5..15).contains(&j) { 1.0 } else { 0.0 }
/// })
/// .unwrap();
/// let matrix = Tensor2::<f32, _>::from_shape_vec([2, 3], vec![1.0, 0.0, -5.0, 0.0, 1.0, 3.0], CpuAllocator)
///     .unwrap();
///
/// let y = affine_2d(&x, &matrix.into(), InterpolationMode::Nearest, true).unwrap();
/// assert_eq!(y.shape, [3, 20, 20]);
/// ```
pub fn affine_2d<T, A>(
    x: &Tensor3<T, A>,
    matrix: &AffineMatrix,
    mode: InterpolationMode,
    center: bool,
) -> Result<Tensor3<T, A>, ImgprocError>
where
    T: Float + Send + Sync,
    A: TensorAllocator,
{
    affine_nd::<T, 3, 2, A>(x, matrix, mode, center)
}

/// Apply an affine transformation to a (C, D, H, W) volume.
///
/// Same conventions as [`affine_2d`] with a (3, 4) or (4, 4) matrix, or a
/// (C, 3 or 4, 4) stack. Bilinear mode performs trilinear interpolation.
pub fn affine_3d<T, A>(
    x: &Tensor4<T, A>,
    matrix: &AffineMatrix,
    mode: InterpolationMode,
    center: bool,
) -> Result<Tensor4<T, A>, ImgprocError>
where
    T: Float + Send + Sync,
    A: TensorAllocator,
{
    affine_nd::<T, 4, 3, A>(x, matrix, mode, center)
}
