use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::TransformIoError;

/// Persist a transform to a file.
///
/// The value is written with the bincode standard configuration through a
/// buffered writer. The file is created or truncated.
///
/// # Arguments
///
/// * `file_path` - The path where the transform is written.
/// * `transform` - Any bincode encodable value.
///
/// # Example
///
/// ```no_run
/// use tsample_imgproc::warp::AffineTransform2d;
/// use tsample_io::save_transform;
///
/// save_transform("rotate.bin", &AffineTransform2d::rotation(15.0)).unwrap();
/// ```
pub fn save_transform<T: bincode::Encode>(
    file_path: impl AsRef<Path>,
    transform: &T,
) -> Result<(), TransformIoError> {
    let file_path = file_path.as_ref();
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);

    let written = bincode::encode_into_std_write(transform, &mut writer, bincode::config::standard())
        .map_err(|e| TransformIoError::Bincode(e.to_string()))?;
    writer.flush()?;

    log::debug!("saved transform to {} ({} bytes)", file_path.display(), written);

    Ok(())
}

/// Load a transform written by [`save_transform`].
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, or if its content
/// does not decode as `T`.
pub fn load_transform<T: bincode::Decode<()>>(
    file_path: impl AsRef<Path>,
) -> Result<T, TransformIoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(TransformIoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let file = File::open(file_path)?;
    let mut reader = BufReader::new(file);

    let transform = bincode::decode_from_std_read(&mut reader, bincode::config::standard())
        .map_err(|e| TransformIoError::Bincode(e.to_string()))?;

    log::debug!("loaded transform from {}", file_path.display());

    Ok(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsample_imgproc::interpolation::InterpolationMode;
    use tsample_imgproc::warp::{AffineTransform2d, AffineTransform3d, RotationAxis};
    use tsample_tensor::{CpuAllocator, Tensor2};

    #[test]
    fn test_transform_roundtrip_2d() -> Result<(), TransformIoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("affine2d.bin");

        let transform = AffineTransform2d::rotation(30.0)
            .compose(&AffineTransform2d::translation([1.5, -2.0]))
            .with_mode(InterpolationMode::Nearest);
        save_transform(&file_path, &transform)?;

        let loaded: AffineTransform2d = load_transform(&file_path)?;
        assert_eq!(loaded, transform);
        Ok(())
    }

    #[test]
    fn test_transform_roundtrip_3d() -> Result<(), TransformIoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("affine3d.bin");

        let transform = AffineTransform3d::rotation(RotationAxis::Width, 12.0).with_center(false);
        save_transform(&file_path, &transform)?;
        assert_eq!(load_transform::<AffineTransform3d>(&file_path)?, transform);
        Ok(())
    }

    #[test]
    fn test_tensor_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("matrix.bin");

        let matrix = AffineTransform2d::shear(10.0).matrix_tensor()?;
        save_transform(&file_path, &matrix)?;

        let loaded: Tensor2<f32, CpuAllocator> = load_transform(&file_path)?;
        assert_eq!(loaded.shape, matrix.shape);
        assert_eq!(loaded.as_slice(), matrix.as_slice());
        Ok(())
    }

    #[test]
    fn test_load_missing_file() -> Result<(), TransformIoError> {
        let tmp_dir = tempfile::tempdir()?;
        let result = load_transform::<AffineTransform2d>(tmp_dir.path().join("missing.bin"));
        assert!(matches!(result, Err(TransformIoError::FileDoesNotExist(_))));
        Ok(())
    }

    #[test]
    fn test_load_wrong_payload() -> Result<(), TransformIoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("short.bin");
        std::fs::write(&file_path, [1u8, 2, 3])?;

        let result = load_transform::<AffineTransform3d>(&file_path);
        assert!(matches!(result, Err(TransformIoError::Bincode(_))));
        Ok(())
    }
}
