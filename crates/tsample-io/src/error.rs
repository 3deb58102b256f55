/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum TransformIoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open, read or write the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to encode or decode the transform.
    #[error("Bincode error: {0}")]
    Bincode(String),
}
