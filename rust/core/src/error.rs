use thiserror::Error;

/// Result type for buffer and layout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing buffer views.
///
/// Every variant indicates a broken contract between the sector decoder
/// and the filtering engine. There is no runtime recovery policy; callers
/// are expected to treat these as fatal.
#[derive(Error, Debug)]
pub enum Error {
    #[error("buffer cannot be viewed as 32-bit floats: {0}")]
    MisalignedFloatView(String),

    #[error("buffer length {len} is not a multiple of instance stride {stride}")]
    UnevenBufferLength { len: usize, stride: usize },

    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
}
