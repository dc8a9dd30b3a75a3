use sector_clip_core::PrimitiveType;
use thiserror::Error;

/// Result type for filtering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during clip-box filtering
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} is not an instanced collection and cannot be filtered per instance")]
    NotAnInstancedCollection(PrimitiveType),

    #[error("geometry has no interleaved attributes to filter")]
    NoInterleavedAttributes,

    #[error("core buffer error: {0}")]
    CoreError(#[from] sector_clip_core::Error),
}
