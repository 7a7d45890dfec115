use thiserror::Error;

use crate::layout::OutOfBounds;

/// Specific reason a directory entry or tree was rejected as malformed.
///
/// Every variant carries the absolute byte offset of the entry that triggered
/// it (and the decoded name, where one was available) so a failure can be
/// diagnosed without re-running the walk.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum MalformedReason {
    #[error("child entry offset out of bounds: {0}")]
    OffsetOutOfBounds(OutOfBounds),

    #[error("entry at offset {offset:#x} has a data range (sector {sector}, size {size}) exceeding the image bounds of {image_size}")]
    DataOutOfBounds {
        offset: u64,
        sector: u32,
        size: u32,
        image_size: u64,
    },

    #[error("entry at offset {offset:#x} has an empty file name")]
    EmptyName { offset: u64 },

    #[error("entry {name:?} at offset {offset:#x} has a name containing a path separator")]
    NameHasSeparator { offset: u64, name: String },

    #[error("entry {name:?} at offset {offset:#x} is a relative path component (\".\" or \"..\")")]
    NameIsRelative { offset: u64, name: String },

    #[error("directory entry tree contains a cycle back to offset {offset:#x}")]
    Cycle { offset: u64 },

    #[error("directory recursion depth {depth} exceeds the maximum")]
    DepthExceeded { depth: u32 },
}

impl From<OutOfBounds> for MalformedReason {
    fn from(e: OutOfBounds) -> Self {
        MalformedReason::OffsetOutOfBounds(e)
    }
}

/// Structured error taxonomy for every fallible operation this library exposes.
///
/// Generic over `E`, the read error type of the backing [`crate::blockdev::BlockDeviceRead`],
/// so a session over a file reports `std::io::Error` and a session over a byte
/// slice reports its own infallible-bounds error without this type committing
/// to one I/O error.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error<E: std::error::Error + Send + Sync + 'static> {
    #[error("io error: {0}")]
    Io(#[from] E),

    #[error("not an xdvdfs volume")]
    NotAnXiso,

    #[error("malformed xdvdfs structure: {0}")]
    Malformed(#[from] MalformedReason),

    #[error("destination buffer too small, output truncated")]
    BufferTooSmall,

    #[error("sink operation failed: {0}")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("operation cancelled")]
    Cancelled,
}
