use serde::{Deserialize, Serialize};

use super::SECTOR_SIZE_U64;

/// Bounds violation when resolving an in-table offset against a region's advertised size.
#[derive(thiserror::Error, Debug, Copy, Clone, Eq, PartialEq)]
#[error("offset {offset} out of bounds for region of size {size}")]
pub struct OutOfBounds {
    pub offset: u64,
    pub size: u32,
}

/// A contiguous region on the disc image, given by sector number and byte size.
#[repr(C)]
#[repr(packed)]
#[derive(Deserialize, Serialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DiskRegion {
    pub sector: u32,
    pub size: u32,
}

impl DiskRegion {
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Resolves an offset relative to this region into an absolute byte offset
    /// (relative to the volume's base offset).
    pub fn offset(&self, offset: u64) -> Result<u64, OutOfBounds> {
        if offset >= self.size as u64 {
            return Err(OutOfBounds {
                offset,
                size: self.size,
            });
        }

        Ok(SECTOR_SIZE_U64 * self.sector as u64 + offset)
    }
}
