use serde::{Deserialize, Serialize};

use super::{DiskRegion, OutOfBounds, SECTOR_SIZE_U64};

/// A [`DiskRegion`] known to contain a directory entry table, as opposed to file data.
#[repr(C)]
#[repr(packed)]
#[derive(Deserialize, Serialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DirectoryEntryTable {
    pub region: DiskRegion,
}

impl DirectoryEntryTable {
    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    pub fn size(&self) -> u32 {
        self.region.size()
    }

    pub fn offset(&self, offset: u64) -> Result<u64, OutOfBounds> {
        self.region.offset(offset)
    }

    /// Absolute byte offset of the start of this table, regardless of whether
    /// it's empty. Used to align sector-padding skips during decoding.
    pub fn start_offset(&self) -> u64 {
        SECTOR_SIZE_U64 * self.region.sector as u64
    }
}
