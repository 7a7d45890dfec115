use bincode::Options;
use serde::{Deserialize, Serialize};

use super::DirectoryEntryDiskData;

/// On-disc representation of a directory entry BST node: the child links and data.
/// Does not include the name or trailing padding.
#[repr(C)]
#[repr(packed)]
#[derive(Deserialize, Serialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DirectoryEntryDiskNode {
    pub left_entry_offset: u16,
    pub right_entry_offset: u16,
    pub dirent: DirectoryEntryDiskData,
}

impl DirectoryEntryDiskNode {
    pub const ON_DISK_SIZE: usize = 0xe;

    pub fn deserialize(buf: &[u8; Self::ON_DISK_SIZE]) -> Result<Self, bincode::Error> {
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .with_little_endian()
            .deserialize(buf)
    }
}
